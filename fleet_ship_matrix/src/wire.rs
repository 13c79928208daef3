//! Wire types of the ship matrix document.
//!
//! The upstream document is loosely typed: numbers are often sent as strings, some fields are
//! `null` and the success flag is an integer. Every field except the ship `id` is therefore read
//! leniently, falling back to an empty/zero value rather than failing the whole document.
use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;

/// Top level `GET /ship-matrix/index` payload
#[derive(Debug, Clone, Deserialize)]
pub struct ShipMatrixResponse {
    /// `None` when the flag is missing
    #[serde(default, deserialize_with = "truthy")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ShipMatrixEntry>,
}

impl ShipMatrixResponse {
    /// `true` only if the payload carries a truthy success flag
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

/// A single ship of the matrix
#[derive(Debug, Clone, Deserialize)]
pub struct ShipMatrixEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub production_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub min_crew: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_crew: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub cargocapacity: u32,
    #[serde(default, deserialize_with = "optional_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "object_or_default")]
    pub manufacturer: Manufacturer,
    #[serde(default, deserialize_with = "optional_string")]
    pub chassis_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manufacturer {
    #[serde(default, deserialize_with = "optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default, deserialize_with = "optional_string")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub images: Option<MediaImages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaImages {
    #[serde(default, deserialize_with = "optional_string")]
    pub store_small: Option<String>,
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty() && s != "0"),
        Value::Array(a) => Some(!a.is_empty()),
        Value::Object(_) => Some(true),
    })
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    // saturating float to int conversion, NaN becomes 0
    Ok(value.map(|v| v.max(0.0) as u32).unwrap_or(0))
}

fn object_or_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

fn object_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(object_or_none(d)?.unwrap_or_default())
}
