use std::fmt::Debug;

use async_trait::async_trait;
use fleet_ship_matrix::{Client, ShipMatrixResponse};

/// Where the raw ship matrix comes from
#[async_trait]
pub trait ShipMatrixSource: Debug + Send + Sync + 'static {
    /// Location of the document, for diagnostics
    fn endpoint(&self) -> String;

    async fn fetch_ship_matrix(&self) -> Result<ShipMatrixResponse, fleet_ship_matrix::Error>;
}

#[async_trait]
impl ShipMatrixSource for Client {
    fn endpoint(&self) -> String {
        self.ship_matrix_url()
            .map(String::from)
            .unwrap_or_else(|_| self.base_url().to_string())
    }

    async fn fetch_ship_matrix(&self) -> Result<ShipMatrixResponse, fleet_ship_matrix::Error> {
        self.ship_matrix_index().await
    }
}
