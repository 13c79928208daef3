use assert_cmd::Command;
use mockito::{Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::Value;

const SHIP_MATRIX: &str = r#"{
    "success": 1,
    "data": [
        {"id": "24", "production_status": "flight-ready", "min_crew": "1", "max_crew": "1",
         "name": " Aurora MR ", "size": "small", "cargocapacity": "3", "url": "/pledge/aurora",
         "manufacturer": {"name": "Roberts Space Industries", "code": "RSI"}, "chassis_id": "5",
         "media": [{"source_url": "/media/a.jpg", "images": {"store_small": "/media/a_small.jpg"}}]},
        {"id": "62", "production_status": "flight-ready", "min_crew": 4, "max_crew": 6,
         "name": "Carrack", "size": "large", "cargocapacity": 456, "url": "/pledge/carrack",
         "manufacturer": {"name": "Anvil Aerospace", "code": "ANVL"}, "chassis_id": "31",
         "media": []}
    ]
}"#;

fn ship_matrix(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("GET", "/ship-matrix/index")
        .with_status(200)
        .with_body(body)
        .create()
}

fn fleet(server: &ServerGuard) -> Command {
    let mut cmd = Command::cargo_bin("fleet").unwrap();
    cmd.env("LOG_FILTER", "off")
        .env("FLEET_SHIP_MATRIX_URL", server.url())
        .env_remove("FLEET_CATALOG_CACHE")
        .env_remove("FLEET_CATALOG_CACHE_DIR")
        .env_remove("FLEET_CHASSIS_FILE")
        .env_remove("FLEET_SHIP_NAMES_FILE");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn list_ships_as_json() {
    let mut server = Server::new();
    let mock = ship_matrix(&mut server, SHIP_MATRIX);

    let ships = stdout_json(fleet(&server).args(["ships", "list", "--format", "json"]));
    mock.assert();

    let ids: Vec<_> = ships
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    // officials first, then the built-in ships
    assert_eq!(ids, ["24", "62", "0", "1001", "1002", "1070", "1062"]);
    assert_eq!(ships[0]["name"], "Aurora MR");
    assert_eq!(ships[1]["media_url"], Value::Null);
}

#[test]
fn list_ships_of_a_chassis() {
    let dir = tempfile::tempdir().unwrap();
    let chassis_file = dir.path().join("chassis.json");
    std::fs::write(&chassis_file, r#"[{"id": 31, "name": "Carrack"}]"#).unwrap();

    let mut server = Server::new();
    let _mock = ship_matrix(&mut server, SHIP_MATRIX);

    let ships = stdout_json(fleet(&server).args([
        "ships",
        "list",
        "--chassis-id",
        "31",
        "--format",
        "json",
        "--chassis-file",
        chassis_file.to_str().unwrap(),
    ]));
    let ships = ships.as_array().unwrap();
    assert_eq!(ships.len(), 2);
    assert_eq!(ships[0]["id"], "62");
    assert_eq!(ships[1]["id"], "1062");
    assert_eq!(ships[1]["name"], "Carrack with Pisces Expedition");
    assert_eq!(ships[1]["chassis_name"], "Carrack");
}

#[test]
fn find_ship_by_name() {
    let mut server = Server::new();
    let _mock = ship_matrix(&mut server, SHIP_MATRIX);

    let ship = stdout_json(fleet(&server).args(["ships", "find", "aurora mr", "--format", "json"]));
    assert_eq!(ship[0]["id"], "24");

    let output = fleet(&server)
        .args(["ships", "show", "404"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("Ships command failed: no ship found for \"404\""), "{stderr}");
}

#[test]
fn unavailable_ship_matrix() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/ship-matrix/index")
        .with_status(200)
        .with_body(r#"{"success": 0, "data": []}"#)
        .create();

    let output = fleet(&server)
        .args(["ships", "refresh"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("is unsuccessful"), "{stderr}");
}

#[test]
fn file_cache_serves_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().to_str().unwrap();

    let mut server = Server::new();
    let mock = ship_matrix(&mut server, SHIP_MATRIX);

    for _ in 0..2 {
        let ship = stdout_json(fleet(&server).args([
            "ships",
            "show",
            "24",
            "--format",
            "json",
            "--catalog-cache",
            "file",
            "--catalog-cache-dir",
            cache_dir,
        ]));
        assert_eq!(ship[0]["name"], "Aurora MR");
    }
    mock.assert();
}

#[test]
fn alias_commands() {
    let dir = tempfile::tempdir().unwrap();
    let names_file = dir.path().join("ship_names.json");
    std::fs::write(
        &names_file,
        r#"[{"hangar_name": "Dragonfly Black", "provider_name": "Dragonfly"}]"#,
    )
    .unwrap();
    let names_file = names_file.to_str().unwrap();
    let server = Server::new();

    let run = |args: &[&str]| {
        let output = fleet(&server)
            .arg("alias")
            .args(args)
            .args(["--ship-names-file", names_file])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).unwrap().trim().to_string()
    };

    assert_eq!(run(&["to-provider", "Dragonfly Black"]), "Dragonfly");
    assert_eq!(run(&["to-hangar", "Dragonfly"]), "Dragonfly Black");
    assert_eq!(run(&["to-hangar", "Aurora MR"]), "Aurora MR");
    assert_eq!(run(&["equals", " Dragonfly Black", "Dragonfly"]), "true");
    assert_eq!(run(&["equals", "Dragonfly Black", "dragonfly"]), "false");
}

#[test]
fn chassis_name() {
    let server = Server::new();
    let output = fleet(&server)
        .args(["chassis", "name", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).unwrap().trim(), "Unknown chassis");
}
