use std::path::PathBuf;

use battleship_server::ServerConfig;

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5000);
    assert_eq!(config.max_clients, 10);
    assert_eq!(config.records_path, PathBuf::from("data/records.json"));
    assert_eq!(config.bind_addr(), "127.0.0.1:5000");
}

#[test]
fn test_parse_properties() {
    let text = "\
# server settings
server.host = 0.0.0.0
server.port=6000
! legacy comment
max.clients: 4
unused.key=1
";
    let config = ServerConfig::from_properties(text).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 6000);
    assert_eq!(config.max_clients, 4);
    assert_eq!(config.bind_addr(), "0.0.0.0:6000");
}

#[test]
fn test_host_is_optional() {
    let config = ServerConfig::from_properties("server.port=5001\nmax.clients=2\n").unwrap();
    assert_eq!(config.host, "127.0.0.1");
}

#[test]
fn test_missing_required_keys() {
    let err = ServerConfig::from_properties("max.clients=2\n").unwrap_err();
    assert!(err.to_string().contains("server.port"));
    let err = ServerConfig::from_properties("server.port=5001\n").unwrap_err();
    assert!(err.to_string().contains("max.clients"));
}

#[test]
fn test_invalid_values() {
    assert!(ServerConfig::from_properties("server.port=http\nmax.clients=2\n").is_err());
    assert!(ServerConfig::from_properties("server.port=70000\nmax.clients=2\n").is_err());
    assert!(ServerConfig::from_properties("server.port=5001\nmax.clients=-1\n").is_err());
    assert!(ServerConfig::from_properties("just some text\n").is_err());
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("battleship_no_such_dir/server.properties");
    assert!(ServerConfig::load_properties(&path).is_err());
}
