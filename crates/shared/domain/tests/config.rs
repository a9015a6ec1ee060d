use autoims_domain::config::{ApiConfig, DatabaseConfig, JwtConfig, ServerConfig, StorageConfig};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.path, PathBuf::from("autoims.db"));
    assert!(!db.in_memory);

    let jwt = JwtConfig::default();
    assert_eq!(jwt.ttl_seconds, 43_200);
    assert_eq!(jwt.issuer, "autoims");

    assert_eq!(StorageConfig::default().static_dir, PathBuf::from("public"));
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "in_memory": true },
        "security": { "identity": { "jwt": { "secret": "s3cret" } } },
        "logging": { "level": "debug", "json": true, "directory": "/var/log/autoims" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert!(cfg.database.in_memory);
    assert_eq!(cfg.database.path, PathBuf::from("autoims.db"));
    assert_eq!(cfg.security.identity.jwt.secret, "s3cret");
    assert_eq!(cfg.security.identity.jwt.ttl_seconds, 43_200);
    assert_eq!(cfg.logging.directory.as_deref(), Some(std::path::Path::new("/var/log/autoims")));
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut tweaked = original.clone();
    tweaked.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(tweaked.server.port, 9000);
}
