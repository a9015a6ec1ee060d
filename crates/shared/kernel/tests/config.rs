use autoims_kernel::config::load_config;
use autoims_kernel::domain::config::ApiConfig;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn explicit_file_is_required() {
    let result = load_config::<ApiConfig>(Some("definitely/not/here.toml"));
    assert!(result.is_err());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.toml");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(
        file,
        "[server]\nport = 8080\n\n[database]\npath = \"garage.db\"\n\n[security.identity.jwt]\nttl_seconds = 60"
    )
    .expect("write");

    let cfg: ApiConfig = load_config(Some(&path)).expect("load");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.path, PathBuf::from("garage.db"));
    assert_eq!(cfg.security.identity.jwt.ttl_seconds, 60);
    assert_eq!(cfg.security.identity.jwt.issuer, "autoims");
}

#[test]
fn broken_values_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[server]\nport = \"not a port\"\n").expect("write");

    let err = load_config::<ApiConfig>(Some(&path)).expect_err("bad port");
    assert!(err.to_string().contains("Failed to deserialize config"), "{err}");
}
