use autoims_logger::{LogOptions, Logger};

#[test]
fn options_without_directory_install_console_only() {
    let logger = Logger::from_options("integration-console-only", LogOptions {
        level: "debug",
        ..LogOptions::default()
    })
    .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
