use timeblock::config::LoggingConfig;
use timeblock::logging::{get_logger, init_logging, parse_log_level};

#[test]
fn init_is_idempotent_with_file_output() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cfg = LoggingConfig {
        file: tmp_dir.path().join("timeblock.log").to_string_lossy().to_string(),
        console_output: false,
        ..Default::default()
    };
    assert!(init_logging(&cfg).is_ok());
    assert!(init_logging(&cfg).is_ok());
    get_logger("test").info("logging initialized twice");
}

#[test]
fn invalid_level_is_rejected() {
    assert!(parse_log_level("chatty").is_err());
    assert!(parse_log_level("trace").is_ok());
}
