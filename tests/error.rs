use std::path::PathBuf;

use overlay::error::OverlayError;

#[test]
fn display_base_missing() {
    let err = OverlayError::BaseMissing(PathBuf::from("/etc/prometheus/base.yml"));
    assert_eq!(
        err.to_string(),
        "base config not found: /etc/prometheus/base.yml"
    );
}

#[test]
fn display_schema() {
    let err = OverlayError::Schema {
        path: "clients".into(),
        message: "not a list".into(),
    };
    assert_eq!(err.to_string(), "schema error at 'clients': not a list");
}

#[test]
fn display_command_not_found() {
    let err = OverlayError::CommandNotFound("promtail".into());
    assert_eq!(err.to_string(), "command not found: promtail");
}

#[test]
fn display_parse_names_file() {
    let source = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
    let err = OverlayError::Parse {
        path: PathBuf::from("/etc/override.yml"),
        source,
    };
    assert!(err.to_string().starts_with("malformed YAML in /etc/override.yml: "));
}

#[test]
fn display_read() {
    let err = OverlayError::Read {
        path: PathBuf::from("/etc/extra.yml"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(err.to_string(), "cannot read /etc/extra.yml: denied");
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err: OverlayError = io_err.into();
    assert!(matches!(err, OverlayError::Io(_)));
}

#[test]
fn from_yaml_error() {
    let yaml_err = serde_yaml::from_str::<Vec<u64>>("invalid").unwrap_err();
    let err: OverlayError = yaml_err.into();
    assert!(matches!(err, OverlayError::Yaml(_)));
}
