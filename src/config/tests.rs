use super::*;

#[test]
fn test_default_config() {
    let config = ReposweepConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.scan.marker, ".git");
    assert_eq!(config.run.program, "git");
    assert_eq!(config.run.args, vec!["gc".to_string()]);
    assert_eq!(config.run.on_interrupt, CancelPolicy::Abandon);
}

#[test]
fn test_embedded_defaults_match_struct_defaults() {
    let parsed: ReposweepConfig = toml::from_str(include_str!("../../default-config.toml")).unwrap();
    assert_eq!(parsed, ReposweepConfig::default());
}

#[test]
fn test_marker_must_be_single_component() {
    let mut config = ReposweepConfig::default();
    config.scan.marker = "a/b".into();
    assert!(config.validate().is_err());

    config.scan.marker = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_program_rejected() {
    let mut config = ReposweepConfig::default();
    config.run.program = "  ".into();
    assert!(config.validate().is_err());
}
