use std::fs;
use std::time::Duration;

use sysdash::core::config::Config;
use sysdash::ui::monitor_tui::{StyleTag, Themes};
use sysdash::DashError;
use tempfile::TempDir;

#[test]
fn test_load_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dash.toml");
    fs::write(
        &path,
        r#"
services = ["nginx.service", "postgresql.service"]
log_limit = 4
refresh_rate = 1.5
middleware_logs = ["/srv/app/error.log"]
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.services, vec!["nginx.service", "postgresql.service"]);
    assert_eq!(config.log_limit, 4);
    assert_eq!(config.refresh_interval(), Duration::from_millis(1500));
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(Some(temp_dir.path().join("nope.toml").as_path())).unwrap_err();
    assert!(matches!(err, DashError::MissingConfig { .. }));
}

#[test]
fn test_invalid_values_in_file_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dash.toml");
    fs::write(&path, "refresh_rate = -2\n").unwrap();

    assert!(matches!(
        Config::load(Some(path.as_path())).unwrap_err(),
        DashError::Config(_)
    ));
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dash.toml");
    fs::write(&path, "services = [\"ssh.service\"\n").unwrap();

    assert!(matches!(
        Config::load(Some(path.as_path())).unwrap_err(),
        DashError::ConfigParse(_)
    ));
}

#[test]
fn test_theme_overrides_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dash.toml");
    fs::write(
        &path,
        r#"
[themes.light]
warning = "bold red on white"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    let themes = Themes::from_config(&config.themes).unwrap();
    let light = themes.resolve(sysdash::core::ThemeKind::Light);
    assert_ne!(
        light.style(StyleTag::Warning),
        Themes::default()
            .resolve(sysdash::core::ThemeKind::Light)
            .style(StyleTag::Warning)
    );
}

#[test]
fn test_bad_theme_style_is_rejected() {
    let config = Config::from_toml(
        r#"
[themes.dark]
error = "bold chartreuse-ish"
"#,
    )
    .unwrap();
    assert!(matches!(
        Themes::from_config(&config.themes).unwrap_err(),
        DashError::Style { .. }
    ));
}
