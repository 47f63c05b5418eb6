use super::{resolve_settings, Settings};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_file_or_env() {
    assert_eq!(resolve_settings(None, no_env), Settings::default());
}

#[test]
fn file_values_are_applied() {
    let settings = resolve_settings(
        Some(
            r#"
            bind_addr = "0.0.0.0:8080"
            scraper_command = "python -m app.scraper"
            "#,
        ),
        no_env,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(
        settings.scraper_command.as_deref(),
        Some("python -m app.scraper")
    );
}

#[test]
fn app_prefixed_env_wins_over_plain_env_and_file() {
    let settings = resolve_settings(Some(r#"bind_addr = "0.0.0.0:1""#), |key| match key {
        "SERVER_BIND" => Some("0.0.0.0:2".to_string()),
        "APP__BIND_ADDR" => Some("0.0.0.0:3".to_string()),
        "SCRAPER_COMMAND" => Some("./scrape.sh".to_string()),
        _ => None,
    });
    assert_eq!(settings.server_bind, "0.0.0.0:3");
    assert_eq!(settings.scraper_command.as_deref(), Some("./scrape.sh"));
}

#[test]
fn blank_scraper_command_means_none() {
    let settings = resolve_settings(Some(r#"scraper_command = "ls""#), |key| {
        (key == "APP__SCRAPER_COMMAND").then(|| "   ".to_string())
    });
    assert_eq!(settings.scraper_command, None);
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let settings = resolve_settings(Some("bind_addr = [1, 2"), no_env);
    assert_eq!(settings, Settings::default());
}
