//! Handler configuration loaded from TOML.

use autotag_tests::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_toml_config_drives_handler() {
    // GIVEN
    let config = HandlerConfig::from_toml_str(
        r#"
        sweep_interval_ms = 25
        debounce_cooldown_ms = 10
        worker_name = "autotag-config-test"
        "#,
    )
    .unwrap();

    // WHEN
    let fx = Fixture::builder()
        .system_clock()
        .config(config.clone())
        .build()
        .unwrap();
    fx.constrained_tag("Done", "isComplete()").unwrap();
    fx.add_download(DownloadAttrs::named("a")).unwrap();
    fx.initialise().unwrap();
    fx.update("a", |a| a.complete = true).unwrap();

    // THEN
    assert_eq!(fx.handler().config(), &config);
    fx.wait_until("sweep on a 25ms timer", Duration::from_secs(5), |fx| {
        fx.is_member("Done", "a").unwrap_or(false)
    })
    .unwrap();
}

#[test]
fn test_invalid_config_is_rejected_at_build() {
    let config = HandlerConfig {
        debounce_cooldown_ms: 0,
        ..HandlerConfig::default()
    };

    let result = Fixture::builder().config(config).build();

    assert!(matches!(
        result,
        Err(FixtureError::Handler(HandlerError::Config { .. }))
    ));
}

#[test]
fn test_missing_fields_use_defaults() {
    let config = HandlerConfig::from_toml_str("debounce_cooldown_ms = 250").unwrap();

    assert_eq!(config.sweep_interval(), Duration::from_secs(30));
    assert_eq!(config.debounce_cooldown(), Duration::from_millis(250));
}
