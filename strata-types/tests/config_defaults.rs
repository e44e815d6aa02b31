use std::time::Duration;

use strata_types::{FanOutConfig, PersistenceConfig, StrataConfig, StrataError};

#[test]
fn defaults_match_documented_values() {
    let cfg = StrataConfig::default();
    assert_eq!(cfg.persistence.batch_size, 100);
    assert_eq!(cfg.persistence.max_in_flight, None);
    assert_eq!(cfg.fan_out.request_span, Duration::from_secs(7200));
    assert_eq!(cfg.fan_out.max_concurrency, 6);
    assert!(cfg.clamp_to_now);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let cfg: StrataConfig =
        serde_json::from_str(r#"{"persistence":{"batch_size":60}}"#).expect("deserialize");
    assert_eq!(cfg.persistence.batch_size, 60);
    assert_eq!(cfg.fan_out, FanOutConfig::default());
    assert!(cfg.clamp_to_now);
}

#[test]
fn config_roundtrip() {
    let cfg = StrataConfig {
        persistence: PersistenceConfig {
            batch_size: 7,
            max_in_flight: Some(2),
        },
        fan_out: FanOutConfig {
            request_span: Duration::from_secs(90),
            max_concurrency: 3,
        },
        clamp_to_now: false,
    };
    let json = serde_json::to_string(&cfg).expect("serialize");
    let de: StrataConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(de, cfg);
}

#[test]
fn zero_values_are_rejected() {
    let bad_batch = PersistenceConfig {
        batch_size: 0,
        max_in_flight: None,
    };
    assert!(matches!(bad_batch.validate(), Err(StrataError::InvalidArg(_))));

    let bad_in_flight = PersistenceConfig {
        batch_size: 10,
        max_in_flight: Some(0),
    };
    assert!(matches!(
        bad_in_flight.validate(),
        Err(StrataError::InvalidArg(_))
    ));

    let bad_span = FanOutConfig {
        request_span: Duration::ZERO,
        max_concurrency: 1,
    };
    assert!(matches!(bad_span.validate(), Err(StrataError::InvalidArg(_))));

    let bad_conc = StrataConfig {
        fan_out: FanOutConfig {
            request_span: Duration::from_secs(1),
            max_concurrency: 0,
        },
        ..StrataConfig::default()
    };
    assert!(matches!(bad_conc.validate(), Err(StrataError::InvalidArg(_))));
}

#[test]
fn error_display_and_classification() {
    let e = StrataError::warehouse("usage/MINUTE[0..60)", "boom");
    assert_eq!(e.to_string(), "warehouse request usage/MINUTE[0..60) failed: boom");
    assert!(e.is_remote());
    assert!(StrataError::interrupted("piece 3").is_remote());
    assert!(!StrataError::store("memory", "locked").is_remote());
    assert_eq!(
        StrataError::batch_write(31, "disk full").to_string(),
        "failed to write batch of 31 records: disk full"
    );
}
