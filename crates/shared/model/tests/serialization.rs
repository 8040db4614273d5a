use tessera_model::config::EngineConfig;
use tessera_model::{
    ApplyOptions, ChangeSet, Dimension, Relationship, Resolution, Rgb, TokenUpdate, TokenValue,
    UpdateOrigin, ValidationResult,
};

#[test]
fn change_set_json_is_key_ordered() {
    let forward = ChangeSet::new()
        .with("secondary", Rgb::new(0, 0, 0))
        .with("primary", Rgb::new(0x1b, 0x36, 0x5d));
    let backward = ChangeSet::new()
        .with("primary", Rgb::new(0x1b, 0x36, 0x5d))
        .with("secondary", Rgb::new(0, 0, 0));

    let a = serde_json::to_string(&forward).unwrap();
    let b = serde_json::to_string(&backward).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with(r#"{"primary""#));
}

#[test]
fn update_records_carry_camel_case_fields() {
    let update = TokenUpdate {
        name: "primary-light".to_owned(),
        value: TokenValue::Color(Rgb::WHITE),
        css_variable: "--primary-light".to_owned(),
        origin: UpdateOrigin::Generated { from: "primary".to_owned() },
        constraint_corrected: false,
    };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["cssVariable"], "--primary-light");
    assert_eq!(json["origin"]["kind"], "generated");
    assert_eq!(json["origin"]["from"], "primary");
    assert_eq!(json["constraintCorrected"], false);
}

#[test]
fn empty_resolution_is_valid_and_has_no_failures() {
    let resolution = Resolution::empty("primary");
    assert!(resolution.is_empty());
    assert!(resolution.validation.valid);
    let json = serde_json::to_value(&resolution).unwrap();
    assert!(json.get("failures").is_none());
}

#[test]
fn system_error_marks_result_invalid() {
    let result = ValidationResult::system_error("orchestration failed");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["violations"][0]["constraint"], "system-error");
    assert_eq!(json["violations"][0]["severity"], "error");
}

#[test]
fn relationship_deserializes_with_missing_lists() {
    let rel: Relationship =
        serde_json::from_str(r#"{"generates":["primary-light"],"domain":"color"}"#).unwrap();
    assert_eq!(rel.generates, ["primary-light"]);
    assert!(rel.affects.is_empty());
    assert!(rel.constraints.is_empty());
}

#[test]
fn apply_options_round_trip_as_bits() {
    let options = ApplyOptions::SKIP_CACHE | ApplyOptions::SKIP_CROSS_DOMAIN;
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(json, "9");
    assert_eq!(serde_json::from_str::<ApplyOptions>(&json).unwrap(), options);
    assert_eq!(ApplyOptions::from("skip-cache"), ApplyOptions::SKIP_CACHE);
}

#[test]
fn config_sections_fall_back_to_defaults() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"cache":{"capacity":8},"constraints":{"contrast_aa":5.0}}"#).unwrap();
    assert_eq!(config.cache.capacity, 8);
    assert_eq!(config.propagation.max_depth, 1);
    assert_eq!(config.constraints.contrast_aa, 5.0);
    assert_eq!(config.constraints.touch_target, 44.0);
    assert!(config.deadline.apply_timeout().is_none());
}

#[test]
fn config_clones_share_until_mutated() {
    let base = EngineConfig::default();
    let mut tuned = base.clone();
    tuned.propagation.max_depth = 3;
    assert_eq!(base.propagation.max_depth, 1);
    assert_eq!(tuned.propagation.max_depth, 3);
}

#[test]
fn dimension_values_serialize_as_css() {
    let value = TokenValue::Dimension(Dimension::rem(1.5));
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"type":"dimension","value":"1.5rem"}"#);
}
