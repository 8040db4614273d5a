use tessera_constraints::color::contrast_ratio;
use tessera_constraints::{generators, install_defaults};
use tessera_model::constants::{CONTRAST_AA, TOUCH_TARGET, TYPOGRAPHY_READABILITY, VISUAL_RHYTHM};
use tessera_model::{
    ConstraintConfig, Dimension, Relationship, Rgb, Severity, TokenCategory, TokenRole, TokenSpec,
    TokenValue, UpdateOrigin,
};
use tessera_resolver::{Registries, Resolver, affect_fn};

fn registries() -> Registries {
    let registries = Registries::new();
    install_defaults(&ConstraintConfig::default(), &registries);
    registries
}

#[test]
fn white_text_on_white_background_is_corrected() {
    let registries = registries();
    registries.catalog.declare(TokenSpec::new("background", TokenCategory::Color, TokenRole::Background));
    registries.catalog.declare(TokenSpec::new("text", TokenCategory::Color, TokenRole::Text));
    // Copies the background onto the text so the pair starts at 1:1.
    registries.affect_rules.register(
        TokenRole::Text,
        TokenRole::Background,
        affect_fn(|base, _| Ok(base.value.clone())),
    );
    registries
        .relationships
        .register("background", Relationship::new("color").affects(["text"]).constraints([CONTRAST_AA]))
        .unwrap();

    let resolution =
        Resolver::new(registries).resolve("background", TokenValue::Color(Rgb::WHITE)).unwrap();

    assert!(!resolution.validation.valid);
    assert_eq!(resolution.validation.violations_of(CONTRAST_AA).count(), 1);
    assert_eq!(resolution.validation.corrections.len(), 1);

    let text = resolution.get("text").unwrap();
    assert!(text.constraint_corrected);
    assert_eq!(text.origin, UpdateOrigin::Affected { by: "background".to_owned() });
    assert!(contrast_ratio(Rgb::WHITE, text.value.as_color().unwrap()) >= 4.5);
}

#[test]
fn default_text_rule_already_satisfies_contrast() {
    let registries = registries();
    registries.catalog.declare(TokenSpec::new("background", TokenCategory::Color, TokenRole::Background));
    registries.catalog.declare(TokenSpec::new("text", TokenCategory::Color, TokenRole::Text));
    registries
        .relationships
        .register("background", Relationship::new("color").affects(["text"]).constraints([CONTRAST_AA]))
        .unwrap();

    let navy = TokenValue::Color(Rgb::from_hex("#1b365d").unwrap());
    let resolution = Resolver::new(registries).resolve("background", navy).unwrap();

    assert!(resolution.validation.valid);
    assert_eq!(resolution.value_of("text"), Some(&TokenValue::Color(Rgb::WHITE)));
}

#[test]
fn typography_scale_is_clamped_and_line_height_follows() {
    let registries = registries();
    registries.catalog.declare(TokenSpec::new("font-size-base", TokenCategory::Dimension, TokenRole::FontSize));
    registries.catalog.declare(TokenSpec::new("font-size-sm", TokenCategory::Dimension, TokenRole::FontSize));
    registries.catalog.declare(TokenSpec::new("line-height", TokenCategory::Number, TokenRole::LineHeight));
    registries.generators.register("font-size-sm", generators::scale(0.75));
    registries
        .relationships
        .register(
            "font-size-base",
            Relationship::new("typography")
                .generates(["font-size-sm"])
                .affects(["line-height"])
                .constraints([TYPOGRAPHY_READABILITY]),
        )
        .unwrap();

    let resolution = Resolver::new(registries)
        .resolve("font-size-base", TokenValue::Dimension(Dimension::px(16.0)))
        .unwrap();

    // 12px is under the 14px floor.
    assert!(!resolution.validation.valid);
    assert_eq!(resolution.value_of("font-size-sm").and_then(TokenValue::as_px), Some(14.0));
    assert_eq!(resolution.value_of("line-height"), Some(&TokenValue::Number(1.6)));
}

#[test]
fn spacing_drives_touch_target_and_rhythm() {
    let registries = registries();
    registries.catalog.declare(TokenSpec::new("spacing", TokenCategory::Dimension, TokenRole::Spacing));
    registries.catalog.declare(TokenSpec::new("spacing-lg", TokenCategory::Dimension, TokenRole::Spacing));
    registries.catalog.declare(TokenSpec::new("button-size", TokenCategory::Dimension, TokenRole::InteractiveSize));
    registries.generators.register("spacing-lg", generators::scale(1.8));
    registries
        .relationships
        .register(
            "spacing",
            Relationship::new("component")
                .generates(["spacing-lg"])
                .affects(["button-size"])
                .constraints([TOUCH_TARGET, VISUAL_RHYTHM]),
        )
        .unwrap();

    let resolution =
        Resolver::new(registries).resolve("spacing", TokenValue::Dimension(Dimension::px(8.0))).unwrap();

    // 8px × 2.75 = 22px, raised to 44px.
    assert_eq!(resolution.value_of("button-size").and_then(TokenValue::as_px), Some(44.0));
    // 1.8 snaps to 2.
    assert_eq!(resolution.value_of("spacing-lg").and_then(TokenValue::as_px), Some(16.0));
    let rhythm: Vec<_> = resolution.validation.violations_of(VISUAL_RHYTHM).collect();
    assert_eq!(rhythm.len(), 1);
    assert_eq!(rhythm[0].severity, Severity::Warning);
}
