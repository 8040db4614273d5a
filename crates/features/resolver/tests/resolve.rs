use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tessera_model::{
    Correction, Dimension, FailureStage, Relationship, Rgb, Severity, Token, TokenCategory,
    TokenRole, TokenSpec, TokenValue, ValidationResult, Violation,
};
use tessera_resolver::*;

fn invert(base: &TokenValue) -> Result<TokenValue, RuleError> {
    let rgb = base.as_color().ok_or("not a colour")?;
    Ok(TokenValue::Color(Rgb::new(255 - rgb.r, 255 - rgb.g, 255 - rgb.b)))
}

fn color(hex: &str) -> TokenValue {
    TokenValue::Color(Rgb::from_hex(hex).unwrap())
}

fn resolver_with(setup: impl FnOnce(&Registries)) -> Resolver {
    let registries = Registries::new();
    setup(&registries);
    Resolver::new(registries)
}

#[test]
fn missing_relationship_yields_empty_result() {
    let resolver = Resolver::default();
    let resolution = resolver.resolve("primary", color("#123456")).unwrap();
    assert!(resolution.is_empty());
    assert!(resolution.failures.is_empty());
    assert!(resolution.validation.valid);
}

#[test]
fn cycle_between_two_tokens_aborts() {
    let resolver = resolver_with(|r| {
        r.relationships.register("a", Relationship::new("x").generates(["b"])).unwrap();
        r.relationships.register("b", Relationship::new("x").generates(["a"])).unwrap();
    });

    let err = resolver.resolve("a", TokenValue::Number(1.0)).unwrap_err();
    assert_eq!(err.kind(), "circular-dependency");
    let ResolverError::CircularDependency { token, path, .. } = err else { unreachable!() };
    assert_eq!(token, "a");
    assert_eq!(path, ["a", "b", "a"]);
}

#[test]
fn generated_records_follow_declaration_order() {
    let resolver = resolver_with(|r| {
        r.catalog.declare(
            TokenSpec::new("primary-inverse", TokenCategory::Color, TokenRole::Accent)
                .with_css_variable("--brand-inverse"),
        );
        r.generators.register("primary-inverse", generator_fn(TokenCategory::Color, TokenCategory::Color, invert));
        r.generators.register(
            "primary-copy",
            generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())),
        );
        r.relationships
            .register(
                "primary",
                Relationship::new("color").generates(["primary-inverse", "unregistered", "primary-copy"]),
            )
            .unwrap();
    });

    let resolution = resolver.resolve("primary", color("#000000")).unwrap();
    let names: Vec<_> = resolution.updates.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["primary-inverse", "primary-copy"]);

    let inverse = resolution.get("primary-inverse").unwrap();
    assert_eq!(inverse.value, color("#ffffff"));
    assert_eq!(inverse.css_variable, "--brand-inverse");
    assert_eq!(inverse.generated_from(), Some("primary"));
    assert!(!inverse.constraint_corrected);
    assert_eq!(resolution.get("primary-copy").unwrap().css_variable, "--primary-copy");
    assert!(resolution.failures.is_empty(), "missing generators are skipped silently");
}

#[test]
fn failing_and_panicking_generators_are_isolated() {
    let resolver = resolver_with(|r| {
        r.generators.register(
            "broken",
            generator_fn(TokenCategory::Color, TokenCategory::Color, |_| Err("bad input".into())),
        );
        r.generators.register(
            "explodes",
            generator_fn(TokenCategory::Color, TokenCategory::Color, |_| panic!("kaboom")),
        );
        r.generators.register(
            "wrong-input",
            generator_fn(TokenCategory::Dimension, TokenCategory::Dimension, |v| Ok(v.clone())),
        );
        r.generators.register(
            "wrong-output",
            generator_fn(TokenCategory::Color, TokenCategory::Color, |_| Ok(TokenValue::Number(1.0))),
        );
        r.generators.register("fine", generator_fn(TokenCategory::Color, TokenCategory::Color, invert));
        r.relationships
            .register(
                "primary",
                Relationship::new("color")
                    .generates(["broken", "explodes", "wrong-input", "wrong-output", "fine"]),
            )
            .unwrap();
    });

    let resolution = resolver.resolve("primary", color("#ffffff")).unwrap();
    assert_eq!(resolution.updates.len(), 1);
    assert_eq!(resolution.value_of("fine"), Some(&color("#000000")));

    let failed: Vec<_> = resolution.failures.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(failed, ["broken", "explodes", "wrong-input", "wrong-output"]);
    assert!(resolution.failures.iter().all(|f| f.stage == FailureStage::Generation));
    assert!(resolution.failures[1].message.contains("kaboom"));
    assert!(resolution.failures[2].message.contains("expected dimension"));
}

#[test]
fn affect_rules_dispatch_on_roles() {
    let resolver = resolver_with(|r| {
        r.catalog.declare(TokenSpec::new("surface", TokenCategory::Color, TokenRole::Background));
        r.catalog.declare(TokenSpec::new("on-surface", TokenCategory::Color, TokenRole::Text));
        r.catalog.declare(TokenSpec::new("outline", TokenCategory::Color, TokenRole::Border));
        r.affect_rules.register(
            TokenRole::Text,
            TokenRole::Background,
            affect_fn(|base: &Token, _: &TokenSpec| invert(&base.value)),
        );
        r.relationships
            .register("surface", Relationship::new("color").affects(["on-surface", "outline"]))
            .unwrap();
    });

    let resolution = resolver.resolve("surface", color("#ffffff")).unwrap();
    assert_eq!(resolution.updates.len(), 1, "no rule for (border, background)");
    let text = resolution.get("on-surface").unwrap();
    assert_eq!(text.value, color("#000000"));
    assert_eq!(text.affected_by(), Some("surface"));
}

#[test]
fn validator_sees_generated_and_affected_records_and_corrects_them() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_validator = Arc::clone(&seen);

    let resolver = resolver_with(|r| {
        r.catalog.declare(TokenSpec::new("bg", TokenCategory::Color, TokenRole::Background));
        r.catalog.declare(TokenSpec::new("fg", TokenCategory::Color, TokenRole::Text));
        r.generators.register("bg-copy", generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())));
        r.affect_rules.register(
            TokenRole::Text,
            TokenRole::Background,
            affect_fn(|base: &Token, _: &TokenSpec| Ok(base.value.clone())),
        );
        r.validators.register(
            "never-equal",
            validator_fn(Some(TokenCategory::Color), move |base: &Token, candidates: &[Token]| {
                seen_in_validator.store(candidates.len(), Ordering::SeqCst);
                let mut result = ValidationResult::passed();
                for candidate in candidates.iter().filter(|c| c.role == TokenRole::Text) {
                    if candidate.value == base.value {
                        result.push(
                            Violation::new("never-equal", Some(candidate.name.as_str()), "same as base", Severity::Error),
                            Some(Correction::new(&candidate.name, invert(&base.value)?, "inverted")),
                        );
                    }
                }
                result.corrections.push(Correction::new("ghost", color("#123456"), "not a candidate"));
                Ok(result)
            }),
        );
        r.relationships
            .register(
                "bg",
                Relationship::new("color").generates(["bg-copy"]).affects(["fg"]).constraints(["never-equal"]),
            )
            .unwrap();
    });

    let resolution = resolver.resolve("bg", color("#ffffff")).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2, "validation runs after generation and affecting");
    assert!(!resolution.validation.valid);
    assert_eq!(resolution.validation.violations.len(), 1);

    let fg = resolution.get("fg").unwrap();
    assert_eq!(fg.value, color("#000000"));
    assert!(fg.constraint_corrected);
    assert!(!resolution.get("bg-copy").unwrap().constraint_corrected);
    assert!(resolution.get("ghost").is_none(), "corrections cannot invent records");
}

#[test]
fn missing_and_failing_validators_are_recorded() {
    let resolver = resolver_with(|r| {
        r.generators.register("copy", generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())));
        r.validators.register("panics", validator_fn(None, |_: &Token, _: &[Token]| panic!("validator bug")));
        r.validators.register(
            "dimension-only",
            validator_fn(Some(TokenCategory::Dimension), |_: &Token, _: &[Token]| {
                Ok(ValidationResult::system_error("must not run"))
            }),
        );
        r.relationships
            .register(
                "primary",
                Relationship::new("color").generates(["copy"]).constraints(["unknown", "panics", "dimension-only"]),
            )
            .unwrap();
    });

    let resolution = resolver.resolve("primary", color("#336699")).unwrap();
    assert_eq!(resolution.updates.len(), 1);
    assert!(resolution.validation.valid, "skipped validators do not invalidate");

    let failed: Vec<_> = resolution.failures.iter().map(|f| (f.stage, f.subject.as_str())).collect();
    assert_eq!(failed, [(FailureStage::Validation, "unknown"), (FailureStage::Validation, "panics")]);
}

#[test]
fn category_changing_correction_downgrades_to_system_error() {
    let resolver = resolver_with(|r| {
        r.generators.register("a", generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())));
        r.generators.register("b", generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())));
        r.validators.register(
            "confused",
            validator_fn(None, |_: &Token, _: &[Token]| {
                let mut result = ValidationResult::passed();
                result.corrections.push(Correction::new("a", color("#000000"), "fine"));
                result.corrections.push(Correction::new("b", TokenValue::Dimension(Dimension::px(4.0)), "wrong"));
                Ok(result)
            }),
        );
        r.validators.register(
            "after",
            validator_fn(None, |_: &Token, _: &[Token]| {
                let mut result = ValidationResult::passed();
                result.corrections.push(Correction::new("b", color("#000000"), "never applied"));
                Ok(result)
            }),
        );
        r.relationships
            .register("base", Relationship::new("x").generates(["a", "b"]).constraints(["confused", "after"]))
            .unwrap();
    });

    let resolution = resolver.resolve("base", color("#ffffff")).unwrap();
    assert!(!resolution.validation.valid);
    assert!(resolution.validation.is_system_error());
    assert_eq!(resolution.updates.len(), 2, "partial updates are still returned");
    assert!(resolution.get("a").unwrap().constraint_corrected);
    assert_eq!(resolution.value_of("b"), Some(&color("#ffffff")));
    assert!(resolution.failures.iter().any(|f| f.stage == FailureStage::Correction));
}

#[test]
fn orchestration_panic_becomes_system_error() {
    struct Faulty;

    impl ConstraintValidator for Faulty {
        fn category(&self) -> Option<TokenCategory> {
            panic!("category lookup failed")
        }

        fn validate(&self, _: &Token, _: &[Token]) -> Result<ValidationResult, RuleError> {
            Ok(ValidationResult::passed())
        }
    }

    let resolver = resolver_with(|r| {
        r.generators.register("copy", generator_fn(TokenCategory::Color, TokenCategory::Color, |v| Ok(v.clone())));
        r.validators.register("faulty", Faulty);
        r.relationships
            .register("base", Relationship::new("x").generates(["copy"]).constraints(["faulty"]))
            .unwrap();
    });

    let resolution = resolver.resolve("base", color("#ffffff")).unwrap();
    assert!(resolution.is_empty());
    assert!(!resolution.validation.valid);
    assert_eq!(resolution.validation.violations[0].constraint, "system-error");
    assert_eq!(resolution.validation.violations[0].severity, Severity::Error);
}

#[test]
fn last_generator_registration_wins() {
    let resolver = resolver_with(|r| {
        r.generators.register("out", generator_fn(TokenCategory::Number, TokenCategory::Number, |_| Ok(TokenValue::Number(1.0))));
        r.generators.register("out", generator_fn(TokenCategory::Number, TokenCategory::Number, |_| Ok(TokenValue::Number(2.0))));
        r.relationships.register("in", Relationship::new("x").generates(["out"])).unwrap();
    });

    let resolution = resolver.resolve("in", TokenValue::Number(0.0)).unwrap();
    assert_eq!(resolution.value_of("out"), Some(&TokenValue::Number(2.0)));
}

proptest! {
    #[test]
    fn generated_value_equals_generator_output(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let resolver = resolver_with(|reg| {
            reg.generators.register("inverse", generator_fn(TokenCategory::Color, TokenCategory::Color, invert));
            reg.relationships.register("base", Relationship::new("x").generates(["inverse"])).unwrap();
        });

        let value = TokenValue::Color(Rgb::new(r, g, b));
        let resolution = resolver.resolve("base", value.clone()).unwrap();
        prop_assert_eq!(resolution.value_of("inverse"), Some(&invert(&value).unwrap()));
    }

    #[test]
    fn cyclic_rings_always_terminate(len in 2usize..40, start in 0usize..40) {
        let resolver = resolver_with(|reg| {
            for i in 0..len {
                let next = format!("t{}", (i + 1) % len);
                reg.relationships.register(&format!("t{i}"), Relationship::new("x").generates([next])).unwrap();
            }
        });

        let token = format!("t{}", start % len);
        let err = resolver.resolve(&token, TokenValue::Number(1.0)).unwrap_err();
        let ResolverError::CircularDependency { path, .. } = err else { unreachable!() };
        prop_assert_eq!(path.len(), len + 1);
    }
}
