//! Command handlers. Each returns the JSON document the binary prints.

use crate::args::ApplyArgs;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use tessera::Engine;
use tessera::kernel::prelude::{ApplyOptions, ChangeSet, TokenCategory, TokenValue};
use tracing::debug;

/// Parses `value` for `token`'s declared category, or guesses one for undeclared tokens.
///
/// # Errors
/// Fails when the text is not a valid literal.
pub fn parse_value(engine: &Engine, token: &str, value: &str) -> Result<TokenValue> {
    if let Some(spec) = engine.registries().catalog.get(token) {
        return TokenValue::parse(spec.category, value)
            .with_context(|| format!("'{value}' is not a valid {} for '{token}'", spec.category));
    }

    let guess = if value.trim_start().starts_with('#') {
        TokenCategory::Color
    } else if value.trim().parse::<f64>().is_ok() {
        TokenCategory::Number
    } else {
        TokenCategory::Dimension
    };
    debug!(token, category = %guess, "Undeclared token, category inferred");
    TokenValue::parse(guess, value).with_context(|| format!("cannot infer a value from '{value}'"))
}

/// Builds a change set from `key=value` pairs.
///
/// # Errors
/// Fails on a pair without `=` or an unparsable value.
pub fn parse_changes(engine: &Engine, pairs: &[String]) -> Result<ChangeSet> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) =
                pair.split_once('=').ok_or_else(|| anyhow!("expected KEY=VALUE, got '{pair}'"))?;
            let key = key.trim();
            if key.is_empty() {
                bail!("empty key in '{pair}'");
            }
            Ok((key.to_owned(), parse_value(engine, key, value)?))
        })
        .collect()
}

/// # Errors
/// Propagates parse and resolution errors.
pub fn resolve(engine: &Engine, token: &str, value: &str, strict: bool) -> Result<Value> {
    let value = parse_value(engine, token, value)?;
    let resolution =
        if strict { engine.resolve_strict(token, value)? } else { engine.resolve(token, value)? };
    Ok(serde_json::to_value(resolution)?)
}

/// # Errors
/// Propagates parse and customization errors.
pub async fn apply(engine: &Engine, args: &ApplyArgs) -> Result<Value> {
    let changes = parse_changes(engine, &args.changes)?;

    let mut options = ApplyOptions::empty();
    options.set(ApplyOptions::SKIP_CACHE, args.skip_cache);
    options.set(ApplyOptions::SKIP_CROSS_DOMAIN, args.no_propagation);
    options.set(ApplyOptions::SKIP_PREVIEW, args.skip_preview);
    options.set(ApplyOptions::SKIP_PERSIST, args.skip_persist);

    let result = engine.apply_customization(&args.domain, changes, options).await?;
    Ok(serde_json::to_value(result)?)
}

#[must_use]
pub fn domains(engine: &Engine) -> Value {
    let domains: Vec<Value> = engine
        .domains()
        .registry()
        .by_priority()
        .iter()
        .map(|domain| {
            json!({
                "name": domain.name(),
                "version": domain.version(),
                "priority": domain.priority(),
                "tokens": domain.tokens(),
                "dependencies": domain.dependencies(),
            })
        })
        .collect();
    Value::Array(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera::presets;

    fn engine() -> Engine {
        let engine = Engine::builder().build().unwrap();
        presets::install_design_system(&engine).unwrap();
        engine
    }

    #[test]
    fn values_follow_declared_categories() {
        let engine = engine();
        assert!(matches!(parse_value(&engine, "primary", "#1b365d").unwrap(), TokenValue::Color(_)));
        assert!(parse_value(&engine, "primary", "16px").is_err());
        assert_eq!(parse_value(&engine, "font-size-base", "1rem").unwrap().as_px(), Some(16.0));
    }

    #[test]
    fn undeclared_tokens_are_inferred() {
        let engine = engine();
        assert_eq!(parse_value(&engine, "ratio", "1.5").unwrap(), TokenValue::Number(1.5));
        assert!(matches!(parse_value(&engine, "gap", "12px").unwrap(), TokenValue::Dimension(_)));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        let engine = engine();
        assert!(parse_changes(&engine, &["primary".to_owned()]).is_err());
        assert!(parse_changes(&engine, &["=#fff".to_owned()]).is_err());
        let changes = parse_changes(&engine, &["primary=#fff".to_owned(), "spacing-unit=8px".to_owned()]).unwrap();
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn resolve_prints_updates() {
        let engine = engine();
        let out = resolve(&engine, "primary", "#1b365d", false).unwrap();
        let names: Vec<_> = out["updates"].as_array().unwrap().iter().map(|u| u["name"].clone()).collect();
        assert!(names.contains(&json!("primary-light")));
    }

    #[test]
    fn domains_are_listed_by_priority() {
        let engine = engine();
        engine
            .register_resolver_domain(tessera::domains::DomainConfig::new("motion", "0.1.0").priority(1), &[])
            .unwrap();
        let out = domains(&engine);
        let names: Vec<_> = out.as_array().unwrap().iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, [json!("motion"), json!("color"), json!("typography"), json!("component")]);
        assert_eq!(out[3]["priority"], 30);
        assert_eq!(out[3]["dependencies"], json!(["color", "typography"]));
        assert!(out[1]["tokens"].as_array().unwrap().contains(&json!("primary-light")));
    }

    #[tokio::test]
    async fn apply_without_propagation_touches_one_domain() {
        let engine = engine();
        let args = ApplyArgs {
            domain: "color".to_owned(),
            changes: vec!["primary=#1b365d".to_owned()],
            skip_cache: false,
            no_propagation: true,
            skip_preview: false,
            skip_persist: false,
        };
        let out = apply(&engine, &args).await.unwrap();
        assert_eq!(out["domains"].as_object().unwrap().len(), 1);
    }
}
