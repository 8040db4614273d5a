//! Ready-made token sets.

use crate::engine::Engine;
use crate::error::EngineError;
use tessera_constraints::generators;
use tessera_domains::DomainConfig;
use tessera_model::constants::{
    COLOR_DOMAIN, COLOR_HARMONY, COMPONENT_DOMAIN, CONTRAST_AA, TOUCH_TARGET, TYPOGRAPHY_DOMAIN,
    TYPOGRAPHY_READABILITY, VISUAL_RHYTHM,
};
use tessera_model::{Relationship, TokenCategory, TokenRole, TokenSpec};

const VERSION: &str = "1.0.0";

/// Declares the colour → typography → component design system.
///
/// | Domain | Inputs | Derived |
/// |---|---|---|
/// | `color` | `primary`, `background` | `primary-light`, `primary-dark`, `on-primary`, `text` |
/// | `typography` | `color.primary` → `text-color`, `font-size-base` | `text-color-muted`, `font-size-sm`, `font-size-lg`, `line-height` |
/// | `component` | `color.primary` → `button-background`, `spacing-unit` | `button-background-hover`, `button-text`, `button-size`, `spacing-lg` |
///
/// # Errors
/// Fails if any of the domains is already registered with conflicting dependencies.
pub fn install_design_system(engine: &Engine) -> Result<(), EngineError> {
    declare_tokens(engine);
    install_generators(engine);

    engine.register_relationship(
        "primary",
        Relationship::new(COLOR_DOMAIN)
            .generates(["primary-light", "primary-dark"])
            .affects(["on-primary"])
            .constraints([CONTRAST_AA, COLOR_HARMONY]),
    )?;
    engine.register_relationship(
        "background",
        Relationship::new(COLOR_DOMAIN).affects(["text"]).constraints([CONTRAST_AA]),
    )?;
    engine.register_relationship(
        "text-color",
        Relationship::new(TYPOGRAPHY_DOMAIN).generates(["text-color-muted"]),
    )?;
    engine.register_relationship(
        "font-size-base",
        Relationship::new(TYPOGRAPHY_DOMAIN)
            .generates(["font-size-sm", "font-size-lg"])
            .affects(["line-height"])
            .constraints([TYPOGRAPHY_READABILITY]),
    )?;
    engine.register_relationship(
        "button-background",
        Relationship::new(COMPONENT_DOMAIN)
            .generates(["button-background-hover"])
            .affects(["button-text"])
            .constraints([CONTRAST_AA]),
    )?;
    engine.register_relationship(
        "spacing-unit",
        Relationship::new(COMPONENT_DOMAIN)
            .generates(["spacing-lg"])
            .affects(["button-size"])
            .constraints([TOUCH_TARGET, VISUAL_RHYTHM]),
    )?;

    engine.register_resolver_domain(
        DomainConfig::new(COLOR_DOMAIN, VERSION)
            .priority(10)
            .tokens(["primary", "primary-light", "primary-dark", "on-primary", "background", "text"]),
        &[],
    )?;
    engine.register_resolver_domain(
        DomainConfig::new(TYPOGRAPHY_DOMAIN, VERSION).depends_on([COLOR_DOMAIN]).priority(20).tokens([
            "text-color",
            "text-color-muted",
            "font-size-base",
            "font-size-sm",
            "font-size-lg",
            "line-height",
        ]),
        &[("color.primary", "text-color")],
    )?;
    engine.register_resolver_domain(
        DomainConfig::new(COMPONENT_DOMAIN, VERSION)
            .depends_on([COLOR_DOMAIN, TYPOGRAPHY_DOMAIN])
            .priority(30)
            .tokens([
                "button-background",
                "button-background-hover",
                "button-text",
                "button-font-size",
                "spacing-unit",
                "spacing-lg",
                "button-size",
            ]),
        &[("color.primary", "button-background"), ("typography.font-size-base", "button-font-size")],
    )?;
    Ok(())
}

fn declare_tokens(engine: &Engine) {
    use TokenCategory::{Color, Dimension, Number};
    use TokenRole::{
        Accent, Background, FontSize, InteractiveSize, LineHeight, Spacing, Surface, Text,
    };

    let tokens = [
        ("primary", Color, Accent),
        ("primary-light", Color, Accent),
        ("primary-dark", Color, Accent),
        ("on-primary", Color, Text),
        ("background", Color, Background),
        ("text", Color, Text),
        ("text-color", Color, Text),
        ("text-color-muted", Color, Text),
        ("font-size-base", Dimension, FontSize),
        ("font-size-sm", Dimension, FontSize),
        ("font-size-lg", Dimension, FontSize),
        ("line-height", Number, LineHeight),
        ("button-background", Color, Background),
        ("button-background-hover", Color, Surface),
        ("button-text", Color, Text),
        ("button-font-size", Dimension, FontSize),
        ("spacing-unit", Dimension, Spacing),
        ("spacing-lg", Dimension, Spacing),
        ("button-size", Dimension, InteractiveSize),
    ];
    for (name, category, role) in tokens {
        engine.declare_token(TokenSpec::new(name, category, role));
    }
}

fn install_generators(engine: &Engine) {
    engine.register_generator("primary-light", generators::lighten(0.2));
    engine.register_generator("primary-dark", generators::darken(0.15));
    engine.register_generator("text-color-muted", generators::alpha(0.7));
    engine.register_generator("font-size-sm", generators::scale(0.875));
    engine.register_generator("font-size-lg", generators::scale(1.25));
    engine.register_generator("button-background-hover", generators::darken(0.08));
    engine.register_generator("spacing-lg", generators::scale(2.0));
}
