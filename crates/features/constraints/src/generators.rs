//! Built-in generators. Register them under the token they produce:
//!
//! ```rust
//! use tessera_constraints::generators;
//! use tessera_resolver::GeneratorRegistry;
//!
//! let registry = GeneratorRegistry::new();
//! registry.register("primary-light", generators::lighten(0.2));
//! registry.register("font-size-lg", generators::scale(1.25));
//! ```

use crate::color;
use tessera_model::{TokenCategory, TokenValue};
use tessera_resolver::generator::FnGenerator;
use tessera_resolver::{RuleError, generator_fn};

type ValueFn = Box<dyn Fn(&TokenValue) -> Result<TokenValue, RuleError> + Send + Sync>;

/// Colour generator produced by this module.
pub type BoxedGenerator = FnGenerator<ValueFn>;

fn boxed(
    input: TokenCategory,
    output: TokenCategory,
    f: impl Fn(&TokenValue) -> Result<TokenValue, RuleError> + Send + Sync + 'static,
) -> BoxedGenerator {
    generator_fn(input, output, Box::new(f) as ValueFn)
}

fn expect_color(value: &TokenValue) -> Result<tessera_model::Rgb, RuleError> {
    value.as_color().ok_or(RuleError::CategoryMismatch {
        expected: TokenCategory::Color,
        actual: value.category(),
        context: None,
    })
}

/// Colour with HSL lightness raised by `amount`.
#[must_use]
pub fn lighten(amount: f64) -> BoxedGenerator {
    boxed(TokenCategory::Color, TokenCategory::Color, move |base| {
        Ok(TokenValue::Color(color::lighten(expect_color(base)?, amount)))
    })
}

/// Colour with HSL lightness lowered by `amount`.
#[must_use]
pub fn darken(amount: f64) -> BoxedGenerator {
    boxed(TokenCategory::Color, TokenCategory::Color, move |base| {
        Ok(TokenValue::Color(color::darken(expect_color(base)?, amount)))
    })
}

/// Dimension multiplied by `factor`, keeping its unit.
#[must_use]
pub fn scale(factor: f64) -> BoxedGenerator {
    boxed(TokenCategory::Dimension, TokenCategory::Dimension, move |base| {
        let dimension = base.as_dimension().ok_or(RuleError::CategoryMismatch {
            expected: TokenCategory::Dimension,
            actual: base.category(),
            context: None,
        })?;
        Ok(TokenValue::Dimension(dimension.scaled(factor)))
    })
}

/// CSS `box-shadow` tinted with the base colour at `alpha`.
#[must_use]
pub fn shadow(alpha: f64) -> BoxedGenerator {
    boxed(TokenCategory::Color, TokenCategory::Shadow, move |base| {
        let rgb = expect_color(base)?;
        let alpha = (alpha.clamp(0.0, 1.0) * 100.0).round() / 100.0;
        Ok(TokenValue::Shadow(format!("0 1px 3px rgba({}, {}, {}, {alpha})", rgb.r, rgb.g, rgb.b)))
    })
}

/// Base colour composited at `opacity` over white.
#[must_use]
pub fn alpha(opacity: f64) -> BoxedGenerator {
    boxed(TokenCategory::Color, TokenCategory::Color, move |base| {
        let rgb = expect_color(base)?;
        Ok(TokenValue::Color(color::mix(tessera_model::Rgb::WHITE, rgb, opacity)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::{Dimension, Rgb};
    use tessera_resolver::Generator;

    #[test]
    fn declared_categories_match_outputs() {
        let navy = TokenValue::Color(Rgb::new(0x1b, 0x36, 0x5d));
        for generator in [lighten(0.2), darken(0.1), alpha(0.5)] {
            assert_eq!(generator.generate(&navy).unwrap().category(), generator.output());
        }
        assert_eq!(shadow(0.2).generate(&navy).unwrap().category(), TokenCategory::Shadow);
    }

    #[test]
    fn scale_keeps_unit() {
        let out = scale(1.25).generate(&TokenValue::Dimension(Dimension::rem(1.0))).unwrap();
        assert_eq!(out, TokenValue::Dimension(Dimension::rem(1.25)));
    }

    #[test]
    fn wrong_input_is_an_error() {
        assert!(lighten(0.1).generate(&TokenValue::Number(1.0)).is_err());
        assert!(scale(2.0).generate(&TokenValue::Color(Rgb::WHITE)).is_err());
    }

    #[test]
    fn shadow_and_alpha_render() {
        let red = TokenValue::Color(Rgb::new(255, 0, 0));
        assert_eq!(shadow(0.25).generate(&red).unwrap(), TokenValue::Shadow("0 1px 3px rgba(255, 0, 0, 0.25)".to_owned()));
        assert_eq!(alpha(0.0).generate(&red).unwrap(), TokenValue::Color(Rgb::WHITE));
        assert_eq!(alpha(1.0).generate(&red).unwrap(), red);
    }
}
