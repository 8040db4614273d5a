use std::borrow::Cow;
use tessera_model::TokenCategory;

/// Failure reported by a single generator, affect rule or validator.
///
/// The resolver never propagates these; it records them as item failures and
/// carries on with the rest of the pass.
#[tessera_derive::tessera_error]
pub enum RuleError {
    #[error("Category mismatch{}: expected {expected}, got {actual}", format_context(.context))]
    CategoryMismatch {
        expected: TokenCategory,
        actual: TokenCategory,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid value{}: {message}", format_context(.context))]
    InvalidValue { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rule error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RuleError {
    /// Fails unless `actual` is `expected`.
    ///
    /// # Errors
    /// Returns [`RuleError::CategoryMismatch`] when the categories differ.
    pub fn expect_category(expected: TokenCategory, actual: TokenCategory) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::CategoryMismatch { expected, actual, context: None })
        }
    }
}
