//! # Resolution Core
//!
//! Given a changed token, derives everything that depends on it in three
//! strictly ordered stages:
//!
//! 1. **Generation**: each `generates` target gets `generator(base)`.
//! 2. **Affecting**: each `affects` target is recomputed by the rule registered
//!    for its `(role, base role)` pair.
//! 3. **Validation**: each constraint runs against the base and the records
//!    accumulated so far; proposed corrections patch matching records in place.
//!
//! Individual generators, rules and validators are isolated: an error or a
//! panic becomes an [`ItemFailure`] on the result and the pass continues.

use crate::error::ResolverError;
use crate::registry::Registries;
use crate::rule_error::RuleError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tessera_model::{
    FailureStage, ItemFailure, Provenance, Relationship, Resolution, Token, TokenUpdate,
    TokenValue, UpdateOrigin, ValidationResult,
};
use tracing::{debug, error, trace, warn};

/// Stateless entry point over a set of shared registries.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    registries: Registries,
}

impl Resolver {
    #[must_use]
    pub const fn new(registries: Registries) -> Self {
        Self { registries }
    }

    #[must_use]
    pub const fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Resolves a change of `token` to `value`.
    ///
    /// No relationship is not an error: the result is simply empty. A panic in the
    /// orchestration itself yields an empty result whose validation is a `system-error`.
    ///
    /// # Errors
    /// Returns [`ResolverError::CircularDependency`] when `token` can reach itself
    /// through the dependency graph; nothing is resolved in that case.
    pub fn resolve(&self, token: &str, value: TokenValue) -> Result<Resolution, ResolverError> {
        let relationships = &self.registries.relationships;

        if let Some(path) = relationships.graph().find_cycle(token) {
            warn!(token, path = %path.join(" -> "), "Circular dependency detected, resolution aborted");
            return Err(ResolverError::CircularDependency {
                token: token.to_owned(),
                path,
                context: None,
            });
        }

        let Some(relationship) = relationships.get(token) else {
            debug!(token, "No relationship registered");
            return Ok(Resolution::empty(token));
        };

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(token, value, &relationship)));

        Ok(match outcome {
            Ok(resolution) => {
                debug!(
                    token,
                    updates = resolution.updates.len(),
                    failures = resolution.failures.len(),
                    valid = resolution.validation.valid,
                    "Token resolved"
                );
                resolution
            },
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(token, %message, "Resolution orchestration panicked");
                Resolution {
                    validation: ValidationResult::system_error(message),
                    ..Resolution::empty(token)
                }
            },
        })
    }

    fn run_pipeline(&self, token: &str, value: TokenValue, relationship: &Relationship) -> Resolution {
        let base = Token {
            name: token.to_owned(),
            role: self.registries.catalog.role_of(token),
            domain: (!relationship.domain.is_empty()).then(|| relationship.domain.clone()),
            provenance: Provenance::Direct,
            value,
        };

        let mut pass = Pass { resolution: Resolution::empty(token) };
        self.generate(&base, relationship, &mut pass);
        self.affect(&base, relationship, &mut pass);
        self.validate(&base, relationship, &mut pass);
        pass.resolution
    }

    fn generate(&self, base: &Token, relationship: &Relationship, pass: &mut Pass) {
        for target in &relationship.generates {
            let Some(generator) = self.registries.generators.get(target) else {
                debug!(token = %base.name, target = %target, "No generator registered, skipping");
                continue;
            };

            let outcome = isolate(|| {
                RuleError::expect_category(generator.input(), base.category())?;
                let value = generator.generate(&base.value)?;
                RuleError::expect_category(generator.output(), value.category())?;
                Ok(value)
            });

            match outcome {
                Ok(value) => pass.push(
                    target,
                    value,
                    self.registries.catalog.css_variable(target),
                    UpdateOrigin::Generated { from: base.name.clone() },
                ),
                Err(message) => pass.fail(FailureStage::Generation, target, message),
            }
        }
    }

    fn affect(&self, base: &Token, relationship: &Relationship, pass: &mut Pass) {
        let catalog = &self.registries.catalog;

        for target in &relationship.affects {
            let declared = catalog.contains(target);
            let spec = catalog.spec_or(target, base.category());

            let Some(rule) = self.registries.affect_rules.get(spec.role, base.role) else {
                debug!(
                    token = %base.name,
                    target = %target,
                    role = %spec.role,
                    base_role = %base.role,
                    "No affect rule for role pair, skipping"
                );
                continue;
            };

            let outcome = isolate(|| {
                let value = rule.compute(base, &spec)?;
                if declared {
                    RuleError::expect_category(spec.category, value.category())?;
                }
                Ok(value)
            });

            match outcome {
                Ok(value) => pass.push(
                    target,
                    value,
                    spec.css_variable().into_owned(),
                    UpdateOrigin::Affected { by: base.name.clone() },
                ),
                Err(message) => pass.fail(FailureStage::Affecting, target, message),
            }
        }
    }

    fn validate(&self, base: &Token, relationship: &Relationship, pass: &mut Pass) {
        for constraint in &relationship.constraints {
            let Some(validator) = self.registries.validators.get(constraint) else {
                pass.fail(FailureStage::Validation, constraint, "no validator registered".to_owned());
                continue;
            };

            if let Some(category) = validator.category()
                && category != base.category()
            {
                debug!(
                    token = %base.name,
                    constraint = %constraint,
                    expected = %category,
                    actual = %base.category(),
                    "Validator does not apply to base category, skipping"
                );
                continue;
            }

            let candidates = self.candidates(base, pass);
            let result = match isolate(|| validator.validate(base, &candidates)) {
                Ok(result) => result,
                Err(message) => {
                    pass.fail(FailureStage::Validation, constraint, message);
                    continue;
                },
            };

            trace!(
                token = %base.name,
                constraint = %constraint,
                valid = result.valid,
                violations = result.violations.len(),
                corrections = result.corrections.len(),
                "Constraint evaluated"
            );

            if !pass.apply_corrections(constraint, &result) {
                pass.resolution.validation.merge(result);
                let message = format!("correction from `{constraint}` changes a token's category");
                pass.resolution.validation.merge(ValidationResult::system_error(message));
                return;
            }
            pass.resolution.validation.merge(result);
        }
    }

    /// Current records as tokens, in resolution order.
    fn candidates(&self, base: &Token, pass: &Pass) -> Vec<Token> {
        pass.resolution
            .updates
            .iter()
            .map(|update| Token {
                name: update.name.clone(),
                value: update.value.clone(),
                role: self.registries.catalog.role_of(&update.name),
                domain: base.domain.clone(),
                provenance: match &update.origin {
                    UpdateOrigin::Direct => Provenance::Direct,
                    UpdateOrigin::Generated { from } => Provenance::GeneratedFrom(from.clone()),
                    UpdateOrigin::Affected { by } => Provenance::AffectedBy(by.clone()),
                },
            })
            .collect()
    }
}

/// Accumulator for one resolution pass.
struct Pass {
    resolution: Resolution,
}

impl Pass {
    fn push(&mut self, name: &str, value: TokenValue, css_variable: String, origin: UpdateOrigin) {
        trace!(token = name, value = %value, "Record appended");
        self.resolution.updates.push(TokenUpdate {
            name: name.to_owned(),
            value,
            css_variable,
            origin,
            constraint_corrected: false,
        });
    }

    fn fail(&mut self, stage: FailureStage, subject: &str, message: String) {
        warn!(token = %self.resolution.token, %stage, subject, %message, "Isolated failure");
        self.resolution.failures.push(ItemFailure::new(stage, subject, message));
    }

    /// Applies advisory corrections in order. Returns `false` at the first one
    /// that would change a record's category; later corrections are dropped.
    fn apply_corrections(&mut self, constraint: &str, result: &ValidationResult) -> bool {
        for correction in &result.corrections {
            let Some(update) = self.resolution.updates.iter_mut().find(|u| u.name == correction.token)
            else {
                trace!(constraint, target = %correction.token, "Correction targets no record, ignored");
                continue;
            };

            if update.value.category() != correction.value.category() {
                let message = format!(
                    "`{}` is {} but the correction is {}",
                    correction.token,
                    update.value.category(),
                    correction.value.category()
                );
                self.fail(FailureStage::Correction, constraint, message);
                return false;
            }

            update.value = correction.value.clone();
            update.constraint_corrected = true;
        }
        true
    }
}

/// Runs one pluggable item, turning errors and panics into messages.
fn isolate<T>(f: impl FnOnce() -> Result<T, RuleError>) -> Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
