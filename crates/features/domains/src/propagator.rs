//! Iterative cross-domain propagation.
//!
//! A FIFO queue of applied domains is drained hop by hop. A visited set,
//! seeded with the source, guarantees that every domain is applied at most
//! once per pass, so domain-level cycles terminate regardless of depth.

use crate::domain::Domain;
use crate::registry::DomainRegistry;
use crate::rules::{ForwardSemantic, PropagationRule, PropagationRules};
use fxhash::FxHashSet;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tessera_model::config::PropagationConfig;
use tessera_model::{ApplyOptions, ChangeSet, DomainOutput, DomainResult};
use tracing::{trace, warn};

/// How far one `apply_customization` call reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationPolicy {
    /// Dependency hops walked from the source. `0` disables propagation.
    pub max_depth: usize,
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        Self { max_depth: 1 }
    }
}

impl From<&PropagationConfig> for PropagationPolicy {
    fn from(config: &PropagationConfig) -> Self {
        Self { max_depth: config.max_depth }
    }
}

/// Dependents applied during one pass, plus those that were reached but failed.
#[derive(Debug, Default)]
pub struct Propagation {
    pub applied: BTreeMap<String, DomainResult>,
    pub skipped: BTreeMap<String, String>,
}

struct Step {
    domain: String,
    changes: ChangeSet,
    output: Arc<DomainOutput>,
    depth: usize,
}

#[derive(Debug)]
pub struct Propagator<'a> {
    pub registry: &'a DomainRegistry,
    pub rules: &'a PropagationRules,
    pub policy: PropagationPolicy,
    pub deadline: Option<Duration>,
}

impl Propagator<'_> {
    /// Walks the dependents of `source` after it produced `output` from `changes`.
    pub async fn run(
        &self,
        source: &Domain,
        changes: ChangeSet,
        output: Arc<DomainOutput>,
        options: ApplyOptions,
    ) -> Propagation {
        let nested = options | ApplyOptions::SKIP_CROSS_DOMAIN;
        let mut propagation = Propagation::default();
        let mut visited = FxHashSet::default();
        visited.insert(source.name().to_owned());

        let mut queue = VecDeque::from([Step { domain: source.name().to_owned(), changes, output, depth: 0 }]);

        while let Some(step) = queue.pop_front() {
            if step.depth >= self.policy.max_depth {
                trace!(domain = %step.domain, depth = step.depth, "Depth limit reached");
                continue;
            }

            for target in self.registry.dependents_of(&step.domain) {
                let name = target.name();
                if visited.contains(name) {
                    trace!(source = %step.domain, target = name, "Already applied in this pass");
                    continue;
                }

                let rule: Arc<dyn PropagationRule> =
                    self.rules.get(&step.domain, name).unwrap_or_else(|| Arc::new(ForwardSemantic));
                let derived = match rule.derive(&step.domain, &step.changes, &step.output) {
                    Ok(derived) => derived,
                    Err(err) => {
                        warn!(source = %step.domain, target = name, error = %err, "Propagation rule failed");
                        visited.insert(name.to_owned());
                        propagation.skipped.insert(name.to_owned(), err.to_string());
                        continue;
                    },
                };
                if derived.is_empty() {
                    trace!(source = %step.domain, target = name, "Empty change set, target skipped");
                    continue;
                }

                visited.insert(name.to_owned());
                trace!(source = %step.domain, target = name, keys = derived.len(), depth = step.depth + 1, "Propagating");

                match target.apply(&derived, nested, self.deadline).await {
                    Ok(result) => {
                        queue.push_back(Step {
                            domain: name.to_owned(),
                            changes: derived,
                            output: Arc::clone(&result.output),
                            depth: step.depth + 1,
                        });
                        propagation.applied.insert(name.to_owned(), result);
                    },
                    Err(err) => {
                        warn!(source = %step.domain, target = name, error = %err, "Dependent domain failed");
                        propagation.skipped.insert(name.to_owned(), err.to_string());
                    },
                }
            }
        }
        propagation
    }
}
