use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfigInner {
    pub cache: CacheConfig,
    pub propagation: PropagationConfig,
    pub deadline: DeadlineConfig,
    pub events: EventsConfig,
    pub constraints: ConstraintConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten, default)]
    inner: Arc<EngineConfigInner>,
}

impl Deref for EngineConfig {
    type Target = EngineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EngineConfig {
    fn deref_mut(&mut self) -> &mut EngineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Per-domain result cache bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries kept per domain before LRU eviction. Zero disables caching.
    pub capacity: u64,
}

/// Cross-domain propagation policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Dependency hops walked per `apply_customization` call.
    pub max_depth: usize,
}

/// Caller-supplied deadline for domain appliers.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeadlineConfig {
    pub apply_timeout_ms: Option<u64>,
}

impl DeadlineConfig {
    #[must_use]
    pub fn apply_timeout(&self) -> Option<Duration> {
        self.apply_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity.
    pub capacity: usize,
}

/// Thresholds used by the built-in validators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    pub contrast_aa: f64,
    pub contrast_aaa: f64,
    pub contrast_large: f64,
    /// Degrees around a harmony anchor still considered harmonious.
    pub harmony_tolerance: f64,
    pub readability_optimal: f64,
    pub readability_minimum: f64,
    pub touch_target: f64,
    pub rhythm_tolerance: f64,
    pub rhythm_ratios: Vec<f64>,
}

// --- Default ---

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self { max_depth: 1 }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            contrast_aa: 4.5,
            contrast_aaa: 7.0,
            contrast_large: 3.0,
            harmony_tolerance: 15.0,
            readability_optimal: 16.0,
            readability_minimum: 14.0,
            touch_target: 44.0,
            rhythm_tolerance: 0.1,
            rhythm_ratios: vec![0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0],
        }
    }
}
