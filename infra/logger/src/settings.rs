use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

/// `[log]` section of a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level name; `None` falls back to `info`.
    pub level: Option<String>,
    /// Filter directives, e.g. `"tessera_domains=debug"`.
    pub filter: Option<String>,
    pub console: bool,
    pub ansi: bool,
    /// Directory for rolling files; no file output when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub rotation: RotationPolicy,
    pub max_files: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: None,
            filter: None,
            console: true,
            ansi: true,
            path: None,
            json: false,
            rotation: RotationPolicy::Daily,
            max_files: crate::DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<RotationPolicy> for Rotation {
    fn from(policy: RotationPolicy) -> Self {
        match policy {
            RotationPolicy::Minutely => Self::MINUTELY,
            RotationPolicy::Hourly => Self::HOURLY,
            RotationPolicy::Daily => Self::DAILY,
            RotationPolicy::Never => Self::NEVER,
        }
    }
}
