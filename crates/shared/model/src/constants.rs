//! Stable identifiers shared between crates.

// Constraints
pub const CONTRAST_AA: &str = "contrast-aa";
pub const CONTRAST_AAA: &str = "contrast-aaa";
pub const CONTRAST_LARGE: &str = "contrast-large";
pub const COLOR_HARMONY: &str = "color-harmony";
pub const TYPOGRAPHY_READABILITY: &str = "typography-readability";
pub const TOUCH_TARGET: &str = "touch-target";
pub const VISUAL_RHYTHM: &str = "visual-rhythm";
pub const SYSTEM_ERROR: &str = "system-error";

// Built-in domains
pub const COLOR_DOMAIN: &str = "color";
pub const TYPOGRAPHY_DOMAIN: &str = "typography";
pub const COMPONENT_DOMAIN: &str = "component";

/// Separator between a source domain and a forwarded key (`color.primary`).
pub const NAMESPACE_SEPARATOR: char = '.';
