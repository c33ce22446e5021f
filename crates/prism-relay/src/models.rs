//! The fixed allow-list of upstream model identifiers
//!
//! Loaded once at process start as a constant table; no component may add or
//! remove entries at runtime.

/// Supported upstream models, in listing order
pub const SUPPORTED_MODELS: &[&str] = &[
    "gemini-2.0-flash-exp",
    "gemini-exp-1206",
    "gemini-2.0-flash-thinking-exp-1219",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
];

/// Model used when the caller names no target
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Whether a model identifier is in the allow-list
#[must_use]
pub fn is_supported(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}
