use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is a user-input error: the binary reports it together
/// with the usage text and exits with status 1.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Speed tier is not one of `low`, `middle`, `high`.
    #[error("invalid speed tier: {0:?} (expected low, middle or high)")]
    InvalidTier(String),

    /// Display mode is not one of `scroll`, `grid`.
    #[error("invalid display mode: {0:?} (expected scroll or grid)")]
    InvalidMode(String),

    /// Two options that cannot run together were both requested.
    #[error("--{first} cannot be combined with {second}")]
    ConflictingFlags {
        /// Flag that was rejected.
        first: &'static str,
        /// What it conflicts with.
        second: &'static str,
    },

    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),
}
