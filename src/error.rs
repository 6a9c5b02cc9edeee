use thiserror::Error;

/// Errors raised while parsing or validating mesh parameters.
///
/// The render path itself never fails; these only surface from the
/// configuration layer (CLI flags, config files).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    #[error("invalid hex color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("unknown animation mode '{0}': expected none, drift, orbit, breathe or wave")]
    UnknownAnimation(String),

    #[error("unknown blend mode '{0}'")]
    UnknownBlendMode(String),

    #[error("invalid size '{0}': expected WIDTHxHEIGHT")]
    InvalidSize(String),
}
