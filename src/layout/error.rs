use thiserror::Error;

/// Errors raised while validating a layout configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Duplicate control name in layout: {0}")]
    DuplicateName(String),

    #[error("Control name must not be empty (label: {0:?})")]
    EmptyName(String),

    #[error("Divider position {0} is outside 0..=100 percent")]
    InvalidPosition(f32),

    #[error("Not a divider id: {0}")]
    InvalidDividerId(String),
}
