use thiserror::Error;

/// Errors surfaced by dispatch operations. Placement with no free courier is
/// not one of them: the order queues and placement still succeeds.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
