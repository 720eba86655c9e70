use thiserror::Error;

/// Reasons a calculation request is rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("at least one balance is required")]
    EmptyBalanceSet,

    #[error("at least one balance must have a principal > 0")]
    NothingOwed,

    #[error("{label}: {field} must be a finite value >= 0")]
    InvalidBalanceField { label: String, field: &'static str },

    #[error("{field} must be a finite value >= 0")]
    Negative { field: &'static str },

    #[error("{field} must be > 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be <= {max}")]
    TooLarge { field: &'static str, max: u32 },

    #[error("oneTimeAtMonth must be >= 1 when a one-time extra payment is set")]
    OneTimeMonth,

    #[error("invalid debt '{0}', expected label:principal:rate:minimum")]
    MalformedDebt(String),

    #[error("invalid settings: {0}")]
    Settings(String),
}
