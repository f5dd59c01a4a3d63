use thiserror::Error;

/// Errors raised by the context store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A read for a key that was never admitted.
    #[error("Identifier \"{0}\" is not defined.")]
    UndefinedContextKey(String),

    /// Any single-key write or delete. Raised whether or not the key exists.
    #[error("A context cannot be modified afterwards (key \"{0}\").")]
    ContextImmutable(String),

    /// A context document that parsed but is not a JSON object.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// A context document that is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ContextError>;
