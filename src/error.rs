use thiserror::Error;

/// Crate-wide error taxonomy for lifecycle operations.
///
/// The variants map directly onto the behavior callers must expose:
/// `NotFound` -> 404, `StateConflict` -> 409, `Forbidden` -> 403,
/// `InvalidArgument` -> 400, `Transient` -> 503. Only `Transient` is safe
/// to retry with identical arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A required input was absent or malformed. Raised before any
    /// persistence call, so no partial writes can have occurred.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity id does not exist in its store. `operation`
    /// names the lifecycle operation that hit the miss, when known.
    #[error("{entity} identified by {id} not found{}", during(.operation))]
    NotFound {
        entity: &'static str,
        id: i64,
        operation: Option<String>,
    },

    /// The operation's precondition on current state was not met.
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// The actor is not allowed to perform this operation on this entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Store/timeout/infrastructure failure; retryable.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Invalid crate configuration (bad environment values).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound {
            entity,
            id,
            operation: None,
        }
    }

    /// Whether retrying the same call with identical arguments can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// HTTP status the (out-of-scope) controller layer maps this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::StateConflict(_) => 409,
            Self::Transient(_) | Self::Configuration(_) => 503,
        }
    }

    /// Wrap a store error with the operation it occurred in. `NotFound`
    /// keeps its entity and id and records the operation alongside them;
    /// variants raised by the lifecycle itself are kept verbatim.
    pub fn in_operation(self, operation: &str) -> Self {
        match self {
            Self::Transient(msg) => Self::Transient(format!("{operation}: {msg}")),
            Self::StateConflict(msg) => Self::StateConflict(format!("{operation}: {msg}")),
            Self::NotFound { entity, id, .. } => Self::NotFound {
                entity,
                id,
                operation: Some(operation.to_string()),
            },
            other => other,
        }
    }
}

fn during(operation: &Option<String>) -> String {
    match operation {
        Some(op) => format!(" during {op}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
