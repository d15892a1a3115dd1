//! Error classification.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    NotFound,
    Request,
    RateLimit,
    Network,
    Server,
    Api,
    IdentityProvider,
    Configuration,
    Serialization,
}
