use thiserror::Error;

/// The error type for router configuration, binding and response encoding.
///
/// Errors raised by route handlers are not represented here, they are
/// [`ConsumerError`](./struct.ConsumerError.html) values which are rendered to the client.
#[derive(Debug, Error)]
pub enum Error {
    /// `consume` was called on a router whose routes were already bound.
    #[error("the router routes have already been consumed")]
    AlreadyConsumed,

    /// A route pattern is empty, does not start with `/`, or holds a percent-escape.
    #[error("invalid route pattern {0:?}: a pattern must start with '/' and be written without percent-escapes")]
    InvalidPattern(String),

    /// A dispatcher already holds an endpoint for this path.
    #[error("an endpoint is already bound at {0:?}")]
    DuplicatePath(String),

    /// The JSON error body could not be encoded.
    #[error("error while encoding response body: {0}")]
    EncodeBody(#[from] serde_json::Error),
}
