mod error;
mod extract;
mod health;
mod input;
mod response;
pub mod router;
mod state;

pub use error::{ApiError, ErrorBody, ErrorKind};
pub use extract::{AuthUser, DeferredPayload, PathParam, Payload, QueryParams};
pub use input::{NumberLike, like_pattern, trimmed};
pub use response::MessageBody;
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner, SessionCache};

/// Result type of every handler.
pub type ApiResult<T> = Result<T, ApiError>;
