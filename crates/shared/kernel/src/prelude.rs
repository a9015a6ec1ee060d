//! Everything a feature slice needs to write handlers.

pub use crate::security::resource::{Entity, ResourceGuard, ResourceGuardError};
pub use crate::security::token::{Claims, TokenService};
pub use crate::server::{
    ApiError, ApiResult, ApiState, AuthUser, DeferredPayload, ErrorBody, MessageBody, NumberLike,
    PathParam, Payload, QueryParams, like_pattern, trimmed,
};
pub use autoims_database::{
    Changes, ConstraintViolation, Database, DatabaseError, Migration, fetch_all, parse_column,
};
pub use autoims_derive::{api_handler, api_model, autoims_error, autoims_slice};
pub use autoims_domain::constants::*;
pub use autoims_domain::status::*;
