//! Identity feature slice: account signup, login and the current user.
//!
//! Passwords are stored as Argon2id PHC strings; sessions are stateless
//! bearer tokens issued by the kernel's token service.
mod error;
mod handlers;
mod model;
mod password;
pub mod repository;

pub use error::{IdentityError, IdentityErrorExt};
pub use model::{AuthResponse, LoginRequest, MeResponse, NewUser, SignupRequest, User};
pub use password::Passwords;

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Identity::NAME, "0001", include_str!("../migrations/0001_users.sql"))];

/// Identity feature state.
#[autoims_derive::autoims_slice(name = "identity")]
pub struct Identity {
    pub passwords: Passwords,
}

/// Initialize the identity feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, IdentityError> {
    tracing::info!("Identity slice initialized");
    Ok(InitializedSlice::new(Identity::new(IdentityInner { passwords: Passwords::default() })))
}

/// `/signup`, `/login` and `/me`, mounted under `/api`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::signup))
        .routes(routes!(handlers::login))
        .routes(routes!(handlers::me))
}
