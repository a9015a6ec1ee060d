use crate::Identity;
use crate::error::IdentityError;
use crate::model::{AuthResponse, LoginRequest, MeResponse, SignupRequest};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

fn slice(state: &ApiState) -> Result<Identity, ApiError> {
    state.try_get_slice::<Identity>().cloned().map_err(|err| ApiError::internal(err.to_string()))
}

#[api_handler(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = CREATED, description = "Account created", body = AuthResponse),
        (status = BAD_REQUEST, description = "Missing or invalid field", body = ErrorBody),
        (status = CONFLICT, description = "Email or username in use", body = ErrorBody),
    ),
    tag = IDENTITY_TAG,
)]
pub(crate) async fn signup(
    State(state): State<ApiState>,
    Payload(body): Payload<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let new_user = body.validate()?;
    let passwords = slice(&state)?.passwords.clone();

    let user = state
        .database
        .call(move |conn| repository::register(conn, &passwords, &new_user))
        .await?;
    let token = state.tokens.issue(user.user_id).map_err(IdentityError::from)?;
    info!(user_id = user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { message: "User registered successfully", token, user }),
    ))
}

#[api_handler(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = OK, description = "Signed in", body = AuthResponse),
        (status = BAD_REQUEST, description = "Missing field", body = ErrorBody),
        (status = UNAUTHORIZED, description = "Wrong credentials", body = ErrorBody),
    ),
    tag = IDENTITY_TAG,
)]
pub(crate) async fn login(
    State(state): State<ApiState>,
    Payload(body): Payload<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (email, password) = body.validate()?;
    let passwords = slice(&state)?.passwords.clone();

    let user = state
        .database
        .call(move |conn| repository::authenticate(conn, &passwords, &email, &password))
        .await?;
    let token = state.tokens.issue(user.user_id).map_err(IdentityError::from)?;

    Ok(Json(AuthResponse { message: "Login successful", token, user }))
}

#[api_handler(
    get,
    path = "/me",
    responses(
        (status = OK, description = "The signed-in user", body = MeResponse),
        (status = UNAUTHORIZED, description = "Missing or bad token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub(crate) async fn me(State(state): State<ApiState>, auth: AuthUser) -> ApiResult<Json<MeResponse>> {
    let user_id = auth.user_id;
    let user = state
        .database
        .call(move |conn| repository::find_by_id(conn, user_id))
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    Ok(Json(MeResponse { message: "User retrieved successfully", user }))
}
