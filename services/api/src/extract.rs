//! Request extractors: caller identity and JSON/query payloads with API errors

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use std::convert::Infallible;
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, models::user::Role, state::AppState};

const NO_TOKEN: &str = "Not authorized, no token";
const BAD_TOKEN: &str = "Not authorized, token failed";

/// Authenticated caller, resolved from the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Role allow-list guard
    pub fn authorize(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "User role not authorized to access this route".to_string(),
            ))
        }
    }
}

/// Verify a raw token and build the caller identity
pub fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthorized(BAD_TOKEN.to_string())
    })?;
    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already verified by the auth middleware
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized(NO_TOKEN.to_string()))?;

        let user = authenticate(state, bearer.token())?;
        parts.extensions.insert(user);
        Ok(user)
    }
}

/// Caller identity when a valid token is present; anonymous otherwise
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.map(|user| user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// JSON body whose rejections render as API errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameters; malformed values render as not found
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Query string whose rejections render as API errors
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
