//! Caller extractors: pull the bearer token from `Authorization` and
//! verify it.

use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use agrirent_core::error::AppError;
use agrirent_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// A verified caller. Rejects the request with `unauthenticated` otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

impl std::ops::Deref for AuthUser {
    type Target = UserId;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The caller if a token was sent. A token that fails verification is still
/// rejected; only its absence yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<UserId>);

impl MaybeAuthUser {
    pub fn user(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

async fn caller(parts: &mut Parts, state: &AppState) -> Result<Option<UserId>, ApiError> {
    if !parts.headers.contains_key(AUTHORIZATION) {
        return Ok(None);
    }
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::authentication("Invalid Authorization header format"))?;

    Ok(Some(state.jwt.verify(bearer.token())?))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        caller(parts, state)
            .await?
            .map(AuthUser)
            .ok_or_else(|| AppError::authentication("Missing Authorization header").into())
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(caller(parts, state).await?))
    }
}
