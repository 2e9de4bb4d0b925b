//! # Admin Guard
//!
//! Mutating routes require the admin token, presented either as
//! `Authorization: Bearer <token>` or in the `firebaseToken` cookie the admin UI sets.
//! Without a configured token the guard lets everything through.
use std::sync::Arc;

use axum::{
    extract::{Request, State as AxumState},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
    },
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::warn;

use crate::{error::AppError, state::State};

pub const TOKEN_COOKIE: &str = "firebaseToken";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credentials")]
    Missing,

    #[error("malformed credentials")]
    Malformed,

    #[error("invalid token")]
    Rejected,
}

fn bearer(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::Malformed)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed)?;

    Ok(Some(token))
}

fn cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

pub fn verify_token(expected: &str, headers: &HeaderMap) -> Result<(), AuthError> {
    let presented = match bearer(headers)? {
        Some(token) => token,
        None => cookie(headers).ok_or(AuthError::Missing)?,
    };

    // Constant time over the token length
    let matches = presented.len() == expected.len()
        && presented
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;

    if matches {
        Ok(())
    } else {
        Err(AuthError::Rejected)
    }
}

pub async fn require_admin(
    AxumState(state): AxumState<Arc<State>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.admin_token.as_deref() {
        verify_token(expected, request.headers()).map_err(|e| {
            warn!("Rejected {} {}: {e}", request.method(), request.uri().path());
            e
        })?;
    }

    Ok(next.run(request).await)
}
