use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::models::QueryParams;

/// Extracts the multi-valued query string. Never rejects: a missing or
/// malformed query string yields empty or partial parameters, and validation
/// happens in [`QueryBuilder::parse`](crate::QueryBuilder::parse).
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}
