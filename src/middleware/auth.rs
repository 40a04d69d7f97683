use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// HTTP header carrying the authenticated user id.
///
/// Token verification happens upstream; by the time a request reaches this
/// service the identity layer has resolved the caller and injected their id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated owner of the current request.
///
/// Every owner-scoped handler takes this extractor, so a request without a
/// resolvable identity is rejected before any data access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(OwnerId)
            .ok_or_else(|| AppError::Unauthorized("Missing or invalid user identity".to_string()))
    }
}
