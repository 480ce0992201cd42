use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::AuthContext;

/// Extractor for getting the authenticated employee from the request
/// Usage in handlers: `async fn handler(AuthSession(ctx): AuthSession) -> Response`
pub struct AuthSession(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract AuthContext from request extensions (set by middleware)
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthSession)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
