//! Caller identity
//!
//! The current user is named by the `X-User-Id` header. A missing or
//! malformed header resolves to no user; services decide whether that is
//! acceptable.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::value_objects::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved current user, if any
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(UserId::parse);
        Ok(CurrentUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn resolve(header: Option<&str>) -> Option<UserId> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_resolves_user_from_header() {
        let id = UserId::new();
        assert_eq!(resolve(Some(&id.to_string())).await, Some(id));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_anonymous() {
        assert_eq!(resolve(None).await, None);
        assert_eq!(resolve(Some("not-a-user")).await, None);
    }
}
