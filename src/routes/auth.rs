//! Identity and admin checks shared by the route handlers.
//!
//! Authentication happens upstream; the username of the authenticated caller arrives in
//! the `X-Username` header.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{dto::validation::validate_username, error::AppError, state::SharedState};

const USERNAME_HEADER: &str = "x-username";
const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Username of the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Caller identity when one is provided. Invalid identities are still rejected.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<String>);

fn username_from(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(USERNAME_HEADER) else {
        return Ok(None);
    };
    let name = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid `X-Username` header".into()))?
        .trim();
    validate_username(name).map_err(|err| {
        AppError::Unauthorized(
            err.message
                .map(|message| message.into_owned())
                .unwrap_or_else(|| "invalid username".into()),
        )
    })?;
    Ok(Some(name.to_string()))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        username_from(&parts.headers)?
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Unauthorized("missing `X-Username` header".into()))
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        username_from(&parts.headers).map(MaybeUser)
    }
}

/// Middleware guarding the catalog management routes with the configured admin token.
pub async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    match state.config().admin_token() {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized("no admin token configured".into())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        http::{HeaderValue, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, routes, state::AppState,
    };

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn username_is_trimmed() {
        assert_eq!(
            username_from(&headers("  alice ")).unwrap().as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert!(username_from(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn malformed_username_is_rejected() {
        assert!(matches!(
            username_from(&headers("bad name")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(username_from(&headers("")).is_err());
    }

    fn catalog_app(config: AppConfig) -> Router {
        let state = AppState::new(config, Arc::new(MemoryGameStore::new()));
        routes::words::router(state.clone()).with_state(state)
    }

    async fn stats_status(app: Router, token: Option<&str>) -> StatusCode {
        let mut request = Request::builder().uri("/words/stats");
        if let Some(token) = token {
            request = request.header(ADMIN_TOKEN_HEADER, token);
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn catalog_routes_need_the_admin_token() {
        let app = catalog_app(AppConfig::default().with_admin_token("letmein"));
        assert_eq!(stats_status(app.clone(), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            stats_status(app.clone(), Some("guess")).await,
            StatusCode::UNAUTHORIZED
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/words/stats")
                    .header(ADMIN_TOKEN_HEADER, "letmein")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["tiers"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn catalog_routes_are_closed_without_configured_token() {
        let app = catalog_app(AppConfig::default());
        assert_eq!(
            stats_status(app.clone(), Some("letmein")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(stats_status(app, None).await, StatusCode::UNAUTHORIZED);
    }
}
