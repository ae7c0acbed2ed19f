use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the bearer credential and injects the `Principal` extension.
/// Requests without a valid principal never reach the handler.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::unauthenticated("Not authenticated")))
        .transpose()?;

    let principal = state.resolver().resolve(authorization).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
