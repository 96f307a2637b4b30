//! Authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use common::AppError;

use crate::state::AppState;

/// Account authenticated by the bearer token on this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAccount {
    pub id: Uuid,
}

/// Authentication middleware that validates bearer tokens.
///
/// A missing or non-Bearer `Authorization` header is `Unauthorized`;
/// a token that fails verification reports its specific rejection.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let id = state.accounts.authenticate(bearer.token())?;

    request.extensions_mut().insert(CurrentAccount { id });

    Ok(next.run(request).await)
}
