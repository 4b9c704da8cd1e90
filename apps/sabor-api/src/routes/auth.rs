//! `/api/auth`: login, current session, logout.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;

use crate::dto::{LoginRequest, SessionResponse, SuccessResponse};
use crate::error::ApiResult;
use crate::session::{expired_session_cookie, session_cookie, CurrentOperator};
use crate::state::AppState;

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    let Json(request) = payload?;

    let outcome = state.auth.login(&request.login, &request.senha).await?;
    let jar = jar.add(session_cookie(outcome.session.token, state.cookie));

    Ok((
        jar,
        Json(SessionResponse {
            operador: outcome.operator.into(),
        }),
    ))
}

/// `GET /api/auth/session`
pub async fn session(CurrentOperator(operator): CurrentOperator) -> Json<SessionResponse> {
    Json(SessionResponse {
        operador: operator.into(),
    })
}

/// `POST /api/auth/logout`
///
/// Tokens are stateless; logging out only drops the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(expired_session_cookie(state.cookie));
    (jar, Json(SuccessResponse { success: true }))
}
