use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::{RequestError, RequestResult, UnauthorizedSnafu};
use crate::{AppState, SharedState};

/// The `performer_token` query parameter, pulled off the request
/// before a guarded handler runs.
///
/// Fails closed: a missing or undecodable parameter is Unauthorized,
/// not a framework-level 400.
pub struct PerformerToken(pub String);

#[derive(Deserialize)]
struct TokenQuery {
    performer_token: String,
}

impl FromRequestParts<SharedState> for PerformerToken {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TokenQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| UnauthorizedSnafu.build())?;

        Ok(Self(query.performer_token))
    }
}

impl AppState {
    /// Validate a performer token against the live session values;
    /// with `requires_admin`, additionally require the resolved
    /// login's stored `admin` flag.
    ///
    /// The token is matched by *value* across the session map, so any
    /// token issued at some login authorizes whoever presents it; the
    /// admin check then hangs off the first login holding that value.
    /// Read-only, no expiry, no revocation beyond logout.
    pub async fn authorize(&self, performer_token: &str, requires_admin: bool) -> RequestResult<()> {
        let Some(login) = self.sessions.login_for_token(performer_token).await else {
            return UnauthorizedSnafu.fail();
        };

        if requires_admin {
            let users = self.storage.users_by_login(&login).await?;
            if !users.first().is_some_and(|user| user.admin) {
                return UnauthorizedSnafu.fail();
            }
        }

        Ok(())
    }
}
