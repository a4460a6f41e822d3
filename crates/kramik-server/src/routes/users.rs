use axum::extract::{Path, State};
use kramik_core::{NewUser, UserRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AppJson, Message};
use crate::auth::PerformerToken;
use crate::error::{
    BadRequestSnafu, InternalSnafu, RequestResult, UserNotFoundSnafu, WrongPasswordSnafu,
};
use crate::{LOG_TARGET, SharedState};

#[derive(Serialize)]
pub struct UsersResponse {
    users: Vec<UserRecord>,
}

/// `GET /users` — every stored row, as-is.
pub async fn list(State(state): State<SharedState>) -> RequestResult<AppJson<UsersResponse>> {
    let users = state.storage.list_users().await?;
    Ok(AppJson(UsersResponse { users }))
}

/// Register/login request body. `name`/`surname`/`age` only matter at
/// registration; `token` is the session token recorded at login and
/// is accepted but ignored at registration.
#[derive(Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    pub token: String,
}

/// `POST /register`
pub async fn register(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<UserPayload>,
) -> RequestResult<AppJson<Message>> {
    if state.sessions.contains_login(&payload.login).await {
        return BadRequestSnafu {
            message: "A user with this login is already logged in",
        }
        .fail();
    }
    if !state.storage.users_by_login(&payload.login).await?.is_empty() {
        return BadRequestSnafu {
            message: "A user with this login is already registered",
        }
        .fail();
    }

    let user = state
        .storage
        .insert_user(NewUser {
            login: payload.login,
            password: payload.password,
            name: payload.name.unwrap_or_default(),
            surname: payload.surname.unwrap_or_default(),
            age: payload.age.unwrap_or_default(),
        })
        .await?;
    info!(target: LOG_TARGET, id = %user.id, login = %user.login, "User registered");

    Ok(AppJson(Message {
        message: "User registered successfully",
    }))
}

/// Login success payload: the public profile fields plus the session
/// token just recorded. Password and admin flag never appear here.
#[derive(Serialize)]
pub struct LoginResponse {
    message: &'static str,
    login: String,
    name: String,
    surname: String,
    age: String,
    token: String,
}

/// `POST /login` — plain-equality password check; on success the
/// supplied token becomes the login's session token.
pub async fn login(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<UserPayload>,
) -> RequestResult<AppJson<LoginResponse>> {
    let users = state.storage.users_by_login(&payload.login).await?;
    let user = match users.as_slice() {
        [] => {
            return BadRequestSnafu {
                message: "No user with this login",
            }
            .fail();
        }
        [user] => user,
        // Reported, not healed; someone edited the table by hand.
        [..] => {
            return InternalSnafu {
                message: "More than one user with this login in the table",
            }
            .fail();
        }
    };

    if user.password != payload.password {
        return WrongPasswordSnafu.fail();
    }

    state.sessions.insert(&payload.login, &payload.token).await;
    info!(target: LOG_TARGET, login = %user.login, "User logged in");

    Ok(AppJson(LoginResponse {
        message: "Logged in successfully",
        login: user.login.clone(),
        name: user.name.clone(),
        surname: user.surname.clone(),
        age: user.age.clone(),
        token: payload.token,
    }))
}

/// `GET /logout/{login}`
pub async fn logout(
    State(state): State<SharedState>,
    PerformerToken(token): PerformerToken,
    Path(login): Path<String>,
) -> RequestResult<AppJson<Message>> {
    state.authorize(&token, false).await?;

    if !state.sessions.remove(&login).await {
        return BadRequestSnafu {
            message: "User is not logged in",
        }
        .fail();
    }
    info!(target: LOG_TARGET, login, "User logged out");

    Ok(AppJson(Message {
        message: "Logged out successfully",
    }))
}

/// `POST /remuser/{login}` — admin-gated.
pub async fn remove(
    State(state): State<SharedState>,
    PerformerToken(token): PerformerToken,
    Path(login): Path<String>,
) -> RequestResult<AppJson<Message>> {
    state.authorize(&token, true).await?;

    if !state.storage.remove_user(&login).await? {
        return UserNotFoundSnafu { login }.fail();
    }
    info!(target: LOG_TARGET, login, "User removed");

    Ok(AppJson(Message {
        message: "User removed successfully",
    }))
}

/// `GET /check_token/{login}` — whether the login currently holds a
/// session. The caller still has to present some valid token.
pub async fn check_token(
    State(state): State<SharedState>,
    PerformerToken(token): PerformerToken,
    Path(login): Path<String>,
) -> RequestResult<AppJson<Message>> {
    state.authorize(&token, false).await?;

    if state.sessions.contains_login(&login).await {
        Ok(AppJson(Message {
            message: "User is logged in",
        }))
    } else {
        BadRequestSnafu {
            message: "User is not logged in",
        }
        .fail()
    }
}
