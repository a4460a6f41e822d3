mod products;
mod users;

use axum::Router;
use axum::body::Body;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;

use crate::error::{ErrorResponse, RequestError};
use crate::SharedState;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RequestError))]
pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Plain `{"message"}` success body.
#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

pub async fn not_found(_state: State<SharedState>, _req: Request<Body>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        AppJson(ErrorResponse {
            error: "Not Found".to_string(),
        }),
    )
}

pub fn route_handler(state: SharedState) -> Router {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{product_id}", get(products::get_by_id))
        .route("/add_product", post(products::add))
        .route("/remove_product/{id_or_name}", post(products::remove))
        .route("/users", get(users::list))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout/{login}", get(users::logout))
        .route("/remuser/{login}", post(users::remove))
        .route("/check_token/{login}", get(users::check_token))
        .fallback(not_found)
        .with_state(state)
}
