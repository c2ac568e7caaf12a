use crate::auth::{AuthError, AuthService};
use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

// no Debug on purpose: the payload carries a plaintext password
#[derive(ToSchema, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginOk {
    message: String,
    token: String,
    #[serde(rename = "redirectUrl")]
    redirect_url: String,
}

type LoginResponse = Result<(StatusCode, Json<LoginOk>), (StatusCode, Json<Value>)>;

#[utoipa::path(
    post,
    path= "/login",
    request_body = Login,
    responses (
        (status = 200, description = "Login successful", body = LoginOk, content_type = "application/json"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Datastore unavailable"),
    ),
    tag= "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn login(
    Extension(auth): Extension<AuthService>,
    payload: Option<Json<Login>>,
) -> LoginResponse {
    let Some(Json(user)) = payload else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Missing payload" })),
        ));
    };

    debug!("Login attempt for username: {}", user.username);

    match auth.login(&user.username, &user.password).await {
        Ok(token) => Ok((
            StatusCode::OK,
            Json(LoginOk {
                message: "Login successful".to_string(),
                token,
                redirect_url: "/home".to_string(),
            }),
        )),
        // an unknown username reads the same as a wrong password
        Err(AuthError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )),
        Err(err) => {
            error!("Login error: {}", err);

            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            ))
        }
    }
}
