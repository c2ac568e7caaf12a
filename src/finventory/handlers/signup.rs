use crate::auth::{AuthError, AuthService};
use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

// no Debug on purpose: the payload carries a plaintext password
#[derive(ToSchema, Deserialize)]
pub struct Signup {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct SignupOk {
    message: String,
    #[serde(rename = "redirectUrl")]
    redirect_url: String,
}

type SignupResponse = Result<(StatusCode, Json<SignupOk>), (StatusCode, Json<Value>)>;

#[utoipa::path(
    post,
    path= "/signup",
    request_body = Signup,
    responses (
        (status = 200, description = "Registration successful", body = SignupOk, content_type = "application/json"),
        (status = 400, description = "Password policy violation or username already exists"),
        (status = 500, description = "Datastore unavailable"),
    ),
    tag= "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn signup(
    Extension(auth): Extension<AuthService>,
    payload: Option<Json<Signup>>,
) -> SignupResponse {
    let Some(Json(user)) = payload else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Missing payload" })),
        ));
    };

    debug!("Signup attempt for username: {}", user.username);

    match auth.register(&user.username, &user.password).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(SignupOk {
                message: "User registered successfully".to_string(),
                redirect_url: "/login".to_string(),
            }),
        )),
        Err(err @ AuthError::InvalidPassword(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": err.to_string() })),
        )),
        Err(AuthError::UsernameTaken) => {
            debug!("Username already exists: {}", user.username);

            Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Username already exists" })),
            ))
        }
        Err(err) => {
            error!("Signup error: {}", err);

            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_payload_deserializes() -> Result<(), serde_json::Error> {
        let user: Signup =
            serde_json::from_value(json!({ "username": "alice", "password": "Passw0rd!" }))?;

        assert_eq!(user.username, "alice");
        assert_eq!(user.password, "Passw0rd!");

        Ok(())
    }

    #[test]
    fn signup_ok_uses_the_wire_field_names() -> Result<(), serde_json::Error> {
        let body = SignupOk {
            message: "User registered successfully".to_string(),
            redirect_url: "/login".to_string(),
        };
        let value = serde_json::to_value(body)?;

        assert_eq!(
            value,
            json!({
                "message": "User registered successfully",
                "redirectUrl": "/login",
            })
        );

        Ok(())
    }
}
