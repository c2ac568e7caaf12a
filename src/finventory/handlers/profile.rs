use crate::{auth::token::TokenSigner, finventory::handlers::bearer_token, users::UserStore};
use axum::{extract::Extension, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Profile {
    username: String,
}

type ProfileResponse = Result<(StatusCode, Json<Profile>), (StatusCode, Json<Value>)>;

#[utoipa::path(
    get,
    path= "/profile",
    responses (
        (status = 200, description = "Profile of the authenticated user", body = Profile, content_type = "application/json"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "User no longer exists"),
        (status = 500, description = "Datastore unavailable"),
    ),
    tag= "auth"
)]
#[instrument(skip(store, signer, headers))]
pub async fn profile(
    Extension(store): Extension<UserStore>,
    Extension(signer): Extension<Arc<TokenSigner>>,
    headers: HeaderMap,
) -> ProfileResponse {
    let Some(token) = bearer_token(&headers) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing authorization token" })),
        ));
    };

    let user_id = match signer.verify(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!("Rejected session token: {}", err);

            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or expired token" })),
            ));
        }
    };

    match store.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok((
            StatusCode::OK,
            Json(Profile {
                username: user.username,
            }),
        )),
        Ok(None) => {
            debug!("No user for id: {}", user_id);

            Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            ))
        }
        Err(err) => {
            error!("Profile lookup error: {}", err);

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
    fn profile_serializes_username_only() -> Result<(), serde_json::Error> {
        let body = Profile {
            username: "alice".to_string(),
        };
        let value = serde_json::to_value(body)?;

        assert_eq!(value, json!({ "username": "alice" }));

        Ok(())
    }
}
