use crate::{
    AppState,
    config::Credentials,
    dto::{AuthRequest, AuthResponse, AuthStatusResponse, CredentialsResponse},
    models::AuthToken,
    upstream::AuthPayload,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{error, info, warn};
use validator::Validate;

/// POST /api/auth/authenticate
/// Body: { "email", "name", "rollNo", "accessCode", "clientID", "clientSecret" }
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> (StatusCode, Json<AuthResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AuthResponse::failed(rejection.body_text())),
            );
        }
    };

    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failed(e.to_string())),
        );
    }

    info!(
        "Authentication request for {} (roll no {})",
        request.email, request.roll_no
    );

    if state.demo_mode() {
        state.store.set_auth_token(AuthToken::demo()).await;
        return (
            StatusCode::OK,
            Json(AuthResponse::ok("Demo authentication successful")),
        );
    }

    let payload = upstream_payload(request, &state.config.credentials);

    let body = match state.upstream.authenticate(&payload).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Upstream authentication failed: {}", e);
            // Upstream explained itself: relay that to the client.
            return match e.upstream_message() {
                Some(message) => (
                    StatusCode::BAD_REQUEST,
                    Json(AuthResponse::failed(message)),
                ),
                None => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(AuthResponse::failed(e.to_string())),
                ),
            };
        }
    };

    match serde_json::from_value::<AuthToken>(body) {
        Ok(token) => {
            info!("Upstream token cached, expires in {}", token.expires_in());
            state.store.set_auth_token(token).await;
            (
                StatusCode::OK,
                Json(AuthResponse::ok("Authentication successful")),
            )
        }
        Err(e) => {
            error!("Unrecognized token response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthResponse::failed("Unrecognized token format")),
            )
        }
    }
}

/// Operator-supplied credentials win over the ones in the request body.
fn upstream_payload(request: AuthRequest, credentials: &Credentials) -> AuthPayload {
    AuthPayload {
        email: request.email,
        name: request.name,
        roll_no: request.roll_no,
        access_code: credentials
            .access_code
            .clone()
            .unwrap_or(request.access_code),
        client_id: credentials.client_id.clone().unwrap_or(request.client_id),
        client_secret: credentials
            .client_secret
            .clone()
            .unwrap_or(request.client_secret),
    }
}

/// GET /api/auth/status
pub async fn status(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    let authenticated = state.store.auth_token().await.is_some();

    Json(AuthStatusResponse {
        authenticated,
        demo_mode: (authenticated && state.demo_mode()).then_some(true),
    })
}

/// GET /api/auth/credentials
/// Reports whether the server holds upstream credentials, never their values.
pub async fn credentials(State(state): State<AppState>) -> Json<CredentialsResponse> {
    let has_credentials = state.config.credentials.is_complete();

    Json(CredentialsResponse {
        has_credentials,
        message: if has_credentials {
            "Server has the required credentials".to_string()
        } else {
            "Missing one or more required credentials".to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AuthRequest {
        AuthRequest {
            email: "jane@example.com".into(),
            name: "Jane".into(),
            roll_no: "R1".into(),
            access_code: "from-client".into(),
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
        }
    }

    #[test]
    fn environment_credentials_override_request() {
        let credentials = Credentials {
            client_id: Some("env-id".into()),
            client_secret: None,
            access_code: Some("env-code".into()),
        };
        let payload = upstream_payload(request(), &credentials);

        assert_eq!(payload.client_id, "env-id");
        assert_eq!(payload.access_code, "env-code");
        assert_eq!(payload.client_secret, "client-secret");
        assert_eq!(payload.email, "jane@example.com");
    }

    #[test]
    fn request_credentials_used_when_environment_is_empty() {
        let payload = upstream_payload(request(), &Credentials::default());

        assert_eq!(payload.client_id, "client-id");
        assert_eq!(payload.access_code, "from-client");
    }
}
