// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Method,
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_account_owner, TOKEN_HEADER},
    error::ApiError,
    models::{Account, CreateAccountParams, DeleteAccountResponse, TransferParams},
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod transfer;

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/account/{id}",
            shared(get(accounts::get_account_by_id).delete(accounts::delete_account)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account_owner,
        ));

    let api_routes = Router::new()
        .route(
            "/account",
            shared(get(accounts::list_accounts).post(accounts::create_account)),
        )
        .route("/accounts", shared(get(accounts::list_accounts)))
        .route("/transfer", shared(post(transfer::transfer)))
        .route("/health", shared(get(health::health)))
        .merge(protected_routes)
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Answer unsupported methods on a known path with 400 instead of 405.
fn shared(methods: MethodRouter<AppState>) -> MethodRouter<AppState> {
    methods.fallback(method_not_allowed)
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::bad_request(format!("method not allowed {method}"))
}

/// Decode a JSON request body regardless of its `Content-Type`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(TOKEN_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::create_account,
        accounts::list_accounts,
        accounts::get_account_by_id,
        accounts::delete_account,
        transfer::transfer,
        health::health
    ),
    components(
        schemas(
            Account,
            CreateAccountParams,
            DeleteAccountResponse,
            TransferParams,
            health::HealthResponse
        )
    ),
    modifiers(&TokenSecurity),
    tags(
        (name = "Accounts", description = "Account management"),
        (name = "Transfers", description = "Transfer requests"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "router-secret";

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(TOKEN_HEADER, token)
            .body(Body::empty())
            .unwrap()
    }

    /// Create an account through the API, returning its body and token.
    async fn create(app: &Router, first: &str, last: &str) -> (Value, String) {
        let response = send(
            app,
            json_request("POST", "/account", json!({ "firstName": first, "lastName": last })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let token = response.headers()[TOKEN_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        (body_json(response).await, token)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::in_memory(SECRET));
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn create_then_fetch_with_own_token() {
        let app = router(AppState::in_memory(SECRET));
        let (created, token) = create(&app, "Ada", "Lovelace").await;
        assert_eq!(created["balance"], 0);

        let uri = format!("/account/{}", created["id"]);
        let response = send(&app, authed("GET", &uri, &token)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn token_grants_only_its_own_account() {
        let app = router(AppState::in_memory(SECRET));
        let (_, ada_token) = create(&app, "Ada", "Lovelace").await;
        let (alan, _) = create(&app, "Alan", "Turing").await;

        let uri = format!("/account/{}", alan["id"]);
        let response = send(&app, authed("GET", &uri, &ada_token)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({ "Error": "permission denied" }));
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let app = router(AppState::in_memory(SECRET));
        let (created, _) = create(&app, "Ada", "Lovelace").await;

        let request = Request::builder()
            .uri(format!("/account/{}", created["id"]))
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn foreign_secret_is_denied() {
        let app = router(AppState::in_memory(SECRET));
        let (created, _) = create(&app, "Ada", "Lovelace").await;

        // Same account number, signed by someone else
        let impostor = AppState::in_memory("not-the-server-secret");
        let account: Account = serde_json::from_value(created.clone()).unwrap();
        let forged = impostor.tokens.issue(&account).unwrap();

        let uri = format!("/account/{}", created["id"]);
        let response = send(&app, authed("GET", &uri, &forged)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unparsable_id_is_denied() {
        let app = router(AppState::in_memory(SECRET));
        let (_, token) = create(&app, "Ada", "Lovelace").await;

        let response = send(&app, authed("GET", "/account/abc", &token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn non_utf8_id_is_denied_with_envelope() {
        let app = router(AppState::in_memory(SECRET));
        let (_, token) = create(&app, "Ada", "Lovelace").await;

        for method in ["GET", "DELETE"] {
            let response = send(&app, authed(method, "/account/%FF", &token)).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_json(response).await, json!({ "Error": "permission denied" }));
        }
    }

    #[tokio::test]
    async fn delete_own_account_then_again() {
        let app = router(AppState::in_memory(SECRET));
        let (created, token) = create(&app, "Ada", "Lovelace").await;
        let uri = format!("/account/{}", created["id"]);

        let response = send(&app, authed("DELETE", &uri, &token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["deleted"], true);

        // The account is gone, so ownership can no longer be established
        let response = send(&app, authed("DELETE", &uri, &token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn list_after_two_creations_returns_both() {
        let app = router(AppState::in_memory(SECRET));
        let (first, _) = create(&app, "Ada", "Lovelace").await;
        let (second, _) = create(&app, "Alan", "Turing").await;

        for path in ["/accounts", "/account"] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = send(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);

            let listed = body_json(response).await;
            let listed = listed.as_array().unwrap();
            assert_eq!(listed.len(), 2);
            assert!(listed.contains(&first));
            assert!(listed.contains(&second));
        }
    }

    #[tokio::test]
    async fn transfer_echoes_without_touching_balances() {
        let state = AppState::in_memory(SECRET);
        let app = router(state.clone());
        let (created, _) = create(&app, "Ada", "Lovelace").await;

        let payload = json!({ "toAccount": created["id"], "amount": 50 });
        let response = send(&app, json_request("POST", "/transfer", payload.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, payload);

        let literal = json!({ "toAccount": 7, "amount": 50 });
        let response = send(&app, json_request("POST", "/transfer", literal.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, literal);

        let accounts = state.store.get_accounts().unwrap();
        assert!(accounts.iter().all(|a| a.balance == 0));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = router(AppState::in_memory(SECRET));

        let request = Request::builder()
            .method("POST")
            .uri("/account")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["Error"].is_string());

        let response = send(
            &app,
            json_request("POST", "/transfer", json!({ "toAccount": "seven" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bodies_without_content_type_are_accepted() {
        let app = router(AppState::in_memory(SECRET));

        let request = Request::builder()
            .method("POST")
            .uri("/account")
            .body(Body::from(r#"{"firstname":"Ada","lastname":"Lovelace"}"#))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TOKEN_HEADER));
        let created = body_json(response).await;
        assert_eq!(created["firstname"], "Ada");

        let request = Request::builder()
            .method("POST")
            .uri("/transfer")
            .body(Body::from(r#"{"toAccount":7,"amount":50}"#))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "toAccount": 7, "amount": 50 })
        );
    }

    #[tokio::test]
    async fn unsupported_method_on_health_is_bad_request() {
        let app = router(AppState::in_memory(SECRET));

        let request = Request::builder()
            .method("POST")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "Error": "method not allowed POST" })
        );
    }

    #[tokio::test]
    async fn unsupported_method_is_bad_request() {
        let app = router(AppState::in_memory(SECRET));

        let request = Request::builder()
            .method("PUT")
            .uri("/account")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "Error": "method not allowed PUT" })
        );
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(AppState::in_memory(SECRET));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/account", "/accounts", "/account/{id}", "/transfer", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
