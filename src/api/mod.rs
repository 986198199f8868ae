// API module entry
// Customer CRUD surface over HTTP+JSON

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Customer API route handler
///
/// Dispatches to handler functions based on request path and method. The
/// path is received pre-normalized (trailing slashes stripped) from the
/// router.
pub async fn handle_customers<B>(
    req: Request<B>,
    state: Arc<AppState>,
    path: &str,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();

    match split_path(path) {
        // Collection: /customers
        Some(None) => match method {
            Method::GET => handlers::list_customers(&state).await,
            Method::POST => handlers::create_customer(req, &state).await,
            _ => {
                logger::log_api_request(method.as_str(), path, 405);
                Ok(http::build_405_response("GET, POST"))
            }
        },
        // Item: /customers/{id}
        Some(Some(token)) => match method {
            Method::GET => handlers::get_customer(&state, token).await,
            Method::PUT => handlers::update_customer(req, &state, token).await,
            Method::DELETE => handlers::delete_customer(&state, token).await,
            _ => {
                logger::log_api_request(method.as_str(), path, 405);
                Ok(http::build_405_response("GET, PUT, DELETE"))
            }
        },
        // Nested deeper than an item path
        None => {
            logger::log_api_request(method.as_str(), path, 404);
            Ok(response::not_found())
        }
    }
}

/// Split a normalized API path into collection (`None`) or item (`Some(token)`).
///
/// Returns `None` for paths nested deeper than `/customers/{id}`.
fn split_path(path: &str) -> Option<Option<&str>> {
    let rest = path.strip_prefix("/customers")?;
    if rest.is_empty() {
        return Some(None);
    }

    let token = rest.strip_prefix('/')?;
    if token.is_empty() || token.contains('/') {
        None
    } else {
        Some(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{Customer, CustomerStore};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use uuid::Uuid;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("nonexistent-config").unwrap();
        Arc::new(AppState::with_store(config, CustomerStore::seeded()))
    }

    fn request(method: Method, path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        path: &str,
        body: &str,
    ) -> Response<Full<Bytes>> {
        let req = request(method, path, body);
        handle_customers(req, Arc::clone(state), path).await.unwrap()
    }

    async fn body_value(resp: Response<Full<Bytes>>) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/customers"), Some(None));
        assert_eq!(split_path("/customers/abc"), Some(Some("abc")));
        assert_eq!(split_path("/customers/a/b"), None);
        assert_eq!(split_path("/customersabc"), None);
        assert_eq!(split_path("/other"), None);
    }

    #[tokio::test]
    async fn test_list_returns_seeded_records() {
        let state = test_state();
        let resp = send(&state, Method::GET, "/customers", "").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );

        let map = body_value(resp).await;
        let object = map.as_object().unwrap();
        assert_eq!(object.len(), 5);
        for (key, record) in object {
            // Keys are the string form of each record's identifier
            assert_eq!(record["ID"], key.as_str());
        }
    }

    #[tokio::test]
    async fn test_get_created_record_round_trips() {
        let state = test_state();
        let resp = send(
            &state,
            Method::POST,
            "/customers",
            r#"{"Name": "New Person", "Role": "Basic Customer", "Email": "new@example.com", "Phone": 5551234, "Contacted": true}"#,
        )
        .await;
        assert_eq!(resp.status(), 201);
        let created = body_value(resp).await;

        let id = created["ID"].as_str().unwrap().to_string();
        let resp = send(&state, Method::GET, &format!("/customers/{id}"), "").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_value(resp).await, created);
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_id() {
        let state = test_state();
        let supplied = Uuid::new_v4();
        let resp = send(
            &state,
            Method::POST,
            "/customers",
            &format!(r#"{{"ID": "{supplied}", "Name": "Picky Client"}}"#),
        )
        .await;
        assert_eq!(resp.status(), 201);

        let created = body_value(resp).await;
        assert_ne!(created["ID"].as_str().unwrap(), supplied.to_string());
        // Absent fields decode to their zero values
        assert_eq!(created["Role"], "");
        assert_eq!(created["Phone"], 0);
        assert_eq!(created["Contacted"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let state = test_state();
        let before = state.store.len().await;

        let resp = send(&state, Method::POST, "/customers", "{not json").await;
        assert_eq!(resp.status(), 400);
        assert_eq!(body_value(resp).await["error"], "Invalid Customer data");
        assert_eq!(state.store.len().await, before);
    }

    #[tokio::test]
    async fn test_update_forces_path_id_and_replaces_wholesale() {
        let state = test_state();
        let stored = state
            .store
            .create(Customer::new(
                "Before",
                "Basic Customer",
                "before@example.com",
                111,
                true,
            ))
            .await;

        let body_id = Uuid::new_v4();
        let resp = send(
            &state,
            Method::PUT,
            &format!("/customers/{}", stored.id),
            &format!(r#"{{"ID": "{body_id}", "Name": "After"}}"#),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let updated = body_value(resp).await;
        assert_eq!(updated["ID"].as_str().unwrap(), stored.id.to_string());
        assert_eq!(updated["Name"], "After");
        // Full replace, not a merge: fields absent from the body zero out
        assert_eq!(updated["Email"], "");
        assert_eq!(updated["Phone"], 0);
        assert_eq!(updated["Contacted"], false);

        let kept = state.store.get(stored.id).await.unwrap();
        assert_eq!(kept.name, "After");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404_before_body_parsing() {
        let state = test_state();
        // Malformed body, but the unknown id answers first
        let resp = send(
            &state,
            Method::PUT,
            &format!("/customers/{}", Uuid::new_v4()),
            "{not json",
        )
        .await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_value(resp).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_json() {
        let state = test_state();
        let stored = state
            .store
            .create(Customer::new("Keep", "Basic Customer", "keep@example.com", 1, false))
            .await;

        let resp = send(
            &state,
            Method::PUT,
            &format!("/customers/{}", stored.id),
            "{not json",
        )
        .await;
        assert_eq!(resp.status(), 400);
        assert_eq!(body_value(resp).await["error"], "Invalid Customer data");

        // Mapping unchanged
        assert_eq!(state.store.get(stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let state = test_state();
        let before = state.store.len().await;
        let id = *state.store.list().await.keys().next().unwrap();

        let resp = send(&state, Method::DELETE, &format!("/customers/{id}"), "").await;
        assert_eq!(resp.status(), 204);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());

        assert_eq!(state.store.len().await, before - 1);

        let resp = send(&state, Method::GET, &format!("/customers/{id}"), "").await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_value(resp).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_400_for_get_put_delete() {
        let state = test_state();
        let before = state.store.len().await;

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let resp = send(&state, method, "/customers/not-a-uuid", "{}").await;
            assert_eq!(resp.status(), 400);
            assert_eq!(body_value(resp).await["error"], "Invalid UUID");
        }
        assert_eq!(state.store.len().await, before);
    }

    #[tokio::test]
    async fn test_unknown_uuid_is_404_for_get_put_delete() {
        let state = test_state();
        let unknown = Uuid::new_v4();

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let resp = send(&state, method, &format!("/customers/{unknown}"), "{}").await;
            assert_eq!(resp.status(), 404);
            assert_eq!(body_value(resp).await, serde_json::json!({}));
        }
    }

    #[tokio::test]
    async fn test_unsupported_methods_are_405() {
        let state = test_state();

        let resp = send(&state, Method::PATCH, "/customers", "").await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, POST");

        let id = Uuid::new_v4();
        let resp = send(&state, Method::POST, &format!("/customers/{id}"), "").await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, PUT, DELETE");
    }

    #[tokio::test]
    async fn test_deeper_paths_are_404() {
        let state = test_state();
        let resp = send(&state, Method::GET, "/customers/a/b", "").await;
        assert_eq!(resp.status(), 404);
    }
}
