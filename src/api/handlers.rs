// Customer CRUD handlers module

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use uuid::Uuid;

use super::response::{bad_request, json_response, no_content, not_found};
use crate::config::AppState;
use crate::logger;
use crate::store::Customer;

/// List every customer record, keyed by identifier
pub async fn list_customers(state: &AppState) -> Result<Response<Full<Bytes>>, Infallible> {
    let records = state.store.list().await;

    logger::log_api_request("GET", "/customers", 200);
    json_response(StatusCode::OK, &records)
}

/// Fetch a single customer by the path identifier
pub async fn get_customer(
    state: &AppState,
    token: &str,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let Ok(id) = Uuid::parse_str(token) else {
        logger::log_api_request("GET", &format!("/customers/{token}"), 400);
        return Ok(bad_request("Invalid UUID"));
    };

    match state.store.get(id).await {
        Some(customer) => {
            logger::log_api_request("GET", &format!("/customers/{id}"), 200);
            json_response(StatusCode::OK, &customer)
        }
        None => {
            logger::log_api_request("GET", &format!("/customers/{id}"), 404);
            Ok(not_found())
        }
    }
}

/// Create a customer from the request body.
///
/// The identifier is always assigned server-side; any `ID` in the body is
/// overwritten.
pub async fn create_customer<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    // Read request body
    let whole_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            logger::log_api_request("POST", "/customers", 400);
            return Ok(bad_request("Invalid request body"));
        }
    };

    // Decode into a customer record
    let customer: Customer = match serde_json::from_slice(&whole_body) {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to decode customer: {e}"));
            logger::log_api_request("POST", "/customers", 400);
            return Ok(bad_request("Invalid Customer data"));
        }
    };

    let stored = state.store.create(customer).await;

    logger::log_api_request("POST", "/customers", 201);
    json_response(StatusCode::CREATED, &stored)
}

/// Replace an existing customer wholesale.
///
/// The stored identifier is forced to the path identifier; fields absent
/// from the body fall back to their zero values.
pub async fn update_customer<B>(
    req: Request<B>,
    state: &AppState,
    token: &str,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let Ok(id) = Uuid::parse_str(token) else {
        logger::log_api_request("PUT", &format!("/customers/{token}"), 400);
        return Ok(bad_request("Invalid UUID"));
    };
    let path = format!("/customers/{id}");

    // Unknown id answers before the body is read
    if !state.store.contains(id).await {
        logger::log_api_request("PUT", &path, 404);
        return Ok(not_found());
    }

    // Read request body
    let whole_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            logger::log_api_request("PUT", &path, 400);
            return Ok(bad_request("Invalid request body"));
        }
    };

    // Decode into a customer record
    let customer: Customer = match serde_json::from_slice(&whole_body) {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to decode customer: {e}"));
            logger::log_api_request("PUT", &path, 400);
            return Ok(bad_request("Invalid Customer data"));
        }
    };

    // The record may have been deleted while the body was being read; the
    // store re-checks existence under its write lock.
    match state.store.replace(id, customer).await {
        Some(updated) => {
            logger::log_api_request("PUT", &path, 200);
            json_response(StatusCode::OK, &updated)
        }
        None => {
            logger::log_api_request("PUT", &path, 404);
            Ok(not_found())
        }
    }
}

/// Delete a customer by the path identifier
pub async fn delete_customer(
    state: &AppState,
    token: &str,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let Ok(id) = Uuid::parse_str(token) else {
        logger::log_api_request("DELETE", &format!("/customers/{token}"), 400);
        return Ok(bad_request("Invalid UUID"));
    };

    if state.store.remove(id).await {
        logger::log_api_request("DELETE", &format!("/customers/{id}"), 204);
        Ok(no_content())
    } else {
        logger::log_api_request("DELETE", &format!("/customers/{id}"), 404);
        Ok(not_found())
    }
}
