//! Error mapping for service-specific APIs
//!
//! This module provides mapping functions to convert service-specific
//! error responses to our normalized ServiceError type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};

/// Map a ticketing-system error payload to a ServiceError
///
/// The ticketing system reports failures as
/// `{"errorMessages": ["..."], "errors": {...}}`.
pub fn map_ticketing_error(
    status: StatusCode,
    json: &Value,
    context: &mut ErrorContext,
) -> ServiceError {
    context.service = "ticketing".to_string();

    let message = json
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .and_then(|messages| {
            let joined = messages
                .iter()
                .filter_map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        })
        .or_else(|| {
            json.get("errors")
                .filter(|e| e.as_object().map_or(false, |o| !o.is_empty()))
                .map(|e| e.to_string())
        })
        .unwrap_or_else(|| "Unknown ticketing error".to_string());

    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::BAD_REQUEST => ServiceError::validation(message),
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        _ => ServiceError::service(message),
    }
}

/// Map a commerce-platform error payload to a ServiceError
///
/// The commerce platform reports failures as
/// `{"error_code": "...", "errors": ["..."]}`.
pub fn map_commerce_error(
    status: StatusCode,
    json: &Value,
    context: &mut ErrorContext,
) -> ServiceError {
    context.service = "commerce".to_string();

    if let Some(code) = json.get("error_code").and_then(|c| c.as_str()) {
        context.error_code = Some(code.to_string());
    }

    let message = json
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|errors| {
            let joined = errors
                .iter()
                .filter_map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        })
        .unwrap_or_else(|| "Unknown commerce platform error".to_string());

    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::BAD_REQUEST => ServiceError::validation(message),
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        _ => ServiceError::service(message),
    }
}

/// Map a generic HTTP error to a ServiceError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    // Try to parse as JSON first
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match context.service.as_str() {
            "ticketing" => return map_ticketing_error(status, &json, context),
            "commerce" => return map_commerce_error(status, &json, context),
            _ => {
                // Generic JSON error handling
                let message = json
                    .get("message")
                    .or_else(|| json.get("error"))
                    .and_then(|m| m.as_str())
                    .unwrap_or(body);

                return status_to_error(status, message.to_string());
            }
        }
    }

    // Fallback to status-based mapping
    let message = if body.is_empty() {
        status.to_string()
    } else if body.len() > 100 {
        format!("{}: {:.100}...", status, body)
    } else {
        format!("{}: {}", status, body)
    };

    status_to_error(status, message)
}

fn status_to_error(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::BAD_REQUEST => ServiceError::validation(message),
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT => ServiceError::timeout(message),
        _ => ServiceError::service(message),
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        500..=599 => "server",
        _ => "unknown",
    }
}
