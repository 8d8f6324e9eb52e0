//! HTTP error handling shared by the chat providers.
//!
//! Groq, OpenAI, and Anthropic all speak JSON over HTTPS and fail in the
//! same three ways: a rate limit, a rejected key, or a generic API error
//! (which Anthropic sometimes reports inside a 200 body). Each path maps to
//! the matching `AaryaError` variant so retry decisions stay in one place.

use crate::errors::AaryaError;
use crate::providers::base::ProviderMetrics;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Decode a provider response into its JSON body, turning HTTP failures and
/// body-level `error` objects into typed errors. Counts failures against the
/// provider's metrics.
pub async fn check_response(
    resp: reqwest::Response,
    provider: &str,
    metrics: &Arc<Mutex<ProviderMetrics>>,
) -> anyhow::Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        count_error(metrics);
        warn!("{provider} request failed with status {status}");
        return Err(status_error(status.as_u16(), retry_after, &body).into());
    }

    let json: Value = resp
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("malformed {provider} API response: {e}"))?;

    // Failures reported inside a successful body.
    if let Some(err) = json.get("error") {
        count_error(metrics);
        let body = serde_json::to_string(err).unwrap_or_else(|_| "unknown error".to_string());
        warn!("{provider} returned an error body: {body}");
        return Err(api_error(200, &body).into());
    }

    Ok(json)
}

fn count_error(metrics: &Arc<Mutex<ProviderMetrics>>) {
    if let Ok(mut m) = metrics.lock() {
        m.error_count += 1;
    }
}

/// Map an unsuccessful HTTP status to the matching error variant.
fn status_error(status: u16, retry_after: Option<u64>, body: &str) -> AaryaError {
    match status {
        429 => AaryaError::RateLimit { retry_after },
        401 | 403 => AaryaError::Auth(format!("authentication rejected: {body}")),
        _ => api_error(status, body),
    }
}

/// Build a provider error from the response body, pulling `error.type` and
/// `error.message` out when the body is JSON. Only 5xx statuses that signal
/// transient overload are marked retryable.
fn api_error(status: u16, body: &str) -> AaryaError {
    let retryable = matches!(status, 500 | 502 | 503);
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(err) = json.get("error")
    {
        let kind = err.get("type").and_then(Value::as_str).unwrap_or("unknown");
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return AaryaError::Provider {
            message: format!("{kind}: {message}"),
            retryable,
        };
    }
    AaryaError::Provider {
        message: format!("HTTP {status}: {body}"),
        retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_carries_retry_after() {
        match status_error(429, Some(30), "slow down") {
            AaryaError::RateLimit { retry_after } => assert_eq!(retry_after, Some(30)),
            other => panic!("expected RateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_statuses_map_to_auth_error() {
        for status in [401, 403] {
            match status_error(status, None, "bad key") {
                AaryaError::Auth(msg) => assert!(msg.contains("bad key")),
                other => panic!("expected Auth, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_overload_statuses_are_retryable() {
        for status in [500, 502, 503] {
            match status_error(status, None, "overloaded") {
                AaryaError::Provider { retryable, .. } => assert!(retryable),
                other => panic!("expected Provider, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_client_error_is_not_retryable() {
        match api_error(400, r#"{"error": {"type": "invalid_request", "message": "bad field"}}"#) {
            AaryaError::Provider { message, retryable } => {
                assert!(message.contains("invalid_request"));
                assert!(message.contains("bad field"));
                assert!(!retryable);
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_falls_back_to_raw_text() {
        match api_error(503, "upstream timeout") {
            AaryaError::Provider { message, retryable } => {
                assert!(message.contains("503"));
                assert!(message.contains("upstream timeout"));
                assert!(retryable);
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }
}
