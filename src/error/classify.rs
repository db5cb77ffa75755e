//! HTTP failure classification.

use reqwest::header::HeaderMap;

use super::GeneratorError;

/// Request/trace identifier headers worth echoing back in error messages.
const REQUEST_ID_HEADERS: [&str; 4] = [
    "x-request-id",
    "x-correlation-id",
    "x-trace-id",
    "traceparent",
];

/// Classify a non-success HTTP response into a `GeneratorError`.
///
/// 429 maps to `RateLimitError` (carrying the `Retry-After` hint), everything
/// else maps to `ApiError` with the original status so that
/// [`GeneratorError::is_retryable`] can tell 408/5xx apart from permanent 4xx.
pub fn classify_http_error(
    method: &str,
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
) -> GeneratorError {
    let request_ids: Vec<String> = REQUEST_ID_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{name}={v}"))
        })
        .collect();
    let ids_suffix = if request_ids.is_empty() {
        String::new()
    } else {
        format!(" ids=[{}]", request_ids.join(","))
    };
    // Limit body sample size to avoid noisy logs
    let body_sample = body_text.chars().take(200).collect::<String>();

    if status == 429 {
        let retry_after = headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        return GeneratorError::RateLimitError(format!(
            "method={method} http=429 retry_after={retry_after}{ids_suffix} body_sample={body_sample}"
        ));
    }

    let message = if body_text.trim().is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("api error")
            .to_string()
    } else {
        body_sample
    };
    let details = match serde_json::from_str::<serde_json::Value>(body_text) {
        Ok(json) => serde_json::json!({
            "status": status,
            "method": method,
            "response": json,
            "request_ids": request_ids,
        }),
        Err(_) => serde_json::json!({
            "status": status,
            "method": method,
            "raw": body_text,
            "request_ids": request_ids,
        }),
    };
    GeneratorError::api_error_with_details(status, format!("{message}{ids_suffix}"), details)
}
