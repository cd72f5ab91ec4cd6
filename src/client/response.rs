//! Response normalization shared by every client operation.

use reqwest::Response;
use serde_json::Value;

use crate::error::{Error, Result};

/// Reads the body of a response, failing on any non-2xx status.
///
/// A non-2xx response becomes [`Error::Api`] carrying the status and the
/// raw body text. The error body is never parsed.
pub(crate) async fn read_success_body(
    target: &str,
    timeout_secs: u64,
    response: Response,
) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::from_transport(target, timeout_secs, e))?;

    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}

/// Parses a success body as JSON; an empty body is an error.
pub(crate) fn decode_json(target: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::Decode {
        target: target.to_string(),
        message: e.to_string(),
    })
}

/// Parses a success body as JSON; an empty body becomes `null`.
pub(crate) fn decode_json_or_null(target: &str, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    decode_json(target, text)
}
