//! Request body → JSON document

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::core::error::AppResult;

/// Decodes a webhook body.
///
/// When the transport flags the body as base64, it is decoded first, then
/// read as UTF-8. Any failure, including an empty body, means the request
/// is malformed (`400`).
pub fn decode_body(body: Option<&str>, is_base64_encoded: bool) -> AppResult<Value> {
    let raw = body.unwrap_or_default();

    let text = if is_base64_encoded {
        String::from_utf8(STANDARD.decode(raw.trim())?)?
    } else {
        raw.to_string()
    };

    Ok(serde_json::from_str(&text)?)
}
