use std::collections::VecDeque;

use base64::{Engine, engine::general_purpose};
use chrono::Utc;
use common::error::ChargeError;
use serde_json::Value;

use crate::dtos::charge::{ChargeResult, PaymentCode};

/// Every PIX copy-paste payload (EMV "Copia e Cola") starts with this.
pub const PIX_PREFIX: &str = "000201";

const CODE_FIELDS: &[&str] = &["pix_qr_code", "pix_code", "qr_code", "copy_paste", "emv"];
const IMAGE_FIELDS: &[&str] = &[
    "qr_code_base64",
    "pix_qr_code_url",
    "qr_code_url",
    "qr_code_image",
];
const REDIRECT_FIELDS: &[&str] = &["payment_url", "checkout_url", "redirect_url"];
const REFERENCE_FIELDS: &[&str] = &["hash", "id", "transaction_hash", "transaction_id"];

// shorter strings are never treated as inline images
const MIN_INLINE_IMAGE_LEN: usize = 50;

/// Turns a successful gateway response into a `ChargeResult`.
///
/// A PIX code wins over a redirect URL. Having neither is an error, a result
/// is never returned with an empty payment code.
pub fn parse_charge_response(body: &Value) -> Result<ChargeResult, ChargeError> {
    let payment_code = if let Some(code) = locate_pix_code(body) {
        PaymentCode::Pix(code.to_string())
    } else if let Some(url) = locate_redirect_url(body) {
        PaymentCode::Redirect {
            url: url.to_string(),
        }
    } else {
        return Err(ChargeError::NoPaymentCodeFound);
    };

    Ok(ChargeResult {
        payment_code,
        qr_image_source: locate_qr_image(body),
        reference_id: locate_reference_id(body),
    })
}

/// Known objects, most specific first: `data.pix`, `data`, `pix`, then the root.
fn containers(body: &Value) -> Vec<&Value> {
    let data = body.get("data");
    [
        data.and_then(|d| d.get("pix")),
        data,
        body.get("pix"),
        Some(body),
    ]
    .into_iter()
    .flatten()
    .filter(|v| v.is_object())
    .collect()
}

fn as_pix_code(value: &Value) -> Option<&str> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| s.starts_with(PIX_PREFIX))
}

/// Looks up the PIX code at the known paths, then anywhere in the tree.
pub fn locate_pix_code(body: &Value) -> Option<&str> {
    containers(body)
        .into_iter()
        .flat_map(|container| CODE_FIELDS.iter().filter_map(move |f| container.get(*f)))
        .find_map(as_pix_code)
        .or_else(|| deep_search(body))
}

/// Breadth-first walk of the whole tree. Object members are visited in the
/// order the gateway sent them, array items by index. First match wins.
pub fn deep_search(body: &Value) -> Option<&str> {
    let mut queue = VecDeque::from([body]);
    while let Some(node) = queue.pop_front() {
        match node {
            Value::String(_) => {
                if let Some(code) = as_pix_code(node) {
                    return Some(code);
                }
            }
            Value::Object(map) => queue.extend(map.values()),
            Value::Array(items) => queue.extend(items.iter()),
            _ => {}
        }
    }
    None
}

pub fn locate_redirect_url(body: &Value) -> Option<&str> {
    let data = body.get("data").filter(|d| d.is_object());
    [data, Some(body)]
        .into_iter()
        .flatten()
        .flat_map(|container| REDIRECT_FIELDS.iter().filter_map(move |f| container.get(*f)))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|url| !url.is_empty())
}

/// Returns a displayable image source, or an empty string.
pub fn locate_qr_image(body: &Value) -> String {
    containers(body)
        .into_iter()
        .flat_map(|container| IMAGE_FIELDS.iter().filter_map(move |f| container.get(*f)))
        .filter_map(Value::as_str)
        .find_map(image_source)
        .unwrap_or_default()
}

/// URLs and data URIs pass as they are, raw base64 becomes a PNG data URI.
fn image_source(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("data:image") {
        return Some(raw.to_string());
    }
    if raw.len() > MIN_INLINE_IMAGE_LEN && general_purpose::STANDARD.decode(raw).is_ok() {
        return Some(format!("data:image/png;base64,{}", raw));
    }
    None
}

/// Gateway transaction id, or `tx_<unix millis>` when the response has none.
pub fn locate_reference_id(body: &Value) -> String {
    let data = body.get("data").filter(|d| d.is_object());
    [data, Some(body)]
        .into_iter()
        .flatten()
        .flat_map(|container| REFERENCE_FIELDS.iter().filter_map(move |f| container.get(*f)))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("tx_{}", Utc::now().timestamp_millis()))
}

/// Human-readable reason of a rejected request.
///
/// Prefers `message`; otherwise flattens every value of the `errors` map into
/// one comma-joined string; otherwise falls back to the status code.
pub fn rejection_detail(body: &Value, status: u16) -> String {
    if let Some(message) = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
    {
        return message.to_string();
    }

    if let Some(Value::Object(errors)) = body.get("errors") {
        let mut parts = Vec::new();
        for value in errors.values() {
            flatten_messages(value, &mut parts);
        }
        if !parts.is_empty() {
            return parts.join(", ");
        }
    }

    format!("HTTP {}", status)
}

fn flatten_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| flatten_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| flatten_messages(v, out)),
        Value::Null => {}
        other => out.push(other.to_string()),
    }
}
