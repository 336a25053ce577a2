use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::error::{err, ok};
use super::types::Request;

/// Decodes `params` into a typed struct; absent params read as `{}`.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let params = if req.params.is_null() {
        json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(params)
        .map_err(|e| err(&req.id, "bad_params", format!("invalid params: {}", e), None))
}

pub fn require<T>(req: &Request, value: Option<T>, key: &str) -> Result<T, serde_json::Value> {
    value.ok_or_else(|| err(&req.id, "bad_params", format!("missing params.{}", key), None))
}

pub fn ok_serialized<T: Serialize>(req: &Request, value: &T) -> serde_json::Value {
    match serde_json::to_value(value) {
        Ok(v) => ok(&req.id, v),
        Err(e) => err(&req.id, "serialize_failed", e.to_string(), None),
    }
}
