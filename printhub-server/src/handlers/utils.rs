use std::collections::HashMap;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::error::ApiError;

/// Owner identity is installed by the fronting auth proxy, not verified here.
pub const OWNER_HEADER: &str = "x-owner-id";

pub fn require_owner(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(OWNER_HEADER)
        .ok_or_else(|| ApiError::forbidden("missing x-owner-id header"))?
        .to_str()
        .map_err(|_| ApiError::bad_request("invalid x-owner-id header"))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("invalid x-owner-id header"))
}

pub fn path_uuid(path: &HashMap<String, String>, key: &str) -> Result<Uuid, ApiError> {
    let raw = path
        .get(key)
        .ok_or_else(|| ApiError::not_found(format!("{key} missing")))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("invalid {key}")))
}
