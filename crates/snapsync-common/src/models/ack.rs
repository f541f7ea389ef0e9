//! Small acknowledgement bodies returned by mutating routes.

use serde::Serialize;

/// Generic `{ "message": ... }` acknowledgement used by the delete routes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Generic `{ "success": true }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}
