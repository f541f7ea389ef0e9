//! API route modules.

pub mod auth;
pub mod events;
pub mod health;
pub mod images;
pub mod logs;
pub mod stats;
pub mod users;

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Header carrying the unpaginated row count of a paged list.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// A list response. The body is always a bare JSON array; `total` is set only for paged requests.
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: Option<i64>,
}

impl<T: Serialize> IntoResponse for Listing<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.items).into_response();
        if let Some(total) = self.total {
            response
                .headers_mut()
                .insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
        }
        response
    }
}
