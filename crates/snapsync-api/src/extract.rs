//! Request extractors.
//!
//! Thin wrappers over axum's extractors whose rejection is a [`SnapError`], so a bad body,
//! path or query string gets the usual `{ "error", "code" }` shape.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use snapsync_common::error::SnapError;

/// `Json` with a [`SnapError`] rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(SnapError))]
pub struct ApiJson<T>(pub T);

/// `Path` with a [`SnapError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(SnapError))]
pub struct ApiPath<T>(pub T);

/// `Query` with a [`SnapError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(SnapError))]
pub struct ApiQuery<T>(pub T);

/// `Multipart` with a [`SnapError`] rejection.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = SnapError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Multipart::from_request(req, state).await?))
    }
}
