//! axum extractors whose rejections render as the JSON envelope with `400`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::TrackerError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(TrackerError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(TrackerError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(TrackerError))]
pub struct AppPath<T>(pub T);
