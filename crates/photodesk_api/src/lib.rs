//! Request/response boundary for photodesk callers.
//!
//! Route-shaped entry points over the core orchestrators. Transport framing
//! (HTTP parsing, multipart decoding) belongs to whichever server embeds
//! this crate.

mod api;
mod error;

pub use api::{Api, ApiResponse, PhotoDownload};
pub use error::ApiError;
