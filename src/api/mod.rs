//! # API Module
//!
//! HTTP endpoints served by the local callback server during authorization.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server,
//!   verifies the `state` parameter and hands the authorization code (or the
//!   denial reason) back to the waiting authorization flow.
//! - [`health`] - Returns application status and version information.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use matchlist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
