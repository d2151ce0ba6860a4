//! # CLI Module
//!
//! User-facing commands. Each command loads what it needs from the
//! [`Config`](crate::config::Config), delegates to the workflow in
//! [`crate::matching`] or the Spotify layer, and reports the outcome on the
//! console.
//!
//! ## Commands
//!
//! - [`auth`] - Authorizes with Spotify and caches the token
//! - [`search`] - Lists tracks titled exactly like the keyword
//! - [`playlist`] - Builds the playlist for a keyword
//!
//! ## Usage Patterns
//!
//! ```bash
//! matchlist auth              # Authorize once; the token is cached per user
//! matchlist search Fall       # Preview the exact matches
//! matchlist playlist Fall     # Create the playlist "Fall"
//! ```
//!
//! Authorization failures end the process with exit code 1. Failed search
//! pages and failed playlist requests are reported as warnings.

mod auth;
mod playlist;
mod search;

pub use auth::auth;
pub use playlist::playlist;
pub use search::search;
