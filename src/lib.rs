//! # DouK Gateway
//!
//! An HTTP gateway exposing douyin/tiktok content-extraction operations as a
//! token-guarded JSON API with a uniform response envelope.
//!
//! The gateway itself only orchestrates: it validates schema-parsed requests,
//! hands normalized parameters to an extraction engine behind the
//! [`Extractor`](extract::Extractor) trait, and maps the tagged result onto
//! the `{message, data, params}` envelope. Business outcomes always answer
//! with HTTP 200; only the auth gate uses a distinct status (403).
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`platform`] - The two supported platforms and their route pairing
//! - [`schemas`] - Request body schemas for every operation
//! - [`validate`] - Semantic validation beyond schema shape
//! - [`envelope`] - The uniform response envelope
//! - [`extract`] - The engine trait and the reqwest-backed web engine
//! - [`server`] - Axum-based HTTP server, auth gate, and route table
//! - [`config`] - CLI arguments and the runtime settings document
//!
//! ## Example
//!
//! ```rust,no_run
//! use douk_gateway::{
//!     config::{Settings, SettingsStore},
//!     extract::WebExtractor,
//!     server::{create_router, AppState, RouterConfig},
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = SettingsStore::ephemeral(Settings::default());
//!     let extractor = WebExtractor::new(&Settings::default()).unwrap();
//!     let state = AppState::new(extractor, settings);
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5555").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod platform;
pub mod schemas;
pub mod server;
pub mod validate;

// Re-export commonly used types
pub use config::{Config, Settings, SettingsStore, SettingsUpdate};
pub use envelope::Envelope;
pub use error::{ExtractError, SettingsError};
pub use extract::{Extractor, FetchOptions, Record, WebExtractor};
pub use platform::Platform;
pub use server::{create_router, AppState, RouterConfig};
