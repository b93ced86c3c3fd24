//! HTTP server layer for the gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                            │
//! │        POST /{platform}/{operation}  (token guarded)          │
//! │                                                               │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │  handlers   │  │     auth     │  │        routes        │  │
//! │  │ (envelope)  │  │ (token gate) │  │  (route table)       │  │
//! │  └─────────────┘  └──────────────┘  └──────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, AuthError, TokenAuth, TOKEN_HEADER};
pub use handlers::{
    account_handler, comment_handler, detail_handler, get_settings_handler, info_handler,
    live_handler, mix_handler, reply_handler, search_general_handler, search_live_handler,
    search_user_handler, search_video_handler, share_handler, token_handler,
    update_settings_handler, AppState, InfoResponse,
};
pub use routes::{
    create_router, route_table, Operation, RouteMethod, RouteSpec, RouterConfig, ROUTES,
};
