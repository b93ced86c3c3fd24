//! Router configuration for the gateway.
//!
//! The HTTP surface is declared as one static route table ([`ROUTES`]) and
//! the router is assembled by iterating it. The table is plain data, so the
//! full surface can be inspected and tested without starting a server; the
//! dual-platform route pairs share handlers and differ only in the
//! [`Platform`] value injected per route.
//!
//! # Route Structure
//!
//! ```text
//! /                          - Service identity (public)
//! /token                     - Token probe (protected, like all below)
//! /settings                  - GET current document / POST partial update
//! /douyin/share              - also /tiktok/share
//! /douyin/detail             - also /tiktok/detail
//! /douyin/account            - also /tiktok/account
//! /douyin/mix                - also /tiktok/mix
//! /douyin/live               - also /tiktok/live
//! /douyin/comment
//! /douyin/reply
//! /douyin/search/{general,video,user,live}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use douk_gateway::server::routes::{create_router, RouterConfig};
//!
//! let state = AppState::new(extractor, settings);
//! let router = create_router(state, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5555").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, on, MethodFilter, MethodRouter},
    Extension, Router,
};
use http::header::{HeaderName, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, TokenAuth, TOKEN_HEADER};
use super::handlers::{
    account_handler, comment_handler, detail_handler, get_settings_handler, info_handler,
    live_handler, mix_handler, reply_handler, search_general_handler, search_live_handler,
    search_user_handler, search_video_handler, share_handler, token_handler,
    update_settings_handler, AppState,
};
use crate::extract::Extractor;
use crate::platform::Platform;

// =============================================================================
// Route Table
// =============================================================================

/// HTTP method of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
}

impl RouteMethod {
    fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
        }
    }
}

/// The operation a table entry dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Token,
    GetSettings,
    UpdateSettings,
    Share,
    Detail,
    Account,
    Mix,
    Live,
    Comment,
    Reply,
    SearchGeneral,
    SearchVideo,
    SearchUser,
    SearchLive,
}

/// One declared route: method, path, operation, and the platform injected
/// into the handler. Only the dual-platform pairs carry a platform; the
/// single-platform routes encode it in their path prefix and their handlers
/// take none.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub method: RouteMethod,
    pub path: &'static str,
    pub operation: Operation,
    pub platform: Option<Platform>,
}

/// Every token-guarded route. The public `/` identity route is the one route
/// deliberately outside the table, since it bypasses the auth gate.
pub static ROUTES: &[RouteSpec] = &[
    RouteSpec {
        method: RouteMethod::Get,
        path: "/token",
        operation: Operation::Token,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Get,
        path: "/settings",
        operation: Operation::GetSettings,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/settings",
        operation: Operation::UpdateSettings,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/share",
        operation: Operation::Share,
        platform: Some(Platform::Douyin),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/tiktok/share",
        operation: Operation::Share,
        platform: Some(Platform::Tiktok),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/detail",
        operation: Operation::Detail,
        platform: Some(Platform::Douyin),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/tiktok/detail",
        operation: Operation::Detail,
        platform: Some(Platform::Tiktok),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/account",
        operation: Operation::Account,
        platform: Some(Platform::Douyin),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/tiktok/account",
        operation: Operation::Account,
        platform: Some(Platform::Tiktok),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/mix",
        operation: Operation::Mix,
        platform: Some(Platform::Douyin),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/tiktok/mix",
        operation: Operation::Mix,
        platform: Some(Platform::Tiktok),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/live",
        operation: Operation::Live,
        platform: Some(Platform::Douyin),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/tiktok/live",
        operation: Operation::Live,
        platform: Some(Platform::Tiktok),
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/comment",
        operation: Operation::Comment,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/reply",
        operation: Operation::Reply,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/search/general",
        operation: Operation::SearchGeneral,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/search/video",
        operation: Operation::SearchVideo,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/search/user",
        operation: Operation::SearchUser,
        platform: None,
    },
    RouteSpec {
        method: RouteMethod::Post,
        path: "/douyin/search/live",
        operation: Operation::SearchLive,
        platform: None,
    },
];

/// The declared route table, for inspection and tests.
pub fn route_table() -> &'static [RouteSpec] {
    ROUTES
}

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Default)]
pub struct RouterConfig {
    /// API token override; wins over the settings document when set
    pub token_override: Option<String>,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a configuration with defaults: token from the settings
    /// document, any CORS origin, tracing enabled.
    pub fn new() -> Self {
        Self {
            token_override: None,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Override the expected API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token_override = Some(token.into());
        self
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router from the route table.
///
/// Every table route sits behind the token auth middleware; only the root
/// identity route is public. CORS and optional request tracing wrap both.
pub fn create_router<E>(state: AppState<E>, config: RouterConfig) -> Router
where
    E: Extractor + 'static,
{
    let auth = TokenAuth::new(Arc::clone(&state.settings), config.token_override.clone());
    let cors = build_cors_layer(&config);

    let mut protected = Router::new();
    for spec in ROUTES {
        protected = protected.route(spec.path, method_router_for::<E>(spec));
    }
    let protected = protected
        .with_state(state)
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    let public = Router::new().route("/", get(info_handler));

    let router = Router::new().merge(protected).merge(public).layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Resolve a table entry to its handler, with the platform injected as a
/// request extension for the dual-platform routes.
fn method_router_for<E>(spec: &RouteSpec) -> MethodRouter<AppState<E>>
where
    E: Extractor + 'static,
{
    let filter = spec.method.filter();
    let handler = match spec.operation {
        Operation::Token => on(filter, token_handler),
        Operation::GetSettings => on(filter, get_settings_handler::<E>),
        Operation::UpdateSettings => on(filter, update_settings_handler::<E>),
        Operation::Share => on(filter, share_handler::<E>),
        Operation::Detail => on(filter, detail_handler::<E>),
        Operation::Account => on(filter, account_handler::<E>),
        Operation::Mix => on(filter, mix_handler::<E>),
        Operation::Live => on(filter, live_handler::<E>),
        Operation::Comment => on(filter, comment_handler::<E>),
        Operation::Reply => on(filter, reply_handler::<E>),
        Operation::SearchGeneral => on(filter, search_general_handler::<E>),
        Operation::SearchVideo => on(filter, search_video_handler::<E>),
        Operation::SearchUser => on(filter, search_user_handler::<E>),
        Operation::SearchLive => on(filter, search_live_handler::<E>),
    };

    match spec.platform {
        Some(platform) => handler.layer(Extension(platform)),
        None => handler,
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(TOKEN_HEADER)])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
