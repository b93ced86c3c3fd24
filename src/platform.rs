//! Supported short-video platforms.
//!
//! Most gateway operations exist in a pair of route variants, one per
//! platform, sharing a single handler body. The platform value decides which
//! identifier fields are authoritative (e.g. `web_rid` vs `room_id` for live
//! rooms) and which upstream endpoints the engine targets.

use serde::{Deserialize, Serialize};

/// A supported short-video platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// The primary platform (douyin).
    Douyin,

    /// The secondary platform (tiktok).
    Tiktok,
}

impl Platform {
    /// Short name used in route paths and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Douyin => "douyin",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Route prefix for this platform's operation variants.
    pub fn route_prefix(&self) -> &'static str {
        match self {
            Platform::Douyin => "/douyin",
            Platform::Tiktok => "/tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
