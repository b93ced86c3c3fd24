//! Operation-specific request validators.
//!
//! These checks express invariants the schemas alone cannot: mutually
//! exclusive identifier sets, platform-dependent identifier fields, and
//! pagination defaults. All validators are pure and synchronous; they run
//! before any engine I/O so handlers can branch on the result cheaply.

use crate::platform::Platform;

/// Cursor value meaning "start of the sequence".
pub const START_CURSOR: u64 = 0;

/// The disambiguated target of a mix (collection) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixTarget {
    /// The collection itself, by its own identifier
    Collection(String),

    /// The collection located via one of its content items
    Item(String),
}

impl MixTarget {
    pub fn is_collection(&self) -> bool {
        matches!(self, MixTarget::Collection(_))
    }

    pub fn id(&self) -> &str {
        match self {
            MixTarget::Collection(id) | MixTarget::Item(id) => id,
        }
    }
}

/// Platform-specific live room identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveIdent {
    /// Douyin web room identifier
    WebRid(String),

    /// Tiktok numeric room identifier
    RoomId(String),
}

impl LiveIdent {
    pub fn id(&self) -> &str {
        match self {
            LiveIdent::WebRid(id) | LiveIdent::RoomId(id) => id,
        }
    }
}

/// An explicitly-empty identifier counts as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Disambiguate a mix request.
///
/// Exactly one of the two identifiers must be present. `None` is the
/// ambiguous sentinel: both supplied, or neither. Handlers must branch on it
/// before any I/O and answer with the "parameters invalid" envelope.
pub fn resolve_mix(mix_id: Option<&str>, detail_id: Option<&str>) -> Option<MixTarget> {
    match (present(mix_id), present(detail_id)) {
        (Some(mix), None) => Some(MixTarget::Collection(mix.to_string())),
        (None, Some(item)) => Some(MixTarget::Item(item.to_string())),
        _ => None,
    }
}

/// Pick the authoritative live room identifier for a platform.
///
/// Returns `None` when the platform-appropriate field is missing or empty;
/// the other platform's field is ignored entirely.
pub fn live_identifier(
    platform: Platform,
    web_rid: Option<&str>,
    room_id: Option<&str>,
) -> Option<LiveIdent> {
    match platform {
        Platform::Douyin => present(web_rid).map(|id| LiveIdent::WebRid(id.to_string())),
        Platform::Tiktok => present(room_id).map(|id| LiveIdent::RoomId(id.to_string())),
    }
}

/// Substitute the start-of-sequence value for an absent cursor.
///
/// An absent count has no counterpart here: it is forwarded as `None` so the
/// engine's own default applies.
pub fn cursor_or_start(cursor: Option<u64>) -> u64 {
    cursor.unwrap_or(START_CURSOR)
}
