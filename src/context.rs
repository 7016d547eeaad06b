//! Request-scoped context handed to widgets.
//!
//! The core never reaches out for data: anything a widget needs (device
//! identity, the user's display preferences, even the current instant)
//! is resolved by the caller beforehand and arrives through this bag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user display information, resolved by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    /// Display name, shown by widgets that greet the user.
    #[serde(default)]
    pub name: Option<String>,
    /// Offset from UTC in minutes, applied by time-aware widgets.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Everything a widget may read besides its own settings.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Base URL of the serving installation (setup links, QR payloads
    /// are built from this by the caller, never by the core).
    pub base_url: String,
    /// Identity of the device being rendered for.
    pub device_id: String,
    pub user: UserInfo,
    /// The instant "now", resolved by the caller so renders stay pure.
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(base_url: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            device_id: device_id.into(),
            user: UserInfo::default(),
            now: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.user = user;
        self
    }
}
