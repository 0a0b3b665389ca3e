//! Notification kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What triggered a notification. Stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewParticipant,
    SessionReminder,
    SessionUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewParticipant => "new_participant",
            Self::SessionReminder => "session_reminder",
            Self::SessionUpdate => "session_update",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_participant" => Ok(Self::NewParticipant),
            "session_reminder" => Ok(Self::SessionReminder),
            "session_update" => Ok(Self::SessionUpdate),
            other => Err(UnknownNotificationKind(other.to_owned())),
        }
    }
}
