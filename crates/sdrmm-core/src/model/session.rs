use serde::{Deserialize, Serialize};

/// Open/closed state of the request queue
///
/// The state lives in the most recent session row. A fresh session always
/// starts `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Open,
    #[default]
    Closed,
}

impl QueueStatus {
    pub fn from_open(open: bool) -> Self {
        if open {
            QueueStatus::Open
        } else {
            QueueStatus::Closed
        }
    }

    pub fn is_open(self) -> bool {
        self == QueueStatus::Open
    }

    /// Next state for a toggle: the explicit status when given, otherwise the flip
    pub fn toggled(self, explicit: Option<bool>) -> Self {
        match explicit {
            Some(open) => QueueStatus::from_open(open),
            None => QueueStatus::from_open(!self.is_open()),
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Open => write!(f, "open"),
            QueueStatus::Closed => write!(f, "closed"),
        }
    }
}
