//! Core domain types: shift entries and their payment status

use serde::{Deserialize, Serialize};

/// Payment status of a stored shift entry.
///
/// `Unresolved` is the initial state (stored as SQL NULL). `Paid` and
/// `Waiting` are both stable and reachable from each other, since the
/// operator may correct an earlier choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidStatus {
    Unresolved,
    Paid,
    Waiting,
}

impl PaidStatus {
    /// Database column value; `Unresolved` maps to NULL.
    pub fn as_column(&self) -> Option<&'static str> {
        match self {
            PaidStatus::Unresolved => None,
            PaidStatus::Paid => Some("paid"),
            PaidStatus::Waiting => Some("waiting"),
        }
    }

    /// Parse a `paid_status` column value (NULL = unresolved).
    pub fn from_column(value: Option<&str>) -> PaidStatus {
        match value {
            Some("paid") => PaidStatus::Paid,
            Some("waiting") => PaidStatus::Waiting,
            _ => PaidStatus::Unresolved,
        }
    }

    /// Parse a status keyword from a callback payload.
    pub fn from_keyword(s: &str) -> Option<PaidStatus> {
        match s {
            "paid" => Some(PaidStatus::Paid),
            "waiting" => Some(PaidStatus::Waiting),
            _ => None,
        }
    }

    /// Human-readable label used in prompt edits and reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaidStatus::Unresolved => "unresolved",
            PaidStatus::Paid => "paid",
            PaidStatus::Waiting => "waiting",
        }
    }
}

/// One persisted shift entry.
///
/// `date` is canonical `YYYY-MM-DD` when normalization succeeded, or the
/// raw token the extractor saw when it did not. `hall` may be empty when
/// no recognized venue appeared on the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftEntry {
    pub id: i64,
    pub date: String,
    pub hall: String,
    pub notified: bool,
    pub status: PaidStatus,
}

/// An extracted (date, hall) pair before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    pub date: String,
    #[serde(default)]
    pub hall: String,
}
