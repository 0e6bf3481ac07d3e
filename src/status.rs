//! Payment status state machine
//!
//! Transitions fire only on operator button presses. The callback payload
//! identifies the entry either by opaque id (reminder prompts) or by
//! natural key (immediate prompts); both paths end in the same store
//! update. Zero matched rows is the non-fatal payload-mismatch case.

use crate::db::schedule;
use crate::models::PaidStatus;
use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// A decoded interaction payload.
///
/// Wire shapes: `paid:<date>:<hall>` / `waiting:<date>:<hall>` from the
/// immediate prompt, `paid_id:<id>` / `waiting_id:<id>` from reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    SetById { id: i64, status: PaidStatus },
    SetByKey {
        date: String,
        hall: String,
        status: PaidStatus,
    },
}

impl CallbackAction {
    /// Parse a callback payload; `None` for anything malformed.
    pub fn parse(payload: &str) -> Option<CallbackAction> {
        for (prefix, status) in [("paid_id:", PaidStatus::Paid), ("waiting_id:", PaidStatus::Waiting)] {
            if let Some(id) = payload.strip_prefix(prefix) {
                let id: i64 = id.parse().ok()?;
                return Some(CallbackAction::SetById { id, status });
            }
        }

        let mut parts = payload.splitn(3, ':');
        let status = PaidStatus::from_keyword(parts.next()?)?;
        let date = parts.next()?.to_string();
        let hall = parts.next()?.to_string();
        Some(CallbackAction::SetByKey { date, hall, status })
    }

    pub fn status(&self) -> PaidStatus {
        match self {
            CallbackAction::SetById { status, .. } => *status,
            CallbackAction::SetByKey { status, .. } => *status,
        }
    }
}

/// Outcome of applying an operator acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResolution {
    pub status: PaidStatus,
    pub rows_affected: u64,
}

impl StatusResolution {
    /// Text the originating prompt message is edited to.
    pub fn message(&self) -> String {
        if self.rows_affected == 0 {
            "No matching entry.".to_string()
        } else {
            format!("Status set to: {}", self.status.label())
        }
    }
}

/// Apply one operator acknowledgment to the store.
pub async fn apply(pool: &SqlitePool, action: &CallbackAction) -> Result<StatusResolution> {
    let status = action.status();
    let rows_affected = match action {
        CallbackAction::SetById { id, .. } => {
            schedule::update_status_by_id(pool, *id, status).await?
        }
        CallbackAction::SetByKey { date, hall, .. } => {
            schedule::update_status_by_key(pool, date, hall, status).await?
        }
    };

    if rows_affected == 0 {
        warn!(?action, "callback matched no schedule entry");
    } else {
        info!(?action, rows_affected, "payment status updated");
    }

    Ok(StatusResolution {
        status,
        rows_affected,
    })
}
