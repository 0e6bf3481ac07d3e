//! Payment report rendering
//!
//! `/report` produces two views of the full schedule dump: an aligned
//! plain-text table for the chat message and a CSV attachment.

use crate::models::ShiftEntry;
use crate::{Error, Result};

/// Render entries as an aligned text table.
pub fn render_table(entries: &[ShiftEntry]) -> String {
    let mut out = String::from("id    date        hall          status\n");
    for entry in entries {
        out.push_str(&format!(
            "{:<5} {:<11} {:<13} {}\n",
            entry.id,
            entry.date,
            if entry.hall.is_empty() { "-" } else { &entry.hall },
            entry.status.label(),
        ));
    }
    out
}

/// Render entries as CSV bytes for a document attachment.
pub fn render_csv(entries: &[ShiftEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "date", "hall", "notified", "status"])
        .map_err(|e| Error::Internal(format!("csv write: {}", e)))?;

    for entry in entries {
        writer
            .write_record(&[
                entry.id.to_string(),
                entry.date.clone(),
                entry.hall.clone(),
                entry.notified.to_string(),
                entry.status.label().to_string(),
            ])
            .map_err(|e| Error::Internal(format!("csv write: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("csv flush: {}", e)))
}
