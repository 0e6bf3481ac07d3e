//! Operator prompt delivery
//!
//! [`PromptSink`] is the seam between the extraction/sweep logic and the
//! chat platform: production uses [`TelegramNotifier`], tests substitute
//! a recording stub. The two prompt kinds deliberately embed different
//! identification in their button payloads: immediate prompts carry the
//! natural key, reminders carry the entry id.

use crate::models::{ShiftCandidate, ShiftEntry};
use crate::telegram::api::{BotClient, InlineKeyboardMarkup};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Destination for operator prompts.
#[async_trait]
pub trait PromptSink: Send + Sync {
    /// Prompt for a freshly extracted shift (natural-key buttons).
    async fn prompt_new_shift(&self, candidate: &ShiftCandidate) -> Result<()>;

    /// Remind about a past-due unresolved entry (id buttons).
    async fn prompt_overdue(&self, entry: &ShiftEntry) -> Result<()>;
}

/// Sends prompts to the admin chat through the Bot API.
pub struct TelegramNotifier {
    client: Arc<BotClient>,
    admin_chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(client: Arc<BotClient>, admin_chat_id: i64) -> TelegramNotifier {
        TelegramNotifier {
            client,
            admin_chat_id,
        }
    }
}

#[async_trait]
impl PromptSink for TelegramNotifier {
    async fn prompt_new_shift(&self, candidate: &ShiftCandidate) -> Result<()> {
        let hall_label = if candidate.hall.is_empty() {
            "Unknown"
        } else {
            &candidate.hall
        };
        let keyboard = InlineKeyboardMarkup::single_row(vec![
            (
                "✅ Paid".to_string(),
                format!("paid:{}:{}", candidate.date, candidate.hall),
            ),
            (
                "❌ Waiting".to_string(),
                format!("waiting:{}:{}", candidate.date, candidate.hall),
            ),
        ]);
        self.client
            .send_message(
                self.admin_chat_id,
                &format!("📅 New shift:\nDate: {}\nHall: {}", candidate.date, hall_label),
                Some(keyboard),
            )
            .await?;
        Ok(())
    }

    async fn prompt_overdue(&self, entry: &ShiftEntry) -> Result<()> {
        let hall_label = if entry.hall.is_empty() {
            "Unknown"
        } else {
            &entry.hall
        };
        let keyboard = InlineKeyboardMarkup::single_row(vec![
            ("✅ Paid".to_string(), format!("paid_id:{}", entry.id)),
            ("❌ Waiting".to_string(), format!("waiting_id:{}", entry.id)),
        ]);
        self.client
            .send_message(
                self.admin_chat_id,
                &format!("💰 Have you been paid for {} ({})?", entry.date, hall_label),
                Some(keyboard),
            )
            .await?;
        Ok(())
    }
}
