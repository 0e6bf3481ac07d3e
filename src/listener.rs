//! Update loop and event handlers
//!
//! One long-polling loop delivers all three externally triggered event
//! kinds: group messages (fed to the extraction pipeline), operator
//! button callbacks (fed to the status state machine) and admin commands.
//! Failures are confined to the event that caused them; the loop itself
//! only ever logs and continues.

use crate::config::Config;
use crate::db::schedule;
use crate::extract::ExtractionPipeline;
use crate::models::ShiftCandidate;
use crate::report;
use crate::status::{self, CallbackAction};
use crate::telegram::{BotClient, CallbackQuery, Message, PromptSink};
use crate::Result;
use chrono::Local;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Shared service state for the update loop.
pub struct App {
    pool: SqlitePool,
    bot: Arc<BotClient>,
    notifier: Arc<dyn PromptSink>,
    pipeline: ExtractionPipeline,
    group_chat_id: i64,
    admin_chat_id: i64,
}

impl App {
    pub fn new(
        pool: SqlitePool,
        bot: Arc<BotClient>,
        notifier: Arc<dyn PromptSink>,
        pipeline: ExtractionPipeline,
        config: &Config,
    ) -> App {
        App {
            pool,
            bot,
            notifier,
            pipeline,
            group_chat_id: config.group_chat_id,
            admin_chat_id: config.admin_chat_id,
        }
    }

    /// Run the long-polling loop until the task is shut down.
    pub async fn run(&self) -> Result<()> {
        info!("listening for updates");
        let mut offset = 0_i64;
        loop {
            let updates = match self.bot.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    error!("getUpdates failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(query) = update.callback_query {
                    self.handle_callback(query).await;
                } else if let Some(message) = update.message {
                    self.handle_message(message).await;
                }
            }
        }
    }

    async fn handle_message(&self, message: Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };

        if message.chat.id == self.group_chat_id {
            self.handle_group_message(text).await;
        } else if message.chat.id == self.admin_chat_id && text.trim().starts_with("/report") {
            if let Err(e) = self.handle_report_command().await {
                error!("report command failed: {}", e);
            }
        }
    }

    /// Extract shift candidates from a group message and persist them.
    async fn handle_group_message(&self, text: &str) {
        let today = Local::now().date_naive();
        let candidates = self.pipeline.extract(text, today).await;
        if candidates.is_empty() {
            debug!("message yielded no shift candidates");
            return;
        }

        for candidate in candidates {
            // Storage failure drops this candidate only; the message loop
            // and remaining candidates continue.
            if let Err(e) = self.store_and_prompt(&candidate).await {
                error!(date = %candidate.date, hall = %candidate.hall,
                       "failed to record shift entry: {}", e);
            }
        }
    }

    async fn store_and_prompt(&self, candidate: &ShiftCandidate) -> Result<()> {
        let id = schedule::create(&self.pool, &candidate.date, &candidate.hall).await?;
        info!(id, date = %candidate.date, hall = %candidate.hall, "shift entry recorded");

        self.notifier.prompt_new_shift(candidate).await?;
        schedule::mark_notified(&self.pool, id).await?;
        Ok(())
    }

    /// Route an operator button press through the status state machine.
    async fn handle_callback(&self, query: CallbackQuery) {
        if let Err(e) = self.bot.answer_callback_query(&query.id).await {
            warn!("answerCallbackQuery failed: {}", e);
        }

        let Some(payload) = query.data.as_deref() else {
            return;
        };
        let Some(action) = CallbackAction::parse(payload) else {
            warn!(payload, "unrecognized callback payload");
            return;
        };

        let resolution = match status::apply(&self.pool, &action).await {
            Ok(resolution) => resolution,
            Err(e) => {
                error!(payload, "status update failed: {}", e);
                return;
            }
        };

        if let Some(message) = query.message {
            if let Err(e) = self
                .bot
                .edit_message_text(message.chat.id, message.message_id, &resolution.message())
                .await
            {
                warn!("failed to edit prompt message: {}", e);
            }
        }
    }

    /// Send the full schedule dump as text plus CSV attachment.
    async fn handle_report_command(&self) -> Result<()> {
        let entries = schedule::list_all(&self.pool).await?;
        if entries.is_empty() {
            self.bot
                .send_message(self.admin_chat_id, "No data yet.", None)
                .await?;
            return Ok(());
        }

        let table = report::render_table(&entries);
        self.bot
            .send_message(
                self.admin_chat_id,
                &format!("📊 Payment report:\n{}", table),
                None,
            )
            .await?;

        let csv = report::render_csv(&entries)?;
        self.bot
            .send_document(self.admin_chat_id, "payment_report.csv", csv)
            .await?;
        Ok(())
    }
}
