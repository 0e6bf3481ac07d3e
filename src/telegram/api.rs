//! Telegram Bot API client
//!
//! Thin typed wrapper over the HTTP Bot API: long polling via
//! `getUpdates`, prompt delivery via `sendMessage` with inline keyboards,
//! `editMessageText` for status edits, `answerCallbackQuery` for button
//! acks and `sendDocument` for report attachments. Every call unwraps the
//! standard `{ok, result, description}` envelope.

use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Telegram Bot API base URL.
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Long-poll wait passed to `getUpdates`, in seconds.
const LONG_POLL_SECS: u64 = 30;

/// Bot API client bound to one bot token.
pub struct BotClient {
    http_client: Client,
    base_url: String,
}

impl BotClient {
    pub fn new(token: &str) -> Result<BotClient> {
        // Request timeout must outlast the long-poll wait.
        let http_client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 15))
            .build()
            .map_err(Error::Http)?;
        Ok(BotClient {
            http_client,
            base_url: format!("{}/bot{}", TELEGRAM_API_URL, token),
        })
    }

    /// Fetch the next batch of updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": LONG_POLL_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Send a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(keyboard)
                .map_err(|e| Error::Internal(format!("keyboard serialization: {}", e)))?;
        }
        self.call("sendMessage", &payload).await
    }

    /// Replace the text of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<Message> {
        self.call(
            "editMessageText",
            &json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
        )
        .await
    }

    /// Acknowledge a callback query so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<bool> {
        self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await
    }

    /// Send an in-memory file as a document attachment.
    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str("text/csv")
            .map_err(Error::Http)?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        let response = self
            .http_client
            .post(format!("{}/sendDocument", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let envelope: ApiResponse<Message> = response.json().await?;
        envelope.into_result().map(|_| ())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: &serde_json::Value) -> Result<T> {
        debug!(method, "Telegram API call");
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, method))
            .json(payload)
            .send()
            .await?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Standard Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        if self.ok {
            self.result
                .ok_or_else(|| Error::Telegram("ok response without result".to_string()))
        } else {
            Err(Error::Telegram(
                self.description.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardMarkup {
    /// One row of labeled buttons, each carrying an opaque payload.
    pub fn single_row(buttons: Vec<(String, String)>) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: vec![buttons
                .into_iter()
                .map(|(text, callback_data)| InlineKeyboardButton {
                    text,
                    callback_data,
                })
                .collect()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_serializes_to_bot_api_shape() {
        let keyboard = InlineKeyboardMarkup::single_row(vec![
            ("✅ Paid".to_string(), "paid_id:7".to_string()),
            ("❌ Waiting".to_string(), "waiting_id:7".to_string()),
        ]);
        let value = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(value["inline_keyboard"][0][0]["callback_data"], "paid_id:7");
        assert_eq!(value["inline_keyboard"][0][1]["text"], "❌ Waiting");
    }

    #[test]
    fn envelope_error_carries_description() {
        let envelope: ApiResponse<Message> =
            serde_json::from_str(r#"{"ok":false,"description":"Bad Request"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert!(matches!(err, Error::Telegram(msg) if msg == "Bad Request"));
    }

    #[test]
    fn update_with_callback_query_parses() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 9,
                "callback_query": {
                    "id": "abc",
                    "data": "paid:2024-05-01:Sicilia",
                    "message": {"message_id": 3, "chat": {"id": 42}, "text": "prompt"}
                }
            }"#,
        )
        .unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("paid:2024-05-01:Sicilia"));
        assert_eq!(query.message.unwrap().chat.id, 42);
    }
}
