//! Telegram Bot API integration

pub mod api;
pub mod notify;

pub use api::{BotClient, CallbackQuery, Chat, Message, Update};
pub use notify::{PromptSink, TelegramNotifier};
