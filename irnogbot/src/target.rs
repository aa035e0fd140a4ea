use std::sync::Arc;

use botkit::{
    html,
    html::{HtmlString, HtmlStringMessage},
};
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::InlineKeyboardMarkup,
};

use crate::{
    config::Settings,
    storages::{ApplicantStorageTrait, AuditLogTrait, StorageTrait},
};

/// Chat being answered, together with the shared settings and storage
#[derive(Clone)]
pub struct ReplyTarget {
    pub bot: Bot,
    pub chat_id: ChatId,
    pub settings: Arc<Settings>,
    pub storage: Arc<dyn StorageTrait>,
}

impl ReplyTarget {
    pub fn new(
        bot: Bot,
        chat_id: ChatId,
        settings: Arc<Settings>,
        storage: Arc<dyn StorageTrait>,
    ) -> Self {
        Self {
            bot,
            chat_id,
            settings,
            storage,
        }
    }

    /// Same bot and storage, answering another chat
    pub fn for_chat(&self, chat_id: ChatId) -> Self {
        Self {
            chat_id,
            ..self.clone()
        }
    }

    pub fn applicants(&self) -> Arc<dyn ApplicantStorageTrait> {
        self.storage.clone().as_applicant_storage()
    }

    pub fn audit_log(&self) -> Arc<dyn AuditLogTrait> {
        self.storage.clone().as_audit_log()
    }

    pub fn is_admin(&self) -> bool {
        self.chat_id == self.settings.admin_id
    }

    pub async fn send(&self, text: HtmlString) -> ResponseResult<Message> {
        self.bot.send_html_message(self.chat_id, text).await
    }

    pub async fn send_with_keyboard(
        &self,
        text: HtmlString,
        keyboard: InlineKeyboardMarkup,
    ) -> ResponseResult<Message> {
        self.bot
            .send_html_message(self.chat_id, text)
            .reply_markup(keyboard)
            .await
    }

    /// Tell the user a storage operation failed
    pub async fn report_error(&self, error: HtmlString) -> ResponseResult<()> {
        log::error!("Chat {}: {}", self.chat_id, error);
        self.send(html!("❌ Error: {}", error)).await?;
        Ok(())
    }
}
