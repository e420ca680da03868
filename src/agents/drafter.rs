//! Letter Drafter
//!
//! Renders the final complaint letter from the conversation in a single
//! provider call. The provider's text is returned as the letter body as is.

use chrono::Local;
use tracing::info;

use crate::agents::prompts::letter_system_prompt;
use crate::llm::provider::LLM;
use crate::models::render_transcript;
use crate::types::{AppError, AppResult, LLMRequest, Turn};

/// Date format used on the letter
pub const LETTER_DATE_FORMAT: &str = "%Y년 %m월 %d일";

pub fn today() -> String {
    Local::now().format(LETTER_DATE_FORMAT).to_string()
}

pub struct LetterDrafter {
    llm: LLM,
    model: String,
}

impl LetterDrafter {
    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub async fn draft(&self, transcript: &[Turn], current_date: &str) -> AppResult<String> {
        self.draft_from_text(&render_transcript(transcript), current_date).await
    }

    /// Render a letter from a raw conversation text.
    pub async fn draft_from_text(&self, chat_content: &str, current_date: &str) -> AppResult<String> {
        if chat_content.trim().is_empty() {
            return Err(AppError::InvalidRequest("chat_content must not be empty".to_string()));
        }

        info!(date = %current_date, transcript_len = chat_content.len(), "Drafting complaint letter");

        let request = LLMRequest::new(
            &self.model,
            letter_system_prompt(current_date),
            vec![Turn::user(format!(
                "다음 대화 내용을 바탕으로 진정서를 작성해주세요:\n\n{}",
                chat_content
            ))],
        )
        .with_temperature(0.2);

        let response = self.llm.create_chat_completion(&request).await?;
        Ok(response.content)
    }
}
