//! Completion Scorer
//!
//! Estimates how much of the complaint letter's required information the
//! conversation already contains, weighted by the rubric in
//! [`prompts::RUBRIC`](crate::agents::prompts::RUBRIC).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::agents::prompts::{assessment_system_prompt, completion_system_prompt, FULFILLMENT_PERCENTAGE};
use crate::llm::provider::LLM;
use crate::models::render_transcript;
use crate::types::{AppError, AppResult, LLMRequest, OutputSchema, Turn};

static COMPLETION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"##COMPLETION:\s*(\d+(?:\.\d+)?)\s*##").expect("valid completion regex")
});

/// Structured completion check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionAnalysis {
    pub fulfilled: bool,
    /// 0 to 100
    pub percentage: f64,
}

impl CompletionAnalysis {
    /// Clamp the percentage and derive `fulfilled` from it.
    pub fn normalized(self) -> Self {
        let percentage = if self.percentage.is_finite() {
            self.percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            fulfilled: percentage >= FULFILLMENT_PERCENTAGE,
            percentage,
        }
    }
}

/// Ratio carried by the last `##COMPLETION:x##` sentinel.
/// Text without a sentinel, or whose last sentinel lies outside [0, 1], scores 0.0.
pub fn parse_completion(text: &str) -> f64 {
    COMPLETION_RE
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|ratio| (0.0..=1.0).contains(ratio))
        .unwrap_or(0.0)
}

pub struct CompletionScorer {
    llm: LLM,
    model: String,
}

impl CompletionScorer {
    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Completion ratio of the transcript. Never fails: provider errors and
    /// replies without a sentinel both score 0.0.
    pub async fn score(&self, transcript: &[Turn]) -> f64 {
        let rendered = render_transcript(transcript);
        if rendered.is_empty() {
            return 0.0;
        }

        let request = LLMRequest::new(
            &self.model,
            completion_system_prompt(),
            vec![Turn::user(format!("다음 대화를 평가해주세요:\n\n{}", rendered))],
        )
        .with_temperature(0.0);

        match self.llm.create_chat_completion(&request).await {
            Ok(response) => {
                let ratio = parse_completion(&response.content);
                info!(ratio = ratio, turns = transcript.len(), "Completion ratio updated");
                ratio
            }
            Err(e) => {
                warn!(agent = "completion_scorer", reason = %e, "Scoring failed, defaulting to 0.0");
                0.0
            }
        }
    }

    /// Structured `{fulfilled, percentage}` check over a raw conversation text.
    pub async fn assess(&self, chat_text: &str) -> AppResult<CompletionAnalysis> {
        if chat_text.trim().is_empty() {
            return Err(AppError::InvalidRequest("chat_history must not be empty".to_string()));
        }

        let request = LLMRequest::new(
            &self.model,
            assessment_system_prompt(),
            vec![Turn::user(format!("다음 대화 내용을 분석해주세요:\n\n{}", chat_text))],
        )
        .with_temperature(0.0)
        .with_output_schema(OutputSchema {
            name: "completion_analysis".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "fulfilled": { "type": "boolean" },
                    "percentage": { "type": "number" }
                },
                "required": ["fulfilled", "percentage"],
                "additionalProperties": false
            }),
        });

        let analysis: CompletionAnalysis = self.llm.create_structured(&request).await?;
        let analysis = analysis.normalized();
        info!(
            percentage = analysis.percentage,
            fulfilled = analysis.fulfilled,
            "Completion assessment finished"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{failure, scripted_llm, structured, text, ScriptedAdapter};

    #[test]
    fn test_parse_completion() {
        assert_eq!(parse_completion("신청인 정보가 부족합니다. ##COMPLETION:0.45##"), 0.45);
        assert_eq!(parse_completion("##COMPLETION:1.00##"), 1.0);
        assert_eq!(parse_completion("##COMPLETION: 0.8 ##"), 0.8);
    }

    #[test]
    fn test_parse_completion_without_sentinel_is_zero() {
        assert_eq!(parse_completion("대부분의 정보가 모였습니다. 약 90%"), 0.0);
        assert_eq!(parse_completion("COMPLETION:0.9"), 0.0);
        assert_eq!(parse_completion(""), 0.0);
    }

    #[test]
    fn test_parse_completion_out_of_range_is_zero() {
        assert_eq!(parse_completion("##COMPLETION:85##"), 0.0);
        assert_eq!(parse_completion("##COMPLETION:3.5##"), 0.0);
        assert_eq!(parse_completion("##COMPLETION:1.01##"), 0.0);
        // an earlier valid sentinel does not rescue a garbled final one
        assert_eq!(parse_completion("##COMPLETION:0.40## 최종 ##COMPLETION:85##"), 0.0);
        assert_eq!(parse_completion("##COMPLETION:0##"), 0.0);
        assert_eq!(parse_completion("##COMPLETION:1##"), 1.0);
    }

    #[tokio::test]
    async fn test_percentage_style_score_does_not_cross_threshold() {
        let adapter = ScriptedAdapter::new(vec![text("대부분 충족되었습니다. ##COMPLETION:85##")]);
        let scorer = CompletionScorer::new(scripted_llm(&adapter), "gpt-4o-mini");

        assert_eq!(scorer.score(&[Turn::user("사기 당했어요")]).await, 0.0);
    }

    #[test]
    fn test_parse_completion_uses_last_sentinel() {
        let text = "예시: ##COMPLETION:0.10## 실제 평가 결과 ##COMPLETION:0.62##";
        assert_eq!(parse_completion(text), 0.62);
    }

    #[tokio::test]
    async fn test_score_sends_rendered_transcript() {
        let adapter = ScriptedAdapter::new(vec![text("피해 내용은 충분합니다. ##COMPLETION:0.35##")]);
        let scorer = CompletionScorer::new(scripted_llm(&adapter), "gpt-4o-mini");

        let transcript = vec![Turn::user("당근마켓에서 30만원 사기를 당했어요"), Turn::assistant("언제였나요?")];
        let ratio = scorer.score(&transcript).await;

        assert_eq!(ratio, 0.35);
        let request = &adapter.requests()[0];
        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0].content().contains("사용자: 당근마켓에서 30만원 사기를 당했어요"));
        assert!(request.system_instruction.as_ref().unwrap().contains("##COMPLETION:0.XX##"));
    }

    #[tokio::test]
    async fn test_score_provider_failure_is_zero() {
        let adapter = ScriptedAdapter::new(vec![failure("timeout")]);
        let scorer = CompletionScorer::new(scripted_llm(&adapter), "gpt-4o-mini");

        assert_eq!(scorer.score(&[Turn::user("사기 당했어요")]).await, 0.0);
    }

    #[tokio::test]
    async fn test_assess_recomputes_fulfilled() {
        let adapter = ScriptedAdapter::new(vec![structured(json!({"fulfilled": false, "percentage": 120.0}))]);
        let scorer = CompletionScorer::new(scripted_llm(&adapter), "gpt-4o-mini");

        let analysis = scorer.assess("사용자: 홍길동입니다 ...").await.unwrap();
        assert_eq!(analysis, CompletionAnalysis { fulfilled: true, percentage: 100.0 });
    }

    #[tokio::test]
    async fn test_assess_rejects_empty_input() {
        let adapter = ScriptedAdapter::new(vec![]);
        let scorer = CompletionScorer::new(scripted_llm(&adapter), "gpt-4o-mini");

        assert!(matches!(scorer.assess("  ").await, Err(AppError::InvalidRequest(_))));
        assert_eq!(adapter.call_count(), 0);
    }

    #[test]
    fn test_normalized_threshold() {
        let below = CompletionAnalysis { fulfilled: true, percentage: 79.9 }.normalized();
        assert!(!below.fulfilled);
        let at = CompletionAnalysis { fulfilled: false, percentage: 80.0 }.normalized();
        assert!(at.fulfilled);
    }
}
