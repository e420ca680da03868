//! Drafting Workflow
//!
//! Directly callable letter-drafting loop. Every pass takes exactly one branch
//! and then ends. A yes/no reply is only read while the finalize question is
//! open; any other message goes back to gathering.
//!
//! ```text
//! user turn
//!    │
//!    ├─ finalize_requested ──────────────────► Letter Drafter ──► END
//!    │
//!    ├─ question open, reply "네"/"yes" ──────► finalize, Letter Drafter ──► END
//!    ├─ question open, reply "아니요"/"no" ───► cancellation notice ──► END
//!    │
//!    └─ otherwise ─► Writer agent (tool loop) ─► Completion Scorer
//!                                                 │
//!                                                 └─ ratio ≥ threshold ─► yes/no question ──► END
//! ```

use std::sync::Arc;

use tracing::info;

use crate::agents::drafter::{today, LetterDrafter};
use crate::agents::finalize::FinalizeDecision;
use crate::agents::prompts::writer_system_prompt;
use crate::agents::scorer::CompletionScorer;
use crate::agents::specialist::SpecialistAgent;
use crate::config::Config;
use crate::llm::provider::LLM;
use crate::models::LetterDraftState;
use crate::tools::ToolRegistry;
use crate::types::{AppResult, Turn};

pub const WRITER_AGENT: &str = "writer_agent";

/// Branch a drafting pass ended on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// More information requested from the user
    Gathering,
    /// Enough information; the user was asked whether to write the letter
    AwaitingConfirmation,
    Cancelled,
    LetterDrafted,
}

pub struct DraftingWorkflow {
    writer: SpecialistAgent,
    scorer: Arc<CompletionScorer>,
    drafter: Arc<LetterDrafter>,
    decision: FinalizeDecision,
}

impl DraftingWorkflow {
    pub fn new(
        writer: SpecialistAgent,
        scorer: Arc<CompletionScorer>,
        drafter: Arc<LetterDrafter>,
        decision: FinalizeDecision,
    ) -> Self {
        Self {
            writer,
            scorer,
            drafter,
            decision,
        }
    }

    pub fn from_config(
        config: &Config,
        scorer: Arc<CompletionScorer>,
        drafter: Arc<LetterDrafter>,
    ) -> AppResult<Self> {
        let writer = SpecialistAgent::new(
            WRITER_AGENT,
            writer_system_prompt(),
            LLM::from_config(&config.llm)?,
            &config.llm.agent_model,
            ToolRegistry::search_tools(&config.search),
            config.agents.max_tool_rounds,
        );

        Ok(Self::new(
            writer,
            scorer,
            drafter,
            FinalizeDecision::new(config.agents.completion_threshold),
        ))
    }

    /// Run one pass over a state whose current user turn is already in `messages`.
    pub async fn run_pass(&self, state: &mut LetterDraftState) -> AppResult<PassOutcome> {
        if state.finalize_requested() {
            return self.render(state).await;
        }

        if state.awaiting_confirmation() {
            state.set_awaiting_confirmation(false);
            let outcome = self
                .decision
                .decide(state.completion_ratio(), false, state.last_user_turn());

            if outcome.finalize_requested {
                state.request_finalize();
                return self.render(state).await;
            }
            if let Some(notice) = outcome.announcement {
                state.messages.push(Turn::assistant(notice));
                return Ok(PassOutcome::Cancelled);
            }
        }

        self.gather(state).await
    }

    async fn gather(&self, state: &mut LetterDraftState) -> AppResult<PassOutcome> {
        let result = self.writer.run(state.projection()).await?;
        state.messages = result.messages;

        let ratio = self.scorer.score(&state.transcript()).await;
        state.set_completion_ratio(ratio);

        // No reply to inspect yet, so crossing the threshold yields the question.
        let outcome = self.decision.decide(state.completion_ratio(), false, None);
        match outcome.announcement {
            Some(question) => {
                info!(ratio = ratio, "Completion threshold reached, asking to finalize");
                state.messages.push(Turn::assistant(question));
                state.set_awaiting_confirmation(true);
                Ok(PassOutcome::AwaitingConfirmation)
            }
            None => Ok(PassOutcome::Gathering),
        }
    }

    async fn render(&self, state: &mut LetterDraftState) -> AppResult<PassOutcome> {
        let letter = self.drafter.draft(&state.transcript(), &today()).await?;
        info!(letter_len = letter.len(), "Complaint letter drafted");

        state.messages.push(Turn::assistant(letter.clone()));
        state.letter = Some(letter);
        Ok(PassOutcome::LetterDrafted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::prompts::{CANCELLATION_NOTICE, FINALIZE_QUESTION};
    use crate::llm::testing::{scripted_llm, text, ScriptedAdapter};
    use crate::types::{AppResult as Res, LLMResponse};

    struct Harness {
        writer: Arc<ScriptedAdapter>,
        scorer: Arc<ScriptedAdapter>,
        drafter: Arc<ScriptedAdapter>,
        workflow: DraftingWorkflow,
    }

    fn harness(writer: Vec<Res<LLMResponse>>, scorer: Vec<Res<LLMResponse>>, drafter: Vec<Res<LLMResponse>>) -> Harness {
        let writer = ScriptedAdapter::new(writer);
        let scorer = ScriptedAdapter::new(scorer);
        let drafter = ScriptedAdapter::new(drafter);

        let workflow = DraftingWorkflow::new(
            SpecialistAgent::new(
                WRITER_AGENT,
                writer_system_prompt(),
                scripted_llm(&writer),
                "gpt-4o-mini",
                ToolRegistry::empty(),
                3,
            ),
            Arc::new(CompletionScorer::new(scripted_llm(&scorer), "gpt-4o-mini")),
            Arc::new(LetterDrafter::new(scripted_llm(&drafter), "gpt-4o-mini")),
            FinalizeDecision::default(),
        );

        Harness { writer, scorer, drafter, workflow }
    }

    #[tokio::test]
    async fn test_gathering_pass_updates_ratio() {
        let h = harness(
            vec![text("피해 발생 일시를 알려주세요.")],
            vec![text("신청인 정보가 없습니다. ##COMPLETION:0.40##")],
            vec![],
        );
        let mut state = LetterDraftState::new();
        state.begin_turn("중고나라에서 사기를 당했어요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::Gathering);
        assert_eq!(state.completion_ratio(), 0.40);
        assert_eq!(state.messages.last(), Some(&Turn::assistant("피해 발생 일시를 알려주세요.")));
        assert_eq!(h.drafter.call_count(), 0);
    }

    #[tokio::test]
    async fn test_crossing_threshold_asks_the_question() {
        let h = harness(
            vec![text("정보가 거의 다 모였습니다.")],
            vec![text("##COMPLETION:0.85##")],
            vec![],
        );
        let mut state = LetterDraftState::new();
        state.begin_turn("증거로 입금 내역 캡처가 있어요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::AwaitingConfirmation);
        assert_eq!(state.messages.last(), Some(&Turn::assistant(FINALIZE_QUESTION)));
        assert!(state.awaiting_confirmation());
        assert!(!state.finalize_requested());
    }

    #[tokio::test]
    async fn test_confirmation_drafts_the_letter() {
        let h = harness(vec![], vec![], vec![text("[진 정 서]\n   - 주소: 미상")]);
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.85);
        state.set_awaiting_confirmation(true);
        state.begin_turn("네, 작성해주세요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::LetterDrafted);
        assert!(state.finalize_requested());
        assert!(!state.awaiting_confirmation());
        assert_eq!(state.letter.as_deref(), Some("[진 정 서]\n   - 주소: 미상"));
        assert_eq!(h.writer.call_count(), 0);
        assert_eq!(h.scorer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refusal_cancels_without_gathering() {
        let h = harness(vec![], vec![], vec![]);
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.85);
        state.set_awaiting_confirmation(true);
        state.begin_turn("아니요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::Cancelled);
        assert!(!state.finalize_requested());
        assert_eq!(state.messages.last(), Some(&Turn::assistant(CANCELLATION_NOTICE)));
        assert!(!state.awaiting_confirmation());
        assert_eq!(h.writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_finalized_session_keeps_rendering() {
        let h = harness(vec![], vec![], vec![text("첫 번째 초안"), text("두 번째 초안")]);
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.9);
        state.set_awaiting_confirmation(true);
        state.begin_turn("yes");
        h.workflow.run_pass(&mut state).await.unwrap();

        state.begin_turn("아니요, 연락처는 010-1234-5678 입니다");
        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::LetterDrafted);
        assert!(state.finalize_requested());
        assert_eq!(state.letter.as_deref(), Some("두 번째 초안"));
        assert!(h.drafter.requests()[1].messages[0].content().contains("010-1234-5678"));
        assert_eq!(h.writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_after_cancellation_new_facts_reach_the_writer() {
        let h = harness(
            vec![text("피해 금액을 50만원으로 기록했습니다."), text("3월 3일로 수정했습니다.")],
            vec![text("##COMPLETION:0.70##"), text("##COMPLETION:0.75##")],
            vec![],
        );
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.85);
        state.set_awaiting_confirmation(true);

        state.begin_turn("아니요");
        assert_eq!(h.workflow.run_pass(&mut state).await.unwrap(), PassOutcome::Cancelled);

        state.begin_turn("아니 그게 아니라 피해 금액은 50만원이에요");
        assert_eq!(h.workflow.run_pass(&mut state).await.unwrap(), PassOutcome::Gathering);

        state.begin_turn("no wait, the date was March 3");
        assert_eq!(h.workflow.run_pass(&mut state).await.unwrap(), PassOutcome::Gathering);

        assert_eq!(h.writer.call_count(), 2);
        assert_eq!(state.completion_ratio(), 0.75);
        assert!(!state.finalize_requested());
    }

    #[tokio::test]
    async fn test_yes_without_open_question_keeps_gathering() {
        let h = harness(vec![text("입금 일시를 알려주세요.")], vec![text("##COMPLETION:0.82##")], vec![]);
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.85);
        state.begin_turn("네 그리고 상대방 아이디는 sell123 이에요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::AwaitingConfirmation);
        assert!(!state.finalize_requested());
        assert_eq!(h.writer.call_count(), 1);
        assert_eq!(h.drafter.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unclear_reply_to_question_goes_back_to_gathering() {
        let h = harness(vec![text("계좌번호를 기록했습니다.")], vec![text("##COMPLETION:0.60##")], vec![]);
        let mut state = LetterDraftState::new();
        state.set_completion_ratio(0.85);
        state.set_awaiting_confirmation(true);
        state.begin_turn("잠깐만요, 계좌번호도 알려드릴게요");

        let outcome = h.workflow.run_pass(&mut state).await.unwrap();

        assert_eq!(outcome, PassOutcome::Gathering);
        assert!(!state.awaiting_confirmation());
        assert_eq!(h.writer.call_count(), 1);
    }
}
