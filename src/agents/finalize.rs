//! Finalize Decision
//!
//! Once the completion ratio reaches the threshold the user is asked whether
//! to write the letter. An affirmative reply sets `finalize_requested`, which
//! then stays set for the rest of the session.

use tracing::info;

use crate::agents::prompts::{CANCELLATION_NOTICE, FINALIZE_QUESTION};

const AFFIRMATIVE: &[&str] = &["yes", "y", "네", "예", "넵", "넹", "응"];
const NEGATIVE: &[&str] = &["no", "n", "아니오", "아니요", "아니", "아뇨"];

/// Korean yes-words that may be repeated or run into a request ("네네", "네작성해주세요")
const AFFIRMATIVE_STEMS: &[&str] = &["네", "예", "넵", "넹", "응"];

/// What may follow a yes-word inside the same token
const AFFIRMATIVE_TAILS: &[&str] = &[
    "요",
    "작성해주세요",
    "작성해줘",
    "작성해",
    "써주세요",
    "써줘",
    "해주세요",
    "해줘",
    "부탁해요",
    "부탁합니다",
    "좋아요",
    "좋습니다",
    "알겠습니다",
];

/// `true` for a whole-word yes, a run of Korean yes-words, or one followed by a request ending.
fn is_affirmative(token: &str) -> bool {
    if AFFIRMATIVE.contains(&token) {
        return true;
    }

    let mut rest = token;
    let mut stems = 0;
    while let Some(stem) = AFFIRMATIVE_STEMS.iter().find(|stem| rest.starts_with(**stem)) {
        rest = &rest[stem.len()..];
        stems += 1;
    }

    stems > 0 && (rest.is_empty() || AFFIRMATIVE_TAILS.contains(&rest))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserReply {
    Affirmative,
    Negative,
    Unclear,
}

/// Classify a reply by whole-word tokens, case-insensitively.
/// Korean yes-words also match when repeated or directly followed by a request.
/// Affirmative tokens win when both kinds appear.
pub fn classify_reply(text: &str) -> UserReply {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| is_affirmative(t)) {
        UserReply::Affirmative
    } else if tokens.iter().any(|t| NEGATIVE.contains(t)) {
        UserReply::Negative
    } else {
        UserReply::Unclear
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeOutcome {
    pub finalize_requested: bool,
    pub announcement: Option<String>,
}

impl FinalizeOutcome {
    fn unchanged(finalize_requested: bool) -> Self {
        Self {
            finalize_requested,
            announcement: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FinalizeDecision {
    threshold: f64,
}

impl Default for FinalizeDecision {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

impl FinalizeDecision {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn decide(&self, ratio: f64, finalize_requested: bool, last_user_turn: Option<&str>) -> FinalizeOutcome {
        if finalize_requested || ratio < self.threshold {
            return FinalizeOutcome::unchanged(finalize_requested);
        }

        let Some(reply) = last_user_turn else {
            return FinalizeOutcome {
                finalize_requested: false,
                announcement: Some(FINALIZE_QUESTION.to_string()),
            };
        };

        match classify_reply(reply) {
            UserReply::Affirmative => {
                info!(ratio = ratio, "User confirmed letter drafting");
                FinalizeOutcome::unchanged(true)
            }
            UserReply::Negative => {
                info!(ratio = ratio, "User declined letter drafting");
                FinalizeOutcome {
                    finalize_requested: false,
                    announcement: Some(CANCELLATION_NOTICE.to_string()),
                }
            }
            UserReply::Unclear => FinalizeOutcome::unchanged(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_reply_finalizes() {
        let outcome = FinalizeDecision::default().decide(0.85, false, Some("네, 작성해주세요"));
        assert!(outcome.finalize_requested);
        assert!(outcome.announcement.is_none());
    }

    #[test]
    fn test_negative_reply_cancels() {
        let outcome = FinalizeDecision::default().decide(0.85, false, Some("아니요"));
        assert!(!outcome.finalize_requested);
        assert_eq!(outcome.announcement.as_deref(), Some(CANCELLATION_NOTICE));
    }

    #[test]
    fn test_no_user_turn_asks_the_question() {
        let outcome = FinalizeDecision::default().decide(0.9, false, None);
        assert!(!outcome.finalize_requested);
        assert_eq!(outcome.announcement.as_deref(), Some(FINALIZE_QUESTION));
    }

    #[test]
    fn test_below_threshold_changes_nothing() {
        let outcome = FinalizeDecision::default().decide(0.79, false, Some("yes"));
        assert_eq!(outcome, FinalizeOutcome { finalize_requested: false, announcement: None });
    }

    #[test]
    fn test_finalize_is_sticky() {
        let decision = FinalizeDecision::default();
        for reply in [Some("아니요"), Some("no"), None] {
            for ratio in [0.0, 0.5, 0.95] {
                let outcome = decision.decide(ratio, true, reply);
                assert!(outcome.finalize_requested);
                assert!(outcome.announcement.is_none());
            }
        }
    }

    #[test]
    fn test_classify_reply_tokens() {
        assert_eq!(classify_reply("YES please"), UserReply::Affirmative);
        assert_eq!(classify_reply("No."), UserReply::Negative);
        assert_eq!(classify_reply("아니오 괜찮습니다"), UserReply::Negative);
        // substrings inside other words do not count
        assert_eq!(classify_reply("좋네요"), UserReply::Unclear);
        assert_eq!(classify_reply("I know"), UserReply::Unclear);
        assert_eq!(classify_reply("계좌번호는 110-123-456789 입니다"), UserReply::Unclear);
    }

    #[test]
    fn test_unclear_reply_changes_nothing() {
        let outcome = FinalizeDecision::default().decide(0.9, false, Some("상대방 계좌번호도 알려드릴게요"));
        assert!(!outcome.finalize_requested);
        assert!(outcome.announcement.is_none());
    }

    #[test]
    fn test_colloquial_korean_yes() {
        for reply in ["네네", "넹", "네작성해주세요", "예예 부탁합니다", "넵넵!", "네요"] {
            assert_eq!(classify_reply(reply), UserReply::Affirmative, "{}", reply);
        }
        // words that merely start with a yes-syllable stay unclear
        for reply in ["예약했어요", "네이버에서 샀어요", "응답이 없어요", "좋네요"] {
            assert_eq!(classify_reply(reply), UserReply::Unclear, "{}", reply);
        }
    }
}
