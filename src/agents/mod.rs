//! Agent System
//!
//! The agents that help a fraud victim get from a first report to a
//! finished complaint letter:
//!
//! - **Supervisor**: classifies each turn and dispatches it
//! - **Intake Agent**: takes the fraud report and explains reporting channels
//! - **Evidence-Collection Agent**: gathers the facts the letter needs
//! - **Drafting Workflow**: writer agent + completion scorer + finalize decision + letter drafter
//!
//! ## Dispatch Overview
//!
//! ```text
//! User Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Supervisor  │  → INTAKE | EVIDENCE_COLLECTION | DIRECT_CHAT | FINISH
//! └─────────────┘
//!      │
//!      ├──────────────────┬──────────────────┐
//!      ▼                  ▼                  ▼
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │   Intake    │   │  Evidence   │   │   Direct    │
//! │   Agent     │   │ Collection  │   │   reply     │
//! └─────────────┘   └─────────────┘   └─────────────┘
//!      │  ▲               │  ▲
//!      ▼  │               ▼  │
//!   search tools       search tools
//!      │                  │                  │
//!      └──────────────────┴──────────────────┘
//!                         │
//!                         ▼
//!                  Assistant Reply
//! ```
//!
//! The drafting workflow is not routed by the supervisor; callers drive it
//! directly (see [`writer::DraftingWorkflow`]).

pub mod drafter;
pub mod evidence;
pub mod finalize;
pub mod intake;
pub mod prompts;
pub mod scorer;
pub mod specialist;
pub mod supervisor;
pub mod writer;

// Re-export main components
pub use drafter::LetterDrafter;
pub use finalize::{FinalizeDecision, FinalizeOutcome};
pub use scorer::{CompletionAnalysis, CompletionScorer};
pub use specialist::SpecialistAgent;
pub use supervisor::Supervisor;
pub use writer::{DraftingWorkflow, PassOutcome};
