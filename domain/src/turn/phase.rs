//! Per-turn dispatch state machine.
//!
//! ```text
//! AwaitModel ──▶ GotText ──┬──▶ NoCallFound ──────────────────┐
//!                          └──▶ CallFound ──▶ Dispatched ──┐  │
//!                                                          ▼  ▼
//!                                                        Responded
//! ```

use serde::{Deserialize, Serialize};

/// Phase of a single user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for the model backend
    AwaitModel,
    /// Model text received
    GotText,
    /// Text carried no tool call
    NoCallFound,
    /// A structurally valid call was extracted
    CallFound,
    /// The call went through the registry
    Dispatched,
    /// Exactly one user-visible string was produced
    Responded,
}

impl TurnPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TurnPhase::AwaitModel => "await_model",
            TurnPhase::GotText => "got_text",
            TurnPhase::NoCallFound => "no_call_found",
            TurnPhase::CallFound => "call_found",
            TurnPhase::Dispatched => "dispatched",
            TurnPhase::Responded => "responded",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TurnPhase::AwaitModel => "Awaiting model",
            TurnPhase::GotText => "Got text",
            TurnPhase::NoCallFound => "No call found",
            TurnPhase::CallFound => "Call found",
            TurnPhase::Dispatched => "Dispatched",
            TurnPhase::Responded => "Responded",
        }
    }

    /// Whether `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: TurnPhase) -> bool {
        matches!(
            (self, next),
            (TurnPhase::AwaitModel, TurnPhase::GotText)
                | (TurnPhase::GotText, TurnPhase::NoCallFound)
                | (TurnPhase::GotText, TurnPhase::CallFound)
                | (TurnPhase::NoCallFound, TurnPhase::Responded)
                | (TurnPhase::CallFound, TurnPhase::Dispatched)
                | (TurnPhase::Dispatched, TurnPhase::Responded)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Responded)
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Ordered record of the phases a turn went through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTrace {
    phases: Vec<TurnPhase>,
}

impl TurnTrace {
    pub fn new() -> Self {
        Self {
            phases: vec![TurnPhase::AwaitModel],
        }
    }

    pub fn current(&self) -> TurnPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(TurnPhase::AwaitModel)
    }

    /// Advance to `next`; illegal transitions are a programming error
    pub fn advance(&mut self, next: TurnPhase) {
        debug_assert!(
            self.current().can_transition_to(next),
            "illegal turn transition {} -> {}",
            self.current().as_str(),
            next.as_str()
        );
        self.phases.push(next);
    }

    pub fn phases(&self) -> &[TurnPhase] {
        &self.phases
    }

    pub fn is_complete(&self) -> bool {
        self.current().is_terminal()
    }
}

impl Default for TurnTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(TurnPhase::AwaitModel.can_transition_to(TurnPhase::GotText));
        assert!(TurnPhase::NoCallFound.can_transition_to(TurnPhase::Responded));
        assert!(!TurnPhase::CallFound.can_transition_to(TurnPhase::Responded));
        assert!(!TurnPhase::AwaitModel.can_transition_to(TurnPhase::Dispatched));
        assert!(!TurnPhase::Responded.can_transition_to(TurnPhase::AwaitModel));
    }

    #[test]
    fn test_trace_call_path() {
        let mut trace = TurnTrace::new();
        trace.advance(TurnPhase::GotText);
        trace.advance(TurnPhase::CallFound);
        trace.advance(TurnPhase::Dispatched);
        assert!(!trace.is_complete());
        trace.advance(TurnPhase::Responded);

        assert!(trace.is_complete());
        assert_eq!(trace.phases().len(), 5);
        assert_eq!(trace.current(), TurnPhase::Responded);
    }

    #[test]
    #[should_panic(expected = "illegal turn transition")]
    #[cfg(debug_assertions)]
    fn test_trace_rejects_skipping_dispatch() {
        let mut trace = TurnTrace::new();
        trace.advance(TurnPhase::GotText);
        trace.advance(TurnPhase::CallFound);
        trace.advance(TurnPhase::Responded);
    }

    #[test]
    fn test_display() {
        assert_eq!(TurnPhase::NoCallFound.to_string(), "No call found");
        assert_eq!(TurnPhase::Dispatched.as_str(), "dispatched");
    }
}
