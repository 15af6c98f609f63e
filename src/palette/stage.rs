//! Per-request pipeline stages.

use std::fmt;

/// Where a request is in the pipeline.
///
/// ```text
/// Idle -> AwaitingGeneration -> Extracting -> AwaitingExtension -> Assembled
///   |            |                  |
///   +------------+------------------+--> Failed
/// ```
///
/// `AwaitingExtension` has no edge to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    AwaitingGeneration,
    Extracting,
    AwaitingExtension,
    Assembled,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::AwaitingGeneration => "awaiting_generation",
            PipelineStage::Extracting => "extracting",
            PipelineStage::AwaitingExtension => "awaiting_extension",
            PipelineStage::Assembled => "assembled",
            PipelineStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Assembled | PipelineStage::Failed)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Idle, AwaitingGeneration)
                | (Idle, Failed)
                | (AwaitingGeneration, Extracting)
                | (AwaitingGeneration, Failed)
                | (Extracting, AwaitingExtension)
                | (Extracting, Failed)
                | (AwaitingExtension, Assembled)
        )
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        use PipelineStage::*;
        let path = [Idle, AwaitingGeneration, Extracting, AwaitingExtension, Assembled];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_extension_cannot_fail() {
        assert!(!PipelineStage::AwaitingExtension.can_transition_to(PipelineStage::Failed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(PipelineStage::Assembled.is_terminal());
        assert!(PipelineStage::Failed.is_terminal());
        assert!(!PipelineStage::Extracting.is_terminal());
        assert!(!PipelineStage::Assembled.can_transition_to(PipelineStage::Idle));
        assert!(!PipelineStage::Failed.can_transition_to(PipelineStage::Idle));
    }
}
