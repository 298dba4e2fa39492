use crate::domain::AttemptStatus;
use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptAction {
    Claim,
    Complete,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<AttemptStatus>,
    pub to: AttemptStatus,
    pub reason: &'static str,
}

/// Per-topic lifecycle: `Unclaimed -> Pending -> {Completed | Failed}`.
/// `None` stands for an unclaimed topic. Terminal states accept no action.
pub fn attempt_transition(
    topic: &str,
    from: Option<AttemptStatus>,
    action: AttemptAction,
) -> Result<(AttemptStatus, StateTransition), ImportError> {
    let (to, reason) = match (from, action) {
        (None, AttemptAction::Claim) => (AttemptStatus::Pending, "claimed"),
        (Some(AttemptStatus::Pending), AttemptAction::Complete) => {
            (AttemptStatus::Completed, "import_completed")
        }
        (Some(AttemptStatus::Pending), AttemptAction::Fail) => {
            (AttemptStatus::Failed, "import_failed")
        }
        (from, action) => {
            return Err(ImportError::InvalidTransition {
                topic: topic.to_owned(),
                from,
                to: target_of(action),
            })
        }
    };
    Ok((to, StateTransition { from, to, reason }))
}

fn target_of(action: AttemptAction) -> AttemptStatus {
    match action {
        AttemptAction::Claim => AttemptStatus::Pending,
        AttemptAction::Complete => AttemptStatus::Completed,
        AttemptAction::Fail => AttemptStatus::Failed,
    }
}
