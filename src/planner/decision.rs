use super::plan::PlanStatus;
use crate::workflow::{ExecutionMode, Node, NodeStatus, RunToggle};

/// Outcome of the status rules for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Verdict {
    pub status: PlanStatus,
    pub reason: String,
}

impl Verdict {
    fn new(status: PlanStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

/// A resolved direct dependency of the node being decided.
pub(super) struct Upstream<'a> {
    pub node: &'a Node,
    pub status: PlanStatus,
}

pub(super) struct DecisionContext {
    pub mode: ExecutionMode,
    pub app_created: bool,
}

/// Applies the status rules to `node`, given its already-decided predecessors.
pub(super) fn decide(
    ctx: &DecisionContext,
    node: &Node,
    input_hash: &str,
    previous_hash: Option<&str>,
    upstream: &[Upstream<'_>],
) -> Verdict {
    if node.run_toggle == RunToggle::ForceSkip {
        return Verdict::new(PlanStatus::Skip, "manually set to skip");
    }

    if let Some(blocker) = upstream.iter().find(|u| u.status == PlanStatus::Blocked) {
        return Verdict::new(
            PlanStatus::Blocked,
            format!("blocked by upstream node '{}'", blocker.node.title),
        );
    }

    let tentative = tentative_verdict(ctx, node, input_hash, previous_hash);
    if tentative.status != PlanStatus::Run {
        return tentative;
    }

    // A predecessor that will not run and has never completed is an unmet dependency.
    match upstream
        .iter()
        .find(|u| u.status == PlanStatus::Skip && u.node.status != NodeStatus::Done)
    {
        Some(unmet) => Verdict::new(
            PlanStatus::Blocked,
            format!("waiting on '{}' which will not run", unmet.node.title),
        ),
        None => tentative,
    }
}

fn tentative_verdict(
    ctx: &DecisionContext,
    node: &Node,
    input_hash: &str,
    previous_hash: Option<&str>,
) -> Verdict {
    if node.run_toggle == RunToggle::ForceRun {
        return Verdict::new(PlanStatus::Run, "manually set to run");
    }

    match ctx.mode {
        ExecutionMode::Create => {
            if !ctx.app_created {
                Verdict::new(PlanStatus::Run, "app not created yet")
            } else if node.status != NodeStatus::Done {
                Verdict::new(PlanStatus::Run, "not yet completed")
            } else if previous_hash != Some(input_hash) {
                Verdict::new(PlanStatus::Run, "content changed since last run")
            } else {
                Verdict::new(PlanStatus::Skip, "unchanged since last run")
            }
        }
        ExecutionMode::Patch => match previous_hash {
            None => Verdict::new(PlanStatus::Run, "new since last revision"),
            Some(previous) if previous != input_hash => {
                Verdict::new(PlanStatus::Run, "content changed since last revision")
            }
            Some(_) => Verdict::new(
                PlanStatus::Skip,
                "patch mode only runs manually-selected or changed nodes",
            ),
        },
    }
}
