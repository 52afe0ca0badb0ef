use crate::workflow::{Action, ExecutionMode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Run,
    Skip,
    Blocked,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Run => write!(f, "RUN"),
            PlanStatus::Skip => write!(f, "SKIP"),
            PlanStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// Per-node entry of an `ExecutionPlan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlanItem {
    pub node_id: String,
    pub node_name: String,
    pub status: PlanStatus,
    pub reason: String,
    pub input_hash: String,
    pub previous_hash: Option<String>,
    /// Enabled actions in declaration order.
    pub actions: Vec<Action>,
    /// Names of the connectors wired directly to this node.
    #[serde(default)]
    pub services: Vec<String>,
}

/// Read-only snapshot of what would happen if the workflow ran now.
///
/// Items appear in dependency order. Rule nodes never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    pub mode: ExecutionMode,
    pub revision: u64,
    pub run_count: usize,
    pub skip_count: usize,
    pub blocked_count: usize,
    pub items: Vec<ExecutionPlanItem>,
}

impl ExecutionPlan {
    /// Packages items with their aggregate counts.
    pub fn new(mode: ExecutionMode, revision: u64, items: Vec<ExecutionPlanItem>) -> Self {
        let counts = items.iter().counts_by(|i| i.status);
        let tally = |status: PlanStatus| counts.get(&status).copied().unwrap_or(0);
        Self {
            mode,
            revision,
            run_count: tally(PlanStatus::Run),
            skip_count: tally(PlanStatus::Skip),
            blocked_count: tally(PlanStatus::Blocked),
            items,
        }
    }

    pub fn item(&self, node_id: &str) -> Option<&ExecutionPlanItem> {
        self.items.iter().find(|i| i.node_id == node_id)
    }

    pub fn status_of(&self, node_id: &str) -> Option<PlanStatus> {
        self.item(node_id).map(|i| i.status)
    }

    /// Items that would run, in evaluation order.
    pub fn runnable(&self) -> impl Iterator<Item = &ExecutionPlanItem> {
        self.items.iter().filter(|i| i.status == PlanStatus::Run)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
