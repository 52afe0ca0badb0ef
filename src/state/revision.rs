use crate::planner::ExecutionPlan;
use crate::workflow::ExecutionMode;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// What the host remembers between plan generations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevisionState {
    /// Last applied plan generation. Starts at 0 and only ever increases.
    pub revision: u64,
    pub app_created: bool,
    pub mode: ExecutionMode,
    /// Fingerprint recorded when each node last ran successfully.
    pub hashes: AHashMap<String, String>,
}

impl RevisionState {
    pub fn previous_hash(&self, node_id: &str) -> Option<&str> {
        self.hashes.get(node_id).map(|h| h.as_str())
    }

    /// Records successful runs from `plan` and advances the revision.
    ///
    /// Returns the ids whose fingerprints were recorded.
    pub fn advance(&mut self, plan: &ExecutionPlan, report: &ExecutionReport) -> Vec<String> {
        let mut recorded = Vec::new();
        for item in plan.runnable() {
            if let Some(ActionOutcome::Succeeded) = report.outcome(&item.node_id) {
                self.hashes
                    .insert(item.node_id.clone(), item.input_hash.clone());
                recorded.push(item.node_id.clone());
            }
        }
        self.app_created = true;
        self.revision += 1;
        recorded
    }

    /// Drops fingerprints of nodes that no longer exist.
    pub fn retain_nodes<'a>(&mut self, node_ids: impl IntoIterator<Item = &'a str>) {
        let keep: ahash::AHashSet<&str> = node_ids.into_iter().collect();
        self.hashes.retain(|id, _| keep.contains(id.as_str()));
    }
}

/// Result of executing one node's actions, as reported by the action executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOutcome {
    Succeeded,
    Failed(String),
}

/// Per-node outcomes collected after the external actions ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    outcomes: AHashMap<String, ActionOutcome>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A report in which every RUN item of `plan` succeeded.
    pub fn all_succeeded(plan: &ExecutionPlan) -> Self {
        let mut report = Self::new();
        for item in plan.runnable() {
            report.succeeded(&item.node_id);
        }
        report
    }

    pub fn succeeded(&mut self, node_id: impl Into<String>) -> &mut Self {
        self.outcomes.insert(node_id.into(), ActionOutcome::Succeeded);
        self
    }

    pub fn failed(&mut self, node_id: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.outcomes
            .insert(node_id.into(), ActionOutcome::Failed(message.into()));
        self
    }

    pub fn outcome(&self, node_id: &str) -> Option<&ActionOutcome> {
        self.outcomes.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
