use crate::graph::DependencyGraph;
use crate::workflow::{
    Connection, Connector, ConnectorNode, ExecutionMode, Node, RunToggle, Workflow,
};
use ahash::AHashMap;
use tracing::debug;

mod decision;
pub mod fingerprint;
pub mod plan;

use decision::{DecisionContext, Upstream, decide};
pub use fingerprint::fingerprint;
pub use plan::{ExecutionPlan, ExecutionPlanItem, PlanStatus};

/// Computes execution plans for a workflow snapshot.
///
/// A `Planner` borrows its inputs and never mutates them; calling [`Planner::plan`]
/// repeatedly yields identical plans.
pub struct Planner<'a> {
    nodes: &'a [Node],
    connections: &'a [Connection],
    connector_nodes: &'a [ConnectorNode],
    connectors: &'a [Connector],
    mode: ExecutionMode,
    app_created: bool,
    revision: u64,
    previous_hashes: Option<&'a AHashMap<String, String>>,
}

pub struct PlannerBuilder<'a> {
    planner: Planner<'a>,
}

impl<'a> PlannerBuilder<'a> {
    pub fn new(workflow: &'a Workflow) -> Self {
        Self {
            planner: Planner {
                nodes: &workflow.nodes,
                connections: &workflow.connections,
                connector_nodes: &workflow.connector_nodes,
                connectors: &workflow.connectors,
                mode: ExecutionMode::Create,
                app_created: false,
                revision: 0,
                previous_hashes: None,
            },
        }
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.planner.mode = mode;
        self
    }

    pub fn app_created(mut self, app_created: bool) -> Self {
        self.planner.app_created = app_created;
        self
    }

    pub fn revision(mut self, revision: u64) -> Self {
        self.planner.revision = revision;
        self
    }

    /// Fingerprints recorded when each node last ran, keyed by node id.
    pub fn previous_hashes(mut self, hashes: &'a AHashMap<String, String>) -> Self {
        self.planner.previous_hashes = Some(hashes);
        self
    }

    pub fn build(self) -> Planner<'a> {
        self.planner
    }
}

impl<'a> Planner<'a> {
    pub fn builder(workflow: &'a Workflow) -> PlannerBuilder<'a> {
        PlannerBuilder::new(workflow)
    }

    fn previous_hash(&self, node_id: &str) -> Option<&'a str> {
        self.previous_hashes
            .and_then(|m| m.get(node_id))
            .map(|h| h.as_str())
    }

    /// Display names of the connectors `node_id` feeds through active outgoing
    /// connections. Connector nodes toggled to skip are left out.
    fn services_for(&self, node_id: &str) -> Vec<String> {
        let mut services: Vec<String> = Vec::new();
        for connection in self
            .connections
            .iter()
            .filter(|c| c.active && c.from == node_id)
        {
            let Some(placed) = self
                .connector_nodes
                .iter()
                .find(|c| c.id == connection.to && c.run_toggle != RunToggle::ForceSkip)
            else {
                continue;
            };
            let name = self
                .connectors
                .iter()
                .find(|c| c.id == placed.connector_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| placed.connector_id.clone());
            if !services.contains(&name) {
                services.push(name);
            }
        }
        services
    }

    /// Decides RUN/SKIP/BLOCKED for every plannable node.
    pub fn plan(&self) -> ExecutionPlan {
        let graph = DependencyGraph::build(self.nodes, self.connections, self.connector_nodes);
        let nodes = graph.nodes();
        let ctx = DecisionContext {
            mode: self.mode,
            app_created: self.app_created,
        };

        let hashes: Vec<String> = nodes.iter().map(|n| fingerprint(n)).collect();
        let mut resolved: Vec<Option<PlanStatus>> = vec![None; nodes.len()];
        let mut items = Vec::with_capacity(nodes.len());

        for idx in graph.order() {
            let node = nodes[idx];
            // Predecessors caught in a cycle may still be undecided; they are ignored.
            let upstream: Vec<Upstream<'_>> = graph
                .predecessors(idx)
                .iter()
                .filter_map(|&p| {
                    resolved[p].map(|status| Upstream {
                        node: nodes[p],
                        status,
                    })
                })
                .collect();

            let previous_hash = self.previous_hash(&node.id);
            let verdict = decide(&ctx, node, &hashes[idx], previous_hash, &upstream);
            debug!(
                node_id = %node.id,
                status = %verdict.status,
                reason = %verdict.reason,
                "planned node"
            );
            resolved[idx] = Some(verdict.status);

            items.push(ExecutionPlanItem {
                node_id: node.id.clone(),
                node_name: node.title.clone(),
                status: verdict.status,
                reason: verdict.reason,
                input_hash: hashes[idx].clone(),
                previous_hash: previous_hash.map(str::to_string),
                actions: node.enabled_actions().cloned().collect(),
                services: self.services_for(&node.id),
            });
        }

        ExecutionPlan::new(self.mode, self.revision, items)
    }
}

/// Builds an execution plan from loose collections.
///
/// Equivalent to configuring a [`Planner`] by hand; `previous_hashes` maps node
/// ids to the fingerprint recorded when that node last ran.
#[allow(clippy::too_many_arguments)]
pub fn generate_execution_plan(
    nodes: &[Node],
    connections: &[Connection],
    mode: ExecutionMode,
    app_created: bool,
    revision: u64,
    connector_nodes: &[ConnectorNode],
    connectors: &[Connector],
    previous_hashes: &AHashMap<String, String>,
) -> ExecutionPlan {
    Planner {
        nodes,
        connections,
        connector_nodes,
        connectors,
        mode,
        app_created,
        revision,
        previous_hashes: Some(previous_hashes),
    }
    .plan()
}
