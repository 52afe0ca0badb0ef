//! Editor-side state: a workflow, its revision state, and the commands that change them.
//!
//! The planner stays a pure function of its arguments; everything stateful
//! (node lifecycle, recorded fingerprints, the revision counter) lives here and
//! is persisted through a [`StateStore`].

use crate::error::SessionError;
use crate::planner::{ExecutionPlan, PlanStatus, Planner};
use crate::state::{ActionOutcome, ExecutionReport, RevisionState, StateStore};
use crate::workflow::{
    Connection, ConnectionKind, Connector, ConnectorNode, ExecutionMode, Node, NodeStatus,
    RunToggle, Workflow,
};
use tracing::{info, warn};

/// A single edit to the session's workflow.
#[derive(Debug, Clone)]
pub enum Command {
    AddNode(Node),
    /// Replaces the node with the same id.
    UpdateNode(Node),
    /// Removes the node and every connection touching it.
    RemoveNode(String),
    RegisterConnector(Connector),
    AddConnectorNode(ConnectorNode),
    /// Removes the connector node and every connection touching it.
    RemoveConnectorNode(String),
    Connect(Connection),
    Disconnect(String),
    SetConnectionActive { connection_id: String, active: bool },
    /// Applies to nodes and connector nodes alike.
    SetRunToggle { target_id: String, toggle: RunToggle },
    SetNodeStatus { node_id: String, status: NodeStatus },
    SetMode(ExecutionMode),
}

/// Outcomes a commit actually applied to RUN items of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitSummary {
    /// Revision after the commit.
    pub revision: u64,
    pub completed: Vec<String>,
    pub failed: Vec<String>,
}

pub struct WorkflowSession<S: StateStore> {
    workflow: Workflow,
    state: RevisionState,
    store: S,
}

impl<S: StateStore> WorkflowSession<S> {
    /// Opens a session, restoring revision state from `store` if any was saved.
    pub fn open(workflow: Workflow, store: S) -> Result<Self, SessionError> {
        let state = store.load()?.unwrap_or_default();
        Ok(Self {
            workflow,
            state,
            store,
        })
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn state(&self) -> &RevisionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> ExecutionMode {
        self.state.mode
    }

    pub fn apply(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::AddNode(node) => {
                self.ensure_unused(&node.id)?;
                self.workflow.nodes.push(node);
            }
            Command::UpdateNode(node) => {
                let existing = self
                    .workflow
                    .node_mut(&node.id)
                    .ok_or_else(|| SessionError::UnknownEndpoint(node.id.clone()))?;
                *existing = node;
            }
            Command::RemoveNode(node_id) => {
                if self.workflow.node(&node_id).is_none() {
                    return Err(SessionError::UnknownEndpoint(node_id));
                }
                self.workflow.nodes.retain(|n| n.id != node_id);
                self.workflow.connections.retain(|c| !c.touches(&node_id));
                self.state.hashes.remove(&node_id);
            }
            Command::RegisterConnector(connector) => {
                match self
                    .workflow
                    .connectors
                    .iter_mut()
                    .find(|c| c.id == connector.id)
                {
                    Some(existing) => *existing = connector,
                    None => self.workflow.connectors.push(connector),
                }
            }
            Command::AddConnectorNode(placed) => {
                self.ensure_unused(&placed.id)?;
                if self.workflow.connector(&placed.connector_id).is_none() {
                    return Err(SessionError::UnknownConnector(placed.connector_id));
                }
                self.workflow.connector_nodes.push(placed);
            }
            Command::RemoveConnectorNode(id) => {
                if self.workflow.connector_node(&id).is_none() {
                    return Err(SessionError::UnknownEndpoint(id));
                }
                self.workflow.connector_nodes.retain(|c| c.id != id);
                self.workflow.connections.retain(|c| !c.touches(&id));
            }
            Command::Connect(mut connection) => {
                for endpoint in [&connection.from, &connection.to] {
                    if !self.workflow.contains_endpoint(endpoint) {
                        return Err(SessionError::UnknownEndpoint(endpoint.clone()));
                    }
                }
                if self.connection_index(&connection.id).is_some() {
                    return Err(SessionError::DuplicateId(connection.id));
                }
                connection.kind = if self.workflow.connector_node(&connection.from).is_some()
                    || self.workflow.connector_node(&connection.to).is_some()
                {
                    ConnectionKind::NodeToConnector
                } else {
                    ConnectionKind::NodeToNode
                };
                self.workflow.connections.push(connection);
            }
            Command::Disconnect(connection_id) => {
                let idx = self
                    .connection_index(&connection_id)
                    .ok_or(SessionError::UnknownConnection(connection_id))?;
                self.workflow.connections.remove(idx);
            }
            Command::SetConnectionActive {
                connection_id,
                active,
            } => {
                let idx = self
                    .connection_index(&connection_id)
                    .ok_or(SessionError::UnknownConnection(connection_id))?;
                self.workflow.connections[idx].active = active;
            }
            Command::SetRunToggle { target_id, toggle } => {
                if let Some(node) = self.workflow.node_mut(&target_id) {
                    node.run_toggle = toggle;
                } else if let Some(placed) = self
                    .workflow
                    .connector_nodes
                    .iter_mut()
                    .find(|c| c.id == target_id)
                {
                    placed.run_toggle = toggle;
                } else {
                    return Err(SessionError::UnknownEndpoint(target_id));
                }
            }
            Command::SetNodeStatus { node_id, status } => {
                let node = self
                    .workflow
                    .node_mut(&node_id)
                    .ok_or(SessionError::UnknownEndpoint(node_id))?;
                node.status = status;
            }
            Command::SetMode(mode) => self.state.mode = mode,
        }
        Ok(())
    }

    /// Computes the plan for the current workflow and revision state.
    pub fn plan(&self) -> ExecutionPlan {
        Planner::builder(&self.workflow)
            .mode(self.state.mode)
            .app_created(self.state.app_created)
            .revision(self.state.revision)
            .previous_hashes(&self.state.hashes)
            .build()
            .plan()
    }

    /// Applies the outcomes of an executed plan and persists the new revision.
    ///
    /// Successful RUN items become `done` and have their fingerprint recorded;
    /// failed ones become `error` and keep their previous fingerprint. Outcomes
    /// for ids that are not RUN items of `plan` are ignored.
    pub fn commit(
        &mut self,
        plan: &ExecutionPlan,
        report: &ExecutionReport,
    ) -> Result<CommitSummary, SessionError> {
        if plan.revision != self.state.revision {
            warn!(
                plan_revision = plan.revision,
                current_revision = self.state.revision,
                "committing a plan generated for an older revision"
            );
        }

        let mut summary = CommitSummary::default();
        for item in plan.items.iter().filter(|i| i.status == PlanStatus::Run) {
            let Some(node) = self.workflow.node_mut(&item.node_id) else {
                continue;
            };
            match report.outcome(&item.node_id) {
                Some(ActionOutcome::Succeeded) => {
                    node.status = NodeStatus::Done;
                    summary.completed.push(item.node_id.clone());
                }
                Some(ActionOutcome::Failed(message)) => {
                    warn!(node_id = %item.node_id, %message, "node actions failed");
                    node.status = NodeStatus::Error;
                    summary.failed.push(item.node_id.clone());
                }
                None => {}
            }
        }

        let recorded = self.state.advance(plan, report);
        self.state
            .retain_nodes(self.workflow.nodes.iter().map(|n| n.id.as_str()));
        self.store.save(&self.state)?;

        summary.revision = self.state.revision;
        info!(
            revision = summary.revision,
            recorded = recorded.len(),
            failed = summary.failed.len(),
            "committed execution plan"
        );
        Ok(summary)
    }

    fn connection_index(&self, connection_id: &str) -> Option<usize> {
        self.workflow
            .connections
            .iter()
            .position(|c| c.id == connection_id)
    }

    fn ensure_unused(&self, id: &str) -> Result<(), SessionError> {
        if self.workflow.contains_endpoint(id) {
            Err(SessionError::DuplicateId(id.to_string()))
        } else {
            Ok(())
        }
    }
}
