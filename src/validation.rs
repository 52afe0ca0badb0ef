//! Referential-integrity checks for a workflow.
//!
//! Planning never depends on these: the planner already treats dangling
//! endpoints as absent and orders cycles best-effort. Hosts run validation to
//! surface the problems to the user.

use crate::graph::DependencyGraph;
use crate::workflow::Workflow;
use ahash::AHashSet;
use std::fmt;

/// A problem found in a workflow. None of these prevent planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    DanglingConnection {
        connection_id: String,
        missing_endpoint: String,
    },
    DuplicateId(String),
    SelfLoop {
        connection_id: String,
    },
    UnknownConnector {
        connector_node_id: String,
        connector_id: String,
    },
    Cycle {
        node_ids: Vec<String>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DanglingConnection {
                connection_id,
                missing_endpoint,
            } => write!(
                f,
                "connection '{}' references missing endpoint '{}'",
                connection_id, missing_endpoint
            ),
            ValidationWarning::DuplicateId(id) => write!(f, "id '{}' is used more than once", id),
            ValidationWarning::SelfLoop { connection_id } => {
                write!(f, "connection '{}' connects a node to itself", connection_id)
            }
            ValidationWarning::UnknownConnector {
                connector_node_id,
                connector_id,
            } => write!(
                f,
                "connector node '{}' references unregistered connector '{}'",
                connector_node_id, connector_id
            ),
            ValidationWarning::Cycle { node_ids } => {
                write!(f, "dependency cycle involving: {}", node_ids.join(", "))
            }
        }
    }
}

/// Collects every warning for `workflow`, in a stable order.
pub fn validate(workflow: &Workflow) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut ids: AHashSet<&str> = AHashSet::new();
    let endpoint_ids = workflow
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .chain(workflow.connector_nodes.iter().map(|c| c.id.as_str()));
    for id in endpoint_ids {
        if !ids.insert(id) {
            warnings.push(ValidationWarning::DuplicateId(id.to_string()));
        }
    }

    let mut connection_ids: AHashSet<&str> = AHashSet::new();
    for connection in &workflow.connections {
        if !connection_ids.insert(connection.id.as_str()) {
            warnings.push(ValidationWarning::DuplicateId(connection.id.clone()));
        }
        for endpoint in [&connection.from, &connection.to] {
            if !ids.contains(endpoint.as_str()) {
                warnings.push(ValidationWarning::DanglingConnection {
                    connection_id: connection.id.clone(),
                    missing_endpoint: endpoint.clone(),
                });
            }
        }
        if connection.from == connection.to {
            warnings.push(ValidationWarning::SelfLoop {
                connection_id: connection.id.clone(),
            });
        }
    }

    for placed in &workflow.connector_nodes {
        if workflow.connector(&placed.connector_id).is_none() {
            warnings.push(ValidationWarning::UnknownConnector {
                connector_node_id: placed.id.clone(),
                connector_id: placed.connector_id.clone(),
            });
        }
    }

    let graph = DependencyGraph::build(
        &workflow.nodes,
        &workflow.connections,
        &workflow.connector_nodes,
    );
    let cyclic = graph.cyclic();
    if !cyclic.is_empty() {
        warnings.push(ValidationWarning::Cycle {
            node_ids: cyclic
                .into_iter()
                .map(|i| graph.nodes()[i].id.clone())
                .collect(),
        });
    }

    warnings
}
