use serde::{Deserialize, Serialize};
use std::fmt;

/// Manual run override attached to a node or connector node.
///
/// The editor stores this as an optional boolean; `Auto` leaves the verdict to
/// the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum RunToggle {
    #[default]
    Auto,
    ForceRun,
    ForceSkip,
}

impl From<Option<bool>> for RunToggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => RunToggle::Auto,
            Some(true) => RunToggle::ForceRun,
            Some(false) => RunToggle::ForceSkip,
        }
    }
}

impl From<RunToggle> for Option<bool> {
    fn from(toggle: RunToggle) -> Self {
        match toggle {
            RunToggle::Auto => None,
            RunToggle::ForceRun => Some(true),
            RunToggle::ForceSkip => Some(false),
        }
    }
}

/// Category tag of a node. `Rule` is reserved: rule nodes are never planned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCategory {
    #[default]
    Setup,
    Frontend,
    Backend,
    Database,
    Api,
    Auth,
    Testing,
    Deploy,
    Rule,
    Custom(String),
}

impl NodeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            NodeCategory::Setup => "SETUP",
            NodeCategory::Frontend => "FRONTEND",
            NodeCategory::Backend => "BACKEND",
            NodeCategory::Database => "DATABASE",
            NodeCategory::Api => "API",
            NodeCategory::Auth => "AUTH",
            NodeCategory::Testing => "TESTING",
            NodeCategory::Deploy => "DEPLOY",
            NodeCategory::Rule => "RULE",
            NodeCategory::Custom(name) => name,
        }
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, NodeCategory::Rule)
    }
}

impl From<String> for NodeCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SETUP" => NodeCategory::Setup,
            "FRONTEND" => NodeCategory::Frontend,
            "BACKEND" => NodeCategory::Backend,
            "DATABASE" => NodeCategory::Database,
            "API" => NodeCategory::Api,
            "AUTH" => NodeCategory::Auth,
            "TESTING" => NodeCategory::Testing,
            "DEPLOY" => NodeCategory::Deploy,
            "RULE" => NodeCategory::Rule,
            _ => NodeCategory::Custom(value),
        }
    }
}

impl From<NodeCategory> for String {
    fn from(category: NodeCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a node as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Waiting,
    Done,
    Error,
}

/// Whether a plan rebuilds everything outstanding or only applies changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Create,
    Patch,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Create => write!(f, "create"),
            ExecutionMode::Patch => write!(f, "patch"),
        }
    }
}

/// Canvas coordinates. Only the rendering layer cares about these.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A spec document attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDocument {
    pub name: String,
    pub content: String,
}

/// A declared operation attached to a node (e.g. "create repository").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A unit of declared work in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: NodeCategory,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub spec: Option<SpecDocument>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub run_toggle: RunToggle,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub created_at: Option<u64>,
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl Node {
    /// Creates a waiting node with the given id and title and no actions.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: NodeCategory::default(),
            url: String::new(),
            status: NodeStatus::Waiting,
            spec: None,
            actions: Vec::new(),
            run_toggle: RunToggle::Auto,
            position: Position::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Actions that would execute, in declaration order.
    pub fn enabled_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.enabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStatus {
    Connected,
    #[default]
    Disconnected,
    Error,
}

/// Descriptor of an external service (source control, AI agent, backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub status: ConnectorStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Placement of a connector on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorNode {
    pub id: String,
    pub connector_id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub run_toggle: RunToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    #[default]
    NodeToNode,
    NodeToConnector,
}

/// Directed edge between two nodes or connector nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, rename = "type")]
    pub kind: ConnectionKind,
}

impl Connection {
    /// Creates an active node-to-node connection.
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            active: true,
            kind: ConnectionKind::NodeToNode,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }
}

/// A complete workflow as edited on the canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub connector_nodes: Vec<ConnectorNode>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl Workflow {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn connector_node(&self, id: &str) -> Option<&ConnectorNode> {
        self.connector_nodes.iter().find(|c| c.id == id)
    }

    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    /// True if `id` names a node or a connector node in this workflow.
    pub fn contains_endpoint(&self, id: &str) -> bool {
        self.node(id).is_some() || self.connector_node(id).is_some()
    }
}

fn default_true() -> bool {
    true
}
