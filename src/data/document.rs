use crate::error::DocumentError;
use crate::planner::{ExecutionPlan, Planner};
use crate::state::RevisionState;
use crate::workflow::{
    Action, Connection, ConnectionKind, Connector, ConnectorNode, ConnectorStatus, ExecutionMode,
    Node, NodeCategory, Position, RunToggle, Workflow,
};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A workflow document as exported by the browser editor.
///
/// Besides the graph itself it carries the planning context: execution mode,
/// whether the app was already created, the current revision, and the
/// fingerprints recorded at the last run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    #[serde(flatten)]
    pub workflow: Workflow,
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default)]
    pub app_created: bool,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub previous_hashes: AHashMap<String, String>,
}

impl WorkflowDocument {
    /// Load a workflow document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Planning context of this document as revision state.
    pub fn revision_state(&self) -> RevisionState {
        RevisionState {
            revision: self.revision,
            app_created: self.app_created,
            mode: self.mode,
            hashes: self.previous_hashes.clone(),
        }
    }

    /// Copies revision state back into the document.
    pub fn apply_state(&mut self, state: &RevisionState) {
        self.revision = state.revision;
        self.app_created = state.app_created;
        self.mode = state.mode;
        self.previous_hashes = state.hashes.clone();
    }

    pub fn plan(&self) -> ExecutionPlan {
        Planner::builder(&self.workflow)
            .mode(self.mode)
            .app_created(self.app_created)
            .revision(self.revision)
            .previous_hashes(&self.previous_hashes)
            .build()
            .plan()
    }

    /// Creates a small starter workflow when no document is provided.
    pub fn sample() -> Self {
        let action = |id: &str, action_type: &str, name: &str| Action {
            id: id.to_string(),
            action_type: action_type.to_string(),
            name: name.to_string(),
            icon: String::new(),
            enabled: true,
            params: serde_json::Value::Null,
        };

        let mut setup = Node::new("setup", "Project setup");
        setup.description = "Scaffold the repository and tooling".to_string();
        setup.actions = vec![action("a1", "create-repo", "Create repository")];
        setup.position = Position { x: 0.0, y: 0.0 };

        let mut frontend = Node::new("frontend", "Landing page");
        frontend.category = NodeCategory::Frontend;
        frontend.description = "Build the landing page".to_string();
        frontend.actions = vec![action("a2", "ai-develop", "Develop with AI agent")];
        frontend.position = Position { x: 300.0, y: 0.0 };

        let mut deploy = Node::new("deploy", "Deploy");
        deploy.category = NodeCategory::Deploy;
        deploy.actions = vec![action("a3", "deploy", "Deploy to hosting")];
        deploy.position = Position { x: 600.0, y: 0.0 };

        let mut rule = Node::new("rule", "Use TypeScript");
        rule.category = NodeCategory::Rule;
        rule.description = "All code is written in strict TypeScript".to_string();

        let github = Connector {
            id: "github".to_string(),
            name: "GitHub".to_string(),
            icon: String::new(),
            status: ConnectorStatus::Connected,
            url: None,
            config: None,
        };
        let github_node = ConnectorNode {
            id: "cn-github".to_string(),
            connector_id: github.id.clone(),
            position: Position { x: 0.0, y: 200.0 },
            run_toggle: RunToggle::Auto,
        };

        let mut to_github = Connection::new("c3", "setup", "cn-github");
        to_github.kind = ConnectionKind::NodeToConnector;

        Self {
            workflow: Workflow {
                nodes: vec![setup, frontend, deploy, rule],
                connections: vec![
                    Connection::new("c1", "setup", "frontend"),
                    Connection::new("c2", "frontend", "deploy"),
                    to_github,
                ],
                connector_nodes: vec![github_node],
                connectors: vec![github],
            },
            ..Default::default()
        }
    }
}
