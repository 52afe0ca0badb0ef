//! Common test utilities for building workflows.
use keikaku::prelude::*;

/// Creates a waiting node with one enabled action.
#[allow(dead_code)]
pub fn node(id: &str, title: &str) -> Node {
    let mut node = Node::new(id, title);
    node.description = format!("Work for {}", title);
    node.actions = vec![action(&format!("{}-a1", id), "ai-develop", true)];
    node
}

/// Creates a node already marked `done`.
#[allow(dead_code)]
pub fn done_node(id: &str, title: &str) -> Node {
    let mut node = node(id, title);
    node.status = NodeStatus::Done;
    node
}

#[allow(dead_code)]
pub fn action(id: &str, action_type: &str, enabled: bool) -> Action {
    Action {
        id: id.to_string(),
        action_type: action_type.to_string(),
        name: format!("{} action", action_type),
        icon: String::new(),
        enabled,
        params: serde_json::Value::Null,
    }
}

#[allow(dead_code)]
pub fn connect(from: &str, to: &str) -> Connection {
    Connection::new(format!("{}->{}", from, to), from, to)
}

#[allow(dead_code)]
pub fn inactive(from: &str, to: &str) -> Connection {
    let mut connection = connect(from, to);
    connection.active = false;
    connection
}

/// Registers a connector and places it on the canvas as `placed_id`.
#[allow(dead_code)]
pub fn add_connector(workflow: &mut Workflow, placed_id: &str, name: &str) {
    let connector_id = name.to_lowercase();
    if workflow.connector(&connector_id).is_none() {
        workflow.connectors.push(Connector {
            id: connector_id.clone(),
            name: name.to_string(),
            icon: String::new(),
            status: ConnectorStatus::Connected,
            url: None,
            config: None,
        });
    }
    workflow.connector_nodes.push(ConnectorNode {
        id: placed_id.to_string(),
        connector_id,
        position: Position::default(),
        run_toggle: RunToggle::Auto,
    });
}

/// Three independent nodes: `a`, `b`, `c`.
#[allow(dead_code)]
pub fn three_nodes() -> Vec<Node> {
    vec![node("a", "Alpha"), node("b", "Beta"), node("c", "Gamma")]
}

/// `setup -> api -> ui` plus an unconnected `docs` node.
#[allow(dead_code)]
pub fn chain_workflow() -> Workflow {
    Workflow {
        nodes: vec![
            node("ui", "Landing page"),
            node("docs", "Documentation"),
            node("api", "REST API"),
            node("setup", "Project setup"),
        ],
        connections: vec![connect("setup", "api"), connect("api", "ui")],
        ..Default::default()
    }
}

/// Fingerprints of every node, keyed by id.
#[allow(dead_code)]
pub fn hashes_of(nodes: &[Node]) -> ahash::AHashMap<String, String> {
    nodes
        .iter()
        .map(|n| (n.id.clone(), fingerprint(n)))
        .collect()
}

#[allow(dead_code)]
pub fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

#[allow(dead_code)]
pub const SAMPLE_DOCUMENT_JSON: &str = r##"{
  "nodes": [
    {
      "id": "n1",
      "title": "Create repository",
      "description": "  Initialise the monorepo  ",
      "category": "SETUP",
      "url": "https://example.com/repo",
      "status": "done",
      "actions": [
        { "id": "x1", "type": "create-repo", "name": "Create repository", "enabled": true }
      ],
      "runToggle": null,
      "position": { "x": 10, "y": 20 },
      "createdAt": 1700000000000,
      "updatedAt": 1700000000000
    },
    {
      "id": "n2",
      "title": "Build app",
      "category": "FRONTEND",
      "status": "waiting",
      "spec": { "name": "app.md", "content": "# App\nA todo list." },
      "actions": [
        { "id": "x2", "type": "ai-develop", "name": "Develop with AI agent", "enabled": true, "params": { "model": "large" } },
        { "id": "x3", "type": "deploy", "name": "Deploy", "enabled": false }
      ],
      "runToggle": true
    },
    {
      "id": "r1",
      "title": "Use Rust",
      "description": "Everything is written in Rust",
      "category": "RULE"
    },
    {
      "id": "n3",
      "title": "Marketing site",
      "category": "Landing",
      "runToggle": false
    }
  ],
  "connections": [
    { "id": "c1", "from": "n1", "to": "n2", "active": true, "type": "node-to-node" },
    { "id": "c2", "from": "n2", "to": "cn1", "type": "node-to-connector" },
    { "id": "c3", "from": "r1", "to": "n2" },
    { "id": "c4", "from": "n2", "to": "ghost" }
  ],
  "connectorNodes": [
    { "id": "cn1", "connectorId": "github", "position": { "x": 0, "y": 0 } }
  ],
  "connectors": [
    { "id": "github", "name": "GitHub", "icon": "gh", "status": "connected" }
  ],
  "mode": "create",
  "appCreated": true,
  "revision": 4,
  "previousHashes": {}
}"##;
