use clap::Parser;
use keikaku::data::WorkflowDocument;
use keikaku::workflow::{
    Action, Connection, ConnectionKind, Connector, ConnectorNode, ConnectorStatus, Node,
    NodeCategory, Position, RunToggle, Workflow,
};
use rand::{Rng, rngs::ThreadRng};
use std::fs;

const CATEGORIES: [NodeCategory; 8] = [
    NodeCategory::Setup,
    NodeCategory::Frontend,
    NodeCategory::Backend,
    NodeCategory::Database,
    NodeCategory::Api,
    NodeCategory::Auth,
    NodeCategory::Testing,
    NodeCategory::Deploy,
];

const ACTION_TYPES: [(&str, &str); 4] = [
    ("create-repo", "Create repository"),
    ("ai-develop", "Develop with AI agent"),
    ("deploy", "Deploy"),
    ("http-request", "Call custom endpoint"),
];

/// A CLI tool to generate random workflow documents for the keikaku planner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of plannable nodes
    #[arg(short, long, default_value_t = 50)]
    nodes: usize,

    /// Number of rule nodes
    #[arg(long, default_value_t = 3)]
    rules: usize,

    /// Probability that a node depends on any given earlier node
    #[arg(long, default_value_t = 0.05)]
    density: f64,

    /// Probability that a node carries a manual run toggle
    #[arg(long, default_value_t = 0.1)]
    toggles: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.density) || !(0.0..=1.0).contains(&cli.toggles) {
        eprintln!("Error: --density and --toggles must be between 0 and 1");
        std::process::exit(1);
    }

    println!(
        "Generating workflow with {} nodes and {} rules (density {})...",
        cli.nodes, cli.rules, cli.density
    );

    let mut workflow = Workflow {
        connectors: generate_connectors(),
        ..Default::default()
    };
    workflow.nodes = generate_nodes(&mut rng, cli.nodes, cli.toggles);
    workflow.nodes.extend(generate_rules(cli.rules));
    workflow.connections = generate_dependencies(&mut rng, &workflow.nodes[..cli.nodes], cli.density);
    attach_connectors(&mut rng, &mut workflow, cli.nodes);

    let document = WorkflowDocument {
        workflow,
        ..Default::default()
    };
    fs::write(&cli.output, document.to_json()?)?;

    println!(
        "Successfully generated and saved workflow to '{}'",
        cli.output
    );
    Ok(())
}

fn generate_connectors() -> Vec<Connector> {
    [("github", "GitHub"), ("ai-agent", "AI Agent"), ("firebase", "Firebase")]
        .into_iter()
        .map(|(id, name)| Connector {
            id: id.to_string(),
            name: name.to_string(),
            icon: String::new(),
            status: ConnectorStatus::Connected,
            url: None,
            config: None,
        })
        .collect()
}

fn generate_nodes(rng: &mut ThreadRng, count: usize, toggle_probability: f64) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let mut node = Node::new(format!("node-{}", i), format!("Step {}", i + 1));
            node.category = CATEGORIES[rng.random_range(0..CATEGORIES.len())].clone();
            node.description = format!("Generated step {} of the project", i + 1);
            node.position = Position {
                x: (i % 10) as f64 * 250.0,
                y: (i / 10) as f64 * 180.0,
            };
            node.actions = (0..rng.random_range(0..=3))
                .map(|a| {
                    let (action_type, name) = ACTION_TYPES[rng.random_range(0..ACTION_TYPES.len())];
                    Action {
                        id: format!("node-{}-action-{}", i, a),
                        action_type: action_type.to_string(),
                        name: name.to_string(),
                        icon: String::new(),
                        enabled: rng.random_bool(0.9),
                        params: serde_json::Value::Null,
                    }
                })
                .collect();
            if rng.random_bool(toggle_probability) {
                node.run_toggle = if rng.random_bool(0.5) {
                    RunToggle::ForceRun
                } else {
                    RunToggle::ForceSkip
                };
            }
            node
        })
        .collect()
}

fn generate_rules(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let mut rule = Node::new(format!("rule-{}", i), format!("Rule {}", i + 1));
            rule.category = NodeCategory::Rule;
            rule
        })
        .collect()
}

/// Only links earlier nodes to later ones, so the result is acyclic.
fn generate_dependencies(rng: &mut ThreadRng, nodes: &[Node], density: f64) -> Vec<Connection> {
    let mut connections = Vec::new();
    for (to_idx, to) in nodes.iter().enumerate() {
        for from in &nodes[..to_idx] {
            if rng.random_bool(density) {
                let id = format!("conn-{}", connections.len());
                let mut connection = Connection::new(id, from.id.clone(), to.id.clone());
                connection.active = rng.random_bool(0.95);
                connections.push(connection);
            }
        }
    }
    connections
}

fn attach_connectors(rng: &mut ThreadRng, workflow: &mut Workflow, node_count: usize) {
    if node_count == 0 {
        return;
    }
    let connector_ids: Vec<String> = workflow.connectors.iter().map(|c| c.id.clone()).collect();
    for (i, connector_id) in connector_ids.into_iter().enumerate() {
        let placed_id = format!("cn-{}", connector_id);
        workflow.connector_nodes.push(ConnectorNode {
            id: placed_id.clone(),
            connector_id,
            position: Position {
                x: -300.0,
                y: i as f64 * 200.0,
            },
            run_toggle: RunToggle::Auto,
        });

        let from = &workflow.nodes[rng.random_range(0..node_count)].id;
        let mut connection = Connection::new(
            format!("conn-{}", workflow.connections.len()),
            from.clone(),
            placed_id,
        );
        connection.kind = ConnectionKind::NodeToConnector;
        workflow.connections.push(connection);
    }
}
