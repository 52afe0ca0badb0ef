//! Tests for execution plan generation.
mod common;
use ahash::AHashMap;
use common::*;
use keikaku::prelude::*;

fn plan_with(
    workflow: &Workflow,
    mode: ExecutionMode,
    app_created: bool,
    previous: &AHashMap<String, String>,
) -> ExecutionPlan {
    Planner::builder(workflow)
        .mode(mode)
        .app_created(app_created)
        .revision(7)
        .previous_hashes(previous)
        .build()
        .plan()
}

#[test]
fn test_empty_input_yields_empty_plan() {
    let plan = generate_execution_plan(
        &[],
        &[],
        ExecutionMode::Create,
        false,
        0,
        &[],
        &[],
        &AHashMap::new(),
    );

    assert!(plan.items.is_empty());
    assert_eq!(plan.run_count, 0);
    assert_eq!(plan.skip_count, 0);
    assert_eq!(plan.blocked_count, 0);
    assert_eq!(plan.revision, 0);
}

#[test]
fn test_create_mode_first_run_runs_everything() {
    let nodes = three_nodes();
    let plan = generate_execution_plan(
        &nodes,
        &[],
        ExecutionMode::Create,
        false,
        0,
        &[],
        &[],
        &AHashMap::new(),
    );

    assert_eq!(plan.run_count, 3);
    assert_eq!(plan.skip_count, 0);
    assert_eq!(plan.blocked_count, 0);
    assert!(plan.items.iter().all(|i| i.previous_hash.is_none()));
}

#[test]
fn test_create_mode_skips_done_and_unchanged_nodes() {
    let workflow = Workflow {
        nodes: vec![done_node("a", "Alpha"), node("b", "Beta")],
        ..Default::default()
    };
    let previous = hashes_of(&workflow.nodes);
    let plan = plan_with(&workflow, ExecutionMode::Create, true, &previous);

    let a = plan.item("a").unwrap();
    assert_eq!(a.status, PlanStatus::Skip);
    assert_eq!(a.reason, "unchanged since last run");
    assert_eq!(a.previous_hash.as_deref(), Some(a.input_hash.as_str()));

    let b = plan.item("b").unwrap();
    assert_eq!(b.status, PlanStatus::Run);
    assert_eq!(b.reason, "not yet completed");
}

#[test]
fn test_create_mode_reruns_changed_done_node() {
    let mut workflow = Workflow {
        nodes: vec![done_node("a", "Alpha")],
        ..Default::default()
    };
    let previous = hashes_of(&workflow.nodes);
    workflow.nodes[0].description = "A different description".to_string();

    let plan = plan_with(&workflow, ExecutionMode::Create, true, &previous);
    let item = plan.item("a").unwrap();
    assert_eq!(item.status, PlanStatus::Run);
    assert_eq!(item.reason, "content changed since last run");
    assert_ne!(item.previous_hash.as_deref(), Some(item.input_hash.as_str()));
}

#[test]
fn test_patch_mode_runs_only_changed_nodes() {
    let mut nodes = three_nodes();
    for node in &mut nodes {
        node.status = NodeStatus::Done;
    }
    let previous = hashes_of(&nodes);
    nodes[1].title = "Beta v2".to_string();

    let plan = generate_execution_plan(
        &nodes,
        &[],
        ExecutionMode::Patch,
        true,
        3,
        &[],
        &[],
        &previous,
    );

    assert_eq!(plan.run_count, 1);
    assert_eq!(plan.skip_count, 2);
    assert_eq!(plan.blocked_count, 0);
    let changed = plan.item("b").unwrap();
    assert_eq!(changed.status, PlanStatus::Run);
    assert!(changed.reason.contains("content changed"));
    assert_eq!(
        plan.item("a").unwrap().reason,
        "patch mode only runs manually-selected or changed nodes"
    );
}

#[test]
fn test_patch_mode_runs_new_nodes() {
    let workflow = Workflow {
        nodes: vec![node("fresh", "Fresh")],
        ..Default::default()
    };
    let plan = plan_with(&workflow, ExecutionMode::Patch, true, &AHashMap::new());
    let item = plan.item("fresh").unwrap();
    assert_eq!(item.status, PlanStatus::Run);
    assert_eq!(item.reason, "new since last revision");
}

#[test]
fn test_manual_skip_takes_precedence() {
    let mut skipped = node("a", "Alpha");
    skipped.run_toggle = RunToggle::ForceSkip;
    let workflow = Workflow {
        nodes: vec![skipped],
        ..Default::default()
    };

    for mode in [ExecutionMode::Create, ExecutionMode::Patch] {
        let plan = plan_with(&workflow, mode, false, &AHashMap::new());
        let item = plan.item("a").unwrap();
        assert_eq!(item.status, PlanStatus::Skip);
        assert_eq!(item.reason, "manually set to skip");
    }
}

#[test]
fn test_manual_run_overrides_unchanged_content() {
    let mut forced = done_node("a", "Alpha");
    forced.run_toggle = RunToggle::ForceRun;
    let workflow = Workflow {
        nodes: vec![forced],
        ..Default::default()
    };
    let previous = hashes_of(&workflow.nodes);

    let plan = plan_with(&workflow, ExecutionMode::Patch, true, &previous);
    let item = plan.item("a").unwrap();
    assert_eq!(item.status, PlanStatus::Run);
    assert_eq!(item.reason, "manually set to run");
}

#[test]
fn test_unmet_dependency_blocks_and_propagates() {
    // a never ran and is forced to skip; b wants to run, c is unchanged.
    let mut a = node("a", "Alpha");
    a.run_toggle = RunToggle::ForceSkip;
    let b = node("b", "Beta");
    let c = done_node("c", "Gamma");
    let workflow = Workflow {
        nodes: vec![c, b, a],
        connections: vec![connect("a", "b"), connect("b", "c")],
        ..Default::default()
    };
    let previous = hashes_of(&workflow.nodes);

    let plan = plan_with(&workflow, ExecutionMode::Create, true, &previous);
    let order: Vec<&str> = plan.items.iter().map(|i| i.node_id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);

    assert_eq!(plan.status_of("a"), Some(PlanStatus::Skip));
    let b = plan.item("b").unwrap();
    assert_eq!(b.status, PlanStatus::Blocked);
    assert!(b.reason.contains("Alpha"));

    // c would have been skipped as unchanged, but its upstream is blocked.
    let c = plan.item("c").unwrap();
    assert_eq!(c.status, PlanStatus::Blocked);
    assert!(c.reason.contains("Beta"));

    assert_eq!(plan.blocked_count, 2);
    assert_eq!(plan.skip_count, 1);
}

#[test]
fn test_forced_run_is_still_blocked_by_blocked_upstream() {
    let mut a = node("a", "Alpha");
    a.run_toggle = RunToggle::ForceSkip;
    let b = node("b", "Beta");
    let mut c = node("c", "Gamma");
    c.run_toggle = RunToggle::ForceRun;
    let workflow = Workflow {
        nodes: vec![a, b, c],
        connections: vec![connect("a", "b"), connect("b", "c")],
        ..Default::default()
    };

    let plan = plan_with(&workflow, ExecutionMode::Create, false, &AHashMap::new());
    assert_eq!(plan.status_of("c"), Some(PlanStatus::Blocked));
}

#[test]
fn test_skipped_done_upstream_does_not_block() {
    let a = done_node("a", "Alpha");
    let b = node("b", "Beta");
    let workflow = Workflow {
        nodes: vec![a, b],
        connections: vec![connect("a", "b")],
        ..Default::default()
    };
    let previous = hashes_of(&workflow.nodes);

    let plan = plan_with(&workflow, ExecutionMode::Create, true, &previous);
    assert_eq!(plan.status_of("a"), Some(PlanStatus::Skip));
    assert_eq!(plan.status_of("b"), Some(PlanStatus::Run));
}

#[test]
fn test_nodes_without_predecessors_are_never_blocked() {
    let mut nodes = three_nodes();
    nodes[0].run_toggle = RunToggle::ForceSkip;
    nodes[1].run_toggle = RunToggle::ForceRun;
    let workflow = Workflow {
        nodes,
        connections: vec![inactive("a", "b"), connect("ghost", "c")],
        ..Default::default()
    };

    for mode in [ExecutionMode::Create, ExecutionMode::Patch] {
        let plan = plan_with(&workflow, mode, true, &AHashMap::new());
        assert_eq!(plan.blocked_count, 0);
    }
}

#[test]
fn test_rule_nodes_are_excluded() {
    let mut rule = node("rule", "Use TypeScript");
    rule.category = NodeCategory::Rule;
    rule.run_toggle = RunToggle::ForceRun;
    let workflow = Workflow {
        nodes: vec![rule, node("a", "Alpha")],
        connections: vec![connect("rule", "a")],
        ..Default::default()
    };

    for mode in [ExecutionMode::Create, ExecutionMode::Patch] {
        let plan = plan_with(&workflow, mode, true, &AHashMap::new());
        assert_eq!(plan.items.len(), 1);
        assert!(plan.item("rule").is_none());
        assert_eq!(plan.run_count + plan.skip_count + plan.blocked_count, 1);
        assert_eq!(plan.status_of("a"), Some(PlanStatus::Run));
    }
}

#[test]
fn test_blocking_flows_through_connectors() {
    let mut a = node("a", "Alpha");
    a.run_toggle = RunToggle::ForceSkip;
    let mut workflow = Workflow {
        nodes: vec![a, node("b", "Beta")],
        ..Default::default()
    };
    add_connector(&mut workflow, "cn", "GitHub");
    workflow.connections = vec![connect("a", "cn"), connect("cn", "b")];

    let plan = plan_with(&workflow, ExecutionMode::Create, true, &AHashMap::new());
    assert_eq!(plan.status_of("b"), Some(PlanStatus::Blocked));
}

#[test]
fn test_skipped_connector_does_not_block() {
    let mut a = node("a", "Alpha");
    a.run_toggle = RunToggle::ForceSkip;
    let mut workflow = Workflow {
        nodes: vec![a, node("b", "Beta")],
        ..Default::default()
    };
    add_connector(&mut workflow, "cn", "GitHub");
    workflow.connector_nodes[0].run_toggle = RunToggle::ForceSkip;
    workflow.connections = vec![connect("a", "cn"), connect("cn", "b")];

    let plan = plan_with(&workflow, ExecutionMode::Create, true, &AHashMap::new());
    assert_eq!(plan.status_of("b"), Some(PlanStatus::Run));
    assert_eq!(plan.item("b").unwrap().reason, "not yet completed");
}

#[test]
fn test_items_carry_enabled_actions_and_services() {
    let mut a = node("a", "Alpha");
    a.actions = vec![
        action("a1", "create-repo", true),
        action("a2", "deploy", false),
        action("a3", "ai-develop", true),
    ];
    let mut workflow = Workflow {
        nodes: vec![a],
        ..Default::default()
    };
    add_connector(&mut workflow, "cn", "GitHub");
    workflow.connections = vec![connect("a", "cn")];

    let plan = plan_with(&workflow, ExecutionMode::Create, false, &AHashMap::new());
    let item = plan.item("a").unwrap();
    let types: Vec<&str> = item.actions.iter().map(|a| a.action_type.as_str()).collect();
    assert_eq!(types, vec!["create-repo", "ai-develop"]);
    assert_eq!(item.services, vec!["GitHub".to_string()]);
    // Disabled actions stay on the node itself.
    assert_eq!(workflow.nodes[0].actions.len(), 3);
}

#[test]
fn test_skipped_connector_is_not_listed_as_a_service() {
    let mut workflow = Workflow {
        nodes: vec![node("a", "Alpha"), node("b", "Beta")],
        ..Default::default()
    };
    add_connector(&mut workflow, "cn-github", "GitHub");
    add_connector(&mut workflow, "cn-agent", "Agent");
    workflow.connector_nodes[0].run_toggle = RunToggle::ForceSkip;
    workflow.connections = vec![
        connect("a", "cn-github"),
        connect("a", "cn-agent"),
        connect("cn-agent", "b"),
    ];

    let plan = plan_with(&workflow, ExecutionMode::Create, false, &AHashMap::new());
    let a = plan.item("a").unwrap();
    assert_eq!(a.status, PlanStatus::Run);
    assert_eq!(a.services, vec!["Agent".to_string()]);

    // b is only fed by the connector, it does not feed it.
    assert!(plan.item("b").unwrap().services.is_empty());

    let prompt = PromptGenerator::new(&workflow).generate(&plan);
    assert!(prompt.contains("Services: Agent"));
    assert!(!prompt.contains("GitHub"));
}

#[test]
fn test_plan_is_deterministic() {
    let workflow = chain_workflow();
    let previous = hashes_of(&workflow.nodes[..2]);

    let first = plan_with(&workflow, ExecutionMode::Patch, true, &previous);
    let second = plan_with(&workflow, ExecutionMode::Patch, true, &previous);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_cyclic_graph_still_plans_every_node() {
    let workflow = Workflow {
        nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
        connections: vec![connect("a", "b"), connect("b", "a"), connect("b", "c")],
        ..Default::default()
    };
    let plan = plan_with(&workflow, ExecutionMode::Create, false, &AHashMap::new());

    assert_eq!(plan.items.len(), 3);
    assert_eq!(plan.run_count, 3);
    assert_eq!(plan.mode, ExecutionMode::Create);
    assert_eq!(plan.revision, 7);
}
