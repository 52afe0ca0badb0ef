use crate::planner::ExecutionPlan;
use crate::workflow::{Node, Workflow};
use itertools::Itertools;

/// Generates the natural-language instruction prompt handed to an AI coding agent.
///
/// Only items the plan marks RUN are narrated, in plan order, and only their
/// enabled actions. Rule nodes are listed up front as standing project rules.
pub struct PromptGenerator<'a> {
    workflow: &'a Workflow,
    include_specs: bool,
}

impl<'a> PromptGenerator<'a> {
    pub fn new(workflow: &'a Workflow) -> Self {
        Self {
            workflow,
            include_specs: true,
        }
    }

    /// Omit attached spec document contents (names are still mentioned).
    pub fn without_specs(mut self) -> Self {
        self.include_specs = false;
        self
    }

    pub fn generate(&self, plan: &ExecutionPlan) -> String {
        let mut out = String::new();

        let rules: Vec<&Node> = self
            .workflow
            .nodes
            .iter()
            .filter(|n| n.category.is_rule())
            .collect();
        if !rules.is_empty() {
            out.push_str("Project rules (always apply):\n");
            for rule in rules {
                out.push_str(&format!("- {}\n", Self::summary_line(rule)));
            }
            out.push('\n');
        }

        if plan.run_count == 0 {
            out.push_str("Nothing to do: every step is up to date or waiting on a blocked step.\n");
            return out;
        }

        out.push_str(&format!(
            "Carry out the following {} step(s) in order ({} mode, revision {}).\n",
            plan.run_count, plan.mode, plan.revision
        ));

        for (position, item) in plan.runnable().enumerate() {
            out.push_str(&format!("\n{}. {}\n", position + 1, item.node_name));
            let Some(node) = self.workflow.node(&item.node_id) else {
                continue;
            };

            out.push_str(&format!("   Category: {}\n", node.category));
            let description = node.description.trim();
            if !description.is_empty() {
                out.push_str(&format!("   {}\n", description));
            }
            if !node.url.is_empty() {
                out.push_str(&format!("   Reference: {}\n", node.url));
            }
            if let Some(spec) = &node.spec {
                if self.include_specs {
                    out.push_str(&format!("   Spec document \"{}\":\n", spec.name));
                    for line in spec.content.lines() {
                        out.push_str(&format!("   | {}\n", line));
                    }
                } else {
                    out.push_str(&format!("   Spec document: {}\n", spec.name));
                }
            }
            if !item.actions.is_empty() {
                out.push_str("   Actions:\n");
                for action in &item.actions {
                    let label = if action.name.is_empty() {
                        &action.action_type
                    } else {
                        &action.name
                    };
                    if action.params.is_null() {
                        out.push_str(&format!("   - {}\n", label));
                    } else {
                        out.push_str(&format!("   - {} with {}\n", label, action.params));
                    }
                }
            }
            if !item.services.is_empty() {
                out.push_str(&format!("   Services: {}\n", item.services.iter().join(", ")));
            }
        }

        out
    }

    fn summary_line(node: &Node) -> String {
        let description = node.description.trim();
        if description.is_empty() {
            node.title.clone()
        } else {
            format!("{}: {}", node.title, description)
        }
    }
}
