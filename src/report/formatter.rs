use crate::planner::{ExecutionPlan, ExecutionPlanItem, PlanStatus};
use itertools::Itertools;

/// Formats execution plans into human-readable text.
pub struct PlanFormatter;

impl PlanFormatter {
    /// Full plan: header, counts, then one line per item in evaluation order.
    pub fn format_plan(plan: &ExecutionPlan) -> String {
        let mut out = format!(
            "Execution plan ({} mode, revision {})\n{}\n",
            plan.mode,
            plan.revision,
            Self::format_counts(plan)
        );

        if plan.is_empty() {
            out.push_str("  (no plannable nodes)\n");
            return out;
        }

        for item in &plan.items {
            out.push_str(&Self::format_item(item));
            out.push('\n');
        }
        out
    }

    /// One-line aggregate, e.g. `RUN 2 | SKIP 1 | BLOCKED 0`.
    pub fn format_counts(plan: &ExecutionPlan) -> String {
        format!(
            "{} {} | {} {} | {} {}",
            PlanStatus::Run,
            plan.run_count,
            PlanStatus::Skip,
            plan.skip_count,
            PlanStatus::Blocked,
            plan.blocked_count
        )
    }

    /// Badge, name and reason, followed by the actions that would execute.
    pub fn format_item(item: &ExecutionPlanItem) -> String {
        let badge = format!("[{}]", item.status);
        let mut line = format!("  {:<9} {} ({})", badge, item.node_name, item.reason);
        if item.status == PlanStatus::Run && !item.actions.is_empty() {
            let actions = item
                .actions
                .iter()
                .map(|a| if a.name.is_empty() { &a.action_type } else { &a.name })
                .join(", ");
            line.push_str(&format!("\n            actions: {}", actions));
        }
        line
    }
}
