use super::definition::Workflow;
use crate::error::WorkflowConversionError;

/// A trait for foreign workflow formats that can be converted into a keikaku `Workflow`.
///
/// The planner only ever sees the canonical `Workflow` model. Hosts that keep
/// their canvas state in a different shape (an older editor export, a YAML
/// description, a database row set) implement this trait to translate it.
///
/// # Example
///
/// ```rust,no_run
/// use keikaku::workflow::{Connection, IntoWorkflow, Node, Workflow};
/// use keikaku::error::WorkflowConversionError;
///
/// struct Step { key: String, label: String, after: Option<String> }
/// struct Checklist { steps: Vec<Step> }
///
/// impl IntoWorkflow for Checklist {
///     fn into_workflow(self) -> Result<Workflow, WorkflowConversionError> {
///         let mut workflow = Workflow::default();
///         for step in self.steps {
///             if let Some(after) = &step.after {
///                 let id = format!("{}->{}", after, step.key);
///                 workflow.connections.push(Connection::new(id, after.clone(), step.key.clone()));
///             }
///             workflow.nodes.push(Node::new(step.key, step.label));
///         }
///         Ok(workflow)
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a plannable workflow.
    fn into_workflow(self) -> Result<Workflow, WorkflowConversionError>;
}

impl IntoWorkflow for Workflow {
    fn into_workflow(self) -> Result<Workflow, WorkflowConversionError> {
        Ok(self)
    }
}
