//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keikaku crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use keikaku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = WorkflowDocument::from_file("path/to/workflow.json")?;
//! let plan = document.plan();
//!
//! println!("{}", PlanFormatter::format_plan(&plan));
//! println!("{}", PromptGenerator::new(&document.workflow).generate(&plan));
//! # Ok(())
//! # }
//! ```

// Data model
pub use crate::workflow::{
    Action, Connection, ConnectionKind, Connector, ConnectorNode, ConnectorStatus, ExecutionMode,
    IntoWorkflow, Node, NodeCategory, NodeStatus, Position, RunToggle, SpecDocument, Workflow,
};

// Ordering and planning
pub use crate::graph::{DependencyGraph, topological_sort};
pub use crate::planner::{
    ExecutionPlan, ExecutionPlanItem, PlanStatus, Planner, fingerprint, generate_execution_plan,
};

// Reporting and validation
pub use crate::report::{PlanFormatter, PromptGenerator};
pub use crate::validation::{ValidationWarning, validate};

// Sessions and persistence
pub use crate::data::WorkflowDocument;
pub use crate::session::{CommitSummary, Command, WorkflowSession};
pub use crate::state::{
    ActionOutcome, ExecutionReport, FileStore, MemoryStore, RevisionState, StateStore,
};

// Error types
pub use crate::error::{DocumentError, SessionError, StateError, WorkflowConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
