//! # Keikaku - Execution Planning for Node-Based Workflows
//!
//! **Keikaku** decides what a visual project workflow would do if it ran now.
//! Users arrange nodes (project-development steps) and connectors (external
//! services such as source control or an AI coding agent) on a canvas and wire
//! them together. Keikaku orders the nodes by their dependencies and gives
//! every node a RUN, SKIP or BLOCKED verdict with a human-readable reason and
//! a content fingerprint, so hosts can render badges and narrate only the work
//! that is actually due.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the graph**: build a [`workflow::Workflow`] directly, load a
//!     [`data::WorkflowDocument`] exported by the editor, or implement
//!     [`workflow::IntoWorkflow`] for your own format.
//! 2.  **Plan**: configure a [`planner::Planner`] with the execution mode, the
//!     app-created flag, the current revision and the fingerprints recorded at
//!     the last run, then call `plan()`.
//! 3.  **Present**: render the plan with [`report::PlanFormatter`], or turn the
//!     RUN items into an agent prompt with [`report::PromptGenerator`].
//! 4.  **Commit**: after the external actions ran, feed an
//!     [`state::ExecutionReport`] to a [`session::WorkflowSession`] to record
//!     fingerprints and advance the revision.
//!
//! Planning is a pure, synchronous function of its inputs. It never fails:
//! dangling connections are ignored and dependency cycles degrade to
//! best-effort ordering.
//!
//! ## Quick Start
//!
//! ```rust
//! use keikaku::prelude::*;
//!
//! let mut workflow = Workflow::default();
//! workflow.nodes.push(Node::new("setup", "Project setup"));
//! workflow.nodes.push(Node::new("ui", "Landing page"));
//! workflow.connections.push(Connection::new("c1", "setup", "ui"));
//!
//! let plan = Planner::builder(&workflow)
//!     .mode(ExecutionMode::Create)
//!     .build()
//!     .plan();
//!
//! assert_eq!(plan.run_count, 2);
//! assert_eq!(plan.items[0].node_id, "setup");
//! println!("{}", PlanFormatter::format_plan(&plan));
//! ```

pub mod data;
pub mod error;
pub mod graph;
pub mod planner;
pub mod prelude;
pub mod report;
pub mod session;
pub mod state;
pub mod validation;
pub mod workflow;
