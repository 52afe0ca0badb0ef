pub mod document;

pub use document::WorkflowDocument;
