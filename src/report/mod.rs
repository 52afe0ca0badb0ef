pub mod formatter;
pub mod prompt;

pub use formatter::PlanFormatter;
pub use prompt::PromptGenerator;
