mod pending;
mod prompt;

pub use pending::PendingEdit;
pub use prompt::{Prompt, PromptId};
