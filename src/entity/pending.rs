use super::{Prompt, PromptId};

/// In-progress form state: creating a new prompt when `target` is `None`,
/// editing an existing one otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEdit {
    pub target: Option<PromptId>,
    pub name: String,
    pub text: String,
}

impl PendingEdit {
    /// Form state for editing `prompt`.
    pub fn editing(prompt: &Prompt) -> Self {
        Self {
            target: Some(prompt.id.clone()),
            name: prompt.name.clone(),
            text: prompt.text.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.name.is_empty() && self.text.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
