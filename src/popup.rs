//! Input state of the rewrite popup, kept separate from rendering.

use crate::prompts::{sorted_indices, Prompt};

/// Prefix that switches the input into quick-prompt selection.
pub const QUICK_PROMPT_PREFIX: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupStatus {
    Idle,
    Processing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMode {
    Typing,
    /// `selected` indexes into [`PopupState::visible_prompts`].
    QuickPrompt { selected: usize },
}

#[derive(Debug, Clone)]
pub struct PopupState {
    pub input: String,
    pub mode: PopupMode,
    pub status: PopupStatus,
    prompts: Vec<Prompt>,
    /// Indices into `prompts` matching the current filter, alphabetical.
    visible: Vec<usize>,
}

impl PopupState {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        let visible = sorted_indices(&prompts);
        Self {
            input: String::new(),
            mode: PopupMode::Typing,
            status: PopupStatus::Idle,
            prompts,
            visible,
        }
    }

    /// Swap in an edited prompt list, keeping the typed input.
    pub fn set_prompts(&mut self, prompts: Vec<Prompt>) {
        self.prompts = prompts;
        self.input_changed();
    }

    pub fn is_busy(&self) -> bool {
        self.status == PopupStatus::Processing
    }

    pub fn in_quick_prompt_mode(&self) -> bool {
        matches!(self.mode, PopupMode::QuickPrompt { .. })
    }

    /// Prompts currently listed, in display order.
    pub fn visible_prompts(&self) -> impl Iterator<Item = &Prompt> {
        self.visible.iter().map(|&i| &self.prompts[i])
    }

    pub fn selected(&self) -> Option<usize> {
        match self.mode {
            PopupMode::QuickPrompt { selected } if !self.visible.is_empty() => Some(selected),
            _ => None,
        }
    }

    /// Re-evaluate the mode and filter after the input text changed.
    pub fn input_changed(&mut self) {
        match self.input.strip_prefix(QUICK_PROMPT_PREFIX) {
            Some(filter) => {
                let needle = filter.trim().to_lowercase();
                self.visible = sorted_indices(&self.prompts)
                    .into_iter()
                    .filter(|&i| {
                        needle.is_empty() || self.prompts[i].label.to_lowercase().contains(&needle)
                    })
                    .collect();
                self.mode = PopupMode::QuickPrompt { selected: 0 };
            }
            None => {
                self.visible = sorted_indices(&self.prompts);
                self.mode = PopupMode::Typing;
            }
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible.len();
        if let PopupMode::QuickPrompt { selected } = &mut self.mode {
            if len > 0 {
                *selected = (*selected + 1) % len;
            }
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible.len();
        if let PopupMode::QuickPrompt { selected } = &mut self.mode {
            if len > 0 {
                *selected = (*selected + len - 1) % len;
            }
        }
    }

    /// Highlight the entry at display position `pos`.
    pub fn select(&mut self, pos: usize) {
        if pos < self.visible.len() {
            self.mode = PopupMode::QuickPrompt { selected: pos };
        }
    }

    /// The instruction Enter would submit, if any.
    pub fn instruction(&self) -> Option<String> {
        match self.mode {
            PopupMode::QuickPrompt { selected } => self
                .visible
                .get(selected)
                .map(|&i| self.prompts[i].instruction.clone()),
            PopupMode::Typing => {
                let typed = self.input.trim();
                (!typed.is_empty()).then(|| typed.to_string())
            }
        }
    }

    /// Mark the request as in flight and return its instruction. Returns
    /// `None` when there is nothing to submit or a request is already running.
    pub fn submit(&mut self) -> Option<String> {
        if self.is_busy() {
            return None;
        }
        let instruction = self.instruction()?;
        self.status = PopupStatus::Processing;
        Some(instruction)
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = PopupStatus::Failed(message.into());
    }
}
