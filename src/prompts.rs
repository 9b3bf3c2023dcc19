use serde::{Deserialize, Serialize};

/// Placeholder substituted with the captured selection.
pub const TEXT_PLACEHOLDER: &str = "{text}";

const UNTITLED_LABEL: &str = "Untitled Prompt";

const STRICT_SUFFIX: &str = "\n\nIMPORTANT: Output ONLY the rewritten text. Do not add any \
explanations, preambles, notes, or surrounding text. Just the result.";

/// A saved rewrite instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub label: String,
    pub instruction: String,
}

impl Prompt {
    pub fn new(label: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            instruction: instruction.into(),
        }
    }

    /// Trim both fields, fill in an empty label and make sure the instruction
    /// references the selection.
    pub fn normalized(self) -> Self {
        let label = self.label.trim();
        let label = if label.is_empty() {
            UNTITLED_LABEL.to_string()
        } else {
            label.to_string()
        };
        let mut instruction = self.instruction.trim().to_string();
        if !instruction.contains(TEXT_PLACEHOLDER) {
            instruction = format!("{instruction}\n\n{TEXT_PLACEHOLDER}")
                .trim()
                .to_string();
        }
        Self { label, instruction }
    }

    /// First `max` characters of the instruction, for list previews.
    pub fn preview(&self, max: usize) -> String {
        if self.instruction.chars().count() > max {
            let head: String = self.instruction.chars().take(max).collect();
            format!("{head}...")
        } else {
            self.instruction.clone()
        }
    }
}

/// Build the message sent to the model from the selection and an instruction
/// or template.
pub fn compose_prompt(text: &str, instruction: &str) -> String {
    let body = if instruction.contains(TEXT_PLACEHOLDER) {
        instruction.replace(TEXT_PLACEHOLDER, text)
    } else {
        format!("{}\n\n{}", instruction.trim(), text)
            .trim()
            .to_string()
    };
    body + STRICT_SUFFIX
}

/// Indices into `prompts` ordered case-insensitively by label.
pub fn sorted_indices(prompts: &[Prompt]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..prompts.len()).collect();
    idx.sort_by_key(|&i| prompts[i].label.to_lowercase());
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_every_placeholder() {
        let out = compose_prompt("abc", "A: {text} B: {text}");
        assert!(out.starts_with("A: abc B: abc\n\nIMPORTANT"));
    }

    #[test]
    fn plain_instruction_is_followed_by_text() {
        let out = compose_prompt("teh cat sat", "  Fix grammar  ");
        assert!(out.starts_with("Fix grammar\n\nteh cat sat\n\nIMPORTANT"));
        assert!(out.ends_with("Just the result."));
    }

    #[test]
    fn normalized_fills_label_and_placeholder() {
        let p = Prompt::new("  ", "Summarize").normalized();
        assert_eq!(p.label, "Untitled Prompt");
        assert_eq!(p.instruction, "Summarize\n\n{text}");

        let p = Prompt::new("Tone", "Make {text} polite").normalized();
        assert_eq!(p.instruction, "Make {text} polite");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let p = Prompt::new("x", "äöü".repeat(30));
        let preview = p.preview(60);
        assert_eq!(preview.chars().count(), 63);
        assert!(preview.ends_with("..."));
    }
}
