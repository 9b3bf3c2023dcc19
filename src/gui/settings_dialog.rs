use super::AppContext;
use crate::prompts::{Prompt, TEXT_PLACEHOLDER};
use crate::settings::Settings;
use eframe::egui;

const PREVIEW_CHARS: usize = 60;

/// Add/edit form for a single prompt. `index` is `None` for a new prompt.
#[derive(Debug, Clone, Default)]
struct PromptEditor {
    index: Option<usize>,
    label: String,
    instruction: String,
}

/// API key and saved prompt management.
#[derive(Default)]
pub struct SettingsDialog {
    open: bool,
    api_key: String,
    editor: Option<PromptEditor>,
    error: Option<String>,
}

impl SettingsDialog {
    pub fn open(&mut self, settings: &Settings) {
        self.open = true;
        self.api_key = settings.api_key.clone();
        self.editor = None;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn persist(&mut self, app: &AppContext) -> bool {
        match app.save_settings() {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                tracing::error!("failed to save settings: {e:#}");
                self.error = Some(format!("Failed to save: {e}"));
                false
            }
        }
    }

    /// Render the dialog. Returns `true` when the prompt list changed.
    pub fn ui(&mut self, ctx: &egui::Context, app: &mut AppContext) -> bool {
        let mut prompts_changed = false;
        let mut close = false;

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape)) {
            if self.editor.is_some() {
                self.editor = None;
            } else {
                close = true;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("⚙ Settings");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
            if let Some(err) = &self.error {
                ui.colored_label(egui::Color32::RED, err.as_str());
            }
            ui.separator();

            if let Some(editor) = &mut self.editor {
                match prompt_editor_ui(ui, editor) {
                    Some(true) => {
                        let prompt = Prompt::new(editor.label.clone(), editor.instruction.clone());
                        match editor.index {
                            Some(i) => {
                                app.settings.update_prompt(i, prompt);
                            }
                            None => app.settings.add_prompt(prompt),
                        }
                        self.editor = None;
                        prompts_changed = true;
                        self.persist(app);
                    }
                    Some(false) => self.editor = None,
                    None => {}
                }
                return;
            }

            ui.label(egui::RichText::new("OPENROUTER API KEY").small().strong());
            ui.add(
                egui::TextEdit::singleline(&mut self.api_key)
                    .hint_text("sk-or-v1-...")
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Save API Key").clicked() {
                app.settings.api_key = self.api_key.trim().to_string();
                if self.persist(app) {
                    tracing::info!("API key updated");
                }
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("QUICK PROMPTS").small().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+ Add").clicked() {
                        self.editor = Some(PromptEditor::default());
                    }
                });
            });

            let mut edit: Option<usize> = None;
            let mut remove: Option<usize> = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                if app.settings.prompts.is_empty() {
                    ui.weak("No saved prompts yet.");
                }
                for (idx, prompt) in app.settings.prompts.iter().enumerate() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(prompt.label.as_str());
                                ui.weak(prompt.preview(PREVIEW_CHARS));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("Delete").clicked() {
                                    remove = Some(idx);
                                }
                                if ui.button("Edit").clicked() {
                                    edit = Some(idx);
                                }
                            });
                        });
                    });
                }
            });

            if let Some(i) = edit {
                if let Some(p) = app.settings.prompts.get(i) {
                    self.editor = Some(PromptEditor {
                        index: Some(i),
                        label: p.label.clone(),
                        instruction: p.instruction.clone(),
                    });
                }
            }
            if let Some(i) = remove {
                if app.settings.remove_prompt(i) {
                    prompts_changed = true;
                    self.persist(app);
                }
            }
        });

        if close {
            self.open = false;
            self.editor = None;
        }
        prompts_changed
    }
}

/// Returns `Some(true)` on save, `Some(false)` on cancel.
fn prompt_editor_ui(ui: &mut egui::Ui, editor: &mut PromptEditor) -> Option<bool> {
    let mut result = None;
    ui.heading(if editor.index.is_some() {
        "✏ Edit Prompt"
    } else {
        "✨ New Prompt"
    });
    ui.add_space(8.0);
    ui.label(egui::RichText::new("PROMPT NAME").small().strong());
    ui.add(
        egui::TextEdit::singleline(&mut editor.label)
            .hint_text("e.g., Professional Tone")
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!("PROMPT TEMPLATE (must include {TEXT_PLACEHOLDER})"))
            .small()
            .strong(),
    );
    ui.add(
        egui::TextEdit::multiline(&mut editor.instruction)
            .code_editor()
            .desired_rows(12)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Cancel").clicked() {
            result = Some(false);
        }
        if ui.button("Save Prompt").clicked() {
            result = Some(true);
        }
    });
    result
}
