mod settings_dialog;

pub use settings_dialog::SettingsDialog;

use crate::clipboard::{
    capture_selection, paste_into, rewrite_to_clipboard, ClipboardAccess, KeySender,
    SystemClipboard, SystemKeys, TargetWindow,
};
use crate::hotkey::{HotkeyEvent, HotkeyListener};
use crate::popup::{PopupState, PopupStatus};
use crate::rewrite::{RewriteClient, RewriteRequest};
use crate::settings::Settings;
use crate::visibility::{apply_visibility, ViewportCtx, POPUP_LIST_SIZE, POPUP_SIZE, SETTINGS_SIZE};
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long a failure stays visible before the popup hides itself.
const ERROR_LINGER: Duration = Duration::from_secs(2);

/// Everything the popup and the rewrite worker need, passed explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub clipboard: Arc<dyn ClipboardAccess>,
    pub keys: Arc<dyn KeySender>,
}

impl AppContext {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            settings,
            settings_path,
            clipboard: Arc::new(SystemClipboard),
            keys: Arc::new(SystemKeys),
        }
    }

    pub fn save_settings(&self) -> anyhow::Result<()> {
        self.settings.save(&self.settings_path)
    }
}

/// Result reported by the rewrite worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The result is on the clipboard and a paste is about to happen.
    Done,
    Failed(String),
}

/// Start the global hotkey listener. Each press captures the selection on the
/// listener thread, forwards it to the UI through `events` and wakes the UI.
pub fn start_hotkey_listener<W>(ctx: &AppContext, events: Sender<HotkeyEvent>, waker: W)
where
    W: ViewportCtx + Send + 'static,
{
    let clipboard = ctx.clipboard.clone();
    let keys = ctx.keys.clone();
    let copy_delay = Duration::from_millis(ctx.settings.copy_delay_ms);
    HotkeyListener::new(ctx.settings.hotkey()).start(move || {
        let target = TargetWindow::capture();
        let selection = capture_selection(clipboard.as_ref(), keys.as_ref(), copy_delay);
        if events.send(HotkeyEvent::Triggered { selection, target }).is_err() {
            tracing::warn!("UI is gone; dropping hotkey event");
            return;
        }
        waker.request_repaint();
    });
}

struct ActivePopup {
    state: PopupState,
    selection: String,
    target: TargetWindow,
    focus_pending: bool,
    close_at: Option<Instant>,
}

pub struct RewriterApp {
    pub ctx: AppContext,
    events: Receiver<HotkeyEvent>,
    outcome_tx: Sender<RewriteOutcome>,
    outcome_rx: Receiver<RewriteOutcome>,
    popup: Option<ActivePopup>,
    settings_dialog: SettingsDialog,
    last_size: Option<(f32, f32)>,
    error_linger: Duration,
}

impl RewriterApp {
    pub fn new(ctx: AppContext, events: Receiver<HotkeyEvent>) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            ctx,
            events,
            outcome_tx,
            outcome_rx,
            popup: None,
            settings_dialog: SettingsDialog::default(),
            last_size: None,
            error_linger: ERROR_LINGER,
        }
    }

    /// Override how long a failure stays visible before the popup hides.
    pub fn with_error_linger(mut self, linger: Duration) -> Self {
        self.error_linger = linger;
        self
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn popup_state(&self) -> Option<&PopupState> {
        self.popup.as_ref().map(|p| &p.state)
    }

    pub fn popup_state_mut(&mut self) -> Option<&mut PopupState> {
        self.popup.as_mut().map(|p| &mut p.state)
    }

    /// Consume a pending request for the popup input to grab focus.
    pub fn take_focus_request(&mut self) -> bool {
        self.popup
            .as_mut()
            .map(|p| std::mem::take(&mut p.focus_pending))
            .unwrap_or(false)
    }

    pub fn open_settings(&mut self) {
        self.settings_dialog.open(&self.ctx.settings);
    }

    pub fn handle_hotkey_event(&mut self, ev: HotkeyEvent) {
        match ev {
            HotkeyEvent::Triggered { selection, target } => {
                if let Some(popup) = &mut self.popup {
                    tracing::debug!("popup already open; refocusing");
                    popup.focus_pending = true;
                    return;
                }
                if selection.is_empty() {
                    tracing::debug!("hotkey pressed without a selection");
                    return;
                }
                tracing::info!(chars = selection.len(), "opening rewrite popup");
                self.popup = Some(ActivePopup {
                    state: PopupState::new(self.ctx.settings.prompts.clone()),
                    selection,
                    target,
                    focus_pending: true,
                    close_at: None,
                });
            }
        }
    }

    pub fn handle_outcome(&mut self, outcome: RewriteOutcome) {
        let Some(popup) = &mut self.popup else {
            return;
        };
        match outcome {
            RewriteOutcome::Done => {
                tracing::info!("rewrite finished");
                self.popup = None;
            }
            RewriteOutcome::Failed(msg) => {
                tracing::warn!("rewrite failed: {msg}");
                popup.state.fail(msg);
                popup.focus_pending = true;
                popup.close_at = Some(Instant::now() + self.error_linger);
            }
        }
    }

    /// Submit the popup's current instruction on a worker thread.
    ///
    /// `waker` is woken once the outcome has been queued.
    pub fn submit<W>(&mut self, waker: W) -> bool
    where
        W: ViewportCtx + Send + 'static,
    {
        let Some(popup) = &mut self.popup else {
            return false;
        };
        let Some(instruction) = popup.state.submit() else {
            return false;
        };
        popup.close_at = None;

        let req = RewriteRequest::new(popup.selection.clone(), instruction);
        let target = popup.target;
        let settings = self.ctx.settings.clone();
        let clipboard = self.ctx.clipboard.clone();
        let keys = self.ctx.keys.clone();
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = RewriteClient::new(&settings)
                .and_then(|client| rewrite_to_clipboard(&client, &req, clipboard.as_ref()));
            match result {
                Ok(_) => {
                    let _ = tx.send(RewriteOutcome::Done);
                    waker.request_repaint();
                    let delay = Duration::from_millis(settings.paste_delay_ms);
                    if let Err(e) = paste_into(target, keys.as_ref(), delay) {
                        tracing::warn!("auto-paste failed: {e}");
                    }
                }
                Err(e) => {
                    let _ = tx.send(RewriteOutcome::Failed(format!("{e:#}")));
                    waker.request_repaint();
                }
            }
        });
        true
    }

    /// Close the popup without rewriting. Ignored while a request is running.
    pub fn cancel(&mut self) {
        if let Some(popup) = &self.popup {
            if popup.state.is_busy() {
                return;
            }
        }
        self.popup = None;
    }

    /// Drain both channels and expire a lingering error.
    pub fn pump(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            self.handle_hotkey_event(ev);
        }
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.handle_outcome(outcome);
        }
        if let Some(close_at) = self.popup.as_ref().and_then(|p| p.close_at) {
            if Instant::now() >= close_at {
                self.popup = None;
            }
        }
    }

    /// Size the window should have right now, or `None` when it should be
    /// parked off-screen.
    pub fn desired_size(&self) -> Option<(f32, f32)> {
        if self.settings_dialog.is_open() {
            Some(SETTINGS_SIZE)
        } else {
            match &self.popup {
                Some(p) if p.state.in_quick_prompt_mode() => Some(POPUP_LIST_SIZE),
                Some(_) => Some(POPUP_SIZE),
                None => None,
            }
        }
    }

    /// Move/resize the window when the desired state changed since the last
    /// call.
    pub fn sync_visibility(&mut self, ctx: &dyn ViewportCtx, monitor: Option<(f32, f32)>) {
        let desired = self.desired_size();
        if desired == self.last_size {
            return;
        }
        tracing::debug!(from = ?self.last_size, to = ?desired, "window state changed");
        match desired {
            Some(size) => apply_visibility(true, ctx, size, monitor),
            None => apply_visibility(false, ctx, POPUP_SIZE, monitor),
        }
        self.last_size = desired;
    }

    fn popup_ui(&mut self, ctx: &egui::Context) {
        use egui::{Align, Color32, Key, Layout, Modifiers, RichText};

        let mut submit = false;
        let mut cancel = false;
        let mut open_settings = false;

        let grab_focus = self.take_focus_request();
        let Some(popup) = &mut self.popup else {
            return;
        };
        let busy = popup.state.is_busy();

        if popup.state.in_quick_prompt_mode() {
            if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::ArrowDown)) {
                popup.state.select_next();
            }
            if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::ArrowUp)) {
                popup.state.select_prev();
            }
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
            cancel = true;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let status_width = match &popup.state.status {
                    PopupStatus::Idle => 0.0,
                    _ => 200.0,
                };
                let edit = egui::TextEdit::singleline(&mut popup.state.input)
                    .hint_text("Ask anything or press / for Quick Prompts…")
                    .desired_width(ui.available_width() - status_width - 40.0);
                let resp = ui.add_enabled(!busy, edit);
                if grab_focus {
                    resp.request_focus();
                }
                if resp.changed() {
                    popup.state.input_changed();
                }
                if resp.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    submit = true;
                }

                match &popup.state.status {
                    PopupStatus::Idle => {}
                    PopupStatus::Processing => {
                        ui.spinner();
                        ui.label(RichText::new("Processing your request...").color(Color32::from_rgb(0xfb, 0xbf, 0x24)));
                    }
                    PopupStatus::Failed(msg) => {
                        ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), format!("❌ {msg}"));
                    }
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("⚙")).clicked() {
                        open_settings = true;
                    }
                });
            });

            if popup.state.in_quick_prompt_mode() {
                ui.add_space(6.0);
                ui.label(RichText::new("⚡ QUICK PROMPTS").small().strong());
                let selected = popup.state.selected();
                let mut clicked: Option<usize> = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let labels: Vec<String> =
                        popup.state.visible_prompts().map(|p| p.label.clone()).collect();
                    if labels.is_empty() {
                        ui.weak("No matching prompts. Add some in Settings (⚙).");
                    }
                    for (pos, label) in labels.iter().enumerate() {
                        let resp = ui.add_enabled(
                            !busy,
                            egui::SelectableLabel::new(selected == Some(pos), label.as_str()),
                        );
                        if selected == Some(pos) {
                            resp.scroll_to_me(None);
                        }
                        if resp.clicked() {
                            clicked = Some(pos);
                        }
                        if resp.double_clicked() {
                            submit = true;
                        }
                    }
                });
                if let Some(pos) = clicked {
                    popup.state.select(pos);
                }
            }
        });

        if cancel {
            self.cancel();
        } else if submit {
            self.submit(ctx.clone());
        }
        if open_settings {
            self.open_settings();
        }
    }
}

impl eframe::App for RewriterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        if self.settings_dialog.is_open() {
            let changed = self.settings_dialog.ui(ctx, &mut self.ctx);
            if changed {
                let prompts = self.ctx.settings.prompts.clone();
                if let Some(state) = self.popup_state_mut() {
                    state.set_prompts(prompts);
                }
            }
        } else if self.popup.is_some() {
            self.popup_ui(ctx);
        } else {
            egui::CentralPanel::default().show(ctx, |_ui| {});
        }

        let monitor = ctx.input(|i| i.viewport().monitor_size.map(|s| (s.x, s.y)));
        self.sync_visibility(ctx, monitor);

        let waiting = self
            .popup
            .as_ref()
            .map(|p| p.state.is_busy() || p.close_at.is_some())
            .unwrap_or(false);
        if waiting {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
