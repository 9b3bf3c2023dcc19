#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use quick_rewriter::gui::{start_hotkey_listener, AppContext, RewriterApp};
use quick_rewriter::settings::{self, Settings};
use quick_rewriter::visibility::{OFFSCREEN_POS, POPUP_SIZE};
use quick_rewriter::logging;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings_path = settings::default_path();
    let settings = logging::with_startup_logging(|| Settings::load(&settings_path))?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!("settings loaded from {}", settings_path.display());
    if !settings.has_api_key() {
        tracing::warn!("no API key configured; open Settings from the popup to add one");
    }

    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let app_ctx = AppContext::new(settings, settings_path);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Quick Rewriter")
            .with_inner_size([POPUP_SIZE.0, POPUP_SIZE.1])
            .with_position([OFFSCREEN_POS.0, OFFSCREEN_POS.1])
            .with_decorations(false)
            .with_taskbar(false),
        ..Default::default()
    };

    eframe::run_native(
        "Quick Rewriter",
        native_options,
        Box::new(move |cc| {
            start_hotkey_listener(&app_ctx, events_tx, cc.egui_ctx.clone());
            Box::new(RewriterApp::new(app_ctx, events_rx))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}
