use eframe::egui;

/// Position the window is parked at while hidden. Hidden egui viewports stop
/// repainting, so the window is moved off-screen instead.
pub const OFFSCREEN_POS: (f32, f32) = (-10_000.0, -10_000.0);

/// Size of the popup with only the input row.
pub const POPUP_SIZE: (f32, f32) = (650.0, 70.0);
/// Size of the popup while the quick-prompt list is shown.
pub const POPUP_LIST_SIZE: (f32, f32) = (650.0, 280.0);
/// Size used while the settings window is open.
pub const SETTINGS_SIZE: (f32, f32) = (760.0, 600.0);

/// Subset of [`egui::Context`] used to move the window, so tests can record
/// the commands instead.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// Top-left corner that centers a window of `size` on a monitor of
/// `monitor` size. Without monitor information the window is placed near the
/// top-left corner.
pub fn centered_pos(size: (f32, f32), monitor: Option<(f32, f32)>) -> (f32, f32) {
    match monitor {
        Some((mw, mh)) => (((mw - size.0) / 2.0).max(0.0), ((mh - size.1) / 2.0).max(0.0)),
        None => (100.0, 100.0),
    }
}

/// Show the window centered with the given size, or park it off-screen.
pub fn apply_visibility(
    visible: bool,
    ctx: &dyn ViewportCtx,
    size: (f32, f32),
    monitor: Option<(f32, f32)>,
) {
    if visible {
        let (x, y) = centered_pos(size, monitor);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(size.0, size.1)));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
            egui::WindowLevel::AlwaysOnTop,
        ));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    } else {
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(egui::WindowLevel::Normal));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
            OFFSCREEN_POS.0,
            OFFSCREEN_POS.1,
        )));
    }
    ctx.request_repaint();
}
