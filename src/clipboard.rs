use crate::rewrite::{RewriteClient, RewriteRequest};
use anyhow::Result;
use std::thread;
use std::time::Duration;

/// Pause between releasing modifiers and sending the copy chord.
const MODIFIER_SETTLE: Duration = Duration::from_millis(20);

/// Text clipboard used by the rewrite flow.
pub trait ClipboardAccess: Send + Sync {
    fn get_text(&self) -> Result<String>;
    fn set_text(&self, text: &str) -> Result<()>;
}

/// The OS clipboard via `arboard`. A handle is opened per call so the value
/// can be shared between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn get_text(&self) -> Result<String> {
        let mut cb = arboard::Clipboard::new()?;
        Ok(cb.get_text()?)
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut cb = arboard::Clipboard::new()?;
        cb.set_text(text.to_string())?;
        Ok(())
    }
}

/// Synthetic keystrokes sent to the focused application.
pub trait KeySender: Send + Sync {
    /// Release Shift so the copy chord is not seen as Ctrl+Shift+C while the
    /// user still holds the hotkey.
    fn release_modifiers(&self) -> Result<()>;
    fn send_copy(&self) -> Result<()>;
    fn send_paste(&self) -> Result<()>;
}

/// [`KeySender`] backed by Win32 `SendInput`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemKeys;

#[cfg(target_os = "windows")]
mod win {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
        VIRTUAL_KEY, VK_CONTROL, VK_LSHIFT, VK_RSHIFT, VK_SHIFT,
    };

    fn key_input(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    fn send(inputs: &[INPUT]) -> anyhow::Result<()> {
        let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            anyhow::bail!("SendInput sent {sent} of {} events", inputs.len());
        }
        Ok(())
    }

    pub fn release_shift() -> anyhow::Result<()> {
        let ups: Vec<INPUT> = [VK_SHIFT, VK_LSHIFT, VK_RSHIFT]
            .into_iter()
            .map(|vk| key_input(vk, KEYEVENTF_KEYUP))
            .collect();
        send(&ups)
    }

    /// Press Ctrl+`letter` and release in reverse order.
    pub fn ctrl_chord(letter: u8) -> anyhow::Result<()> {
        let key = VIRTUAL_KEY(u16::from(letter.to_ascii_uppercase()));
        send(&[
            key_input(VK_CONTROL, KEYBD_EVENT_FLAGS(0)),
            key_input(key, KEYBD_EVENT_FLAGS(0)),
            key_input(key, KEYEVENTF_KEYUP),
            key_input(VK_CONTROL, KEYEVENTF_KEYUP),
        ])
    }
}

#[cfg(target_os = "windows")]
impl KeySender for SystemKeys {
    fn release_modifiers(&self) -> Result<()> {
        win::release_shift()
    }

    fn send_copy(&self) -> Result<()> {
        win::ctrl_chord(b'c')
    }

    fn send_paste(&self) -> Result<()> {
        win::ctrl_chord(b'v')
    }
}

#[cfg(not(target_os = "windows"))]
impl KeySender for SystemKeys {
    fn release_modifiers(&self) -> Result<()> {
        anyhow::bail!("synthetic keys are only supported on Windows");
    }

    fn send_copy(&self) -> Result<()> {
        anyhow::bail!("synthetic keys are only supported on Windows");
    }

    fn send_paste(&self) -> Result<()> {
        anyhow::bail!("synthetic keys are only supported on Windows");
    }
}

/// The window that had focus when the hotkey fired. Stored as a raw handle
/// value so it can cross threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetWindow(pub isize);

impl TargetWindow {
    #[cfg(target_os = "windows")]
    pub fn capture() -> Self {
        use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;
        let hwnd = unsafe { GetForegroundWindow() };
        Self(hwnd.0 as isize)
    }

    #[cfg(not(target_os = "windows"))]
    pub fn capture() -> Self {
        Self(0)
    }

    #[cfg(target_os = "windows")]
    pub fn restore(&self) {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::SetForegroundWindow;
        if self.0 != 0 {
            unsafe {
                let _ = SetForegroundWindow(HWND(self.0 as *mut core::ffi::c_void));
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    pub fn restore(&self) {}
}

/// Copy the current selection of the focused application and return it.
///
/// Any failure yields an empty string; the caller treats that as "nothing
/// selected".
pub fn capture_selection(
    clipboard: &dyn ClipboardAccess,
    keys: &dyn KeySender,
    copy_delay: Duration,
) -> String {
    if let Err(e) = keys.release_modifiers() {
        tracing::debug!("failed to release modifiers: {e}");
    }
    thread::sleep(MODIFIER_SETTLE);
    if let Err(e) = keys.send_copy() {
        tracing::warn!("failed to send copy keystroke: {e}");
        return String::new();
    }
    thread::sleep(copy_delay);
    match clipboard.get_text() {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("clipboard read error: {e}");
            String::new()
        }
    }
}

/// Rewrite `req` and place the result on the clipboard.
///
/// The clipboard is only written when the API call succeeds.
pub fn rewrite_to_clipboard(
    client: &RewriteClient,
    req: &RewriteRequest,
    clipboard: &dyn ClipboardAccess,
) -> Result<String> {
    let result = client.rewrite(req)?;
    clipboard.set_text(&result)?;
    Ok(result)
}

/// Give focus back to `target` and paste the clipboard into it.
pub fn paste_into(target: TargetWindow, keys: &dyn KeySender, delay: Duration) -> Result<()> {
    thread::sleep(delay);
    target.restore();
    keys.send_paste()
}
