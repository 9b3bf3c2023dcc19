use std::fmt;
use std::thread;

/// Chord used when the settings file does not name a valid one.
pub const DEFAULT_HOTKEY: &str = "Ctrl+Shift+Q";

#[cfg(target_os = "windows")]
const HOTKEY_ID: i32 = 1;

/// A global key chord. `key` is a Win32 virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: u32,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub win: bool,
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            key: u32::from(b'Q'),
            ctrl: true,
            shift: true,
            alt: false,
            win: false,
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.win {
            write!(f, "Win+")?;
        }
        write!(f, "{}", key_name(self.key))
    }
}

/// Parse a hotkey string like "Ctrl+Shift+Q" into a [`Hotkey`].
///
/// Returns `None` for unknown tokens or when no main key is present.
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut win = false;
    let mut key: Option<u32> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "WIN" | "SUPER" => win = true,
            "" => {}
            _ => key = Some(parse_key(&upper)?),
        }
    }

    key.map(|key| Hotkey {
        key,
        ctrl,
        shift,
        alt,
        win,
    })
}

fn parse_key(upper: &str) -> Option<u32> {
    match upper {
        "SPACE" => Some(0x20),
        "TAB" => Some(0x09),
        "ENTER" | "RETURN" => Some(0x0D),
        "ESC" | "ESCAPE" => Some(0x1B),
        "DELETE" | "DEL" => Some(0x2E),
        "INSERT" | "INS" => Some(0x2D),
        "BACKSPACE" => Some(0x08),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "LEFT" => Some(0x25),
        "UP" => Some(0x26),
        "RIGHT" => Some(0x27),
        "DOWN" => Some(0x28),
        _ if upper.len() > 1 && upper.starts_with('F') => match upper[1..].parse::<u32>() {
            // VK_F1 = 0x70
            Ok(n) if (1..=24).contains(&n) => Some(0x6F + n),
            _ => None,
        },
        _ => {
            let mut chars = upper.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Some(c as u32),
                _ => None,
            }
        }
    }
}

fn key_name(vk: u32) -> String {
    match vk {
        0x20 => "Space".into(),
        0x09 => "Tab".into(),
        0x0D => "Enter".into(),
        0x1B => "Esc".into(),
        0x2E => "Delete".into(),
        0x2D => "Insert".into(),
        0x08 => "Backspace".into(),
        0x24 => "Home".into(),
        0x23 => "End".into(),
        0x21 => "PageUp".into(),
        0x22 => "PageDown".into(),
        0x25 => "Left".into(),
        0x26 => "Up".into(),
        0x27 => "Right".into(),
        0x28 => "Down".into(),
        0x70..=0x87 => format!("F{}", vk - 0x6F),
        _ => char::from_u32(vk)
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("VK{vk:#04X}")),
    }
}

/// Sent from the listener thread to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The chord was pressed while `target` had focus; `selection` is what
    /// the synthetic copy put on the clipboard.
    Triggered {
        selection: String,
        target: crate::clipboard::TargetWindow,
    },
}

/// Background thread owning the global hotkey registration.
pub struct HotkeyListener {
    hotkey: Hotkey,
}

impl HotkeyListener {
    pub fn new(hotkey: Hotkey) -> Self {
        Self { hotkey }
    }

    /// Register the chord and invoke `on_trigger` from the listener thread on
    /// every press. The registration lives for the rest of the process.
    pub fn start<F>(&self, on_trigger: F) -> thread::JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        let hotkey = self.hotkey;
        tracing::debug!("starting hotkey listener for {hotkey}");
        thread::spawn(move || run_listener(hotkey, on_trigger))
    }
}

#[cfg(target_os = "windows")]
fn run_listener<F: FnMut()>(hotkey: Hotkey, mut on_trigger: F) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
        MOD_SHIFT, MOD_WIN,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    let mut mods = MOD_NOREPEAT.0;
    if hotkey.ctrl {
        mods |= MOD_CONTROL.0;
    }
    if hotkey.shift {
        mods |= MOD_SHIFT.0;
    }
    if hotkey.alt {
        mods |= MOD_ALT.0;
    }
    if hotkey.win {
        mods |= MOD_WIN.0;
    }

    unsafe {
        if RegisterHotKey(None, HOTKEY_ID, HOT_KEY_MODIFIERS(mods), hotkey.key).is_err() {
            tracing::error!("failed to register hotkey '{hotkey}' (already in use?)");
            return;
        }
        tracing::info!("registered hotkey '{hotkey}' with ID {HOTKEY_ID}");

        let mut msg = MSG::default();
        loop {
            let got = GetMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0);
            // 0 is WM_QUIT, -1 is an error
            if got.0 <= 0 {
                tracing::warn!("hotkey message loop ended ({})", got.0);
                break;
            }
            if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_ID as usize {
                tracing::debug!("hotkey '{hotkey}' pressed");
                on_trigger();
            }
        }

        if UnregisterHotKey(None, HOTKEY_ID).is_ok() {
            tracing::info!("unregistered hotkey '{hotkey}'");
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn run_listener<F: FnMut()>(hotkey: Hotkey, _on_trigger: F) {
    tracing::warn!("global hotkey '{hotkey}' is only supported on Windows (noop)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_settings_format() {
        assert_eq!(Hotkey::default().to_string(), DEFAULT_HOTKEY);
        let hk = parse_hotkey("alt+f4").unwrap();
        assert_eq!(hk.to_string(), "Alt+F4");
    }
}
