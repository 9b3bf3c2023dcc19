use quick_rewriter::hotkey::{parse_hotkey, Hotkey, DEFAULT_HOTKEY};
use quick_rewriter::settings::Settings;

#[test]
fn parse_default_chord() {
    let hk = parse_hotkey(DEFAULT_HOTKEY).expect("should parse default chord");
    assert_eq!(hk.key, u32::from(b'Q'));
    assert!(hk.ctrl && hk.shift && !hk.alt && !hk.win);
    assert_eq!(hk, Hotkey::default());
}

#[test]
fn parse_simple_f_key() {
    let hk = parse_hotkey("F2").expect("should parse F2");
    assert_eq!(hk.key, 0x71);
    assert!(!hk.ctrl && !hk.shift && !hk.alt);
}

#[test]
fn parse_combo_hotkey_is_case_insensitive() {
    let hk = parse_hotkey("ctrl + alt + space").expect("should parse combination");
    assert_eq!(hk.key, 0x20);
    assert!(hk.ctrl && hk.alt && !hk.shift);

    let hk = parse_hotkey("Win+1").unwrap();
    assert_eq!(hk.key, u32::from(b'1'));
    assert!(hk.win);
}

#[test]
fn parse_invalid_hotkey() {
    assert!(parse_hotkey("Ctrl+Foo").is_none());
    assert!(parse_hotkey("Ctrl+Shift").is_none());
    assert!(parse_hotkey("F25").is_none());
    assert!(parse_hotkey("").is_none());
}

#[test]
fn invalid_setting_falls_back_to_default() {
    let settings = Settings {
        hotkey: "Ctrl+Nope".into(),
        ..Settings::default()
    };
    assert_eq!(settings.hotkey(), Hotkey::default());

    let settings = Settings {
        hotkey: "Alt+R".into(),
        ..Settings::default()
    };
    let hk = settings.hotkey();
    assert_eq!(hk.key, u32::from(b'R'));
    assert!(hk.alt && !hk.ctrl);
}
