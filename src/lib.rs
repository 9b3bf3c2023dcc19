pub mod clipboard;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod popup;
pub mod prompts;
pub mod rewrite;
pub mod settings;
pub mod visibility;
