use quick_rewriter::popup::{PopupMode, PopupState, PopupStatus};
use quick_rewriter::prompts::Prompt;

fn prompts() -> Vec<Prompt> {
    vec![
        Prompt::new("Professional Tone", "Rewrite formally:\n\n{text}"),
        Prompt::new("fix grammar", "Correct mistakes:\n\n{text}"),
        Prompt::new("Bullet Points", "Turn into bullets:\n\n{text}"),
    ]
}

fn type_input(state: &mut PopupState, text: &str) {
    state.input = text.to_string();
    state.input_changed();
}

fn labels(state: &PopupState) -> Vec<String> {
    state.visible_prompts().map(|p| p.label.clone()).collect()
}

#[test]
fn typed_instruction_is_trimmed() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "  make it shorter ");
    assert_eq!(state.mode, PopupMode::Typing);
    assert_eq!(state.submit().as_deref(), Some("make it shorter"));
    assert_eq!(state.status, PopupStatus::Processing);
}

#[test]
fn empty_input_does_not_submit() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "   ");
    assert!(state.submit().is_none());
    assert_eq!(state.status, PopupStatus::Idle);
}

#[test]
fn slash_lists_prompts_alphabetically() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "/");
    assert!(state.in_quick_prompt_mode());
    assert_eq!(
        labels(&state),
        vec!["Bullet Points", "fix grammar", "Professional Tone"]
    );
    assert_eq!(state.selected(), Some(0));

    type_input(&mut state, "");
    assert_eq!(state.mode, PopupMode::Typing);
}

#[test]
fn submit_uses_highlighted_prompt_in_display_order() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "/");
    state.select_next();
    assert_eq!(state.submit().as_deref(), Some("Correct mistakes:\n\n{text}"));
}

#[test]
fn navigation_wraps_around() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "/");
    state.select_prev();
    assert_eq!(state.selected(), Some(2));
    state.select_next();
    assert_eq!(state.selected(), Some(0));
    state.select(1);
    assert_eq!(state.selected(), Some(1));
    state.select(7);
    assert_eq!(state.selected(), Some(1));
}

#[test]
fn filter_narrows_and_resets_highlight() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "/");
    state.select_next();
    type_input(&mut state, "/GRAM");
    assert_eq!(labels(&state), vec!["fix grammar"]);
    assert_eq!(state.selected(), Some(0));

    type_input(&mut state, "/zzz");
    assert!(labels(&state).is_empty());
    assert_eq!(state.selected(), None);
    assert!(state.submit().is_none());
}

#[test]
fn busy_state_blocks_resubmit_until_failure() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "shorten");
    assert!(state.submit().is_some());
    assert!(state.submit().is_none());
    state.fail("boom");
    assert_eq!(state.status, PopupStatus::Failed("boom".into()));
    assert!(state.submit().is_some());
}

#[test]
fn replacing_prompts_keeps_filter() {
    let mut state = PopupState::new(prompts());
    type_input(&mut state, "/tone");
    state.set_prompts(vec![
        Prompt::new("Casual Tone", "{text}"),
        Prompt::new("Formal Tone", "{text}"),
        Prompt::new("Summary", "{text}"),
    ]);
    assert_eq!(labels(&state), vec!["Casual Tone", "Formal Tone"]);
}
