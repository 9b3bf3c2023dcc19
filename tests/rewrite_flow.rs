
use httpmock::prelude::*;
use mock_ctx::{MemoryClipboard, RecordingKeys};
use quick_rewriter::clipboard::{capture_selection, paste_into, rewrite_to_clipboard, TargetWindow};
use quick_rewriter::rewrite::{RewriteClient, RewriteRequest};
use quick_rewriter::settings::Settings;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client_for(url: String) -> RewriteClient {
    let settings = Settings {
        api_key: "k".into(),
        api_url: url,
        request_timeout_secs: 5,
        ..Settings::default()
    };
    RewriteClient::new(&settings).unwrap()
}

#[test]
fn failed_call_leaves_clipboard_untouched() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST);
        then.status(500).body("upstream exploded");
    });

    let clipboard = MemoryClipboard::with_text("teh cat sat");
    let client = client_for(server.url("/chat"));
    let res = rewrite_to_clipboard(
        &client,
        &RewriteRequest::new("teh cat sat", "Fix grammar"),
        &clipboard,
    );

    let err = res.unwrap_err().to_string();
    assert!(err.contains("500"), "{err}");
    assert_eq!(clipboard.text(), "teh cat sat");
    assert_eq!(*clipboard.writes.lock().unwrap(), 0);
}

#[test]
fn unreachable_server_leaves_clipboard_untouched() {
    // Port 9 (discard) is not expected to run an HTTP server.
    let client = client_for("http://127.0.0.1:9/chat".into());
    let clipboard = MemoryClipboard::with_text("original");
    let res = rewrite_to_clipboard(&client, &RewriteRequest::new("a", "b"), &clipboard);
    assert!(res.is_err());
    assert_eq!(clipboard.text(), "original");
}

#[test]
fn success_puts_result_on_clipboard() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .json_body(json!({ "choices": [ { "message": { "content": "the cat sat" } } ] }));
    });

    let clipboard = MemoryClipboard::with_text("teh cat sat");
    let client = client_for(server.url("/chat"));
    let out = rewrite_to_clipboard(
        &client,
        &RewriteRequest::new("teh cat sat", "Fix grammar"),
        &clipboard,
    )
    .unwrap();
    assert_eq!(out, "the cat sat");
    assert_eq!(clipboard.text(), "the cat sat");
}

#[test]
fn capture_releases_shift_then_copies() {
    let clipboard = Arc::new(MemoryClipboard::with_text("stale"));
    let keys = RecordingKeys {
        copy_puts: Some((clipboard.clone(), "selected words".into())),
        ..RecordingKeys::default()
    };

    let text = capture_selection(clipboard.as_ref(), &keys, Duration::from_millis(1));
    assert_eq!(text, "selected words");
    assert_eq!(keys.sent(), vec!["release", "copy"]);
}

#[test]
fn capture_failure_yields_empty_selection() {
    let clipboard = MemoryClipboard::with_text("stale");
    let keys = RecordingKeys {
        fail: true,
        ..RecordingKeys::default()
    };
    let text = capture_selection(&clipboard, &keys, Duration::from_millis(1));
    assert!(text.is_empty());
}

#[test]
fn paste_sends_ctrl_v() {
    let keys = RecordingKeys::default();
    paste_into(TargetWindow::default(), &keys, Duration::from_millis(1)).unwrap();
    assert_eq!(keys.sent(), vec!["paste"]);
}
