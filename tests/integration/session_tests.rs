use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use testpick::fuzzy::fuzzy_filter;
use testpick::tui::input::ScriptedInput;
use testpick::tui::run::{run_picker_with, SessionOptions, TuiError, TuiResult};
use testpick::tui::ui::{CURSOR_GLYPH, NO_MATCHES};

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

fn candidates() -> Vec<String> {
    vec![
        "tests/test_auth.py".to_string(),
        "tests/test_cache.py".to_string(),
    ]
}

fn run(candidates: &[String], input: ScriptedInput) -> (TuiResult<Option<String>>, String) {
    let mut input = input;
    let mut out = Vec::new();
    let result = run_picker_with(
        candidates,
        fuzzy_filter,
        &mut input,
        &mut out,
        &SessionOptions::default(),
    );
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_session_type_and_accept() {
    let (result, _) = run(&candidates(), ScriptedInput::from_bytes(b"au\r"));
    assert_eq!(result.unwrap().as_deref(), Some("tests/test_auth.py"));
}

#[test]
fn test_session_type_and_escape() {
    let (result, _) = run(&candidates(), ScriptedInput::from_bytes(b"au\x1b"));
    assert_eq!(result.unwrap(), None);
}

#[test]
fn test_session_arrow_down_and_accept() {
    let (result, _) = run(&candidates(), ScriptedInput::from_bytes(b"\x1b[B\r"));
    assert_eq!(result.unwrap().as_deref(), Some("tests/test_cache.py"));
}

#[test]
fn test_session_with_slow_arrow_sequence() {
    let input = ScriptedInput::from_bytes(b"\x1b")
        .gap(3)
        .bytes(b"O")
        .gap(3)
        .bytes(b"B")
        .gap(10)
        .bytes(b"\r");

    let (result, _) = run(&candidates(), input);
    assert_eq!(result.unwrap().as_deref(), Some("tests/test_cache.py"));
}

#[test]
fn test_session_backspace_restores_results() {
    let input = ScriptedInput::from_bytes(b"zz\x7f\x7f\x1b[B\r");
    let (result, output) = run(&candidates(), input);

    assert_eq!(result.unwrap().as_deref(), Some("tests/test_cache.py"));
    assert!(output.contains(NO_MATCHES));
}

#[test]
fn test_session_enter_without_matches_cancels() {
    let (result, output) = run(&candidates(), ScriptedInput::from_bytes(b"xyz\r"));

    assert_eq!(result.unwrap(), None);
    assert!(output.contains("0/2 matches"));
}

#[test]
fn test_session_empty_snapshot() {
    let (result, output) = run(&[], ScriptedInput::from_bytes(b"\r"));

    assert_eq!(result.unwrap(), None);
    assert!(output.contains("0/0 matches"));
}

#[test]
fn test_session_hides_and_restores_cursor() {
    let (_, output) = run(&candidates(), ScriptedInput::from_bytes(b"\r"));

    assert!(output.starts_with(HIDE_CURSOR));
    assert!(output.ends_with(&format!("{SHOW_CURSOR}\r\n")));
    assert_eq!(output.matches(HIDE_CURSOR).count(), 1);
    assert_eq!(output.matches(SHOW_CURSOR).count(), 1);
}

#[test]
fn test_session_redraw_moves_up_over_previous_frame() {
    // Initial frame: header, summary, two rows. Typing "au" leaves one row,
    // and the arrow key forces one more redraw of that shorter frame.
    let (_, output) = run(&candidates(), ScriptedInput::from_bytes(b"au\x1b[A\r"));

    // Redraw after the 4-line first frame moves up 3 lines
    assert!(output.contains("\x1b[3A"));
    // Frame after "au" has 3 lines, so the next redraw moves up 2
    assert!(output.contains("\x1b[2A"));
    assert!(output.contains(&format!("{CURSOR_GLYPH} tests/test_auth.py")));
}

#[test]
fn test_session_multibyte_query() {
    let snapshot = vec!["tests/test_café.py".to_string(), "tests/test_cafe.py".to_string()];
    let mut bytes = "é".as_bytes().to_vec();
    bytes.push(b'\r');

    let (result, _) = run(&snapshot, ScriptedInput::from_bytes(&bytes));
    assert_eq!(result.unwrap().as_deref(), Some("tests/test_café.py"));
}

#[test]
fn test_session_interrupted_by_shutdown_flag() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = SessionOptions::default().with_shutdown_flag(flag);
    let mut out = Vec::new();

    let result = run_picker_with(
        &candidates(),
        fuzzy_filter,
        &mut ScriptedInput::default(),
        &mut out,
        &options,
    );

    assert!(matches!(result, Err(TuiError::Interrupted)));
    assert!(String::from_utf8(out).unwrap().ends_with(&format!("{SHOW_CURSOR}\r\n")));
}
