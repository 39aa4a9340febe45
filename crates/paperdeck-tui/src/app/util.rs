use std::io::Write;

/// Copy text to the system clipboard via OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
pub(super) fn osc52_copy(text: &str) {
    let _ = std::io::stdout().write_all(osc52_sequence(text).as_bytes());
    let _ = std::io::stdout().flush();
}

fn osc52_sequence(text: &str) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Apply one search-box keystroke to `text`. `'\x08'` deletes the last char.
pub(super) fn edit_text(text: &str, ch: char) -> String {
    let mut out = text.to_string();
    if ch == '\x08' {
        out.pop();
    } else {
        out.push(ch);
    }
    out
}
