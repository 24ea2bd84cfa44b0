// Chat-template markers and prompt-building utilities shared by every caller.
// Each domain module keeps its own prompt templates next to the code using them.

/// Opens the user turn of the Phi-3 chat template.
pub const USER_TAG: &str = "<|user|>";
/// Closes a turn.
pub const END_TAG: &str = "<|end|>";
/// Opens the assistant turn; generation continues from here.
pub const ASSISTANT_TAG: &str = "<|assistant|>";
/// End-of-sequence marker some servers leave in decoded text.
pub const END_OF_TEXT_TAG: &str = "<|endoftext|>";

/// Wraps free-text instructions in the chat template expected by the model.
pub fn format_chat_prompt(prompt: &str) -> String {
    format!("{USER_TAG}\n{prompt}{END_TAG}\n{ASSISTANT_TAG}\n")
}

/// Removes the chat wrapper from decoded model output.
///
/// If the prompt was echoed back, everything up to the last assistant marker is
/// dropped. Stray end markers are removed and the result is trimmed.
pub fn strip_chat_markers(text: &str) -> String {
    let reply = match text.rfind(ASSISTANT_TAG) {
        Some(idx) => &text[idx + ASSISTANT_TAG.len()..],
        None => text,
    };
    reply
        .replace(END_OF_TEXT_TAG, "")
        .replace(END_TAG, "")
        .trim()
        .to_string()
}

/// Fills `{key}` placeholders in a single pass.
///
/// Substituted values are never re-scanned, so user text containing something
/// like `{answer}` is inserted literally. Unknown placeholders and the JSON
/// braces inside templates are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        for (key, value) in vars {
            let after_brace = &tail[1..];
            if after_brace.starts_with(key) && after_brace[key.len()..].starts_with('}') {
                out.push_str(value);
                rest = &after_brace[key.len() + 1..];
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}
