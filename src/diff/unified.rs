//! Unified-diff text for the markup renderer. Not a minimal line diff: when
//! both sides have content and differ, the hunk removes every old line and
//! adds every new one, and the renderer highlights words inside it.

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Format `old` -> `new` as a single-hunk unified diff between two labels
pub fn format_unified(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    let old = normalize_line_endings(old);
    let new = normalize_line_endings(new);
    let old_lines = split_lines(&old);
    let new_lines = split_lines(&new);

    let mut out = Vec::with_capacity(old_lines.len() + new_lines.len() + 6);
    out.push(format!("diff --git a/{old_label} b/{new_label}"));
    out.push(format!("--- a/{old_label}"));
    out.push(format!("+++ b/{new_label}"));
    out.push(format!(
        "@@ -1,{} +1,{} @@",
        old_lines.len().max(1),
        new_lines.len().max(1)
    ));

    if old == new && !old.is_empty() {
        out.extend(old_lines.iter().map(|line| format!(" {line}")));
    } else if is_blank(&old) && !is_blank(&new) {
        out.push("-".to_string());
        out.extend(new_lines.iter().map(|line| format!("+{line}")));
    } else if is_blank(&new) && !is_blank(&old) {
        out.extend(old_lines.iter().map(|line| format!("-{line}")));
        out.push("+".to_string());
    } else {
        out.extend(old_lines.iter().map(|line| format!("-{line}")));
        out.extend(new_lines.iter().map(|line| format!("+{line}")));
    }

    let mut document = out.join("\n");
    document.push('\n');
    document
}
