use crate::RawLogRecord;

/// Aggregation identity of a log record. Timestamps are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogKey {
    pub severity: String,
    pub source: String,
    pub code: String,
    pub message: String,
    pub method_name: String,
}

impl LogKey {
    pub fn from_record(record: &RawLogRecord) -> Self {
        Self {
            severity: record.severity.clone(),
            source: record.source.clone(),
            code: record.code.clone(),
            message: clean_message(&record.message),
            method_name: record.method_name.clone(),
        }
    }
}

/// Flattens a server message into a single comma-free, quote-free line.
///
/// Lines are joined with a space, `,` becomes `-`, runs of spaces collapse to
/// one and `'` becomes a backtick. Applying it twice changes nothing.
pub fn clean_message(raw: &str) -> String {
    let joined = split_lines(raw).join(" ");

    let mut cleaned = String::with_capacity(joined.len());
    let mut prev_space = false;
    for c in joined.chars() {
        let c = match c {
            ',' => '-',
            '\'' => '`',
            other => other,
        };
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        cleaned.push(c);
    }
    cleaned
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits on every line boundary; a trailing break does not add an empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut end = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                end = next_idx + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
