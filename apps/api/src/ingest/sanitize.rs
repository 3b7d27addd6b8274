//! Response sanitizer: isolates the JSON payload inside raw model text.
//!
//! Steps, in order:
//! 1. drop fenced code-block markers (with any language tag)
//! 2. slice from the first opening bracket of the expected shape to the last closing one
//! 3. normalize smart quotes to ASCII
//! 4. drop trailing commas before `}` / `]` outside string literals
//!
//! A truncated array (opening `[` with no closing `]`) is cut back to its last
//! complete element and closed. `None` means nothing usable was found.

use crate::ingest::kind::Shape;

const FENCE: &str = "```";

pub fn sanitize(raw: &str, shape: Shape) -> Option<String> {
    let unfenced = strip_fences(raw);
    let sliced = slice_payload(&unfenced, shape)?;
    let quoted = normalize_quotes(&sliced);
    Some(strip_trailing_commas(&quoted))
}

/// Removes every ``` marker together with a language tag directly after it.
fn strip_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn slice_payload(text: &str, shape: Shape) -> Option<String> {
    let (open, close) = shape.brackets();
    let start = text.find(open)?;
    let sliced = match text.rfind(close) {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => None,
    };
    match (shape, sliced) {
        (Shape::Array, Some(slice)) if scan(slice).depth == 0 => Some(slice.to_string()),
        (Shape::Array, _) => repair_truncated_array(&text[start..]),
        (Shape::Object, slice) => slice.map(str::to_string),
    }
}

/// Keeps the complete top-level elements of an unterminated array and closes it.
fn repair_truncated_array(text: &str) -> Option<String> {
    scan(text)
        .last_complete
        .map(|end| format!("{}]", &text[..=end]))
}

struct Scan {
    /// Bracket depth left open at the end of the text.
    depth: usize,
    /// Byte offset of the last bracket that closed a top-level array element.
    last_complete: Option<usize>,
}

fn scan(text: &str) -> Scan {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut last_complete = None;

    for (idx, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    last_complete = Some(idx);
                }
            }
            _ => {}
        }
    }

    Scan {
        depth: depth + usize::from(in_string),
        last_complete,
    }
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Drops a comma when the next non-whitespace character closes an object or array.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
