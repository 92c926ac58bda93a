//! Raw-text scan for keys defined more than once in the same table.
//!
//! TOML forbids duplicate keys, so the parser reports them as plain syntax
//! errors. For tables whose keys are user-chosen names (script names, extras,
//! data categories) a repeated key is a semantic mistake, and the loader
//! wants to say which table and key are at fault. This scanner understands
//! just enough TOML to do that: table headers, quoted and dotted keys,
//! strings, comments and values spanning several lines.

use std::collections::{HashMap, HashSet};

/// A key defined twice inside one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Dotted path of the table, e.g. `project.scripts`.
    pub table: String,
    pub key: String,
    /// 1-based line of the second definition.
    pub line: usize,
}

/// Find the first key that appears twice in one of `tables`.
pub fn find_duplicate_key(text: &str, tables: &[&str]) -> Option<DuplicateKey> {
    let mut current: Vec<String> = Vec::new();
    let mut seen: HashMap<String, HashSet<String>> = HashMap::new();
    let mut value = ValueState::default();

    for (index, raw_line) in text.lines().enumerate() {
        if value.pending() {
            value.feed(raw_line);
            continue;
        }

        let line = raw_line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix("[[") {
            current = key_segments(until_unquoted(header, b']'));
            // Each `[[array]]` element opens a fresh table.
            seen.remove(&current.join("."));
            continue;
        }
        if let Some(header) = line.strip_prefix('[') {
            current = key_segments(until_unquoted(header, b']'));
            continue;
        }

        let key_text = until_unquoted(line, b'=');
        if key_text.len() == line.len() {
            continue;
        }
        let mut path = current.clone();
        path.extend(key_segments(key_text));
        let Some(key) = path.pop() else {
            continue;
        };
        if let Some(dup) = record(&mut seen, tables, path.join("."), &key, index + 1) {
            return Some(dup);
        }

        let rest = &line[key_text.len() + 1..];
        let inline = rest.trim_start();
        if inline.starts_with('{') {
            path.push(key);
            if let Some(dup) = scan_inline(&path, inline, tables, &mut seen, index + 1) {
                return Some(dup);
            }
        }

        value.feed(rest);
    }

    None
}

type Seen = HashMap<String, HashSet<String>>;

/// Remember `key` under `table`, reporting it if that table already has it.
fn record(
    seen: &mut Seen,
    tables: &[&str],
    table: String,
    key: &str,
    line: usize,
) -> Option<DuplicateKey> {
    if tables.contains(&table.as_str())
        && !seen
            .entry(table.clone())
            .or_default()
            .insert(key.to_string())
    {
        return Some(DuplicateKey {
            table,
            key: key.to_string(),
            line,
        });
    }
    None
}

/// Check the keys of the inline table `value` (starting at `{`) defined at `table`.
fn scan_inline(
    table: &[String],
    value: &str,
    tables: &[&str],
    seen: &mut Seen,
    line: usize,
) -> Option<DuplicateKey> {
    for entry in inline_entries(value) {
        let key_text = until_unquoted(entry, b'=');
        if key_text.len() == entry.len() {
            continue;
        }
        let mut path = table.to_vec();
        path.extend(key_segments(key_text));
        let Some(key) = path.pop() else {
            continue;
        };
        if let Some(dup) = record(seen, tables, path.join("."), &key, line) {
            return Some(dup);
        }

        let nested = entry[key_text.len() + 1..].trim_start();
        if nested.starts_with('{') {
            path.push(key);
            if let Some(dup) = scan_inline(&path, nested, tables, seen, line) {
                return Some(dup);
            }
        }
    }
    None
}

/// Split an inline table into its top-level `key = value` entries.
fn inline_entries(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 1;
    let mut i = 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'#' if depth == 0 => break,
            b'[' | b'{' => depth += 1,
            b'}' if depth == 0 => {
                entries.push(&value[start..i]);
                return entries;
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                entries.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    entries.push(&value[start..i]);
    entries
}

/// The prefix of `s` up to the first unquoted `stop` byte, or all of `s`.
fn until_unquoted(s: &str, stop: u8) -> &str {
    let bytes = s.as_bytes();
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == stop => return &s[..i],
            None => {}
        }
    }
    s
}

/// Split a (possibly dotted, possibly quoted) key into its segments.
fn key_segments(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote = None;

    for c in key.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == '.' => segments.push(unquote(&std::mem::take(&mut current))),
            None => current.push(c),
        }
    }
    segments.push(unquote(&current));
    segments
}

fn unquote(segment: &str) -> String {
    let segment = segment.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = segment
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    segment.to_string()
}

/// Tracks whether a value continues onto following lines.
#[derive(Debug, Default)]
struct ValueState {
    /// Open `[` / `{` not yet closed.
    depth: usize,
    /// Closing delimiter of an open multi-line string.
    multiline: Option<&'static str>,
}

impl ValueState {
    fn pending(&self) -> bool {
        self.depth > 0 || self.multiline.is_some()
    }

    fn feed(&mut self, fragment: &str) {
        let bytes = fragment.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if let Some(delim) = self.multiline {
                match find_from(bytes, i, delim.as_bytes()) {
                    Some(end) => {
                        i = end + delim.len();
                        self.multiline = None;
                        continue;
                    }
                    None => return,
                }
            }

            match bytes[i] {
                b'#' => return,
                b'[' | b'{' => self.depth += 1,
                b']' | b'}' => self.depth = self.depth.saturating_sub(1),
                quote @ (b'"' | b'\'') => {
                    let triple: &'static str = if quote == b'"' { "\"\"\"" } else { "'''" };
                    if bytes[i..].starts_with(triple.as_bytes()) {
                        self.multiline = Some(triple);
                        i += triple.len();
                    } else {
                        i = skip_string(bytes, i);
                    }
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
    }
}

fn find_from(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    haystack[start..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| start + pos)
}

/// Index just past the single-line string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        if quote == b'"' && bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j] == quote {
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}
