//! Find where a dotted key's value starts in raw document text.
//!
//! No parse tree is built. The scan follows the block-mapping nesting rule: a
//! key's children are the lines after it that are strictly more indented,
//! up to the first line indented at or below the key. Only direct children
//! (lines at the block's own indentation) are compared against the next
//! segment. Blank and comment-only lines are skipped wherever they appear.
//!
//! The first segment is only looked up in the root mapping, so `port` never
//! binds to a nested `server.port`.
//!
//! Each segment is matched with its trailing `:`, so `server` never matches a
//! `servername:` line. A single line may also hold several segments as one
//! literal dotted key (`a.c: "2"`), the form reconciliation appends.
//!
//! Flow collections, multi-line scalars, quoted keys and `key :` spacing are
//! not recognized.

/// A dotted key split into segments, each ending with `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Split `dotted` on `.` and append `:` to every segment lacking one.
    pub fn parse(dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .map(|s| {
                if s.ends_with(':') {
                    s.to_string()
                } else {
                    format!("{s}:")
                }
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn len(&self) -> usize {
        self.segments.len()
    }

    fn is_searchable(&self) -> bool {
        self.segments.iter().all(|s| s.len() > 1)
    }

    /// The text a line must start with to hold segments `from..to` as one key.
    fn needle(&self, from: usize, to: usize) -> String {
        let mut needle = String::new();
        for (i, segment) in self.segments[from..to].iter().enumerate() {
            if i > 0 {
                needle.push('.');
            }
            needle.push_str(segment.strip_suffix(':').unwrap_or(segment));
        }
        needle.push(':');
        needle
    }
}

/// One line of the document.
struct Line<'a> {
    /// Byte offset of the line's first character.
    start: usize,
    /// Leading spaces and tabs.
    indent: usize,
    /// The line with its indentation removed.
    content: &'a str,
}

impl Line<'_> {
    fn is_opaque(&self) -> bool {
        let body = self.content.trim();
        body.is_empty() || body.starts_with('#')
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split('\n') {
        let content = raw.trim_start_matches([' ', '\t']);
        lines.push(Line {
            start,
            indent: raw.len() - content.len(),
            content,
        });
        start += raw.len() + 1;
    }
    lines
}

/// Byte offset where the value of `dotted_key` starts in `text`.
///
/// The offset is just past the key's `:` and the blanks after it, so for
/// `key: value` it is two bytes past the colon. A key with no inline value
/// yields the offset of its line ending.
pub fn locate(dotted_key: &str, text: &str) -> Option<usize> {
    locate_path(&KeyPath::parse(dotted_key), text)
}

/// Like [`locate`] but with an already parsed [`KeyPath`].
pub fn locate_path(path: &KeyPath, text: &str) -> Option<usize> {
    if !path.is_searchable() {
        return None;
    }
    let scan = Scan {
        text,
        lines: split_lines(text),
        path,
    };
    scan.search(0, None, 0)
}

struct Scan<'a> {
    text: &'a str,
    lines: Vec<Line<'a>>,
    path: &'a KeyPath,
}

impl Scan<'_> {
    /// Search lines from `from` for segment `depth`.
    ///
    /// With `parent` set, only the block under a line of that indentation is
    /// searched. Without it (the first segment) the root mapping is searched:
    /// lines at the indentation of the document's first key.
    fn search(&self, from: usize, parent: Option<usize>, depth: usize) -> Option<usize> {
        let mut child_indent: Option<usize> = None;

        for (index, line) in self.lines.iter().enumerate().skip(from) {
            if line.is_opaque() {
                continue;
            }

            let level = *child_indent.get_or_insert(line.indent);
            match parent {
                Some(parent_indent) => {
                    if line.indent <= parent_indent || line.indent < level {
                        return None;
                    }
                    if line.indent > level {
                        continue;
                    }
                }
                None if line.indent != level => continue,
                None => {}
            }

            for to in depth + 1..=self.path.len() {
                let needle = self.path.needle(depth, to);
                if !line.content.starts_with(&needle) {
                    continue;
                }

                let colon = line.start + line.indent + needle.len() - 1;
                if to == self.path.len() {
                    return Some(self.value_start(colon));
                }
                if let Some(found) = self.search(index + 1, Some(line.indent), to) {
                    return Some(found);
                }
            }
        }

        None
    }

    fn value_start(&self, colon: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut pos = colon + 1;
        while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }
        pos
    }
}
