//! Config persistence: patch one value in a YAML file while preserving every
//! other byte.
//!
//! Only the existing value token is replaced. Indentation, trailing comments,
//! line endings and every other line stay exactly as they were. The new value
//! is written as given, so callers choose the quoting (`25565` or `"25565"`).

use std::path::Path;

use crate::error::MendError;
use crate::file;
use crate::locate::{KeyPath, locate_path};

/// Pure function: patch document text, setting `key` to `new_value`.
///
/// Returns the modified document string.
pub fn patch_document(content: &str, key: &str, new_value: &str) -> Result<String, MendError> {
    if new_value.contains(['\n', '\r']) {
        return Err(MendError::InvalidValue {
            key: key.into(),
            reason: "value must fit on a single line".into(),
        });
    }

    let path = KeyPath::parse(key);
    let start = locate_path(&path, content).ok_or_else(|| MendError::KeyNotFound(key.into()))?;
    let end = value_end(content, start);

    if start == end && opens_block(content, start) {
        return Err(MendError::InvalidValue {
            key: key.into(),
            reason: "key holds a nested mapping, not a value".into(),
        });
    }

    let head = &content[..start];
    let tail = &content[end..];

    let mut patched = String::with_capacity(content.len() + new_value.len() + 1);
    patched.push_str(head);
    if head.ends_with(':') {
        patched.push(' ');
    }
    patched.push_str(new_value);
    patched.push_str(tail);
    Ok(patched)
}

/// I/O wrapper: reads the file, patches `key`, writes the whole text back.
///
/// Fails with [`MendError::FileNotFound`] / [`MendError::IoError`] on read,
/// [`MendError::KeyNotFound`] when the key is not in the file, and
/// [`MendError::WriteError`] on write. The file is left unchanged on every
/// failure before the write.
pub fn patch_file(file_path: &Path, key: &str, new_value: &str) -> Result<(), MendError> {
    let content = file::read_external(file_path)?;
    let new_content = patch_document(&content, key, new_value)?;

    std::fs::write(file_path, &new_content).map_err(|e| MendError::WriteError {
        path: file_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %file_path.display(), key, "Patched config value");
    Ok(())
}

/// End of the value token that starts at `start`.
///
/// Quoted scalars end at their closing quote. Plain scalars end before an
/// inline ` #` comment. Trailing blanks and `\r` are never part of the token.
fn value_end(content: &str, start: usize) -> usize {
    let line_end = content[start..]
        .find('\n')
        .map_or(content.len(), |i| start + i);
    let line = &content[start..line_end];
    let line = line.strip_suffix('\r').unwrap_or(line);

    let len = match line.as_bytes().first() {
        Some(b'"') => closing_double_quote(line),
        Some(b'\'') => closing_single_quote(line),
        _ => None,
    }
    .unwrap_or_else(|| plain_len(line));

    start + len
}

fn closing_double_quote(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn closing_single_quote(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

fn plain_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    let comment = (1..bytes.len())
        .find(|&i| bytes[i] == b'#' && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t'));
    let body = match comment {
        Some(i) => &line[..i],
        None if line.starts_with('#') => "",
        None => line,
    };
    body.trim_end_matches([' ', '\t']).len()
}

/// Whether the key ending just before `start` has a block under it: a more
/// indented line, or a `- ` sequence item at the key's own indentation.
fn opens_block(content: &str, start: usize) -> bool {
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
    let key_indent = indent_of(&content[line_start..start]);

    let Some(rest) = content[start..].split_once('\n').map(|(_, rest)| rest) else {
        return false;
    };
    rest.split('\n')
        .find(|line| {
            let body = line.trim();
            !body.is_empty() && !body.starts_with('#')
        })
        .is_some_and(|line| {
            let indent = indent_of(line);
            indent > key_indent || (indent == key_indent && is_sequence_item(line))
        })
}

fn is_sequence_item(line: &str) -> bool {
    let body = line.trim();
    body == "-" || body.starts_with("- ") || body.starts_with("-\t")
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::try_load_external;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn replaces_only_value_token() {
        let content = "a:\n  b: \"1\"  # keep me\n";
        let result = patch_document(content, "a.b", "99").unwrap();
        assert_eq!(result, "a:\n  b: 99  # keep me\n");
    }

    #[test]
    fn replaces_plain_value() {
        let content = "port: 8080\nhost: localhost\n";
        let result = patch_document(content, "port", "3000").unwrap();
        assert_eq!(result, "port: 3000\nhost: localhost\n");
    }

    #[test]
    fn replaces_nested_quoted_value() {
        let content = "server:\n  name: \"x\"\n  port: \"25565\"\n";
        let result = patch_document(content, "server.port", "\"25566\"").unwrap();
        assert_eq!(result, "server:\n  name: \"x\"\n  port: \"25566\"\n");
    }

    #[test]
    fn quoted_value_with_hash_and_escapes() {
        let content = "motd: \"a \\\" # b\" # note\n";
        let result = patch_document(content, "motd", "\"hi\"").unwrap();
        assert_eq!(result, "motd: \"hi\" # note\n");
    }

    #[test]
    fn single_quoted_value_with_doubled_quote() {
        let content = "name: 'it''s' # c\n";
        let result = patch_document(content, "name", "'ok'").unwrap();
        assert_eq!(result, "name: 'ok' # c\n");
    }

    #[test]
    fn plain_value_keeps_inner_hash() {
        let content = "color: red#1\n";
        let result = patch_document(content, "color", "blue").unwrap();
        assert_eq!(result, "color: blue\n");
    }

    #[test]
    fn preserves_final_character_without_newline() {
        let content = "a: 1\nb: 2";
        let result = patch_document(content, "a", "10").unwrap();
        assert_eq!(result, "a: 10\nb: 2");

        let result = patch_document(content, "b", "20").unwrap();
        assert_eq!(result, "a: 1\nb: 20");
    }

    #[test]
    fn preserves_crlf() {
        let content = "a:\r\n  b: 1\r\n";
        let result = patch_document(content, "a.b", "2").unwrap();
        assert_eq!(result, "a:\r\n  b: 2\r\n");
    }

    #[test]
    fn fills_empty_value() {
        let content = "a:\n  b:\n  c: 1\n";
        let result = patch_document(content, "a.b", "x").unwrap();
        assert_eq!(result, "a:\n  b: x\n  c: 1\n");
    }

    #[test]
    fn fills_empty_value_with_space_present() {
        let content = "a: \nb: 1\n";
        let result = patch_document(content, "a", "x").unwrap();
        assert_eq!(result, "a: x\nb: 1\n");
    }

    #[test]
    fn rejects_mapping_key() {
        let content = "a:\n  b: 1\n";
        let result = patch_document(content, "a", "x");
        assert!(matches!(result, Err(MendError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_sequence_key() {
        let result = patch_document("list:\n- a\n- b\n", "list", "x");
        assert!(matches!(result, Err(MendError::InvalidValue { .. })));

        let result = patch_document("a:\n  list:\n  - x\n", "a.list", "y");
        assert!(matches!(result, Err(MendError::InvalidValue { .. })));
    }

    #[test]
    fn empty_value_before_sibling_is_filled() {
        let result = patch_document("a:\nb: 1\n", "a", "x").unwrap();
        assert_eq!(result, "a: x\nb: 1\n");
    }

    #[test]
    fn patches_root_key_not_nested_namesake() {
        let result = patch_document("server:\n  port: 1\nport: 2\n", "port", "9").unwrap();
        assert_eq!(result, "server:\n  port: 1\nport: 9\n");
    }

    #[test]
    fn rejects_multiline_value() {
        let result = patch_document("a: 1\n", "a", "x\ny: 2");
        assert!(matches!(result, Err(MendError::InvalidValue { .. })));
    }

    #[test]
    fn missing_key_errors() {
        let result = patch_document("a:\n  b: 1\n", "a.c", "2");
        assert!(matches!(result, Err(MendError::KeyNotFound(k)) if k == "a.c"));
    }

    #[test]
    fn patch_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let original = "# settings\na:\n  b: \"1\"  # keep me\n\nother: yes\n";
        fs::write(&path, original).unwrap();

        patch_file(&path, "a.b", "99").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, original.replace("\"1\"", "99"));
        assert_eq!(content.len(), original.len() - 1);
        assert!(content.ends_with("other: yes\n"));

        let values = try_load_external(&path).unwrap();
        assert_eq!(values["a.b"], "99");
        assert_eq!(values["other"], "yes");
    }

    #[test]
    fn patch_file_same_length_keeps_every_byte() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let original = "a:\n  b: \"1\"\n# trailer";
        fs::write(&path, original).unwrap();

        patch_file(&path, "a.b", "\"2\"").unwrap();

        let content = fs::read(&path).unwrap();
        assert_eq!(content.len(), original.len());
        assert_eq!(content, b"a:\n  b: \"2\"\n# trailer");
    }

    #[test]
    fn patch_file_missing_key_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "a: 1\n").unwrap();

        let result = patch_file(&path, "b", "2");
        assert!(matches!(result, Err(MendError::KeyNotFound(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a: 1\n");
    }

    #[test]
    fn patch_file_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = patch_file(&dir.path().join("nope.yml"), "a", "1");
        assert!(matches!(result, Err(MendError::FileNotFound { .. })));
    }

    #[test]
    fn patch_appended_dotted_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "a:\n  b: \"1\"\n\na.c: \"2\"\n").unwrap();

        patch_file(&path, "a.c", "\"3\"").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "a:\n  b: \"1\"\n\na.c: \"3\"\n"
        );
    }
}
