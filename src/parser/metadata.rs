//! Indentation-driven metadata tree building.
//!
//! A record is a sequence of sections whose nesting is expressed purely by
//! indentation:
//!
//! ```text
//! SOURCE      severe acute respiratory syndrome coronavirus 2
//!   ORGANISM  Severe acute respiratory syndrome coronavirus 2
//!             Viruses; Riboviria; Orthornavirae; ...
//! ```
//!
//! [`parse_item`] turns one section (and everything nested under it) into a
//! `(key, multi-line value, children)` node: lines indented at least as far
//! as the value column continue the value, lines between the key column and
//! the value column open a nested child, and anything at or left of the key
//! column ends the item. Every higher-level parser consumes this tree.

use crate::parser::ParseError;

/// One node of the metadata tree. Transient: built and consumed within a
/// single parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MetadataItem {
    pub name: String,
    pub content: String,
    pub children: Vec<MetadataItem>,
}

fn decode(line: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(line).map_err(|_| ParseError::MalformedData)
}

/// Column of the first non-space byte, or the line length for an all-space
/// line.
fn indent_of(line: &str) -> usize {
    line.bytes()
        .position(|b| b != b' ')
        .unwrap_or(line.len())
}

/// Parses the item starting at `lines[pos]`, returning it together with the
/// number of lines consumed (the item line plus all continuations and
/// nested children).
pub(crate) fn parse_item(
    lines: &[&[u8]],
    pos: usize,
) -> Result<(MetadataItem, usize), ParseError> {
    let text = decode(lines[pos])?;

    let key_indent = indent_of(text);
    if key_indent == text.len() {
        return Err(ParseError::ReachedEndOfLine);
    }
    let key_end = text[key_indent..]
        .find(' ')
        .map(|i| key_indent + i)
        .unwrap_or(text.len());
    let name = text[key_indent..key_end].to_string();

    // Value column, when the key line carries content of its own.
    let value_start = text[key_end..]
        .bytes()
        .position(|b| b != b' ')
        .map(|i| key_end + i);
    let (mut content, value_indent) = match value_start {
        Some(start) => (text[start..].to_string(), Some(start)),
        None => (String::new(), None),
    };

    let mut children = Vec::new();
    let mut lines_read = 1;

    while pos + lines_read < lines.len() {
        let line = decode(lines[pos + lines_read])?;
        let indent = indent_of(line);

        if value_indent.is_some_and(|v| indent >= v) {
            content.push('\n');
            content.push_str(&line[indent..]);
            lines_read += 1;
        } else if indent > key_indent {
            let (child, child_lines) = parse_item(lines, pos + lines_read)?;
            children.push(child);
            lines_read += child_lines;
        } else {
            break;
        }
    }

    Ok((
        MetadataItem {
            name,
            content,
            children,
        },
        lines_read,
    ))
}
