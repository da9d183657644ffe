//! Column marker segmentation.
//!
//! Splits markup into plain text runs and `[COLUMN_START] .. [COLUMN_END]`
//! blocks. Markers nest; the closing marker is matched by depth counting.

/// Opens a two-column block.
pub const COLUMN_START: &str = "[COLUMN_START]";
/// Separates the left column from the right column.
pub const COLUMN_BREAK: &str = "[COLUMN_BREAK]";
/// Closes a two-column block.
pub const COLUMN_END: &str = "[COLUMN_END]";

/// Maximum nesting of column blocks that are expanded into grids.
pub const MAX_COLUMN_NESTING: usize = 4;

/// A run of markup between column markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Text outside any column block.
    Text(&'a str),
    /// A complete column block.
    Columns {
        /// The whole block including its markers.
        raw: &'a str,
        /// Left column source.
        left: &'a str,
        /// Right column source (empty without a break marker).
        right: &'a str,
    },
}

/// Splits `input` into text and column segments.
///
/// An opening marker without a matching close stays part of the text.
pub(crate) fn split_columns(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find(COLUMN_START) {
        let inner_start = start + COLUMN_START.len();
        let Some(inner_len) = matching_end(&rest[inner_start..]) else {
            break;
        };
        let inner_end = inner_start + inner_len;
        let block_end = inner_end + COLUMN_END.len();

        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }

        let inner = &rest[inner_start..inner_end];
        let (left, right) = split_break(inner);
        segments.push(Segment::Columns {
            raw: &rest[start..block_end],
            left,
            right,
        });

        rest = &rest[block_end..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }

    segments
}

/// Finds the offset of the `COLUMN_END` closing the block whose body starts
/// at `body`.
fn matching_end(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = 0;

    loop {
        let remaining = &body[pos..];
        let next_start = remaining.find(COLUMN_START);
        let next_end = remaining.find(COLUMN_END)?;

        match next_start {
            Some(open) if open < next_end => {
                depth += 1;
                pos += open + COLUMN_START.len();
            }
            _ => {
                if depth == 0 {
                    return Some(pos + next_end);
                }
                depth -= 1;
                pos += next_end + COLUMN_END.len();
            }
        }
    }
}

/// Splits a block body at its first top-level `COLUMN_BREAK`.
fn split_break(inner: &str) -> (&str, &str) {
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < inner.len() {
        let remaining = &inner[pos..];
        if remaining.starts_with(COLUMN_START) {
            depth += 1;
            pos += COLUMN_START.len();
        } else if remaining.starts_with(COLUMN_END) {
            depth = depth.saturating_sub(1);
            pos += COLUMN_END.len();
        } else if depth == 0 && remaining.starts_with(COLUMN_BREAK) {
            return (&inner[..pos], &inner[pos + COLUMN_BREAK.len()..]);
        } else {
            pos += remaining.chars().next().map_or(1, char::len_utf8);
        }
    }

    (inner, "")
}

/// Wraps two compiled columns into a presentation table.
pub(crate) fn column_grid(left: &str, right: &str) -> String {
    format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"border-collapse: collapse;\"><tr>\
         <td width=\"50%\" valign=\"top\" style=\"padding-right: 10px;\">{left}</td>\
         <td width=\"50%\" valign=\"top\" style=\"padding-left: 10px;\">{right}</td>\
         </tr></table>"
    )
}
