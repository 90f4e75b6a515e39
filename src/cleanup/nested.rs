//! Removal of nested delimited regions such as `{{templates}}` and `{| tables |}`.
//!
//! This is an approximate nesting tracker, not a parser: it only knows the
//! current region start, the current close marker and a depth counter. On
//! malformed input it degrades by merging regions instead of failing.

/// A marker occurrence as a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    start: usize,
    end: usize,
}

fn find_marker(text: &str, marker: &str, from: usize) -> Option<Marker> {
    let offset = text.get(from..)?.find(marker)?;
    let start = from + offset;
    Some(Marker {
        start,
        end: start + marker.len(),
    })
}

/// Removes every region delimited by `open` / `close`, nested ones included.
///
/// The content between the outermost matched pair is dropped together with
/// the markers. Text without an open marker, or without any close marker after
/// it, is returned unchanged.
///
/// When a nested region can never be closed, every region recorded so far is
/// collapsed into one span ending at the last close marker seen. That can
/// remove text that sat between two unrelated regions.
///
/// # Example
///
/// ```
/// use wikiclean::cleanup::strip_nested;
///
/// assert_eq!(strip_nested("a{{b{{c}}d}}e", "{{", "}}"), "ae");
/// ```
pub fn strip_nested(text: &str, open: &str, close: &str) -> String {
    if open.is_empty() || close.is_empty() {
        return text.to_string();
    }

    let Some(mut start) = find_marker(text, open, 0) else {
        return text.to_string();
    };
    let mut end = find_marker(text, close, start.end);
    let mut next = start;
    let mut depth = 0usize;
    let mut spans: Vec<(usize, usize)> = Vec::new();

    while let Some(mut close_at) = end {
        let Some(found) = find_marker(text, open, next.end) else {
            // No more openings: consume one close per open level
            while depth > 0 {
                depth -= 1;
                match find_marker(text, close, close_at.end) {
                    Some(further) => close_at = further,
                    None => break,
                }
            }
            spans.push((start.start, close_at.end));
            break;
        };
        next = found;

        let mut exhausted = false;
        while close_at.end < next.start {
            if depth > 0 {
                depth -= 1;
                let last = close_at.end;
                match find_marker(text, close, last) {
                    Some(further) => close_at = further,
                    None => {
                        let first = spans.first().map_or(start.start, |span| span.0);
                        spans = vec![(first, last)];
                        exhausted = true;
                        break;
                    }
                }
            } else {
                spans.push((start.start, close_at.end));
                start = next;
                match find_marker(text, close, next.end) {
                    Some(further) => close_at = further,
                    None => exhausted = true,
                }
                break;
            }
        }

        if exhausted {
            break;
        }
        if next != start {
            depth += 1;
        }
        end = Some(close_at);
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span_start, span_end) in spans {
        if span_start > cursor {
            result.push_str(&text[cursor..span_start]);
        }
        cursor = cursor.max(span_end);
    }
    result.push_str(&text[cursor..]);
    result
}
