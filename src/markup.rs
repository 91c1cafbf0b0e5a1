//! Markup parsing for text interleaved with `[icon:<name>]` markers.

use crate::data::Segment;
use crate::icons::IconSource;

const MARKER_OPEN: &str = "[icon:";
const MARKER_CLOSE: char = ']';

/// Parse markup into ordered segments.
///
/// Markers are matched left to right without overlap. A marker is
/// `[icon:` followed by one or more characters other than `]`, then `]`.
/// Markers naming an id that `icons` does not resolve are kept verbatim as
/// literal text, and adjacent literal text is merged into one segment.
/// Parsing never fails.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::{parse_markup, IconRegistry, Segment};
///
/// let icons = IconRegistry::material();
/// let segments = parse_markup("Hi [icon:star] there", &icons);
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Text("Hi ".into()),
///         Segment::Icon("star".into()),
///         Segment::Text(" there".into()),
///     ]
/// );
/// ```
pub fn parse_markup(markup: &str, icons: &dyn IconSource) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = markup;

    while let Some(open) = rest.find(MARKER_OPEN) {
        let name_start = open + MARKER_OPEN.len();
        let Some(name_len) = rest[name_start..].find(MARKER_CLOSE) else {
            // No closing bracket anywhere ahead, so no later marker can match.
            break;
        };

        if name_len == 0 {
            // "[icon:]" is not a marker; resume scanning after it.
            literal.push_str(&rest[..name_start]);
            rest = &rest[name_start..];
            continue;
        }

        let name = &rest[name_start..name_start + name_len];
        let marker_end = name_start + name_len + MARKER_CLOSE.len_utf8();
        literal.push_str(&rest[..open]);

        if icons.contains(name) {
            if !literal.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Icon(name.to_string()));
        } else {
            tracing::trace!(icon = name, "unknown icon kept as text");
            literal.push_str(&rest[open..marker_end]);
        }
        rest = &rest[marker_end..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    segments
}

/// Split markup into lines and parse each one independently.
pub fn parse_lines(markup: &str, icons: &dyn IconSource) -> Vec<Vec<Segment>> {
    markup.split('\n').map(|line| parse_markup(line, icons)).collect()
}
