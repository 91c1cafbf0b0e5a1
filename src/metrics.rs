//! Effective length of markup in reveal units.

use crate::data::Segment;
use crate::icons::IconSource;
use crate::markup::parse_markup;

/// Effective length of `markup`: one unit per character of literal text
/// plus one unit per resolved icon.
///
/// Characters are Unicode scalar values. Unresolved markers count their
/// literal bracket text.
///
/// ```rust
/// use textreveal_core::{effective_length, IconRegistry};
///
/// let icons = IconRegistry::material();
/// assert_eq!(effective_length("Hi [icon:star] there", &icons), 10);
/// assert_eq!(effective_length("[icon:unknown]", &icons), 14);
/// assert_eq!(effective_length("", &icons), 0);
/// ```
pub fn effective_length(markup: &str, icons: &dyn IconSource) -> usize {
    segments_length(&parse_markup(markup, icons))
}

/// Sum of reveal units over already-parsed segments.
#[inline]
pub fn segments_length(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::units).sum()
}

/// Number of units visible at `progress`, floored.
///
/// `progress` is clamped to `[0, 1]`; NaN reveals nothing.
///
/// ```rust
/// use textreveal_core::visible_units;
///
/// assert_eq!(visible_units(10, 0.5), 5);
/// assert_eq!(visible_units(1, 0.999999), 0);
/// assert_eq!(visible_units(1, 1.0), 1);
/// assert_eq!(visible_units(7, 3.0), 7);
/// ```
pub fn visible_units(total_units: usize, progress: f64) -> usize {
    if progress.is_nan() {
        return 0;
    }
    let progress = progress.clamp(0.0, 1.0);
    ((total_units as f64 * progress).floor() as usize).min(total_units)
}
