//! Column arithmetic for task titles in plain-text listings.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit a title into `max_cells`, ending with `…` when it had to be cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(grapheme);
    }
    out.push('\u{2026}');
    out
}

/// Truncate, then pad with spaces to exactly `cells` wide
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let pad = cells.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat_n(' ', pad));
    out
}
