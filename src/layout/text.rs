use crate::fonts::FontHandle;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

/// Text already broken into lines for one font size and width.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowedText {
    pub lines: Vec<String>,
    /// Distance between consecutive baselines.
    pub line_pitch: f64,
    pub bbox: BoundingBox,
}

/// Greedy word wrap.
///
/// Tokens accumulate on a line while the measured width of the line stays
/// within `max_width`. A token that is wider than `max_width` on its own is
/// put on a line by itself unchanged: product names are mostly Thai, which
/// has no reliable break points inside a token, so it is never hyphenated
/// or split. A `\n` always starts a new line.
pub fn break_into_lines(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

pub fn flow(
    text: &str,
    font: &FontHandle,
    size_pt: f64,
    line_height: f64,
    max_width: f64,
) -> FlowedText {
    let lines = break_into_lines(text, max_width, |s| font.width_of_text(s, size_pt));
    let width = lines
        .iter()
        .map(|l| font.width_of_text(l, size_pt))
        .fold(0.0, f64::max);
    let line_pitch = size_pt * line_height;
    let height = lines.len() as f64 * line_pitch;
    FlowedText {
        lines,
        line_pitch,
        bbox: BoundingBox { width, height },
    }
}

/// Space a wrapped text block takes: the widest line by
/// `lines × size × line_height`.
pub fn compute_bounding_box(
    text: &str,
    font: &FontHandle,
    size_pt: f64,
    line_height: f64,
    max_width: f64,
) -> BoundingBox {
    flow(text, font, size_pt, line_height, max_width).bbox
}
