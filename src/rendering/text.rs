//! Deterministic text fitting for fixed label regions.
//!
//! Widths are the advances of the bundled bold faces (see [`super::fonts`]),
//! so a layout never depends on which fonts the host has installed. Both
//! weight tiers measure with the bold face; it is the heaviest one bundled.

use super::fonts;

pub const ELLIPSIS: char = '\u{2026}';

/// Font weight tiers used on the label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Bold,
    Black,
}

impl Weight {
    pub fn css(self) -> u16 {
        match self {
            Weight::Bold => 700,
            Weight::Black => 900,
        }
    }
}

/// How a region transforms its field before display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    AsGiven,
    Upper,
}

impl Case {
    pub fn apply(self, text: &str) -> String {
        match self {
            Case::AsGiven => text.to_string(),
            Case::Upper => text.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: Weight,
    pub italic: bool,
    /// Extra tracking in em; negative tightens
    pub letter_spacing: f32,
}

impl TextStyle {
    pub fn new(size: f32, weight: Weight) -> Self {
        Self {
            size,
            weight,
            italic: false,
            letter_spacing: 0.0,
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn tracking(mut self, em: f32) -> Self {
        self.letter_spacing = em;
        self
    }

    /// Advance of one character, tracking included
    pub fn advance(&self, c: char) -> f32 {
        (self.size * (fonts::advance_em(c, self.italic) + self.letter_spacing)).max(0.1)
    }

    pub fn measure(&self, text: &str) -> f32 {
        text.chars().map(|c| self.advance(c)).sum()
    }
}

/// Cut `text` to fit `max_width`, ending in an ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, style: &TextStyle, max_width: f32) -> String {
    if style.measure(text) <= max_width {
        return text.to_string();
    }
    let budget = max_width - style.advance(ELLIPSIS);
    if budget < 0.0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = style.advance(c);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push(ELLIPSIS);
    out
}

/// Word-wrap `text` into at most `max_lines` lines of `max_width`.
///
/// Whitespace (including newlines) collapses to single spaces. Words wider
/// than a line are broken. When text remains after the last allowed line,
/// that line ends in an ellipsis.
pub fn wrap_clamped(text: &str, style: &TextStyle, max_width: f32, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", cur, word)
        };
        if style.measure(&candidate) <= max_width {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        // place the word on a fresh line, breaking it if it is still too wide
        for c in word.chars() {
            if !cur.is_empty() && style.measure(&cur) + style.advance(c) > max_width {
                lines.push(std::mem::take(&mut cur));
            }
            cur.push(c);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }

    if lines.len() > max_lines {
        let overflow = lines.split_off(max_lines - 1).join(" ");
        let mut last = truncate_to_width(&overflow, style, max_width);
        if !last.ends_with(ELLIPSIS) {
            last = truncate_to_width(&last, style, max_width - style.advance(ELLIPSIS));
            if !last.ends_with(ELLIPSIS) {
                last.push(ELLIPSIS);
            }
        }
        lines.push(last);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        let s = TextStyle::new(10.0, Weight::Bold);
        assert_eq!(truncate_to_width("KAB. GOWA", &s, 200.0), "KAB. GOWA");
    }

    #[test]
    fn long_text_gets_ellipsis_within_width() {
        let s = TextStyle::new(10.0, Weight::Bold);
        let out = truncate_to_width("KOTA SURABAYA SELATAN TIMUR", &s, 60.0);
        assert!(out.ends_with(ELLIPSIS));
        assert!(s.measure(&out) <= 60.0);
    }

    #[test]
    fn nothing_fits_in_a_sliver() {
        let s = TextStyle::new(10.0, Weight::Bold);
        assert_eq!(truncate_to_width("ABC", &s, 3.0), "");
    }

    #[test]
    fn wrap_clamps_to_three_lines() {
        let s = TextStyle::new(8.5, Weight::Bold);
        let text = "JALAN ".repeat(40);
        let lines = wrap_clamped(&text, &s, 100.0, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with(ELLIPSIS));
        for l in &lines {
            assert!(s.measure(l) <= 100.0, "{:?} too wide", l);
        }
    }

    #[test]
    fn wrap_breaks_long_words() {
        let s = TextStyle::new(10.0, Weight::Bold);
        let word = "ABCDEFGHJKNOPQ";
        let lines = wrap_clamped(word, &s, 30.0, 10);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for (i, l) in lines.iter().enumerate() {
            assert!(s.measure(l) <= 30.0, "{:?} too wide", l);
            // each break happens only when the next letter would not fit
            if let Some(next) = lines.get(i + 1).and_then(|n| n.chars().next()) {
                assert!(s.measure(l) + s.advance(next) > 30.0);
            }
        }
    }

    #[test]
    fn widths_follow_the_bundled_face() {
        // W advances 2259/2048 em in DejaVu Sans Bold
        let s = TextStyle::new(9.0, Weight::Bold);
        let w = s.measure("WWWWWWWWWWWW");
        assert!((w - 119.13).abs() < 0.05, "measured {}", w);
        assert!(s.measure("iiii") < s.measure("MMMM"));

        let out = truncate_to_width("WWWWWWWWWWWW", &s, 109.5);
        assert!(out.ends_with(ELLIPSIS), "{:?}", out);
        assert!(s.measure(&out) <= 109.5);
    }

    #[test]
    fn italic_measures_with_the_oblique_face() {
        let upright = TextStyle::new(9.0, Weight::Bold);
        let italic = upright.italic();
        let text = "Penjual tidak perlu bayar ongkir ke Kurir";
        assert!(italic.measure(text) > 0.0);
        assert!((italic.measure(text) - upright.measure(text)).abs() < upright.measure(text) * 0.1);
    }

    #[test]
    fn wrap_collapses_newlines() {
        let s = TextStyle::new(10.0, Weight::Bold);
        let lines = wrap_clamped("JL. A\nNO 5", &s, 500.0, 3);
        assert_eq!(lines, vec!["JL. A NO 5"]);
    }

    #[test]
    fn tracking_changes_advance() {
        let tight = TextStyle::new(10.0, Weight::Black).tracking(-0.05);
        let loose = TextStyle::new(10.0, Weight::Black).tracking(0.1);
        assert!(tight.measure("SPX") < loose.measure("SPX"));
    }
}
