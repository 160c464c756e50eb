use chordal_core::FontConfig;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
        }
    }
}

impl From<&FontConfig> for TextStyle {
    fn from(font: &FontConfig) -> Self {
        Self {
            font_family: font.font_family.clone(),
            font_size: font.font_size,
            font_weight: font.font_weight.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Text measurement supplied by whatever actually draws the labels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-agnostic measurer: every display column is `font_size * char_width_factor` wide.
///
/// Wide (CJK) characters count as two columns, zero-width marks as none.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let max_columns = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_columns as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// Adapts a host-provided `measure_text_width(text, style) -> width` function.
///
/// Heights are estimated from the font size since only widths drive label fitting.
pub struct FnTextMeasurer<F>(pub F);

impl<F> TextMeasurer for FnTextMeasurer<F>
where
    F: Fn(&str, &TextStyle) -> f64,
{
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let line_count = text.split('\n').count();
        TextMetrics {
            width: (self.0)(text, style),
            height: line_count as f64 * style.font_size * 1.2,
            line_count,
        }
    }
}

impl<F> std::fmt::Debug for FnTextMeasurer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnTextMeasurer(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_width_scales_with_columns_and_font_size() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let metrics = m.measure("Lisbon", &style);
        assert!((metrics.width - 36.0).abs() < 1e-9);
        assert_eq!(metrics.line_count, 1);
        assert!((metrics.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn wide_characters_take_two_columns() {
        let m = DeterministicTextMeasurer {
            char_width_factor: 1.0,
            line_height_factor: 1.0,
        };
        let style = TextStyle {
            font_size: 1.0,
            ..Default::default()
        };
        assert_eq!(m.measure("東京", &style).width, 4.0);
        assert_eq!(m.measure("ab\nabcd", &style).width, 4.0);
    }

    #[test]
    fn fn_measurer_delegates_width() {
        let m = FnTextMeasurer(|text: &str, _: &TextStyle| text.len() as f64 * 2.0);
        assert_eq!(m.measure("abc", &TextStyle::default()).width, 6.0);
    }
}
