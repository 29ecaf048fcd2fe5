//! Row height estimation
//!
//! Display heuristic, not exact text layout: long summaries should wrap
//! visibly instead of being clipped.

/// Height for the title row
pub const TITLE_ROW_HEIGHT: f64 = 30.0;
/// Height for spacer rows between title and header
pub const SPACER_ROW_HEIGHT: f64 = 24.0;
/// Height for the header row
pub const HEADER_ROW_HEIGHT: f64 = 30.0;

/// Minimum data-row height
const BASE_ROW_HEIGHT: f64 = 24.0;
/// Added per wrapped line beyond the first
const LINE_HEIGHT: f64 = 18.0;
/// Compensates for mixed-width character sets; a naive character count
/// underestimates the visual width of Hangul-heavy text
const WIDTH_FACTOR: f64 = 1.6;

/// Estimate a row height from wrapped summary text.
///
/// Approximates the line count as `ceil(chars / (width * 1.6))`, then
/// `max(24, lines > 1 ? lines * 18 + 10 : 24)`.
pub fn estimate_row_height(text: &str, column_char_width: f64) -> f64 {
    let chars = text.chars().count() as f64;
    let chars_per_line = column_char_width * WIDTH_FACTOR;
    let lines = (chars / chars_per_line).ceil();

    if lines > 1.0 {
        (lines * LINE_HEIGHT + 10.0).max(BASE_ROW_HEIGHT)
    } else {
        BASE_ROW_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_gets_base_height() {
        assert_eq!(estimate_row_height("", 55.0), 24.0);
        assert_eq!(estimate_row_height("짧은 요약", 55.0), 24.0);
    }

    #[test]
    fn test_long_text_grows() {
        // 55 * 1.6 = 88 chars per line; 100 chars is 2 lines
        let text = "a".repeat(100);
        assert_eq!(estimate_row_height(&text, 55.0), 2.0 * 18.0 + 10.0);

        let text = "a".repeat(200);
        assert_eq!(estimate_row_height(&text, 55.0), 3.0 * 18.0 + 10.0);
    }

    #[test]
    fn test_height_is_monotonic_in_length() {
        let mut last = 0.0;
        for len in [0, 10, 88, 89, 176, 177, 500, 1000] {
            let h = estimate_row_height(&"가".repeat(len), 55.0);
            assert!(h >= last, "height decreased at len {}", len);
            last = h;
        }
    }
}
