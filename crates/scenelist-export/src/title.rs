//! Title derivation from an uploaded file name
//!
//! Scripts arrive named like `"2. 결혼하지마요_알고.pdf"` or `"01_intro.docx"`;
//! the exported file and its title cell want just the clean title.

/// Derive a clean title from a file name.
///
/// Strips the extension, then a leading ordinal prefix (digits followed by
/// separators, or digits followed by a single Hangul ordinal character and
/// a space), then residual leading punctuation. Falls back to the
/// extension-stripped name when stripping leaves nothing. Idempotent on
/// already-clean names.
pub fn derive_title(file_name: &str) -> String {
    let base = strip_extension(file_name);

    let mut cleaned = strip_ordinal_prefix(base);
    cleaned = strip_hangul_ordinal_prefix(cleaned);
    cleaned = cleaned.trim_start_matches([' ', '\t', '.', '_', '-']);
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        base.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Drop a trailing `.ext` segment (no dots or slashes inside the extension)
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &name[pos + 1..];
            if !ext.is_empty() && !ext.contains('/') {
                &name[..pos]
            } else {
                name
            }
        }
        _ => name,
    }
}

/// Strip a leading `digits + separators` prefix like `"2. "` or `"01_"`
fn strip_ordinal_prefix(s: &str) -> &str {
    let mut chars = s.char_indices().peekable();

    // Leading whitespace
    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }

    // At least one digit
    let mut saw_digit = false;
    while matches!(chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
        saw_digit = true;
        chars.next();
    }
    if !saw_digit {
        return s;
    }

    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }

    // At least one separator
    let is_sep = |c: char| matches!(c, '.' | '·' | ')' | ']' | '-' | '_' | ' ');
    let mut saw_sep = false;
    while matches!(chars.peek(), Some((_, c)) if is_sep(*c)) {
        saw_sep = true;
        chars.next();
    }
    if !saw_sep {
        return s;
    }

    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }

    match chars.peek() {
        Some(&(idx, _)) => &s[idx..],
        None => "",
    }
}

/// Strip a leading `digits + single Hangul ordinal + space` prefix like
/// `"3부 "` or `"2화 "`
fn strip_hangul_ordinal_prefix(s: &str) -> &str {
    let mut chars = s.char_indices().peekable();

    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }

    let mut saw_digit = false;
    while matches!(chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
        saw_digit = true;
        chars.next();
    }
    if !saw_digit {
        return s;
    }

    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }

    // Exactly one Hangul syllable
    match chars.next() {
        Some((_, c)) if ('가'..='힣').contains(&c) => {}
        _ => return s,
    }

    // Followed by whitespace
    let mut saw_space = false;
    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        saw_space = true;
        chars.next();
    }
    if !saw_space {
        return s;
    }

    match chars.peek() {
        Some(&(idx, _)) => &s[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_is_unchanged() {
        assert_eq!(derive_title("MyScript"), "MyScript");
        assert_eq!(derive_title("결혼하지마요"), "결혼하지마요");
    }

    #[test]
    fn test_numeric_prefixes_are_stripped() {
        assert_eq!(derive_title("2. 결혼하지마요_알고.pdf"), "결혼하지마요_알고");
        assert_eq!(derive_title("01_intro.docx"), "intro");
        assert_eq!(derive_title("3) 시나리오.hwp"), "시나리오");
    }

    #[test]
    fn test_hangul_ordinal_prefix() {
        assert_eq!(derive_title("3부 마지막회.pdf"), "마지막회");
    }

    #[test]
    fn test_leading_punctuation() {
        assert_eq!(derive_title("._드래프트.pdf"), "드래프트");
    }

    #[test]
    fn test_fallback_when_stripping_empties() {
        // Nothing left after stripping, fall back to the base name
        assert_eq!(derive_title("12. .pdf"), "12. ");
        assert_eq!(derive_title("...."), "....");
    }

    #[test]
    fn test_extension_only_stripped_once() {
        assert_eq!(derive_title("script.v2.final.pdf"), "script.v2.final");
    }
}
