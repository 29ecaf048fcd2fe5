//! Export configuration
//!
//! Everything the template and house style pin down lives here: header
//! labels, the presence glyph, marker tokens for scene-number
//! normalization, column widths, and the output naming. Defaults match
//! the standard Korean scene-list template.

use scenelist_core::CellAddress;

/// Marker tokens for normalizing special scene-number labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneMarkers {
    /// Tokens marking an episode/ending/outro scene (matched as lowercase
    /// substrings)
    pub episode_tokens: Vec<String>,
    /// Short code written for episode-like labels
    pub episode_code: String,
    /// Tokens marking a prologue/intro scene
    pub prologue_tokens: Vec<String>,
    /// Short code written for prologue-like labels
    pub prologue_code: String,
}

impl Default for SceneMarkers {
    fn default() -> Self {
        Self {
            episode_tokens: vec!["epi".into(), "end".into(), "outro".into()],
            episode_code: "Ep".into(),
            prologue_tokens: vec!["pro".into(), "intro".into()],
            prologue_code: "Pr".into(),
        }
    }
}

impl SceneMarkers {
    /// Normalize one scene-number label.
    ///
    /// Matching is case-insensitive substring; labels matching no token
    /// pass through trimmed but otherwise untouched.
    pub fn normalize(&self, label: &str) -> String {
        let trimmed = label.trim();
        let lower = trimmed.to_lowercase();
        if self.episode_tokens.iter().any(|t| lower.contains(t.as_str())) {
            self.episode_code.clone()
        } else if self.prologue_tokens.iter().any(|t| lower.contains(t.as_str())) {
            self.prologue_code.clone()
        } else {
            trimmed.to_string()
        }
    }
}

/// Configuration for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Header marker that anchors the header row
    pub scene_no_header: String,
    pub location_header: String,
    pub int_ext_header: String,
    pub day_night_header: String,
    pub content_header: String,
    pub remarks_header: String,
    /// Column label used when no characters are tracked
    pub character_placeholder: String,
    /// Glyph written for a present character
    pub presence_glyph: String,
    /// Literal token replaced in the template's title cell
    pub title_placeholder: String,
    /// Where the title goes when the placeholder is missing
    pub title_fallback_cell: CellAddress,
    /// Word following the bracketed title in the title cell
    pub title_suffix: String,
    /// Appended to the derived title for the output file name
    pub file_suffix: String,
    pub markers: SceneMarkers,
    /// Widths for scene#, location, I/E, D/N, content
    pub fixed_widths: [f64; 5],
    pub character_width: f64,
    pub remarks_width: f64,
    /// Character width the height estimator assumes for the content column
    pub content_wrap_width: f64,
    /// Font used for everything the exporter writes
    pub font_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scene_no_header: "S#".into(),
            location_header: "장소".into(),
            int_ext_header: "I/E".into(),
            day_night_header: "D/N".into(),
            content_header: "내용".into(),
            remarks_header: "비고".into(),
            character_placeholder: "인물".into(),
            presence_glyph: "○".into(),
            title_placeholder: "<제목>".into(),
            title_fallback_cell: CellAddress::new(0, 1),
            title_suffix: "SceneList".into(),
            file_suffix: "_SceneList".into(),
            markers: SceneMarkers::default(),
            fixed_widths: [6.0, 18.0, 6.0, 6.0, 55.0],
            character_width: 6.0,
            remarks_width: 20.0,
            content_wrap_width: 55.0,
            font_name: "맑은 고딕".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_normalization() {
        let markers = SceneMarkers::default();
        assert_eq!(markers.normalize("Epilogue"), "Ep");
        assert_eq!(markers.normalize("THE END"), "Ep");
        assert_eq!(markers.normalize("outro"), "Ep");
        assert_eq!(markers.normalize("Prologue"), "Pr");
        assert_eq!(markers.normalize("Intro"), "Pr");
        assert_eq!(markers.normalize(" 12 "), "12");
        assert_eq!(markers.normalize("5-1"), "5-1");
    }
}
