//! Scene records and the analysis service response contract

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{ExportError, ExportResult};

/// One row of the exported table
///
/// `characters` maps a tracked character name to a curated presence flag.
/// The exporter tolerates key sets that differ from the tracked list; its
/// own column planning unions the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneRecord {
    pub scene_no: String,
    pub location: String,
    pub int_ext: String,
    pub day_night: String,
    pub summary: String,
    pub characters: BTreeMap<String, bool>,
    pub extras: String,
}

/// One scene as returned by the analysis service
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzedScene {
    pub scene_no: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub ie: String,
    #[serde(default)]
    pub dn: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub extras: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMeta {
    /// Detected character names, ranked by the service
    #[serde(default)]
    pub all_detected_characters: Vec<String>,
}

/// Full analysis service response
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<AnalyzedScene>,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl AnalyzeResponse {
    /// Validate the response status and hand back the scene list.
    ///
    /// Any status other than `"success"`, or an empty scene list, is an
    /// error; no partial state is adopted.
    pub fn into_scenes(self) -> ExportResult<(Vec<AnalyzedScene>, Vec<String>)> {
        if self.status != "success" {
            return Err(ExportError::Analysis(format!(
                "unexpected status: {}",
                self.status
            )));
        }
        if self.data.is_empty() {
            return Err(ExportError::Analysis("empty scene list".into()));
        }
        Ok((self.data, self.meta.all_detected_characters))
    }
}

/// Convert analyzed scenes into export records for a tracked-character
/// selection.
///
/// A tracked character is present in a scene when any of the scene's
/// detected names contains the tracked name as a substring. Detected names
/// matching no tracked character are prepended to the record's extras,
/// comma-joined.
pub fn transform_scenes(raw: &[AnalyzedScene], tracked: &[String]) -> Vec<SceneRecord> {
    raw.iter()
        .map(|scene| {
            let mut characters = BTreeMap::new();
            for name in tracked {
                let present = scene.characters.iter().any(|c| c.contains(name.as_str()));
                characters.insert(name.clone(), present);
            }

            let dropped: Vec<&str> = scene
                .characters
                .iter()
                .filter(|c| !tracked.iter().any(|name| c.contains(name.as_str())))
                .map(String::as_str)
                .collect();

            let extras = if dropped.is_empty() {
                scene.extras.clone()
            } else if scene.extras.is_empty() {
                dropped.join(", ")
            } else {
                format!("{}, {}", dropped.join(", "), scene.extras)
            };

            SceneRecord {
                scene_no: scene.scene_no.clone(),
                location: scene.location.clone(),
                int_ext: scene.ie.clone(),
                day_night: scene.dn.clone(),
                summary: scene.summary.clone(),
                characters,
                extras,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene(characters: &[&str], extras: &str) -> AnalyzedScene {
        AnalyzedScene {
            scene_no: "1".into(),
            location: "한강 둔치".into(),
            ie: "E".into(),
            dn: "N".into(),
            summary: "둘이 만난다".into(),
            characters: characters.iter().map(|s| s.to_string()).collect(),
            extras: extras.into(),
        }
    }

    #[test]
    fn test_transform_presence_by_substring() {
        let tracked = vec!["철수".to_string(), "영희".to_string()];
        // "철수(형)" still counts as 철수
        let records = transform_scenes(&[scene(&["철수(형)"], "")], &tracked);

        assert_eq!(records[0].characters["철수"], true);
        assert_eq!(records[0].characters["영희"], false);
    }

    #[test]
    fn test_transform_prepends_untracked_to_extras() {
        let tracked = vec!["철수".to_string()];
        let records = transform_scenes(&[scene(&["철수", "행인1", "행인2"], "비 오는 밤")], &tracked);

        assert_eq!(records[0].extras, "행인1, 행인2, 비 오는 밤");

        let records = transform_scenes(&[scene(&["행인1"], "")], &tracked);
        assert_eq!(records[0].extras, "행인1");
    }

    #[test]
    fn test_response_status_check() {
        let ok: AnalyzeResponse = serde_json::from_str(
            r#"{"status":"success","data":[{"scene_no":"1"}],"meta":{"all_detected_characters":["철수"]}}"#,
        )
        .unwrap();
        let (scenes, detected) = ok.into_scenes().unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(detected, vec!["철수".to_string()]);

        let bad: AnalyzeResponse =
            serde_json::from_str(r#"{"status":"error","data":[]}"#).unwrap();
        assert!(bad.into_scenes().is_err());
    }
}
