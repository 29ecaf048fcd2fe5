//! Column planning for the exported table
//!
//! Decouples what the user asked to track from what the data actually
//! contains, so no character is silently dropped even when the selection
//! under- or over-covers the records.

use crate::scene::SceneRecord;

/// The finalized character column layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    characters: Vec<String>,
}

impl ColumnPlan {
    /// Build the plan from the explicit tracked list and the records.
    ///
    /// The explicit list is trimmed of blanks and deduplicated preserving
    /// order; names discovered in record presence maps that the selection
    /// missed are appended in first-seen order across records.
    pub fn build(tracked: &[String], records: &[SceneRecord]) -> Self {
        let mut characters: Vec<String> = Vec::new();

        for name in tracked {
            let name = name.trim();
            if !name.is_empty() && !characters.iter().any(|c| c == name) {
                characters.push(name.to_string());
            }
        }

        for record in records {
            for name in record.characters.keys() {
                if !name.is_empty() && !characters.iter().any(|c| c == name) {
                    characters.push(name.clone());
                }
            }
        }

        Self { characters }
    }

    /// The real tracked character names (may be empty)
    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    /// Labels for the character columns; an empty plan degenerates to one
    /// placeholder column so the layout never loses the slot entirely.
    pub fn column_labels(&self, placeholder: &str) -> Vec<String> {
        if self.characters.is_empty() {
            vec![placeholder.to_string()]
        } else {
            self.characters.clone()
        }
    }

    /// How many columns to insert between content and remarks
    pub fn insert_count(&self) -> u16 {
        self.characters.len().max(1) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record_with(names: &[&str]) -> SceneRecord {
        let mut characters = BTreeMap::new();
        for n in names {
            characters.insert(n.to_string(), true);
        }
        SceneRecord {
            characters,
            ..SceneRecord::default()
        }
    }

    #[test]
    fn test_explicit_list_is_trimmed_and_deduped() {
        let tracked = vec![
            " 철수 ".to_string(),
            "".to_string(),
            "영희".to_string(),
            "철수".to_string(),
        ];
        let plan = ColumnPlan::build(&tracked, &[]);
        assert_eq!(plan.characters(), ["철수", "영희"]);
    }

    #[test]
    fn test_discovered_names_are_appended() {
        let tracked = vec!["철수".to_string()];
        let records = vec![record_with(&["영희", "철수"]), record_with(&["민수"])];
        let plan = ColumnPlan::build(&tracked, &records);
        assert_eq!(plan.characters(), ["철수", "영희", "민수"]);
    }

    #[test]
    fn test_union_covers_both_sources() {
        let tracked = vec!["A".to_string(), "B".to_string()];
        let records = vec![record_with(&["B", "C"])];
        let plan = ColumnPlan::build(&tracked, &records);
        for name in ["A", "B", "C"] {
            assert_eq!(
                plan.characters().iter().filter(|c| *c == name).count(),
                1,
                "expected exactly one column for {}",
                name
            );
        }
    }

    #[test]
    fn test_empty_plan_uses_placeholder() {
        let plan = ColumnPlan::build(&[], &[]);
        assert!(plan.characters().is_empty());
        assert_eq!(plan.column_labels("인물"), ["인물"]);
        assert_eq!(plan.insert_count(), 1);
    }
}
