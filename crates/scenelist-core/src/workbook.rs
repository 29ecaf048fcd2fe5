//! Workbook implementation

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook: an ordered collection of worksheets
#[derive(Debug, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a new empty workbook (no sheets)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new workbook with a single sheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::default();
        wb.worksheets.push(Worksheet::new("Sheet1"));
        wb
    }

    /// Add a worksheet with the given name
    pub fn add_worksheet<S: Into<String>>(&mut self, name: S) -> Result<&mut Worksheet> {
        let name = name.into();
        Self::validate_sheet_name(&name)?;
        if self.worksheets.iter().any(|ws| ws.name() == name) {
            return Err(Error::InvalidSheetName(format!(
                "duplicate sheet name: {}",
                name
            )));
        }
        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.last_mut().unwrap())
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Result<&Worksheet> {
        self.worksheets
            .get(index)
            .ok_or(Error::SheetOutOfBounds(index, self.worksheets.len()))
    }

    /// Get a worksheet mutably by index
    pub fn worksheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        let count = self.worksheets.len();
        self.worksheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Iterate over worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    /// Validate a sheet name per file-format rules
    fn validate_sheet_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("empty name".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "name too long (max {} chars): {}",
                MAX_SHEET_NAME_LEN, name
            )));
        }
        if name.contains(['\\', '/', '?', '*', '[', ']', ':']) {
            return Err(Error::InvalidSheetName(format!(
                "name contains invalid characters: {}",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_default_sheet() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
    }

    #[test]
    fn test_add_and_lookup() {
        let mut wb = Workbook::empty();
        wb.add_worksheet("SceneList").unwrap();
        assert!(wb.worksheet_by_name("SceneList").is_ok());
        assert!(wb.worksheet_by_name("Missing").is_err());
    }

    #[test]
    fn test_invalid_names() {
        let mut wb = Workbook::empty();
        assert!(wb.add_worksheet("").is_err());
        assert!(wb.add_worksheet("a/b").is_err());
        assert!(wb.add_worksheet("x".repeat(32)).is_err());
        wb.add_worksheet("ok").unwrap();
        assert!(wb.add_worksheet("ok").is_err());
    }
}
