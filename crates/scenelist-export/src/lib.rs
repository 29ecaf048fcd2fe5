//! Scene-list spreadsheet export
//!
//! Takes an arbitrary-length, arbitrary-column scene table and splices it
//! into a pre-existing spreadsheet template whose title cell, header row,
//! and column layout are discovered by scanning cell text, preserving the
//! template's styles, merged regions, and column widths.
//!
//! The pipeline: [`title::derive_title`] cleans the uploaded file name,
//! [`locate`] finds the template anchors, [`plan::ColumnPlan`] finalizes
//! the character columns, and [`export::export_scene_list`] performs the
//! structural edits and serializes the result.

pub mod error;
pub mod export;
pub mod layout;
pub mod locate;
pub mod options;
pub mod plan;
pub mod scene;
pub mod title;

pub use error::{ExportError, ExportResult};
pub use export::{export_scene_list, ExportOutput};
pub use options::{ExportOptions, SceneMarkers};
pub use plan::ColumnPlan;
pub use scene::{transform_scenes, AnalyzeResponse, AnalyzedScene, SceneRecord};
pub use title::derive_title;
