//! Scene-list exporter CLI

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use scenelist_export::locate::locate_template_anchors;
use scenelist_export::{
    export_scene_list, transform_scenes, AnalyzeResponse, AnalyzedScene, ExportOptions,
    SceneRecord,
};
use scenelist_xlsx::XlsxReader;

#[derive(Parser)]
#[command(name = "scenelist")]
#[command(author, version, about = "Scene-list spreadsheet exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene list into a template and write the result
    Export {
        /// Scene JSON: an analysis-service response or a plain scene array
        #[arg(short, long)]
        scenes: PathBuf,

        /// Template spreadsheet (xlsx)
        #[arg(short, long)]
        template: PathBuf,

        /// Tracked characters, comma-separated (default: all detected)
        #[arg(short, long)]
        characters: Option<String>,

        /// Original upload name the title is derived from
        /// (default: the scene file's name)
        #[arg(long)]
        source_name: Option<String>,

        /// Directory for the produced file (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Locate and print a template's anchor cells
    Anchors {
        /// Template spreadsheet (xlsx)
        #[arg(short, long)]
        template: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            scenes,
            template,
            characters,
            source_name,
            output_dir,
        } => export(
            &scenes,
            &template,
            characters.as_deref(),
            source_name.as_deref(),
            output_dir.as_deref(),
        ),
        Commands::Anchors { template } => show_anchors(&template),
    }
}

/// Accept either a full analysis response or a bare scene array
fn load_scenes(path: &Path) -> Result<(Vec<AnalyzedScene>, Vec<String>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    if let Ok(response) = serde_json::from_str::<AnalyzeResponse>(&text) {
        return response
            .into_scenes()
            .context("Analysis response was not usable");
    }

    let scenes: Vec<AnalyzedScene> = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is neither a response nor a scene array", path.display()))?;
    if scenes.is_empty() {
        bail!("'{}' contains no scenes", path.display());
    }
    Ok((scenes, Vec::new()))
}

fn export(
    scenes_path: &Path,
    template_path: &Path,
    characters: Option<&str>,
    source_name: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let (raw_scenes, detected) = load_scenes(scenes_path)?;

    let tracked: Vec<String> = match characters {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => detected,
    };

    let records: Vec<SceneRecord> = transform_scenes(&raw_scenes, &tracked);

    let template = fs::read(template_path)
        .with_context(|| format!("Failed to read template '{}'", template_path.display()))?;

    let source_name = source_name
        .map(str::to_string)
        .or_else(|| {
            scenes_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "scene_list".to_string());

    let options = ExportOptions::default();
    let output = export_scene_list(&template, &records, &tracked, &source_name, &options)
        .context("Export failed")?;

    let out_path = output_dir
        .unwrap_or_else(|| Path::new("."))
        .join(&output.file_name);
    fs::write(&out_path, &output.bytes)
        .with_context(|| format!("Failed to write '{}'", out_path.display()))?;

    log::info!("{} scene(s), {} tracked character(s)", records.len(), tracked.len());
    println!("{}", out_path.display());
    Ok(())
}

fn show_anchors(template_path: &Path) -> Result<()> {
    let workbook = XlsxReader::read_file(template_path)
        .with_context(|| format!("Failed to read template '{}'", template_path.display()))?;
    let sheet = workbook
        .worksheet(0)
        .context("Template has no worksheets")?;

    let options = ExportOptions::default();
    let anchors = locate_template_anchors(sheet, &options)
        .context("Template is missing required anchors")?;

    println!("sheet:       {}", sheet.name());
    match anchors.title_cell {
        Some(addr) => println!("title cell:  {}", addr),
        None => println!("title cell:  (none, fallback {})", options.title_fallback_cell),
    }
    println!("header row:  {}", anchors.header_row + 1);
    println!("scene# col:  {}", anchors.scene_no_col + 1);
    println!("location:    {}", anchors.location_col + 1);
    println!("I/E:         {}", anchors.int_ext_col + 1);
    println!("D/N:         {}", anchors.day_night_col + 1);
    println!("content:     {}", anchors.content_col + 1);
    println!("remarks:     {}", anchors.remarks_col + 1);
    Ok(())
}
