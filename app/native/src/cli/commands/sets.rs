//! Set listing, inspection and export.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::engine_options;
use crate::assets::ResourceProvider;
use crate::cli::output;
use crate::error::ParrotBarError;
use crate::imaging::{OffsetClass, base_name};
use crate::sets::{
    LoaderOptions, MenuEntry, SetCommand, SetKind, SetLoader, SetRegistry, static_set_names,
};

/// Sets found in a bundle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetListing {
    /// GIF sets in menu order.
    pub gif: Vec<String>,
    /// GIF sets listed under "More Sets".
    pub more: Vec<String>,
    #[serde(rename = "static")]
    pub stills: Vec<String>,
}

/// Result of loading one set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReport {
    pub name: String,
    pub kind: SetKind,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub offset: String,
    pub shift: f32,
}

fn noop_command(_: &str) -> SetCommand { Arc::new(|| {}) }

#[must_use]
pub fn collect_sets(provider: &dyn ResourceProvider) -> SetListing {
    let registry = SetRegistry::discover(provider, noop_command);

    let mut gif = Vec::new();
    let mut more = Vec::new();
    let mut in_more = false;
    for entry in registry.menu_entries() {
        match entry {
            MenuEntry::MoreSets => in_more = true,
            MenuEntry::Set(name) if in_more => more.push(name),
            MenuEntry::Set(name) => gif.push(name),
        }
    }

    SetListing { gif, more, stills: static_set_names(provider) }
}

/// Loads `name` and reports the normalized result.
///
/// # Errors
///
/// Returns [`ParrotBarError::SetNotFound`] if the set has no frames.
pub fn inspect_set(
    provider: Arc<dyn ResourceProvider>,
    name: &str,
    kind: SetKind,
    options: LoaderOptions,
) -> Result<SetReport, ParrotBarError> {
    let loader = SetLoader::new(provider, options);
    let frames = loader.load(name, kind);
    let Some(first) = frames.first() else {
        return Err(ParrotBarError::SetNotFound(name.to_string()));
    };

    let class: OffsetClass = loader.resizer().policy().classify(base_name(name));
    Ok(SetReport {
        name: name.to_string(),
        kind,
        frames: frames.len(),
        width: first.width(),
        height: first.height(),
        offset: class.to_string(),
        shift: class.shift(),
    })
}

/// Writes every normalized frame of `name` to `out` as `<name>-<index>.png`.
///
/// # Errors
///
/// Returns an error if the set has no frames or a file cannot be written.
pub fn export_set(
    provider: Arc<dyn ResourceProvider>,
    name: &str,
    kind: SetKind,
    options: LoaderOptions,
    out: &Path,
) -> Result<Vec<PathBuf>, ParrotBarError> {
    let loader = SetLoader::new(provider, options);
    let frames = loader.load(name, kind);
    if frames.is_empty() {
        return Err(ParrotBarError::SetNotFound(name.to_string()));
    }

    fs::create_dir_all(out)?;

    let mut written = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        let path = out.join(format!("{name}-{index:02}.png"));
        frame.save_with_format(&path, image::ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "wrote frame");
        written.push(path);
    }

    Ok(written)
}

/// Prints the sets of the bundle.
///
/// # Errors
///
/// Returns an error if the listing cannot be serialized.
pub fn list(provider: &Arc<dyn ResourceProvider>, json: bool) -> Result<(), ParrotBarError> {
    #[derive(Tabled)]
    struct SetRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Group")]
        group: String,
    }

    let listing = collect_sets(provider.as_ref());

    if json {
        output::print_highlighted_json(&serde_json::to_value(&listing)?);
        return Ok(());
    }

    let rows: Vec<SetRow> = listing
        .gif
        .iter()
        .map(|name| (name, "gif", "Primary"))
        .chain(listing.more.iter().map(|name| (name, "gif", "More Sets")))
        .chain(listing.stills.iter().map(|name| (name, "static", "")))
        .map(|(name, kind, group)| SetRow {
            name: name.clone(),
            kind: kind.to_string(),
            group: group.to_string(),
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No sets found.".dimmed());
        return Ok(());
    }

    let count = rows.len();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", format!("Sets ({count})").bold());
    println!("{table}");
    Ok(())
}

/// Prints the report of one set.
///
/// # Errors
///
/// Returns an error if the set has no frames.
pub fn inspect(
    provider: Arc<dyn ResourceProvider>,
    name: &str,
    kind: SetKind,
    json: bool,
) -> Result<(), ParrotBarError> {
    #[derive(Tabled)]
    struct ReportRow {
        #[tabled(rename = "Set")]
        name: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Frames")]
        frames: usize,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Offset")]
        offset: String,
        #[tabled(rename = "Shift")]
        shift: String,
    }

    let report = inspect_set(provider, name, kind, engine_options().loader)?;

    if json {
        output::print_highlighted_json(&serde_json::to_value(&report)?);
        return Ok(());
    }

    let row = ReportRow {
        name: report.name.clone(),
        kind: report.kind.to_string(),
        frames: report.frames,
        size: format!("{}x{}", report.width, report.height),
        offset: report.offset.clone(),
        shift: format!("{:.1}px", report.shift),
    };

    let table = Table::new([row])
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

/// Exports one set and prints where the frames went.
///
/// # Errors
///
/// Returns an error if the set has no frames or a file cannot be written.
pub fn export(
    provider: Arc<dyn ResourceProvider>,
    name: &str,
    kind: SetKind,
    out: &Path,
) -> Result<(), ParrotBarError> {
    let written = export_set(provider, name, kind, engine_options().loader, out)?;
    println!(
        "{} {} frames of {} to {}",
        "Exported".green(),
        written.len(),
        name.bold(),
        out.display()
    );
    Ok(())
}
