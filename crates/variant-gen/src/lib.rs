//! Batch generator that expands `.dtype.` templates into per-datatype
//! source files, mirroring the input directory tree under the output root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

pub mod catalog;
pub mod initializer;
pub mod substitute;
pub mod template;

/// Marker segment that identifies a template file: `<stem>.dtype.<suffix>`.
const TEMPLATE_MARKER: &str = ".dtype.";

/// Generation configuration supplied by the CLI.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Regenerate every template even when the destination is up to date.
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    pub templates: usize,
    pub written: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
struct TemplateInput {
    source: PathBuf,
    relative: PathBuf,
}

/// Expand every template under `input_root` into its mapped destination
/// under `output_root`. Template files are processed strictly one at a time;
/// a failing file is reported and skipped without aborting the run.
pub fn generate_tree(opts: GenerateOptions) -> Result<GenerateSummary> {
    if !opts.input_root.exists() {
        bail!(
            "input directory '{}' does not exist",
            opts.input_root.display()
        );
    }

    let templates = discover_templates(&opts.input_root)?;
    if templates.is_empty() {
        warn!(
            "no {TEMPLATE_MARKER} templates found under {}",
            opts.input_root.display()
        );
        return Ok(GenerateSummary {
            templates: 0,
            written: 0,
            up_to_date: 0,
            failed: 0,
        });
    }

    info!("Discovered {} template(s)", templates.len());
    let pb = ProgressBar::new(templates.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let mut summary = GenerateSummary {
        templates: templates.len(),
        written: 0,
        up_to_date: 0,
        failed: 0,
    };
    for tpl in &templates {
        match generate_one(tpl, &opts) {
            Ok(true) => summary.written += 1,
            Ok(false) => summary.up_to_date += 1,
            Err(err) => {
                warn!("skipping {}: {err:#}", tpl.source.display());
                summary.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("templates processed");

    Ok(summary)
}

fn discover_templates(root: &Path) -> Result<Vec<TemplateInput>> {
    let mut templates = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = match path.file_name().and_then(|s| s.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if !name.contains(TEMPLATE_MARKER) {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} is not under the input root", path.display()))?
            .to_path_buf();
        templates.push(TemplateInput {
            source: path.to_path_buf(),
            relative,
        });
    }
    templates.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(templates)
}

/// Process one template. Returns `Ok(true)` when the destination was
/// written and `Ok(false)` when the staleness check skipped it.
fn generate_one(tpl: &TemplateInput, opts: &GenerateOptions) -> Result<bool> {
    let mapped = mapped_output_path(&tpl.relative)?;
    let dest = opts.output_root.join(&mapped);

    if !opts.force && is_up_to_date(&tpl.source, &dest) {
        return Ok(false);
    }

    info!("Processing {}", mapped.display());
    let source_text = fs::read_to_string(&tpl.source)
        .with_context(|| format!("failed to read {}", tpl.source.display()))?;
    let expanded = template::expand_template(&source_text)
        .with_context(|| format!("failed to expand {}", tpl.source.display()))?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir {}", parent.display()))?;
    }
    fs::write(&dest, expanded)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(true)
}

/// Map a template's input-relative path to its destination-relative path by
/// removing the `.dtype` marker segment from the file name.
fn mapped_output_path(relative: &Path) -> Result<PathBuf> {
    let name = relative
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("template {} has no UTF-8 file name", relative.display()))?;
    let at = name
        .find(TEMPLATE_MARKER)
        .ok_or_else(|| anyhow!("file name '{name}' lacks the {TEMPLATE_MARKER} marker"))?;
    let stem = &name[..at];
    let suffix = &name[at + TEMPLATE_MARKER.len()..];
    if stem.is_empty() || suffix.is_empty() {
        bail!("file name '{name}' does not split into <stem>{TEMPLATE_MARKER}<suffix>");
    }
    Ok(relative.with_file_name(format!("{stem}.{suffix}")))
}

// The destination is fresh when it exists and its modification time is not
// older than the source's. A destination truncated by an interrupted write
// still counts as fresh until the source changes again.
fn is_up_to_date(source: &Path, dest: &Path) -> bool {
    let (Ok(src), Ok(dst)) = (fs::metadata(source), fs::metadata(dest)) else {
        return false;
    };
    match (src.modified(), dst.modified()) {
        (Ok(s), Ok(d)) => d >= s,
        _ => false,
    }
}
