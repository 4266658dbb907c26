use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use runway_core::config::{ConfigStore, EstimatorConfig};
use runway_core::detection::AlignmentError;
use runway_core::frame::BgrFrame;
use runway_core::io::{is_frame_file, load_bgr_frame, save_bgr_frame};
use runway_core::pipeline::{run_frames, FitDescriptor, FrameSink};
use serde::Serialize;

use crate::summary::{print_config_summary, print_stream_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Input image files or directories of frames
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Estimator config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for annotated full frames
    #[arg(long)]
    pub annotated_dir: Option<PathBuf>,

    /// Directory for masked ROI crops
    #[arg(long)]
    pub masked_dir: Option<PathBuf>,

    /// Emit one JSON object per frame instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => EstimatorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EstimatorConfig::default(),
    };

    let files = collect_inputs(&args.inputs)?;
    if files.is_empty() {
        bail!("No image files found in the given inputs");
    }
    for dir in [&args.annotated_dir, &args.masked_dir].into_iter().flatten() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    if !args.json {
        print_config_summary(&config, files.len());
    }
    let store = ConfigStore::new(config).context("Invalid estimator config")?;

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Estimating");

    let mut sink = ReportSink {
        files: &files,
        output_names: output_names(&files),
        annotated_dir: args.annotated_dir.as_deref(),
        masked_dir: args.masked_dir.as_deref(),
        json: args.json,
        pending: None,
        progress: &pb,
    };

    let frames = files.iter().map(|path| {
        pb.inc(1);
        load_bgr_frame(path)
    });
    let stream = run_frames(frames, &store, &mut sink);
    sink.flush();

    pb.finish_and_clear();
    if !args.json {
        print_stream_summary(&stream);
    }

    Ok(())
}

/// Expand directories into their frame files, sorted by name.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_frame_file(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// `{stem}.png` per input, with the frame index appended when two inputs
/// (from different directories) share a stem.
fn output_names(files: &[PathBuf]) -> Vec<String> {
    let stems: Vec<Option<String>> = files
        .iter()
        .map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in stems.iter().flatten() {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    stems
        .iter()
        .enumerate()
        .map(|(index, stem)| match stem {
            Some(stem) if counts.get(stem.as_str()) == Some(&1) => format!("{stem}.png"),
            Some(stem) => format!("{stem}_{index:05}.png"),
            None => format!("frame_{index:05}.png"),
        })
        .collect()
}

#[derive(Serialize)]
struct FrameLine<'a> {
    index: usize,
    file: String,
    fit: &'a FitDescriptor,
    alignment: Option<AlignmentError>,
}

/// Prints one line per frame and writes debug images when asked to.
struct ReportSink<'a> {
    files: &'a [PathBuf],
    /// Debug-image file name per input, see [`output_names`].
    output_names: Vec<String>,
    annotated_dir: Option<&'a Path>,
    masked_dir: Option<&'a Path>,
    json: bool,
    /// Fit of the current frame, held until its alignment (if any) arrives.
    pending: Option<(usize, FitDescriptor, Option<AlignmentError>)>,
    progress: &'a ProgressBar,
}

impl ReportSink<'_> {
    fn file_name(&self, index: usize) -> String {
        self.files
            .get(index)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn output_path(&self, dir: &Path, index: usize) -> PathBuf {
        match self.output_names.get(index) {
            Some(name) => dir.join(name),
            None => dir.join(format!("frame_{index:05}.png")),
        }
    }

    fn flush(&mut self) {
        let Some((index, fit, alignment)) = self.pending.take() else {
            return;
        };
        let file = self.file_name(index);

        if self.json {
            let line = FrameLine {
                index,
                file,
                fit: &fit,
                alignment,
            };
            match serde_json::to_string(&line) {
                Ok(s) => println!("{s}"),
                Err(e) => tracing::warn!(index, error = %e, "Failed to encode frame report"),
            }
            return;
        }

        let text = match alignment {
            Some(a) => format!(
                "{file}: angle {:+.4}  lateral {:+.5}  (fit x={:.1} y={:.1} slope={:.3})",
                a.angle_error, a.lateral_error, fit.x, fit.y, fit.slope
            ),
            None => format!("{file}: no alignment"),
        };
        self.progress.println(text);
    }
}

impl FrameSink for ReportSink<'_> {
    fn publish_fit(&mut self, index: usize, fit: &FitDescriptor) {
        self.flush();
        self.pending = Some((index, *fit, None));
    }

    fn publish_alignment(&mut self, index: usize, error: &AlignmentError) {
        if let Some((pending_index, _, alignment)) = self.pending.as_mut() {
            if *pending_index == index {
                *alignment = Some(*error);
            }
        }
    }

    fn publish_debug_images(
        &mut self,
        index: usize,
        annotated: &BgrFrame,
        masked: &BgrFrame,
    ) -> runway_core::Result<()> {
        if let Some(dir) = self.annotated_dir {
            save_bgr_frame(annotated, &self.output_path(dir, index))?;
        }
        if let Some(dir) = self.masked_dir {
            if !masked.is_empty() {
                save_bgr_frame(masked, &self.output_path(dir, index))?;
            }
        }
        Ok(())
    }
}
