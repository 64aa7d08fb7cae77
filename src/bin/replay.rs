//! Replays a JSON-lines detection recording through the tracker and prints
//! one line per annotated detection.
//!
//! cargo run --bin speedtrack-replay -- recording.jsonl --names coco.names

use std::io::{self, BufWriter, Stdout, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Parser;
use log::info;
use speedtrack::{
    Annotation, AssociationPolicy, ClassNames, Frame, KinematicsConfig, PipelineConfig,
    Recording, Renderer, SpeedPipeline, TrackerConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay recorded detections with distance and speed estimates", long_about = None)]
struct Args {
    /// JSON-lines recording, one frame per line
    recording: PathBuf,

    /// Class label file, one name per line (coco.names format)
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// Minimum detection confidence
    #[arg(short, long, default_value_t = 0.3)]
    confidence: f32,

    /// Largest centroid distance in pixels that keeps a track id
    #[arg(long, default_value_t = 50.0)]
    match_distance: f32,

    /// Drop tracks unmatched for more than this many frames
    #[arg(long)]
    max_idle_frames: Option<u32>,

    /// Let every track absorb at most one detection per frame
    #[arg(long)]
    exclusive: bool,

    /// Scale K of the distance heuristic
    #[arg(long, default_value_t = 20.0)]
    distance_scale: f32,

    /// Width offset of the distance heuristic
    #[arg(long, default_value_t = 10.0)]
    distance_offset: f32,

    /// Meters per pixel of centroid motion
    #[arg(long, default_value_t = 0.05)]
    pixel_to_meter: f32,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            confidence_threshold: self.confidence,
            tracker: TrackerConfig {
                match_distance: self.match_distance,
                max_idle_frames: self.max_idle_frames,
                policy: if self.exclusive {
                    AssociationPolicy::Exclusive
                } else {
                    AssociationPolicy::Shared
                },
            },
            kinematics: KinematicsConfig {
                distance_scale: self.distance_scale,
                distance_offset: self.distance_offset,
                pixel_to_meter: self.pixel_to_meter,
            },
        }
    }
}

/// Writes annotations as text and raises `stop` once `max_frames` were shown.
struct TextRenderer<'a> {
    out: BufWriter<Stdout>,
    rendered: u64,
    max_frames: Option<u64>,
    stop: &'a AtomicBool,
}

impl Renderer for TextRenderer<'_> {
    type Error = io::Error;

    fn render(&mut self, frame: &Frame, annotations: &[Annotation]) -> Result<(), Self::Error> {
        for annotation in annotations {
            let [x1, y1, x2, y2] = annotation.bbox.to_tlbr();
            writeln!(
                self.out,
                "{:>9.3}s  #{:<4} [{x1:.0}, {y1:.0}, {x2:.0}, {y2:.0}]  {annotation}",
                frame.timestamp, annotation.track_id
            )?;
        }
        self.out.flush()?;

        self.rendered += 1;
        if self.max_frames.is_some_and(|max| self.rendered >= max) {
            self.stop.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let recording = Recording::from_file(&args.recording)
        .with_context(|| format!("failed to read recording {}", args.recording.display()))?;
    info!("loaded {} frames from {}", recording.len(), args.recording.display());

    let class_names = match &args.names {
        Some(path) => ClassNames::from_file(path)
            .with_context(|| format!("failed to read class names {}", path.display()))?,
        None => ClassNames::default(),
    };

    let (mut frames, detector) = recording.into_sources();
    let mut pipeline: SpeedPipeline<_> = SpeedPipeline::new(detector, args.pipeline_config())
        .context("invalid configuration")?
        .with_class_names(class_names);

    let stop = AtomicBool::new(false);
    let mut renderer = TextRenderer {
        out: BufWriter::new(io::stdout()),
        rendered: 0,
        max_frames: args.max_frames,
        stop: &stop,
    };

    let summary = pipeline.run(&mut frames, &mut renderer, &stop);
    info!(
        "{} frames, {} annotations, {} live tracks",
        summary.frames,
        summary.annotations,
        pipeline.tracker().tracks().len()
    );
    Ok(())
}
