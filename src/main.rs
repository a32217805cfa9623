// src/main.rs

mod circle_fit;
mod config;
mod csv_writer;
mod curve_extraction;
mod edge_detection;
mod overlay;
mod pipeline;
mod smoother;
mod tip_detection;
mod tip_geometry;
mod types;
mod video_processor;

use anyhow::Result;
use csv_writer::CsvSink;
use pipeline::CurvaturePipeline;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = types::Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Catheter curvature estimation starting");
    info!(
        "Edge thresholds: binary={}, hysteresis={:.0}/{:.0} | fit radius bounds: [{:.0}, {:.0}] px",
        config.edge.binary_threshold,
        config.edge.edge_low_threshold,
        config.edge.edge_high_threshold,
        config.fit.min_radius_px,
        config.fit.max_radius_px
    );

    let video_processor = video_processor::VideoProcessor::new(config.clone());
    let video_files = video_processor.find_video_files()?;

    if video_files.is_empty() {
        error!("No video files found in {}", config.video.input_dir);
        return Ok(());
    }

    info!("Found {} video file(s) to process", video_files.len());

    let mut csv_sink = CsvSink::create(&config.output.csv_path)?;
    info!("Numeric output: {}", config.output.csv_path);

    // Checked between frames; a handler or supervisor may set it for a
    // clean early stop without leaving sinks half-written.
    let stop = AtomicBool::new(false);

    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        match process_video(video_path, &video_processor, &config, &mut csv_sink, &stop) {
            Ok(stats) => {
                info!("Video processed successfully");
                info!("  Total frames: {}", stats.total_frames);
                info!(
                    "  Fitted frames: {} ({:.1}%)",
                    stats.frames_with_fit,
                    100.0 * stats.frames_with_fit as f64 / stats.total_frames.max(1) as f64
                );
                info!(
                    "  Marker visible: {} ({:.1}%)",
                    stats.frames_with_marker,
                    100.0 * stats.frames_with_marker as f64 / stats.total_frames.max(1) as f64
                );
                if stats.implausible_fits > 0 {
                    warn!(
                        "  Implausible fits: {} (outside configured radius bounds)",
                        stats.implausible_fits
                    );
                }
                info!("  CSV records written: {}", stats.records_written);
                info!("  Processing speed: {:.1} FPS", stats.avg_fps);
            }
            Err(e) => {
                // Source/sink I/O failures are fatal; readers, writers and
                // the CSV file release on drop.
                error!("Failed to process video: {}", e);
                return Err(e);
            }
        }

        if stop.load(Ordering::Relaxed) {
            warn!("Stop requested; skipping remaining videos");
            break;
        }
    }

    Ok(())
}

struct ProcessingStats {
    total_frames: u64,
    frames_with_fit: u64,
    frames_with_marker: u64,
    implausible_fits: u64,
    records_written: u64,
    avg_fps: f64,
}

fn process_video(
    video_path: &Path,
    video_processor: &video_processor::VideoProcessor,
    config: &types::Config,
    csv_sink: &mut CsvSink,
    stop: &AtomicBool,
) -> Result<ProcessingStats> {
    use std::time::Instant;

    let start_time = Instant::now();

    let mut reader = video_processor.open_video(video_path)?;
    let mut circle_writer =
        video_processor.create_writer(video_path, "circle", reader.width, reader.height, reader.fps)?;
    let mut edges_writer =
        video_processor.create_writer(video_path, "edges", reader.width, reader.height, reader.fps)?;

    let mut pipeline = CurvaturePipeline::new(config.clone());

    let mut total_frames: u64 = 0;
    let mut frames_with_fit: u64 = 0;
    let mut frames_with_marker: u64 = 0;
    let mut implausible_fits: u64 = 0;
    let mut records_written: u64 = 0;

    while let Some(frame) = reader.read_frame()? {
        if stop.load(Ordering::Relaxed) {
            warn!("Stop requested at frame {}; finishing cleanly", total_frames);
            break;
        }

        total_frames += 1;

        let processed = pipeline.process_frame(&frame);
        let result = &processed.result;

        if result.circle.is_some() {
            frames_with_fit += 1;
            if !result.plausible {
                implausible_fits += 1;
            }
        }
        if result.tip.is_some() {
            frames_with_marker += 1;
        }

        if csv_sink.append(result)? {
            records_written += 1;
        }

        if let Some(ref mut writer) = circle_writer {
            use opencv::videoio::VideoWriterTrait;
            let annotated = overlay::draw_frame_overlay(&frame.data, reader.height, result)?;
            writer.write(&annotated)?;
        }

        if let Some(ref mut writer) = edges_writer {
            use opencv::videoio::VideoWriterTrait;
            let annotated = overlay::draw_edges_overlay(&processed.edges, result)?;
            writer.write(&annotated)?;
        }

        if total_frames % 50 == 0 {
            info!(
                "Progress: {:.1}% ({}/{}) | fits: {} | marker: {}",
                reader.progress(),
                reader.current_frame,
                reader.total_frames,
                frames_with_fit,
                frames_with_marker
            );
        }
    }

    let duration = start_time.elapsed();
    let avg_fps = total_frames as f64 / duration.as_secs_f64().max(1e-9);

    Ok(ProcessingStats {
        total_frames,
        frames_with_fit,
        frames_with_marker,
        implausible_fits,
        records_written,
        avg_fps,
    })
}
