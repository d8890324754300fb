// src/main.rs

use anyhow::Result;
use cone_steering::config::Config;
use cone_steering::detection::ImgprocBoundaries;
use cone_steering::overlay::{annotate, OverlayStyle};
use cone_steering::video_processor::{frame_to_mat, VideoProcessor};
use cone_steering::{ConePipeline, PipelineError, PipelineMetrics};
use opencv::{highgui, prelude::*};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let config_path =
        std::env::var("CONE_STEERING_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("cone_steering={}", config.logging.level))
        .init();

    info!("🚗 Cone steering starting");
    info!(
        "ROI {:.2}+{:.2} | edges {}/{} | min area {} | margin {:.0}°",
        config.detection.roi.start_fraction,
        config.detection.roi.height_fraction,
        config.detection.edges.low_threshold,
        config.detection.edges.high_threshold,
        config.detection.blob.min_area,
        config.detection.steering.margin_degrees
    );

    let pipeline = ConePipeline::new(config.detection.clone(), ImgprocBoundaries)?;
    info!("✓ Pipeline ready");

    let video_processor = VideoProcessor::new(config.video.clone());
    let video_files = video_processor.find_video_files()?;

    if video_files.is_empty() {
        error!("No video files found in {}", config.video.input_dir);
        return Ok(());
    }

    let mut results_file = match &config.video.results_file {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        let metrics = PipelineMetrics::new();
        match process_video(
            video_path,
            &pipeline,
            &video_processor,
            &config,
            &metrics,
            results_file.as_mut(),
        ) {
            Ok(()) => {
                let s = metrics.summary();
                info!("✓ Video processed");
                info!("  Total frames: {} ({} dropped)", s.total_frames, s.dropped_frames);
                info!(
                    "  Cones: left in {} frames, right in {} frames",
                    s.frames_with_left, s.frames_with_right
                );
                info!(
                    "  Decisions: straight={} left={} right={} ambiguous={}",
                    s.straight, s.left, s.right, s.ambiguous
                );
                info!("  Processing speed: {:.1} FPS", s.fps);
            }
            Err(e) => {
                error!("Failed to process video: {}", e);
            }
        }
    }

    Ok(())
}

fn process_video(
    video_path: &Path,
    pipeline: &ConePipeline<ImgprocBoundaries>,
    video_processor: &VideoProcessor,
    config: &Config,
    metrics: &PipelineMetrics,
    mut results_file: Option<&mut File>,
) -> Result<()> {
    let mut reader = video_processor.open_video(video_path)?;
    let mut writer = video_processor.create_writer(video_path, reader.info())?;
    let style = OverlayStyle::default();
    let mut frame_id: u64 = 0;

    while let Some(frame) = reader.read_frame()? {
        frame_id += 1;
        let started = Instant::now();

        let result = match pipeline.process(frame_id, &frame) {
            Ok(result) => result,
            Err(e @ PipelineError::InvalidRegion { .. }) => {
                warn!("Frame {} dropped: {}", frame_id, e);
                metrics.record_dropped();
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        metrics.record(&result, started.elapsed().as_micros() as u64);

        if let Some(file) = results_file.as_deref_mut() {
            writeln!(file, "{}", serde_json::to_string(&result)?)?;
        }

        if writer.is_some() || config.video.display {
            let mut mat = frame_to_mat(&frame)?;
            annotate(&mut mat, &result, &style)?;

            if let Some(ref mut w) = writer {
                w.write(&mat)?;
            }
            if config.video.display {
                highgui::imshow("cone-steering", &mat)?;
                highgui::wait_key(1)?;
            }
        }

        if frame_id % 100 == 0 {
            debug!("Progress: {:.1}%", reader.progress());
        }
    }

    Ok(())
}
