// src/video_processor.rs
//
// Video files in, `Frame`s out; annotated Mats back to disk.

use crate::config::VideoConfig;
use crate::types::{Frame, PixelFormat};
use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst, VideoWriter},
};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}

pub struct VideoProcessor {
    config: VideoConfig,
}

impl VideoProcessor {
    pub fn new(config: VideoConfig) -> Self {
        Self { config }
    }

    /// Every video under `input_dir`, sorted by path.
    pub fn find_video_files(&self) -> Result<Vec<PathBuf>> {
        let mut videos: Vec<PathBuf> = WalkDir::new(&self.config.input_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| is_video(path))
            .collect();
        videos.sort();

        info!(
            "Found {} video files in {}",
            videos.len(),
            self.config.input_dir
        );
        Ok(videos)
    }

    pub fn open_video(&self, path: &Path) -> Result<VideoReader> {
        let cap = VideoCapture::from_file(utf8(path)?, videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            anyhow::bail!("cannot open video {}", path.display());
        }

        let prop = |id: i32| VideoCaptureTraitConst::get(&cap, id);
        let info = VideoInfo {
            fps: prop(videoio::CAP_PROP_FPS)?,
            frame_count: prop(videoio::CAP_PROP_FRAME_COUNT)? as i32,
            width: prop(videoio::CAP_PROP_FRAME_WIDTH)? as i32,
            height: prop(videoio::CAP_PROP_FRAME_HEIGHT)? as i32,
        };
        info!(
            "Opened {}: {}x{} @ {:.1} FPS, {} frames",
            path.display(),
            info.width,
            info.height,
            info.fps,
            info.frame_count
        );

        Ok(VideoReader {
            cap,
            info,
            frames_read: 0,
        })
    }

    /// `<output_dir>/<stem>_annotated.mp4`, or `None` when saving is off.
    pub fn create_writer(&self, input: &Path, info: &VideoInfo) -> Result<Option<VideoWriter>> {
        if !self.config.save_annotated {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.config.output_dir)
            .with_context(|| format!("creating {}", self.config.output_dir))?;
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video");
        let output = Path::new(&self.config.output_dir).join(format!("{}_annotated.mp4", stem));

        let writer = VideoWriter::new(
            utf8(&output)?,
            VideoWriter::fourcc('m', 'p', '4', 'v')?,
            info.fps,
            core::Size::new(info.width, info.height),
            true,
        )?;
        info!("Writing annotated video to {}", output.display());
        Ok(Some(writer))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VideoInfo {
    pub fps: f64,
    pub frame_count: i32,
    pub width: i32,
    pub height: i32,
}

pub struct VideoReader {
    cap: VideoCapture,
    info: VideoInfo,
    frames_read: i32,
}

impl VideoReader {
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Next decoded frame, `None` at end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut mat = Mat::default();
        if !VideoCaptureTrait::read(&mut self.cap, &mut mat)? || mat.empty() {
            return Ok(None);
        }
        self.frames_read += 1;

        let format = match mat.channels() {
            3 => PixelFormat::Bgr,
            4 => PixelFormat::Bgra,
            n => anyhow::bail!("unsupported channel count {}", n),
        };
        let timestamp_ms = if self.info.fps > 0.0 {
            self.frames_read as f64 * 1000.0 / self.info.fps
        } else {
            0.0
        };

        let frame = Frame::new(
            mat.data_bytes()?.to_vec(),
            mat.cols() as usize,
            mat.rows() as usize,
            format,
            timestamp_ms,
        )?;
        Ok(Some(frame))
    }

    pub fn progress(&self) -> f32 {
        if self.info.frame_count <= 0 {
            return 0.0;
        }
        self.frames_read as f32 * 100.0 / self.info.frame_count as f32
    }
}

/// Copies a frame into a 3-channel BGR `Mat` ready for drawing and encoding.
pub fn frame_to_mat(frame: &Frame) -> Result<Mat> {
    let channels = frame.format().channels() as i32;
    let packed = Mat::from_slice(frame.data())?
        .reshape(channels, frame.height() as i32)?
        .try_clone()?;

    if frame.format() == PixelFormat::Bgr {
        return Ok(packed);
    }
    let mut bgr = Mat::default();
    imgproc::cvt_color(&packed, &mut bgr, imgproc::COLOR_BGRA2BGR, 0)?;
    Ok(bgr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bgr;

    #[test]
    fn test_video_extension_filter() {
        assert!(is_video(Path::new("runs/lap1.mp4")));
        assert!(is_video(Path::new("runs/LAP2.MKV")));
        assert!(!is_video(Path::new("runs/notes.txt")));
        assert!(!is_video(Path::new("runs/mp4")));
    }

    #[test]
    fn test_frame_to_mat_drops_alpha() {
        let frame = Frame::filled(8, 4, PixelFormat::Bgra, Bgr::new(10, 20, 30));
        let mat = frame_to_mat(&frame).unwrap();
        assert_eq!(mat.channels(), 3);
        assert_eq!((mat.cols(), mat.rows()), (8, 4));
        assert_eq!(mat.at_2d::<core::Vec3b>(3, 7).unwrap().0, [10, 20, 30]);
    }
}
