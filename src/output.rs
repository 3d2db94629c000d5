//! Frame sinks and PNG output
//!
//! The simulation hands every finished frame to a [`FrameSink`]. Sinks know
//! nothing about fireworks; they only see fixed-size RGB frames in
//! presentation order and must be finished once the last frame is written.

use image::RgbImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gif::GifSink;

/// Error type for output operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutputError {
    /// The output file or directory could not be created
    #[error("cannot create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Encoding or writing a frame failed
    #[error("cannot write '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Flushing buffered output failed
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A frame did not match the dimensions the sink was opened with
    #[error("frame is {}x{}, expected {}x{}", .actual.0, .actual.1, .expected.0, .expected.1)]
    FrameSize { expected: (u32, u32), actual: (u32, u32) },
    /// A frame was written after the sink was finished
    #[error("'{}' is already finalized", .path.display())]
    Finished { path: PathBuf },
    /// The output path names a format no sink can produce
    #[error(
        "unsupported output format '{extension}' for '{}' (use a .gif file or a directory for PNG frames)",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Destination for rendered frames.
pub trait FrameSink {
    /// Append one frame.
    fn write(&mut self, frame: &RgbImage) -> Result<(), OutputError>;

    /// Flush and close the output. Further writes fail.
    fn finish(&mut self) -> Result<(), OutputError>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn write(&mut self, frame: &RgbImage) -> Result<(), OutputError> {
        (**self).write(frame)
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        (**self).finish()
    }
}

/// Writes each frame as `frame_NNNNN.png` inside a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    width: u32,
    height: u32,
    next_index: u32,
    finished: bool,
}

impl PngSequenceSink {
    /// Create the output directory (and its parents) and prepare to write frames.
    pub fn create(dir: &Path, width: u32, height: u32) -> Result<Self, OutputError> {
        std::fs::create_dir_all(dir)
            .map_err(|source| OutputError::Create { path: dir.to_path_buf(), source })?;
        Ok(Self { dir: dir.to_path_buf(), width, height, next_index: 0, finished: false })
    }

    /// Path of the frame with the given index.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u32 {
        self.next_index
    }
}

impl FrameSink for PngSequenceSink {
    fn write(&mut self, frame: &RgbImage) -> Result<(), OutputError> {
        if self.finished {
            return Err(OutputError::Finished { path: self.dir.clone() });
        }
        check_frame_size(frame, (self.width, self.height))?;

        let path = self.frame_path(self.next_index);
        frame.save(&path).map_err(|source| OutputError::Encode { path, source })?;
        self.next_index += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        // Every frame is a complete file already
        self.finished = true;
        Ok(())
    }
}

/// Open the sink matching the output path.
///
/// | Output path | Sink |
/// |-------------|------|
/// | `*.gif` | animated GIF |
/// | existing directory, or no extension | PNG frame sequence |
/// | anything else | [`OutputError::UnsupportedFormat`] |
pub fn open_sink(
    path: &Path,
    fps: u32,
    width: u32,
    height: u32,
) -> Result<Box<dyn FrameSink>, OutputError> {
    if path.is_dir() {
        return Ok(Box::new(PngSequenceSink::create(path, width, height)?));
    }

    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "gif" => Ok(Box::new(GifSink::create(path, fps, width, height)?)),
        None => Ok(Box::new(PngSequenceSink::create(path, width, height)?)),
        Some(ext) => Err(OutputError::UnsupportedFormat { path: path.to_path_buf(), extension: ext }),
    }
}

/// Save an RGB image to a PNG file.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    image.save(path).map_err(|source| OutputError::Encode { path: path.to_path_buf(), source })
}

/// Create parent directories of `path` if they don't exist.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|source| OutputError::Create { path: parent.to_path_buf(), source })?;
        }
    }
    Ok(())
}

pub(crate) fn check_frame_size(frame: &RgbImage, expected: (u32, u32)) -> Result<(), OutputError> {
    let actual = frame.dimensions();
    if actual != expected {
        return Err(OutputError::FrameSize { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    fn create_test_frame(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    #[test]
    fn test_save_png_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let frame = create_test_frame(3, 2, [255, 128, 0]);
        save_png(&frame, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(1, 1), &Rgb([255, 128, 0]));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/frame.png");

        save_png(&create_test_frame(2, 2, [0, 0, 0]), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_png_sequence_writes_numbered_frames() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("frames");
        let mut sink = PngSequenceSink::create(&out, 4, 4).unwrap();

        sink.write(&create_test_frame(4, 4, [0, 0, 0])).unwrap();
        sink.write(&create_test_frame(4, 4, [255, 255, 255])).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.frames_written(), 2);
        assert!(out.join("frame_00000.png").exists());
        let second = image::open(out.join("frame_00001.png")).unwrap().to_rgb8();
        assert_eq!(second.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_png_sequence_rejects_wrong_size() {
        let dir = tempdir().unwrap();
        let mut sink = PngSequenceSink::create(dir.path(), 4, 4).unwrap();

        let result = sink.write(&create_test_frame(5, 4, [0, 0, 0]));
        assert!(matches!(
            result,
            Err(OutputError::FrameSize { expected: (4, 4), actual: (5, 4) })
        ));
    }

    #[test]
    fn test_png_sequence_rejects_write_after_finish() {
        let dir = tempdir().unwrap();
        let mut sink = PngSequenceSink::create(dir.path(), 2, 2).unwrap();
        sink.finish().unwrap();

        let result = sink.write(&create_test_frame(2, 2, [0, 0, 0]));
        assert!(matches!(result, Err(OutputError::Finished { .. })));
    }

    #[test]
    fn test_open_sink_gif() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("show.gif");

        let mut sink = open_sink(&path, 10, 4, 4).unwrap();
        sink.write(&create_test_frame(4, 4, [200, 0, 0])).unwrap();
        sink.finish().unwrap();

        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_open_sink_directory() {
        let dir = tempdir().unwrap();

        let mut sink = open_sink(dir.path(), 10, 2, 2).unwrap();
        sink.write(&create_test_frame(2, 2, [0, 0, 0])).unwrap();
        sink.finish().unwrap();

        assert!(dir.path().join("frame_00000.png").exists());
    }

    #[test]
    fn test_open_sink_no_extension_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frames");

        let mut sink = open_sink(&path, 10, 2, 2).unwrap();
        sink.write(&create_test_frame(2, 2, [0, 0, 0])).unwrap();

        assert!(path.is_dir());
        assert!(path.join("frame_00000.png").exists());
    }

    #[test]
    fn test_open_sink_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("show.mp4");

        let result = open_sink(&path, 30, 8, 8);
        match result {
            Err(OutputError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "mp4"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("mp4 output should be rejected"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_create_error_names_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let target = blocker.join("frames");
        let err = PngSequenceSink::create(&target, 2, 2).unwrap_err();
        assert!(err.to_string().contains("frames"), "message was: {}", err);
    }
}
