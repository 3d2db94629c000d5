//! Animated GIF output

use crate::output::{check_frame_size, ensure_parent_dir, FrameSink, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Quantizer speed passed to the encoder (1 = best quality, 30 = fastest).
const ENCODER_SPEED: i32 = 10;

/// Buffered file state shared between the encoder and the sink.
struct FileState {
    writer: BufWriter<File>,
    /// First write failure, kept because the encoder drops errors on close
    error: Option<io::Error>,
}

/// Writer handed to the encoder.
///
/// The sink keeps a second handle so it can flush the file and report write
/// failures after the encoder is gone.
#[derive(Clone)]
struct SharedFile(Rc<RefCell<FileState>>);

impl SharedFile {
    fn new(file: File) -> Self {
        Self(Rc::new(RefCell::new(FileState { writer: BufWriter::new(file), error: None })))
    }

    /// Flush buffered bytes, returning the first failure seen on this file.
    fn close(&self) -> io::Result<()> {
        let mut state = self.0.borrow_mut();
        if let Some(e) = state.error.take() {
            return Err(e);
        }
        state.writer.flush()
    }
}

impl Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.0.borrow_mut();
        let result = state.writer.write(buf);
        if let Err(e) = &result {
            state.error.get_or_insert_with(|| io::Error::new(e.kind(), e.to_string()));
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.0.borrow_mut();
        let result = state.writer.flush();
        if let Err(e) = &result {
            state.error.get_or_insert_with(|| io::Error::new(e.kind(), e.to_string()));
        }
        result
    }
}

/// Streams frames into an infinitely looping animated GIF.
///
/// Frames are encoded as they arrive; [`FrameSink::finish`] closes the
/// encoder, which writes the GIF trailer, then flushes the file and reports
/// any write that failed along the way.
pub struct GifSink {
    path: PathBuf,
    width: u32,
    height: u32,
    delay: Delay,
    file: SharedFile,
    encoder: Option<GifEncoder<SharedFile>>,
}

impl GifSink {
    /// Create the GIF file at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Output file path; missing parent directories are created
    /// * `fps` - Playback rate; each frame is shown for `1000 / fps` ms
    /// * `width`, `height` - Dimensions every frame must have
    pub fn create(path: &Path, fps: u32, width: u32, height: u32) -> Result<Self, OutputError> {
        ensure_parent_dir(path)?;

        let file = File::create(path)
            .map_err(|source| OutputError::Create { path: path.to_path_buf(), source })?;
        let file = SharedFile::new(file);
        let mut encoder = GifEncoder::new_with_speed(file.clone(), ENCODER_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|source| OutputError::Encode { path: path.to_path_buf(), source })?;

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            delay: Delay::from_numer_denom_ms(1000, fps.max(1)),
            file,
            encoder: Some(encoder),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSink for GifSink {
    fn write(&mut self, frame: &RgbImage) -> Result<(), OutputError> {
        check_frame_size(frame, (self.width, self.height))?;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| OutputError::Finished { path: self.path.clone() })?;

        let rgba = DynamicImage::ImageRgb8(frame.clone()).into_rgba8();
        encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, self.delay))
            .map_err(|source| OutputError::Encode { path: self.path.clone(), source })
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        let Some(encoder) = self.encoder.take() else {
            return Ok(());
        };
        // Dropping the encoder writes the trailer into the shared buffer
        drop(encoder);
        self.file
            .close()
            .map_err(|source| OutputError::Write { path: self.path.clone(), source })
    }
}
