//! Directory-backed media store.
//!
//! Implements [`MediaPort`] over a directory standing in for the SD card
//! volume (`/sdcard` on hardware, a temp dir in tests).  Stills are written
//! as `img{NNNN}.jpg` and bursts as `img{NNNN}.gif`, each taking the first
//! free index for its extension.  Encoding uses the `image` crate.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{Delay, RgbImage, RgbaImage};
use log::{info, warn};

use crate::app::ports::{GifSink, MediaPort};
use crate::capture::imaging::Frame;
use crate::error::{CaptureError, MountError};

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Highest index tried before giving up on finding a free name.
const MAX_INDEX: u32 = 9999;

pub struct DirectoryMediaStore {
    root: PathBuf,
    mounted: bool,
    quality: u8,
}

impl DirectoryMediaStore {
    /// Store rooted at `root`.  Starts unmounted.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: false,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First unused `img{NNNN}.{ext}` path.
    fn next_path(&self, ext: &str) -> Result<PathBuf, CaptureError> {
        (0..=MAX_INDEX)
            .map(|i| self.root.join(format!("img{i:04}.{ext}")))
            .find(|p| !p.exists())
            .ok_or(CaptureError::StorageUnavailable)
    }

    fn create(&self, ext: &str) -> Result<(PathBuf, BufWriter<File>), CaptureError> {
        if !self.mounted {
            return Err(CaptureError::StorageUnavailable);
        }
        let path = self.next_path(ext)?;
        let file = File::create(&path).map_err(|e| {
            warn!("cannot create {}: {e}", path.display());
            CaptureError::StorageUnavailable
        })?;
        Ok((path, BufWriter::new(file)))
    }

    /// Encode into a fresh `img{NNNN}.{ext}`.  A failed encode leaves no
    /// file behind.
    fn write_new<F>(&self, ext: &str, encode: F) -> Result<PathBuf, CaptureError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<(), CaptureError>,
    {
        let (path, mut out) = self.create(ext)?;
        let result = encode(&mut out).and_then(|()| {
            out.flush().map_err(|e| {
                warn!("cannot flush {}: {e}", path.display());
                CaptureError::StorageUnavailable
            })
        });
        match result {
            Ok(()) => Ok(path),
            Err(e) => {
                drop(out);
                discard(&path);
                Err(e)
            }
        }
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("cannot remove partial {}: {e}", path.display());
    }
}

impl MediaPort for DirectoryMediaStore {
    type Gif = GifFile;

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn mount(&mut self) -> Result<(), MountError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {
                self.mounted = true;
                info!("media store mounted at {}", self.root.display());
                Ok(())
            }
            Ok(_) => Err(MountError::Io),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(MountError::NoCard),
            Err(_) => Err(MountError::Io),
        }
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn save_jpeg(&mut self, frame: &Frame) -> Result<(), CaptureError> {
        let (width, height) = (u32::from(frame.width()), u32::from(frame.height()));
        let image =
            RgbImage::from_raw(width, height, frame.to_rgb8()).ok_or(CaptureError::Encoding)?;
        let quality = self.quality;
        let path = self.write_new("jpg", |out| {
            JpegEncoder::new_with_quality(out, quality)
                .encode_image(&image)
                .map_err(|e| {
                    warn!("jpeg encode failed: {e}");
                    CaptureError::Encoding
                })
        })?;
        info!("saved {}", path.display());
        Ok(())
    }

    fn create_gif(&mut self, width: u16, height: u16) -> Result<GifFile, CaptureError> {
        let (path, out) = self.create("gif")?;
        let mut encoder = GifEncoder::new(out);
        if encoder.set_repeat(Repeat::Infinite).is_err() {
            drop(encoder);
            discard(&path);
            return Err(CaptureError::Encoding);
        }
        Ok(GifFile {
            path,
            width,
            height,
            encoder: Some(encoder),
        })
    }
}

/// An open GIF on disk.  The trailer is written when the file is finished.
/// The first failed frame deletes the file; the sink is dead afterwards.
pub struct GifFile {
    path: PathBuf,
    width: u16,
    height: u16,
    encoder: Option<GifEncoder<BufWriter<File>>>,
}

impl GifFile {
    fn abandon(&mut self) -> CaptureError {
        if self.encoder.take().is_some() {
            discard(&self.path);
        }
        CaptureError::Encoding
    }
}

impl GifSink for GifFile {
    fn add_frame(&mut self, frame: &Frame, delay_ms: u32) -> Result<(), CaptureError> {
        if (frame.width(), frame.height()) != (self.width, self.height) {
            return Err(self.abandon());
        }
        let (width, height) = (u32::from(self.width), u32::from(self.height));
        let Some(buffer) = RgbaImage::from_raw(width, height, frame.to_rgba8()) else {
            return Err(self.abandon());
        };
        let encoder = self.encoder.as_mut().ok_or(CaptureError::Encoding)?;
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        match encoder.encode_frame(image::Frame::from_parts(buffer, 0, 0, delay)) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("gif frame encode failed: {e}");
                Err(self.abandon())
            }
        }
    }

    fn finish(self) -> Result<u64, CaptureError> {
        let Self { path, encoder, .. } = self;
        // Dropping the encoder writes the trailer and flushes the writer.
        drop(encoder.ok_or(CaptureError::Encoding)?);
        let size = fs::metadata(&path)
            .map_err(|_| CaptureError::StorageUnavailable)?
            .len();
        info!("saved {} ({size} bytes)", path.display());
        Ok(size)
    }
}
