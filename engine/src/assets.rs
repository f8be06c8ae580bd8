//! Decoded images and the cache that makes sure each file is decoded only once.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::graphics::Color;

/// 8-bit RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    rgba: Vec<u8>,
}

impl Image {
    /// `None` if `rgba` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A `width x height` image of one solid color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let rgba = color.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Raw pixels, row-major RGBA; lets a [`crate::graphics::CpuRenderer`] paint into the image.
    pub fn rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba
    }

    pub fn fill(&mut self, color: Color) {
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Pixel at `(x, y)`; out-of-range coordinates clamp to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.rgba.get(idx..idx + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0, 0, 0, 0],
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },
    #[error("unsupported pixel layout in {path}")]
    Layout { path: PathBuf },
}

/// Decodes a PNG file into RGBA, expanding palettes, grayscale and 16-bit channels.
pub fn decode_png(path: &Path) -> Result<Image, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_png_bytes(&bytes).map_err(|err| match err {
        PngBytesError::Decode(source) => ImageError::Decode {
            path: path.to_path_buf(),
            source,
        },
        PngBytesError::Layout => ImageError::Layout {
            path: path.to_path_buf(),
        },
    })
}

enum PngBytesError {
    Decode(png::DecodingError),
    Layout,
}

fn decode_png_bytes(bytes: &[u8]) -> Result<Image, PngBytesError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(PngBytesError::Decode)?;

    let (color_type, _) = reader.output_color_type();
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let samples = color_type.samples();
    let mut buf = vec![0u8; width as usize * height as usize * samples];
    reader.next_frame(&mut buf).map_err(PngBytesError::Decode)?;

    let rgba = match color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => return Err(PngBytesError::Layout),
    };

    Image::from_rgba(width, height, rgba).ok_or(PngBytesError::Layout)
}

/// Loads each distinct path at most once; failures are remembered too so a missing file is
/// not retried every frame.
#[derive(Debug)]
pub struct ImageCache {
    root: PathBuf,
    entries: HashMap<PathBuf, Option<Rc<Image>>>,
}

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct paths requested so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image at `relative` (under the cache root), decoding it on first use.
    pub fn load(&mut self, relative: impl AsRef<Path>) -> Option<Rc<Image>> {
        let path = self.root.join(relative.as_ref());
        if let Some(entry) = self.entries.get(&path) {
            return entry.clone();
        }

        let entry = match decode_png(&path) {
            Ok(image) => {
                tracing::debug!(path = %path.display(), w = image.width, h = image.height, "image loaded");
                Some(Rc::new(image))
            }
            Err(err) => {
                tracing::warn!(%err, "image unavailable");
                None
            }
        };
        self.entries.insert(path, entry.clone());
        entry
    }
}
