mod color_format;
mod io;


use std::path::Path;

pub use color_format::{ChannelCount, ColorFormat, SampleType};

use crate::error::{Error, Result};

/// Supported image file extensions for reading and writing.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// JPEG quality used by [`Image::save_file`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
}

/// Tightly packed, row-major, channel-interleaved sample storage.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    desc: ImageDesc,
    samples: Samples,
}

impl Samples {
    fn zeroed(sample_type: SampleType, len: usize) -> Samples {
        match sample_type {
            SampleType::U8 => Samples::U8(vec![0; len]),
            SampleType::F32 => Samples::F32(vec![0.0; len]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            Samples::U8(_) => SampleType::U8,
            Samples::F32(_) => SampleType::F32,
        }
    }

    /// Samples widened to `f32` in their native scale (no normalization).
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            Samples::U8(v) => v.iter().map(|&s| s as f32).collect(),
            Samples::F32(v) => v.clone(),
        }
    }
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    pub fn channels(&self) -> usize {
        self.desc.channels()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.samples {
            Samples::U8(v) => Some(v),
            Samples::F32(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.samples {
            Samples::F32(v) => Some(v),
            Samples::U8(_) => None,
        }
    }

    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.samples.to_f32_vec()
    }

    /// Creates a zero-filled image.
    pub fn new_black(desc: ImageDesc) -> Image {
        let samples = Samples::zeroed(desc.color_format.sample_type, desc.sample_count());
        Image { desc, samples }
    }

    pub fn new_with_samples(desc: ImageDesc, samples: Samples) -> Result<Image> {
        if samples.sample_type() != desc.color_format.sample_type {
            return Err(Error::InvalidParameter(format!(
                "{} samples for a {} image",
                samples.sample_type(),
                desc.color_format
            )));
        }

        if samples.len() != desc.sample_count() {
            return Err(Error::ShapeMismatch(format!(
                "sample count {} does not match expected {} for {}",
                samples.len(),
                desc.sample_count(),
                desc
            )));
        }

        Ok(Image { desc, samples })
    }

    pub fn from_u8(
        width: u32,
        height: u32,
        channel_count: ChannelCount,
        data: Vec<u8>,
    ) -> Result<Image> {
        let desc = ImageDesc::new(width, height, ColorFormat::new(channel_count, SampleType::U8));
        Image::new_with_samples(desc, Samples::U8(data))
    }

    pub fn from_f32(
        width: u32,
        height: u32,
        channel_count: ChannelCount,
        data: Vec<f32>,
    ) -> Result<Image> {
        let desc = ImageDesc::new(width, height, ColorFormat::new(channel_count, SampleType::F32));
        Image::new_with_samples(desc, Samples::F32(data))
    }

    /// Converts to 8-bit by clamping to `[0, 255]` and truncating, as a plain float-to-byte cast does.
    pub fn to_u8_clamped(&self) -> Image {
        match &self.samples {
            Samples::U8(_) => self.clone(),
            Samples::F32(v) => {
                self.with_u8_samples(v.iter().map(|&s| s.clamp(0.0, 255.0) as u8).collect())
            }
        }
    }

    /// Converts to the 8-bit output format.
    ///
    /// Float samples within `[0, 1]` are scaled by 255 and rounded; float
    /// samples exceeding 1 are taken as byte-ranged and go through
    /// [`Image::to_u8_clamped`]. 8-bit images are returned as is.
    pub fn to_u8_output(&self) -> Image {
        let Samples::F32(v) = &self.samples else {
            return self.clone();
        };

        let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if max > 1.0 {
            return self.to_u8_clamped();
        }

        self.with_u8_samples(
            v.iter()
                .map(|&s| (s.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        )
    }

    fn with_u8_samples(&self, data: Vec<u8>) -> Image {
        Image {
            desc: ImageDesc {
                color_format: self.desc.color_format.with_sample_type(SampleType::U8),
                ..self.desc
            },
            samples: Samples::U8(data),
        }
    }

    /// Decodes any of [`SUPPORTED_EXTENSIONS`] into 8-bit RGB.
    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Image> {
        let filename = filename.as_ref();
        let extension = checked_extension(filename)?;

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat(format!(
                "file extension '{}'",
                extension
            )));
        }

        io::load_rgb8(filename)
    }

    pub fn save_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let filename = filename.as_ref();
        let extension = checked_extension(filename)?;

        match extension.as_str() {
            "png" => io::save_png(self, filename),
            "jpeg" | "jpg" => io::save_jpeg(self, filename, DEFAULT_JPEG_QUALITY),
            _ => Err(Error::UnsupportedFormat(format!(
                "file extension '{}'",
                extension
            ))),
        }
    }

    /// Writes a JPEG with the given quality and no chroma subsampling.
    pub fn save_jpeg<P: AsRef<Path>>(&self, filename: P, quality: u8) -> Result<()> {
        io::save_jpeg(self, filename.as_ref(), quality)
    }

    /// Copies `src` into this image with its top-left corner at `(x, y)`.
    pub fn copy_from(&mut self, src: &Image, x: u32, y: u32) -> Result<()> {
        if src.desc.color_format != self.desc.color_format {
            return Err(Error::ShapeMismatch(format!(
                "cannot copy {} into {}",
                src.desc.color_format, self.desc.color_format
            )));
        }
        if x as u64 + src.width() as u64 > self.width() as u64
            || y as u64 + src.height() as u64 > self.height() as u64
        {
            return Err(Error::ShapeMismatch(format!(
                "{} at ({}, {}) does not fit into {}",
                src.desc, x, y, self.desc
            )));
        }

        let rect = Rect::new(&self.desc, x, y, src.width(), src.height());
        match (&mut self.samples, &src.samples) {
            (Samples::U8(dst), Samples::U8(s)) => rect.write(dst, s),
            (Samples::F32(dst), Samples::F32(s)) => rect.write(dst, s),
            _ => unreachable!("color formats were checked above"),
        }

        Ok(())
    }

    /// Returns a copy of the `width` x `height` region starting at `(x, y)`.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Image> {
        if x as u64 + width as u64 > self.width() as u64
            || y as u64 + height as u64 > self.height() as u64
        {
            return Err(Error::ShapeMismatch(format!(
                "crop {}x{} at ({}, {}) exceeds {}",
                width, height, x, y, self.desc
            )));
        }

        let rect = Rect::new(&self.desc, x, y, width, height);
        let samples = match &self.samples {
            Samples::U8(v) => Samples::U8(rect.read(v)),
            Samples::F32(v) => Samples::F32(rect.read(v)),
        };

        Ok(Image {
            desc: ImageDesc::new(width, height, self.desc.color_format),
            samples,
        })
    }
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format,
        }
    }

    pub fn channels(&self) -> usize {
        self.color_format.channels()
    }

    /// Number of samples per row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels()
    }

    pub fn sample_count(&self) -> usize {
        self.height as usize * self.row_len()
    }

    /// `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels())
    }

    /// True when width, height and channel count agree; the sample type may differ.
    pub fn same_shape(&self, other: &ImageDesc) -> bool {
        self.shape() == other.shape()
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.color_format)
    }
}

fn checked_extension(filename: &Path) -> Result<String> {
    common::file_utils::lowercase_extension(filename)
        .ok_or_else(|| Error::UnsupportedFormat(format!("missing extension: {}", filename.display())))
}

/// A rectangle of whole pixels inside an image, in sample units.
struct Rect {
    image_row_len: usize,
    first_sample: usize,
    row_len: usize,
    rows: usize,
}

impl Rect {
    fn new(desc: &ImageDesc, x: u32, y: u32, width: u32, height: u32) -> Self {
        let channels = desc.channels();
        Self {
            image_row_len: desc.row_len(),
            first_sample: y as usize * desc.row_len() + x as usize * channels,
            row_len: width as usize * channels,
            rows: height as usize,
        }
    }

    fn write<T: Copy>(&self, image: &mut [T], packed: &[T]) {
        if self.row_len == 0 {
            return;
        }
        for (row, src_row) in packed.chunks_exact(self.row_len).take(self.rows).enumerate() {
            let start = self.first_sample + row * self.image_row_len;
            image[start..start + self.row_len].copy_from_slice(src_row);
        }
    }

    fn read<T: Copy>(&self, image: &[T]) -> Vec<T> {
        let mut packed = Vec::with_capacity(self.row_len * self.rows);
        for row in 0..self.rows {
            let start = self.first_sample + row * self.image_row_len;
            packed.extend_from_slice(&image[start..start + self.row_len]);
        }
        packed
    }
}
