use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image as image_lib;
use image_lib::codecs::jpeg::JpegEncoder;
use image_lib::{ExtendedColorType, ImageEncoder};

use super::{ChannelCount, Image};
use crate::error::{Error, Result};

pub(super) fn load_rgb8(filename: &Path) -> Result<Image> {
    let img = image_lib::open(filename).map_err(|e| Error::image(filename, e))?;
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();

    Image::from_u8(width, height, ChannelCount::Rgb, rgb.into_raw())
}

pub(super) fn save_png(image: &Image, filename: &Path) -> Result<()> {
    let bytes = u8_bytes(image, "PNG")?;

    let color_type = match image.desc().color_format.channel_count {
        ChannelCount::L => image_lib::ColorType::L8,
        ChannelCount::LA => image_lib::ColorType::La8,
        ChannelCount::Rgb => image_lib::ColorType::Rgb8,
        ChannelCount::Rgba => image_lib::ColorType::Rgba8,
    };

    image_lib::save_buffer_with_format(
        filename,
        bytes,
        image.width(),
        image.height(),
        color_type,
        image_lib::ImageFormat::Png,
    )
    .map_err(|e| Error::image(filename, e))
}

/// The encoder stores every component at full resolution (4:4:4).
pub(super) fn save_jpeg(image: &Image, filename: &Path, quality: u8) -> Result<()> {
    if !(1..=100).contains(&quality) {
        return Err(Error::InvalidParameter(format!(
            "JPEG quality {} outside 1..=100",
            quality
        )));
    }

    let bytes = u8_bytes(image, "JPEG")?;

    let color_type = match image.desc().color_format.channel_count {
        ChannelCount::L => ExtendedColorType::L8,
        ChannelCount::Rgb => ExtendedColorType::Rgb8,
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "JPEG channel layout: {}",
                other
            )));
        }
    };

    let file = File::create(filename).map_err(|e| Error::io(filename, e))?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .write_image(bytes, image.width(), image.height(), color_type)
        .map_err(|e| Error::image(filename, e))?;

    writer.flush().map_err(|e| Error::io(filename, e))
}

fn u8_bytes<'a>(image: &'a Image, codec: &str) -> Result<&'a [u8]> {
    image.as_u8().ok_or_else(|| {
        Error::UnsupportedFormat(format!(
            "{} requires 8-bit samples, got {}",
            codec,
            image.desc().color_format
        ))
    })
}
