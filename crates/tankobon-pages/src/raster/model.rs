// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory 8-bit raster: either a single-channel gray plane or an
// interleaved multi-channel buffer.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use thiserror::Error;

/// Largest channel count a raster may carry (RGBA).
pub const MAX_CHANNELS: u8 = 4;

/// A buffer whose dimensions do not describe a supported raster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

/// A decoded scan.
///
/// `Gray` holds a 2-D plane. `Multichannel` holds `height × width × channels`
/// bytes in row-major, channel-interleaved order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raster {
    Gray(GrayImage),
    Multichannel {
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    },
}

impl Raster {
    // -- Construction ---------------------------------------------------------

    /// Build a multi-channel raster from interleaved bytes.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, ShapeError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(ShapeError(format!(
                "expected 1 to {MAX_CHANNELS} channels, got {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ShapeError(format!(
                "{width}x{height}x{channels} raster needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self::Multichannel {
            width,
            height,
            channels,
            data,
        })
    }

    /// Convert a decoded image. Wider sample types are narrowed to 8 bits.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, ShapeError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(gray) => Ok(Self::Gray(gray)),
            DynamicImage::ImageLuma16(_) => Ok(Self::Gray(image.to_luma8())),
            DynamicImage::ImageLumaA8(buf) => Self::from_raw(width, height, 2, buf.into_raw()),
            DynamicImage::ImageLumaA16(_) => {
                Self::from_raw(width, height, 2, image.to_luma_alpha8().into_raw())
            }
            DynamicImage::ImageRgb8(buf) => Self::from_raw(width, height, 3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => Self::from_raw(width, height, 4, buf.into_raw()),
            other if other.color().has_alpha() => {
                Self::from_raw(width, height, 4, other.to_rgba8().into_raw())
            }
            other => Self::from_raw(width, height, 3, other.to_rgb8().into_raw()),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(gray) => gray.width(),
            Self::Multichannel { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(gray) => gray.height(),
            Self::Multichannel { height, .. } => *height,
        }
    }

    /// Channel depth: 0 for a gray plane, the channel count otherwise.
    pub fn channels(&self) -> u8 {
        match self {
            Self::Gray(_) => 0,
            Self::Multichannel { channels, .. } => *channels,
        }
    }

    /// Whether converting to one gray channel loses no information: every
    /// channel of every pixel holds exactly the same value.
    pub fn is_grayscale_lossless(&self) -> bool {
        match self {
            Self::Gray(_) => true,
            Self::Multichannel { channels, data, .. } => data
                .chunks_exact(*channels as usize)
                .all(|px| px.windows(2).all(|pair| pair[0] == pair[1])),
        }
    }

    // -- Conversions ----------------------------------------------------------

    /// Average the channels of every pixel into a gray plane, truncating the
    /// mean toward zero.
    pub fn channel_mean(&self) -> GrayImage {
        match self {
            Self::Gray(gray) => gray.clone(),
            Self::Multichannel {
                width,
                height,
                channels,
                data,
            } => {
                let ch = *channels as usize;
                GrayImage::from_fn(*width, *height, |x, y| {
                    let offset = (y as usize * *width as usize + x as usize) * ch;
                    let sum: f32 = data[offset..offset + ch].iter().map(|&v| v as f32).sum();
                    Luma([(sum / ch as f32).clamp(0.0, 255.0) as u8])
                })
            }
        }
    }

    /// Reduce to a gray plane when that is lossless; otherwise return the
    /// raster unchanged.
    pub fn into_gray_if_lossless(self) -> Self {
        if matches!(self, Self::Multichannel { .. }) && self.is_grayscale_lossless() {
            Self::Gray(self.channel_mean())
        } else {
            self
        }
    }

    /// Copy the columns `[x, x + width)`, clamped to the raster.
    pub fn crop_columns(&self, x: u32, width: u32) -> Self {
        let x = x.min(self.width());
        let width = width.min(self.width() - x);
        match self {
            Self::Gray(gray) => {
                Self::Gray(image::imageops::crop_imm(gray, x, 0, width, gray.height()).to_image())
            }
            Self::Multichannel {
                width: full_width,
                height,
                channels,
                data,
            } => {
                let ch = *channels as usize;
                let row_len = *full_width as usize * ch;
                let start = x as usize * ch;
                let end = start + width as usize * ch;
                let mut cropped = Vec::with_capacity(width as usize * *height as usize * ch);
                for row in data.chunks_exact(row_len.max(1)) {
                    cropped.extend_from_slice(&row[start..end]);
                }
                Self::Multichannel {
                    width,
                    height: *height,
                    channels: *channels,
                    data: cropped,
                }
            }
        }
    }

    /// Convert to an `image` buffer for encoding.
    pub fn to_dynamic(&self) -> Result<DynamicImage, ShapeError> {
        let (width, height) = (self.width(), self.height());
        let (channels, data) = match self {
            Self::Gray(gray) => return Ok(DynamicImage::ImageLuma8(gray.clone())),
            Self::Multichannel { channels, data, .. } => (*channels, data.clone()),
        };
        let image = match channels {
            1 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageRgba8),
            _ => None,
        };
        image.ok_or_else(|| {
            ShapeError(format!(
                "cannot encode {width}x{height} raster with {channels} channels"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{RgbImage, RgbaImage};

    fn gray_rgb(width: u32, height: u32) -> Raster {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 7 + y * 3) % 256) as u8;
            Rgb([v, v, v])
        });
        Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap()
    }

    #[test]
    fn gray_plane_is_always_lossless() {
        let raster = Raster::Gray(GrayImage::from_fn(4, 3, |x, _| Luma([x as u8 * 60])));
        assert!(raster.is_grayscale_lossless());
        assert_eq!(raster.channels(), 0);
    }

    #[test]
    fn identical_channels_are_lossless() {
        let raster = gray_rgb(20, 10);
        assert_eq!(raster.channels(), 3);
        assert!(raster.is_grayscale_lossless());
    }

    #[test]
    fn single_divergent_pixel_is_not_lossless() {
        let mut img = RgbImage::from_pixel(20, 10, Rgb([90, 90, 90]));
        img.put_pixel(13, 7, Rgb([90, 91, 90]));
        let raster = Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap();
        assert!(!raster.is_grayscale_lossless());
    }

    #[test]
    fn alpha_channel_takes_part_in_the_check() {
        let opaque = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let translucent = RgbaImage::from_pixel(2, 2, Rgba([10, 10, 10, 255]));
        assert!(Raster::from_dynamic(DynamicImage::ImageRgba8(opaque))
            .unwrap()
            .is_grayscale_lossless());
        assert!(!Raster::from_dynamic(DynamicImage::ImageRgba8(translucent))
            .unwrap()
            .is_grayscale_lossless());
    }

    #[test]
    fn sixteen_bit_gray_is_narrowed() {
        let img = image::ImageBuffer::<Luma<u16>, _>::from_pixel(3, 2, Luma([u16::MAX]));
        let raster = Raster::from_dynamic(DynamicImage::ImageLuma16(img)).unwrap();
        match raster {
            Raster::Gray(gray) => assert_eq!(gray.get_pixel(0, 0).0[0], 255),
            other => panic!("expected gray raster, got {other:?}"),
        }
    }

    #[test]
    fn from_raw_rejects_bad_shapes() {
        assert!(Raster::from_raw(2, 2, 0, Vec::new()).is_err());
        assert!(Raster::from_raw(2, 2, 5, vec![0; 20]).is_err());
        assert!(Raster::from_raw(2, 2, 3, vec![0; 11]).is_err());
        assert!(Raster::from_raw(2, 2, 3, vec![0; 12]).is_ok());
    }

    #[test]
    fn channel_mean_truncates() {
        // (10 + 11 + 11) / 3 = 10.67 -> 10
        let raster = Raster::from_raw(1, 1, 3, vec![10, 11, 11]).unwrap();
        assert_eq!(raster.channel_mean().get_pixel(0, 0).0[0], 10);
    }

    #[test]
    fn lossless_reduction_keeps_values() {
        let raster = gray_rgb(8, 5);
        let expected = raster.channel_mean();
        match raster.into_gray_if_lossless() {
            Raster::Gray(gray) => {
                assert_eq!(gray, expected);
                assert_eq!(gray.get_pixel(2, 1).0[0], 17);
            }
            other => panic!("expected gray raster, got {other:?}"),
        }
    }

    #[test]
    fn colour_raster_is_not_reduced() {
        let raster = Raster::from_raw(1, 2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let reduced = raster.clone().into_gray_if_lossless();
        assert_eq!(reduced, raster);
    }

    #[test]
    fn crop_columns_of_multichannel() {
        // 4x2 RGB, value = column index in every channel.
        let data: Vec<u8> = (0..2)
            .flat_map(|_| (0..4u8).flat_map(|x| [x, x, x]))
            .collect();
        let raster = Raster::from_raw(4, 2, 3, data).unwrap();
        let cropped = raster.crop_columns(1, 2);
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        match cropped {
            Raster::Multichannel { data, .. } => {
                assert_eq!(data, vec![1, 1, 1, 2, 2, 2, 1, 1, 1, 2, 2, 2]);
            }
            other => panic!("expected multichannel raster, got {other:?}"),
        }
    }

    #[test]
    fn crop_columns_is_clamped() {
        let raster = Raster::Gray(GrayImage::new(10, 4));
        let cropped = raster.crop_columns(7, 50);
        assert_eq!(cropped.width(), 3);
        assert_eq!(cropped.height(), 4);
    }

    #[test]
    fn to_dynamic_matches_channel_count() {
        let rgb = Raster::from_raw(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert!(matches!(rgb.to_dynamic().unwrap(), DynamicImage::ImageRgb8(_)));

        let la = Raster::from_raw(1, 1, 2, vec![9, 255]).unwrap();
        assert!(matches!(la.to_dynamic().unwrap(), DynamicImage::ImageLumaA8(_)));

        let gray = Raster::Gray(GrayImage::new(1, 1));
        assert!(matches!(gray.to_dynamic().unwrap(), DynamicImage::ImageLuma8(_)));
    }
}
