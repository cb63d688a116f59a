// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster codec — decode scans from disk and encode pages, using the `image`
// crate for JPEG and PNG.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat};
use tankobon_core::error::TankobonError;
use tracing::{debug, instrument};

use super::model::Raster;

/// Load a scan from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Raster, TankobonError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|err| TankobonError::UnreadableInput {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let raster = Raster::from_dynamic(image).map_err(|err| TankobonError::UnexpectedRasterShape {
        path: path.to_path_buf(),
        detail: err.0,
    })?;
    debug!(
        width = raster.width(),
        height = raster.height(),
        channels = raster.channels(),
        "Scan loaded"
    );
    Ok(raster)
}

/// Encode a raster as PNG bytes. `path` is only used for error context.
pub fn encode_png(raster: &Raster, path: &Path) -> Result<Vec<u8>, TankobonError> {
    let image = raster
        .to_dynamic()
        .map_err(|err| TankobonError::UnexpectedRasterShape {
            path: path.to_path_buf(),
            detail: err.0,
        })?;
    encode_to_format(&image, ImageFormat::Png, path)
}

/// Encode a gray plane as JPEG bytes with the given quality (1-100).
pub fn encode_jpeg(gray: &GrayImage, quality: u8, path: &Path) -> Result<Vec<u8>, TankobonError> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    gray.write_with_encoder(encoder)
        .map_err(|err| TankobonError::OutputWriteFailure {
            path: path.to_path_buf(),
            reason: format!("JPEG encoding failed: {err}"),
        })?;
    Ok(buffer)
}

/// Write a gray plane to `path`, picking the format from the extension.
pub fn save_gray(gray: &GrayImage, path: &Path) -> Result<(), TankobonError> {
    gray.save(path).map_err(|err| TankobonError::OutputWriteFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Write encoded bytes to `path`.
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<(), TankobonError> {
    std::fs::write(path, bytes).map_err(|err| TankobonError::OutputWriteFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Remove `path` before it is rewritten.
pub fn remove_existing(path: &Path) -> Result<(), TankobonError> {
    std::fs::remove_file(path).map_err(|err| TankobonError::OutputWriteFailure {
        path: path.to_path_buf(),
        reason: format!("cannot remove existing file: {err}"),
    })
}

fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
    path: &Path,
) -> Result<Vec<u8>, TankobonError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| TankobonError::OutputWriteFailure {
            path: path.to_path_buf(),
            reason: format!("image encoding failed: {err}"),
        })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        let img = RgbImage::from_fn(7, 5, |x, y| Rgb([x as u8 * 30, y as u8 * 40, 200]));
        let raster = Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap();

        let bytes = encode_png(&raster, &path).unwrap();
        write_bytes(&bytes, &path).unwrap();

        assert_eq!(load(&path).unwrap(), raster);
    }

    #[test]
    fn gray_png_stays_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let raster = Raster::Gray(GrayImage::from_fn(4, 4, |x, y| Luma([(x * y) as u8])));
        write_bytes(&encode_png(&raster, &path).unwrap(), &path).unwrap();
        assert!(matches!(load(&path).unwrap(), Raster::Gray(_)));
    }

    #[test]
    fn missing_file_is_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jpg");
        match load(&path) {
            Err(TankobonError::UnreadableInput { path: reported, .. }) => {
                assert_eq!(reported, path)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn garbage_file_is_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            load(&path),
            Err(TankobonError::UnreadableInput { .. })
        ));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("page.png");
        assert!(matches!(
            write_bytes(b"x", &path),
            Err(TankobonError::OutputWriteFailure { .. })
        ));
    }
}
