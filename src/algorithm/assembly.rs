//! Composite assembly from matched candidate images
//!
//! Input arrives in partition order: x index outer, y index inner. Each run
//! of `divisor` images is therefore one column of the mosaic, stacked top to
//! bottom, and the columns are joined left to right.

use crate::io::error::{MosaicError, Result, invalid_parameter};
use image::{RgbImage, imageops};
use std::borrow::Borrow;

/// Stack images top to bottom
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty slice and `MismatchedTileSize`
/// for the first image whose width differs from the first image's
pub fn concat_vertical<I: Borrow<RgbImage>>(images: &[I]) -> Result<RgbImage> {
    let first = images
        .first()
        .ok_or_else(|| invalid_parameter("images", &0, &"nothing to concatenate"))?;
    let width = first.borrow().width();

    let mut height = 0;
    for (index, image) in images.iter().enumerate() {
        let image = image.borrow();
        if image.width() != width {
            return Err(MosaicError::MismatchedTileSize {
                index,
                expected: (width, image.height()),
                found: image.dimensions(),
            });
        }
        height += image.height();
    }

    let mut canvas = RgbImage::new(width, height);
    let mut y = 0;
    for image in images {
        let image = image.borrow();
        imageops::replace(&mut canvas, image, 0, i64::from(y));
        y += image.height();
    }
    Ok(canvas)
}

/// Join images left to right
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty slice and `MismatchedTileSize`
/// for the first image whose height differs from the first image's
pub fn concat_horizontal<I: Borrow<RgbImage>>(images: &[I]) -> Result<RgbImage> {
    let first = images
        .first()
        .ok_or_else(|| invalid_parameter("images", &0, &"nothing to concatenate"))?;
    let height = first.borrow().height();

    let mut width = 0;
    for (index, image) in images.iter().enumerate() {
        let image = image.borrow();
        if image.height() != height {
            return Err(MosaicError::MismatchedTileSize {
                index,
                expected: (image.width(), height),
                found: image.dimensions(),
            });
        }
        width += image.width();
    }

    let mut canvas = RgbImage::new(width, height);
    let mut x = 0;
    for image in images {
        let image = image.borrow();
        imageops::replace(&mut canvas, image, i64::from(x), 0);
        x += image.width();
    }
    Ok(canvas)
}

/// Lay out `divisor`² matched images as a `divisor` x `divisor` mosaic
///
/// Output size comes from the matched images themselves, not from the
/// source tiles they replace.
///
/// # Errors
///
/// Returns `InvalidParameter` for a zero divisor, `TileCount` if the image
/// count is not `divisor`², and `MismatchedTileSize` if a column has mixed
/// widths or the columns differ in total height. Indices in size errors
/// refer to the image position within `images`, or to the column position
/// when whole columns disagree.
pub fn assemble(images: &[&RgbImage], divisor: usize) -> Result<RgbImage> {
    if divisor == 0 {
        return Err(invalid_parameter("divisor", &divisor, &"must be at least 1"));
    }
    let expected = divisor * divisor;
    if images.len() != expected {
        return Err(MosaicError::TileCount {
            expected,
            found: images.len(),
        });
    }

    let columns = images
        .chunks(divisor)
        .enumerate()
        .map(|(column, run)| {
            concat_vertical(run).map_err(|error| offset_index(error, column * divisor))
        })
        .collect::<Result<Vec<_>>>()?;

    concat_horizontal(columns.as_slice())
}

fn offset_index(error: MosaicError, offset: usize) -> MosaicError {
    match error {
        MosaicError::MismatchedTileSize {
            index,
            expected,
            found,
        } => MosaicError::MismatchedTileSize {
            index: index + offset,
            expected,
            found,
        },
        other => other,
    }
}
