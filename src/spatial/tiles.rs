//! Square grid partitioning of images into borrowed tile views
//!
//! Tiles never copy pixel data: each one holds a reference to its parent
//! image plus the pixel rectangle it covers, so the parent must outlive every
//! tile derived from it. Side lengths use integer division, which means any
//! remainder pixels along the right and bottom edges belong to no tile.

use crate::io::error::{MosaicError, Result, invalid_parameter};
use image::{Rgb, RgbImage, SubImage, imageops};

/// Square pixel rectangle inside a parent image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge in parent pixel coordinates
    pub x: u32,
    /// Top edge in parent pixel coordinates
    pub y: u32,
    /// Side length in pixels
    pub size: u32,
}

impl Rect {
    /// Whether two rectangles share at least one pixel
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.size
            && other.x < self.x + self.size
            && self.y < other.y + other.size
            && other.y < self.y + self.size
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u64 {
        self.size as u64 * self.size as u64
    }
}

/// A square region of a parent image addressed by its grid position
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    image: &'a RgbImage,
    x_index: usize,
    y_index: usize,
    rect: Rect,
}

impl<'a> Tile<'a> {
    /// View covering an entire square image
    ///
    /// # Errors
    ///
    /// Returns `NonSquareImage` if width and height differ
    pub fn whole(image: &'a RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width != height {
            return Err(MosaicError::NonSquareImage { width, height });
        }
        Ok(Self {
            image,
            x_index: 0,
            y_index: 0,
            rect: Rect {
                x: 0,
                y: 0,
                size: width,
            },
        })
    }

    /// Split this tile into a `divisor` x `divisor` grid of smaller tiles
    ///
    /// Tiles are emitted with the x index as the outer loop and the y index
    /// as the inner loop. Assembly relies on this order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `divisor` is zero or larger than the
    /// tile's side length
    pub fn subdivide(&self, divisor: usize) -> Result<Vec<Self>> {
        let side = self.rect.size;
        let parts = u32::try_from(divisor)
            .ok()
            .filter(|&d| d > 0 && d <= side)
            .ok_or_else(|| {
                invalid_parameter(
                    "divisor",
                    &divisor,
                    &format!("must be between 1 and the tile side length {side}"),
                )
            })?;
        let size = side / parts;

        let mut tiles = Vec::with_capacity(divisor * divisor);
        for x_index in 0..parts {
            for y_index in 0..parts {
                tiles.push(Self {
                    image: self.image,
                    x_index: x_index as usize,
                    y_index: y_index as usize,
                    rect: Rect {
                        x: self.rect.x + x_index * size,
                        y: self.rect.y + y_index * size,
                        size,
                    },
                });
            }
        }
        Ok(tiles)
    }

    /// Column of this tile within the grid it was cut from
    pub const fn x_index(&self) -> usize {
        self.x_index
    }

    /// Row of this tile within the grid it was cut from
    pub const fn y_index(&self) -> usize {
        self.y_index
    }

    /// Pixel rectangle in parent coordinates
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Image this tile borrows from
    pub const fn parent(&self) -> &'a RgbImage {
        self.image
    }

    /// Iterate the covered pixels row by row
    pub fn pixels(&self) -> impl Iterator<Item = &'a Rgb<u8>> + use<'a> {
        let Rect { x, y, size } = self.rect;
        let image = self.image;
        (y..y + size)
            .flat_map(move |py| (x..x + size).filter_map(move |px| image.get_pixel_checked(px, py)))
    }

    /// Image-crate view over the covered region
    pub fn view(&self) -> SubImage<&'a RgbImage> {
        let Rect { x, y, size } = self.rect;
        imageops::crop_imm(self.image, x, y, size, size)
    }
}

/// Divide a square image into `divisor`² tiles of side `width / divisor`
///
/// # Errors
///
/// Returns `NonSquareImage` for non-square input and `InvalidParameter` if
/// `divisor` is zero or exceeds the image width
pub fn partition(image: &RgbImage, divisor: usize) -> Result<Vec<Tile<'_>>> {
    let tiles = Tile::whole(image)?.subdivide(divisor)?;

    let remainder = image.width() as usize % divisor;
    if remainder > 0 {
        log::debug!(
            "{remainder} trailing pixel rows and columns excluded by a {divisor}x{divisor} grid"
        );
    }

    Ok(tiles)
}
