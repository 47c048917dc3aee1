//! Tests for square grid partitioning and borrowed tile views

#[cfg(test)]
mod tests {
    use histomosaic::MosaicError;
    use histomosaic::spatial::tiles::{Rect, Tile, partition};
    use image::{GenericImageView, Rgb, RgbImage};

    fn gradient(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| Rgb([x as u8, y as u8, (x + y) as u8]))
    }

    // Tests tile count and side length for an evenly divisible image
    // Verified by using divisor instead of divisor squared for capacity
    #[test]
    fn test_partition_produces_divisor_squared_tiles() {
        let image = gradient(9);
        let tiles = partition(&image, 3).unwrap();

        assert_eq!(tiles.len(), 9);
        assert!(tiles.iter().all(|tile| tile.rect().size == 3));
    }

    // Tests tiles are enumerated with the x index as outer loop
    // Verified by swapping loop order in subdivide
    #[test]
    fn test_partition_order_is_x_outer() {
        let image = gradient(6);
        let tiles = partition(&image, 3).unwrap();

        let rects: Vec<(u32, u32)> = tiles.iter().map(|t| (t.rect().x, t.rect().y)).collect();
        assert_eq!(
            rects,
            vec![
                (0, 0),
                (0, 2),
                (0, 4),
                (2, 0),
                (2, 2),
                (2, 4),
                (4, 0),
                (4, 2),
                (4, 4)
            ]
        );

        let indices: Vec<(usize, usize)> = tiles
            .iter()
            .map(|t| (t.x_index(), t.y_index()))
            .collect();
        assert_eq!(indices.get(1), Some(&(0, 1)));
        assert_eq!(indices.get(3), Some(&(1, 0)));
    }

    // Tests tiles are disjoint and cover everything but the trailing remainder
    // Verified by rounding tile size up instead of down
    #[test]
    fn test_partition_disjoint_with_truncated_coverage() {
        let image = gradient(10);
        let tiles = partition(&image, 3).unwrap();

        for (i, a) in tiles.iter().enumerate() {
            for b in tiles.iter().skip(i + 1) {
                assert!(!a.rect().overlaps(&b.rect()), "{a:?} overlaps {b:?}");
            }
        }

        let covered: u64 = tiles.iter().map(|t| t.rect().area()).sum();
        assert_eq!(covered, 81, "Remainder row and column must be excluded");

        let max_edge = tiles
            .iter()
            .map(|t| t.rect().x + t.rect().size)
            .max()
            .unwrap();
        assert_eq!(max_edge, 9);
    }

    // Tests non-square images are rejected
    // Verified by removing the square check in Tile::whole
    #[test]
    fn test_partition_rejects_non_square() {
        let image = RgbImage::new(8, 6);
        let result = partition(&image, 2);

        assert!(matches!(
            result,
            Err(MosaicError::NonSquareImage {
                width: 8,
                height: 6
            })
        ));
    }

    // Tests divisor bounds
    // Verified by allowing a zero divisor through
    #[test]
    fn test_partition_rejects_bad_divisors() {
        let image = gradient(4);

        assert!(matches!(
            partition(&image, 0),
            Err(MosaicError::InvalidParameter { .. })
        ));
        assert!(matches!(
            partition(&image, 5),
            Err(MosaicError::InvalidParameter { .. })
        ));
        assert_eq!(partition(&image, 4).unwrap().len(), 16);
    }

    // Tests tile pixels are read from the parent region
    // Verified by ignoring the rect offset in pixels()
    #[test]
    fn test_tile_pixels_follow_parent_region() {
        let image = gradient(8);
        let tiles = partition(&image, 2).unwrap();
        let tile = tiles.get(3).unwrap();

        assert_eq!(
            tile.rect(),
            Rect {
                x: 4,
                y: 4,
                size: 4
            }
        );

        let pixels: Vec<Rgb<u8>> = tile.pixels().copied().collect();
        assert_eq!(pixels.len(), 16);
        assert_eq!(pixels.first(), Some(&Rgb([4, 4, 8])));
        assert_eq!(pixels.get(1), Some(&Rgb([5, 4, 9])));
        assert_eq!(pixels.last(), Some(&Rgb([7, 7, 14])));
    }

    // Tests nested subdivision keeps parent coordinates
    // Verified by resetting sub-tile origin to zero
    #[test]
    fn test_subdivide_nested_offsets() {
        let image = gradient(12);
        let tiles = partition(&image, 2).unwrap();
        let tile = tiles.get(3).unwrap();

        let sub_tiles = tile.subdivide(3).unwrap();
        assert_eq!(sub_tiles.len(), 9);

        let first = sub_tiles.first().unwrap();
        let last = sub_tiles.last().unwrap();
        assert_eq!(
            first.rect(),
            Rect {
                x: 6,
                y: 6,
                size: 2
            }
        );
        assert_eq!(
            last.rect(),
            Rect {
                x: 10,
                y: 10,
                size: 2
            }
        );
        assert!(std::ptr::eq(first.parent(), &image));
    }

    // Tests the image-crate view matches the tile rectangle
    // Verified by passing the full image size to crop_imm
    #[test]
    fn test_tile_view_dimensions() {
        let image = gradient(6);
        let whole = Tile::whole(&image).unwrap();
        assert_eq!(whole.view().dimensions(), (6, 6));

        let tiles = whole.subdivide(2).unwrap();
        let view = tiles.get(2).unwrap().view();
        assert_eq!(view.dimensions(), (3, 3));
        assert_eq!(view.get_pixel(0, 0), Rgb([3, 0, 3]));
    }

    // Tests rectangle overlap edge cases
    // Verified by using inclusive edge comparisons
    #[test]
    fn test_rect_overlap_edges() {
        let a = Rect { x: 0, y: 0, size: 2 };
        let touching = Rect { x: 2, y: 0, size: 2 };
        let inside = Rect { x: 1, y: 1, size: 1 };

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
        assert_eq!(a.area(), 4);
    }
}
