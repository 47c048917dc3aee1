//! Tests for mosaic configuration constants and validation

#[cfg(test)]
mod tests {
    use histomosaic::MosaicError;
    use histomosaic::io::configuration::{
        CHANNEL_RANGE, DEFAULT_BINS_PER_CHANNEL, DEFAULT_IMAGE_DIVISOR, DEFAULT_SUB_DIVISOR,
        MAX_BINS_PER_CHANNEL, MosaicConfig, OUTPUT_EXTENSION, OUTPUT_SUFFIX, SUPPORTED_EXTENSIONS,
    };
    use histomosaic::math::comparison::Comparator;

    // Tests default grid and histogram resolution
    // Verified by changing constant values
    #[test]
    fn test_default_values() {
        assert_eq!(DEFAULT_IMAGE_DIVISOR, 20);
        assert_eq!(DEFAULT_SUB_DIVISOR, 3);
        assert_eq!(DEFAULT_BINS_PER_CHANNEL, 50);
        assert_eq!(MAX_BINS_PER_CHANNEL, CHANNEL_RANGE);
    }

    // Tests the default config mirrors the constants
    // Verified by defaulting to a different comparator
    #[test]
    fn test_default_config() {
        let config = MosaicConfig::default();
        assert_eq!(config.image_divisor, DEFAULT_IMAGE_DIVISOR);
        assert_eq!(config.sub_divisor, DEFAULT_SUB_DIVISOR);
        assert_eq!(config.bins_per_channel, DEFAULT_BINS_PER_CHANNEL);
        assert_eq!(config.comparator, Comparator::ChiSquare);
        assert!(config.validate().is_ok());
    }

    // Tests each parameter is range checked by name
    // Verified by skipping the sub-divisor check
    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            (
                MosaicConfig {
                    image_divisor: 0,
                    ..MosaicConfig::default()
                },
                "image_divisor",
            ),
            (
                MosaicConfig {
                    sub_divisor: 0,
                    ..MosaicConfig::default()
                },
                "sub_divisor",
            ),
            (
                MosaicConfig {
                    bins_per_channel: 0,
                    ..MosaicConfig::default()
                },
                "bins_per_channel",
            ),
            (
                MosaicConfig {
                    bins_per_channel: 300,
                    ..MosaicConfig::default()
                },
                "bins_per_channel",
            ),
        ];

        for (config, expected) in cases {
            match config.validate() {
                Err(MosaicError::InvalidParameter { parameter, .. }) => {
                    assert_eq!(parameter, expected);
                }
                other => unreachable!("Expected InvalidParameter, got {other:?}"),
            }
        }
    }

    // Tests output naming is filesystem safe
    // Verified by adding special character
    #[test]
    fn test_output_naming() {
        assert!(OUTPUT_SUFFIX.starts_with('_'));
        for ch in OUTPUT_SUFFIX.chars() {
            assert!(ch.is_alphanumeric() || ch == '_' || ch == '-');
        }
        assert!(SUPPORTED_EXTENSIONS.contains(&OUTPUT_EXTENSION));
    }
}
