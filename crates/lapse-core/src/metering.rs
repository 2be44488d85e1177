//! Scene brightness metering over a normalized grayscale histogram.
//!
//! Each histogram bin's share of the frame is weighted by its position:
//! bin 0 (black) contributes nothing, bin 255 (white) full power. The
//! result lands in [0, 255].

use crate::types::ParseError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fraction of frame width/height the centered metering window covers.
const CENTER_FRACTION: f64 = 0.3;

/// Which part of the frame the meter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterZone {
    /// The whole frame.
    Full,
    /// A centered window, 30% of the frame in each dimension.
    Center,
}

impl FromStr for MeterZone {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(MeterZone::Full),
            "center" => Ok(MeterZone::Center),
            other => Err(ParseError {
                what: "meter zone",
                value: other.to_string(),
            }),
        }
    }
}

/// Average brightness of `image` over the requested zone.
pub fn brightness(image: &DynamicImage, zone: MeterZone) -> f64 {
    let gray = image.to_luma8();
    let gray = match zone {
        MeterZone::Full => gray,
        MeterZone::Center => {
            let (width, height) = gray.dimensions();
            let w = ((width as f64 * CENTER_FRACTION) as u32).max(1);
            let h = ((height as f64 * CENTER_FRACTION) as u32).max(1);
            let x = (width - w) / 2;
            let y = (height - h) / 2;
            image::imageops::crop_imm(&gray, x, y, w, h).to_image()
        }
    };

    let pixels = (gray.width() as u64 * gray.height() as u64) as f64;
    if pixels == 0.0 {
        return 0.0;
    }

    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    histogram
        .iter()
        .enumerate()
        .map(|(bin, &count)| bin as f64 * (count as f64 / pixels))
        .sum()
}
