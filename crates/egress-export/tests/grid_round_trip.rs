//! Integration test: convert a synthetic floorplan, serialize the grid
//! to the text format, and parse it back unchanged.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use egress_pipeline::boundary::{BoundaryError, INTERIOR};
use egress_pipeline::{CellAlphabet, ConvertConfig, GrayImage, RgbImage, convert};
use image::{Luma, Rgb};

fn floorplan_png() -> Vec<u8> {
    let mut img = RgbImage::from_pixel(32, 24, Rgb([255, 255, 255]));
    // Wall band and one door block; enough for a calibratable grid.
    for y in 4..20 {
        for x in 4..8 {
            img.put_pixel(x, y, Rgb([0, 0, 255]));
        }
    }
    for y in 8..14 {
        for x in 16..22 {
            img.put_pixel(x, y, Rgb([255, 0, 0]));
        }
    }

    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgb8,
    )
    .unwrap();
    buf
}

fn all_interior(image: &RgbImage) -> Result<GrayImage, BoundaryError> {
    Ok(GrayImage::from_pixel(
        image.width(),
        image.height(),
        Luma([INTERIOR]),
    ))
}

#[test]
fn converted_grid_survives_a_text_round_trip() {
    let config = ConvertConfig {
        border_px: 2,
        min_dimension: 500,
        ..ConvertConfig::default()
    };
    let result = convert(&floorplan_png(), &all_interior, &config).expect("conversion succeeds");

    for alphabet in [CellAlphabet::plain_doors(), CellAlphabet::exit_doors()] {
        let text = egress_export::to_text(&result.grid, &alphabet).unwrap();

        // One line per row, one single-character token per cell.
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), result.grid.height() as usize);
        for line in &lines {
            assert_eq!(
                line.split_whitespace().count(),
                result.grid.width() as usize,
            );
            assert!(line.split_whitespace().all(|token| token.len() == 1));
        }

        let parsed = egress_export::parse_text(&text, &alphabet).unwrap();
        assert_eq!(parsed, result.grid);
        assert_eq!(egress_export::to_text(&parsed, &alphabet).unwrap(), text);
    }
}
