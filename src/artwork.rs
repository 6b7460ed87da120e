//! Official artwork decoded into a small pixel grid for half-block rendering

use image::imageops::FilterType;
use image::GenericImageView;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchResult;

/// Terminal cells available for the artwork in the detail overlay.
pub const ARTWORK_COLS: u32 = 32;
pub const ARTWORK_ROWS: u32 = 16;

/// Cells for the small preview on each grid card.
pub const THUMB_COLS: u32 = 12;
pub const THUMB_ROWS: u32 = 3;

const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Artwork {
    pub width: u32,
    /// Pixel rows; two pixel rows share one terminal row.
    pub height: u32,
    /// Row-major, `None` where the source is transparent.
    pub pixels: Vec<Option<[u8; 3]>>,
}

impl Artwork {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .flatten()
    }

    pub fn rows(&self) -> u32 {
        self.height.div_ceil(2)
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.rows())
            .map(|row| {
                let spans = (0..self.width)
                    .map(|x| {
                        let top = self.pixel(x, row * 2);
                        let bottom = self.pixel(x, row * 2 + 1);
                        half_block(top, bottom)
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect()
    }
}

fn half_block(top: Option<[u8; 3]>, bottom: Option<[u8; 3]>) -> Span<'static> {
    let rgb = |[r, g, b]: [u8; 3]| Color::Rgb(r, g, b);
    match (top, bottom) {
        (Some(top), Some(bottom)) => Span::styled(
            "\u{2580}",
            Style::default().fg(rgb(top)).bg(rgb(bottom)),
        ),
        (Some(top), None) => Span::styled("\u{2580}", Style::default().fg(rgb(top))),
        (None, Some(bottom)) => Span::styled("\u{2584}", Style::default().fg(rgb(bottom))),
        (None, None) => Span::raw(" "),
    }
}

/// Decode PNG (or any format `image` knows) and shrink it into `cols` x `rows` cells.
pub fn decode_artwork(bytes: &[u8], cols: u32, rows: u32) -> FetchResult<Artwork> {
    let image = image::load_from_memory(bytes)?;
    let image = if let Some((left, top, width, height)) = opaque_bounds(&image) {
        image.crop_imm(left, top, width, height)
    } else {
        image
    };
    let scaled = image.resize(cols.max(1), (rows * 2).max(1), FilterType::Triangle);
    let (width, height) = scaled.dimensions();
    let rgba = scaled.to_rgba8();
    let pixels = rgba
        .pixels()
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            (a >= ALPHA_CUTOFF).then_some([r, g, b])
        })
        .collect();
    Ok(Artwork {
        width,
        height,
        pixels,
    })
}

/// Bounding box of the visible pixels, so padding does not eat the small grid.
fn opaque_bounds(image: &image::DynamicImage) -> Option<(u32, u32, u32, u32)> {
    let rgba = image.to_rgba8();
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0, 0);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel.0[3] >= ALPHA_CUTOFF {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x == u32::MAX {
        return None;
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
