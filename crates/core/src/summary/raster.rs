use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use super::glyphs::{glyph, GLYPH_ADVANCE, GLYPH_ASCENT, GLYPH_HEIGHT};
use super::layout::{SummaryLayout, TextLine, BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Paint every line of `layout` onto a fresh canvas.
pub(crate) fn paint(layout: &SummaryLayout) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba(BACKGROUND));
    for line in &layout.lines {
        draw_text(&mut canvas, line);
    }
    canvas
}

/// Encode the canvas as PNG.
pub(crate) fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    canvas.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

// Text running past the right edge is clipped.
fn draw_text(canvas: &mut RgbaImage, line: &TextLine) {
    let scale = line.scale.max(1);
    let top = line.baseline.saturating_sub(GLYPH_ASCENT * scale);
    let mut x = line.x;

    for ch in line.text.chars() {
        if x >= canvas.width() {
            break;
        }
        for (col, bits) in glyph(ch).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if (bits >> row) & 1 == 1 {
                    fill_block(
                        canvas,
                        x + col as u32 * scale,
                        top + row * scale,
                        scale,
                        line.color,
                    );
                }
            }
        }
        x += GLYPH_ADVANCE * scale;
    }
}

fn fill_block(canvas: &mut RgbaImage, x: u32, y: u32, size: u32, color: [u8; 4]) {
    let (width, height) = canvas.dimensions();
    for py in y..(y + size).min(height) {
        for px in x..(x + size).min(width) {
            canvas.put_pixel(px, py, Rgba(color));
        }
    }
}
