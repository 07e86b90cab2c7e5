//! Fixed layout of the summary image.
//!
//! The layout is computed as plain data (text, position, scale, colour) so
//! its content can be checked without decoding pixels.

use crate::types::Timestamp;

use super::GdpEntry;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

pub const BACKGROUND: [u8; 4] = [0xf4, 0xf4, 0xf4, 0xff];
const TITLE_COLOR: [u8; 4] = [0x33, 0x33, 0x33, 0xff];
const INFO_COLOR: [u8; 4] = [0x55, 0x55, 0x55, 0xff];
const HEADER_COLOR: [u8; 4] = [0x00, 0x66, 0xcc, 0xff];
const ROW_COLOR: [u8; 4] = [0x33, 0x33, 0x33, 0xff];

const LEFT_MARGIN: u32 = 50;
const ROW_INDENT: u32 = 70;
const FIRST_ROW_BASELINE: u32 = 260;
const ROW_SPACING: u32 = 40;

pub const TITLE: &str = "Country GDP Summary";
pub const SECTION_HEADER: &str = "Top 5 by Estimated GDP";

/// One line of text, anchored at its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: u32,
    pub baseline: u32,
    /// Integer pixel scale applied to the bitmap font.
    pub scale: u32,
    pub color: [u8; 4],
}

/// Every line painted onto the canvas, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLayout {
    pub lines: Vec<TextLine>,
}

impl SummaryLayout {
    /// Lay out the title, totals, section header and ranking rows.
    ///
    /// `top` must already be ranked; one row is emitted per entry with no
    /// placeholder rows.
    pub fn build(total: usize, refreshed_at: Timestamp, top: &[GdpEntry<'_>]) -> Self {
        let mut lines = vec![
            TextLine {
                text: TITLE.to_string(),
                x: LEFT_MARGIN,
                baseline: 60,
                scale: 4,
                color: TITLE_COLOR,
            },
            TextLine {
                text: format!("Total Countries: {total}"),
                x: LEFT_MARGIN,
                baseline: 120,
                scale: 3,
                color: INFO_COLOR,
            },
            TextLine {
                text: format!("Last Refreshed: {}", format_refreshed_at(refreshed_at)),
                x: LEFT_MARGIN,
                baseline: 160,
                scale: 3,
                color: INFO_COLOR,
            },
            TextLine {
                text: SECTION_HEADER.to_string(),
                x: LEFT_MARGIN,
                baseline: 220,
                scale: 3,
                color: HEADER_COLOR,
            },
        ];

        lines.extend(top.iter().enumerate().filter_map(|(i, entry)| {
            let gdp = entry.estimated_gdp?;
            Some(TextLine {
                text: ranking_line(i + 1, entry.name, gdp),
                x: ROW_INDENT,
                baseline: FIRST_ROW_BASELINE + i as u32 * ROW_SPACING,
                scale: 2,
                color: ROW_COLOR,
            })
        }));

        Self { lines }
    }

    /// The text of each line, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// `"<rank>. <name>: $<gdp>"`.
pub fn ranking_line(rank: usize, name: &str, gdp: f64) -> String {
    format!("{rank}. {name}: ${}", format_thousands(gdp))
}

/// Human-readable refresh instant, e.g. `2025-01-31 14:05:09 UTC`.
pub fn format_refreshed_at(at: Timestamp) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Two decimals with comma thousands separators: `1234567.891` -> `1,234,567.89`.
pub fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
