//! Colors used by the canvas and the rasterizer.

use image::Rgba;

pub const PAGE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const WORKSPACE: Rgba<u8> = Rgba([229, 231, 235, 255]);
pub const GRID: Rgba<u8> = Rgba([148, 163, 184, 64]);
pub const SELECTION: Rgba<u8> = Rgba([59, 130, 246, 255]);
pub const HANDLE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const PLACEHOLDER_FILL: Rgba<u8> = Rgba([243, 244, 246, 255]);
pub const PLACEHOLDER_BORDER: Rgba<u8> = Rgba([156, 163, 175, 255]);
pub const PLACEHOLDER_TEXT: Rgba<u8> = Rgba([107, 114, 128, 255]);
pub const TEXT_FALLBACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        8 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ])),
        _ => None,
    }
}

/// Parse a text color, falling back to black.
pub fn text_color(hex: &str) -> Rgba<u8> {
    parse_hex_color(hex).unwrap_or(TEXT_FALLBACK)
}
