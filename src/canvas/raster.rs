use std::io::Cursor;

use egui::{Color32, Pos2};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::CanvasError;
use crate::stroke::Stroke;

// Thinner brushes would fall between pixel centers
const MIN_RADIUS: f32 = 0.5;

fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Fill the whole buffer with an opaque color
pub(crate) fn fill(buffer: &mut RgbaImage, color: Color32) {
    let pixel = to_rgba(color);
    for p in buffer.pixels_mut() {
        *p = pixel;
    }
}

/// Paint a stroke as a round-capped polyline.
///
/// A pixel is covered when its center lies within half the stroke width of
/// any segment. Strokes are painted opaque, so painting in the background
/// color restores the background.
pub(crate) fn paint_stroke(buffer: &mut RgbaImage, stroke: &Stroke) {
    let points = stroke.points();
    let Some(&first) = points.first() else {
        return;
    };

    let radius = (stroke.width() / 2.0).max(MIN_RADIUS);
    let pixel = to_rgba(stroke.color());

    if points.len() == 1 {
        paint_segment(buffer, first, first, radius, pixel);
        return;
    }

    for window in points.windows(2) {
        paint_segment(buffer, window[0], window[1], radius, pixel);
    }
}

fn paint_segment(buffer: &mut RgbaImage, start: Pos2, end: Pos2, radius: f32, pixel: Rgba<u8>) {
    let (width, height) = (buffer.width() as i64, buffer.height() as i64);

    // Clip the segment's bounding box to the buffer
    let min_x = ((start.x.min(end.x) - radius).floor() as i64).max(0);
    let min_y = ((start.y.min(end.y) - radius).floor() as i64).max(0);
    let max_x = ((start.x.max(end.x) + radius).ceil() as i64).min(width - 1);
    let max_y = ((start.y.max(end.y) + radius).ceil() as i64).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_line_segment(center, start, end) <= radius {
                buffer.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }
}

/// Calculate distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Encode the buffer as PNG at its native size
pub(crate) fn encode_png(buffer: &RgbaImage) -> Result<Vec<u8>, CanvasError> {
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| CanvasError::Encode(e.to_string()))?;
    Ok(bytes)
}
