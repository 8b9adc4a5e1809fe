//! Drawing events relayed between browsers.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// A canvas coordinate in CSS pixels, relative to the canvas' top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line-segment endpoint plus stroke width, stamped with the sender's color.
///
/// The color is always the one the server assigned to the sender; whatever
/// color a browser may claim for itself is never copied into this struct.
///
/// # Serde representation
///
/// ```json
/// {"x":10.0,"y":10.0,"brushSize":5.0,"color":"#FF0000"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "brushSize")]
    pub brush_size: f64,
    pub color: Color,
}

impl DrawEvent {
    /// Stamps `point` and `brush_size` with the sender's assigned color.
    pub fn stamped(point: Point, brush_size: f64, color: Color) -> Self {
        Self {
            x: point.x,
            y: point.y,
            brush_size,
            color,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
