//! Canonical piece outlines.
//!
//! Templates are drawn in a local space where one hex side is about 120 units
//! long; `LayoutParams` scales them by `2 * y_point / 120`. Edge pieces
//! (road, ship, bridge) lie along the local y axis, which is the direction of
//! the east side of a hex before rotation. Ships and bridges are not
//! symmetric top to bottom, see `LayoutParams::edge_shape` for how that is
//! handled.

use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};

/// Template size the layout scale is relative to
pub const TEMPLATE_SPAN: f64 = 120.0;

const ROAD: [(i32, i32); 4] = [(-10, -50), (10, -50), (10, 50), (-10, 50)];

const SHIP: [(i32, i32); 8] = [
    (-10, -44),
    (10, -44),
    (10, 18),
    (4, 30),
    (4, 46),
    (-4, 46),
    (-4, 30),
    (-10, 18),
];

const BRIDGE: [(i32, i32); 8] = [
    (-14, -50),
    (14, -50),
    (14, 50),
    (-14, 50),
    (-14, 32),
    (-4, 20),
    (-4, -20),
    (-14, -32),
];

const SETTLEMENT: [(i32, i32); 5] = [(20, 20), (20, -8), (0, -28), (-20, -8), (-20, 20)];

const CITY: [(i32, i32); 7] = [
    (40, 20),
    (40, -16),
    (2, -16),
    (2, -28),
    (-18, -48),
    (-38, -28),
    (-38, 20),
];

const ROBBER: [(i32, i32); 9] = [
    (-20, 40),
    (20, 40),
    (12, 10),
    (18, -10),
    (10, -28),
    (0, -34),
    (-10, -28),
    (-18, -10),
    (-12, 10),
];

const PIRATE: [(i32, i32); 7] = [
    (-40, 20),
    (40, 20),
    (50, 0),
    (10, 0),
    (10, -40),
    (-20, 0),
    (-50, 0),
];

// Same corner order as `LayoutParams::hex_polygon`
const HEX: [(i32, i32); 6] = [(104, -60), (0, -120), (-104, -60), (-104, 60), (0, 120), (104, 60)];

/// The fixed set of piece outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Road,
    Ship,
    Bridge,
    Settlement,
    City,
    Robber,
    Pirate,
    /// Hex outline, for legends and toolbar icons
    Hex,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Road,
        Shape::Ship,
        Shape::Bridge,
        Shape::Settlement,
        Shape::City,
        Shape::Robber,
        Shape::Pirate,
        Shape::Hex,
    ];

    /// Template polygon in local template space
    pub fn template(self) -> Polygon {
        let coords: &[(i32, i32)] = match self {
            Shape::Road => &ROAD,
            Shape::Ship => &SHIP,
            Shape::Bridge => &BRIDGE,
            Shape::Settlement => &SETTLEMENT,
            Shape::City => &CITY,
            Shape::Robber => &ROBBER,
            Shape::Pirate => &PIRATE,
            Shape::Hex => &HEX,
        };
        Polygon::from_coords(coords)
    }

    /// Whether the piece is drawn along an edge
    pub fn is_edge_piece(self) -> bool {
        matches!(self, Shape::Road | Shape::Ship | Shape::Bridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Point;

    #[test]
    fn test_templates_are_centered_on_origin() {
        for shape in Shape::ALL {
            let template = shape.template();
            assert!(template.len() >= 3, "{:?}", shape);
            let bounds = template.bounding_box().unwrap();
            assert!(bounds.x < 0 && bounds.x + bounds.width > 0, "{:?}", shape);
            assert!(bounds.y < 0 && bounds.y + bounds.height > 0, "{:?}", shape);
        }
    }

    #[test]
    fn test_edge_pieces_lie_along_y_axis() {
        for shape in Shape::ALL.into_iter().filter(|s| s.is_edge_piece()) {
            let bounds = shape.template().bounding_box().unwrap();
            assert!(bounds.height > bounds.width * 2, "{:?}", shape);
            assert!(shape.template().contains(Point::ORIGIN), "{:?}", shape);
        }
    }
}
