//! Integer points and polygons.
//!
//! Every shape the map produces (hex outlines, building figures, hit-test
//! regions) is an ordered list of integer pixel points. Hit testing happens on
//! these exact integer vertices, so no floating point survives past a
//! transform step.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The local origin of a hex
    pub const ORIGIN: Point = Point::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point
    pub fn distance_squared(&self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned pixel rectangle. `width` and `height` count pixels, so a
/// single point has a 1x1 bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// An ordered sequence of integer points, implicitly closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build a polygon from `(x, y)` pairs
    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Translate every point by `(dx, dy)`
    pub fn offset(&mut self, dx: i32, dy: i32) {
        for point in &mut self.points {
            point.x += dx;
            point.y += dy;
        }
    }

    /// Translated copy of this polygon
    pub fn translated(&self, by: Point) -> Polygon {
        let mut poly = self.clone();
        poly.offset(by.x, by.y);
        poly
    }

    /// Smallest rectangle holding every point, `None` for an empty polygon
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Points lying exactly on the outline are outside. Neighbouring regions
    /// share their outlines, so this keeps a point from being claimed by two
    /// regions at once. All arithmetic is exact integer math.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];

            if on_segment(a, b, p) {
                return false;
            }

            if (a.y > p.y) != (b.y > p.y) {
                // Does the edge cross the horizontal ray going right from p?
                let lhs = (p.x - a.x) as i64 * (b.y - a.y) as i64;
                let rhs = (p.y - a.y) as i64 * (b.x - a.x) as i64;
                let crosses = if b.y > a.y { lhs < rhs } else { lhs > rhs };
                if crosses {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x - a.x) as i64 * (p.y - a.y) as i64 - (b.y - a.y) as i64 * (p.x - a.x) as i64;
    cross == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_coords(&[(0, 0), (10, 0), (10, 10), (0, 10)])
    }

    #[test]
    fn test_offset_moves_every_point() {
        let mut poly = square();
        poly.offset(5, -3);
        assert_eq!(
            poly.points(),
            &[
                Point::new(5, -3),
                Point::new(15, -3),
                Point::new(15, 7),
                Point::new(5, 7)
            ]
        );
    }

    #[test]
    fn test_bounding_box() {
        let poly = Polygon::from_coords(&[(3, -2), (-4, 6), (1, 1)]);
        assert_eq!(
            poly.bounding_box(),
            Some(Rect {
                x: -4,
                y: -2,
                width: 8,
                height: 9
            })
        );
        assert_eq!(Polygon::default().bounding_box(), None);
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let poly = square();
        assert!(poly.contains(Point::new(5, 5)));
        assert!(poly.contains(Point::new(1, 9)));
        assert!(!poly.contains(Point::new(11, 5)));
        assert!(!poly.contains(Point::new(-1, -1)));
    }

    #[test]
    fn test_outline_points_are_outside() {
        let poly = square();
        assert!(!poly.contains(Point::new(0, 0)), "vertex");
        assert!(!poly.contains(Point::new(10, 4)), "right side");
        assert!(!poly.contains(Point::new(4, 10)), "bottom side");
    }

    #[test]
    fn test_contains_concave() {
        // A "U" shape: the notch between the arms is outside
        let poly = Polygon::from_coords(&[(0, 0), (3, 0), (3, 6), (6, 6), (6, 0), (9, 0), (9, 9), (0, 9)]);
        assert!(poly.contains(Point::new(1, 1)));
        assert!(poly.contains(Point::new(8, 1)));
        assert!(!poly.contains(Point::new(4, 3)));
        assert!(poly.contains(Point::new(4, 8)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = Polygon::from_coords(&[(0, 0), (10, 10)]);
        assert!(!line.contains(Point::new(5, 5)));
    }
}
