//! Coordinate math relating board positions to pixels.
//!
//! `LayoutParams` is recomputed by `LayoutParams::scale` whenever the hex
//! radius changes. All derived lengths are whole pixels and every transform
//! step rounds, because hit-test regions are built from these exact vertices.

use crate::board::{Board, EdgeId, GridExtent, HexId, NodeId};
use crate::hex::{EdgeDirection, HexCoord, VertexDirection};
use crate::polygon::{Point, Polygon};
use crate::shapes::TEMPLATE_SPAN;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Radii at or below this are rejected by `LayoutParams::scale`
pub const MIN_HEX_RADIUS: i32 = 3;

/// Chit radius before any label has been measured
pub const DEFAULT_CHIT_RADIUS: i32 = 15;

/// Space kept between a chit label and the chit's rim
const CHIT_PADDING: i32 = 2;

/// Margin used when a config does not name one
pub const DEFAULT_MARGIN: i32 = 10;

/// Whether a hex outline is filled or stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HexOutline {
    /// Exact corners
    Fill,
    /// Right and bottom corners pulled in by one pixel so the stroke does not
    /// bleed into the next tile
    Stroke,
}

/// Geometry derived from a hex radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub hex_radius: i32,
    /// Half the width of a hex: `hex_radius * cos(30°)`
    pub x_point: i32,
    /// Height of a slanted side: `hex_radius * sin(30°)`
    pub y_point: i32,
    pub x_margin: i32,
    pub y_margin: i32,
    /// Board size in pixels, zero when no grid was given
    pub width: i32,
    pub height: i32,
    pub chit_radius: i32,
    shrink_left: bool,
}

impl LayoutParams {
    /// Derive all geometry for `hex_radius`.
    ///
    /// # Panics
    /// If `hex_radius` is not above [`MIN_HEX_RADIUS`].
    pub fn scale(hex_radius: i32, margin: i32, extent: Option<GridExtent>) -> Self {
        assert!(
            hex_radius > MIN_HEX_RADIUS,
            "hex radius {} must exceed {}",
            hex_radius,
            MIN_HEX_RADIUS
        );

        let radius = hex_radius as f64;
        let x_point = (radius * (PI / 6.0).cos()).round() as i32;
        let y_point = (radius * (PI / 6.0).sin()).round() as i32;

        let (width, height) = match extent {
            Some(extent) => {
                let shrunk = i32::from(extent.shrink_left) + i32::from(extent.shrink_right);
                let width =
                    2 * margin + (2 * extent.columns as i32 + 1 - shrunk) * x_point;
                let height = 2 * margin + extent.rows as i32 * (hex_radius + y_point) + y_point;
                (width, height)
            }
            None => (0, 0),
        };

        Self {
            hex_radius,
            x_point,
            y_point,
            x_margin: margin,
            y_margin: margin,
            width,
            height,
            chit_radius: DEFAULT_CHIT_RADIUS,
            shrink_left: extent.is_some_and(|e| e.shrink_left),
        }
    }

    /// The largest hex radius whose board fits in a `width` x `height`
    /// viewport. Never less than one above [`MIN_HEX_RADIUS`].
    pub fn fit_radius(width: i32, height: i32, margin: i32, extent: GridExtent) -> i32 {
        let fits = |radius: i32| {
            let params = Self::scale(radius, margin, Some(extent));
            params.width <= width && params.height <= height
        };

        // Estimate from the continuous formulas, then settle on whole pixels
        let shrunk = f64::from(u8::from(extent.shrink_left) + u8::from(extent.shrink_right));
        let across = (2.0 * extent.columns as f64 + 1.0 - shrunk) * (PI / 6.0).cos();
        let down = 1.5 * extent.rows as f64 + 0.5;
        let room_x = f64::from(width - 2 * margin) / across;
        let room_y = f64::from(height - 2 * margin) / down;

        let floor = MIN_HEX_RADIUS + 1;
        let mut radius = (room_x.min(room_y).floor() as i32).max(floor);
        while radius > floor && !fits(radius) {
            radius -= 1;
        }
        while fits(radius + 1) {
            radius += 1;
        }
        radius
    }

    /// Grow the chit so a label of the given pixel size fits inside it
    pub fn fit_chit_text(&mut self, text_width: i32, text_height: i32) {
        let half_diagonal = f64::from(text_width).hypot(f64::from(text_height)) / 2.0;
        let needed = half_diagonal.ceil() as i32 + CHIT_PADDING;
        self.chit_radius = self.chit_radius.max(needed);
    }

    /// Pixel center of the hex at a grid position
    pub fn hex_center(&self, coord: HexCoord) -> Point {
        let mut x = self.x_margin + self.x_point + coord.x * 2 * self.x_point;
        if coord.is_odd_row() {
            x += self.x_point;
        }
        if self.shrink_left {
            x -= self.x_point;
        }
        let y = self.y_margin + self.hex_radius + coord.y * (self.hex_radius + self.y_point);
        Point::new(x, y)
    }

    /// Pixel center of a hex on the board
    pub fn hex_center_of(&self, board: &Board, hex: HexId) -> Point {
        self.hex_center(board.hex(hex).coord)
    }

    /// Offset of a corner from its hex center
    pub fn vertex_offset(&self, corner: VertexDirection) -> Point {
        let (xp, yp, r) = (self.x_point, self.y_point, self.hex_radius);
        match corner {
            VertexDirection::NorthEast => Point::new(xp, -yp),
            VertexDirection::North => Point::new(0, -r),
            VertexDirection::NorthWest => Point::new(-xp, -yp),
            VertexDirection::SouthWest => Point::new(-xp, yp),
            VertexDirection::South => Point::new(0, r),
            VertexDirection::SouthEast => Point::new(xp, yp),
        }
    }

    /// Offset from a hex center to the center of its neighbour across `side`
    pub fn neighbor_offset(&self, side: EdgeDirection) -> Point {
        let (xp, row) = (self.x_point, self.hex_radius + self.y_point);
        match side {
            EdgeDirection::East => Point::new(2 * xp, 0),
            EdgeDirection::NorthEast => Point::new(xp, -row),
            EdgeDirection::NorthWest => Point::new(-xp, -row),
            EdgeDirection::West => Point::new(-2 * xp, 0),
            EdgeDirection::SouthWest => Point::new(-xp, row),
            EdgeDirection::SouthEast => Point::new(xp, row),
        }
    }

    /// Hex outline around the local origin, corners in `VertexDirection` order
    pub fn hex_polygon(&self, outline: HexOutline) -> Polygon {
        let adjust = match outline {
            HexOutline::Fill => 0,
            HexOutline::Stroke => 1,
        };
        Polygon::new(
            VertexDirection::ALL
                .iter()
                .map(|corner| {
                    let p = self.vertex_offset(*corner);
                    Point::new(
                        if p.x > 0 { p.x - adjust } else { p.x },
                        if p.y > 0 { p.y - adjust } else { p.y },
                    )
                })
                .collect(),
        )
    }

    /// Factor taking template units to pixels
    pub fn template_scale(&self) -> f64 {
        f64::from(2 * self.y_point) / TEMPLATE_SPAN
    }

    /// Rotation applied to pieces on the given side
    fn edge_angle(side: EdgeDirection) -> f64 {
        2.0 * PI - side.index() as f64 * 2.0 * PI / 6.0
    }

    /// Where an edge piece is centered, relative to its hex center
    pub fn edge_anchor(&self, side: EdgeDirection) -> Point {
        let theta = Self::edge_angle(side);
        let reach = f64::from(self.x_point);
        Point::new(
            (reach * theta.cos()).round() as i32,
            (reach * theta.sin()).round() as i32,
        )
    }

    /// Place an edge piece template.
    ///
    /// With `Some((center, side))` the template is rotated onto `side` of the
    /// hex centered at `center`. Sides whose index is not a multiple of 3 get
    /// the template reflected along its length first; asymmetric ships and
    /// bridges rely on this to line up with roads. With `None` the template
    /// keeps the east-side orientation and stays at the origin.
    pub fn edge_shape(&self, at: Option<(Point, EdgeDirection)>, template: &Polygon) -> Polygon {
        let (theta, mirrored, origin) = match at {
            Some((center, side)) => (
                Self::edge_angle(side),
                side.index() % 3 != 0,
                center + self.edge_anchor(side),
            ),
            None => (0.0, false, Point::ORIGIN),
        };
        let (sin, cos) = theta.sin_cos();
        let scale = self.template_scale();

        let points = template
            .points()
            .iter()
            .map(|p| {
                let (x, y) = (f64::from(p.x), f64::from(if mirrored { -p.y } else { p.y }));
                let rx = (x * cos - y * sin).round();
                let ry = (x * sin + y * cos).round();
                Point::new(
                    (rx * scale).round() as i32 + origin.x,
                    (ry * scale).round() as i32 + origin.y,
                )
            })
            .collect();
        Polygon::new(points)
    }

    /// Place a building template on a corner of the hex centered at `center`.
    /// Buildings are never rotated. With `None` the scaled template stays at
    /// the origin.
    pub fn node_shape(&self, at: Option<(Point, VertexDirection)>, template: &Polygon) -> Polygon {
        let origin = match at {
            Some((center, corner)) => center + self.vertex_offset(corner),
            None => Point::ORIGIN,
        };
        self.scaled(template, origin)
    }

    /// Place a figure (robber, pirate) on a hex center, unrotated
    pub fn hex_shape(&self, center: Point, template: &Polygon) -> Polygon {
        self.scaled(template, center)
    }

    fn scaled(&self, template: &Polygon, origin: Point) -> Polygon {
        let scale = self.template_scale();
        let points = template
            .points()
            .iter()
            .map(|p| {
                Point::new(
                    (f64::from(p.x) * scale).round() as i32 + origin.x,
                    (f64::from(p.y) * scale).round() as i32 + origin.y,
                )
            })
            .collect();
        Polygon::new(points)
    }

    /// Edge piece polygon for an edge on the board
    pub fn edge_polygon(&self, board: &Board, edge: EdgeId, template: &Polygon) -> Polygon {
        let edge = board.edge(edge);
        let center = self.hex_center_of(board, edge.primary_hex());
        self.edge_shape(Some((center, edge.pos)), template)
    }

    /// Building polygon for a node on the board
    pub fn node_polygon(&self, board: &Board, node: NodeId, template: &Polygon) -> Polygon {
        let node = board.node(node);
        let center = self.hex_center_of(board, node.primary_hex());
        self.node_shape(Some((center, node.pos)), template)
    }

    /// Pixel position of a node
    pub fn node_position(&self, board: &Board, node: NodeId) -> Point {
        let node = board.node(node);
        self.hex_center_of(board, node.primary_hex()) + self.vertex_offset(node.pos)
    }

    /// Pixel positions of both ends of an edge
    pub fn edge_endpoints(&self, board: &Board, edge: EdgeId) -> (Point, Point) {
        let edge = board.edge(edge);
        let center = self.hex_center_of(board, edge.primary_hex());
        let [a, b] = edge.pos.endpoints();
        (center + self.vertex_offset(a), center + self.vertex_offset(b))
    }
}
