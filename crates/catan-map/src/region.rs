//! Per-scale hit-test regions around a single hex.
//!
//! Each edge region is the rhombus spanned by the hex center, the two ends of
//! the side and the center of the neighbour across it. Each node region is the
//! triangle between the hex center and the centers of the two neighbours
//! flanking the corner. Both families tile the plane, so a point belongs to the
//! region of the nearest edge (or node) whichever hex tests it first.

use crate::hex::{EdgeDirection, VertexDirection};
use crate::layout::{HexOutline, LayoutParams};
use crate::polygon::{Point, Polygon};
use tracing::debug;

/// Hit-test regions for one hex radius, in hex-local coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIndex {
    hex_radius: i32,
    hex: Polygon,
    edges: [Polygon; 6],
    nodes: [Polygon; 6],
    /// Half extents of everything above; points further out skip the tests
    reach_x: i32,
    reach_y: i32,
}

impl RegionIndex {
    pub fn build(params: &LayoutParams) -> Self {
        debug!(hex_radius = params.hex_radius, "building hit-test regions");

        let edges = std::array::from_fn(|i| {
            let side = EdgeDirection::from_index(i);
            let [start, end] = side.endpoints();
            Polygon::new(vec![
                Point::ORIGIN,
                params.vertex_offset(end),
                params.neighbor_offset(side),
                params.vertex_offset(start),
            ])
        });

        let nodes = std::array::from_fn(|i| {
            let [first, second] = VertexDirection::from_index(i).edges();
            Polygon::new(vec![
                Point::ORIGIN,
                params.neighbor_offset(first),
                params.neighbor_offset(second),
            ])
        });

        Self {
            hex_radius: params.hex_radius,
            hex: params.hex_polygon(HexOutline::Fill),
            edges,
            nodes,
            reach_x: 2 * params.x_point,
            reach_y: params.hex_radius + params.y_point,
        }
    }

    /// The radius these regions were built for
    pub fn hex_radius(&self) -> i32 {
        self.hex_radius
    }

    pub fn edge_region(&self, side: EdgeDirection) -> &Polygon {
        &self.edges[side.index()]
    }

    pub fn node_region(&self, corner: VertexDirection) -> &Polygon {
        &self.nodes[corner.index()]
    }

    pub fn hex_region(&self) -> &Polygon {
        &self.hex
    }

    fn within_reach(&self, local: Point) -> bool {
        local.x.abs() < self.reach_x && local.y.abs() < self.reach_y
    }

    /// Side whose region holds a hex-local point
    pub fn edge_at(&self, local: Point) -> Option<EdgeDirection> {
        if !self.within_reach(local) {
            return None;
        }
        EdgeDirection::ALL
            .into_iter()
            .find(|side| self.edges[side.index()].contains(local))
    }

    /// Corner whose region holds a hex-local point
    pub fn vertex_at(&self, local: Point) -> Option<VertexDirection> {
        if !self.within_reach(local) {
            return None;
        }
        VertexDirection::ALL
            .into_iter()
            .find(|corner| self.nodes[corner.index()].contains(local))
    }

    /// Whether a hex-local point is inside the hex itself
    pub fn hex_contains(&self, local: Point) -> bool {
        self.within_reach(local) && self.hex.contains(local)
    }
}
