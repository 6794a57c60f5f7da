//! Mapping pixel positions to board elements.

use crate::board::{Board, EdgeId, Hex, HexId, NodeId};
use crate::layout::LayoutParams;
use crate::polygon::Point;
use crate::region::RegionIndex;
use serde::{Deserialize, Serialize};

/// A board element under the pointer: the unit of hit testing, validation and
/// selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum MapElement {
    Hex(HexId),
    Edge(EdgeId),
    Node(NodeId),
}

impl MapElement {
    pub fn as_hex(&self) -> Option<HexId> {
        match self {
            MapElement::Hex(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            MapElement::Edge(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            MapElement::Node(id) => Some(*id),
            _ => None,
        }
    }
}

/// Which kind of element a lookup is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocateTarget {
    Hex,
    Edge,
    Node,
}

/// Finds the element under a pixel.
///
/// Hexes are scanned in row-major order and the first hex whose region holds
/// the point answers. A shared edge or node reached through either of its
/// hexes is the same element, so no deduplication is needed. Boards are small
/// enough that the linear scan is fine.
#[derive(Debug, Clone, Copy)]
pub struct BoardLocator<'a> {
    params: &'a LayoutParams,
    regions: &'a RegionIndex,
}

impl<'a> BoardLocator<'a> {
    /// # Panics
    /// If `regions` were built for a different hex radius than `params`.
    pub fn new(params: &'a LayoutParams, regions: &'a RegionIndex) -> Self {
        assert_eq!(
            regions.hex_radius(),
            params.hex_radius,
            "hit-test regions are stale for this scale"
        );
        Self { params, regions }
    }

    pub fn params(&self) -> &'a LayoutParams {
        self.params
    }

    /// Point relative to each hex center, in scan order
    fn local_points<'b>(&'b self, board: &'b Board, p: Point) -> impl Iterator<Item = (&'b Hex, Point)> + 'b {
        board
            .hexes()
            .map(move |hex| (hex, p - self.params.hex_center(hex.coord)))
    }

    pub fn locate_edge(&self, board: &Board, p: Point) -> Option<EdgeId> {
        self.local_points(board, p)
            .find_map(|(hex, local)| self.regions.edge_at(local).map(|side| hex.edge(side)))
    }

    pub fn locate_node(&self, board: &Board, p: Point) -> Option<NodeId> {
        self.local_points(board, p)
            .find_map(|(hex, local)| self.regions.vertex_at(local).map(|corner| hex.node(corner)))
    }

    pub fn locate_hex(&self, board: &Board, p: Point) -> Option<HexId> {
        self.local_points(board, p)
            .find(|(_, local)| self.regions.hex_contains(*local))
            .map(|(hex, _)| hex.id)
    }

    pub fn locate(&self, board: &Board, target: LocateTarget, p: Point) -> Option<MapElement> {
        match target {
            LocateTarget::Hex => self.locate_hex(board, p).map(MapElement::Hex),
            LocateTarget::Edge => self.locate_edge(board, p).map(MapElement::Edge),
            LocateTarget::Node => self.locate_node(board, p).map(MapElement::Node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardLayout, HexCell, Terrain};
    use crate::hex::{EdgeDirection, HexCoord, VertexDirection};
    use crate::layout::HexOutline;
    use crate::shapes::Shape;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_hex() -> Board {
        Board::from_layout(&BoardLayout {
            columns: 1,
            rows: 1,
            shrink_left: false,
            shrink_right: false,
            hexes: vec![HexCell::new(0, 0, Terrain::Pasture).with_roll(9)],
        })
        .unwrap()
    }

    fn setup(board: &Board, radius: i32) -> (LayoutParams, RegionIndex) {
        let params = LayoutParams::scale(radius, 10, Some(board.extent()));
        let regions = RegionIndex::build(&params);
        (params, regions)
    }

    #[test]
    fn test_single_hex_center() {
        let board = single_hex();
        let (params, regions) = setup(&board, 50);
        let locator = BoardLocator::new(&params, &regions);
        let center = params.hex_center(HexCoord::new(0, 0));

        assert_eq!(locator.locate_hex(&board, center), Some(HexId(0)));
        assert_eq!(locator.locate_edge(&board, center), None);
        assert_eq!(locator.locate_node(&board, center), None);
    }

    #[test]
    fn test_single_hex_east_side() {
        let board = single_hex();
        let (params, regions) = setup(&board, 50);
        let locator = BoardLocator::new(&params, &regions);
        let center = params.hex_center(HexCoord::new(0, 0));

        // Midpoint of corner 0 and corner 5
        let a = params.vertex_offset(VertexDirection::NorthEast);
        let b = params.vertex_offset(VertexDirection::SouthEast);
        let p = center + Point::new((a.x + b.x) / 2, (a.y + b.y) / 2);

        let edge = locator.locate_edge(&board, p).unwrap();
        assert_eq!(board.edge(edge).pos, EdgeDirection::East);
        assert_eq!(edge, board.hex(HexId(0)).edge(EdgeDirection::East));
    }

    #[test]
    fn test_outside_board_finds_nothing() {
        let board = single_hex();
        let (params, regions) = setup(&board, 50);
        let locator = BoardLocator::new(&params, &regions);
        let far = Point::new(params.width + 200, params.height + 200);

        assert_eq!(locator.locate(&board, LocateTarget::Hex, far), None);
        assert_eq!(locator.locate(&board, LocateTarget::Edge, far), None);
        assert_eq!(locator.locate(&board, LocateTarget::Node, far), None);
    }

    #[test]
    fn test_every_hex_center_locates_its_hex() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::from_layout(&BoardLayout::standard_with_rng(&mut rng)).unwrap();
        let (params, regions) = setup(&board, 40);
        let locator = BoardLocator::new(&params, &regions);

        for hex in board.hexes() {
            let center = params.hex_center(hex.coord);
            assert_eq!(locator.locate_hex(&board, center), Some(hex.id));
        }
    }

    #[test]
    fn test_road_footprints_locate_their_edge() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::from_layout(&BoardLayout::standard_with_rng(&mut rng)).unwrap();
        let (params, regions) = setup(&board, 48);
        let locator = BoardLocator::new(&params, &regions);
        let road = Shape::Road.template();

        for edge in board.edges() {
            let poly = params.edge_polygon(&board, edge.id, &road);
            let anchor = params.hex_center_of(&board, edge.primary_hex()) + params.edge_anchor(edge.pos);
            assert_eq!(locator.locate_edge(&board, anchor), Some(edge.id), "anchor of {:?}", edge.id);
            // Halfway from the anchor to each corner of the road
            for corner in poly.points() {
                let probe = Point::new((anchor.x + corner.x) / 2, (anchor.y + corner.y) / 2);
                assert_eq!(locator.locate_edge(&board, probe), Some(edge.id), "{:?} at {:?}", edge.id, probe);
            }
        }
    }

    #[test]
    fn test_node_positions_locate_their_node() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::from_layout(&BoardLayout::standard_with_rng(&mut rng)).unwrap();
        let (params, regions) = setup(&board, 36);
        let locator = BoardLocator::new(&params, &regions);

        for node in board.nodes() {
            let p = params.node_position(&board, node.id);
            assert_eq!(locator.locate_node(&board, p), Some(node.id));
        }
    }

    #[test]
    fn test_hex_outline_interior_locates_hex() {
        let board = single_hex();
        let (params, regions) = setup(&board, 30);
        let locator = BoardLocator::new(&params, &regions);
        let center = params.hex_center(HexCoord::new(0, 0));
        let outline = params.hex_polygon(HexOutline::Fill).translated(center);
        for corner in outline.points() {
            let inside = Point::new((center.x + corner.x) / 2, (center.y + corner.y) / 2);
            assert_eq!(locator.locate_hex(&board, inside), Some(HexId(0)));
        }
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn test_stale_regions_panic() {
        let small = LayoutParams::scale(20, 10, None);
        let large = LayoutParams::scale(40, 10, None);
        let regions = RegionIndex::build(&small);
        BoardLocator::new(&large, &regions);
    }
}
