//! Single-click building.
//!
//! Instead of making the player pick a tool first, the advisor looks at the
//! edge and the node under the pointer and picks the build action that is
//! both enabled this turn and legal there.

use crate::board::{Board, EdgeId, NodeId};
use crate::cursor::{CursorRequest, CursorType};
use crate::locate::{BoardLocator, MapElement};
use crate::polygon::Point;
use tracing::debug;

/// Edge actions, highest priority first
const EDGE_PRIORITY: [CursorType; 3] = [
    CursorType::BuildRoad,
    CursorType::BuildShip,
    CursorType::BuildBridge,
];

/// Node actions, highest priority first
const NODE_PRIORITY: [CursorType; 2] = [CursorType::BuildSettlement, CursorType::BuildCity];

/// Picks the build mode for the element under the pointer.
///
/// When a legal edge action and a legal node action both apply, the feature
/// closer to the pointer wins: the node position against the edge midpoint.
/// Equal distances go to the node.
pub struct SingleClickAdvisor<T> {
    enabled: bool,
    /// Build actions enabled this turn, at most one per cursor type
    actions: Vec<CursorRequest<T>>,
}

impl<T> Default for SingleClickAdvisor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleClickAdvisor<T> {
    pub fn new() -> Self {
        Self {
            enabled: false,
            actions: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Offer a build action; replaces an earlier offer of the same type.
    ///
    /// # Panics
    /// If the request is not a build mode.
    pub fn enable_action(&mut self, request: CursorRequest<T>) {
        assert!(
            request.cursor.is_build(),
            "{:?} is not a build action",
            request.cursor
        );
        self.disable_action(request.cursor);
        self.actions.push(request);
    }

    pub fn disable_action(&mut self, cursor: CursorType) {
        self.actions.retain(|action| action.cursor != cursor);
    }

    /// Withdraw every offer, typically at the end of a turn
    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    pub fn enabled_actions(&self) -> impl Iterator<Item = CursorType> + '_ {
        self.actions.iter().map(|action| action.cursor)
    }

    fn action(&self, cursor: CursorType) -> Option<&CursorRequest<T>> {
        self.actions.iter().find(|action| action.cursor == cursor)
    }

    /// First action in `priority` that is offered and accepts `element`
    fn first_legal(
        &self,
        board: &Board,
        priority: &[CursorType],
        element: MapElement,
    ) -> Option<&CursorRequest<T>> {
        priority
            .iter()
            .filter_map(|cursor| self.action(*cursor))
            .find(|action| action.accepts(board, element))
    }
}

impl<T: Clone> SingleClickAdvisor<T> {
    /// Suggest a build mode for the pointer position.
    ///
    /// The returned request is flagged `single_click`.
    pub fn advise(
        &self,
        board: &Board,
        locator: &BoardLocator<'_>,
        p: Point,
    ) -> Option<CursorRequest<T>> {
        if !self.enabled || self.actions.is_empty() {
            return None;
        }

        let edge = locator.locate_edge(board, p).and_then(|edge| {
            self.first_legal(board, &EDGE_PRIORITY, MapElement::Edge(edge))
                .map(|action| (edge, action))
        });
        let node = locator.locate_node(board, p).and_then(|node| {
            self.first_legal(board, &NODE_PRIORITY, MapElement::Node(node))
                .map(|action| (node, action))
        });

        let chosen = match (edge, node) {
            (Some((edge, edge_action)), Some((node, node_action))) => {
                if closer_to_edge(board, locator, p, edge, node) {
                    edge_action
                } else {
                    node_action
                }
            }
            (Some((_, action)), None) | (None, Some((_, action))) => action,
            (None, None) => return None,
        };
        Some(chosen.clone().single_click(true))
    }
}

/// Whether the edge midpoint is strictly closer to `p` than the node
fn closer_to_edge(
    board: &Board,
    locator: &BoardLocator<'_>,
    p: Point,
    edge: EdgeId,
    node: NodeId,
) -> bool {
    let params = locator.params();
    let (a, b) = params.edge_endpoints(board, edge);
    let at = params.node_position(board, node);

    // Doubled coordinates keep the midpoint integral
    let doubled = Point::new(2 * p.x, 2 * p.y);
    let to_edge = doubled.distance_squared(a + b);
    let to_node = doubled.distance_squared(Point::new(2 * at.x, 2 * at.y));
    debug!(
        ?edge,
        ?node,
        to_edge,
        to_node,
        "single-click edge and node candidates conflict"
    );
    to_edge < to_node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardLayout, EdgeBuilding, HexCell, NodeBuilding, Terrain};
    use crate::hex::{EdgeDirection, HexCoord, VertexDirection};
    use crate::layout::LayoutParams;
    use crate::locate::LocateTarget;
    use crate::region::RegionIndex;
    use pretty_assertions::assert_eq;

    fn two_hexes() -> Board {
        Board::from_layout(&BoardLayout {
            columns: 2,
            rows: 1,
            shrink_left: false,
            shrink_right: false,
            hexes: vec![
                HexCell::new(0, 0, Terrain::Field).with_roll(6),
                HexCell::new(1, 0, Terrain::Sea),
            ],
        })
        .unwrap()
    }

    fn setup(board: &Board) -> (LayoutParams, RegionIndex) {
        let params = LayoutParams::scale(50, 10, Some(board.extent()));
        let regions = RegionIndex::build(&params);
        (params, regions)
    }

    fn accept_all(cursor: CursorType) -> CursorRequest<()> {
        CursorRequest::new(cursor, 1, ())
    }

    /// Edge requests accept only edges, node requests only nodes
    fn typed(cursor: CursorType) -> CursorRequest<()> {
        CursorRequest::new(cursor, 1, ()).validate(move |_, element, _, _| {
            match element {
                MapElement::Edge(_) => cursor.target() == Some(LocateTarget::Edge),
                MapElement::Node(_) => cursor.target() == Some(LocateTarget::Node),
                MapElement::Hex(_) => false,
            }
        })
    }

    #[test]
    fn test_disabled_advisor_suggests_nothing() {
        let board = two_hexes();
        let (params, regions) = setup(&board);
        let locator = BoardLocator::new(&params, &regions);
        let mut advisor = SingleClickAdvisor::new();
        advisor.enable_action(accept_all(CursorType::BuildRoad));

        let p = params.hex_center(HexCoord::new(0, 0)) + params.edge_anchor(EdgeDirection::West);
        assert!(advisor.advise(&board, &locator, p).is_none());

        advisor.set_enabled(true);
        assert!(advisor.advise(&board, &locator, p).is_some());
    }

    #[test]
    fn test_edge_priority_order() {
        let board = two_hexes();
        let (params, regions) = setup(&board);
        let locator = BoardLocator::new(&params, &regions);
        let mut advisor = SingleClickAdvisor::new();
        advisor.set_enabled(true);
        advisor.enable_action(typed(CursorType::BuildBridge));
        advisor.enable_action(typed(CursorType::BuildShip));

        // Shared side between land and sea
        let p = params.hex_center(HexCoord::new(0, 0)) + params.edge_anchor(EdgeDirection::East);
        let advice = advisor.advise(&board, &locator, p).unwrap();
        assert_eq!(advice.cursor, CursorType::BuildShip);
        assert!(advice.single_click);

        advisor.enable_action(typed(CursorType::BuildRoad));
        assert_eq!(
            advisor.advise(&board, &locator, p).map(|r| r.cursor),
            Some(CursorType::BuildRoad)
        );

        advisor.disable_action(CursorType::BuildRoad);
        advisor.disable_action(CursorType::BuildShip);
        assert_eq!(
            advisor.advise(&board, &locator, p).map(|r| r.cursor),
            Some(CursorType::BuildBridge)
        );
    }

    #[test]
    fn test_validation_skips_illegal_actions() {
        let mut board = two_hexes();
        let (params, regions) = setup(&board);
        let corner = board.hex_at(HexCoord::new(0, 0)).unwrap().node(VertexDirection::South);
        board.build_node(corner, NodeBuilding::Settlement(1));

        let mut advisor = SingleClickAdvisor::new();
        advisor.set_enabled(true);
        advisor.enable_action(CursorRequest::new(CursorType::BuildSettlement, 1, ()).validate(
            |board, element, _, _| {
                element
                    .as_node()
                    .is_some_and(|node| board.node(node).building == NodeBuilding::Empty)
            },
        ));
        advisor.enable_action(CursorRequest::new(CursorType::BuildCity, 1, ()).validate(
            |board, element, owner, _| {
                element.as_node().is_some_and(|node| {
                    board.node(node).building == NodeBuilding::Settlement(owner)
                })
            },
        ));

        let locator = BoardLocator::new(&params, &regions);
        let south = params.node_position(&board, corner);
        assert_eq!(
            advisor.advise(&board, &locator, south).map(|r| r.cursor),
            Some(CursorType::BuildCity)
        );
        let north = params.hex_center(HexCoord::new(0, 0))
            + params.vertex_offset(VertexDirection::North);
        assert_eq!(
            advisor.advise(&board, &locator, north).map(|r| r.cursor),
            Some(CursorType::BuildSettlement)
        );
    }

    #[test]
    fn test_conflict_goes_to_nearest_feature() {
        let board = two_hexes();
        let (params, regions) = setup(&board);
        let locator = BoardLocator::new(&params, &regions);
        let mut advisor = SingleClickAdvisor::new();
        advisor.set_enabled(true);
        advisor.enable_action(typed(CursorType::BuildRoad));
        advisor.enable_action(typed(CursorType::BuildSettlement));

        // Both points lie in the west edge region and the north-west node region
        let side = params.hex_center(HexCoord::new(0, 0)) + params.edge_anchor(EdgeDirection::West);
        let near_edge = side + Point::new(0, -10);
        let near_node = side + Point::new(0, -20);
        assert!(locator.locate_edge(&board, near_node).is_some());
        assert!(locator.locate_node(&board, near_edge).is_some());

        assert_eq!(
            advisor.advise(&board, &locator, near_edge).map(|r| r.cursor),
            Some(CursorType::BuildRoad)
        );
        assert_eq!(
            advisor.advise(&board, &locator, near_node).map(|r| r.cursor),
            Some(CursorType::BuildSettlement)
        );
        // A corner lies on the rim of the edge regions around it
        let corner = params.hex_center(HexCoord::new(0, 0))
            + params.vertex_offset(VertexDirection::NorthWest);
        assert_eq!(
            advisor.advise(&board, &locator, corner).map(|r| r.cursor),
            Some(CursorType::BuildSettlement)
        );
    }

    #[test]
    fn test_occupied_edge_falls_back_to_node() {
        let mut board = two_hexes();
        let (params, regions) = setup(&board);
        let hex = board.hex_at(HexCoord::new(0, 0)).unwrap();
        let west = hex.edge(EdgeDirection::West);
        board.build_edge(west, EdgeBuilding::Road(2));

        let mut advisor = SingleClickAdvisor::new();
        advisor.set_enabled(true);
        advisor.enable_action(CursorRequest::new(CursorType::BuildRoad, 1, ()).validate(
            |board, element, _, _| {
                element
                    .as_edge()
                    .is_some_and(|edge| board.edge(edge).building == EdgeBuilding::Empty)
            },
        ));
        advisor.enable_action(typed(CursorType::BuildSettlement));

        let locator = BoardLocator::new(&params, &regions);
        let p = params.hex_center(HexCoord::new(0, 0))
            + params.edge_anchor(EdgeDirection::West)
            + Point::new(0, -10);
        assert_eq!(
            advisor.advise(&board, &locator, p).map(|r| r.cursor),
            Some(CursorType::BuildSettlement)
        );
    }

    #[test]
    fn test_enable_action_replaces_same_type() {
        let mut advisor: SingleClickAdvisor<()> = SingleClickAdvisor::new();
        advisor.enable_action(accept_all(CursorType::BuildRoad));
        advisor.enable_action(accept_all(CursorType::BuildRoad));
        advisor.enable_action(accept_all(CursorType::BuildCity));
        assert_eq!(
            advisor.enabled_actions().collect::<Vec<_>>(),
            vec![CursorType::BuildRoad, CursorType::BuildCity]
        );
        advisor.clear_actions();
        assert_eq!(advisor.enabled_actions().count(), 0);
    }

    #[test]
    #[should_panic(expected = "not a build action")]
    fn test_enable_action_rejects_non_build_modes() {
        let mut advisor: SingleClickAdvisor<()> = SingleClickAdvisor::new();
        advisor.enable_action(accept_all(CursorType::MoveRobberOrPirate));
    }
}
