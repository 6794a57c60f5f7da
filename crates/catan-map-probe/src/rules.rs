//! Minimal placement rules for driving the map headlessly.
//!
//! Enough of the game to make highlighting meaningful: pieces go on empty
//! spots, roads and ships extend a player's network, settlements keep their
//! distance, and steals need a victim next to the robber or pirate.

use catan_map::{
    Board, CursorRequest, CursorType, EdgeBuilding, EdgeId, MapElement, NodeBuilding, NodeId,
    PlayerId, Selection,
};
use tracing::info;

/// Build actions single-click building may pick from
pub const BUILD_ACTIONS: [CursorType; 5] = [
    CursorType::BuildRoad,
    CursorType::BuildShip,
    CursorType::BuildBridge,
    CursorType::BuildSettlement,
    CursorType::BuildCity,
];

/// Cursor request for `cursor` validated by [`allows`]
pub fn request(cursor: CursorType, player: PlayerId) -> CursorRequest<()> {
    CursorRequest::new(cursor, player, ())
        .validate(move |board, element, player, _| allows(board, cursor, element, player))
}

/// Whether `player` may pick `element` in mode `cursor`
pub fn allows(board: &Board, cursor: CursorType, element: MapElement, player: PlayerId) -> bool {
    match (cursor, element) {
        (CursorType::BuildRoad, MapElement::Edge(edge)) => {
            is_open_edge(board, edge) && board.edge_touches_land(edge) && extends_network(board, edge, player)
        }
        (CursorType::BuildShip, MapElement::Edge(edge)) => {
            is_open_edge(board, edge) && board.edge_touches_sea(edge) && extends_network(board, edge, player)
        }
        // Bridges span open water between two coasts
        (CursorType::BuildBridge, MapElement::Edge(edge)) => {
            is_open_edge(board, edge)
                && board.edge(edge).hexes.len() == 2
                && !board.edge_touches_land(edge)
                && extends_network(board, edge, player)
        }
        (CursorType::BuildSettlement, MapElement::Node(node)) => can_settle(board, node, player),
        (CursorType::BuildCity, MapElement::Node(node)) => {
            board.node(node).building == NodeBuilding::Settlement(player)
        }
        (CursorType::StealBuilding, MapElement::Node(node)) => {
            let node = board.node(node);
            node.building.owner().is_some_and(|owner| owner != player)
                && board
                    .robber_location()
                    .is_some_and(|robber| node.hexes.contains(&robber))
        }
        (CursorType::StealShip, MapElement::Edge(edge)) => {
            let edge = board.edge(edge);
            matches!(edge.building, EdgeBuilding::Ship(owner) if owner != player)
                && board
                    .pirate_location()
                    .is_some_and(|pirate| edge.hexes.contains(&pirate))
        }
        (CursorType::MoveRobberOrPirate, MapElement::Hex(hex)) => !board.hex(hex).robber,
        _ => false,
    }
}

fn is_open_edge(board: &Board, edge: EdgeId) -> bool {
    board.edge(edge).building == EdgeBuilding::Empty
}

/// A new edge piece must touch one of the player's buildings or pieces
fn extends_network(board: &Board, edge: EdgeId, player: PlayerId) -> bool {
    board.edge(edge).nodes.iter().any(|node| {
        board.node(*node).building.owner() == Some(player)
            || board
                .edges_at(*node)
                .any(|other| other.building.owner() == Some(player))
    })
}

/// Empty land corner, no building next door, and joined to the player's
/// network once they own any building
fn can_settle(board: &Board, node: NodeId, player: PlayerId) -> bool {
    if board.node(node).building != NodeBuilding::Empty || !board.node_touches_land(node) {
        return false;
    }
    if board
        .adjacent_nodes(node)
        .any(|n| board.node(n).building != NodeBuilding::Empty)
    {
        return false;
    }
    let settled = board
        .nodes()
        .any(|n| n.building.owner() == Some(player));
    !settled
        || board
            .edges_at(node)
            .any(|edge| edge.building.owner() == Some(player))
}

/// Apply a committed selection to the board
pub fn apply(board: &mut Board, selection: &Selection<()>) {
    let owner = selection.owner;
    match (selection.cursor, selection.element) {
        (CursorType::BuildRoad, MapElement::Edge(edge)) => {
            board.build_edge(edge, EdgeBuilding::Road(owner))
        }
        (CursorType::BuildShip, MapElement::Edge(edge)) => {
            board.build_edge(edge, EdgeBuilding::Ship(owner))
        }
        (CursorType::BuildBridge, MapElement::Edge(edge)) => {
            board.build_edge(edge, EdgeBuilding::Bridge(owner))
        }
        (CursorType::BuildSettlement, MapElement::Node(node)) => {
            board.build_node(node, NodeBuilding::Settlement(owner))
        }
        (CursorType::BuildCity, MapElement::Node(node)) => {
            board.build_node(node, NodeBuilding::City(owner))
        }
        (CursorType::MoveRobberOrPirate, MapElement::Hex(hex)) => {
            let from = board.move_robber(hex);
            info!(?from, to = ?hex, "robber moved");
        }
        // Steals change hands, not the board
        _ => {}
    }
}
