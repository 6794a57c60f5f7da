//! Board representation: hexes, the edges and nodes they share, and what is
//! built on them.
//!
//! This module contains:
//! - Terrain types and the hex grid
//! - Edge and node arenas shared between neighbouring hexes
//! - Building types (roads, ships, bridges, settlements, cities)
//! - `BoardLayout`, the serializable description a board is built from
//!
//! The map engine only reads the board while hit testing. The game-rules
//! layer mutates buildings and the robber between pointer events.

use crate::hex::{EdgeDirection, HexCoord, VertexDirection};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Player identifier
pub type PlayerId = u8;

/// Terrain of a hex tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Produces brick
    Hill,
    /// Produces grain
    Field,
    /// Produces ore
    Mountain,
    /// Produces wool
    Pasture,
    /// Produces lumber
    Forest,
    /// No production
    Desert,
    /// Produces a resource of the player's choice
    Gold,
    /// Water; carries ships and the pirate
    Sea,
}

impl Terrain {
    pub fn is_sea(&self) -> bool {
        matches!(self, Terrain::Sea)
    }
}

/// Index of a hex in the board's hex arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexId(pub usize);

/// Index of an edge in the board's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

/// Index of a node in the board's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// What's built on an edge (side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    Road(PlayerId),
    Ship(PlayerId),
    Bridge(PlayerId),
}

impl EdgeBuilding {
    /// Get the owner of this piece, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) | EdgeBuilding::Ship(p) | EdgeBuilding::Bridge(p) => Some(*p),
        }
    }
}

/// What's built on a node (corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeBuilding {
    /// Nothing built
    #[default]
    Empty,
    Settlement(PlayerId),
    City(PlayerId),
}

impl NodeBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            NodeBuilding::Empty => None,
            NodeBuilding::Settlement(p) | NodeBuilding::City(p) => Some(*p),
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, Serialize)]
pub struct Hex {
    pub id: HexId,
    /// Position on the grid
    pub coord: HexCoord,
    pub terrain: Terrain,
    /// Dice number that triggers production
    pub roll: Option<u8>,
    /// Whether the robber (on land) or pirate (at sea) is here
    pub robber: bool,
    edges: [EdgeId; 6],
    nodes: [NodeId; 6],
}

impl Hex {
    /// The edge on the given side of this hex
    pub fn edge(&self, direction: EdgeDirection) -> EdgeId {
        self.edges[direction.index()]
    }

    /// The node on the given corner of this hex
    pub fn node(&self, direction: VertexDirection) -> NodeId {
        self.nodes[direction.index()]
    }

    pub fn edges(&self) -> &[EdgeId; 6] {
        &self.edges
    }

    pub fn nodes(&self) -> &[NodeId; 6] {
        &self.nodes
    }

    /// Whether the pirate sits on this hex
    pub fn has_pirate(&self) -> bool {
        self.robber && self.terrain.is_sea()
    }
}

/// A boundary segment between hexes
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    /// Side of the primary hex (`hexes[0]`) this edge lies on
    pub pos: EdgeDirection,
    /// The 1-2 hexes bordering this edge, primary hex first
    pub hexes: Vec<HexId>,
    /// Corner nodes at either end
    pub nodes: [NodeId; 2],
    pub building: EdgeBuilding,
}

impl Edge {
    /// The hex this edge's position is relative to
    pub fn primary_hex(&self) -> HexId {
        self.hexes[0]
    }
}

/// A board vertex where up to three hexes meet
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Corner of the primary hex (`hexes[0]`) this node lies on
    pub pos: VertexDirection,
    /// The 1-3 hexes touching this node, primary hex first
    pub hexes: Vec<HexId>,
    pub building: NodeBuilding,
}

impl Node {
    /// The hex this node's position is relative to
    pub fn primary_hex(&self) -> HexId {
        self.hexes[0]
    }
}

/// Size of the board grid and whether its outer columns are drawn truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridExtent {
    pub columns: u32,
    pub rows: u32,
    /// The leftmost column is cut in half on screen
    pub shrink_left: bool,
    /// The rightmost column is cut in half on screen
    pub shrink_right: bool,
}

/// Errors that can occur when building a board from a layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board grid must have at least one column and one row")]
    EmptyGrid,

    #[error("Board layout has no hexes")]
    NoHexes,

    #[error("Hex ({x}, {y}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        columns: u32,
        rows: u32,
    },

    #[error("Hex ({x}, {y}) is listed more than once")]
    DuplicateHex { x: i32, y: i32 },

    #[error("Hex ({x}, {y}) has invalid roll number {roll}")]
    InvalidRoll { x: i32, y: i32, roll: u8 },
}

/// One cell of a board description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexCell {
    pub x: i32,
    pub y: i32,
    pub terrain: Terrain,
    #[serde(default)]
    pub roll: Option<u8>,
    #[serde(default)]
    pub robber: bool,
}

impl HexCell {
    pub fn new(x: i32, y: i32, terrain: Terrain) -> Self {
        Self {
            x,
            y,
            terrain,
            roll: None,
            robber: false,
        }
    }

    pub fn with_roll(mut self, roll: u8) -> Self {
        self.roll = Some(roll);
        self
    }
}

/// Serializable description of a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub columns: u32,
    pub rows: u32,
    #[serde(default)]
    pub shrink_left: bool,
    #[serde(default)]
    pub shrink_right: bool,
    pub hexes: Vec<HexCell>,
}

impl BoardLayout {
    /// The classic map with randomized terrain and numbers
    pub fn standard() -> Self {
        let mut rng = rand::thread_rng();
        Self::standard_with_rng(&mut rng)
    }

    /// The classic map with a provided RNG.
    ///
    /// 19 land hexes in rows of 3, 4, 5, 4 and 3 sit inside a ring of sea hexes
    /// on a 7x7 grid. The desert carries the robber.
    pub fn standard_with_rng<R: Rng>(rng: &mut R) -> Self {
        const CENTER: HexCoord = HexCoord::new(3, 3);
        const LAND_RADIUS: u32 = 2;

        let mut land_coords = Vec::new();
        let mut sea_coords = Vec::new();
        for coord in hexagon(CENTER, LAND_RADIUS + 1) {
            if coord.distance_to(&CENTER) <= LAND_RADIUS {
                land_coords.push(coord);
            } else {
                sea_coords.push(coord);
            }
        }

        // 4 Forest, 4 Field, 4 Pasture, 3 Mountain, 3 Hill, 1 Desert
        let mut terrains = Vec::with_capacity(land_coords.len());
        for (terrain, count) in [
            (Terrain::Forest, 4),
            (Terrain::Field, 4),
            (Terrain::Pasture, 4),
            (Terrain::Mountain, 3),
            (Terrain::Hill, 3),
            (Terrain::Desert, 1),
        ] {
            terrains.extend(std::iter::repeat(terrain).take(count));
        }
        terrains.shuffle(rng);

        let producing: Vec<HexCoord> = land_coords
            .iter()
            .zip(&terrains)
            .filter(|(_, terrain)| **terrain != Terrain::Desert)
            .map(|(coord, _)| *coord)
            .collect();
        let numbers = assign_numbers_avoiding_adjacent_68(&producing, rng);
        let rolls: HashMap<HexCoord, u8> = producing.into_iter().zip(numbers).collect();

        let mut hexes: Vec<HexCell> = land_coords
            .iter()
            .zip(&terrains)
            .map(|(coord, terrain)| HexCell {
                x: coord.x,
                y: coord.y,
                terrain: *terrain,
                roll: rolls.get(coord).copied(),
                robber: *terrain == Terrain::Desert,
            })
            .collect();
        hexes.extend(
            sea_coords
                .into_iter()
                .map(|coord| HexCell::new(coord.x, coord.y, Terrain::Sea)),
        );

        Self {
            columns: 7,
            rows: 7,
            shrink_left: false,
            shrink_right: false,
            hexes,
        }
    }
}

/// Cells within `radius` steps of `center`, in row-major order
fn hexagon(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    let r = radius as i32;
    let mut cells = Vec::new();
    for y in center.y - r..=center.y + r {
        for x in center.x - r..=center.x + r {
            let coord = HexCoord::new(x, y);
            if coord.distance_to(&center) <= radius {
                cells.push(coord);
            }
        }
    }
    cells
}

/// Standard dice number distribution, shuffled until no 6 or 8 touch
fn assign_numbers_avoiding_adjacent_68<R: Rng>(coords: &[HexCoord], rng: &mut R) -> Vec<u8> {
    const MAX_ATTEMPTS: usize = 100;
    let mut numbers: Vec<u8> = vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

    for _ in 0..MAX_ATTEMPTS {
        numbers.shuffle(rng);
        if is_valid_number_placement(coords, &numbers) {
            return numbers;
        }
    }

    // Rare: settle for the last shuffle
    numbers
}

fn is_valid_number_placement(coords: &[HexCoord], numbers: &[u8]) -> bool {
    let hot = |n: u8| n == 6 || n == 8;
    let coord_to_number: HashMap<HexCoord, u8> =
        coords.iter().copied().zip(numbers.iter().copied()).collect();

    coord_to_number.iter().all(|(coord, &number)| {
        !hot(number)
            || coord
                .neighbors()
                .iter()
                .filter_map(|n| coord_to_number.get(n))
                .all(|&n| !hot(n))
    })
}

/// The complete game board
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    extent: GridExtent,
    /// Row-major grid of hex ids
    cells: Vec<Option<HexId>>,
    /// Hexes in row-major order
    hexes: Vec<Hex>,
    edges: Vec<Edge>,
    nodes: Vec<Node>,
}

impl Board {
    /// Build a board, linking the edges and nodes neighbouring hexes share.
    ///
    /// Hexes are enumerated row by row. A shared edge or node is created by
    /// the first hex that reaches it, and its `pos` is relative to that hex.
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, BoardError> {
        if layout.columns == 0 || layout.rows == 0 {
            return Err(BoardError::EmptyGrid);
        }
        if layout.hexes.is_empty() {
            return Err(BoardError::NoHexes);
        }

        let extent = GridExtent {
            columns: layout.columns,
            rows: layout.rows,
            shrink_left: layout.shrink_left,
            shrink_right: layout.shrink_right,
        };

        let mut grid: Vec<Option<&HexCell>> = vec![None; (extent.columns * extent.rows) as usize];
        for cell in &layout.hexes {
            let index = cell_index(&extent, HexCoord::new(cell.x, cell.y)).ok_or(
                BoardError::OutOfBounds {
                    x: cell.x,
                    y: cell.y,
                    columns: extent.columns,
                    rows: extent.rows,
                },
            )?;
            if grid[index].is_some() {
                return Err(BoardError::DuplicateHex {
                    x: cell.x,
                    y: cell.y,
                });
            }
            if let Some(roll) = cell.roll {
                if !(2..=12).contains(&roll) || roll == 7 {
                    return Err(BoardError::InvalidRoll {
                        x: cell.x,
                        y: cell.y,
                        roll,
                    });
                }
            }
            grid[index] = Some(cell);
        }

        let mut board = Self {
            extent,
            cells: vec![None; grid.len()],
            hexes: Vec::with_capacity(layout.hexes.len()),
            edges: Vec::new(),
            nodes: Vec::new(),
        };

        for (index, cell) in grid.iter().enumerate() {
            if let Some(cell) = cell {
                board.link_hex(index, cell);
            }
        }

        Ok(board)
    }

    /// Add one hex, reusing edges and nodes already created by earlier
    /// neighbours.
    fn link_hex(&mut self, index: usize, cell: &HexCell) {
        let id = HexId(self.hexes.len());
        let coord = HexCoord::new(cell.x, cell.y);

        let nodes = VertexDirection::ALL.map(|corner| {
            let existing = corner.shared_with().into_iter().find_map(|(side, theirs)| {
                self.hex_at(coord.neighbor(side))
                    .map(|neighbour| neighbour.node(theirs))
            });
            match existing {
                Some(node) => {
                    self.nodes[node.0].hexes.push(id);
                    node
                }
                None => {
                    let node = NodeId(self.nodes.len());
                    self.nodes.push(Node {
                        id: node,
                        pos: corner,
                        hexes: vec![id],
                        building: NodeBuilding::Empty,
                    });
                    node
                }
            }
        });

        let edges = EdgeDirection::ALL.map(|side| {
            let existing = self
                .hex_at(coord.neighbor(side))
                .map(|neighbour| neighbour.edge(side.opposite()));
            match existing {
                Some(edge) => {
                    self.edges[edge.0].hexes.push(id);
                    edge
                }
                None => {
                    let [a, b] = side.endpoints();
                    let edge = EdgeId(self.edges.len());
                    self.edges.push(Edge {
                        id: edge,
                        pos: side,
                        hexes: vec![id],
                        nodes: [nodes[a.index()], nodes[b.index()]],
                        building: EdgeBuilding::Empty,
                    });
                    edge
                }
            }
        });

        self.hexes.push(Hex {
            id,
            coord,
            terrain: cell.terrain,
            roll: cell.roll,
            robber: cell.robber,
            edges,
            nodes,
        });
        self.cells[index] = Some(id);
    }

    pub fn extent(&self) -> GridExtent {
        self.extent
    }

    pub fn hex(&self, id: HexId) -> &Hex {
        &self.hexes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The hex at a grid position, if that cell is populated
    pub fn hex_at(&self, coord: HexCoord) -> Option<&Hex> {
        let index = cell_index(&self.extent, coord)?;
        self.cells[index].map(|id| &self.hexes[id.0])
    }

    /// All hexes in row-major order
    pub fn hexes(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Whether any hex touching the edge is sea
    pub fn edge_touches_sea(&self, id: EdgeId) -> bool {
        self.edge(id).hexes.len() < 2
            || self
                .edge(id)
                .hexes
                .iter()
                .any(|hex| self.hex(*hex).terrain.is_sea())
    }

    /// Whether any hex touching the edge is land
    pub fn edge_touches_land(&self, id: EdgeId) -> bool {
        self.edge(id)
            .hexes
            .iter()
            .any(|hex| !self.hex(*hex).terrain.is_sea())
    }

    /// Whether any hex touching the node is land
    pub fn node_touches_land(&self, id: NodeId) -> bool {
        self.node(id)
            .hexes
            .iter()
            .any(|hex| !self.hex(*hex).terrain.is_sea())
    }

    /// Hexes whose chit shows `roll`
    pub fn hexes_with_roll(&self, roll: u8) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().filter(move |hex| hex.roll == Some(roll))
    }

    /// Edges meeting at a node
    pub fn edges_at(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(move |edge| edge.nodes.contains(&node))
    }

    /// Nodes one edge away from `node`
    pub fn adjacent_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges_at(node).map(move |edge| {
            if edge.nodes[0] == node {
                edge.nodes[1]
            } else {
                edge.nodes[0]
            }
        })
    }

    /// Place (or remove) a piece on an edge
    pub fn build_edge(&mut self, id: EdgeId, building: EdgeBuilding) {
        self.edges[id.0].building = building;
    }

    /// Place (or remove) a building on a node
    pub fn build_node(&mut self, id: NodeId, building: NodeBuilding) {
        self.nodes[id.0].building = building;
    }

    /// Move the robber onto a land hex, or the pirate onto a sea hex.
    ///
    /// Returns where it was before.
    pub fn move_robber(&mut self, to: HexId) -> Option<HexId> {
        let at_sea = self.hex(to).terrain.is_sea();
        let mut previous = None;
        for hex in &mut self.hexes {
            if hex.terrain.is_sea() == at_sea && hex.robber {
                hex.robber = false;
                previous = Some(hex.id);
            }
        }
        self.hexes[to.0].robber = true;
        previous
    }

    /// Current robber location on land
    pub fn robber_location(&self) -> Option<HexId> {
        self.hexes
            .iter()
            .find(|hex| hex.robber && !hex.terrain.is_sea())
            .map(|hex| hex.id)
    }

    /// Current pirate location at sea
    pub fn pirate_location(&self) -> Option<HexId> {
        self.hexes.iter().find(|hex| hex.has_pirate()).map(|hex| hex.id)
    }
}

fn cell_index(extent: &GridExtent, coord: HexCoord) -> Option<usize> {
    let in_grid = coord.x >= 0
        && coord.y >= 0
        && (coord.x as u32) < extent.columns
        && (coord.y as u32) < extent.rows;
    in_grid.then(|| coord.y as usize * extent.columns as usize + coord.x as usize)
}
