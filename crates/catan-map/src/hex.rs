//! Hex grid coordinates using offset (column, row) positions.
//!
//! This module provides the coordinate types for the board grid:
//! - `HexCoord`: Identifies a cell of the rectangular grid
//! - `EdgeDirection`: The six sides of a hex
//! - `VertexDirection`: The six corners of a hex
//!
//! Hexes are pointy-topped. Odd rows are shifted right by half a hex, which
//! gives the honeycomb tiling the board is drawn with. Directions are numbered
//! counter-clockwise on screen starting from the east side, and corner `i`
//! sits between side `i` and side `i + 1`.

use serde::{Deserialize, Serialize};

/// Direction of an edge relative to a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// East edge (right)
    East,
    /// Northeast edge (top-right)
    NorthEast,
    /// Northwest edge (top-left)
    NorthWest,
    /// West edge (left)
    West,
    /// Southwest edge (bottom-left)
    SouthWest,
    /// Southeast edge (bottom-right)
    SouthEast,
}

impl EdgeDirection {
    /// All edge directions in position order
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::East,
        EdgeDirection::NorthEast,
        EdgeDirection::NorthWest,
        EdgeDirection::West,
        EdgeDirection::SouthWest,
        EdgeDirection::SouthEast,
    ];

    /// Position index 0-5
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a position index (taken modulo 6)
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The same edge seen from the hex on the other side
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// The two corners this edge joins, in position order
    pub const fn endpoints(self) -> [VertexDirection; 2] {
        [
            VertexDirection::from_index(self.index() + 5),
            VertexDirection::from_index(self.index()),
        ]
    }
}

/// Direction of a vertex (corner) relative to a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexDirection {
    /// Upper-right corner
    NorthEast,
    /// Top corner
    North,
    /// Upper-left corner
    NorthWest,
    /// Lower-left corner
    SouthWest,
    /// Bottom corner
    South,
    /// Lower-right corner
    SouthEast,
}

impl VertexDirection {
    /// All vertex directions in position order
    pub const ALL: [VertexDirection; 6] = [
        VertexDirection::NorthEast,
        VertexDirection::North,
        VertexDirection::NorthWest,
        VertexDirection::SouthWest,
        VertexDirection::South,
        VertexDirection::SouthEast,
    ];

    /// Position index 0-5
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a position index (taken modulo 6)
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The two hex sides meeting at this corner
    pub const fn edges(self) -> [EdgeDirection; 2] {
        [
            EdgeDirection::from_index(self.index()),
            EdgeDirection::from_index(self.index() + 1),
        ]
    }

    /// How the neighbours sharing this corner see it.
    ///
    /// Returns `(side, corner)` pairs: the neighbour across `side` knows this
    /// corner as its `corner`.
    pub const fn shared_with(self) -> [(EdgeDirection, VertexDirection); 2] {
        let i = self.index();
        [
            (EdgeDirection::from_index(i), VertexDirection::from_index(i + 2)),
            (EdgeDirection::from_index(i + 1), VertexDirection::from_index(i + 4)),
        ]
    }
}

/// Offset coordinate of a cell in the board grid.
///
/// - `x` is the column within a row
/// - `y` is the row; odd rows are shifted half a hex to the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this cell sits in a shifted (odd) row
    pub const fn is_odd_row(&self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: EdgeDirection) -> HexCoord {
        // Diagonal neighbours of a shifted row lean one column further right
        let shift = i32::from(self.is_odd_row());
        match direction {
            EdgeDirection::East => HexCoord::new(self.x + 1, self.y),
            EdgeDirection::West => HexCoord::new(self.x - 1, self.y),
            EdgeDirection::NorthEast => HexCoord::new(self.x + shift, self.y - 1),
            EdgeDirection::NorthWest => HexCoord::new(self.x + shift - 1, self.y - 1),
            EdgeDirection::SouthWest => HexCoord::new(self.x + shift - 1, self.y + 1),
            EdgeDirection::SouthEast => HexCoord::new(self.x + shift, self.y + 1),
        }
    }

    /// The six neighboring cells in position order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        EdgeDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// Axial `(q, r)` form of this cell, useful for distance math
    pub const fn to_axial(&self) -> (i32, i32) {
        (self.x - (self.y - self.y.rem_euclid(2)) / 2, self.y)
    }

    /// Cell for an axial `(q, r)` coordinate
    pub const fn from_axial(q: i32, r: i32) -> Self {
        Self::new(q + (r - r.rem_euclid(2)) / 2, r)
    }

    /// Distance to another cell (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let (q1, r1) = self.to_axial();
        let (q2, r2) = other.to_axial();
        let dq = (q1 - q2).abs();
        let dr = (r1 - r2).abs();
        let ds = ((q1 + r1) - (q2 + r2)).abs();
        ((dq + dr + ds) / 2) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_are_symmetric() {
        for hex in [HexCoord::new(2, 2), HexCoord::new(2, 3)] {
            for dir in EdgeDirection::ALL {
                let back = hex.neighbor(dir).neighbor(dir.opposite());
                assert_eq!(back, hex, "{:?} from {:?}", dir, hex);
            }
        }
    }

    #[test]
    fn test_shifted_row_neighbors() {
        let even = HexCoord::new(2, 2);
        assert_eq!(even.neighbor(EdgeDirection::NorthEast), HexCoord::new(2, 1));
        assert_eq!(even.neighbor(EdgeDirection::NorthWest), HexCoord::new(1, 1));

        let odd = HexCoord::new(2, 3);
        assert_eq!(odd.neighbor(EdgeDirection::NorthEast), HexCoord::new(3, 2));
        assert_eq!(odd.neighbor(EdgeDirection::SouthWest), HexCoord::new(2, 4));
    }

    #[test]
    fn test_neighbors_are_one_step_away() {
        let center = HexCoord::new(3, 3);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_axial_round_trip() {
        for y in -3..4 {
            for x in -3..4 {
                let hex = HexCoord::new(x, y);
                let (q, r) = hex.to_axial();
                assert_eq!(HexCoord::from_axial(q, r), hex);
            }
        }
    }

    #[test]
    fn test_edge_endpoints_are_adjacent_corners() {
        assert_eq!(
            EdgeDirection::East.endpoints(),
            [VertexDirection::SouthEast, VertexDirection::NorthEast]
        );
        for dir in EdgeDirection::ALL {
            let [a, b] = dir.endpoints();
            assert!(a.edges().contains(&dir));
            assert!(b.edges().contains(&dir));
        }
    }

    #[test]
    fn test_shared_corners_round_trip() {
        // Walking to a neighbour and back through its shared corner lands on
        // the same corner of the original hex.
        for corner in VertexDirection::ALL {
            for (side, theirs) in corner.shared_with() {
                let returned = theirs
                    .shared_with()
                    .into_iter()
                    .find(|(s, _)| *s == side.opposite())
                    .map(|(_, c)| c);
                assert_eq!(returned, Some(corner), "{:?} via {:?}", corner, side);
            }
        }
    }
}
