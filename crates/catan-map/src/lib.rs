//! Kopiatan map - board geometry and interaction for the game client
//!
//! This crate turns a game board into pixels and pixels back into board
//! elements:
//! - Offset hex grid coordinates and the board's shared edges and nodes
//! - Layout math from a hex radius to pixel positions and piece outlines
//! - Per-scale hit-test regions and the locator built on them
//! - The build cursor and single-click building
//!
//! # Architecture
//!
//! Nothing here draws. Renderers take [`Polygon`]s from [`LayoutParams`] and
//! receive highlight changes through the [`Highlighter`] trait. Game rules are
//! plugged in as validation closures on each [`CursorRequest`].
//!
//! # Modules
//!
//! - [`hex`]: Grid coordinates and side/corner directions
//! - [`board`]: Hexes, edges, nodes and buildings
//! - [`polygon`]: Integer points and polygons with hit testing
//! - [`shapes`]: Canonical piece templates
//! - [`layout`]: Hex radius to pixel geometry
//! - [`region`]: Hit-test regions around one hex
//! - [`locate`]: Pixel to board element lookup
//! - [`cursor`]: Build and selection cursor
//! - [`advisor`]: Single-click build mode inference
//! - [`map`]: The view state tying it together

pub mod advisor;
pub mod board;
pub mod config;
pub mod cursor;
pub mod hex;
pub mod layout;
pub mod locate;
pub mod map;
pub mod polygon;
pub mod region;
pub mod shapes;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use advisor::SingleClickAdvisor;
pub use board::{
    Board, BoardError, BoardLayout, Edge, EdgeBuilding, EdgeId, GridExtent, Hex, HexCell, HexId,
    Node, NodeBuilding, NodeId, PlayerId, Terrain,
};
pub use config::MapConfig;
pub use cursor::{
    CursorRequest, CursorStateMachine, CursorType, Highlighter, NoHighlight, Selection,
};
pub use hex::{EdgeDirection, HexCoord, VertexDirection};
pub use layout::{HexOutline, LayoutParams};
pub use locate::{BoardLocator, LocateTarget, MapElement};
pub use map::GuiMap;
pub use polygon::{Point, Polygon, Rect};
pub use region::RegionIndex;
pub use shapes::Shape;
