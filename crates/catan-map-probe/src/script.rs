//! Probe script protocol: one JSON command per input line, one JSON report
//! per output line.

use catan_map::{CursorType, EdgeId, HexId, LayoutParams, MapElement, NodeId, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands read from stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ProbeCommand {
    /// Rescale to a hex radius
    Scale { hex_radius: i32 },

    /// Rescale to fit a viewport
    Fit { width: i32, height: i32 },

    /// Enter a cursor mode for a player
    SetMode { cursor: CursorType, player: PlayerId },

    /// Toggle single-click building for a player
    SingleClick { enabled: bool, player: PlayerId },

    /// Pointer moved
    Move { x: i32, y: i32 },

    /// Pointer pressed
    Click { x: i32, y: i32 },

    /// Abandon the current mode
    Cancel,

    /// Report every element under a pixel
    Locate { x: i32, y: i32 },
}

impl ProbeCommand {
    pub fn parse(line: &str, number: usize) -> Result<Self, ScriptError> {
        serde_json::from_str(line).map_err(|source| ScriptError::Malformed {
            line: number,
            source,
        })
    }
}

/// A highlight hook call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Stroke {
    Draw { element: MapElement, owner: PlayerId },
    Erase { element: MapElement },
}

/// Reports written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ProbeReport {
    /// New layout after a rescale
    Scaled { layout: LayoutParams },

    /// Current cursor mode
    Mode { cursor: CursorType, single_click: bool },

    /// Result of a pointer move
    Highlight {
        cursor: CursorType,
        element: Option<MapElement>,
        strokes: Vec<Stroke>,
    },

    /// Result of a pointer press
    Selected {
        cursor: CursorType,
        selected: Option<MapElement>,
        strokes: Vec<Stroke>,
    },

    /// Whether a mode was active when cancelled
    Cancelled { was_active: bool, strokes: Vec<Stroke> },

    /// Elements under a pixel
    Located {
        hex: Option<HexId>,
        edge: Option<EdgeId>,
        node: Option<NodeId>,
    },

    /// Command rejected
    Error { message: String },
}

/// Errors in a probe script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Line {line}: invalid command: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Hex radius {hex_radius} is too small")]
    RadiusTooSmall { hex_radius: i32 },

    #[error("Viewport {width}x{height} is empty")]
    EmptyViewport { width: i32, height: i32 },
}
