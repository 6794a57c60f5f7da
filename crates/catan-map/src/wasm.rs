//! WebAssembly bindings for the map engine.
//!
//! Exposes layout and hit testing to a browser renderer. Structured results
//! cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::board::{Board, BoardLayout, EdgeId, NodeId};
use crate::config::MapConfig;
use crate::hex::HexCoord;
use crate::layout::{HexOutline, MIN_HEX_RADIUS};
use crate::locate::LocateTarget;
use crate::map::GuiMap;
use crate::polygon::{Point, Polygon};
use crate::shapes::Shape;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// A board and the map view drawing it
#[wasm_bindgen]
pub struct WasmBoardView {
    board: Board,
    map: GuiMap,
}

#[wasm_bindgen]
impl WasmBoardView {
    /// Build a view from a board layout and map config, both JSON
    #[wasm_bindgen(constructor)]
    pub fn new(layout_json: &str, config_json: &str) -> Result<WasmBoardView, JsValue> {
        let layout: BoardLayout = serde_json::from_str(layout_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid board layout: {}", e)))?;
        let config = MapConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid map config: {}", e)))?;
        let board = Board::from_layout(&layout).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let map = GuiMap::with_board(config, &board);
        Ok(WasmBoardView { board, map })
    }

    /// A seeded standard board with the default config
    #[wasm_bindgen(js_name = standard)]
    pub fn standard(seed: u32) -> Result<WasmBoardView, JsValue> {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let board = Board::from_layout(&BoardLayout::standard_with_rng(&mut rng))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let map = GuiMap::with_board(MapConfig::default(), &board);
        Ok(WasmBoardView { board, map })
    }

    /// Get the board as JSON
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.board).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the layout parameters as JSON
    #[wasm_bindgen(js_name = getLayout)]
    pub fn get_layout(&self) -> String {
        serde_json::to_string(self.map.layout()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Rescale, returns the new layout as JSON
    pub fn scale(&mut self, hex_radius: i32) -> Result<String, JsValue> {
        if hex_radius <= MIN_HEX_RADIUS {
            return Err(JsValue::from_str(&format!(
                "Hex radius must exceed {}",
                MIN_HEX_RADIUS
            )));
        }
        Ok(serde_json::to_string(self.map.scale(hex_radius)).unwrap_or_else(|_| "{}".to_string()))
    }

    /// Rescale to fit the canvas, returns the new layout as JSON
    #[wasm_bindgen(js_name = scaleToFit)]
    pub fn scale_to_fit(&mut self, width: i32, height: i32) -> String {
        serde_json::to_string(self.map.scale_to_fit(width, height))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Grow chits to fit the measured label size
    #[wasm_bindgen(js_name = fitChitText)]
    pub fn fit_chit_text(&mut self, text_width: i32, text_height: i32) -> i32 {
        let params = self.map.layout_mut();
        params.fit_chit_text(text_width, text_height);
        params.chit_radius
    }

    /// Element under a pixel as JSON, `null` when there is none.
    ///
    /// `target` is one of `"Hex"`, `"Edge"` or `"Node"`.
    pub fn locate(&self, target: &str, x: i32, y: i32) -> Result<String, JsValue> {
        let target: LocateTarget = serde_json::from_value(serde_json::Value::from(target))
            .map_err(|e| JsValue::from_str(&format!("Invalid target: {}", e)))?;
        let element = self.map.locate(&self.board, target, Point::new(x, y));
        Ok(serde_json::to_string(&element).unwrap_or_else(|_| "null".to_string()))
    }

    /// Hex outline around the origin as flat `[x0, y0, x1, y1, ...]`
    #[wasm_bindgen(js_name = hexPolygon)]
    pub fn hex_polygon(&self, stroke: bool) -> Vec<i32> {
        let outline = if stroke {
            HexOutline::Stroke
        } else {
            HexOutline::Fill
        };
        flatten(&self.map.layout().hex_polygon(outline))
    }

    /// Pixel center of the hex at grid position (x, y)
    #[wasm_bindgen(js_name = hexCenter)]
    pub fn hex_center(&self, x: i32, y: i32) -> Vec<i32> {
        let center = self.map.layout().hex_center(HexCoord::new(x, y));
        vec![center.x, center.y]
    }

    /// Outline of a road, ship or bridge on an edge
    #[wasm_bindgen(js_name = edgePiece)]
    pub fn edge_piece(&self, edge: usize, shape: &str) -> Result<Vec<i32>, JsValue> {
        let template = parse_shape(shape)?.template();
        let edge = EdgeId(edge);
        if edge.0 >= self.board.edges().count() {
            return Err(JsValue::from_str("Unknown edge"));
        }
        Ok(flatten(&self.map.layout().edge_polygon(&self.board, edge, &template)))
    }

    /// Outline of a settlement or city on a node
    #[wasm_bindgen(js_name = nodePiece)]
    pub fn node_piece(&self, node: usize, shape: &str) -> Result<Vec<i32>, JsValue> {
        let template = parse_shape(shape)?.template();
        let node = NodeId(node);
        if node.0 >= self.board.nodes().count() {
            return Err(JsValue::from_str("Unknown node"));
        }
        Ok(flatten(&self.map.layout().node_polygon(&self.board, node, &template)))
    }
}

fn parse_shape(shape: &str) -> Result<Shape, JsValue> {
    serde_json::from_value(serde_json::Value::from(shape))
        .map_err(|e| JsValue::from_str(&format!("Invalid shape: {}", e)))
}

fn flatten(polygon: &Polygon) -> Vec<i32> {
    polygon.points().iter().flat_map(|p| [p.x, p.y]).collect()
}
