//! A board, its map view and the strokes the map asked to draw.

use crate::rules;
use crate::script::{ProbeCommand, ProbeReport, ScriptError, Stroke};
use catan_map::layout::MIN_HEX_RADIUS;
use catan_map::{Board, CursorType, GuiMap, Highlighter, MapConfig, MapElement, Point, PlayerId};
use tracing::{debug, info};

/// Collects highlight hook calls until the next report drains them
#[derive(Debug, Default)]
struct StrokeLog {
    strokes: Vec<Stroke>,
}

impl Highlighter for StrokeLog {
    fn draw_highlight(&mut self, _: CursorType, element: MapElement, owner: PlayerId) {
        self.strokes.push(Stroke::Draw { element, owner });
    }

    fn erase_highlight(&mut self, _: CursorType, element: MapElement) {
        self.strokes.push(Stroke::Erase { element });
    }
}

impl StrokeLog {
    fn drain(&mut self) -> Vec<Stroke> {
        std::mem::take(&mut self.strokes)
    }
}

pub struct Session {
    board: Board,
    map: GuiMap,
    log: StrokeLog,
}

impl Session {
    pub fn new(board: Board, config: MapConfig) -> Self {
        let map = GuiMap::with_board(config, &board);
        Self {
            board,
            map,
            log: StrokeLog::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn map(&self) -> &GuiMap {
        &self.map
    }

    /// Execute one command
    pub fn run(&mut self, command: ProbeCommand) -> Result<ProbeReport, ScriptError> {
        debug!(?command, "running probe command");
        let report = match command {
            ProbeCommand::Scale { hex_radius } => {
                if hex_radius <= MIN_HEX_RADIUS {
                    return Err(ScriptError::RadiusTooSmall { hex_radius });
                }
                ProbeReport::Scaled {
                    layout: *self.map.scale(hex_radius),
                }
            }
            ProbeCommand::Fit { width, height } => {
                if width <= 0 || height <= 0 {
                    return Err(ScriptError::EmptyViewport { width, height });
                }
                ProbeReport::Scaled {
                    layout: *self.map.scale_to_fit(width, height),
                }
            }
            ProbeCommand::SetMode { cursor, player } => {
                self.map.set_cursor(rules::request(cursor, player), &mut self.log);
                self.mode_report()
            }
            ProbeCommand::SingleClick { enabled, player } => {
                self.map.set_single_click(enabled);
                let advisor = self.map.advisor_mut();
                advisor.clear_actions();
                if enabled {
                    for cursor in rules::BUILD_ACTIONS {
                        advisor.enable_action(rules::request(cursor, player));
                    }
                }
                self.mode_report()
            }
            ProbeCommand::Move { x, y } => {
                let element = self.map.pointer_move(&self.board, Point::new(x, y), &mut self.log);
                ProbeReport::Highlight {
                    cursor: self.map.mode(),
                    element,
                    strokes: self.log.drain(),
                }
            }
            ProbeCommand::Click { x, y } => {
                let selection = self.map.pointer_commit(&self.board, Point::new(x, y), &mut self.log);
                if let Some(selection) = &selection {
                    info!(
                        cursor = ?selection.cursor,
                        element = ?selection.element,
                        owner = selection.owner,
                        "selection committed"
                    );
                    rules::apply(&mut self.board, selection);
                    self.map.revalidate(&self.board, &mut self.log);
                }
                ProbeReport::Selected {
                    cursor: self.map.mode(),
                    selected: selection.map(|selection| selection.element),
                    strokes: self.log.drain(),
                }
            }
            ProbeCommand::Cancel => {
                let was_active = self.map.cancel(&mut self.log);
                ProbeReport::Cancelled {
                    was_active,
                    strokes: self.log.drain(),
                }
            }
            ProbeCommand::Locate { x, y } => {
                let p = Point::new(x, y);
                ProbeReport::Located {
                    hex: self.map.locate_hex(&self.board, p),
                    edge: self.map.locate_edge(&self.board, p),
                    node: self.map.locate_node(&self.board, p),
                }
            }
        };
        Ok(report)
    }

    fn mode_report(&self) -> ProbeReport {
        ProbeReport::Mode {
            cursor: self.map.mode(),
            single_click: self.map.cursor().is_single_click(),
        }
    }
}
