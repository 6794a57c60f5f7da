//! The map view state: layout, hit-test regions and cursor in one place.
//!
//! A [`GuiMap`] is created once per game session and rescaled whenever the
//! viewport changes. It never owns the [`Board`]; every call that needs the
//! board borrows it, and the board must match the grid the map was attached
//! to.

use crate::advisor::SingleClickAdvisor;
use crate::board::{Board, EdgeId, GridExtent, HexId, NodeId};
use crate::config::MapConfig;
use crate::cursor::{CursorRequest, CursorStateMachine, CursorType, Highlighter, Selection};
use crate::layout::LayoutParams;
use crate::locate::{BoardLocator, LocateTarget, MapElement};
use crate::polygon::Point;
use crate::region::RegionIndex;
use std::cell::OnceCell;
use tracing::debug;

/// Interactive state of one board view
pub struct GuiMap<T = ()> {
    config: MapConfig,
    extent: Option<GridExtent>,
    layout: Option<LayoutParams>,
    /// Built on the first hit test after a rescale
    regions: OnceCell<RegionIndex>,
    cursor: CursorStateMachine<T>,
    advisor: SingleClickAdvisor<T>,
    /// Roll number whose chits are drawn highlighted
    highlight_chit: Option<u8>,
}

impl<T> GuiMap<T> {
    /// A map with no board attached and no scale yet
    pub fn new(config: MapConfig) -> Self {
        let mut advisor = SingleClickAdvisor::new();
        advisor.set_enabled(config.single_click_build);
        Self {
            config,
            extent: None,
            layout: None,
            regions: OnceCell::new(),
            cursor: CursorStateMachine::new(),
            advisor,
            highlight_chit: None,
        }
    }

    /// Attach `board` and scale to the configured hex radius
    pub fn with_board(config: MapConfig, board: &Board) -> Self {
        let hex_radius = config.hex_radius;
        let mut map = Self::new(config);
        map.attach(board);
        map.scale(hex_radius);
        map
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Attach the board grid the map draws.
    ///
    /// An already scaled map is rescaled at the same radius, since the pixel
    /// size depends on the grid.
    pub fn attach(&mut self, board: &Board) {
        self.extent = Some(board.extent());
        if let Some(hex_radius) = self.layout.as_ref().map(|params| params.hex_radius) {
            self.scale(hex_radius);
        }
    }

    pub fn extent(&self) -> Option<GridExtent> {
        self.extent
    }

    /// Recompute the layout for a new hex radius and drop the hit-test
    /// regions built for the old one.
    ///
    /// # Panics
    /// If `hex_radius` does not exceed [`crate::layout::MIN_HEX_RADIUS`].
    pub fn scale(&mut self, hex_radius: i32) -> &LayoutParams {
        let params = LayoutParams::scale(hex_radius, self.config.margin, self.extent);
        debug!(
            hex_radius,
            width = params.width,
            height = params.height,
            "map rescaled"
        );
        self.regions = OnceCell::new();
        self.layout.insert(params)
    }

    /// Scale to the largest radius whose board fits `width` x `height`.
    ///
    /// # Panics
    /// If no board is attached.
    pub fn scale_to_fit(&mut self, width: i32, height: i32) -> &LayoutParams {
        let extent = match self.extent {
            Some(extent) => extent,
            None => panic!("scale_to_fit needs an attached board"),
        };
        let hex_radius = LayoutParams::fit_radius(width, height, self.config.margin, extent);
        self.scale(hex_radius)
    }

    pub fn is_scaled(&self) -> bool {
        self.layout.is_some()
    }

    /// Current layout.
    ///
    /// # Panics
    /// Before the first [`GuiMap::scale`].
    pub fn layout(&self) -> &LayoutParams {
        scaled(self.layout.as_ref())
    }

    /// Mutable layout, for text-driven chit sizing
    pub fn layout_mut(&mut self) -> &mut LayoutParams {
        match self.layout.as_mut() {
            Some(params) => params,
            None => panic!("map geometry used before scale()"),
        }
    }

    /// Hit-test regions for the current scale
    pub fn regions(&self) -> &RegionIndex {
        let params = self.layout();
        self.regions.get_or_init(|| RegionIndex::build(params))
    }

    fn check_board(&self, board: &Board) {
        let attached = match self.extent {
            Some(extent) => extent,
            None => panic!("no board attached to the map"),
        };
        assert!(
            attached == board.extent(),
            "board grid {:?} does not match the attached grid {:?}",
            board.extent(),
            attached
        );
    }

    fn locator(&self, board: &Board) -> BoardLocator<'_> {
        self.check_board(board);
        board_locator(self.layout.as_ref(), &self.regions)
    }

    pub fn locate_hex(&self, board: &Board, p: Point) -> Option<HexId> {
        self.locator(board).locate_hex(board, p)
    }

    pub fn locate_edge(&self, board: &Board, p: Point) -> Option<EdgeId> {
        self.locator(board).locate_edge(board, p)
    }

    pub fn locate_node(&self, board: &Board, p: Point) -> Option<NodeId> {
        self.locator(board).locate_node(board, p)
    }

    pub fn locate(&self, board: &Board, target: LocateTarget, p: Point) -> Option<MapElement> {
        self.locator(board).locate(board, target, p)
    }

    pub fn cursor(&self) -> &CursorStateMachine<T> {
        &self.cursor
    }

    pub fn mode(&self) -> CursorType {
        self.cursor.mode()
    }

    /// Enter a cursor mode chosen by the player or the rules layer
    pub fn set_cursor(&mut self, request: CursorRequest<T>, highlighter: &mut dyn Highlighter) {
        self.cursor.set_mode(request, highlighter);
    }

    /// Abandon the current mode; see [`CursorStateMachine::cancel`]
    pub fn cancel(&mut self, highlighter: &mut dyn Highlighter) -> bool {
        self.cursor.cancel(highlighter)
    }

    /// Re-check the highlight after the board changed
    pub fn revalidate(&mut self, board: &Board, highlighter: &mut dyn Highlighter) -> Option<MapElement> {
        self.cursor.revalidate(board, highlighter)
    }

    pub fn advisor(&self) -> &SingleClickAdvisor<T> {
        &self.advisor
    }

    /// Build actions offered to single-click building
    pub fn advisor_mut(&mut self) -> &mut SingleClickAdvisor<T> {
        &mut self.advisor
    }

    pub fn set_single_click(&mut self, enabled: bool) {
        self.config.single_click_build = enabled;
        self.advisor.set_enabled(enabled);
    }

    pub fn set_highlight_chit(&mut self, roll: Option<u8>) {
        self.highlight_chit = roll;
    }

    pub fn highlight_chit(&self) -> Option<u8> {
        self.highlight_chit
    }

    /// Hexes whose chit is drawn highlighted
    pub fn highlighted_hexes(&self, board: &Board) -> Vec<HexId> {
        match self.highlight_chit {
            Some(roll) => board.hexes_with_roll(roll).map(|hex| hex.id).collect(),
            None => Vec::new(),
        }
    }
}

impl<T: Clone> GuiMap<T> {
    /// Let single-click building pick the mode, unless the player chose one
    fn advise(&mut self, board: &Board, p: Point, highlighter: &mut dyn Highlighter) {
        if self.cursor.mode() != CursorType::NoCursor && !self.cursor.is_single_click() {
            return;
        }
        let locator = board_locator(self.layout.as_ref(), &self.regions);
        match self.advisor.advise(board, &locator, p) {
            Some(request) => self.cursor.set_mode(request, highlighter),
            None if self.cursor.is_single_click() => self.cursor.clear(highlighter),
            None => {}
        }
    }

    /// Pointer motion; returns the highlighted element
    pub fn pointer_move(
        &mut self,
        board: &Board,
        p: Point,
        highlighter: &mut dyn Highlighter,
    ) -> Option<MapElement> {
        self.check_board(board);
        self.advise(board, p, highlighter);
        let locator = board_locator(self.layout.as_ref(), &self.regions);
        self.cursor.on_pointer_move(board, &locator, p, highlighter)
    }

    /// Pointer press; returns the committed selection, if any
    pub fn pointer_commit(
        &mut self,
        board: &Board,
        p: Point,
        highlighter: &mut dyn Highlighter,
    ) -> Option<Selection<T>> {
        self.check_board(board);
        self.advise(board, p, highlighter);
        let locator = board_locator(self.layout.as_ref(), &self.regions);
        self.cursor.on_pointer_commit(board, &locator, p, highlighter)
    }
}

/// Locator over the current scale, building the regions on first use.
///
/// Takes the fields apart so the cursor can be borrowed mutably alongside.
fn board_locator<'a>(
    layout: Option<&'a LayoutParams>,
    regions: &'a OnceCell<RegionIndex>,
) -> BoardLocator<'a> {
    let params = scaled(layout);
    BoardLocator::new(params, regions.get_or_init(|| RegionIndex::build(params)))
}

fn scaled(layout: Option<&LayoutParams>) -> &LayoutParams {
    match layout {
        Some(params) => params,
        None => panic!("map geometry used before scale()"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardLayout, EdgeBuilding, HexCell, Terrain};
    use crate::cursor::NoHighlight;
    use crate::hex::{EdgeDirection, HexCoord, VertexDirection};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn standard_board() -> Board {
        let mut rng = StdRng::seed_from_u64(7);
        Board::from_layout(&BoardLayout::standard_with_rng(&mut rng)).unwrap()
    }

    fn side_of(map: &GuiMap<()>, coord: HexCoord, side: EdgeDirection) -> Point {
        map.layout().hex_center(coord) + map.layout().edge_anchor(side)
    }

    #[test]
    #[should_panic(expected = "before scale")]
    fn test_hit_test_before_scale_panics() {
        let board = standard_board();
        let mut map: GuiMap = GuiMap::new(MapConfig::default());
        map.attach(&board);
        map.locate_hex(&board, Point::new(100, 100));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_foreign_board_panics() {
        let board = standard_board();
        let map: GuiMap = GuiMap::with_board(MapConfig::default(), &board);
        let small = Board::from_layout(&BoardLayout {
            columns: 1,
            rows: 1,
            shrink_left: false,
            shrink_right: false,
            hexes: vec![HexCell::new(0, 0, Terrain::Desert)],
        })
        .unwrap();
        map.locate_hex(&small, Point::new(60, 60));
    }

    #[test]
    fn test_rescale_rebuilds_regions() {
        let board = standard_board();
        let mut map: GuiMap = GuiMap::with_board(MapConfig::default(), &board);
        let coord = HexCoord::new(3, 3);
        let expected = board.hex_at(coord).unwrap().edge(EdgeDirection::SouthEast);

        let p = side_of(&map, coord, EdgeDirection::SouthEast);
        assert_eq!(map.locate_edge(&board, p), Some(expected));
        assert_eq!(map.regions().hex_radius(), 50);

        map.scale(30);
        assert_eq!(map.regions().hex_radius(), 30);
        let p = side_of(&map, coord, EdgeDirection::SouthEast);
        assert_eq!(map.locate_edge(&board, p), Some(expected));
        assert_eq!(map.regions(), &RegionIndex::build(map.layout()));
    }

    #[test]
    fn test_scale_to_fit_uses_attached_grid() {
        let board = standard_board();
        let mut map: GuiMap = GuiMap::new(MapConfig::default());
        map.attach(&board);
        let params = *map.scale_to_fit(800, 600);
        assert!(params.width <= 800);
        assert!(params.height <= 600);
        assert_eq!(
            params.hex_radius,
            LayoutParams::fit_radius(800, 600, map.config().margin, board.extent())
        );
    }

    #[test]
    fn test_attach_after_scale_resizes() {
        let board = standard_board();
        let mut map: GuiMap = GuiMap::new(MapConfig::default());
        map.scale(40);
        let bare = *map.layout();
        map.attach(&board);
        assert_eq!(map.layout().hex_radius, 40);
        assert!(map.layout().width > bare.width);
    }

    #[test]
    fn test_single_click_picks_and_drops_mode() {
        let board = standard_board();
        let config = MapConfig {
            single_click_build: true,
            ..MapConfig::default()
        };
        let mut map: GuiMap = GuiMap::with_board(config, &board);
        map.advisor_mut().enable_action(
            CursorRequest::new(CursorType::BuildRoad, 1, ())
                .validate(|board, element, _, _| element.as_edge().is_some_and(|e| board.edge_touches_land(e))),
        );

        let coord = HexCoord::new(3, 3);
        let p = side_of(&map, coord, EdgeDirection::West);
        let hit = map.pointer_move(&board, p, &mut NoHighlight);
        assert_eq!(map.mode(), CursorType::BuildRoad);
        assert!(map.cursor().is_single_click());
        assert_eq!(hit, Some(MapElement::Edge(board.hex_at(coord).unwrap().edge(EdgeDirection::West))));

        // Hex centers belong to no edge or node
        let center = map.layout().hex_center(coord);
        assert_eq!(map.pointer_move(&board, center, &mut NoHighlight), None);
        assert_eq!(map.mode(), CursorType::NoCursor);

        let selection = map.pointer_commit(&board, p, &mut NoHighlight).unwrap();
        assert_eq!(selection.cursor, CursorType::BuildRoad);
        assert_eq!(map.mode(), CursorType::NoCursor);
    }

    #[test]
    fn test_explicit_mode_is_not_overridden() {
        let mut board = standard_board();
        let mut map: GuiMap = GuiMap::with_board(MapConfig::default(), &board);
        map.set_single_click(true);
        map.advisor_mut()
            .enable_action(CursorRequest::new(CursorType::BuildRoad, 0, ()));
        map.set_cursor(CursorRequest::new(CursorType::BuildCity, 0, ()), &mut NoHighlight);

        let coord = HexCoord::new(2, 2);
        let p = map.layout().hex_center(coord) + map.layout().vertex_offset(VertexDirection::North);
        assert!(matches!(
            map.pointer_move(&board, p, &mut NoHighlight),
            Some(MapElement::Node(_))
        ));
        assert_eq!(map.mode(), CursorType::BuildCity);
        assert!(!map.cursor().is_single_click());

        let edge = board.hex_at(coord).unwrap().edge(EdgeDirection::East);
        board.build_edge(edge, EdgeBuilding::Road(0));
        assert!(map.revalidate(&board, &mut NoHighlight).is_some());
        assert!(map.cancel(&mut NoHighlight));
    }

    #[test]
    fn test_highlighted_chits() {
        let board = standard_board();
        let mut map: GuiMap = GuiMap::with_board(MapConfig::default(), &board);
        assert!(map.highlighted_hexes(&board).is_empty());

        map.set_highlight_chit(Some(8));
        let hexes = map.highlighted_hexes(&board);
        assert_eq!(hexes.len(), 2);
        assert!(hexes.iter().all(|id| board.hex(*id).roll == Some(8)));
    }
}
