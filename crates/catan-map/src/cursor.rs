//! Build and selection cursor.
//!
//! The cursor tracks what the player is about to place (or which element they
//! are about to pick) and which element under the pointer is currently
//! highlighted. Rules live with the caller: every request carries a
//! `validate` predicate, and the cursor never highlights an element the
//! predicate rejects.
//!
//! Committing a choice returns a [`Selection`]. The optional `on_select`
//! handler runs after the cursor has already reset itself, and may hand back
//! a follow-up [`CursorRequest`] instead of calling into the cursor again.

use crate::board::{Board, PlayerId};
use crate::locate::{BoardLocator, LocateTarget, MapElement};
use crate::polygon::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Interaction mode of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CursorType {
    /// Pointer movement does nothing
    #[default]
    NoCursor,
    BuildRoad,
    BuildShip,
    BuildBridge,
    BuildSettlement,
    BuildCity,
    /// Pick a building to steal from
    StealBuilding,
    /// Pick a ship to steal from
    StealShip,
    MoveRobberOrPirate,
}

impl CursorType {
    /// Kind of element this mode picks, `None` for [`CursorType::NoCursor`]
    pub fn target(self) -> Option<LocateTarget> {
        match self {
            CursorType::NoCursor => None,
            CursorType::BuildRoad
            | CursorType::BuildShip
            | CursorType::BuildBridge
            | CursorType::StealShip => Some(LocateTarget::Edge),
            CursorType::BuildSettlement | CursorType::BuildCity | CursorType::StealBuilding => {
                Some(LocateTarget::Node)
            }
            CursorType::MoveRobberOrPirate => Some(LocateTarget::Hex),
        }
    }

    /// Whether this mode places a new piece
    pub fn is_build(self) -> bool {
        matches!(
            self,
            CursorType::BuildRoad
                | CursorType::BuildShip
                | CursorType::BuildBridge
                | CursorType::BuildSettlement
                | CursorType::BuildCity
        )
    }
}

/// Rendering hooks for the highlighted element.
///
/// The cursor guarantees that for a given element a draw is always followed by
/// exactly one erase before anything else is drawn.
pub trait Highlighter {
    fn draw_highlight(&mut self, cursor: CursorType, element: MapElement, owner: PlayerId);
    fn erase_highlight(&mut self, cursor: CursorType, element: MapElement);
}

/// Highlighter that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn draw_highlight(&mut self, _: CursorType, _: MapElement, _: PlayerId) {}
    fn erase_highlight(&mut self, _: CursorType, _: MapElement) {}
}

/// Decides whether `owner` may pick an element in the current mode
pub type Validator<T> = Rc<dyn Fn(&Board, MapElement, PlayerId, &T) -> bool>;

/// Runs after a commit; may return the next mode to enter
pub type SelectHandler<T> = Rc<dyn Fn(&Selection<T>) -> Option<CursorRequest<T>>>;

pub type CancelHandler = Rc<dyn Fn()>;

/// A committed choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    pub cursor: CursorType,
    pub element: MapElement,
    pub owner: PlayerId,
    pub extra: T,
}

/// Everything needed to enter a cursor mode
#[derive(Clone)]
pub struct CursorRequest<T> {
    pub cursor: CursorType,
    /// Player a pending placement is attributed to
    pub owner: PlayerId,
    /// Caller data handed to `validate` and to the selection
    pub extra: T,
    /// Set when the mode was inferred by single-click building
    pub single_click: bool,
    validate: Validator<T>,
    on_select: Option<SelectHandler<T>>,
    on_cancel: Option<CancelHandler>,
}

impl<T: 'static> CursorRequest<T> {
    /// A request that accepts every element until `validate` is set
    pub fn new(cursor: CursorType, owner: PlayerId, extra: T) -> Self {
        Self {
            cursor,
            owner,
            extra,
            single_click: false,
            validate: Rc::new(|_: &Board, _: MapElement, _: PlayerId, _: &T| true),
            on_select: None,
            on_cancel: None,
        }
    }

    pub fn validate(mut self, f: impl Fn(&Board, MapElement, PlayerId, &T) -> bool + 'static) -> Self {
        self.validate = Rc::new(f);
        self
    }

    pub fn on_select(
        mut self,
        f: impl Fn(&Selection<T>) -> Option<CursorRequest<T>> + 'static,
    ) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn() + 'static) -> Self {
        self.on_cancel = Some(Rc::new(f));
        self
    }
}

impl<T> CursorRequest<T> {
    pub fn single_click(mut self, single_click: bool) -> Self {
        self.single_click = single_click;
        self
    }

    /// Run the validation predicate
    pub fn accepts(&self, board: &Board, element: MapElement) -> bool {
        (self.validate)(board, element, self.owner, &self.extra)
    }
}

impl<T: fmt::Debug> fmt::Debug for CursorRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorRequest")
            .field("cursor", &self.cursor)
            .field("owner", &self.owner)
            .field("extra", &self.extra)
            .field("single_click", &self.single_click)
            .field("on_select", &self.on_select.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

/// The cursor state machine
pub struct CursorStateMachine<T> {
    /// Active mode and its callbacks, `None` means [`CursorType::NoCursor`]
    request: Option<CursorRequest<T>>,
    /// Element currently drawn highlighted; always passed `validate` when set
    highlight: Option<MapElement>,
}

impl<T> Default for CursorStateMachine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CursorStateMachine<T> {
    pub fn new() -> Self {
        Self {
            request: None,
            highlight: None,
        }
    }

    pub fn mode(&self) -> CursorType {
        self.request
            .as_ref()
            .map_or(CursorType::NoCursor, |request| request.cursor)
    }

    pub fn highlight(&self) -> Option<MapElement> {
        self.highlight
    }

    pub fn request(&self) -> Option<&CursorRequest<T>> {
        self.request.as_ref()
    }

    /// Whether the current mode was inferred by single-click building
    pub fn is_single_click(&self) -> bool {
        self.request.as_ref().is_some_and(|request| request.single_click)
    }

    /// Enter a mode.
    ///
    /// Re-entering the current mode only swaps the request payload and leaves
    /// the highlight alone; the next pointer update re-checks it. Any other
    /// switch erases the highlight first.
    pub fn set_mode(&mut self, request: CursorRequest<T>, highlighter: &mut dyn Highlighter) {
        if request.cursor == CursorType::NoCursor {
            self.clear(highlighter);
            return;
        }
        if request.cursor != self.mode() {
            self.erase(highlighter);
            debug!(cursor = ?request.cursor, owner = request.owner, "cursor mode set");
        }
        self.request = Some(request);
    }

    /// Back to [`CursorType::NoCursor`] without running `on_cancel`
    pub fn clear(&mut self, highlighter: &mut dyn Highlighter) {
        self.erase(highlighter);
        self.request = None;
    }

    fn erase(&mut self, highlighter: &mut dyn Highlighter) {
        if let Some(element) = self.highlight.take() {
            highlighter.erase_highlight(self.mode(), element);
        }
    }

    /// Follow the pointer; returns the highlighted element afterwards
    pub fn on_pointer_move(
        &mut self,
        board: &Board,
        locator: &BoardLocator<'_>,
        p: Point,
        highlighter: &mut dyn Highlighter,
    ) -> Option<MapElement> {
        let request = self.request.as_ref()?;
        let target = request.cursor.target()?;
        let located = locator.locate(board, target, p);

        if located == self.highlight {
            // Same element, but the rules may have changed under it
            if let Some(element) = located {
                if !request.accepts(board, element) {
                    highlighter.erase_highlight(request.cursor, element);
                    self.highlight = None;
                }
            }
            return self.highlight;
        }

        if let Some(previous) = self.highlight.take() {
            highlighter.erase_highlight(request.cursor, previous);
        }
        if let Some(element) = located.filter(|element| request.accepts(board, *element)) {
            highlighter.draw_highlight(request.cursor, element, request.owner);
            self.highlight = Some(element);
        }
        self.highlight
    }

    /// Commit the choice under the pointer.
    ///
    /// With a valid element there, the cursor resets to
    /// [`CursorType::NoCursor`], runs `on_select` and enters whatever mode it
    /// returns. Otherwise nothing happens and `None` is returned.
    pub fn on_pointer_commit(
        &mut self,
        board: &Board,
        locator: &BoardLocator<'_>,
        p: Point,
        highlighter: &mut dyn Highlighter,
    ) -> Option<Selection<T>> {
        let element = self.on_pointer_move(board, locator, p, highlighter)?;
        if !self.request.as_ref()?.accepts(board, element) {
            return None;
        }

        let request = self.request.take()?;
        self.highlight = None;
        highlighter.erase_highlight(request.cursor, element);

        let CursorRequest {
            cursor,
            owner,
            extra,
            on_select,
            ..
        } = request;
        debug!(?cursor, ?element, owner, "cursor selection committed");
        let selection = Selection {
            cursor,
            element,
            owner,
            extra,
        };

        if let Some(next) = on_select.and_then(|on_select| on_select(&selection)) {
            self.set_mode(next, highlighter);
        }
        Some(selection)
    }

    /// Re-check the highlight after the game state changed
    pub fn revalidate(&mut self, board: &Board, highlighter: &mut dyn Highlighter) -> Option<MapElement> {
        if let (Some(request), Some(element)) = (self.request.as_ref(), self.highlight) {
            if !request.accepts(board, element) {
                highlighter.erase_highlight(request.cursor, element);
                self.highlight = None;
            }
        }
        self.highlight
    }

    /// Abandon the current mode, running its `on_cancel` handler.
    ///
    /// Returns whether a mode was active.
    pub fn cancel(&mut self, highlighter: &mut dyn Highlighter) -> bool {
        self.erase(highlighter);
        let Some(request) = self.request.take() else {
            return false;
        };
        debug!(cursor = ?request.cursor, "cursor cancelled");
        if let Some(on_cancel) = request.on_cancel {
            on_cancel();
        }
        true
    }
}

impl<T> fmt::Debug for CursorStateMachine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorStateMachine")
            .field("mode", &self.mode())
            .field("highlight", &self.highlight)
            .finish()
    }
}
