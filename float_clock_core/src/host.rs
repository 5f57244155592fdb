//! Presentation adapter contracts
//!
//! The controller never reaches for a window or menu on its own; it is handed
//! implementations of these traits at construction and receives everything
//! the user does as a [`HostEvent`].

use crate::config::Rgba;
use crate::geometry::{Point, Rect};
use crate::layout::{LayoutResult, LineRole};
use crate::menu::{MenuAction, MenuEntry};

/// Layer properties of the floating surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub background: Rgba,
    pub corner_radius: f64,
}

/// One centered text region inside the surface
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub role: LineRole,
    pub text: String,
    pub font_size: f64,
    /// Relative to the surface's top-left corner
    pub frame: Rect,
    pub color: Rgba,
    /// 1.0 fully visible, 0.0 hidden (flash off phase)
    pub opacity: f32,
}

/// Borderless, non-opaque, always-on-top surface
pub trait WindowHost {
    /// Visible frame of the screen the widget lives on
    fn screen_frame(&self) -> Rect;

    /// Create the surface on first call, otherwise resize/reposition it.
    fn apply_geometry(&mut self, frame: Rect, style: &SurfaceStyle, layout: &LayoutResult);

    /// Pure translation, used while dragging.
    fn move_to(&mut self, origin: Point);

    /// Replace the text of every label region. Regions not listed are hidden.
    fn apply_labels(&mut self, labels: &[Label]);
}

/// Status/context menu presentation
pub trait MenuHost {
    /// Install a freshly built description, replacing the previous one.
    fn set_menu(&mut self, menu: &[MenuEntry]);

    /// Pop the current menu up at a screen location.
    fn show_menu(&mut self, at: Point);
}

/// Everything the host can tell the controller
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Tick,
    Action(MenuAction),
    DragStarted,
    /// Screen-space movement since the previous drag event
    Dragged { dx: f64, dy: f64 },
    DragEnded,
    ContextMenuRequested { x: f64, y: f64 },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}
