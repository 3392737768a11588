//! Widget capability trait and the basic widget kinds.
//!
//! The layout engine never assumes a concrete widget variant; it only calls
//! through the [`Widget`] capability for the per-kind dimension pass and
//! drawable generation. Everything else (geometry, docking, clipping,
//! input state) lives on the tree node.

use std::any::Any;

use crate::clip::ClipRect;
use crate::draw_list::{DrawCommand, QuadCommand, Rgba};
use crate::tree::{Frame, NodeId};

/// Polymorphic per-widget behavior.
pub trait Widget: Any {
    /// Get widget type as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get mutable widget type as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Short kind name for logs and debugging.
    fn debug_name(&self) -> &'static str {
        "widget"
    }

    /// Per-kind dimension pass.
    ///
    /// Runs when the node's dimension flag is set, before docking and clip
    /// composition. `dt` is the frame delta, advisory data for widgets
    /// that animate their geometry. Writes to `frame` are observed by the
    /// tree, which marks the follow-up recomputes on any change.
    fn update_dimensions(&mut self, _frame: &mut Frame, _dt: f32) {}

    /// Rebuild this widget's drawable primitives.
    ///
    /// Runs only when the node's drawable flag is set; the result is
    /// cached on the node until the next invalidation.
    fn build_drawables(
        &self,
        _node: NodeId,
        _frame: &Frame,
        _clip: &ClipRect,
        _z_index: u16,
        _out: &mut Vec<DrawCommand>,
    ) {
    }
}

/// A solid-color rectangular panel, the basic container widget.
pub struct Panel {
    pub color: Rgba,
}

impl Panel {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(Rgba::TRANSPARENT)
    }
}

impl Widget for Panel {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "panel"
    }

    fn build_drawables(
        &self,
        node: NodeId,
        frame: &Frame,
        _clip: &ClipRect,
        z_index: u16,
        out: &mut Vec<DrawCommand>,
    ) {
        if self.color.a > 0.0 {
            out.push(DrawCommand::Quad(QuadCommand {
                node_id: node,
                position: frame.position,
                size: frame.size,
                color: self.color,
                z_index,
            }));
        }
    }
}

/// An invisible widget that occupies space but draws nothing.
///
/// Useful as a dock filler or hit-test region.
#[derive(Default)]
pub struct Spacer;

impl Widget for Spacer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "spacer"
    }
}
