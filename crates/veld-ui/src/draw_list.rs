//! Retained draw list consumed by an external renderer.
//!
//! Widgets rebuild their cached drawable commands only when their
//! drawable-recalculation flag is set; the tree then flattens the caches
//! into a [`DrawList`] in paint order. The list is backend-agnostic.

use crate::tree::NodeId;
use veld_core::math::Vec2;

/// A linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// High-level draw command for a UI element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Draw a filled rectangle.
    Quad(QuadCommand),
}

impl DrawCommand {
    /// The node that owns this command.
    pub fn node_id(&self) -> NodeId {
        match self {
            DrawCommand::Quad(q) => q.node_id,
        }
    }

    /// The z-index the owning node painted at.
    pub fn z_index(&self) -> u16 {
        match self {
            DrawCommand::Quad(q) => q.z_index,
        }
    }
}

/// Command to draw a filled quad.
#[derive(Debug, Clone)]
pub struct QuadCommand {
    /// Node that owns this command.
    pub node_id: NodeId,
    /// Position in absolute space.
    pub position: Vec2,
    /// Size of the quad.
    pub size: Vec2,
    /// Fill color.
    pub color: Rgba,
    /// Z-index of the owning node.
    pub z_index: u16,
}

/// Ordered collection of draw commands.
///
/// Order is paint order: a node's commands precede its descendants', and
/// siblings appear in their (z-sorted) child order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
