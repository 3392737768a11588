//! Constrained docking layout.
//!
//! Docked children claim space from their parent's remaining rectangle in
//! declaration (z-sorted) order; once the surplus is exhausted, later
//! docked children collapse to zero size.

use veld_core::math::Vec2;
use veld_core::profiling::profile_function;

use crate::tree::{NodeId, WidgetTree};

/// How a child claims space from its parent's remaining rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockState {
    /// Not docked; the docking pass leaves the child untouched.
    #[default]
    None,
    /// Claim a strip off the left edge, full remaining height.
    Left,
    /// Claim a strip off the top edge, full remaining width.
    Top,
    /// Claim a strip off the right edge, full remaining height.
    Right,
    /// Claim a strip off the bottom edge, full remaining width.
    Bottom,
    /// Consume all remaining space on both axes.
    Fill,
}

/// Docking descriptor: state plus the size of the claimed strip.
///
/// `size` is the strip thickness for the four edge states and is ignored
/// for `None` and `Fill`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dock {
    pub state: DockState,
    pub size: f32,
}

impl Dock {
    pub fn new(state: DockState, size: f32) -> Self {
        Self { state, size }
    }
}

/// Distribute the parent's rectangle among its docked children.
///
/// One pass over the children in current order, maintaining the surplus
/// extents and the offsets accumulated by left/top docks. Right/bottom
/// docks take space from the far edge without shifting the left/top
/// accounting. Geometry writes go through the tree setters so the usual
/// dirty marking applies to each child.
pub(crate) fn arrange(tree: &mut WidgetTree, parent: NodeId) {
    profile_function!();

    let Some(parent_size) = tree.size(parent) else {
        return;
    };
    let mut surplus_width = parent_size.x;
    let mut surplus_height = parent_size.y;
    let mut left_fill = 0.0f32;
    let mut top_fill = 0.0f32;

    for child in tree.children_snapshot(parent) {
        let Some(dock) = tree.dock(child) else {
            continue;
        };
        if dock.state == DockState::None {
            continue;
        }
        if surplus_width == 0.0 && surplus_height == 0.0 {
            // Nothing left to hand out.
            tree.set_size(child, Vec2::ZERO);
            continue;
        }

        match dock.state {
            DockState::Left => {
                let old_left_fill = left_fill;
                let width = dock.size.min(surplus_width);
                tree.set_width(child, width);
                left_fill += width;
                surplus_width -= width;

                tree.set_position(child, Vec2::new(old_left_fill, top_fill));
                tree.set_height(child, surplus_height);
            }
            DockState::Top => {
                let old_top_fill = top_fill;
                let height = dock.size.min(surplus_height);
                tree.set_height(child, height);
                top_fill += height;
                surplus_height -= height;

                tree.set_position(child, Vec2::new(left_fill, old_top_fill));
                tree.set_width(child, surplus_width);
            }
            DockState::Right => {
                let width = dock.size.min(surplus_width);
                tree.set_width(child, width);
                surplus_width -= width;

                tree.set_position(child, Vec2::new(left_fill + surplus_width, top_fill));
                tree.set_height(child, surplus_height);
            }
            DockState::Bottom => {
                let height = dock.size.min(surplus_height);
                tree.set_height(child, height);
                surplus_height -= height;

                tree.set_position(child, Vec2::new(left_fill, top_fill + surplus_height));
                tree.set_width(child, surplus_width);
            }
            DockState::Fill => {
                tree.set_size(child, Vec2::new(surplus_width, surplus_height));
                tree.set_position(child, Vec2::new(left_fill, top_fill));
                surplus_width = 0.0;
                surplus_height = 0.0;
            }
            DockState::None => unreachable!(),
        }
    }
}
