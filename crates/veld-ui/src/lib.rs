//! Veld UI: retained-mode widget layout engine.
//!
//! A tree of widget nodes that maintains position, size, padding, clip
//! rectangle, z-order and docking relative to parents, lazily recomputing
//! only what changed through per-node dirty flags:
//! - Single-owner arena tree with id-based parent/viewport back-references
//! - Constrained docking layout (left/top/right/bottom/fill)
//! - Per-side clip-rectangle composition with inheritance
//! - Pointer-event routing with enter/leave/click derivation
//! - Retained drawable lists for an external renderer
//!
//! ## Quick Start
//!
//! ```
//! use veld_core::geometry::Rect;
//! use veld_ui::{Dock, DockState, DrawList, InputRouter, Panel, Rgba, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let mut router = InputRouter::new();
//!
//! let root = tree.insert_root(
//!     Box::new(Panel::new(Rgba::BLACK)),
//!     "root",
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//!     0,
//! );
//! let sidebar = tree
//!     .insert_child(
//!         root,
//!         Box::new(Panel::new(Rgba::WHITE)),
//!         "sidebar",
//!         Rect::new(0.0, 0.0, 0.0, 0.0),
//!         0,
//!     )
//!     .unwrap();
//! tree.set_dock(sidebar, Dock::new(DockState::Left, 200.0));
//! tree.enable(root, &mut router);
//!
//! // Once per frame:
//! tree.update_tree(root, 0.016);
//! let mut draw_list = DrawList::new();
//! tree.collect_drawables(root, &mut draw_list);
//! ```

pub mod clip;
pub mod dirty;
pub mod dock;
pub mod draw_list;
pub mod event;
pub mod padding;
pub mod tree;
pub mod widget;

pub use clip::{ClipRect, ClipState, Clipping, Side};
pub use dirty::WidgetFlags;
pub use dock::{Dock, DockState};
pub use draw_list::{DrawCommand, DrawList, QuadCommand, Rgba};
pub use event::{InputRouter, MouseButton, PointerEvent, WidgetEvent, WidgetEventKind};
pub use padding::Padding;
pub use tree::{Frame, NodeId, WidgetNode, WidgetTree};
pub use widget::{Panel, Spacer, Widget};

// Re-export common types from dependencies
pub use veld_core::geometry::Rect;
pub use veld_core::math::Vec2;
