//! Widget tree arena: nodes, geometry, dirty scheduling, the update pass.
//!
//! Nodes live in an id-keyed arena; parent and viewport links are plain
//! ids, never owning references, so the tree is a single-owner structure
//! with no reference cycles. All mutation goes through [`WidgetTree`]
//! methods, which compare old and new values and mark exactly the
//! recomputes that change requires.

use indexmap::IndexMap;
use tracing::{debug, trace};
use veld_core::geometry::Rect;
use veld_core::math::Vec2;
use veld_core::profiling::profile_function;

use crate::clip::{ClipRect, ClipState, Clipping, Side};
use crate::dirty::WidgetFlags;
use crate::dock::{self, Dock, DockState};
use crate::draw_list::{DrawCommand, DrawList};
use crate::event::InputRouter;
use crate::padding::Padding;
use crate::widget::Widget;

/// Node identifier in the widget tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Mutable geometry view of a widget node.
///
/// This is what the [`Widget`] capability hooks see: content position and
/// size in absolute space, the padding around the content rectangle, and
/// the translation this node applies to its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Vec2,
    pub size: Vec2,
    pub padding: Padding,
    pub child_offset: Vec2,
}

impl Frame {
    /// Top-left corner of the padded (interactive) rectangle.
    pub fn padded_position(&self) -> Vec2 {
        Vec2::new(
            self.position.x - self.padding.left,
            self.position.y - self.padding.top,
        )
    }

    /// Extent of the padded (interactive) rectangle.
    pub fn padded_size(&self) -> Vec2 {
        Vec2::new(
            self.size.x + self.padding.total_x(),
            self.size.y + self.padding.total_y(),
        )
    }
}

/// A node in the widget tree.
pub struct WidgetNode {
    pub(crate) name: String,
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) frame: Frame,
    pub(crate) clipping: Clipping,
    pub(crate) clip_rect: ClipRect,
    pub(crate) z_index: u16,
    pub(crate) dock: Dock,
    pub(crate) flags: WidgetFlags,
    pub(crate) parent: Option<NodeId>,
    pub(crate) viewport: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Cached drawables, rebuilt only on drawable recalculation.
    pub(crate) drawables: Vec<DrawCommand>,
    /// Parent child-offset already folded into `frame.position`. Tracking
    /// the absorbed amount keeps repeated dimension passes convergent.
    applied_offset: Vec2,
}

/// The widget tree.
///
/// Drive it from a frame pump: deliver pointer events through an
/// [`InputRouter`], call [`update_tree`](Self::update_tree) once per
/// frame, then hand [`collect_drawables`](Self::collect_drawables) output
/// to the renderer.
pub struct WidgetTree {
    nodes: IndexMap<NodeId, WidgetNode>,
    next_id: usize,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a detached node from a widget, name, content rect and
    /// z-index.
    ///
    /// The node starts with no parent and no viewport, dirty for its
    /// dimension, clip and drawable recomputes so a first update makes it
    /// internally consistent.
    pub fn insert(
        &mut self,
        widget: Box<dyn Widget>,
        name: impl Into<String>,
        rect: Rect<f32>,
        z_index: u16,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let node = WidgetNode {
            name: name.into(),
            widget,
            frame: Frame {
                position: rect.position(),
                size: rect.size(),
                padding: Padding::ZERO,
                child_offset: Vec2::ZERO,
            },
            clipping: Clipping::default(),
            clip_rect: ClipRect::infinite(),
            z_index,
            dock: Dock::default(),
            flags: WidgetFlags::NEEDS_DIMENSION_UPDATE
                | WidgetFlags::NEEDS_CLIP_RECT_RECALC
                | WidgetFlags::NEEDS_DRAWABLE_RECALC,
            parent: None,
            viewport: None,
            children: Vec::new(),
            drawables: Vec::new(),
            applied_offset: Vec2::ZERO,
        };
        self.nodes.insert(id, node);
        id
    }

    /// Create a root node that acts as its own viewport.
    ///
    /// Every descendant attached under it inherits this id as its
    /// viewport reference.
    pub fn insert_root(
        &mut self,
        widget: Box<dyn Widget>,
        name: impl Into<String>,
        rect: Rect<f32>,
        z_index: u16,
    ) -> NodeId {
        let id = self.insert(widget, name, rect, z_index);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.viewport = Some(id);
        }
        id
    }

    /// Create a node and attach it to `parent` in one step.
    ///
    /// Returns `None` when `parent` is not a live node.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        widget: Box<dyn Widget>,
        name: impl Into<String>,
        rect: Rect<f32>,
        z_index: u16,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.insert(widget, name, rect, z_index);
        let attached = self.add_child(parent, id);
        debug_assert!(attached);
        Some(id)
    }

    /// Attach `child` under `parent`.
    ///
    /// Fails (returning `false`, with both nodes unmodified) when either
    /// id is dead, the child already has a parent, or the attachment
    /// would create a cycle. On success the child inherits the parent's
    /// viewport (propagated through its whole subtree) and, if enabled,
    /// runs one synchronous settle pass (dimension, dock, clip, but not
    /// drawables) whose resulting dirty bits are OR-merged with the ones
    /// it carried before, so no requested recompute is dropped.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) {
            return false;
        }
        match self.nodes.get(&child) {
            Some(node) if node.parent.is_none() => {}
            _ => return false,
        }
        // Attaching an ancestor under its own descendant would close a
        // cycle; walk up from the parent once to reject it.
        if self.has_ancestor(parent, child) {
            return false;
        }

        let viewport = self.nodes.get(&parent).and_then(|n| n.viewport);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
            child_node.viewport = viewport;
        }
        self.propagate_viewport(child);

        if self.is_enabled(child) {
            // Settle the new child now so it is consistent before the
            // next frame, then restore whatever it already had pending.
            let old_dirty = self
                .nodes
                .get(&child)
                .map(|n| n.flags.dirty_bits())
                .unwrap_or_default();
            if let Some(node) = self.nodes.get_mut(&child) {
                node.flags = node.flags.interaction_bits() | WidgetFlags::SETTLE;
            }
            self.update(child, 0.0);
            if let Some(node) = self.nodes.get_mut(&child) {
                node.flags |= old_dirty;
            }
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.flags |=
                WidgetFlags::NEEDS_Z_INDEX_REORDER | WidgetFlags::NEEDS_DOCK_RECALC;
        }
        debug!(?parent, ?child, "attached widget");
        true
    }

    /// Detach `child` from `parent`.
    ///
    /// Fails (returning `false`, with both nodes unmodified) when `child`
    /// is not in `parent`'s child collection. On success the child loses
    /// its parent and viewport (cleared through its whole subtree) and is
    /// marked for a full dimension/dock/clip recompute so it stays
    /// consistent if shown standalone; the parent's clip rect resets to
    /// unconstrained and its docking is re-dirtied.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let Some(index) = parent_node.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent_node.children.remove(index);
        parent_node.clip_rect = ClipRect::infinite();
        parent_node.flags |= WidgetFlags::NEEDS_DOCK_RECALC;

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
            child_node.viewport = None;
            child_node.flags |= WidgetFlags::SETTLE;
        }
        self.propagate_viewport(child);
        debug!(?parent, ?child, "detached widget");
        true
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Children are disposed depth-first before the node itself; each
    /// disposed node is disabled (releasing its input subscription) and
    /// removed from the arena. A still-parented node is detached from its
    /// parent first; the arena snapshots child lists before every
    /// traversal, so there is no live iterator this could invalidate.
    pub fn dispose(&mut self, id: NodeId, router: &mut InputRouter) {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            self.remove_child(parent, id);
        }
        self.dispose_subtree(id, router);
    }

    fn dispose_subtree(&mut self, id: NodeId, router: &mut InputRouter) {
        let children = self.children_snapshot(id);
        for child in children {
            self.dispose_subtree(child, router);
        }
        router.unsubscribe(id);
        if self.nodes.shift_remove(&id).is_some() {
            debug!(?id, "disposed widget");
        }
    }

    // ------------------------------------------------------------------
    // Enable / disable
    // ------------------------------------------------------------------

    /// Enable a subtree, subscribing every node to the router.
    ///
    /// Subscription is idempotent; enabling an already-enabled node only
    /// recurses into its children.
    pub fn enable(&mut self, id: NodeId, router: &mut InputRouter) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if !node.flags.contains(WidgetFlags::ENABLED) {
                node.flags.insert(WidgetFlags::ENABLED);
                router.subscribe(id);
                trace!(?id, "widget enabled");
            }
        } else {
            return;
        }
        for child in self.children_snapshot(id) {
            self.enable(child, router);
        }
    }

    /// Disable a subtree, releasing every node's input subscription.
    ///
    /// Any in-progress click state is cleared even when the node was
    /// already disabled.
    pub fn disable(&mut self, id: NodeId, router: &mut InputRouter) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.flags.contains(WidgetFlags::ENABLED) {
                node.flags.remove(WidgetFlags::ENABLED);
                router.unsubscribe(id);
                trace!(?id, "widget disabled");
            }
            node.flags.remove(WidgetFlags::CLICKING);
        } else {
            return;
        }
        for child in self.children_snapshot(id) {
            self.disable(child, router);
        }
    }

    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|n| n.flags.contains(WidgetFlags::ENABLED))
    }

    // ------------------------------------------------------------------
    // Update pass
    // ------------------------------------------------------------------

    /// Run one update pass for a single node.
    ///
    /// The five recomputes run in fixed order (z-reorder, dimensions,
    /// docking, clip rect, drawables) and each flag is cleared before
    /// its recompute runs, so an earlier step re-dirtying a later one is
    /// handled within this same call.
    pub fn update(&mut self, id: NodeId, dt: f32) {
        profile_function!();

        if self.take_flag(id, WidgetFlags::NEEDS_Z_INDEX_REORDER) {
            self.reorder_children(id);
        }

        if self.take_flag(id, WidgetFlags::NEEDS_DIMENSION_UPDATE) {
            self.run_dimension_update(id, dt);
        }

        if self.take_flag(id, WidgetFlags::NEEDS_DOCK_RECALC) {
            dock::arrange(self, id);
        }

        if self.take_flag(id, WidgetFlags::NEEDS_CLIP_RECT_RECALC) {
            self.calculate_clip_rect(id);
        }

        if self.take_flag(id, WidgetFlags::NEEDS_DRAWABLE_RECALC) {
            self.calculate_drawables(id);
        }
    }

    /// Update every enabled descendant, top-down.
    ///
    /// A parent finishes its own pass before its children run, so child
    /// docking and clip bounds always see the parent's finalized
    /// rectangle for this frame. Disabled children are skipped along with
    /// their subtrees.
    pub fn update_descendants(&mut self, id: NodeId, dt: f32) {
        for child in self.children_snapshot(id) {
            if !self.is_enabled(child) {
                continue;
            }
            self.update(child, dt);
            self.update_descendants(child, dt);
        }
    }

    /// Per-frame entry point: update `root`, then its enabled descendants.
    pub fn update_tree(&mut self, root: NodeId, dt: f32) {
        self.update(root, dt);
        self.update_descendants(root, dt);
    }

    fn take_flag(&mut self, id: NodeId, flag: WidgetFlags) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.flags.contains(flag) => {
                node.flags.remove(flag);
                true
            }
            _ => false,
        }
    }

    fn reorder_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let mut keyed: Vec<(u16, NodeId)> = node
            .children
            .iter()
            .map(|&child| {
                let z = self.nodes.get(&child).map(|c| c.z_index).unwrap_or(0);
                (z, child)
            })
            .collect();

        if keyed.windows(2).all(|w| w[0].0 <= w[1].0) {
            return;
        }
        // Stable sort: equal z-indices keep their relative order.
        keyed.sort_by_key(|&(z, _)| z);

        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = keyed.into_iter().map(|(_, child)| child).collect();
            // A changed paint order invalidates the docking arrangement.
            node.flags.insert(WidgetFlags::NEEDS_DOCK_RECALC);
        }
    }

    fn run_dimension_update(&mut self, id: NodeId, dt: f32) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let before = node.frame;
        node.widget.update_dimensions(&mut node.frame, dt);
        let after = node.frame;
        let ignore_offset = node.flags.contains(WidgetFlags::IGNORE_OFFSET);

        if after.position != before.position || after.size != before.size {
            self.mark_geometry_changed(id);
        }
        if after.padding != before.padding {
            self.set_flag(id, WidgetFlags::NEEDS_CLIP_RECT_RECALC, true);
        }
        if after.child_offset != before.child_offset {
            self.mark_children_dimension_dirty(id);
        }
        if !ignore_offset {
            self.apply_offset(id);
        }
    }

    /// Fold the parent's child offset into this node's position.
    ///
    /// Only the delta against the already-absorbed offset is applied, so
    /// repeated dimension passes converge instead of drifting.
    fn apply_offset(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let Some(parent) = node.parent else {
            return;
        };
        let absorbed = node.applied_offset;
        let Some(offset) = self.nodes.get(&parent).map(|p| p.frame.child_offset) else {
            return;
        };
        let delta = offset - absorbed;
        if delta != Vec2::ZERO {
            let position = node.frame.position;
            self.set_position(id, position + delta);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.applied_offset = offset;
        }
    }

    fn calculate_drawables(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let frame = node.frame;
        let clip = node.clip_rect;
        let z_index = node.z_index;
        node.drawables.clear();
        node.widget
            .build_drawables(id, &frame, &clip, z_index, &mut node.drawables);
    }

    // ------------------------------------------------------------------
    // Clip composition
    // ------------------------------------------------------------------

    /// Recompose this node's clip rectangle against its parent's.
    ///
    /// Each side resolves independently: a `Visible` policy, or an edge
    /// that already overflows the parent bound, keeps the parent bound;
    /// a `Hidden` policy with the edge inside tightens to the widget's
    /// own padded edge. A changed rectangle marks every child for clip
    /// recomputation; an identical one propagates nothing.
    pub(crate) fn calculate_clip_rect(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let parent_rect = if let Some(parent) = node.parent {
            self.nodes
                .get(&parent)
                .map(|p| p.clip_rect)
                .unwrap_or_default()
        } else if let Some(viewport) = node.viewport.filter(|&v| v != id) {
            self.nodes
                .get(&viewport)
                .map(|v| v.clip_rect)
                .unwrap_or_default()
        } else {
            ClipRect::infinite()
        };
        let frame = node.frame;
        let old = node.clip_rect;

        let left_edge = frame.position.x - frame.padding.left;
        let min_x = if self.effective_clipping(id, Side::Left) == ClipState::Visible
            || left_edge < parent_rect.min.x
        {
            parent_rect.min.x
        } else {
            left_edge
        };

        let top_edge = frame.position.y - frame.padding.top;
        let min_y = if self.effective_clipping(id, Side::Top) == ClipState::Visible
            || top_edge < parent_rect.min.y
        {
            parent_rect.min.y
        } else {
            top_edge
        };

        let right_edge = frame.position.x + frame.size.x + frame.padding.right;
        let max_x = if self.effective_clipping(id, Side::Right) == ClipState::Visible
            || right_edge > parent_rect.max.x
        {
            parent_rect.max.x
        } else {
            right_edge
        };

        let bottom_edge = frame.position.y + frame.size.y + frame.padding.bottom;
        let max_y = if self.effective_clipping(id, Side::Bottom) == ClipState::Visible
            || bottom_edge > parent_rect.max.y
        {
            parent_rect.max.y
        } else {
            bottom_edge
        };

        let new = ClipRect::from_min_max(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
        if new != old {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.clip_rect = new;
            }
            self.mark_children_clip_dirty(id);
        }
    }

    /// Resolve the effective clipping policy for one side.
    ///
    /// `Inherit` asks the parent (then the viewport, for a detached node
    /// that still has one); an unparented root resolves to `Visible`.
    /// The result is always concrete, never `Inherit`.
    pub fn effective_clipping(&self, id: NodeId, side: Side) -> ClipState {
        let Some(node) = self.nodes.get(&id) else {
            return ClipState::Visible;
        };
        match node.clipping.side(side) {
            ClipState::Inherit => {
                if let Some(parent) = node.parent {
                    self.effective_clipping(parent, side)
                } else if let Some(viewport) = node.viewport.filter(|&v| v != id) {
                    self.effective_clipping(viewport, side)
                } else {
                    ClipState::Visible
                }
            }
            state => state,
        }
    }

    // ------------------------------------------------------------------
    // Render boundary
    // ------------------------------------------------------------------

    /// Append this node's cached drawables, then recurse into enabled
    /// children in paint order.
    pub fn collect_drawables(&self, id: NodeId, list: &mut DrawList) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for command in &node.drawables {
            list.push(command.clone());
        }
        for &child in &node.children {
            if self.is_enabled(child) {
                self.collect_drawables(child, list);
            }
        }
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Test a point (viewport coordinates) against the padded bounds.
    ///
    /// The interactive area is the content rectangle grown by the padding
    /// on each side. The padded boundary itself counts as outside.
    pub fn is_in_bounds(&self, id: NodeId, x: f32, y: f32) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let position = node.frame.padded_position();
        let size = node.frame.padded_size();
        x > position.x && x < position.x + size.x && y > position.y && y < position.y + size.y
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.frame.position)
    }

    pub fn size(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.frame.size)
    }

    pub fn padding(&self, id: NodeId) -> Option<Padding> {
        self.nodes.get(&id).map(|n| n.frame.padding)
    }

    pub fn child_offset(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.frame.child_offset)
    }

    pub fn clipping(&self, id: NodeId) -> Option<Clipping> {
        self.nodes.get(&id).map(|n| n.clipping)
    }

    pub fn clip_rect(&self, id: NodeId) -> Option<ClipRect> {
        self.nodes.get(&id).map(|n| n.clip_rect)
    }

    pub fn z_index(&self, id: NodeId) -> Option<u16> {
        self.nodes.get(&id).map(|n| n.z_index)
    }

    pub fn dock(&self, id: NodeId) -> Option<Dock> {
        self.nodes.get(&id).map(|n| n.dock)
    }

    pub fn flags(&self, id: NodeId) -> Option<WidgetFlags> {
        self.nodes.get(&id).map(|n| n.flags)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn viewport(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.viewport)
    }

    /// Children in current (z-sorted) order; empty for a dead id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn widget(&self, id: NodeId) -> Option<&dyn Widget> {
        self.nodes.get(&id).map(|n| &*n.widget)
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(&id).map(|n| &mut *n.widget)
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Set the absolute position.
    ///
    /// On change: children need a dimension pass; this node needs dock,
    /// clip and drawable recomputes.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let old = node.frame.position;
        node.frame.position = position;
        node.applied_offset = Vec2::ZERO;
        if old != position {
            self.mark_geometry_changed(id);
        }
    }

    pub fn set_x(&mut self, id: NodeId, x: f32) {
        if let Some(position) = self.position(id) {
            self.set_position(id, Vec2::new(x, position.y));
        }
    }

    pub fn set_y(&mut self, id: NodeId, y: f32) {
        if let Some(position) = self.position(id) {
            self.set_position(id, Vec2::new(position.x, y));
        }
    }

    /// Set the position relative to the parent's position (or absolutely,
    /// for a node without a parent).
    pub fn set_relative_position(&mut self, id: NodeId, relative: Vec2) {
        let base = self
            .parent(id)
            .and_then(|p| self.position(p))
            .unwrap_or(Vec2::ZERO);
        self.set_position(id, base + relative);
    }

    pub fn set_relative_x(&mut self, id: NodeId, relative_x: f32) {
        let base = self
            .parent(id)
            .and_then(|p| self.position(p))
            .map(|p| p.x)
            .unwrap_or(0.0);
        self.set_x(id, base + relative_x);
    }

    pub fn set_relative_y(&mut self, id: NodeId, relative_y: f32) {
        let base = self
            .parent(id)
            .and_then(|p| self.position(p))
            .map(|p| p.y)
            .unwrap_or(0.0);
        self.set_y(id, base + relative_y);
    }

    /// Set the content size. Marks the same recomputes as a position
    /// change.
    pub fn set_size(&mut self, id: NodeId, size: Vec2) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let old = node.frame.size;
        node.frame.size = size;
        if old != size {
            self.mark_geometry_changed(id);
        }
    }

    pub fn set_width(&mut self, id: NodeId, width: f32) {
        if let Some(size) = self.size(id) {
            self.set_size(id, Vec2::new(width, size.y));
        }
    }

    pub fn set_height(&mut self, id: NodeId, height: f32) {
        if let Some(size) = self.size(id) {
            self.set_size(id, Vec2::new(size.x, height));
        }
    }

    /// Set all four padding sides. On change the clip rect is recomposed.
    pub fn set_padding(&mut self, id: NodeId, padding: Padding) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.frame.padding != padding {
            node.frame.padding = padding;
            node.flags.insert(WidgetFlags::NEEDS_CLIP_RECT_RECALC);
        }
    }

    pub fn set_padding_left(&mut self, id: NodeId, left: f32) {
        if let Some(padding) = self.padding(id) {
            self.set_padding(id, Padding { left, ..padding });
        }
    }

    pub fn set_padding_top(&mut self, id: NodeId, top: f32) {
        if let Some(padding) = self.padding(id) {
            self.set_padding(id, Padding { top, ..padding });
        }
    }

    pub fn set_padding_right(&mut self, id: NodeId, right: f32) {
        if let Some(padding) = self.padding(id) {
            self.set_padding(id, Padding { right, ..padding });
        }
    }

    pub fn set_padding_bottom(&mut self, id: NodeId, bottom: f32) {
        if let Some(padding) = self.padding(id) {
            self.set_padding(id, Padding { bottom, ..padding });
        }
    }

    /// Set the whole clipping policy. On change the clip rect is
    /// recomposed.
    pub fn set_clipping(&mut self, id: NodeId, clipping: Clipping) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.clipping != clipping {
            node.clipping = clipping;
            node.flags.insert(WidgetFlags::NEEDS_CLIP_RECT_RECALC);
        }
    }

    /// Set the clipping policy for one side.
    pub fn set_clipping_side(&mut self, id: NodeId, side: Side, state: ClipState) {
        if let Some(mut clipping) = self.clipping(id) {
            clipping.set_side(side, state);
            self.set_clipping(id, clipping);
        }
    }

    /// Set the z-index. On change the parent's children need re-sorting.
    pub fn set_z_index(&mut self, id: NodeId, z_index: u16) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.z_index == z_index {
            return;
        }
        node.z_index = z_index;
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.flags.insert(WidgetFlags::NEEDS_Z_INDEX_REORDER);
            }
        }
    }

    /// Set the dock descriptor. The arranging node (parent, or the
    /// viewport for a detached node that still has one) is re-dirtied
    /// unconditionally.
    pub fn set_dock(&mut self, id: NodeId, dock: Dock) {
        debug_assert!(
            dock.size.is_finite() && dock.size >= 0.0,
            "dock size must be finite and non-negative"
        );
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.dock = dock;
        let arranger = node.parent.or(node.viewport.filter(|&v| v != id));
        if let Some(arranger) = arranger {
            if let Some(arranger_node) = self.nodes.get_mut(&arranger) {
                arranger_node.flags.insert(WidgetFlags::NEEDS_DOCK_RECALC);
            }
        }
    }

    pub fn set_dock_state(&mut self, id: NodeId, state: DockState) {
        if let Some(dock) = self.dock(id) {
            self.set_dock(id, Dock { state, ..dock });
        }
    }

    pub fn set_dock_size(&mut self, id: NodeId, size: f32) {
        if let Some(dock) = self.dock(id) {
            self.set_dock(id, Dock { size, ..dock });
        }
    }

    /// Set the translation applied to direct children. All children are
    /// marked for a dimension pass.
    pub fn set_child_offset(&mut self, id: NodeId, offset: Vec2) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.frame.child_offset = offset;
        self.mark_children_dimension_dirty(id);
    }

    pub fn set_child_offset_x(&mut self, id: NodeId, x: f32) {
        if let Some(offset) = self.child_offset(id) {
            self.set_child_offset(id, Vec2::new(x, offset.y));
        }
    }

    pub fn set_child_offset_y(&mut self, id: NodeId, y: f32) {
        if let Some(offset) = self.child_offset(id) {
            self.set_child_offset(id, Vec2::new(offset.x, y));
        }
    }

    /// Opt this node out of (or back into) the parent child-offset
    /// translation. Forces a dimension pass either way.
    pub fn set_ignore_offset(&mut self, id: NodeId, ignore: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags.set(WidgetFlags::IGNORE_OFFSET, ignore);
            node.flags.insert(WidgetFlags::NEEDS_DIMENSION_UPDATE);
        }
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name.into();
        }
    }

    // ------------------------------------------------------------------
    // Dirty marking
    // ------------------------------------------------------------------

    /// Request recomputes on a node. Only recompute-request bits are
    /// accepted; interaction bits are ignored.
    pub fn mark_dirty(&mut self, id: NodeId, flags: WidgetFlags) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags |= flags & WidgetFlags::DIRTY_MASK;
        }
    }

    /// Mark every direct child for a dimension pass.
    pub fn mark_children_dimension_dirty(&mut self, id: NodeId) {
        for child in self.children_snapshot(id) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.flags.insert(WidgetFlags::NEEDS_DIMENSION_UPDATE);
            }
        }
    }

    /// Mark every descendant for a dimension pass.
    pub fn mark_descendants_dimension_dirty(&mut self, id: NodeId) {
        for child in self.children_snapshot(id) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.flags.insert(WidgetFlags::NEEDS_DIMENSION_UPDATE);
            }
            self.mark_descendants_dimension_dirty(child);
        }
    }

    fn mark_children_clip_dirty(&mut self, id: NodeId) {
        for child in self.children_snapshot(id) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.flags.insert(WidgetFlags::NEEDS_CLIP_RECT_RECALC);
            }
        }
    }

    /// Position or size changed: children need a dimension pass, this
    /// node needs dock, clip and drawable recomputes.
    fn mark_geometry_changed(&mut self, id: NodeId) {
        self.mark_children_dimension_dirty(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags.insert(
                WidgetFlags::NEEDS_DOCK_RECALC
                    | WidgetFlags::NEEDS_CLIP_RECT_RECALC
                    | WidgetFlags::NEEDS_DRAWABLE_RECALC,
            );
        }
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    pub(crate) fn children_snapshot(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub(crate) fn flag(&self, id: NodeId, flag: WidgetFlags) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.flags.contains(flag))
    }

    pub(crate) fn set_flag(&mut self, id: NodeId, flag: WidgetFlags, value: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags.set(flag, value);
        }
    }

    /// Copy this node's viewport reference into its whole subtree.
    fn propagate_viewport(&mut self, id: NodeId) {
        let Some(viewport) = self.nodes.get(&id).map(|n| n.viewport) else {
            return;
        };
        let mut stack = self.children_snapshot(id);
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.viewport = viewport;
            }
            stack.extend(self.children_snapshot(current));
        }
    }

    /// True when `ancestor` appears on `id`'s parent chain.
    fn has_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}
