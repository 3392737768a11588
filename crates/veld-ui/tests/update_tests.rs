//! Integration tests for the per-frame update pass: step ordering,
//! single-call convergence and the child-offset translation.

use std::any::Any;

use veld_core::geometry::Rect;
use veld_core::math::Vec2;
use veld_ui::{
    ClipState, Clipping, Dock, DockState, DrawCommand, DrawList, Frame, InputRouter, NodeId, Panel,
    Rgba, Widget, WidgetFlags, WidgetTree,
};

fn panel() -> Box<Panel> {
    Box::new(Panel::new(Rgba::WHITE))
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect<f32> {
    Rect::new(x, y, w, h)
}

/// Widget whose dimension pass grows it to a fixed target size.
struct Growing {
    target: Vec2,
}

impl Widget for Growing {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "growing"
    }

    fn update_dimensions(&mut self, frame: &mut Frame, _dt: f32) {
        frame.size = self.target;
    }
}

#[test]
fn test_single_update_converges() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    tree.set_clipping(root, Clipping::all(ClipState::Hidden));
    let side = tree
        .insert_child(root, panel(), "side", rect(0.0, 0.0, 0.0, 0.0), 0)
        .unwrap();
    tree.set_dock(side, Dock::new(DockState::Left, 40.0));
    let body = tree
        .insert_child(root, panel(), "body", rect(0.0, 0.0, 0.0, 0.0), 1)
        .unwrap();
    tree.set_dock(body, Dock::new(DockState::Fill, 0.0));
    tree.enable(root, &mut router);

    tree.update_tree(root, 0.0);

    for id in [root, side, body] {
        assert!(
            tree.flags(id).unwrap().dirty_bits().is_empty(),
            "{:?} still dirty after one pass: {:?}",
            tree.name(id),
            tree.flags(id).unwrap()
        );
    }
    assert_eq!(tree.size(side), Some(Vec2::new(40.0, 100.0)));
    assert_eq!(tree.size(body), Some(Vec2::new(160.0, 100.0)));
    assert_eq!(tree.position(body), Some(Vec2::new(40.0, 0.0)));
}

#[test]
fn test_dimension_change_forces_dock_in_same_pass() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    let container = tree
        .insert_child(
            root,
            Box::new(Growing {
                target: Vec2::new(80.0, 40.0),
            }),
            "container",
            rect(0.0, 0.0, 0.0, 0.0),
            0,
        )
        .unwrap();
    let fill = tree
        .insert_child(container, panel(), "fill", rect(0.0, 0.0, 0.0, 0.0), 0)
        .unwrap();
    tree.set_dock(fill, Dock::new(DockState::Fill, 0.0));
    tree.enable(root, &mut router);

    // One call: the dimension hook resizes the container, which must
    // re-dock its children before this same pass finishes.
    tree.update(container, 0.0);

    assert_eq!(tree.size(container), Some(Vec2::new(80.0, 40.0)));
    assert_eq!(tree.size(fill), Some(Vec2::new(80.0, 40.0)));
    assert!(
        tree.flags(container)
            .unwrap()
            .dirty_bits()
            .difference(WidgetFlags::NEEDS_DIMENSION_UPDATE)
            .is_empty()
    );
}

#[test]
fn test_child_offset_translates_children_once() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    let child = tree
        .insert_child(root, panel(), "child", rect(10.0, 10.0, 20.0, 20.0), 0)
        .unwrap();
    tree.enable(root, &mut router);
    tree.update_tree(root, 0.0);

    tree.set_child_offset(root, Vec2::new(5.0, 5.0));
    tree.update_tree(root, 0.0);
    assert_eq!(tree.position(child), Some(Vec2::new(15.0, 15.0)));

    // Re-running the dimension pass with the same offset must not move
    // the child again.
    tree.mark_dirty(child, WidgetFlags::NEEDS_DIMENSION_UPDATE);
    tree.update_tree(root, 0.0);
    assert_eq!(tree.position(child), Some(Vec2::new(15.0, 15.0)));

    // Only the delta of a later offset change is applied.
    tree.set_child_offset(root, Vec2::new(7.0, 7.0));
    tree.update_tree(root, 0.0);
    assert_eq!(tree.position(child), Some(Vec2::new(17.0, 17.0)));
}

#[test]
fn test_ignore_offset_opts_out_of_translation() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    let child = tree
        .insert_child(root, panel(), "child", rect(10.0, 10.0, 20.0, 20.0), 0)
        .unwrap();
    tree.set_ignore_offset(child, true);
    tree.enable(root, &mut router);

    tree.set_child_offset(root, Vec2::new(5.0, 5.0));
    tree.update_tree(root, 0.0);

    assert_eq!(tree.position(child), Some(Vec2::new(10.0, 10.0)));
}

#[test]
fn test_disabled_children_are_skipped() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    let child = tree
        .insert_child(root, panel(), "child", rect(10.0, 10.0, 20.0, 20.0), 0)
        .unwrap();
    tree.enable(root, &mut router);
    tree.disable(child, &mut router);
    tree.update_tree(root, 0.0);

    // The disabled subtree kept its pending recomputes.
    assert!(tree.flags(child).unwrap().dirty_bits().is_dirty());

    tree.enable(child, &mut router);
    tree.update_tree(root, 0.0);
    assert!(tree.flags(child).unwrap().dirty_bits().is_empty());
}

#[test]
fn test_drawables_rebuild_only_when_requested() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(
        Box::new(Panel::new(Rgba::new(0.2, 0.2, 0.2, 1.0))),
        "root",
        rect(0.0, 0.0, 200.0, 100.0),
        0,
    );
    tree.enable(root, &mut router);
    tree.update_tree(root, 0.0);

    let mut list = DrawList::new();
    tree.collect_drawables(root, &mut list);
    assert_eq!(list.len(), 1);
    let DrawCommand::Quad(quad) = &list.commands()[0];
    assert_eq!(quad.node_id, root);
    assert_eq!(quad.size, Vec2::new(200.0, 100.0));

    // A position change invalidates the cache; the next pass rebuilds it
    // at the new coordinates.
    tree.set_position(root, Vec2::new(10.0, 0.0));
    assert!(
        tree.flags(root)
            .unwrap()
            .contains(WidgetFlags::NEEDS_DRAWABLE_RECALC)
    );
    tree.update_tree(root, 0.0);

    let mut list = DrawList::new();
    tree.collect_drawables(root, &mut list);
    let DrawCommand::Quad(quad) = &list.commands()[0];
    assert_eq!(quad.position, Vec2::new(10.0, 0.0));
}

#[test]
fn test_disabled_children_excluded_from_draw_collection() {
    let mut tree = WidgetTree::new();
    let mut router = InputRouter::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 200.0, 100.0), 0);
    let shown = tree
        .insert_child(root, panel(), "shown", rect(0.0, 0.0, 10.0, 10.0), 0)
        .unwrap();
    let hidden = tree
        .insert_child(root, panel(), "hidden", rect(0.0, 0.0, 10.0, 10.0), 1)
        .unwrap();
    tree.enable(root, &mut router);
    tree.update_tree(root, 0.0);
    tree.disable(hidden, &mut router);

    let mut list = DrawList::new();
    tree.collect_drawables(root, &mut list);

    let owners: Vec<NodeId> = list.commands().iter().map(|c| c.node_id()).collect();
    assert!(owners.contains(&shown));
    assert!(!owners.contains(&hidden));
}
