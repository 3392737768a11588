//! Integration tests for the docking pass.

use veld_core::geometry::Rect;
use veld_core::math::Vec2;
use veld_ui::{Dock, DockState, NodeId, Panel, Rgba, WidgetFlags, WidgetTree};

fn panel() -> Box<Panel> {
    Box::new(Panel::new(Rgba::WHITE))
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect<f32> {
    Rect::new(x, y, w, h)
}

fn docked_child(tree: &mut WidgetTree, parent: NodeId, name: &str, dock: Dock) -> NodeId {
    let id = tree
        .insert_child(parent, panel(), name, rect(0.0, 0.0, 0.0, 0.0), 0)
        .unwrap();
    tree.set_dock(id, dock);
    id
}

#[test]
fn test_left_right_fill_partition() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let left = docked_child(&mut tree, root, "left", Dock::new(DockState::Left, 20.0));
    let right = docked_child(&mut tree, root, "right", Dock::new(DockState::Right, 30.0));
    let fill = docked_child(&mut tree, root, "fill", Dock::new(DockState::Fill, 0.0));

    tree.update(root, 0.0);

    assert_eq!(tree.position(left), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(tree.size(left), Some(Vec2::new(20.0, 50.0)));

    // Right-docked children take space from the far edge without
    // shifting the left-fill accounting.
    assert_eq!(tree.position(right), Some(Vec2::new(70.0, 0.0)));
    assert_eq!(tree.size(right), Some(Vec2::new(30.0, 50.0)));

    assert_eq!(tree.position(fill), Some(Vec2::new(20.0, 0.0)));
    assert_eq!(tree.size(fill), Some(Vec2::new(50.0, 50.0)));
}

#[test]
fn test_top_bottom_fill_partition() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let top = docked_child(&mut tree, root, "top", Dock::new(DockState::Top, 10.0));
    let bottom = docked_child(&mut tree, root, "bottom", Dock::new(DockState::Bottom, 15.0));
    let fill = docked_child(&mut tree, root, "fill", Dock::new(DockState::Fill, 0.0));

    tree.update(root, 0.0);

    assert_eq!(tree.position(top), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(tree.size(top), Some(Vec2::new(100.0, 10.0)));

    assert_eq!(tree.position(bottom), Some(Vec2::new(0.0, 35.0)));
    assert_eq!(tree.size(bottom), Some(Vec2::new(100.0, 15.0)));

    assert_eq!(tree.position(fill), Some(Vec2::new(0.0, 10.0)));
    assert_eq!(tree.size(fill), Some(Vec2::new(100.0, 25.0)));
}

#[test]
fn test_oversized_dock_clamps_to_surplus() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let greedy = docked_child(&mut tree, root, "greedy", Dock::new(DockState::Left, 150.0));
    let starved = docked_child(&mut tree, root, "starved", Dock::new(DockState::Left, 10.0));

    tree.update(root, 0.0);

    assert_eq!(tree.size(greedy), Some(Vec2::new(100.0, 50.0)));
    assert_eq!(tree.position(greedy), Some(Vec2::new(0.0, 0.0)));

    // Width surplus is gone but height remains, so the child still gets
    // a zero-width strip at the fill offset rather than collapsing.
    assert_eq!(tree.size(starved), Some(Vec2::new(0.0, 50.0)));
    assert_eq!(tree.position(starved), Some(Vec2::new(100.0, 0.0)));
}

#[test]
fn test_docked_siblings_after_fill_collapse() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let fill = docked_child(&mut tree, root, "fill", Dock::new(DockState::Fill, 0.0));
    let late = docked_child(&mut tree, root, "late", Dock::new(DockState::Left, 10.0));

    tree.update(root, 0.0);

    assert_eq!(tree.size(fill), Some(Vec2::new(100.0, 50.0)));
    assert_eq!(tree.size(late), Some(Vec2::new(0.0, 0.0)));
}

#[test]
fn test_undocked_children_are_untouched() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let floating = tree
        .insert_child(root, panel(), "floating", rect(5.0, 6.0, 7.0, 8.0), 0)
        .unwrap();
    let _fill = docked_child(&mut tree, root, "fill", Dock::new(DockState::Fill, 0.0));

    tree.update(root, 0.0);

    assert_eq!(tree.position(floating), Some(Vec2::new(5.0, 6.0)));
    assert_eq!(tree.size(floating), Some(Vec2::new(7.0, 8.0)));
}

#[test]
fn test_dock_change_redirties_arranging_parent() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let child = tree
        .insert_child(root, panel(), "child", rect(0.0, 0.0, 10.0, 10.0), 0)
        .unwrap();
    tree.update(root, 0.0);
    assert!(
        !tree
            .flags(root)
            .unwrap()
            .contains(WidgetFlags::NEEDS_DOCK_RECALC)
    );

    tree.set_dock_state(child, DockState::Left);
    tree.set_dock_size(child, 25.0);
    assert!(
        tree.flags(root)
            .unwrap()
            .contains(WidgetFlags::NEEDS_DOCK_RECALC)
    );

    tree.update(root, 0.0);
    assert_eq!(tree.size(child), Some(Vec2::new(25.0, 50.0)));
}

#[test]
fn test_reorder_rearranges_docked_children() {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(panel(), "root", rect(0.0, 0.0, 100.0, 50.0), 0);
    let first = tree
        .insert_child(root, panel(), "first", rect(0.0, 0.0, 0.0, 0.0), 1)
        .unwrap();
    tree.set_dock(first, Dock::new(DockState::Left, 20.0));
    let second = tree
        .insert_child(root, panel(), "second", rect(0.0, 0.0, 0.0, 0.0), 2)
        .unwrap();
    tree.set_dock(second, Dock::new(DockState::Left, 20.0));

    tree.update(root, 0.0);
    assert_eq!(tree.position(first), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(tree.position(second), Some(Vec2::new(20.0, 0.0)));

    // Swapping the z-order swaps who packs first; the reorder re-dirties
    // docking within the same update call.
    tree.set_z_index(first, 3);
    tree.update(root, 0.0);
    assert_eq!(tree.children(root), &[second, first]);
    assert_eq!(tree.position(second), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(tree.position(first), Some(Vec2::new(20.0, 0.0)));
}
