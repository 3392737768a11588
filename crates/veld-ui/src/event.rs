//! Pointer-event routing for widget interactions.
//!
//! The router is an explicit value injected wherever it is needed; there
//! is no ambient dispatcher. Widgets are subscribed while enabled
//! (`WidgetTree::enable`/`disable` keep the pairing exact) and each
//! subscribed widget runs its own enter/leave/press/click state machine
//! against its padded bounds.

use indexmap::IndexSet;
use tracing::trace;
use veld_core::alloc::HashSet;
use veld_core::math::Vec2;
use veld_core::profiling::profile_function;

use crate::dirty::WidgetFlags;
use crate::tree::{NodeId, WidgetTree};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A pointer event delivered by the external event source.
///
/// Coordinates are in viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    ButtonDown { x: f32, y: f32, button: MouseButton },
    ButtonUp { x: f32, y: f32, button: MouseButton },
    Motion { x: f32, y: f32 },
    /// The window or input context lost pointer focus; carries the last
    /// known pointer coordinates.
    FocusLost { x: f32, y: f32 },
}

/// Interaction event derived for a single widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEventKind {
    /// Pointer crossed into the padded bounds.
    Enter,
    /// Pointer crossed out of the padded bounds (or focus was lost while
    /// inside).
    Leave,
    /// Pointer moved while inside the padded bounds.
    Move,
    /// Button pressed while the pointer was inside.
    Down,
    /// Button released while the pointer was inside.
    Up,
    /// Press and release both happened inside; fires after `Up`.
    Click,
}

/// An interaction event emitted for a subscribed widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetEvent {
    pub node: NodeId,
    pub kind: WidgetEventKind,
    pub x: f32,
    pub y: f32,
    /// Set for `Down`/`Up`/`Click`.
    pub button: Option<MouseButton>,
}

/// Routes pointer events to subscribed, enabled widgets.
///
/// Delivery order is subscription order. Derived [`WidgetEvent`]s queue up
/// in the router and are drained by the caller once per frame.
#[derive(Default)]
pub struct InputRouter {
    subscriptions: IndexSet<NodeId>,
    events: Vec<WidgetEvent>,
    /// Last pointer position seen, in viewport coordinates.
    pointer_pos: Vec2,
    /// Buttons currently held down.
    pressed: HashSet<MouseButton>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pointer position delivered through [`dispatch`](Self::dispatch).
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_pos
    }

    /// Check whether a mouse button is currently held down.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Register a widget for event delivery. Idempotent; returns `true`
    /// when the widget was not already subscribed.
    pub fn subscribe(&mut self, id: NodeId) -> bool {
        let inserted = self.subscriptions.insert(id);
        if inserted {
            trace!(?id, "input subscription added");
        }
        inserted
    }

    /// Release a widget's subscription. Idempotent; returns `true` when
    /// the widget was subscribed.
    pub fn unsubscribe(&mut self, id: NodeId) -> bool {
        let removed = self.subscriptions.shift_remove(&id);
        if removed {
            trace!(?id, "input subscription released");
        }
        removed
    }

    pub fn is_subscribed(&self, id: NodeId) -> bool {
        self.subscriptions.contains(&id)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver one pointer event to every subscribed, enabled widget.
    pub fn dispatch(&mut self, tree: &mut WidgetTree, event: PointerEvent) {
        profile_function!();

        match event {
            PointerEvent::Motion { x, y } => self.pointer_pos = Vec2::new(x, y),
            PointerEvent::ButtonDown { x, y, button } => {
                self.pointer_pos = Vec2::new(x, y);
                self.pressed.insert(button);
            }
            PointerEvent::ButtonUp { x, y, button } => {
                self.pointer_pos = Vec2::new(x, y);
                self.pressed.remove(&button);
            }
            // Held buttons are released out of sight while focus is gone.
            PointerEvent::FocusLost { .. } => self.pressed.clear(),
        }

        let targets: Vec<NodeId> = self.subscriptions.iter().copied().collect();
        for id in targets {
            if !tree.is_enabled(id) {
                continue;
            }
            match event {
                PointerEvent::Motion { x, y } => self.route_motion(tree, id, x, y),
                PointerEvent::ButtonDown { x, y, button } => {
                    self.route_button_down(tree, id, x, y, button)
                }
                PointerEvent::ButtonUp { x, y, button } => {
                    self.route_button_up(tree, id, x, y, button)
                }
                PointerEvent::FocusLost { x, y } => self.route_focus_lost(tree, id, x, y),
            }
        }
    }

    /// Take all widget events emitted since the last drain, in emission
    /// order.
    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, node: NodeId, kind: WidgetEventKind, x: f32, y: f32) {
        self.events.push(WidgetEvent {
            node,
            kind,
            x,
            y,
            button: None,
        });
    }

    fn emit_button(
        &mut self,
        node: NodeId,
        kind: WidgetEventKind,
        x: f32,
        y: f32,
        button: MouseButton,
    ) {
        self.events.push(WidgetEvent {
            node,
            kind,
            x,
            y,
            button: Some(button),
        });
    }

    fn route_motion(&mut self, tree: &mut WidgetTree, id: NodeId, x: f32, y: f32) {
        if tree.is_in_bounds(id, x, y) {
            if !tree.flag(id, WidgetFlags::MOUSE_IN) {
                tree.set_flag(id, WidgetFlags::MOUSE_IN, true);
                self.emit(id, WidgetEventKind::Enter, x, y);
            }
            self.emit(id, WidgetEventKind::Move, x, y);
        } else if tree.flag(id, WidgetFlags::MOUSE_IN) {
            tree.set_flag(id, WidgetFlags::MOUSE_IN, false);
            self.emit(id, WidgetEventKind::Leave, x, y);
        }
    }

    fn route_button_down(
        &mut self,
        tree: &mut WidgetTree,
        id: NodeId,
        x: f32,
        y: f32,
        button: MouseButton,
    ) {
        if tree.flag(id, WidgetFlags::MOUSE_IN) {
            self.emit_button(id, WidgetEventKind::Down, x, y, button);
            tree.set_flag(id, WidgetFlags::CLICKING, true);
        }
    }

    fn route_button_up(
        &mut self,
        tree: &mut WidgetTree,
        id: NodeId,
        x: f32,
        y: f32,
        button: MouseButton,
    ) {
        if tree.flag(id, WidgetFlags::MOUSE_IN) {
            self.emit_button(id, WidgetEventKind::Up, x, y, button);
            if tree.flag(id, WidgetFlags::CLICKING) {
                self.emit_button(id, WidgetEventKind::Click, x, y, button);
            }
        }
        tree.set_flag(id, WidgetFlags::CLICKING, false);
    }

    fn route_focus_lost(&mut self, tree: &mut WidgetTree, id: NodeId, x: f32, y: f32) {
        if tree.flag(id, WidgetFlags::MOUSE_IN) {
            tree.set_flag(id, WidgetFlags::MOUSE_IN, false);
            // Synthetic leave at the last known coordinates; never a click.
            self.emit(id, WidgetEventKind::Leave, x, y);
        }
        tree.set_flag(id, WidgetFlags::CLICKING, false);
    }
}
