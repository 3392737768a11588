//! Per-widget flag tracking for incremental updates.

use bitflags::bitflags;

bitflags! {
    /// Dirty and interaction flags for a widget node.
    ///
    /// The five `NEEDS_*` bits mark cached derived state as stale; each is
    /// cleared immediately before its recompute runs so a recompute that
    /// re-dirties itself produces bounded repeated work instead of
    /// recursion. The remaining bits are interaction state that update
    /// passes must preserve.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u16 {
        /// Position/size need the per-kind dimension pass.
        const NEEDS_DIMENSION_UPDATE  = 1 << 0;
        /// Children must be re-sorted by z-index.
        const NEEDS_Z_INDEX_REORDER   = 1 << 1;
        /// Docked children must be re-arranged.
        const NEEDS_DOCK_RECALC       = 1 << 2;
        /// The clip rectangle must be recomposed against the parent.
        const NEEDS_CLIP_RECT_RECALC  = 1 << 3;
        /// The cached drawable list must be rebuilt.
        const NEEDS_DRAWABLE_RECALC   = 1 << 4;

        /// Widget participates in updates and input delivery.
        const ENABLED       = 1 << 5;
        /// Pointer is currently inside the padded bounds.
        const MOUSE_IN      = 1 << 6;
        /// A press started inside and has not been released.
        const CLICKING      = 1 << 7;
        /// Skip the parent child-offset translation for this widget.
        const IGNORE_OFFSET = 1 << 8;

        /// All recompute-request bits.
        const DIRTY_MASK = Self::NEEDS_DIMENSION_UPDATE.bits()
            | Self::NEEDS_Z_INDEX_REORDER.bits()
            | Self::NEEDS_DOCK_RECALC.bits()
            | Self::NEEDS_CLIP_RECT_RECALC.bits()
            | Self::NEEDS_DRAWABLE_RECALC.bits();

        /// The recompute set forced on a child when it is attached, and
        /// marked on one when it is detached: dimension, dock and clip,
        /// but not drawables.
        const SETTLE = Self::NEEDS_DIMENSION_UPDATE.bits()
            | Self::NEEDS_DOCK_RECALC.bits()
            | Self::NEEDS_CLIP_RECT_RECALC.bits();
    }
}

impl WidgetFlags {
    /// Returns true if any recompute is pending.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.intersects(Self::DIRTY_MASK)
    }

    /// The recompute-request bits only.
    #[inline]
    pub fn dirty_bits(&self) -> Self {
        *self & Self::DIRTY_MASK
    }

    /// The interaction bits only.
    #[inline]
    pub fn interaction_bits(&self) -> Self {
        *self - Self::DIRTY_MASK
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::empty()
    }
}
