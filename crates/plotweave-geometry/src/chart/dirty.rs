//! Dirty tracking for chart viewers.

bitflags::bitflags! {
    /// What changed since the last rendered frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChartDirtyFlags: u8 {
        /// A definition set was reconciled and something visible changed.
        const DEFINITIONS_CHANGED = 0b0000_0001;
        /// Axis ranges or scales changed.
        const VIEW_CHANGED = 0b0000_0010;
        /// The plot area was resized.
        const BOUNDS_CHANGED = 0b0000_0100;
    }
}

impl ChartDirtyFlags {
    /// Check if a frame needs to be painted.
    pub fn needs_render(&self) -> bool {
        !self.is_empty()
    }

    /// Check if the data extents may have moved.
    pub fn needs_bounds_update(&self) -> bool {
        self.contains(Self::DEFINITIONS_CHANGED)
    }

    /// Check if only the view changed (no renderer redraw needed).
    pub fn is_view_only(&self) -> bool {
        !self.is_empty() && !self.contains(Self::DEFINITIONS_CHANGED)
    }
}
