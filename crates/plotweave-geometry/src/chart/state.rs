//! Observable view state.
//!
//! [`ViewState`] holds what the host can change between frames: the visible
//! axis ranges and scales, the plot area and the cursor. Every setter that
//! actually changes a value publishes a [`StateChange`] to the subscribed
//! listeners, in subscription order.

use super::clip::ClipRegion;
use super::scale::{AxisRange, PlotTransform, ScaleType};
use glam::DVec2;

/// Which view field changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewField {
    XRange,
    YRange,
    XScale,
    YScale,
    PlotArea,
    Cursor,
}

/// A snapshot of one view field's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewValue {
    Range(AxisRange),
    Scale(ScaleType),
    Area(ClipRegion),
    Cursor(Option<DVec2>),
}

/// Published whenever a view field changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateChange {
    pub field: ViewField,
    pub old: ViewValue,
    pub new: ViewValue,
}

/// Identifies a subscription for [`ViewState::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StateChange)>;

/// View ranges, scales, plot area and cursor, with change listeners.
pub struct ViewState {
    x_range: AxisRange,
    y_range: AxisRange,
    x_scale: ScaleType,
    y_scale: ScaleType,
    plot_area: ClipRegion,
    cursor: Option<DVec2>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            x_range: AxisRange::default(),
            y_range: AxisRange::default(),
            x_scale: ScaleType::Linear,
            y_scale: ScaleType::Linear,
            plot_area: ClipRegion::default(),
            cursor: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("x_range", &self.x_range)
            .field("y_range", &self.y_range)
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("plot_area", &self.plot_area)
            .field("cursor", &self.cursor)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_range(&self) -> AxisRange {
        self.x_range
    }

    pub fn y_range(&self) -> AxisRange {
        self.y_range
    }

    pub fn x_scale(&self) -> ScaleType {
        self.x_scale
    }

    pub fn y_scale(&self) -> ScaleType {
        self.y_scale
    }

    pub fn plot_area(&self) -> ClipRegion {
        self.plot_area
    }

    pub fn cursor(&self) -> Option<DVec2> {
        self.cursor
    }

    /// Data-to-screen transform for the current view.
    pub fn transform(&self) -> PlotTransform {
        PlotTransform::new(self.x_range, self.y_range, self.x_scale, self.y_scale, &self.plot_area)
    }

    pub fn set_x_range(&mut self, range: AxisRange) -> bool {
        let old = std::mem::replace(&mut self.x_range, range);
        self.publish(ViewField::XRange, ViewValue::Range(old), ViewValue::Range(range))
    }

    pub fn set_y_range(&mut self, range: AxisRange) -> bool {
        let old = std::mem::replace(&mut self.y_range, range);
        self.publish(ViewField::YRange, ViewValue::Range(old), ViewValue::Range(range))
    }

    pub fn set_x_scale(&mut self, scale: ScaleType) -> bool {
        let old = std::mem::replace(&mut self.x_scale, scale);
        self.publish(ViewField::XScale, ViewValue::Scale(old), ViewValue::Scale(scale))
    }

    pub fn set_y_scale(&mut self, scale: ScaleType) -> bool {
        let old = std::mem::replace(&mut self.y_scale, scale);
        self.publish(ViewField::YScale, ViewValue::Scale(old), ViewValue::Scale(scale))
    }

    pub fn set_plot_area(&mut self, area: ClipRegion) -> bool {
        let old = std::mem::replace(&mut self.plot_area, area);
        self.publish(ViewField::PlotArea, ViewValue::Area(old), ViewValue::Area(area))
    }

    pub fn set_cursor(&mut self, cursor: Option<DVec2>) -> bool {
        let old = std::mem::replace(&mut self.cursor, cursor);
        self.publish(ViewField::Cursor, ViewValue::Cursor(old), ViewValue::Cursor(cursor))
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop every listener.
    pub fn dispose(&mut self) {
        self.listeners.clear();
    }

    fn publish(&mut self, field: ViewField, old: ViewValue, new: ViewValue) -> bool {
        if old == new {
            return false;
        }
        let change = StateChange { field, old, new };
        tracing::trace!(?field, "view changed");
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
        true
    }
}
