use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::core::tolerance::SpanLimits;
use crate::core::types::{Affine, Bounds, DeviceExtents, ViewportConfig, ViewportSnapshot};
use crate::core::viewport_events::{
    ListenerFilter, ListenerId, ListenerRegistry, ViewportEvent, WindowChange,
};
use crate::error::{ChartError, ChartResult};

/// Where a viewport reads its window from.
enum Binding {
    Independent,
    MirrorOf {
        source: Viewport,
        forwarder: ListenerId,
    },
}

struct ViewportInner {
    /// Own state; while mirroring, `bounds` is stale and `device_extents`
    /// holds the last host-reported size.
    own: ViewportSnapshot,
    span_limits: SpanLimits,
    binding: Binding,
    listeners: ListenerRegistry,
}

impl Drop for ViewportInner {
    fn drop(&mut self) {
        if let Binding::MirrorOf { source, forwarder } = &self.binding {
            source.remove_listener(*forwarder);
        }
    }
}

/// Affine mapping between a virtual window and a device rectangle.
///
/// `Viewport` is a shared handle: clones refer to the same viewport, which
/// is how a host widget and its collaborators observe one window. It is
/// single-threaded by construction.
///
/// Listener callbacks may read from the viewport that notifies them but must
/// not mutate it synchronously.
#[derive(Clone)]
pub struct Viewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl Viewport {
    /// Creates a viewport over the centered square `(-1, 1, -1, 1)` with
    /// zero device extents.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(ViewportConfig::default())
    }

    pub fn with_config(config: ViewportConfig) -> ChartResult<Self> {
        Ok(Self::from_parts(config.validate()?))
    }

    pub fn from_bounds(left: f64, right: f64, bottom: f64, top: f64) -> ChartResult<Self> {
        Self::with_config(ViewportConfig::default().with_bounds(Bounds::new(left, right, bottom, top)))
    }

    fn from_parts(config: ViewportConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewportInner {
                own: ViewportSnapshot::new(config.bounds, config.device_extents),
                span_limits: config.span_limits,
                binding: Binding::Independent,
                listeners: ListenerRegistry::default(),
            })),
        }
    }

    /// Returns `true` when both handles refer to the same viewport.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Current bounds, extents and mapping, resolved through any binding.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        let inner = self.inner.borrow();
        match &inner.binding {
            Binding::Independent => inner.own,
            Binding::MirrorOf { source, .. } => source.snapshot(),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.snapshot().bounds
    }

    #[must_use]
    pub fn device_extents(&self) -> DeviceExtents {
        self.snapshot().device_extents
    }

    #[must_use]
    pub fn affine(&self) -> Affine {
        self.snapshot().affine
    }

    #[must_use]
    pub fn span_limits(&self) -> SpanLimits {
        self.inner.borrow().span_limits
    }

    /// Replaces the span limits used to validate future mutations.
    ///
    /// Current bounds are left untouched even if they fall outside the new limits.
    pub fn set_span_limits(&self, limits: SpanLimits) -> ChartResult<()> {
        let limits = limits.validate()?;
        self.inner.borrow_mut().span_limits = limits;
        Ok(())
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.inner.borrow().binding, Binding::MirrorOf { .. })
    }

    /// The viewport this one mirrors, if bound.
    #[must_use]
    pub fn binding_source(&self) -> Option<Viewport> {
        match &self.inner.borrow().binding {
            Binding::Independent => None,
            Binding::MirrorOf { source, .. } => Some(source.clone()),
        }
    }

    #[must_use]
    pub fn map_to_device_x(&self, value: f64) -> f64 {
        self.affine().x.to_device(value)
    }

    #[must_use]
    pub fn map_to_device_y(&self, value: f64) -> f64 {
        self.affine().y.to_device(value)
    }

    #[must_use]
    pub fn map_to_virtual_x(&self, device: f64) -> f64 {
        self.affine().x.to_virtual(device)
    }

    #[must_use]
    pub fn map_to_virtual_y(&self, device: f64) -> f64 {
        self.affine().y.to_virtual(device)
    }

    /// Applies several edits as one transaction.
    ///
    /// The mapping is recomputed once and at most one event fires. If `edit`
    /// returns an error nothing is committed.
    pub fn batch<F>(&self, edit: F) -> ChartResult<WindowChange>
    where
        F: FnOnce(&mut ViewportEditor) -> ChartResult<()>,
    {
        let mut editor = {
            let inner = self.inner.borrow();
            if matches!(inner.binding, Binding::MirrorOf { .. }) {
                return Err(ChartError::ViewportBound);
            }
            ViewportEditor {
                bounds: inner.own.bounds,
                device_extents: inner.own.device_extents,
                span_limits: inner.span_limits,
            }
        };
        edit(&mut editor)?;

        let (before, after) = {
            let mut inner = self.inner.borrow_mut();
            if matches!(inner.binding, Binding::MirrorOf { .. }) {
                return Err(ChartError::ViewportBound);
            }
            let before = inner.own;
            inner.own = ViewportSnapshot::new(editor.bounds, editor.device_extents);
            (before, inner.own)
        };

        let change = WindowChange::between(&before, &after);
        if let Some(event) = change.event() {
            trace!(?event, "viewport changed");
            self.dispatch(event, &after);
        }
        Ok(change)
    }

    /// Sets both axes at once. Each axis is validated on its own, so a
    /// degenerate vertical span does not block a valid horizontal one.
    pub fn set_bounds(
        &self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
    ) -> ChartResult<WindowChange> {
        self.batch(|editor| {
            editor.set_horizontal(left, right);
            editor.set_vertical(bottom, top);
            Ok(())
        })
    }

    pub fn set_horizontal(&self, left: f64, right: f64) -> ChartResult<WindowChange> {
        self.batch(|editor| {
            editor.set_horizontal(left, right);
            Ok(())
        })
    }

    pub fn set_vertical(&self, bottom: f64, top: f64) -> ChartResult<WindowChange> {
        self.batch(|editor| {
            editor.set_vertical(bottom, top);
            Ok(())
        })
    }

    /// Records the host-measured device size.
    ///
    /// Fails with [`ChartError::ViewportBound`] while mirroring another
    /// viewport, whose extents are authoritative.
    pub fn set_device_extents(&self, width: f64, height: f64) -> ChartResult<WindowChange> {
        self.batch(|editor| editor.set_device_extents(width, height))
    }

    /// Scales both spans about a virtual pivot.
    ///
    /// `factor < 1` zooms in and `factor > 1` zooms out. Each axis is clamped
    /// to the span limits independently.
    pub fn zoom(&self, pivot_x: f64, pivot_y: f64, factor: f64) -> ChartResult<WindowChange> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !pivot_x.is_finite() || !pivot_y.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom pivot must be finite".to_owned(),
            ));
        }
        self.batch(|editor| {
            editor.zoom(pivot_x, pivot_y, factor);
            Ok(())
        })
    }

    /// Translates the window by virtual-space deltas.
    pub fn pan(&self, delta_x: f64, delta_y: f64) -> ChartResult<WindowChange> {
        self.batch(|editor| {
            editor.pan(delta_x, delta_y);
            Ok(())
        })
    }

    /// Mirrors `source`: bounds and device extents are read from it and its
    /// notifications are forwarded to this viewport's listeners.
    ///
    /// Rebinding replaces any previous source. Fires one
    /// [`ViewportEvent::WindowChanged`].
    pub fn bind(&self, source: &Viewport) -> ChartResult<()> {
        if self.ptr_eq(source) {
            return Err(ChartError::SelfBinding);
        }
        let mut cursor = source.binding_source();
        while let Some(next) = cursor {
            if next.ptr_eq(self) {
                return Err(ChartError::BindingCycle);
            }
            cursor = next.binding_source();
        }

        self.detach_forwarder();

        let weak: Weak<RefCell<ViewportInner>> = Rc::downgrade(&self.inner);
        let forwarder = source.register(
            ListenerFilter::All,
            Box::new(move |event, snapshot| {
                if let Some(inner) = weak.upgrade() {
                    Viewport { inner }.dispatch(event, snapshot);
                }
            }),
        );
        self.inner.borrow_mut().binding = Binding::MirrorOf {
            source: source.clone(),
            forwarder,
        };
        debug!("viewport bound to source");

        let snapshot = self.snapshot();
        self.dispatch(ViewportEvent::WindowChanged, &snapshot);
        Ok(())
    }

    /// Stops mirroring. Bounds keep their last mirrored values; device
    /// extents revert to this viewport's last host-reported size.
    pub fn unbind(&self) -> WindowChange {
        if !self.is_bound() {
            return WindowChange::default();
        }
        let mirrored = self.snapshot();
        self.detach_forwarder();

        let after = {
            let mut inner = self.inner.borrow_mut();
            inner.own = ViewportSnapshot::new(mirrored.bounds, inner.own.device_extents);
            inner.own
        };
        debug!("viewport unbound");

        let change = WindowChange::between(&mirrored, &after);
        if let Some(event) = change.event() {
            self.dispatch(event, &after);
        }
        change
    }

    pub fn on_horizontal_change<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(ViewportEvent, &ViewportSnapshot) + 'static,
    {
        self.register(
            ListenerFilter::Only(ViewportEvent::HorizontalChanged),
            Box::new(callback),
        )
    }

    pub fn on_vertical_change<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(ViewportEvent, &ViewportSnapshot) + 'static,
    {
        self.register(
            ListenerFilter::Only(ViewportEvent::VerticalChanged),
            Box::new(callback),
        )
    }

    pub fn on_window_change<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(ViewportEvent, &ViewportSnapshot) + 'static,
    {
        self.register(
            ListenerFilter::Only(ViewportEvent::WindowChanged),
            Box::new(callback),
        )
    }

    /// Registers a listener for every event kind.
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(ViewportEvent, &ViewportSnapshot) + 'static,
    {
        self.register(ListenerFilter::All, Box::new(callback))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn register(
        &self,
        filter: ListenerFilter,
        callback: crate::core::viewport_events::ListenerCallback,
    ) -> ListenerId {
        self.inner.borrow_mut().listeners.insert(filter, callback)
    }

    fn detach_forwarder(&self) {
        let previous =
            std::mem::replace(&mut self.inner.borrow_mut().binding, Binding::Independent);
        if let Binding::MirrorOf { source, forwarder } = previous {
            source.remove_listener(forwarder);
        }
    }

    fn dispatch(&self, event: ViewportEvent, snapshot: &ViewportSnapshot) {
        let batch = self.inner.borrow_mut().listeners.begin_dispatch();
        let Some(mut batch) = batch else {
            return;
        };
        batch.notify(event, snapshot);
        self.inner.borrow_mut().listeners.end_dispatch(batch);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("snapshot", &self.snapshot())
            .field("bound", &self.is_bound())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Uncommitted edits inside [`Viewport::batch`].
///
/// Field edits here never notify; the enclosing batch diffs the result.
#[derive(Debug, Clone, Copy)]
pub struct ViewportEditor {
    bounds: Bounds,
    device_extents: DeviceExtents,
    span_limits: SpanLimits,
}

impl ViewportEditor {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn device_extents(&self) -> DeviceExtents {
        self.device_extents
    }

    /// Returns `false` and keeps the prior values if the span is rejected.
    pub fn set_horizontal(&mut self, left: f64, right: f64) -> bool {
        if !self.span_limits.accepts(left, right) {
            debug!(left, right, "rejected horizontal span");
            return false;
        }
        self.bounds.left = left;
        self.bounds.right = right;
        true
    }

    /// Returns `false` and keeps the prior values if the span is rejected.
    pub fn set_vertical(&mut self, bottom: f64, top: f64) -> bool {
        if !self.span_limits.accepts(bottom, top) {
            debug!(bottom, top, "rejected vertical span");
            return false;
        }
        self.bounds.bottom = bottom;
        self.bounds.top = top;
        true
    }

    pub fn set_device_extents(&mut self, width: f64, height: f64) -> ChartResult<()> {
        self.device_extents = DeviceExtents::new(width, height).validate()?;
        Ok(())
    }

    pub fn zoom(&mut self, pivot_x: f64, pivot_y: f64, factor: f64) {
        let (left, right) = self.zoomed(self.bounds.left, self.bounds.right, pivot_x, factor);
        self.set_horizontal(left, right);
        let (bottom, top) = self.zoomed(self.bounds.bottom, self.bounds.top, pivot_y, factor);
        self.set_vertical(bottom, top);
    }

    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        let bounds = self.bounds;
        self.set_horizontal(bounds.left + delta_x, bounds.right + delta_x);
        self.set_vertical(bounds.bottom + delta_y, bounds.top + delta_y);
    }

    fn zoomed(&self, start: f64, end: f64, pivot: f64, factor: f64) -> (f64, f64) {
        let span = (end - start).abs();
        let ratio = self.span_limits.clamp_span(span * factor) / span;
        self.span_limits.fit_span(
            pivot + (start - pivot) * ratio,
            pivot + (end - pivot) * ratio,
            end >= start,
        )
    }
}
