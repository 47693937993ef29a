//! Before/after comparison slider and the pointer plumbing behind it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Divider position a freshly mounted view starts with.
pub const INITIAL_POSITION: f32 = 50.0;

/// Horizontal extent of the comparison container in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerBounds {
    pub left: f32,
    pub width: f32,
}

impl ContainerBounds {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }
}

/// Divider position (0–100) plus the dragging flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSlider {
    position: f32,
    dragging: bool,
}

impl Default for ComparisonSlider {
    fn default() -> Self {
        Self {
            position: INITIAL_POSITION,
            dragging: false,
        }
    }
}

impl ComparisonSlider {
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer pressed on the divider.
    pub fn pointer_down(&mut self) {
        self.dragging = true;
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Track the pointer while dragging. Returns whether the position changed.
    pub fn pointer_move(&mut self, client_x: f32, bounds: ContainerBounds) -> bool {
        if !self.dragging {
            return false;
        }
        self.seek(client_x, bounds)
    }

    /// Jump to the position under `client_x`, clamped to the container.
    pub fn seek(&mut self, client_x: f32, bounds: ContainerBounds) -> bool {
        if !(bounds.width > 0.0) || !client_x.is_finite() {
            return false;
        }
        let x = (client_x - bounds.left).clamp(0.0, bounds.width);
        let percent = (x / bounds.width * 100.0).clamp(0.0, 100.0);
        let changed = percent != self.position;
        self.position = percent;
        changed
    }

    /// Share of the width hidden on the right of the "before" image.
    pub fn before_clip_right(&self) -> f32 {
        100.0 - self.position
    }

    /// Screen x of the divider inside `bounds`.
    pub fn divider_x(&self, bounds: ContainerBounds) -> f32 {
        bounds.left + bounds.width * self.position / 100.0
    }
}

/// Document-level pointer and touch events.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    MouseMove { client_x: f32 },
    MouseUp,
    TouchMove { touches: Vec<f32> },
    TouchEnd,
}

type Listener = Rc<RefCell<dyn FnMut(&PointerEvent)>>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Source of document-level pointer events.
///
/// Listeners stay registered exactly as long as the [`PointerSubscription`]
/// returned by [`PointerHub::subscribe`] lives.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent) + 'static) -> PointerSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        inner.listeners.push((id, listener));
        PointerSubscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `event` to every listener registered when dispatch starts.
    pub fn dispatch(&self, event: &PointerEvent) {
        let snapshot: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            // A listener that re-enters dispatch is skipped for the nested event.
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Deregisters its listener when dropped.
pub struct PointerSubscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// A mounted comparison view: slider state plus its document listeners.
pub struct ComparisonView {
    slider: Rc<RefCell<ComparisonSlider>>,
    bounds: Rc<RefCell<ContainerBounds>>,
    _subscription: PointerSubscription,
}

impl ComparisonView {
    /// Attach to `hub` for as long as the returned view lives.
    pub fn mount(hub: &PointerHub) -> Self {
        let slider = Rc::new(RefCell::new(ComparisonSlider::default()));
        let bounds = Rc::new(RefCell::new(ContainerBounds::default()));

        let listener_slider = Rc::clone(&slider);
        let listener_bounds = Rc::clone(&bounds);
        let subscription = hub.subscribe(move |event| {
            let mut slider = listener_slider.borrow_mut();
            let bounds = *listener_bounds.borrow();
            match event {
                PointerEvent::MouseMove { client_x } => {
                    slider.pointer_move(*client_x, bounds);
                }
                PointerEvent::TouchMove { touches } => {
                    if let Some(first) = touches.first() {
                        slider.pointer_move(*first, bounds);
                    }
                }
                PointerEvent::MouseUp | PointerEvent::TouchEnd => slider.pointer_up(),
            }
        });

        Self {
            slider,
            bounds,
            _subscription: subscription,
        }
    }

    /// Record where the container was laid out this frame.
    pub fn set_bounds(&self, bounds: ContainerBounds) {
        *self.bounds.borrow_mut() = bounds;
    }

    pub fn bounds(&self) -> ContainerBounds {
        *self.bounds.borrow()
    }

    /// Pointer or touch pressed on the divider handle.
    pub fn grab_divider(&self) {
        self.slider.borrow_mut().pointer_down();
    }

    pub fn position(&self) -> f32 {
        self.slider.borrow().position()
    }

    pub fn is_dragging(&self) -> bool {
        self.slider.borrow().is_dragging()
    }

    pub fn before_clip_right(&self) -> f32 {
        self.slider.borrow().before_clip_right()
    }

    /// Screen x of the divider within the last recorded bounds.
    pub fn divider_x(&self) -> f32 {
        self.slider.borrow().divider_x(self.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ContainerBounds = ContainerBounds {
        left: 100.0,
        width: 400.0,
    };

    #[test]
    fn moves_only_while_dragging() {
        let mut slider = ComparisonSlider::default();
        assert!(!slider.pointer_move(200.0, BOUNDS));
        assert_eq!(slider.position(), INITIAL_POSITION);

        slider.pointer_down();
        assert!(slider.pointer_move(200.0, BOUNDS));
        assert_eq!(slider.position(), 25.0);

        slider.pointer_up();
        slider.pointer_move(450.0, BOUNDS);
        assert_eq!(slider.position(), 25.0);
    }

    #[test]
    fn position_is_clamped_outside_container() {
        let mut slider = ComparisonSlider::default();
        slider.pointer_down();
        for x in [-10_000.0, -1.0, 0.0, 99.9, 100.0, 300.0, 500.0, 500.1, 1e9, f32::MAX] {
            slider.pointer_move(x, BOUNDS);
            let p = slider.position();
            assert!((0.0..=100.0).contains(&p), "x={x} gave {p}");
        }
        slider.pointer_move(-50.0, BOUNDS);
        assert_eq!(slider.position(), 0.0);
        slider.pointer_move(9_999.0, BOUNDS);
        assert_eq!(slider.position(), 100.0);
        assert_eq!(slider.before_clip_right(), 0.0);
    }

    #[test]
    fn divider_follows_position() {
        let mut slider = ComparisonSlider::default();
        assert_eq!(slider.divider_x(BOUNDS), 300.0);
        slider.pointer_down();
        slider.pointer_move(200.0, BOUNDS);
        assert_eq!(slider.divider_x(BOUNDS), 200.0);
    }

    #[test]
    fn degenerate_bounds_leave_position_alone() {
        let mut slider = ComparisonSlider::default();
        slider.pointer_down();
        assert!(!slider.pointer_move(10.0, ContainerBounds::new(0.0, 0.0)));
        assert!(!slider.pointer_move(f32::NAN, BOUNDS));
        assert_eq!(slider.position(), INITIAL_POSITION);
    }

    #[test]
    fn view_listens_until_dropped() {
        let hub = PointerHub::new();
        let view = ComparisonView::mount(&hub);
        assert_eq!(hub.listener_count(), 1);

        view.set_bounds(BOUNDS);
        view.grab_divider();
        hub.dispatch(&PointerEvent::TouchMove {
            touches: vec![500.0, 120.0],
        });
        assert_eq!(view.position(), 100.0);
        assert_eq!(view.divider_x(), 500.0);

        hub.dispatch(&PointerEvent::TouchEnd);
        assert!(!view.is_dragging());
        hub.dispatch(&PointerEvent::MouseMove { client_x: 100.0 });
        assert_eq!(view.position(), 100.0);

        drop(view);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_may_be_dropped_inside_dispatch() {
        let hub = PointerHub::new();
        let holder: Rc<RefCell<Option<PointerSubscription>>> = Rc::new(RefCell::new(None));
        let inner_holder = Rc::clone(&holder);
        let subscription = hub.subscribe(move |event| {
            if *event == PointerEvent::MouseUp {
                inner_holder.borrow_mut().take();
            }
        });
        *holder.borrow_mut() = Some(subscription);

        hub.dispatch(&PointerEvent::MouseUp);
        assert_eq!(hub.listener_count(), 0);
    }
}
