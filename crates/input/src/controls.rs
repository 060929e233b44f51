//! Device orientation controller.
//!
//! Listens for orientation samples and screen rotations on a
//! [`SensorPlatform`], turns them into a rotation and writes it to the
//! controlled object, then fires [`ControlEvent::Change`].

use gyrocam_common::{Orientable, RotationOrder};
use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::config::ControlsConfig;
use crate::platform::{SensorCallback, SensorChannel, SensorPlatform, SensorSignal, SubscriptionId};
use crate::registry::{ControlEvent, DispatchError, EventRegistry, Listener, dispatch};
use crate::sample::{AbsencePolicy, OrientationSample};
use crate::transform::AngleSet;

/// Errors from controller operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlsError {
    /// `update()` was reached again while a `change` pass was running.
    #[error("controller is already updating")]
    Reentrant,
    #[error(transparent)]
    Listener(#[from] DispatchError),
}

/// State shared between the controller and its sensor callbacks.
struct Core<T> {
    object: RefCell<T>,
    enabled: Cell<bool>,
    device_orientation: Cell<OrientationSample>,
    screen_orientation: Cell<i32>,
    alpha_offset: Cell<f64>,
    absence: AbsencePolicy,
    events: RefCell<EventRegistry<ControlEvent, T>>,
}

impl<T: Orientable> Core<T> {
    fn poll_screen<P: SensorPlatform + ?Sized>(&self, platform: &P) {
        self.screen_orientation
            .set(platform.screen_orientation().unwrap_or(0));
    }

    fn update(&self) -> Result<(), ControlsError> {
        if !self.enabled.get() {
            return Ok(());
        }

        let angles = AngleSet::resolve(
            &self.device_orientation.get(),
            self.screen_orientation.get(),
            self.alpha_offset.get(),
            self.absence,
        );
        let rotation = angles.quaternion();
        self.object
            .try_borrow_mut()
            .map_err(|_| ControlsError::Reentrant)?
            .set_quaternion(rotation);
        tracing::trace!(?angles, ?rotation, "orientation updated");

        // Listeners may add or remove listeners; they see this pass's list.
        let (listeners, policy) = {
            let events = self.events.borrow();
            (events.snapshot(ControlEvent::Change), events.policy())
        };
        let object = self.object.borrow();
        dispatch(ControlEvent::Change, &listeners, &*object, policy)?;
        Ok(())
    }
}

/// Drives an [`Orientable`] from device orientation sensors.
///
/// The object's rotation order is pinned to YXZ on construction. The
/// controller connects immediately and disconnects when dropped.
pub struct DeviceOrientationControls<T, P>
where
    T: Orientable + 'static,
    P: SensorPlatform + 'static,
{
    core: Rc<Core<T>>,
    platform: Rc<P>,
    subscriptions: Cell<Option<(SubscriptionId, SubscriptionId)>>,
}

impl<T, P> DeviceOrientationControls<T, P>
where
    T: Orientable + 'static,
    P: SensorPlatform + 'static,
{
    pub fn new(object: T, platform: Rc<P>) -> Self {
        Self::with_config(object, platform, ControlsConfig::default())
    }

    pub fn with_config(mut object: T, platform: Rc<P>, config: ControlsConfig) -> Self {
        object.set_rotation_order(RotationOrder::Yxz);
        let controls = Self {
            core: Rc::new(Core {
                object: RefCell::new(object),
                enabled: Cell::new(false),
                device_orientation: Cell::new(OrientationSample::default()),
                screen_orientation: Cell::new(0),
                alpha_offset: Cell::new(config.alpha_offset),
                absence: config.absence,
                events: RefCell::new(EventRegistry::with_policy(config.dispatch)),
            }),
            platform,
            subscriptions: Cell::new(None),
        };
        // No listeners can be registered yet, so the first pass cannot fail.
        if let Err(err) = controls.connect() {
            tracing::warn!(%err, "initial orientation update failed");
        }
        controls
    }

    /// Subscribe to the platform and run one update.
    ///
    /// Calling this while connected re-polls the screen orientation but
    /// does not subscribe a second time.
    pub fn connect(&self) -> Result<(), ControlsError> {
        self.core.poll_screen(&*self.platform);

        if self.subscriptions.get().is_none() {
            let screen = self
                .platform
                .subscribe(SensorChannel::ScreenOrientation, self.screen_callback());
            let device = self
                .platform
                .subscribe(SensorChannel::DeviceOrientation, self.device_callback());
            self.subscriptions.set(Some((screen, device)));
            tracing::debug!(
                screen_orientation = self.core.screen_orientation.get(),
                "orientation controls connected"
            );
        }

        self.core.enabled.set(true);
        self.core.update()
    }

    /// Unsubscribe from the platform and stop writing the object.
    /// Safe to call any number of times.
    pub fn disconnect(&self) {
        if let Some((screen, device)) = self.subscriptions.take() {
            self.platform.unsubscribe(screen);
            self.platform.unsubscribe(device);
            tracing::debug!("orientation controls disconnected");
        }
        self.core.enabled.set(false);
    }

    pub fn dispose(&self) {
        self.disconnect();
    }

    /// Recompute the rotation from the latest sample and fire `change`.
    /// Does nothing while disconnected.
    pub fn update(&self) -> Result<(), ControlsError> {
        self.core.update()
    }

    /// Set the alpha calibration (radians) and update.
    pub fn update_alpha_offset_angle(&self, angle: f64) -> Result<(), ControlsError> {
        self.core.alpha_offset.set(angle);
        self.core.update()
    }

    pub fn add_event_listener(&self, event: ControlEvent, listener: Listener<T>) {
        self.core.events.borrow_mut().add(event, listener);
    }

    /// Remove the first registration of `listener`. Returns false if it
    /// was not registered.
    pub fn remove_event_listener(&self, event: ControlEvent, listener: &Listener<T>) -> bool {
        self.core.events.borrow_mut().remove(event, listener)
    }

    pub fn listener_count(&self, event: ControlEvent) -> usize {
        self.core.events.borrow().listener_count(event)
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled.get()
    }

    pub fn is_connected(&self) -> bool {
        self.subscriptions.get().is_some()
    }

    pub fn screen_orientation(&self) -> i32 {
        self.core.screen_orientation.get()
    }

    pub fn device_orientation(&self) -> OrientationSample {
        self.core.device_orientation.get()
    }

    pub fn alpha_offset_angle(&self) -> f64 {
        self.core.alpha_offset.get()
    }

    /// Borrow the controlled object.
    ///
    /// # Panics
    /// If called while the controller is writing the rotation, which only
    /// happens inside `update()` before listeners run.
    pub fn object(&self) -> Ref<'_, T> {
        self.core.object.borrow()
    }

    fn device_callback(&self) -> SensorCallback {
        let core: Weak<Core<T>> = Rc::downgrade(&self.core);
        Rc::new(move |signal: &SensorSignal| {
            let (Some(core), SensorSignal::DeviceOrientation(sample)) = (core.upgrade(), signal)
            else {
                return;
            };
            core.device_orientation.set(*sample);
            if let Err(err) = core.update() {
                tracing::warn!(%err, "device orientation update failed");
            }
        })
    }

    fn screen_callback(&self) -> SensorCallback {
        let core: Weak<Core<T>> = Rc::downgrade(&self.core);
        let platform: Weak<P> = Rc::downgrade(&self.platform);
        Rc::new(move |_: &SensorSignal| {
            let (Some(core), Some(platform)) = (core.upgrade(), platform.upgrade()) else {
                return;
            };
            core.poll_screen(&*platform);
            if let Err(err) = core.update() {
                tracing::warn!(%err, "screen orientation update failed");
            }
        })
    }
}

impl<T, P> Drop for DeviceOrientationControls<T, P>
where
    T: Orientable + 'static,
    P: SensorPlatform + 'static,
{
    fn drop(&mut self) {
        self.disconnect();
    }
}
