//! The host sensor seam.
//!
//! A [`SensorPlatform`] delivers device orientation samples and screen
//! rotation notices to subscribed callbacks, and answers screen orientation
//! queries on demand. [`SimulatedPlatform`] is an in-memory host for tests
//! and trace replay.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use uuid::Uuid;

use crate::sample::OrientationSample;

/// Which stream a callback is subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorChannel {
    DeviceOrientation,
    ScreenOrientation,
}

/// Payload delivered to a callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorSignal {
    DeviceOrientation(OrientationSample),
    /// The screen rotated. The new angle is read via
    /// [`SensorPlatform::screen_orientation`].
    ScreenOrientationChanged,
}

impl SensorSignal {
    pub fn channel(&self) -> SensorChannel {
        match self {
            Self::DeviceOrientation(_) => SensorChannel::DeviceOrientation,
            Self::ScreenOrientationChanged => SensorChannel::ScreenOrientation,
        }
    }
}

pub type SensorCallback = Rc<dyn Fn(&SensorSignal)>;

/// Handle returned by [`SensorPlatform::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

pub trait SensorPlatform {
    /// Current screen rotation in degrees, if the host reports one.
    fn screen_orientation(&self) -> Option<i32>;

    fn subscribe(&self, channel: SensorChannel, callback: SensorCallback) -> SubscriptionId;

    /// Drop a subscription. Unknown or already removed ids are ignored
    /// and return false.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

struct Subscription {
    id: SubscriptionId,
    channel: SensorChannel,
    callback: SensorCallback,
}

/// In-memory sensor host.
#[derive(Default)]
pub struct SimulatedPlatform {
    screen: Cell<Option<i32>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen_orientation(degrees: i32) -> Self {
        let platform = Self::new();
        platform.screen.set(Some(degrees));
        platform
    }

    /// Change the reported screen angle without notifying anyone.
    pub fn set_screen_orientation(&self, degrees: Option<i32>) {
        self.screen.set(degrees);
    }

    /// Change the screen angle and notify screen subscribers.
    pub fn rotate_screen(&self, degrees: i32) -> usize {
        self.screen.set(Some(degrees));
        self.emit(SensorSignal::ScreenOrientationChanged)
    }

    /// Deliver a device orientation sample. Returns how many callbacks ran.
    pub fn emit_orientation(&self, sample: OrientationSample) -> usize {
        self.emit(SensorSignal::DeviceOrientation(sample))
    }

    pub fn emit(&self, signal: SensorSignal) -> usize {
        let channel = signal.channel();
        // Callbacks may subscribe or unsubscribe while we iterate.
        let callbacks: Vec<SensorCallback> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| s.callback.clone())
            .collect();
        for callback in &callbacks {
            callback(&signal);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self, channel: SensorChannel) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .count()
    }

    /// Callbacks currently subscribed to `channel`, in subscription order.
    pub fn callbacks(&self, channel: SensorChannel) -> Vec<SensorCallback> {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| s.callback.clone())
            .collect()
    }
}

impl SensorPlatform for SimulatedPlatform {
    fn screen_orientation(&self) -> Option<i32> {
        self.screen.get()
    }

    fn subscribe(&self, channel: SensorChannel, callback: SensorCallback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            channel,
            callback,
        });
        tracing::trace!(?channel, ?id, "subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        match subs.iter().position(|s| s.id == id) {
            Some(index) => {
                subs.remove(index);
                true
            }
            None => false,
        }
    }
}
