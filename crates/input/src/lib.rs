//! Device orientation input: sensor samples mapped to a camera rotation.
//!
//! # Invariants
//! - The controlled object's rotation order is YXZ for the controller's lifetime.
//! - The object's rotation is only written by `update()`, and every write
//!   is followed by a `change` event.
//! - A disconnected controller never writes the object.

pub mod config;
pub mod controls;
pub mod platform;
pub mod registry;
pub mod sample;
pub mod transform;

pub use config::{ConfigError, ControlsConfig};
pub use controls::{ControlsError, DeviceOrientationControls};
pub use platform::{
    SensorCallback, SensorChannel, SensorPlatform, SensorSignal, SimulatedPlatform,
    SubscriptionId,
};
pub use registry::{
    ControlEvent, DispatchError, DispatchPolicy, EventRegistry, Listener, ListenerError,
    listener,
};
pub use sample::{AbsencePolicy, OrientationSample};
pub use transform::{AngleSet, CAMERA_OUT_BACK, orientation_quaternion};
