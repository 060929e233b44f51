//! Recorded sensor traces and their replay through the controller.

use anyhow::{Context, Result, bail};
use gyrocam_common::OrientedObject;
use gyrocam_input::{
    ControlEvent, ControlsConfig, DeviceOrientationControls, OrientationSample, SimulatedPlatform,
    listener,
};
use gyrocam_tools::{OrientationInspector, OrientationSummary};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// One step of a recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    /// A device orientation sample arrived.
    Orientation(OrientationSample),
    /// The screen rotated to `degrees` (absent = platform reports nothing).
    Screen {
        #[serde(default)]
        degrees: Option<i32>,
    },
    /// The user recalibrated the compass heading.
    AlphaOffset { radians: f64 },
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Screen angle reported when the controller is created.
    #[serde(default)]
    pub screen: Option<i32>,
    /// Events are written as single-key maps (`- orientation: {...}`) or
    /// bare names for unit variants (`- disconnect`).
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading trace {}", path.display()))?;
        let trace = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&data)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&data)?,
            other => bail!("unsupported trace format: {}", other.unwrap_or("<none>")),
        };
        Ok(trace)
    }
}

/// Feed a trace through a controller and collect a summary for every
/// `change` event, including the one fired on construction.
pub fn replay(trace: &Trace, config: ControlsConfig) -> Result<Vec<OrientationSummary>> {
    let platform = Rc::new(SimulatedPlatform::new());
    platform.set_screen_orientation(trace.screen);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let controls = DeviceOrientationControls::with_config(
        OrientedObject::new(),
        platform.clone(),
        config,
    );
    // The construction pass ran before any listener could attach.
    seen.borrow_mut()
        .push(OrientationInspector::summary(&*controls.object()));

    let sink = seen.clone();
    controls.add_event_listener(
        ControlEvent::Change,
        listener(move |object: &OrientedObject| {
            sink.borrow_mut().push(OrientationInspector::summary(object));
            Ok(())
        }),
    );

    for (step, event) in trace.events.iter().enumerate() {
        tracing::debug!(step, ?event, "replaying");
        match event {
            TraceEvent::Orientation(sample) => {
                platform.emit_orientation(*sample);
            }
            TraceEvent::Screen { degrees } => {
                platform.set_screen_orientation(*degrees);
                platform.emit(gyrocam_input::SensorSignal::ScreenOrientationChanged);
            }
            TraceEvent::AlphaOffset { radians } => {
                controls
                    .update_alpha_offset_angle(*radians)
                    .with_context(|| format!("step {step}: alpha offset"))?;
            }
            TraceEvent::Connect => {
                controls
                    .connect()
                    .with_context(|| format!("step {step}: connect"))?;
            }
            TraceEvent::Disconnect => controls.disconnect(),
        }
    }

    controls.dispose();
    let summaries = seen.borrow().clone();
    Ok(summaries)
}
