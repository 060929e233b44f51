//! Typed listener registry.
//!
//! Listeners are kept per event in registration order. The same listener may
//! be registered more than once and then runs once per registration.
//! Removal matches by identity (`Rc` pointer) and drops only the first match.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Events a controller can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlEvent {
    /// The controlled object's rotation was just rewritten.
    Change,
}

impl ControlEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Change => "change",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event name {0:?}")]
pub struct UnknownEvent(pub String);

impl FromStr for ControlEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(Self::Change),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// A registered callback. Identity is the allocation, so keep the `Rc`
/// around if you intend to remove it later.
pub type Listener<A> = Rc<dyn Fn(&A) -> Result<(), ListenerError>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<A, F>(f: F) -> Listener<A>
where
    F: Fn(&A) -> Result<(), ListenerError> + 'static,
{
    Rc::new(f)
}

/// How a firing pass reacts to a failing listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Stop at the first failure and return it; later listeners do not run.
    #[default]
    Abort,
    /// Run every listener, then report all failures together.
    Isolate,
}

/// Errors from [`EventRegistry::fire`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("listener {index} for {event:?} failed: {source}")]
    Aborted {
        event: String,
        index: usize,
        #[source]
        source: ListenerError,
    },
    #[error("{} listener(s) for {event:?} failed", .failures.len())]
    Isolated {
        event: String,
        failures: Vec<(usize, ListenerError)>,
    },
}

/// Event name to ordered listener list.
pub struct EventRegistry<E, A> {
    listeners: BTreeMap<E, Vec<Listener<A>>>,
    policy: DispatchPolicy,
}

impl<E, A> Default for EventRegistry<E, A> {
    fn default() -> Self {
        Self {
            listeners: BTreeMap::new(),
            policy: DispatchPolicy::default(),
        }
    }
}

impl<E, A> fmt::Debug for EventRegistry<E, A>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("policy", &self.policy)
            .field(
                "listeners",
                &self
                    .listeners
                    .iter()
                    .map(|(event, list)| (event, list.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<E, A> EventRegistry<E, A>
where
    E: Ord + Copy + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DispatchPolicy) -> Self {
        Self {
            listeners: BTreeMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Append a listener. No uniqueness check.
    pub fn add(&mut self, event: E, listener: Listener<A>) {
        self.listeners.entry(event).or_default().push(listener);
    }

    /// Remove the first registration of `listener` for `event`.
    /// Returns false if nothing matched.
    pub fn remove(&mut self, event: E, listener: &Listener<A>) -> bool {
        let Some(list) = self.listeners.get_mut(&event) else {
            return false;
        };
        match list.iter().position(|l| same_listener(l, listener)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self, event: E) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    /// Copy of the current listener list, in firing order.
    pub fn snapshot(&self, event: E) -> Vec<Listener<A>> {
        self.listeners.get(&event).cloned().unwrap_or_default()
    }

    /// Invoke every listener for `event` in registration order.
    /// Returns how many listeners ran.
    pub fn fire(&self, event: E, arg: &A) -> Result<usize, DispatchError> {
        dispatch(event, &self.snapshot(event), arg, self.policy)
    }
}

/// Run a pre-captured listener list.
///
/// Callers that need listeners to mutate the registry mid-pass take a
/// [`EventRegistry::snapshot`], release the registry, then dispatch.
pub fn dispatch<E, A>(
    event: E,
    listeners: &[Listener<A>],
    arg: &A,
    policy: DispatchPolicy,
) -> Result<usize, DispatchError>
where
    E: fmt::Display,
{
    let mut failures = Vec::new();
    let mut ran = 0;
    for (index, listener) in listeners.iter().enumerate() {
        ran += 1;
        if let Err(source) = listener(arg) {
            match policy {
                DispatchPolicy::Abort => {
                    return Err(DispatchError::Aborted {
                        event: event.to_string(),
                        index,
                        source,
                    });
                }
                DispatchPolicy::Isolate => {
                    tracing::warn!(%event, index, error = %source, "listener failed");
                    failures.push((index, source));
                }
            }
        }
    }
    if failures.is_empty() {
        Ok(ran)
    } else {
        Err(DispatchError::Isolated {
            event: event.to_string(),
            failures,
        })
    }
}

fn same_listener<A>(a: &Listener<A>, b: &Listener<A>) -> bool {
    // Data pointer only: vtable pointers for the same closure can differ.
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
