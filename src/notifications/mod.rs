//! Event notifications: bus, registry and sinks
//!
//! Domain operations publish immutable [`EventOccurrence`]s onto the
//! [`EventBus`]; the [`EventRegistry`] fans each occurrence out to the
//! sinks subscribed to its event name. One slow or failing sink never
//! delays another and never reaches the publisher.

pub mod bus;
pub mod occurrence;
pub mod registry;
pub mod sinks;

pub use bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use occurrence::{event_names, EventOccurrence, EventPayload};
pub use registry::{EventRegistry, SharedEventRegistry};
pub use sinks::{EventSink, SinkError};
