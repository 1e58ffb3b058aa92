//! Event registry — wires event names to sinks
//!
//! Process-wide table mapping event name → attached sinks. Attaching a
//! sink subscribes it to the bus exactly once per distinct (event, sink)
//! pair; the registry keeps the subscription handle (the forwarder task)
//! and aborts it on detach or unregister, which drops the bus receiver —
//! the matching unsubscribe. Attach and detach are idempotent, and safe
//! against concurrent initialization paths.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::bus::SharedEventBus;
use super::sinks::EventSink;

/// Shared, reference-counted event registry
pub type SharedEventRegistry = Arc<EventRegistry>;

/// Subscription handle for one (event, sink) pair. Dropping it aborts the
/// forwarder task and thereby detaches from the bus.
struct SinkSubscription {
    task: JoinHandle<()>,
}

impl Drop for SinkSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Registration {
    tags: Vec<String>,
    sinks: HashMap<String, SinkSubscription>,
}

/// Registry of event registrations and their sink subscriptions
pub struct EventRegistry {
    bus: SharedEventBus,
    defaults: Vec<Arc<dyn EventSink>>,
    table: DashMap<String, Registration>,
}

impl EventRegistry {
    /// Registry without default sinks (tests, opt-out deployments).
    pub fn new(bus: SharedEventBus) -> Self {
        Self {
            bus,
            defaults: Vec::new(),
            table: DashMap::new(),
        }
    }

    /// Registry whose `register` auto-attaches the given sinks to every
    /// event. Deployments normally pass a console and a disk sink here.
    pub fn with_defaults(bus: SharedEventBus, defaults: Vec<Arc<dyn EventSink>>) -> Self {
        Self {
            bus,
            defaults,
            table: DashMap::new(),
        }
    }

    /// Create (or return the existing) registration for `name` and attach
    /// the default sinks. Chain `.attach_sink(..)` on the returned handle
    /// for additional sinks.
    pub fn register(&self, name: &str, tags: &[&str]) -> RegistrationHandle<'_> {
        self.ensure_entry(name, tags);
        for sink in self.defaults.clone() {
            self.attach_sink(name, sink);
        }
        RegistrationHandle {
            registry: self,
            name: name.to_string(),
        }
    }

    /// Create (or return the existing) registration for `name` without
    /// the default sinks.
    pub fn register_bare(&self, name: &str, tags: &[&str]) -> RegistrationHandle<'_> {
        self.ensure_entry(name, tags);
        RegistrationHandle {
            registry: self,
            name: name.to_string(),
        }
    }

    fn ensure_entry(&self, name: &str, tags: &[&str]) {
        self.table.entry(name.to_string()).or_insert_with(|| {
            debug!(event = name, ?tags, "Event registered");
            Registration {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                sinks: HashMap::new(),
            }
        });
    }

    /// Attach a sink to an event. A no-op if this (event, sink id) pair is
    /// already live; the underlying bus subscribe happens at most once per
    /// pair.
    pub fn attach_sink(&self, name: &str, sink: Arc<dyn EventSink>) {
        let mut entry = self
            .table
            .entry(name.to_string())
            .or_insert_with(|| Registration {
                tags: Vec::new(),
                sinks: HashMap::new(),
            });

        let sink_id = sink.id().to_string();
        if entry.sinks.contains_key(&sink_id) {
            debug!(event = name, sink = %sink_id, "Sink already attached");
            return;
        }

        let subscription = self.spawn_forwarder(name.to_string(), entry.tags.clone(), sink);
        entry.sinks.insert(sink_id.clone(), subscription);
        info!(event = name, sink = %sink_id, "Sink attached");
    }

    /// Detach a sink from an event. A no-op if the pair is not live.
    pub fn detach_sink(&self, name: &str, sink_id: &str) {
        if let Some(mut entry) = self.table.get_mut(name) {
            if entry.sinks.remove(sink_id).is_some() {
                info!(event = name, sink = sink_id, "Sink detached");
            }
        }
    }

    /// Tear down every subscription for `name` and drop the registration.
    /// A no-op for unknown names.
    pub fn unregister(&self, name: &str) {
        if self.table.remove(name).is_some() {
            info!(event = name, "Event unregistered");
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn sink_count(&self, name: &str) -> usize {
        self.table.get(name).map(|e| e.sinks.len()).unwrap_or(0)
    }

    pub fn registered_events(&self) -> Vec<String> {
        self.table.iter().map(|e| e.key().clone()).collect()
    }

    /// One forwarder task per (event, sink) pair: filters occurrences by
    /// name and delivers. A failing or stalled delivery only ever backs up
    /// this pair's own queue.
    fn spawn_forwarder(
        &self,
        name: String,
        tags: Vec<String>,
        sink: Arc<dyn EventSink>,
    ) -> SinkSubscription {
        let mut subscriber = self.bus.subscribe();
        let task = tokio::spawn(async move {
            while let Some(occurrence) = subscriber.recv().await {
                if occurrence.name != name {
                    continue;
                }
                if let Err(e) = sink.deliver(&occurrence.name, &tags, &occurrence).await {
                    metrics::counter!(
                        "sink_delivery_failures_total",
                        "sink" => sink.id().to_string(),
                        "event" => name.clone()
                    )
                    .increment(1);
                    warn!(
                        sink = sink.id(),
                        event = %name,
                        error = %e,
                        "Sink delivery failed"
                    );
                }
            }
        });
        SinkSubscription { task }
    }
}

/// Chaining handle returned by `register`/`register_bare`
pub struct RegistrationHandle<'a> {
    registry: &'a EventRegistry,
    name: String,
}

impl RegistrationHandle<'_> {
    pub fn attach_sink(self, sink: Arc<dyn EventSink>) -> Self {
        self.registry.attach_sink(&self.name, sink);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::notifications::bus::create_event_bus;
    use crate::notifications::occurrence::{event_names, EventOccurrence};
    use crate::notifications::sinks::SinkError;

    struct CountingSink {
        id: String,
        hits: Arc<AtomicUsize>,
    }

    impl CountingSink {
        fn new(id: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
            let hits = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    id: id.to_string(),
                    hits: Arc::clone(&hits),
                }),
                hits,
            )
        }
    }

    #[async_trait]
    impl EventSink for CountingSink {
        fn id(&self) -> &str {
            &self.id
        }

        async fn deliver(
            &self,
            _event: &str,
            _tags: &[String],
            _occurrence: &EventOccurrence,
        ) -> Result<(), SinkError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Never completes a delivery.
    struct BlockingSink;

    #[async_trait]
    impl EventSink for BlockingSink {
        fn id(&self) -> &str {
            "blocking"
        }

        async fn deliver(
            &self,
            _event: &str,
            _tags: &[String],
            _occurrence: &EventOccurrence,
        ) -> Result<(), SinkError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    /// Fails every delivery.
    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        fn id(&self) -> &str {
            "failing"
        }

        async fn deliver(
            &self,
            _event: &str,
            _tags: &[String],
            _occurrence: &EventOccurrence,
        ) -> Result<(), SinkError> {
            Err(SinkError::Delivery("injected fault".to_string()))
        }
    }

    async fn wait_for_hits(hits: &Arc<AtomicUsize>, expected: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while hits.load(Ordering::SeqCst) < expected {
            if tokio::time::Instant::now() > deadline {
                panic!(
                    "expected {} deliveries, saw {}",
                    expected,
                    hits.load(Ordering::SeqCst)
                );
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn occurrence() -> EventOccurrence {
        EventOccurrence::request(event_names::REMOTE_EVSE_START, serde_json::json!({}))
    }

    #[tokio::test]
    async fn double_attach_delivers_exactly_once() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (sink, hits) = CountingSink::new("counting");

        registry
            .register_bare(event_names::REMOTE_EVSE_START, &["remote", "evse"])
            .attach_sink(Arc::clone(&sink) as Arc<dyn EventSink>)
            .attach_sink(sink as Arc<dyn EventSink>);

        assert_eq!(registry.sink_count(event_names::REMOTE_EVSE_START), 1);
        // the bus subscribe ran at most once for the pair
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(occurrence());
        wait_for_hits(&hits, 1).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1, "no duplicate delivery");
    }

    #[tokio::test]
    async fn blocked_sink_does_not_delay_others() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (counting, hits) = CountingSink::new("counting");

        registry
            .register_bare(event_names::REMOTE_EVSE_START, &[])
            .attach_sink(Arc::new(BlockingSink))
            .attach_sink(counting as Arc<dyn EventSink>);

        bus.publish(occurrence());
        wait_for_hits(&hits, 1).await;
    }

    #[tokio::test]
    async fn failing_sink_does_not_stop_others() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (counting, hits) = CountingSink::new("counting");

        registry
            .register_bare(event_names::SEND_CDR, &[])
            .attach_sink(Arc::new(FailingSink))
            .attach_sink(counting as Arc<dyn EventSink>);

        bus.publish(EventOccurrence::request(
            event_names::SEND_CDR,
            serde_json::json!({}),
        ));
        bus.publish(EventOccurrence::request(
            event_names::SEND_CDR,
            serde_json::json!({}),
        ));
        wait_for_hits(&hits, 2).await;
    }

    #[tokio::test]
    async fn routing_is_by_event_name_only() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (sink, hits) = CountingSink::new("counting");

        registry
            .register_bare(event_names::AUTH_EVSE_START, &["auth"])
            .attach_sink(sink as Arc<dyn EventSink>);

        // different event name: must not be delivered
        bus.publish(occurrence());
        bus.publish(EventOccurrence::request(
            event_names::AUTH_EVSE_START,
            serde_json::json!({}),
        ));

        wait_for_hits(&hits, 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_sinks_attach_on_register_unless_suppressed() {
        let bus = create_event_bus();
        let (default_sink, hits) = CountingSink::new("default");
        let registry = EventRegistry::with_defaults(
            Arc::clone(&bus),
            vec![default_sink as Arc<dyn EventSink>],
        );

        registry.register(event_names::CDR_SENT, &["cdr"]);
        assert_eq!(registry.sink_count(event_names::CDR_SENT), 1);

        bus.publish(EventOccurrence::request(
            event_names::CDR_SENT,
            serde_json::json!({}),
        ));
        wait_for_hits(&hits, 1).await;

        // bare registration opts out of defaults
        registry.register_bare(event_names::SEND_CDR, &[]);
        assert_eq!(registry.sink_count(event_names::SEND_CDR), 0);
    }

    #[tokio::test]
    async fn unregister_stops_delivery_and_is_idempotent() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (sink, hits) = CountingSink::new("counting");

        registry
            .register_bare(event_names::REMOTE_EVSE_STOP, &[])
            .attach_sink(sink as Arc<dyn EventSink>);

        bus.publish(EventOccurrence::request(
            event_names::REMOTE_EVSE_STOP,
            serde_json::json!({}),
        ));
        wait_for_hits(&hits, 1).await;

        registry.unregister(event_names::REMOTE_EVSE_STOP);
        assert!(!registry.is_registered(event_names::REMOTE_EVSE_STOP));

        // give the aborted forwarder a moment, then publish again
        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.publish(EventOccurrence::request(
            event_names::REMOTE_EVSE_STOP,
            serde_json::json!({}),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1, "no delivery after unregister");

        // second unregister and a detach of an absent pair: both no-ops
        registry.unregister(event_names::REMOTE_EVSE_STOP);
        registry.detach_sink(event_names::REMOTE_EVSE_STOP, "counting");
    }

    #[tokio::test]
    async fn detach_then_reattach_resubscribes() {
        let bus = create_event_bus();
        let registry = EventRegistry::new(Arc::clone(&bus));
        let (sink, hits) = CountingSink::new("counting");

        registry.attach_sink(
            event_names::AUTH_EVSE_STOP,
            Arc::clone(&sink) as Arc<dyn EventSink>,
        );
        registry.detach_sink(event_names::AUTH_EVSE_STOP, "counting");
        assert_eq!(registry.sink_count(event_names::AUTH_EVSE_STOP), 0);

        registry.attach_sink(event_names::AUTH_EVSE_STOP, sink as Arc<dyn EventSink>);
        bus.publish(EventOccurrence::request(
            event_names::AUTH_EVSE_STOP,
            serde_json::json!({}),
        ));
        wait_for_hits(&hits, 1).await;
    }
}
