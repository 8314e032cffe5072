//! Synchronous fan-out of actions to registered consumers
//!
//! The registry is fixed when the [`Dispatcher`] is built. `dispatch` hands the
//! envelope to every consumer in registration order and returns only once the last
//! one has finished. There is no queue: a consumer that dispatches from inside
//! `handle` has that nested action delivered to everyone before its own `handle`
//! continues.
use super::action::{Action, Envelope, Source};
use std::sync::Arc;

pub trait Consumer: Send + Sync {
    /// Called once per dispatched action. Failures are the consumer's own concern;
    /// a panic is not caught and unwinds through `dispatch`.
    fn handle(&self, envelope: &Envelope);
}

impl<F> Consumer for F
where
    F: Fn(&Envelope) + Send + Sync,
{
    fn handle(&self, envelope: &Envelope) {
        self(envelope)
    }
}

#[derive(Default)]
pub struct DispatcherBuilder {
    consumers: Vec<Arc<dyn Consumer>>,
}

impl DispatcherBuilder {
    pub fn register(mut self, consumer: Arc<dyn Consumer>) -> Self {
        self.consumers.push(consumer);
        self
    }
    pub fn build(self) -> Dispatcher {
        tracing::debug!(consumers = self.consumers.len(), "dispatcher ready");
        Dispatcher {
            consumers: self.consumers,
        }
    }
}

pub struct Dispatcher {
    consumers: Vec<Arc<dyn Consumer>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }
    /// Dispatch an action raised by the view layer.
    pub fn dispatch(&self, action: Action) {
        self.dispatch_from(Source::View, action)
    }
    pub fn dispatch_from(&self, source: Source, action: Action) {
        tracing::debug!(
            action = %action.kind(),
            ?source,
            consumers = self.consumers.len(),
            "dispatching"
        );
        let envelope = Envelope { source, action };
        for consumer in &self.consumers {
            consumer.handle(&envelope);
        }
    }
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }
}
