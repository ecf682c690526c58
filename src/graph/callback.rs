//! Ordered subscriber list of a producer.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ndarray::Array2;

use super::{Region, SourceId, TransformSubscriber};

#[derive(Clone)]
struct Subscription {
    subscriber: Rc<dyn TransformSubscriber>,
    region: Option<Region>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
         .field("subscriber", &self.subscriber.subscriber_id())
         .field("region", &self.region)
         .finish()
    }
}

#[derive(Debug, Default)]
/// Delivers a producer's batches to its subscribers, synchronously and in subscription order.
pub struct CallbackRegistry {
    subscriptions: RefCell<Vec<Subscription>>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> CallbackRegistry {
        CallbackRegistry::default()
    }

    /// Append `subscriber`. With a `region` it only receives those columns.
    pub fn subscribe(&self, subscriber: Rc<dyn TransformSubscriber>, region: Option<Region>) {
        self.subscriptions.borrow_mut().push(Subscription {
            subscriber: subscriber,
            region: region,
        });
    }

    /// Number of subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Whether nobody subscribed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `data`, emitted by `source`, to every subscriber.
    ///
    /// Subscribers may subscribe to this registry while it delivers; they receive the
    /// next batch.
    pub fn emit(&self, source: SourceId, data: &Array2<f32>) {
        let subscriptions = self.subscriptions.borrow().clone();
        for subscription in subscriptions {
            match subscription.region {
                Some(region) => subscription.subscriber.on_transformed(source, &region.select(data)),
                None => subscription.subscriber.on_transformed(source, data),
            }
        }
    }
}
