//! Provides the dataflow graph that composes autoencoders into hierarchies.
//!
//! Every vertex of the graph is a [Producer][producer], something that emits batches.
//! Producers are [InputLayers][input], which feed external data into the graph, and
//! [AutoencoderNodes][node], which emit their encoding of whatever they received.
//!
//! An AutoencoderNode [registers][register] for the output of one or more producers.
//! Each registration gets a slot in the node's [SyncBuffer][buffer]. Once every slot
//! holds a batch, the node joins them column-wise in registration order, trains on the
//! joined batch, encodes it and hands the encoding to its own subscribers through its
//! [CallbackRegistry][callback]. Everything runs synchronously on the caller's stack,
//! there is no scheduler.
//!
//! ```
//! # use std::rc::Rc;
//! # use ndarray::Array2;
//! # use lamina::{AutoencoderConfig, AutoencoderNode, InputLayer, Region};
//! let input = InputLayer::new("pixels", 6);
//! let left = Rc::new(AutoencoderNode::from_config(&AutoencoderConfig::new(vec![2], vec![1])).unwrap());
//! let right = Rc::new(AutoencoderNode::from_config(&AutoencoderConfig::new(vec![2], vec![1])).unwrap());
//! let top = Rc::new(AutoencoderNode::from_config(&AutoencoderConfig::new(vec![2], vec![1])).unwrap());
//!
//! left.register_for(&input, Some(Region::new(0, 3))).unwrap();
//! right.register_for(&input, Some(Region::new(3, 6))).unwrap();
//! top.register_for(&*left, None).unwrap();
//! top.register_for(&*right, None).unwrap();
//!
//! input.feed(&Array2::from_elem((10, 6), 0.5)).unwrap();
//! assert_eq!(1, top.iteration());
//! ```
//!
//! The graph must not contain cycles. A node can't register for its own output and
//! the topology is frozen once a node started training.
//!
//! [producer]: ./trait.Producer.html
//! [input]: ./input/struct.InputLayer.html
//! [node]: ./node/struct.AutoencoderNode.html
//! [register]: ./node/struct.AutoencoderNode.html#method.register_for
//! [buffer]: ./buffer/struct.SyncBuffer.html
//! [callback]: ./callback/struct.CallbackRegistry.html
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;

use crate::error::Result;

pub use self::buffer::{Rejection, SyncBuffer};
pub use self::callback::CallbackRegistry;
pub use self::input::{InputLayer, Region};
pub use self::node::{AutoencoderNode, Receipt};

pub mod buffer;
pub mod callback;
pub mod input;
pub mod node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Process-unique identity of a producer.
pub struct SourceId(u64);

impl SourceId {
    /// Draw a new, never used identity.
    pub fn next() -> SourceId {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SourceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiver of the batches a producer emits.
pub trait TransformSubscriber {
    /// Identity of the subscriber.
    fn subscriber_id(&self) -> SourceId;

    /// Called with every batch `source` emits, in subscription order.
    fn on_transformed(&self, source: SourceId, data: &Array2<f32>);
}

/// Something that emits batches into the graph.
pub trait Producer {
    /// Identity of the producer.
    fn source_id(&self) -> SourceId;

    /// Display name of the producer.
    fn name(&self) -> &str;

    /// Deliver every future batch to `subscriber`.
    ///
    /// Producers that support it only deliver the columns of `region`.
    fn subscribe(&self, subscriber: Rc<dyn TransformSubscriber>, region: Option<Region>) -> Result<()>;

    /// Number of columns a subscription with `region` receives.
    fn columns_for(&self, region: Option<&Region>) -> usize;
}
