//! A stacked autoencoder as a vertex of the graph.
//!
//! An [AutoencoderNode][1] wraps a [StackedAutoencoder][2] with the two pieces that
//! connect it to the graph: a [SyncBuffer][3] collecting one batch from every
//! producer it registered for, and a [CallbackRegistry][4] delivering its encodings
//! to its own subscribers.
//!
//! A complete buffer triggers one training cycle: the batches are joined, the model is
//! fit on the joined batch and transforms it, the encoding is emitted and the buffer is
//! flushed. The slots stay full for the whole cycle, so a batch arriving re-entrantly
//! during it is rejected as [SlotFull][5].
//!
//! [1]: ./struct.AutoencoderNode.html
//! [2]: ../../autoencoder/struct.StackedAutoencoder.html
//! [3]: ../buffer/struct.SyncBuffer.html
//! [4]: ../callback/struct.CallbackRegistry.html
//! [5]: ./enum.Receipt.html#variant.SlotFull
use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ndarray::Array2;

use super::{CallbackRegistry, Producer, Region, Rejection, SourceId, SyncBuffer, TransformSubscriber};
use crate::autoencoder::{Phase, StackedAutoencoder};
use crate::config::AutoencoderConfig;
use crate::error::{Error, Result};
use crate::util::OutputFolder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What happened to a received batch.
pub enum Receipt {
    /// Stored, other producers are still outstanding.
    Buffered,
    /// Stored, completed the buffer and ran a training cycle.
    Fired,
    /// Dropped, the sender is not registered.
    Unregistered,
    /// Dropped, the sender's previous batch is still buffered.
    SlotFull,
    /// Completed the buffer, but the training cycle failed. The buffer was flushed.
    Failed,
}

#[derive(Debug)]
/// Graph vertex training a stacked autoencoder on the joined output of its producers.
pub struct AutoencoderNode {
    id: SourceId,
    name: String,
    model: RefCell<StackedAutoencoder>,
    buffer: RefCell<SyncBuffer>,
    callbacks: CallbackRegistry,
}

impl AutoencoderNode {
    /// Create a node from a [AutoencoderConfig][1].
    /// [1]: ../../config/struct.AutoencoderConfig.html
    pub fn from_config(config: &AutoencoderConfig) -> Result<AutoencoderNode> {
        Ok(AutoencoderNode::new(StackedAutoencoder::from_config(config)?))
    }

    /// Put an existing model into the graph.
    pub fn new(model: StackedAutoencoder) -> AutoencoderNode {
        AutoencoderNode {
            id: SourceId::next(),
            name: model.name().to_owned(),
            model: RefCell::new(model),
            buffer: RefCell::new(SyncBuffer::new()),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Receive the output of `upstream`, restricted to `region` if `upstream` supports it.
    ///
    /// Only possible while the node is [Building](../../autoencoder/enum.Phase.html).
    /// A node can't register for its own output nor twice for the same producer.
    /// A refused registration is logged and leaves the node unchanged.
    pub fn register_for(self: &Rc<Self>, upstream: &dyn Producer, region: Option<Region>) -> Result<()> {
        if self.phase() == Phase::Running {
            warn!("Can't register {} for new data from {}, it has already been trained", self.name, upstream.name());
            return Err(Error::TopologyFrozen { node: self.name.clone() });
        }
        if upstream.source_id() == self.id {
            warn!("Can't register {} for its own output", self.name);
            return Err(Error::SelfRegistration(self.name.clone()));
        }
        if self.buffer.borrow().contains(upstream.source_id()) {
            warn!("{} is already registered for data from {}", self.name, upstream.name());
            return Err(Error::AlreadyRegistered {
                node: self.name.clone(),
                upstream: upstream.name().to_owned(),
            });
        }

        upstream.subscribe(self.clone(), region)?;
        let columns = upstream.columns_for(region.as_ref());
        let slot = self.buffer.borrow_mut().register(upstream.source_id(), upstream.name(), columns);
        debug!("{} registered for {} columns from {} in slot {}", self.name, columns, upstream.name(), slot);
        Ok(())
    }

    /// Store a batch emitted by `source` and run a training cycle if it completed the buffer.
    ///
    /// Never fails: problems are logged and reported in the [Receipt](./enum.Receipt.html).
    pub fn receive(&self, source: SourceId, data: &Array2<f32>) -> Receipt {
        debug!("{} received batch of shape {:?} from {}", self.name, data.shape(), source);
        let stored = self.buffer.borrow_mut().store(source, data.clone());
        match stored {
            Ok(_) => self.check_complete(),
            Err(Rejection::Unregistered) => {
                warn!("{} received data from unregistered source {}, dropping it", self.name, source);
                Receipt::Unregistered
            }
            Err(Rejection::SlotFull) => {
                let buffer = self.buffer.borrow();
                let sender = buffer.slot_of(source).and_then(|slot| buffer.name(slot)).unwrap_or("?");
                warn!("{} still holds data from {} ({}), dropping the new batch", self.name, sender, source);
                Receipt::SlotFull
            }
        }
    }

    fn check_complete(&self) -> Receipt {
        let joined = {
            let buffer = self.buffer.borrow();
            if !buffer.is_complete() {
                return Receipt::Buffered;
            }
            let senders: Vec<&str> = (0..buffer.len()).filter_map(|slot| buffer.name(slot)).collect();
            debug!("{} has data from all {} sources: {}", self.name, buffer.len(), senders.join(", "));
            buffer.join()
        };

        let outcome = joined.and_then(|batch| self.fit_transform(&batch));
        self.buffer.borrow_mut().flush();
        match outcome {
            Ok(_) => Receipt::Fired,
            Err(err) => {
                error!("{} failed to train on its joined input: {}", self.name, err);
                Receipt::Failed
            }
        }
    }

    /// Train the model on `batch`. Nothing is emitted.
    pub fn fit(&self, batch: &Array2<f32>) -> Result<()> {
        self.model.borrow_mut().fit(batch)
    }

    /// Encode `batch` and deliver the encoding to every subscriber.
    pub fn transform(&self, batch: &Array2<f32>) -> Result<Array2<f32>> {
        let output = self.model.borrow_mut().transform(batch)?;
        self.callbacks.emit(self.id, &output);
        Ok(output)
    }

    /// [fit](#method.fit) followed by [transform](#method.transform).
    pub fn fit_transform(&self, batch: &Array2<f32>) -> Result<Array2<f32>> {
        let output = self.model.borrow_mut().fit_transform(batch)?;
        self.callbacks.emit(self.id, &output);
        Ok(output)
    }

    /// Save the model's weights, see [StackedAutoencoder::save](../../autoencoder/struct.StackedAutoencoder.html#method.save).
    pub fn save(&self, output: &OutputFolder) -> Result<PathBuf> {
        self.model.borrow().save(output)
    }

    /// Restore the model's weights, see [StackedAutoencoder::load](../../autoencoder/struct.StackedAutoencoder.html#method.load).
    pub fn load(&self, path: &Path) -> Result<()> {
        self.model.borrow_mut().load(path)
    }

    /// Identity of the node.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Unique name of the node, the name of its model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle phase of the model.
    pub fn phase(&self) -> Phase {
        self.model.borrow().phase()
    }

    /// Number of training cycles so far.
    pub fn iteration(&self) -> usize {
        self.model.borrow().iteration()
    }

    /// The wrapped model.
    pub fn model(&self) -> Ref<StackedAutoencoder> {
        self.model.borrow()
    }

    /// Result of the most recent transform.
    pub fn last_output(&self) -> Option<Array2<f32>> {
        self.model.borrow().last_output().cloned()
    }

    /// Number of producers the node registered for.
    pub fn registered_sources(&self) -> usize {
        self.buffer.borrow().len()
    }

    /// Number of registered producers whose batch is currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.borrow().pending()
    }

    /// The batch currently buffered for `source`.
    pub fn buffered(&self, source: SourceId) -> Option<Array2<f32>> {
        self.buffer.borrow().payload(source).cloned()
    }

    /// Width of the joined input.
    pub fn input_columns(&self) -> usize {
        self.buffer.borrow().columns()
    }

    /// Number of subscriptions to this node's output.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl TransformSubscriber for AutoencoderNode {
    fn subscriber_id(&self) -> SourceId {
        self.id
    }

    fn on_transformed(&self, source: SourceId, data: &Array2<f32>) {
        self.receive(source, data);
    }
}

impl Producer for AutoencoderNode {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, subscriber: Rc<dyn TransformSubscriber>, region: Option<Region>) -> Result<()> {
        if region.is_some() {
            debug!("{} delivers its full output, ignoring region {:?}", self.name, region);
        }
        self.callbacks.subscribe(subscriber, None);
        Ok(())
    }

    fn columns_for(&self, _region: Option<&Region>) -> usize {
        self.model.borrow().output_dim()
    }
}
