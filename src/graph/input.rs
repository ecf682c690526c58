//! External data source of the graph.
use std::rc::Rc;

use ndarray::{s, Array2};

use super::{CallbackRegistry, Producer, SourceId, TransformSubscriber};
use crate::error::{Error, Result};
use crate::util::check_columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A contiguous range of columns, `start..end`.
pub struct Region {
    /// First column.
    pub start: usize,
    /// One past the last column.
    pub end: usize,
}

impl Region {
    /// The columns `start..end`.
    pub fn new(start: usize, end: usize) -> Region {
        Region { start: start, end: end }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Fail unless the region is non-empty and fits into `width` columns.
    pub fn check(&self, width: usize) -> Result<()> {
        if self.start >= self.end || self.end > width {
            return Err(Error::InvalidRegion { start: self.start, end: self.end, width: width });
        }
        Ok(())
    }

    /// Copy the columns of the region out of `data`.
    pub fn select(&self, data: &Array2<f32>) -> Array2<f32> {
        data.slice(s![.., self.start..self.end]).to_owned()
    }
}

#[derive(Debug)]
/// Feeds external batches of a fixed width into the graph.
///
/// Subscribers may register for a [Region](./struct.Region.html) of the columns, e.g.
/// one node per quadrant of an image.
pub struct InputLayer {
    id: SourceId,
    name: String,
    width: usize,
    callbacks: CallbackRegistry,
}

impl InputLayer {
    /// Create an input of `width` columns.
    pub fn new(name: &str, width: usize) -> InputLayer {
        InputLayer {
            id: SourceId::next(),
            name: name.to_owned(),
            width: width,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Width of the batches this input accepts.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Deliver `batch` to every subscriber, each receiving its region.
    pub fn feed(&self, batch: &Array2<f32>) -> Result<()> {
        check_columns(self.width, batch)?;
        debug!("{} feeding batch of shape {:?}", self.name, batch.shape());
        self.callbacks.emit(self.id, batch);
        Ok(())
    }
}

impl Producer for InputLayer {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, subscriber: Rc<dyn TransformSubscriber>, region: Option<Region>) -> Result<()> {
        if let Some(ref region) = region {
            region.check(self.width)?;
        }
        self.callbacks.subscribe(subscriber, region);
        Ok(())
    }

    fn columns_for(&self, region: Option<&Region>) -> usize {
        region.map_or(self.width, |region| region.width())
    }
}
