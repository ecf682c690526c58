//! Barrier over the producers a node registered for.
//!
//! The buffer has one slot per registered producer, in registration order. A slot is
//! either empty or holds exactly one batch. A batch for a full slot is rejected, not
//! queued, so a producer that fires twice before its slowest sibling loses its second
//! batch. Once every slot is full the batches are joined column-wise in registration
//! order, no matter in which order they arrived.
use ndarray::{concatenate, Array2, ArrayView2, Axis};

use super::SourceId;
use crate::error::Result;

#[derive(Debug, Clone)]
struct Slot {
    source: SourceId,
    name: String,
    columns: usize,
    payload: Option<Array2<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reason a batch was not stored.
pub enum Rejection {
    /// The producer has no slot.
    Unregistered,
    /// The producer's slot still holds its previous batch.
    SlotFull,
}

#[derive(Debug, Clone, Default)]
/// Single-slot-per-producer synchronization buffer.
pub struct SyncBuffer {
    slots: Vec<Slot>,
}

impl SyncBuffer {
    /// Create a buffer without slots.
    pub fn new() -> SyncBuffer {
        SyncBuffer::default()
    }

    /// Append an empty slot for `source`, contributing `columns` columns, and return its index.
    pub fn register(&mut self, source: SourceId, name: &str, columns: usize) -> usize {
        self.slots.push(Slot {
            source: source,
            name: name.to_owned(),
            columns: columns,
            payload: None,
        });
        self.slots.len() - 1
    }

    /// Index of the slot of `source`.
    pub fn slot_of(&self, source: SourceId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.source == source)
    }

    /// Whether `source` has a slot.
    pub fn contains(&self, source: SourceId) -> bool {
        self.slot_of(source).is_some()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no producer is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Display name of the producer of slot `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.name.as_str())
    }

    /// Sum of the columns all producers contribute, the width of a joined batch.
    pub fn columns(&self) -> usize {
        self.slots.iter().map(|slot| slot.columns).sum()
    }

    /// Number of slots holding a batch.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.payload.is_some()).count()
    }

    /// The batch stored for `source`, if any.
    pub fn payload(&self, source: SourceId) -> Option<&Array2<f32>> {
        self.slot_of(source).and_then(|index| self.slots[index].payload.as_ref())
    }

    /// Store `data` in the slot of `source` and return the slot index.
    pub fn store(&mut self, source: SourceId, data: Array2<f32>) -> ::std::result::Result<usize, Rejection> {
        let index = self.slot_of(source).ok_or(Rejection::Unregistered)?;
        let slot = &mut self.slots[index];
        if slot.payload.is_some() {
            return Err(Rejection::SlotFull);
        }
        slot.payload = Some(data);
        Ok(index)
    }

    /// Whether there are slots and every one of them holds a batch.
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|slot| slot.payload.is_some())
    }

    /// Join the stored batches column-wise in registration order.
    ///
    /// Fails if a slot is empty or the batches differ in their number of rows.
    pub fn join(&self) -> Result<Array2<f32>> {
        let views: Vec<ArrayView2<f32>> = self.slots
                                              .iter()
                                              .filter_map(|slot| slot.payload.as_ref().map(|payload| payload.view()))
                                              .collect();
        if views.len() != self.slots.len() || views.is_empty() {
            return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
        }
        Ok(concatenate(Axis(1), &views)?)
    }

    /// Empty every slot.
    pub fn flush(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.payload = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn completes_only_when_every_slot_is_full() {
        let (a, b) = (SourceId::next(), SourceId::next());
        let mut buffer = SyncBuffer::new();
        assert!(!buffer.is_complete());
        assert_eq!(0, buffer.register(a, "a", 1));
        assert_eq!(1, buffer.register(b, "b", 2));
        assert_eq!(3, buffer.columns());
        assert_eq!(Some("b"), buffer.name(1));
        assert_eq!(None, buffer.name(2));

        buffer.store(a, array![[1f32]]).unwrap();
        assert!(!buffer.is_complete());
        assert_eq!(Err(Rejection::SlotFull), buffer.store(a, array![[9f32]]));
        assert_eq!(Some(&array![[1f32]]), buffer.payload(a));
        assert_eq!(Err(Rejection::Unregistered), buffer.store(SourceId::next(), array![[1f32]]));

        buffer.store(b, array![[2f32, 3f32]]).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(array![[1f32, 2f32, 3f32]], buffer.join().unwrap());

        buffer.flush();
        assert_eq!(0, buffer.pending());
        assert_eq!(2, buffer.len());
    }

    #[test]
    fn ragged_batches_do_not_join() {
        let (a, b) = (SourceId::next(), SourceId::next());
        let mut buffer = SyncBuffer::new();
        buffer.register(a, "a", 1);
        buffer.register(b, "b", 1);
        buffer.store(a, array![[1f32], [2f32]]).unwrap();
        buffer.store(b, array![[1f32]]).unwrap();
        assert!(buffer.join().is_err());
    }
}
