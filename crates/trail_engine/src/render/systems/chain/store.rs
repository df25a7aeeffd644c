//! Shared element storage and per-chain ring bookkeeping
//!
//! All chains share one flat, pre-sized element array. Each chain owns the
//! disjoint slice `[start, start + max_elements)` of it and addresses that
//! slice as a ring: `head` is the newest element, `tail` the oldest, both
//! relative to `start`, both moving with modulo arithmetic. Steady-state
//! add/remove therefore never allocates.

use super::types::ChainElement;
use super::ChainError;

/// Sentinel stored in `head`/`tail` while a chain is empty
pub const SEGMENT_EMPTY: usize = usize::MAX;

/// Ring-buffer view of one chain inside the shared element store
///
/// `head` and `tail` are inclusive and relative to `start`; an empty chain
/// holds [`SEGMENT_EMPTY`] in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSegment {
    /// First slot of this chain's subset of the shared buffer
    pub start: usize,
    /// Newest element, relative to `start`
    pub head: usize,
    /// Oldest element, relative to `start`
    pub tail: usize,
}

impl ChainSegment {
    fn empty(start: usize) -> Self {
        Self {
            start,
            head: SEGMENT_EMPTY,
            tail: SEGMENT_EMPTY,
        }
    }

    /// Whether the chain currently holds no elements
    pub fn is_empty(&self) -> bool {
        self.head == SEGMENT_EMPTY
    }
}

/// Fixed-capacity element storage for every chain of one object
#[derive(Debug)]
pub struct ChainStore {
    /// Flat element pool, `max_elements * chain_count` long
    elements: Vec<ChainElement>,
    /// One ring descriptor per chain
    segments: Vec<ChainSegment>,
    /// Ring length of every chain
    max_elements: usize,
}

impl ChainStore {
    /// Allocate storage for `chain_count` chains of `max_elements` each
    pub fn new(max_elements: usize, chain_count: usize) -> Self {
        let mut store = Self {
            elements: Vec::new(),
            segments: Vec::new(),
            max_elements: 0,
        };
        store.reset(max_elements, chain_count);
        store
    }

    /// Reallocate for a new capacity, discarding every stored element
    ///
    /// This is the documented data-loss path behind the capacity setters:
    /// deliberate invalidation, not an error.
    pub fn reset(&mut self, max_elements: usize, chain_count: usize) {
        self.max_elements = max_elements;
        self.elements.clear();
        self.elements
            .resize(max_elements * chain_count, ChainElement::default());
        self.segments.clear();
        self.segments
            .extend((0..chain_count).map(|i| ChainSegment::empty(i * max_elements)));
    }

    /// Ring length of every chain
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Number of chains
    pub fn chain_count(&self) -> usize {
        self.segments.len()
    }

    /// Ring descriptors for all chains
    pub fn segments(&self) -> &[ChainSegment] {
        &self.segments
    }

    /// Element at an absolute pool slot
    ///
    /// Callers obtain valid slots from [`Self::segments`]; used by the
    /// vertex generator which addresses the pool by ring position.
    pub(crate) fn slot(&self, index: usize) -> &ChainElement {
        &self.elements[index]
    }

    fn segment_checked(&self, chain_index: usize) -> Result<ChainSegment, ChainError> {
        self.segments
            .get(chain_index)
            .copied()
            .ok_or(ChainError::IndexOutOfRange {
                context: "chain",
                index: chain_index,
                limit: self.segments.len(),
            })
    }

    /// Number of live elements in a chain
    pub fn count(&self, chain_index: usize) -> Result<usize, ChainError> {
        let seg = self.segment_checked(chain_index)?;
        if seg.is_empty() {
            return Ok(0);
        }
        Ok((seg.head + self.max_elements - seg.tail) % self.max_elements + 1)
    }

    /// Append an element at the head of a chain
    ///
    /// A full chain evicts its tail so the count stays at the capacity
    /// bound; the ribbon visually "follows" the newest elements.
    pub fn add(&mut self, chain_index: usize, element: ChainElement) -> Result<(), ChainError> {
        let mut seg = self.segment_checked(chain_index)?;

        if seg.is_empty() {
            seg.head = 0;
            seg.tail = 0;
        } else {
            seg.head = (seg.head + 1) % self.max_elements;
            if seg.head == seg.tail {
                // wrapped onto the oldest element: evict it
                seg.tail = (seg.tail + 1) % self.max_elements;
            }
        }

        self.elements[seg.start + seg.head] = element;
        self.segments[chain_index] = seg;
        Ok(())
    }

    /// Remove the oldest element of a chain
    ///
    /// Removing from an empty chain is a documented no-op, not an error.
    pub fn remove(&mut self, chain_index: usize) -> Result<(), ChainError> {
        let mut seg = self.segment_checked(chain_index)?;

        if seg.is_empty() {
            return Ok(());
        }
        if seg.head == seg.tail {
            seg.head = SEGMENT_EMPTY;
            seg.tail = SEGMENT_EMPTY;
        } else {
            seg.tail = (seg.tail + 1) % self.max_elements;
        }

        self.segments[chain_index] = seg;
        Ok(())
    }

    /// Resolve a head-relative element index (0 = newest) to a pool slot
    fn resolve(&self, chain_index: usize, element_index: usize) -> Result<usize, ChainError> {
        let seg = self.segment_checked(chain_index)?;
        let count = self.count(chain_index)?;
        if element_index >= count {
            return Err(ChainError::IndexOutOfRange {
                context: "element",
                index: element_index,
                limit: count,
            });
        }
        let ring = (seg.head + self.max_elements - element_index) % self.max_elements;
        Ok(seg.start + ring)
    }

    /// Overwrite an existing element, addressed from the head (0 = newest)
    pub fn update(
        &mut self,
        chain_index: usize,
        element_index: usize,
        element: ChainElement,
    ) -> Result<(), ChainError> {
        let slot = self.resolve(chain_index, element_index)?;
        self.elements[slot] = element;
        Ok(())
    }

    /// Read an existing element, addressed from the head (0 = newest)
    pub fn get(&self, chain_index: usize, element_index: usize) -> Result<&ChainElement, ChainError> {
        let slot = self.resolve(chain_index, element_index)?;
        Ok(&self.elements[slot])
    }

    /// Empty one chain, leaving its capacity and identity intact
    pub fn clear(&mut self, chain_index: usize) -> Result<(), ChainError> {
        let seg = self.segment_checked(chain_index)?;
        self.segments[chain_index] = ChainSegment::empty(seg.start);
        Ok(())
    }

    /// Empty every chain
    pub fn clear_all(&mut self) {
        for seg in &mut self.segments {
            seg.head = SEGMENT_EMPTY;
            seg.tail = SEGMENT_EMPTY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec3, Vec4};

    fn element(x: f32) -> ChainElement {
        ChainElement::new(
            Vec3::new(x, 0.0, 0.0),
            1.0,
            x,
            Vec4::new(1.0, 1.0, 1.0, 1.0),
        )
    }

    /// Oldest-to-newest positions of one chain, via head-relative reads
    fn positions(store: &ChainStore, chain: usize) -> Vec<f32> {
        let count = store.count(chain).unwrap();
        (0..count)
            .rev()
            .map(|i| store.get(chain, i).unwrap().position.x)
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ChainStore::new(4, 3);
        assert_eq!(store.chain_count(), 3);
        assert_eq!(store.max_elements(), 4);
        for chain in 0..3 {
            assert_eq!(store.count(chain).unwrap(), 0);
            assert!(store.segments()[chain].is_empty());
        }
        // disjoint subsets
        assert_eq!(store.segments()[1].start, 4);
        assert_eq!(store.segments()[2].start, 8);
    }

    #[test]
    fn test_add_grows_until_capacity() {
        let mut store = ChainStore::new(3, 1);
        for i in 0..3 {
            store.add(0, element(i as f32)).unwrap();
            assert_eq!(store.count(0).unwrap(), i + 1);
        }
    }

    #[test]
    fn test_add_past_capacity_evicts_oldest() {
        // capacity 3, add positions 0..=3: the first add gets evicted
        let mut store = ChainStore::new(3, 1);
        for i in 0..4 {
            store.add(0, element(i as f32)).unwrap();
        }
        assert_eq!(store.count(0).unwrap(), 3);
        assert_eq!(positions(&store, 0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_retained_set_is_most_recent_in_order() {
        let mut store = ChainStore::new(4, 1);
        for i in 0..10 {
            store.add(0, element(i as f32)).unwrap();
        }
        assert_eq!(store.count(0).unwrap(), 4);
        assert_eq!(positions(&store, 0), vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_remove_discards_oldest() {
        // capacity 2: add A, add B, remove -> exactly B remains
        let mut store = ChainStore::new(2, 1);
        store.add(0, element(10.0)).unwrap();
        store.add(0, element(20.0)).unwrap();
        store.remove(0).unwrap();
        assert_eq!(store.count(0).unwrap(), 1);
        assert_eq!(store.get(0, 0).unwrap().position.x, 20.0);
    }

    #[test]
    fn test_remove_to_empty_and_no_underflow() {
        let mut store = ChainStore::new(2, 1);
        store.add(0, element(1.0)).unwrap();
        store.remove(0).unwrap();
        assert_eq!(store.count(0).unwrap(), 0);
        assert!(store.segments()[0].is_empty());

        // repeated removes on an empty chain are no-ops
        store.remove(0).unwrap();
        store.remove(0).unwrap();
        assert_eq!(store.count(0).unwrap(), 0);
    }

    #[test]
    fn test_add_after_empty_starts_fresh_ring() {
        let mut store = ChainStore::new(3, 1);
        store.add(0, element(1.0)).unwrap();
        store.remove(0).unwrap();
        store.add(0, element(2.0)).unwrap();
        let seg = store.segments()[0];
        assert_eq!((seg.head, seg.tail), (0, 0));
        assert_eq!(store.get(0, 0).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_update_is_head_relative_and_isolated() {
        let mut store = ChainStore::new(4, 1);
        for i in 0..3 {
            store.add(0, element(i as f32)).unwrap();
        }
        // index 0 = newest (2.0), index 2 = oldest (0.0)
        store.update(0, 2, element(99.0)).unwrap();
        assert_eq!(store.count(0).unwrap(), 3);
        assert_eq!(positions(&store, 0), vec![99.0, 1.0, 2.0]);
    }

    #[test]
    fn test_update_past_count_fails() {
        let mut store = ChainStore::new(4, 1);
        store.add(0, element(0.0)).unwrap();
        let err = store.update(0, 1, element(1.0)).unwrap_err();
        assert_eq!(
            err,
            ChainError::IndexOutOfRange {
                context: "element",
                index: 1,
                limit: 1,
            }
        );
    }

    #[test]
    fn test_chain_index_out_of_range() {
        let mut store = ChainStore::new(4, 2);
        let err = store.add(2, element(0.0)).unwrap_err();
        assert_eq!(
            err,
            ChainError::IndexOutOfRange {
                context: "chain",
                index: 2,
                limit: 2,
            }
        );
        assert!(store.get(5, 0).is_err());
        assert!(store.count(3).is_err());
    }

    #[test]
    fn test_chains_are_independent() {
        let mut store = ChainStore::new(3, 2);
        store.add(0, element(1.0)).unwrap();
        store.add(1, element(9.0)).unwrap();
        store.add(1, element(8.0)).unwrap();

        assert_eq!(store.count(0).unwrap(), 1);
        assert_eq!(store.count(1).unwrap(), 2);
        store.clear(0).unwrap();
        assert_eq!(store.count(0).unwrap(), 0);
        assert_eq!(store.count(1).unwrap(), 2);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut store = ChainStore::new(3, 1);
        for i in 0..5 {
            store.add(0, element(i as f32)).unwrap();
        }
        store.clear(0).unwrap();
        assert_eq!(store.count(0).unwrap(), 0);

        // a fresh ring starts over from slot zero
        store.add(0, element(7.0)).unwrap();
        assert_eq!(store.count(0).unwrap(), 1);
        assert_eq!(positions(&store, 0), vec![7.0]);
    }

    #[test]
    fn test_clear_all_empties_every_chain() {
        let mut store = ChainStore::new(2, 3);
        for chain in 0..3 {
            store.add(chain, element(chain as f32)).unwrap();
        }
        store.clear_all();
        for chain in 0..3 {
            assert_eq!(store.count(chain).unwrap(), 0);
        }
    }

    #[test]
    fn test_reset_discards_elements_and_updates_capacity() {
        let mut store = ChainStore::new(3, 2);
        store.add(0, element(1.0)).unwrap();
        store.add(1, element(2.0)).unwrap();

        store.reset(5, 4);
        assert_eq!(store.max_elements(), 5);
        assert_eq!(store.chain_count(), 4);
        for chain in 0..4 {
            assert_eq!(store.count(chain).unwrap(), 0);
        }
    }

    #[test]
    fn test_count_formula_through_wraparound() {
        let mut store = ChainStore::new(3, 1);
        for i in 0..7 {
            store.add(0, element(i as f32)).unwrap();
            let expected = usize::min(i + 1, 3);
            assert_eq!(store.count(0).unwrap(), expected);
        }
        // head has lapped the ring; formula still holds
        let seg = store.segments()[0];
        assert!(seg.head < 3 && seg.tail < 3);
    }
}
