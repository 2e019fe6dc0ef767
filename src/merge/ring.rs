//! The SlotRing - bounded window of in-flight blocks.

use tracing::{trace, warn};

use crate::digest::BlockDigest;
use crate::error::EtagError;

use super::TopDigestAccumulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Free,
    Pending { sequence: u64 },
    Done { sequence: u64, digest: BlockDigest },
}

/// Fixed-size circular buffer coordinating blocks between allocation and
/// merge.
///
/// Each allocation reserves the slot after the tail and hands out the next
/// sequence number. A committed block stays in its slot until every block
/// allocated before it has been committed as well; [`drain_ready`] then
/// merges the contiguous run of done slots at the head into the
/// accumulator and frees them. The ring size therefore bounds how far a
/// fast worker can race ahead of the slowest in-flight block.
///
/// [`drain_ready`]: SlotRing::drain_ready
///
/// # Example
///
/// ```
/// use etagrs::{BlockHasher, SlotRing, TopDigestAccumulator};
///
/// let mut ring = SlotRing::new(2)?;
/// let mut acc = TopDigestAccumulator::new();
///
/// let first = ring.allocate(&mut acc)?;
/// let second = ring.allocate(&mut acc)?;
///
/// let mut block = BlockHasher::new();
/// block.feed(b"second")?;
/// ring.commit(second, block.finalize()?)?;
/// // The head is still pending, so nothing merges yet.
/// assert_eq!(ring.drain_ready(&mut acc), 0);
///
/// let mut block = BlockHasher::new();
/// block.feed(b"first")?;
/// ring.commit(first, block.finalize()?)?;
/// assert_eq!(ring.drain_ready(&mut acc), 2);
/// assert!(ring.is_empty());
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SlotRing {
    slots: Vec<Slot>,
    head: usize,
    tail: usize,
    free: usize,
    next_sequence: u64,
}

impl SlotRing {
    /// Creates a ring with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] for a zero capacity and
    /// [`EtagError::OutOfMemory`] if the slot storage cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self, EtagError> {
        if capacity == 0 {
            return Err(EtagError::invalid_usage("ring capacity must be non-zero"));
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| EtagError::OutOfMemory {
                requested: capacity,
            })?;
        slots.resize(capacity, Slot::Free);

        Ok(Self {
            slots,
            head: 0,
            tail: 0,
            free: capacity,
            next_sequence: 0,
        })
    }

    /// Reserves a slot for the next block and returns its sequence number.
    ///
    /// When the ring is full this first drains whatever is ready. It never
    /// waits for a slot to free up.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::ResourceExhausted`] if the ring is still full
    /// after draining. The ring is left unchanged.
    pub fn allocate(&mut self, acc: &mut TopDigestAccumulator) -> Result<u64, EtagError> {
        if self.free == 0 {
            self.drain_ready(acc);
            if self.free == 0 {
                warn!(
                    capacity = self.capacity(),
                    head_sequence = self.oldest_sequence(),
                    "slot ring exhausted"
                );
                return Err(EtagError::ResourceExhausted {
                    capacity: self.capacity(),
                });
            }
        }

        let sequence = self.next_sequence;
        self.slots[self.tail] = Slot::Pending { sequence };
        self.tail = self.advance(self.tail);
        self.free -= 1;
        self.next_sequence += 1;
        Ok(sequence)
    }

    /// Marks the block with `sequence` as done and stores its digest.
    ///
    /// The digest is not merged here; call [`drain_ready`](Self::drain_ready).
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if `sequence` is not currently
    /// pending in the ring.
    pub fn commit(&mut self, sequence: u64, digest: BlockDigest) -> Result<(), EtagError> {
        let oldest = self.oldest_sequence();
        if sequence < oldest || sequence >= self.next_sequence {
            return Err(EtagError::invalid_usage("commit of a block not in flight"));
        }

        let offset = (sequence - oldest) as usize;
        let index = (self.head + offset) % self.slots.len();
        match self.slots[index] {
            Slot::Pending { sequence: pending } if pending == sequence => {
                self.slots[index] = Slot::Done { sequence, digest };
                trace!(sequence, "block committed");
                Ok(())
            }
            _ => Err(EtagError::invalid_usage("block committed twice")),
        }
    }

    /// Merges the contiguous run of done slots at the head into `acc`.
    ///
    /// Stops at the first slot that is not done. Returns the number of
    /// blocks merged.
    pub fn drain_ready(&mut self, acc: &mut TopDigestAccumulator) -> usize {
        let mut merged = 0;
        while self.free < self.slots.len() {
            let Slot::Done { sequence, digest } = self.slots[self.head] else {
                break;
            };
            acc.feed(&digest);
            trace!(sequence, "block merged");

            self.slots[self.head] = Slot::Free;
            self.head = self.advance(self.head);
            self.free += 1;
            merged += 1;
        }
        merged
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of free slots.
    pub fn free(&self) -> usize {
        self.free
    }

    /// Returns the number of allocated, not yet merged blocks.
    pub fn in_flight(&self) -> usize {
        self.slots.len() - self.free
    }

    /// Returns the number of allocated blocks not yet committed.
    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Pending { .. }))
            .count()
    }

    /// Returns `true` if no block is waiting to be merged.
    pub fn is_empty(&self) -> bool {
        self.free == self.slots.len()
    }

    /// Returns the sequence number the next allocation will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Frees every slot and restarts sequence numbering.
    pub fn reset(&mut self) {
        self.slots.fill(Slot::Free);
        self.head = 0;
        self.tail = 0;
        self.free = self.slots.len();
        self.next_sequence = 0;
    }

    fn oldest_sequence(&self) -> u64 {
        self.next_sequence - self.in_flight() as u64
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha1Hasher;

    fn digest(n: u64) -> BlockDigest {
        Sha1Hasher::hash(&n.to_le_bytes())
    }

    fn expected_top(seqs: &[u64]) -> BlockDigest {
        let mut acc = TopDigestAccumulator::new();
        for &n in seqs {
            acc.feed(&digest(n));
        }
        acc.finalize()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            SlotRing::new(0),
            Err(EtagError::InvalidUsage { .. })
        ));
    }

    #[test]
    fn test_allocate_hands_out_sequences() {
        let mut ring = SlotRing::new(3).unwrap();
        let mut acc = TopDigestAccumulator::new();

        assert_eq!(ring.allocate(&mut acc).unwrap(), 0);
        assert_eq!(ring.allocate(&mut acc).unwrap(), 1);
        assert_eq!(ring.free(), 1);
        assert_eq!(ring.in_flight(), 2);
        assert_eq!(ring.pending(), 2);
        assert_eq!(ring.next_sequence(), 2);
    }

    #[test]
    fn test_out_of_order_commit_merges_in_order() {
        let mut ring = SlotRing::new(4).unwrap();
        let mut acc = TopDigestAccumulator::new();
        for _ in 0..4 {
            ring.allocate(&mut acc).unwrap();
        }

        ring.commit(3, digest(3)).unwrap();
        ring.commit(1, digest(1)).unwrap();
        assert_eq!(ring.drain_ready(&mut acc), 0);

        assert_eq!(ring.pending(), 2);
        ring.commit(0, digest(0)).unwrap();
        assert_eq!(ring.drain_ready(&mut acc), 2);
        assert_eq!(ring.in_flight(), 2);

        ring.commit(2, digest(2)).unwrap();
        assert_eq!(ring.drain_ready(&mut acc), 2);
        assert!(ring.is_empty());

        assert_eq!(acc.merged(), 4);
        assert_eq!(acc.finalize(), expected_top(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_wraparound_many_times() {
        let mut ring = SlotRing::new(3).unwrap();
        let mut acc = TopDigestAccumulator::new();
        let mut seqs = Vec::new();

        for _ in 0..10 {
            let a = ring.allocate(&mut acc).unwrap();
            let b = ring.allocate(&mut acc).unwrap();
            ring.commit(b, digest(b)).unwrap();
            ring.commit(a, digest(a)).unwrap();
            seqs.extend([a, b]);
        }
        ring.drain_ready(&mut acc);

        assert!(ring.is_empty());
        assert_eq!(acc.finalize(), expected_top(&seqs));
    }

    #[test]
    fn test_allocate_drains_when_full() {
        let mut ring = SlotRing::new(2).unwrap();
        let mut acc = TopDigestAccumulator::new();
        let a = ring.allocate(&mut acc).unwrap();
        let b = ring.allocate(&mut acc).unwrap();
        ring.commit(b, digest(b)).unwrap();
        ring.commit(a, digest(a)).unwrap();

        // Full, but both slots are done: allocation drains and succeeds.
        assert_eq!(ring.allocate(&mut acc).unwrap(), 2);
        assert_eq!(acc.merged(), 2);
    }

    #[test]
    fn test_exhaustion_leaves_ring_intact() {
        let mut ring = SlotRing::new(2).unwrap();
        let mut acc = TopDigestAccumulator::new();
        let a = ring.allocate(&mut acc).unwrap();
        let b = ring.allocate(&mut acc).unwrap();
        ring.commit(b, digest(b)).unwrap();

        let err = ring.allocate(&mut acc).unwrap_err();
        assert!(matches!(err, EtagError::ResourceExhausted { capacity: 2 }));
        assert_eq!(ring.in_flight(), 2);
        assert_eq!(ring.next_sequence(), 2);

        ring.commit(a, digest(a)).unwrap();
        assert_eq!(ring.allocate(&mut acc).unwrap(), 2);
        assert_eq!(acc.finalize(), expected_top(&[0, 1]));
    }

    #[test]
    fn test_bad_commits_rejected() {
        let mut ring = SlotRing::new(2).unwrap();
        let mut acc = TopDigestAccumulator::new();
        let a = ring.allocate(&mut acc).unwrap();

        // Never allocated.
        assert!(ring.commit(5, digest(5)).is_err());

        ring.commit(a, digest(a)).unwrap();
        assert!(matches!(
            ring.commit(a, digest(a)),
            Err(EtagError::InvalidUsage { .. })
        ));

        ring.drain_ready(&mut acc);
        // Already merged.
        assert!(ring.commit(a, digest(a)).is_err());
        assert_eq!(acc.merged(), 1);
    }

    #[test]
    fn test_single_slot_ring() {
        let mut ring = SlotRing::new(1).unwrap();
        let mut acc = TopDigestAccumulator::new();
        for n in 0..5 {
            let seq = ring.allocate(&mut acc).unwrap();
            assert_eq!(seq, n);
            ring.commit(seq, digest(seq)).unwrap();
        }
        ring.drain_ready(&mut acc);
        assert_eq!(acc.finalize(), expected_top(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_reset() {
        let mut ring = SlotRing::new(2).unwrap();
        let mut acc = TopDigestAccumulator::new();
        ring.allocate(&mut acc).unwrap();
        ring.allocate(&mut acc).unwrap();

        ring.reset();
        assert!(ring.is_empty());
        assert_eq!(ring.next_sequence(), 0);
        assert_eq!(ring.allocate(&mut acc).unwrap(), 0);
    }
}
