/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Session-scoped bookkeeping for QoS 1 and 2 message delivery: allocation of the 16-bit
//! packet id space and tracking of in-flight publish operations by packet id.

use crate::error::{MqttError, MqttResult};

use log::*;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Smallest permitted packet id pool bucket size.
pub const MINIMUM_PACKET_ID_POOL_BUCKET_SIZE : usize = 64;

/// Largest permitted packet id pool bucket size.
pub const MAXIMUM_PACKET_ID_POOL_BUCKET_SIZE : usize = 16384;

/// Bucket size used by a default-constructed packet id pool.
pub const DEFAULT_PACKET_ID_POOL_BUCKET_SIZE : usize = 1024;

const PACKET_ID_SPACE_SIZE : u32 = 65536;

#[derive(Debug)]
struct IdBucket {
    base: u16,

    capacity: usize,

    // one bit per id; a set bit means the id is currently acquired
    bits: Mutex<Vec<u64>>,

    next: OnceLock<Box<IdBucket>>,
}

impl IdBucket {
    fn new(base: u16, capacity: usize) -> Self {
        let mut words = vec![0u64; capacity / 64];

        // id zero can never be handed out
        if base == 0 {
            words[0] = 1;
        }

        IdBucket {
            base,
            capacity,
            bits: Mutex::new(words),
            next: OnceLock::new(),
        }
    }

    fn lock_bits(&self) -> MqttResult<MutexGuard<'_, Vec<u64>>> {
        self.bits.lock().map_err(|_| {
            error!("PacketIdPool - bucket lock poisoned");
            MqttError::new_internal_state_error("packet id pool bucket lock poisoned")
        })
    }

    fn try_acquire(&self) -> MqttResult<Option<u16>> {
        let mut bits = self.lock_bits()?;

        for (word_index, word) in bits.iter_mut().enumerate() {
            if *word != u64::MAX {
                let bit = word.trailing_ones() as usize;
                *word |= 1u64 << bit;

                return Ok(Some(self.base + (word_index * 64 + bit) as u16));
            }
        }

        Ok(None)
    }

    fn release(&self, packet_id: u16) -> MqttResult<()> {
        let offset = (packet_id - self.base) as usize;
        let word_index = offset / 64;
        let bit = offset % 64;

        let mut bits = self.lock_bits()?;
        if (bits[word_index] & (1u64 << bit)) == 0 {
            error!("PacketIdPool - release of unacquired packet id ({})", packet_id);
            return Err(MqttError::new_packet_id_release_failure("release of an unacquired packet id"));
        }

        bits[word_index] &= !(1u64 << bit);

        Ok(())
    }
}

/// A concurrent allocator for the non-zero MQTT packet id space.
///
/// Ids are tracked in a chain of fixed-size bit-set buckets that grows lazily as lower ids
/// fill up; an application with few concurrent operations only ever touches the first bucket.
/// All operations are safe to call from multiple threads simultaneously.
#[derive(Debug)]
pub struct PacketIdPool {
    head: IdBucket,
}

impl PacketIdPool {

    /// Creates a new pool whose buckets each track `bucket_size` ids.  The bucket size must be
    /// a power of two within
    /// [`MINIMUM_PACKET_ID_POOL_BUCKET_SIZE`, `MAXIMUM_PACKET_ID_POOL_BUCKET_SIZE`].
    pub fn new(bucket_size: usize) -> MqttResult<Self> {
        if !(MINIMUM_PACKET_ID_POOL_BUCKET_SIZE..=MAXIMUM_PACKET_ID_POOL_BUCKET_SIZE).contains(&bucket_size) || !bucket_size.is_power_of_two() {
            error!("PacketIdPool - invalid bucket size ({})", bucket_size);
            return Err(MqttError::new_configuration_failure("packet id pool bucket size must be a power of two within the permitted range"));
        }

        Ok(PacketIdPool {
            head: IdBucket::new(0, bucket_size),
        })
    }

    /// Acquires an unused packet id, preferring the numerically smallest one available.
    ///
    /// Fails with [`MqttError::PacketIdSpaceExhausted`](crate::error::MqttError) when all
    /// 65535 usable ids are simultaneously in use.
    pub fn acquire(&self) -> MqttResult<u16> {
        let mut current = &self.head;

        loop {
            if let Some(packet_id) = current.try_acquire()? {
                return Ok(packet_id);
            }

            let next_base = current.base as u32 + current.capacity as u32;
            if next_base >= PACKET_ID_SPACE_SIZE {
                return Err(MqttError::new_packet_id_space_exhausted());
            }

            current = current.next.get_or_init(|| Box::new(IdBucket::new(next_base as u16, current.capacity))).as_ref();
        }
    }

    /// Returns a previously acquired packet id to the pool.
    ///
    /// Releasing id zero or an id that is not currently acquired fails with
    /// [`MqttError::PacketIdReleaseFailure`](crate::error::MqttError).
    pub fn release(&self, packet_id: u16) -> MqttResult<()> {
        if packet_id == 0 {
            error!("PacketIdPool - packet id zero is permanently reserved");
            return Err(MqttError::new_packet_id_release_failure("packet id zero is permanently reserved"));
        }

        let mut current = &self.head;

        loop {
            let bucket_end = current.base as u32 + current.capacity as u32;
            if (packet_id as u32) < bucket_end {
                return current.release(packet_id);
            }

            match current.next.get() {
                Some(next) => { current = next.as_ref(); }
                None => {
                    error!("PacketIdPool - release of unacquired packet id ({})", packet_id);
                    return Err(MqttError::new_packet_id_release_failure("release of an unacquired packet id"));
                }
            }
        }
    }
}

impl Default for PacketIdPool {
    fn default() -> Self {
        PacketIdPool {
            head: IdBucket::new(0, DEFAULT_PACKET_ID_POOL_BUCKET_SIZE),
        }
    }
}

/// A concurrent map from packet id to per-operation state that preserves insertion order.
///
/// Insertion order matters because unacknowledged QoS 1 and 2 operations must be replayed in
/// their original submission order after a session resumption.
pub struct PublishStateTable<T> {
    entries: Mutex<Vec<(u16, T)>>,
}

impl<T : Clone> PublishStateTable<T> {

    pub fn new() -> Self {
        PublishStateTable {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<(u16, T)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Binds `state` to `packet_id`.  An id already present keeps its original position in the
    /// insertion order; only its state is replaced.
    pub fn insert(&self, packet_id: u16, state: T) {
        let mut entries = self.lock_entries();

        if let Some(entry) = entries.iter_mut().find(|(id, _)| *id == packet_id) {
            entry.1 = state;
            return;
        }

        entries.push((packet_id, state));
    }

    /// Removes and returns the state bound to `packet_id`, if any.
    pub fn remove(&self, packet_id: u16) -> Option<T> {
        let mut entries = self.lock_entries();

        let index = entries.iter().position(|(id, _)| *id == packet_id)?;

        Some(entries.remove(index).1)
    }

    /// Returns a clone of the state bound to `packet_id`, if any.
    pub fn get(&self, packet_id: u16) -> Option<T> {
        let entries = self.lock_entries();

        entries.iter().find(|(id, _)| *id == packet_id).map(|(_, state)| state.clone())
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Creates an insertion-order iterator over the table.
    ///
    /// The iterator takes the table's lock on its first advance and holds it until it is
    /// exhausted, released, or dropped; other threads block on table access for that span.
    pub fn iter(&self) -> PublishStateIter<'_, T> {
        PublishStateIter {
            table: self,
            guard: None,
            index: 0,
            current: None,
            started: false,
        }
    }
}

impl<T : Clone> Default for PublishStateTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Insertion-order iterator over a [`PublishStateTable`].  Entries are cloned out as the
/// iterator advances.
pub struct PublishStateIter<'a, T> {
    table: &'a PublishStateTable<T>,

    guard: Option<MutexGuard<'a, Vec<(u16, T)>>>,

    index: usize,

    current: Option<(u16, T)>,

    started: bool,
}

impl<'a, T : Clone> PublishStateIter<'a, T> {

    /// Advances to the next entry, returning a clone of it.  Returns None once the table's
    /// entries are exhausted or after the iterator has been released.
    pub fn advance(&mut self) -> Option<(u16, T)> {
        if !self.started {
            self.started = true;
            self.guard = Some(self.table.lock_entries());
        }

        let guard = self.guard.as_ref()?;

        if self.index >= guard.len() {
            self.guard = None;
            self.current = None;
            return None;
        }

        let entry = guard[self.index].clone();
        self.index += 1;
        self.current = Some(entry.clone());

        Some(entry)
    }

    /// Returns the entry the iterator is currently positioned on.  Remains available after the
    /// iterator has been released.
    pub fn current(&self) -> Option<&(u16, T)> {
        self.current.as_ref()
    }

    /// Drops the table lock without waiting for the iterator itself to be dropped.  Safe to
    /// call repeatedly.
    pub fn release(&mut self) {
        self.started = true;
        self.guard = None;
    }
}

impl<'a, T : Clone> Iterator for PublishStateIter<'a, T> {
    type Item = (u16, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::Rng;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn packet_id_pool_acquire_skips_zero() {
        let pool = PacketIdPool::default();

        assert_eq!(1, pool.acquire().unwrap());
        assert_eq!(2, pool.acquire().unwrap());
        assert_eq!(3, pool.acquire().unwrap());
    }

    #[test]
    fn packet_id_pool_reuses_released_ids() {
        let pool = PacketIdPool::default();

        for _ in 0..10 {
            pool.acquire().unwrap();
        }

        pool.release(4).unwrap();
        pool.release(7).unwrap();

        assert_eq!(4, pool.acquire().unwrap());
        assert_eq!(7, pool.acquire().unwrap());
        assert_eq!(11, pool.acquire().unwrap());
    }

    #[test]
    fn packet_id_pool_invalid_bucket_sizes() {
        assert_matches!(PacketIdPool::new(32), Err(MqttError::ConfigurationFailure(_)));
        assert_matches!(PacketIdPool::new(100), Err(MqttError::ConfigurationFailure(_)));
        assert_matches!(PacketIdPool::new(32768), Err(MqttError::ConfigurationFailure(_)));
        assert_matches!(PacketIdPool::new(0), Err(MqttError::ConfigurationFailure(_)));

        assert!(PacketIdPool::new(MINIMUM_PACKET_ID_POOL_BUCKET_SIZE).is_ok());
        assert!(PacketIdPool::new(MAXIMUM_PACKET_ID_POOL_BUCKET_SIZE).is_ok());
    }

    #[test]
    fn packet_id_pool_grows_across_buckets() {
        let pool = PacketIdPool::new(MINIMUM_PACKET_ID_POOL_BUCKET_SIZE).unwrap();

        for expected in 1..=200u16 {
            assert_eq!(expected, pool.acquire().unwrap());
        }

        pool.release(150).unwrap();
        assert_eq!(150, pool.acquire().unwrap());
    }

    #[test]
    fn packet_id_pool_exhaustion() {
        let pool = PacketIdPool::default();

        for _ in 0..65535 {
            pool.acquire().unwrap();
        }

        assert_matches!(pool.acquire(), Err(MqttError::PacketIdSpaceExhausted(_)));

        pool.release(31250).unwrap();
        assert_eq!(31250, pool.acquire().unwrap());
        assert_matches!(pool.acquire(), Err(MqttError::PacketIdSpaceExhausted(_)));
    }

    #[test]
    fn packet_id_pool_release_misuse() {
        let pool = PacketIdPool::default();
        let packet_id = pool.acquire().unwrap();

        assert_matches!(pool.release(0), Err(MqttError::PacketIdReleaseFailure(_)));
        assert_matches!(pool.release(packet_id + 1), Err(MqttError::PacketIdReleaseFailure(_)));

        // beyond any existing bucket
        assert_matches!(pool.release(60000), Err(MqttError::PacketIdReleaseFailure(_)));

        pool.release(packet_id).unwrap();
        assert_matches!(pool.release(packet_id), Err(MqttError::PacketIdReleaseFailure(_)));
    }

    #[test]
    fn packet_id_pool_concurrent_acquires_are_unique() {
        let pool = Arc::new(PacketIdPool::default());
        let mut join_handles = Vec::new();

        for _ in 0..8 {
            let thread_pool = pool.clone();
            join_handles.push(std::thread::spawn(move || {
                let mut acquired = Vec::new();
                for _ in 0..500 {
                    acquired.push(thread_pool.acquire().unwrap());
                }
                acquired
            }));
        }

        let mut all_ids = HashSet::new();
        for join_handle in join_handles {
            for packet_id in join_handle.join().unwrap() {
                assert_ne!(0, packet_id);
                assert!(all_ids.insert(packet_id));
            }
        }

        assert_eq!(4000, all_ids.len());
    }

    #[test]
    fn packet_id_pool_random_closed_loop() {
        let pool = PacketIdPool::new(MINIMUM_PACKET_ID_POOL_BUCKET_SIZE).unwrap();
        let mut rng = rand::thread_rng();
        let mut held = Vec::new();

        for _ in 0..10000 {
            if held.is_empty() || rng.gen_bool(0.6) {
                let packet_id = pool.acquire().unwrap();
                assert!(!held.contains(&packet_id));
                held.push(packet_id);
            } else {
                let index = rng.gen_range(0..held.len());
                let packet_id = held.swap_remove(index);
                pool.release(packet_id).unwrap();
            }
        }

        for packet_id in held {
            pool.release(packet_id).unwrap();
        }
    }

    #[test]
    fn publish_state_table_insert_get_remove() {
        let table : PublishStateTable<String> = PublishStateTable::new();

        assert!(table.is_empty());
        assert_eq!(None, table.get(1));

        table.insert(1, "first".to_string());
        table.insert(2, "second".to_string());

        assert_eq!(2, table.len());
        assert_eq!(Some("first".to_string()), table.get(1));
        assert_eq!(Some("second".to_string()), table.remove(2));
        assert_eq!(None, table.remove(2));
        assert_eq!(1, table.len());

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn publish_state_table_update_preserves_insertion_order() {
        let table : PublishStateTable<u32> = PublishStateTable::new();

        table.insert(5, 50);
        table.insert(3, 30);
        table.insert(9, 90);
        table.insert(3, 31);

        let entries : Vec<(u16, u32)> = table.iter().collect();
        assert_eq!(vec!((5, 50), (3, 31), (9, 90)), entries);
    }

    #[test]
    fn publish_state_table_iter_release_is_idempotent() {
        let table : PublishStateTable<u32> = PublishStateTable::new();

        table.insert(1, 10);
        table.insert(2, 20);

        let mut iter = table.iter();
        assert_eq!(Some((1, 10)), iter.advance());
        assert_eq!(Some(&(1, 10)), iter.current());

        iter.release();
        iter.release();

        // current survives release; further advances do not resume
        assert_eq!(Some(&(1, 10)), iter.current());
        assert_eq!(None, iter.advance());

        // the table is usable again once the iterator has released the lock
        table.insert(3, 30);
        assert_eq!(3, table.len());
    }

    #[test]
    fn publish_state_table_iter_exhaustion_releases_lock() {
        let table : PublishStateTable<u32> = PublishStateTable::new();

        table.insert(1, 10);

        let mut iter = table.iter();
        assert_eq!(Some((1, 10)), iter.advance());
        assert_eq!(None, iter.advance());

        // lock must be free here even though the iterator is still alive
        table.insert(2, 20);
        assert_eq!(2, table.len());
    }

    #[test]
    fn publish_state_table_concurrent_mutation() {
        let table : Arc<PublishStateTable<u64>> = Arc::new(PublishStateTable::new());
        let mut join_handles = Vec::new();

        for thread_index in 0..4u16 {
            let thread_table = table.clone();
            join_handles.push(std::thread::spawn(move || {
                let base = thread_index * 1000;
                for offset in 0..250u16 {
                    thread_table.insert(base + offset, (base + offset) as u64);
                }
            }));
        }

        for join_handle in join_handles {
            join_handle.join().unwrap();
        }

        assert_eq!(1000, table.len());
        for (packet_id, state) in table.iter() {
            assert_eq!(packet_id as u64, state);
        }
    }
}
