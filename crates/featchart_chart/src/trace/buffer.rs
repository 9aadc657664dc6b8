//! Bounded storage for trace records.
//!
//! A parse of a long or very ambiguous sentence can produce far more events
//! than anyone wants to keep, so the buffer holds only the newest ones.

use std::collections::{BTreeMap, VecDeque};

use super::record::{TraceEvent, TraceRecord};

/// The newest trace records, up to a fixed capacity.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    /// Id of the next record. Never reset, not even by [`clear`](Self::clear).
    next_id: u64,
    evicted: u64,
}

impl TraceBuffer {
    /// An empty buffer holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 0,
            evicted: 0,
        }
    }

    /// Appends a record for `event`, evicting the oldest when full, and
    /// returns the new record's id.
    pub fn push(&mut self, step: u64, timestamp_ns: u64, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.capacity == 0 {
            self.evicted += 1;
            return id;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.evicted += 1;
        }
        self.records
            .push_back(TraceRecord::new(id, step, timestamp_ns, event));
        id
    }

    /// Number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Buffered records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Records stamped with agenda step `step`.
    #[must_use]
    pub fn records_for_step(&self, step: u64) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.step == step).collect()
    }

    /// The last `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Records whose event has the given [`TraceEvent::event_type`].
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.event_type() == event_type)
            .collect()
    }

    /// Summarizes the buffer.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let mut event_counts = BTreeMap::new();
        for record in &self.records {
            *event_counts.entry(record.event_type()).or_default() += 1;
        }
        TraceBufferStats {
            record_count: self.records.len(),
            capacity: self.capacity,
            evicted: self.evicted,
            last_step: self.records.back().map(|r| r.step),
            event_counts,
        }
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(10_000)
    }
}

/// A summary of a [`TraceBuffer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceBufferStats {
    /// Buffered records.
    pub record_count: usize,
    /// Capacity of the buffer.
    pub capacity: usize,
    /// Records pushed out by newer ones.
    pub evicted: u64,
    /// Agenda step of the newest record.
    pub last_step: Option<u64>,
    /// Buffered records per event type.
    pub event_counts: BTreeMap<&'static str, usize>,
}
