//! Bounded storage for trace records.

use std::collections::{BTreeMap, VecDeque};

use super::record::{CompilePhase, TraceEvent, TraceRecord};

/// Default number of records kept before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// The most recent trace records of a compilation, oldest first.
///
/// Once `capacity` records are held, each push drops the oldest one. Record
/// ids keep counting, so a gap at the front shows how much was dropped.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_id: u64,
}

impl TraceBuffer {
    /// Creates a buffer holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
            next_id: 0,
        }
    }

    /// Stores an event and returns the id it was given.
    pub fn push(&mut self, phase: CompilePhase, timestamp_ns: u64, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        if self.capacity > 0 {
            self.records
                .push_back(TraceRecord::new(id, phase, timestamp_ns, event));
        }
        id
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been recorded (or everything was dropped).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records dropped to stay within capacity.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.next_id - self.records.len() as u64
    }

    /// Records in the order they were pushed.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// The newest record.
    #[must_use]
    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.back()
    }

    /// Records made while the compiler was in `phase`.
    #[must_use]
    pub fn records_for_phase(&self, phase: CompilePhase) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.phase == phase).collect()
    }

    /// Records whose event has the given type name (`"rule-inlined"`, ...).
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.event_type() == event_type)
            .collect()
    }

    /// How many records of each event type are held, by type name.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.event_type()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
