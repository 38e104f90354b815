//! Slot ranges and slot ownership tables.
//!
//! A [`SlotTable`] answers "which node owns this slot" in O(1). It can be
//! built from explicit ranges (as reported by `CLUSTER SLOTS`) or from an even
//! split over N primaries, which is how a freshly created cluster assigns
//! slots.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Total number of hash slots in a Valkey cluster.
pub const TOTAL_SLOTS: u16 = 16384;

/// Errors raised while describing slot ownership.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotRangeError {
    #[error("Invalid slot range: {0}")]
    InvalidRange(String),
    #[error("Slot {0} is outside 0..16384")]
    OutOfRange(u32),
}

/// A contiguous range of hash slots [start, end] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    /// Start of the slot range (inclusive).
    pub start: u16,
    /// End of the slot range (inclusive).
    pub end: u16,
}

impl SlotRange {
    /// Create a new slot range, checking `start <= end < TOTAL_SLOTS`.
    pub fn new(start: u16, end: u16) -> Result<Self, SlotRangeError> {
        if end >= TOTAL_SLOTS {
            return Err(SlotRangeError::OutOfRange(u32::from(end)));
        }
        if start > end {
            return Err(SlotRangeError::InvalidRange(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Create a single-slot range.
    pub fn single(slot: u16) -> Self {
        Self {
            start: slot,
            end: slot,
        }
    }

    /// Get the number of slots in this range.
    pub fn count(&self) -> u16 {
        self.end - self.start + 1
    }

    /// Check if this range contains a specific slot.
    pub fn contains(&self, slot: u16) -> bool {
        slot >= self.start && slot <= self.end
    }

    /// Iterate over all slots in this range.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for SlotRange {
    type Err = SlotRangeError;

    /// Parse `"start-end"` or a single `"slot"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| -> Result<u16, SlotRangeError> {
            let value: u32 = part
                .trim()
                .parse()
                .map_err(|_| SlotRangeError::InvalidRange(s.to_string()))?;
            u16::try_from(value)
                .ok()
                .filter(|v| *v < TOTAL_SLOTS)
                .ok_or(SlotRangeError::OutOfRange(value))
        };

        match s.split_once('-') {
            Some((start, end)) => SlotRange::new(parse(start)?, parse(end)?),
            None => parse(s).map(SlotRange::single),
        }
    }
}

/// Split all slots evenly over `node_count` nodes.
///
/// Remainder slots go to the earlier nodes (nodes 0..remainder get one extra).
/// At most one node per slot is used.
pub fn even_ranges(node_count: u16) -> Vec<SlotRange> {
    if node_count == 0 {
        return Vec::new();
    }
    let node_count = node_count.min(TOTAL_SLOTS);

    let per_node = TOTAL_SLOTS / node_count;
    let remainder = TOTAL_SLOTS % node_count;

    let mut ranges = Vec::with_capacity(usize::from(node_count));
    let mut start: u16 = 0;
    for i in 0..node_count {
        let count = per_node + u16::from(i < remainder);
        let end = start + count - 1;
        ranges.push(SlotRange { start, end });
        start = end.saturating_add(1);
    }
    ranges
}

/// Ownership of every slot by a node index.
#[derive(Debug, Clone)]
pub struct SlotTable {
    owners: Vec<Option<usize>>,
    node_count: usize,
}

impl SlotTable {
    /// Create a table where no slot has an owner.
    pub fn empty() -> Self {
        Self {
            owners: vec![None; usize::from(TOTAL_SLOTS)],
            node_count: 0,
        }
    }

    /// Create a table splitting all slots evenly over `node_count` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use valkey_cmds::slots::SlotTable;
    ///
    /// let table = SlotTable::even(3);
    /// assert_eq!(table.owner(0), Some(0));
    /// assert_eq!(table.owner(5461), Some(0));
    /// assert_eq!(table.owner(5462), Some(1));
    /// assert_eq!(table.owner(16383), Some(2));
    /// ```
    pub fn even(node_count: u16) -> Self {
        let ranges = even_ranges(node_count);
        Self::from_ranges(ranges.into_iter().enumerate().map(|(node, r)| (r, node)))
    }

    /// Create a table from `(range, node)` assignments.
    ///
    /// Later assignments win when ranges overlap.
    pub fn from_ranges<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (SlotRange, usize)>,
    {
        let mut table = Self::empty();
        for (range, node) in assignments {
            table.assign(range, node);
        }
        table
    }

    /// Assign every slot in `range` to `node`.
    pub fn assign(&mut self, range: SlotRange, node: usize) {
        for slot in range.iter() {
            if let Some(owner) = self.owners.get_mut(usize::from(slot)) {
                *owner = Some(node);
            }
        }
        self.node_count = self.node_count.max(node.saturating_add(1));
    }

    /// The node owning `slot`, if any.
    pub fn owner(&self, slot: u16) -> Option<usize> {
        self.owners.get(usize::from(slot)).copied().flatten()
    }

    /// The owner of the lowest owned slot, used for keyless commands.
    pub fn first_owner(&self) -> Option<usize> {
        self.owners.iter().find_map(|owner| *owner)
    }

    /// Number of distinct node indexes referenced by the table.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Check if no slot has an owner.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::get_unwrap
)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_range_new_rejects_inverted() {
        assert!(SlotRange::new(10, 5).is_err());
        assert_eq!(
            SlotRange::new(0, 16384),
            Err(SlotRangeError::OutOfRange(16384))
        );
    }

    #[test]
    fn test_slot_range_count_and_contains() {
        let range = SlotRange::new(100, 200).unwrap();
        assert_eq!(range.count(), 101);
        assert!(range.contains(100));
        assert!(range.contains(200));
        assert!(!range.contains(99));
        assert!(!range.contains(201));
        assert_eq!(SlotRange::single(7).count(), 1);
    }

    #[test]
    fn test_slot_range_parse() {
        assert_eq!(
            "0-5460".parse::<SlotRange>().unwrap(),
            SlotRange::new(0, 5460).unwrap()
        );
        assert_eq!("42".parse::<SlotRange>().unwrap(), SlotRange::single(42));
        assert!("abc".parse::<SlotRange>().is_err());
        assert!("0-99999".parse::<SlotRange>().is_err());
    }

    #[test]
    fn test_slot_range_display() {
        assert_eq!(SlotRange::new(0, 5461).unwrap().to_string(), "0-5461");
        assert_eq!(SlotRange::single(100).to_string(), "100");
    }

    #[test]
    fn test_even_ranges_cover_all_slots() {
        for node_count in 1..=20 {
            let ranges = even_ranges(node_count);
            let total: u32 = ranges.iter().map(|r| u32::from(r.count())).sum();
            assert_eq!(total, u32::from(TOTAL_SLOTS));
            assert_eq!(ranges.first().unwrap().start, 0);
            assert_eq!(ranges.last().unwrap().end, TOTAL_SLOTS - 1);
            for pair in ranges.windows(2) {
                assert_eq!(pair[1].start, pair[0].end + 1);
            }
        }
        assert!(even_ranges(0).is_empty());
        assert_eq!(even_ranges(u16::MAX).len(), usize::from(TOTAL_SLOTS));
    }

    #[test]
    fn test_even_table_three_nodes() {
        let table = SlotTable::even(3);
        assert_eq!(table.node_count(), 3);
        assert_eq!(table.owner(0), Some(0));
        assert_eq!(table.owner(5461), Some(0));
        assert_eq!(table.owner(5462), Some(1));
        assert_eq!(table.owner(10922), Some(1));
        assert_eq!(table.owner(10923), Some(2));
        assert_eq!(table.owner(16383), Some(2));
    }

    #[test]
    fn test_partial_table_has_gaps() {
        let table = SlotTable::from_ranges([(SlotRange::new(0, 99).unwrap(), 4)]);
        assert_eq!(table.owner(50), Some(4));
        assert_eq!(table.owner(100), None);
        assert_eq!(table.node_count(), 5);
        assert!(SlotTable::empty().is_empty());
        assert_eq!(SlotTable::empty().owner(0), None);
    }

    #[test]
    fn test_first_owner_skips_unowned_slots() {
        let table = SlotTable::from_ranges([(SlotRange::new(500, 600).unwrap(), 2)]);
        assert_eq!(table.first_owner(), Some(2));
        assert_eq!(SlotTable::empty().first_owner(), None);
    }

    #[test]
    fn test_assign_largest_node_index() {
        let mut table = SlotTable::empty();
        table.assign(SlotRange::single(0), usize::MAX);
        assert_eq!(table.owner(0), Some(usize::MAX));
        assert_eq!(table.node_count(), usize::MAX);
        assert!(!table.is_empty());
    }
}
