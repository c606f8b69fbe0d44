// ── Ranking engine ──
//
// Every call builds its own heaps; nothing is shared between devices or
// between the two directions. Heap order is (bytes desc, discovery asc),
// so repeated max-extraction is deterministic for equal counters.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::model::{Direction, InterfaceCounter, RankedEntry, Rankings};

/// Full-set or bounded ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingMode {
    /// Rank every interface.
    #[default]
    Full,
    /// Keep only the N busiest interfaces per direction.
    Top(usize),
}

impl RankingMode {
    pub fn from_top(top: Option<usize>) -> Self {
        top.map_or(Self::Full, Self::Top)
    }

    pub fn rank(self, counters: &[InterfaceCounter]) -> Rankings {
        match self {
            Self::Full => rank(counters),
            Self::Top(k) => rank_top(counters, k),
        }
    }
}

/// Heap item: one interface keyed on one direction.
#[derive(Debug)]
struct Keyed<'a> {
    bytes: u64,
    order: usize,
    name: &'a str,
}

impl Ord for Keyed<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes
            .cmp(&other.bytes)
            // Earlier discovery wins a tie, so it must compare greater.
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Keyed<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Keyed<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Keyed<'_> {}

impl From<Keyed<'_>> for RankedEntry {
    fn from(k: Keyed<'_>) -> Self {
        RankedEntry::new(k.name, k.bytes)
    }
}

fn keyed(counters: &[InterfaceCounter], direction: Direction) -> impl Iterator<Item = Keyed<'_>> {
    counters.iter().enumerate().map(move |(order, c)| Keyed {
        bytes: c.bytes(direction),
        order,
        name: &c.name,
    })
}

/// Rank every interface by inbound and by outbound bytes.
///
/// Each output has one entry per input counter, sorted descending by
/// bytes; equal counts keep their input order.
pub fn rank(counters: &[InterfaceCounter]) -> Rankings {
    Rankings {
        inbound: rank_by(counters, Direction::Inbound),
        outbound: rank_by(counters, Direction::Outbound),
    }
}

/// Full descending ranking for a single direction.
pub fn rank_by(counters: &[InterfaceCounter], direction: Direction) -> Vec<RankedEntry> {
    let mut heap: BinaryHeap<Keyed<'_>> = keyed(counters, direction).collect();
    let mut ranked = Vec::with_capacity(heap.len());
    while let Some(top) = heap.pop() {
        ranked.push(top.into());
    }
    ranked
}

/// Bounded variant of [`rank`]: the `k` busiest interfaces per direction.
///
/// Equal to the first `k` entries of [`rank`] for the same input, at
/// O(n log k) with O(k) memory.
pub fn rank_top(counters: &[InterfaceCounter], k: usize) -> Rankings {
    Rankings {
        inbound: rank_top_by(counters, Direction::Inbound, k),
        outbound: rank_top_by(counters, Direction::Outbound, k),
    }
}

/// Bounded ranking for a single direction.
pub fn rank_top_by(
    counters: &[InterfaceCounter],
    direction: Direction,
    k: usize,
) -> Vec<RankedEntry> {
    if k == 0 {
        return Vec::new();
    }

    // Min-heap of the current best k; the root is the weakest keeper.
    let mut heap: BinaryHeap<Reverse<Keyed<'_>>> = BinaryHeap::with_capacity(k + 1);
    for item in keyed(counters, direction) {
        heap.push(Reverse(item));
        if heap.len() > k {
            heap.pop();
        }
    }

    // Ascending by `Reverse` is descending by the keyed order.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(item)| item.into())
        .collect()
}
