//! Transposition table for caching search results.
//!
//! The table is shared by every search thread without locks. Each slot is three
//! `AtomicU64` words: the key, the packed data, and `key ^ data`. A reader that sees a
//! slot half-written by another thread finds `check ^ data != key` and treats the slot as
//! a miss, so torn reads never leak into the search.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::PackedMove;

/// Default table size in megabytes
pub const DEFAULT_TT_MB: usize = 256;

/// What the stored score means relative to the window it was searched with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// Exact score: alpha was raised and no cutoff happened
    Pv,
    /// Fail high: the score is a lower bound (beta was stored)
    Cut,
    /// Fail low: the score is an upper bound (alpha was stored)
    All,
}

impl NodeType {
    // zero is reserved for empty slots
    fn to_u8(self) -> u8 {
        match self {
            NodeType::Pv => 1,
            NodeType::Cut => 2,
            NodeType::All => 3,
        }
    }

    fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(NodeType::Pv),
            2 => Some(NodeType::Cut),
            3 => Some(NodeType::All),
            _ => None,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub score: i32,
    pub depth: u32,
    /// Move count of the position when the entry was written
    pub age: u32,
    pub best_move: PackedMove,
    pub node_type: NodeType,
}

impl TtEntry {
    #[must_use]
    pub fn best_move(&self) -> Option<PackedMove> {
        (!self.best_move.is_none()).then_some(self.best_move)
    }
}

/// Packed data word:
/// - bits 0-15:  score (i16)
/// - bits 16-31: best move (packed from/to/promotion, 0 = none)
/// - bits 32-39: depth
/// - bits 40-47: node type
/// - bits 48-63: age
fn pack_entry(score: i32, depth: u32, age: u32, best_move: PackedMove, node_type: NodeType) -> u64 {
    let score = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    let depth = depth.min(u32::from(u8::MAX)) as u8;
    let age = (age & 0xFFFF) as u16;

    u64::from(score as u16)
        | (u64::from(best_move.0) << 16)
        | (u64::from(depth) << 32)
        | (u64::from(node_type.to_u8()) << 40)
        | (u64::from(age) << 48)
}

fn unpack_entry(key: u64, data: u64) -> Option<TtEntry> {
    let node_type = NodeType::from_u8(((data >> 40) & 0xFF) as u8)?;
    Some(TtEntry {
        key,
        score: i32::from((data & 0xFFFF) as u16 as i16),
        best_move: PackedMove(((data >> 16) & 0xFFFF) as u16),
        depth: ((data >> 32) & 0xFF) as u32,
        node_type,
        age: ((data >> 48) & 0xFFFF) as u32,
    })
}

/// One table slot.
struct TtSlot {
    key: AtomicU64,
    data: AtomicU64,
    /// `key ^ data`, written last
    check: AtomicU64,
}

impl TtSlot {
    fn new() -> Self {
        TtSlot {
            key: AtomicU64::new(0),
            data: AtomicU64::new(0),
            check: AtomicU64::new(0),
        }
    }

    /// Consistent (key, data) pair, or `None` for an empty or corrupted slot.
    fn read(&self) -> Option<(u64, u64)> {
        let key = self.key.load(Ordering::Acquire);
        let data = self.data.load(Ordering::Acquire);
        let check = self.check.load(Ordering::Acquire);
        if data == 0 || check ^ data != key {
            return None;
        }
        Some((key, data))
    }

    fn write(&self, key: u64, data: u64) {
        self.key.store(key, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.check.store(key ^ data, Ordering::Release);
    }

    fn clear(&self) {
        self.key.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
        self.check.store(0, Ordering::Relaxed);
    }

    fn is_occupied(&self) -> bool {
        self.data.load(Ordering::Relaxed) != 0
    }
}

/// Thread-safe transposition table using lockless hashing.
///
/// Multiple threads can read and write concurrently without locks; share it by
/// reference or through an `Arc`.
pub struct TranspositionTable {
    slots: Vec<TtSlot>,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes (at least one slot).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let slot_size = mem::size_of::<TtSlot>();
        let capacity = (size_mb.saturating_mul(1024 * 1024) / slot_size).max(1);
        let slots = (0..capacity).map(|_| TtSlot::new()).collect();
        log::debug!("transposition table: {size_mb} MB, {capacity} slots");
        TranspositionTable { slots }
    }

    #[inline]
    fn slot(&self, key: u64) -> &TtSlot {
        &self.slots[(key % self.slots.len() as u64) as usize]
    }

    /// Number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Probe the table for an entry matching the given key.
    /// Returns None on an empty slot, a different key or a corrupted slot.
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        let (stored_key, data) = self.slot(key).read()?;
        if stored_key != key {
            return None;
        }
        unpack_entry(stored_key, data)
    }

    /// Store an entry, replacing the slot when it is empty or corrupted or when `depth`
    /// is at least the stored depth.
    pub fn store(
        &self,
        key: u64,
        score: i32,
        depth: u32,
        age: u32,
        best_move: PackedMove,
        node_type: NodeType,
    ) {
        let slot = self.slot(key);
        if let Some(existing) = slot.read().and_then(|(k, d)| unpack_entry(k, d)) {
            if depth < existing.depth {
                return;
            }
        }
        slot.write(key, pack_entry(score, depth, age, best_move, node_type));
    }

    /// Table fullness in per mille (0-1000), sampled over the first thousand slots.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let occupied = self.slots[..sample]
            .iter()
            .filter(|slot| slot.is_occupied())
            .count();
        (occupied * 1000 / sample) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.clear();
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}
