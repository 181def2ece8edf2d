use std::collections::VecDeque;

use crate::geometry::{Address, CacheGeometry};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheHit {
    Hit,
    Miss,
}

impl std::fmt::Display for CacheHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheHit::Hit => f.write_str("Hit"),
            CacheHit::Miss => f.write_str("Miss"),
        }
    }
}

/// Hit/miss counters. `accesses == hits + misses` holds after every access.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.hits as f64 / self.accesses as f64
    }
}

#[derive(Debug, Copy, Clone)]
struct CacheLine {
    valid: bool,
    tag: Address,
}

/// One associative set, most recently used line at the front.
#[derive(Debug, Clone, Default)]
struct CacheSet {
    lines: VecDeque<CacheLine>,
}

impl CacheSet {
    fn access(&mut self, tag: Address, ways: usize) -> CacheHit {
        match self
            .lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
        {
            Some(pos) => {
                // unlink and relink at the front, the rest of the set keeps
                // its relative order
                let line = self.lines.remove(pos).unwrap();
                self.lines.push_front(line);
                CacheHit::Hit
            }
            None => {
                // insert first, then evict once the set runs over capacity
                self.lines.push_front(CacheLine { valid: true, tag });
                if self.lines.len() > ways {
                    self.lines.pop_back();
                }
                CacheHit::Miss
            }
        }
    }
}

/// Set-associative cache with LRU replacement. Tracks occupancy and hit/miss
/// classification only, no data payloads.
#[derive(Debug)]
pub struct LruCache {
    geometry: CacheGeometry,
    sets: Vec<CacheSet>,
    stats: CacheStats,
}

impl LruCache {
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            geometry,
            sets: vec![CacheSet::default(); geometry.num_sets()],
            stats: CacheStats::default(),
        }
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    pub fn access(&mut self, address: Address) -> CacheHit {
        self.stats.accesses += 1;

        let location = self.geometry.decode(address);
        // the index mask guarantees location.index < num_sets
        let set = self.sets.get_mut(location.index).unwrap();

        let hit = set.access(location.tag, self.geometry.ways());
        match hit {
            CacheHit::Hit => self.stats.hits += 1,
            CacheHit::Miss => self.stats.misses += 1,
        }
        hit
    }

    /// Snapshot of the counters. Never mutates, safe to call at any point.
    pub fn report(&self) -> CacheStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.sets = vec![CacheSet::default(); self.geometry.num_sets()];
        self.stats = CacheStats::default();
    }
}
