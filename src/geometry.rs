/// Byte-granular memory address.
pub type Address = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    ZeroField { field: &'static str },
    NotPowerOfTwo { field: &'static str, value: usize },
    Indivisible { total_size: usize, block_size: usize, ways: usize },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::ZeroField { field } => {
                f.write_fmt(format_args!("cache {field} must be non-zero"))
            }
            GeometryError::NotPowerOfTwo { field, value } => f.write_fmt(format_args!(
                "cache {field} must be a power of two, got {value}"
            )),
            GeometryError::Indivisible {
                total_size,
                block_size,
                ways,
            } => f.write_fmt(format_args!(
                "total size {total_size}B does not divide into {ways} ways of {block_size}B blocks"
            )),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Position of a block within the cache: which set it maps to and the tag
/// that distinguishes it from other blocks mapping to the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLocation {
    pub tag: Address,
    pub index: usize,
}

/// Validated cache shape. Bit widths and the index mask are derived once at
/// construction, never per access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    total_size: usize,
    block_size: usize,
    ways: usize,
    num_sets: usize,
    offset_bits: u32,
    index_bits: u32,
    index_mask: Address,
}

impl CacheGeometry {
    pub fn new(total_size: usize, block_size: usize, ways: usize) -> Result<Self, GeometryError> {
        for (field, value) in [
            ("total size", total_size),
            ("block size", block_size),
            ("associativity", ways),
        ] {
            if value == 0 {
                return Err(GeometryError::ZeroField { field });
            }
        }
        if !block_size.is_power_of_two() {
            return Err(GeometryError::NotPowerOfTwo {
                field: "block size",
                value: block_size,
            });
        }
        if !ways.is_power_of_two() {
            return Err(GeometryError::NotPowerOfTwo {
                field: "associativity",
                value: ways,
            });
        }
        if total_size % (block_size * ways) != 0 {
            return Err(GeometryError::Indivisible {
                total_size,
                block_size,
                ways,
            });
        }

        let num_sets = total_size / (block_size * ways);
        if !num_sets.is_power_of_two() {
            return Err(GeometryError::NotPowerOfTwo {
                field: "number of sets",
                value: num_sets,
            });
        }

        let offset_bits = block_size.ilog2();
        let index_bits = num_sets.ilog2();

        Ok(Self {
            total_size,
            block_size,
            ways,
            num_sets,
            offset_bits,
            index_bits,
            index_mask: (1 << index_bits) - 1,
        })
    }

    /// Splits an address into tag and set index. Total for any `Address`:
    /// the mask keeps the index inside `0..num_sets`.
    pub fn decode(&self, address: Address) -> BlockLocation {
        BlockLocation {
            tag: address >> (self.offset_bits + self.index_bits),
            index: ((address >> self.offset_bits) & self.index_mask) as usize,
        }
    }

    /// Byte position within a block. Irrelevant for hit/miss classification.
    pub fn block_offset(&self, address: Address) -> Address {
        address & ((1 << self.offset_bits) - 1)
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn ways(&self) -> usize {
        self.ways
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn label(&self) -> String {
        if self.total_size % 1024 == 0 {
            format!(
                "{}KiB {}-way, {}B blocks",
                self.total_size / 1024,
                self.ways,
                self.block_size
            )
        } else {
            format!(
                "{}B {}-way, {}B blocks",
                self.total_size, self.ways, self.block_size
            )
        }
    }

    pub fn format_info(&self) -> String {
        [
            "Cache:".to_string(),
            format!("\tTotal Size: {}B", self.total_size),
            format!("\tSets: {}", self.num_sets),
            format!("\tWays: {}", self.ways),
            format!("\tBlock-Size: {}B", self.block_size),
            format!(
                "\t| {} tag bits | {} set bits | {} offset bits |",
                Address::BITS - (self.index_bits + self.offset_bits),
                self.index_bits,
                self.offset_bits
            ),
        ]
        .join("\n")
    }
}
