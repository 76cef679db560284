//! Capacity tiers for [`IdIndex`](crate::IdIndex).
//!
//! The index grows in discrete steps. Each tier pairs a prime slot count with
//! a second prime just below it, used to derive double-hashing probe steps,
//! and an entry threshold that keeps every table partly empty.

/// One growth step of the identifier index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CapacityTier {
    /// Entries the tier accepts before the next insert triggers growth.
    pub max_entries: u32,
    /// Number of slots in the table.
    pub capacity: u32,
    /// Base of the probe step: `step = 1 + hash % rehash_stride_base`.
    pub rehash_stride_base: u32,
}

impl CapacityTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(max_entries: u32, capacity: u32, rehash_stride_base: u32) -> Self {
        Self {
            max_entries,
            capacity,
            rehash_stride_base,
        }
    }

    /// Slot count as `usize`.
    #[must_use]
    pub const fn slots(self) -> usize {
        self.capacity as usize
    }
}

/// The fixed growth table. Reproduced exactly so growth points are
/// predictable in tests.
pub const CAPACITY_TIERS: &[CapacityTier] = &[
    CapacityTier::new(2, 5, 3),
    CapacityTier::new(4, 7, 5),
    CapacityTier::new(8, 13, 11),
    CapacityTier::new(16, 19, 17),
    CapacityTier::new(32, 43, 41),
    CapacityTier::new(64, 73, 71),
    CapacityTier::new(128, 151, 149),
    CapacityTier::new(256, 283, 281),
    CapacityTier::new(512, 571, 569),
    CapacityTier::new(1024, 1153, 1151),
    CapacityTier::new(2048, 2269, 2267),
    CapacityTier::new(4096, 4519, 4517),
    CapacityTier::new(8192, 9013, 9011),
    CapacityTier::new(16384, 18043, 18041),
    CapacityTier::new(32768, 36109, 36107),
    CapacityTier::new(65536, 72091, 72089),
    CapacityTier::new(131_072, 144_409, 144_407),
    CapacityTier::new(262_144, 288_361, 288_359),
    CapacityTier::new(524_288, 576_883, 576_881),
    CapacityTier::new(1_048_576, 1_153_459, 1_153_457),
    CapacityTier::new(2_097_152, 2_307_163, 2_307_161),
    CapacityTier::new(4_194_304, 4_613_893, 4_613_891),
    CapacityTier::new(8_388_608, 9_227_641, 9_227_639),
    CapacityTier::new(16_777_216, 18_455_029, 18_455_027),
    CapacityTier::new(33_554_432, 36_911_011, 36_911_009),
    CapacityTier::new(67_108_864, 73_819_861, 73_819_859),
    CapacityTier::new(134_217_728, 147_639_589, 147_639_587),
    CapacityTier::new(268_435_456, 295_279_081, 295_279_079),
    CapacityTier::new(536_870_912, 590_559_793, 590_559_791),
    CapacityTier::new(1_073_741_824, 1_181_116_273, 1_181_116_271),
    CapacityTier::new(2_147_483_648, 2_362_232_233, 2_362_232_231),
];

/// Position of the smallest tier in `tiers` that admits `entries` entries
/// without growing, or the last tier if none does.
#[must_use]
pub fn tier_for(tiers: &[CapacityTier], entries: usize) -> usize {
    tiers
        .iter()
        .position(|tier| tier.max_entries as usize >= entries)
        .unwrap_or(tiers.len().saturating_sub(1))
}

/// Checks the invariants a tier table must satisfy: non-empty, every tier's
/// capacity above its threshold, stride base below capacity, and strictly
/// increasing thresholds and capacities.
#[must_use]
pub fn is_valid_table(tiers: &[CapacityTier]) -> bool {
    !tiers.is_empty()
        && tiers.iter().all(|tier| {
            tier.capacity > tier.max_entries
                && tier.rehash_stride_base > 0
                && tier.rehash_stride_base < tier.capacity
        })
        && tiers.windows(2).all(|pair| {
            pair[1].max_entries > pair[0].max_entries && pair[1].capacity > pair[0].capacity
        })
}
