//! Allocation and growth tuning.

/// Tuning knobs for slot-array allocation and growth.
///
/// Defaults: 128 initial slots, doubling growth, and growth triggered
/// before the load factor passes 2/3. The load threshold is what
/// guarantees the probe sequence always finds an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Capacity of the first allocated slot array.
    /// Must be a power of two, at least 2.
    pub initial_capacity: usize,

    /// Capacity multiplier applied on growth. Must be a power of two.
    pub growth_factor: usize,

    /// Numerator of the maximum load fraction.
    pub max_load_numerator: usize,

    /// Denominator of the maximum load fraction.
    pub max_load_denominator: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            initial_capacity: 128,
            growth_factor: 2,
            max_load_numerator: 2,
            max_load_denominator: 3,
        }
    }
}

impl CacheConfig {
    /// Number of entries a table of `capacity` slots may hold before the
    /// next insertion forces growth: `floor((2n + 1) / 3)` at the default
    /// 2/3 load fraction.
    pub fn usable_capacity(&self, capacity: usize) -> usize {
        (capacity * self.max_load_numerator + 1) / self.max_load_denominator
    }

    pub(crate) fn validate(&self) {
        assert!(
            self.initial_capacity.is_power_of_two() && self.initial_capacity >= 2,
            "initial_capacity must be a power of two >= 2"
        );
        assert!(
            self.growth_factor.is_power_of_two() && self.growth_factor >= 2,
            "growth_factor must be a power of two >= 2"
        );
        assert!(
            self.max_load_numerator > 0 && self.max_load_numerator < self.max_load_denominator,
            "max load fraction must be within (0, 1)"
        );
    }
}
