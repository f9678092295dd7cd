//! # Game Mathematics
//!
//! Depth-scaled tables and weighted random selection used by the spawners.

use rand::Rng;

/// A step function of dungeon depth.
///
/// Each entry is `(value, min_depth)`; the table yields the value of the entry
/// with the largest threshold not exceeding the depth, or 0 when no threshold
/// has been reached yet. Entries are expected in ascending depth order.
///
/// # Examples
///
/// ```
/// use tombs::DepthTable;
///
/// let trolls = DepthTable(&[(15, 3), (30, 5), (60, 7)]);
/// assert_eq!(trolls.value_at(1), 0);
/// assert_eq!(trolls.value_at(3), 15);
/// assert_eq!(trolls.value_at(6), 30);
/// assert_eq!(trolls.value_at(40), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthTable(pub &'static [(u32, u32)]);

impl DepthTable {
    /// Looks up the value for a depth.
    pub fn value_at(&self, depth: u32) -> u32 {
        self.0
            .iter()
            .rev()
            .find(|(_, min_depth)| depth >= *min_depth)
            .map(|(value, _)| *value)
            .unwrap_or(0)
    }
}

/// How often a kind appears: either fixed or scaled with depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnWeight {
    Fixed(u32),
    Scaled(DepthTable),
}

impl SpawnWeight {
    pub fn at_depth(&self, depth: u32) -> u32 {
        match self {
            SpawnWeight::Fixed(weight) => *weight,
            SpawnWeight::Scaled(table) => table.value_at(depth),
        }
    }
}

/// Picks an index with probability proportional to its weight.
///
/// Rolls `dice` in `1..=total` and returns the first index whose running sum
/// reaches it. Zero-weight entries are never chosen. Returns `None` when every
/// weight is zero.
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use tombs::weighted_choice_index;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// assert_eq!(weighted_choice_index(&[0, 5, 0], &mut rng), Some(1));
/// assert_eq!(weighted_choice_index(&[0, 0], &mut rng), None);
/// ```
pub fn weighted_choice_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let dice = rng.gen_range(1..=total);
    let mut running_sum = 0;
    for (index, weight) in weights.iter().enumerate() {
        running_sum += weight;
        if dice <= running_sum {
            return Some(index);
        }
    }
    None
}
