//! Hash-keyed random streams.
//!
//! The branch generator redraws every tree every frame, so it cannot share a
//! running generator: the same call must see the same numbers each time.
//! Each call instead derives a fresh [`StdRng`] from its inputs.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Mixes the call-site key into a 64-bit seed.
///
/// `x` is hashed by its bit pattern, so two origins that differ in the last
/// float bit get unrelated streams.
pub fn branch_key(seed: u64, depth: i32, x: f32) -> u64 {
    let mut h = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= (depth as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h = h.rotate_left(31);
    h ^= (x.to_bits() as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    // splitmix64 finaliser
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Independent stream for one branch call.
pub fn branch_rng(seed: u64, depth: i32, x: f32) -> StdRng {
    StdRng::seed_from_u64(branch_key(seed, depth, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_key_gives_same_stream() {
        let mut a = branch_rng(42, 3, 500.0);
        let mut b = branch_rng(42, 3, 500.0);
        for _ in 0..8 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn each_key_component_changes_the_seed() {
        let base = branch_key(42, 3, 500.0);
        assert_ne!(base, branch_key(43, 3, 500.0));
        assert_ne!(base, branch_key(42, 4, 500.0));
        assert_ne!(base, branch_key(42, 3, 500.5));
    }
}
