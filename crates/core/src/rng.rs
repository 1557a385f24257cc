//! Deterministic mulberry32 stream and the sampling helpers built on it.
//!
//! Every operation is defined with 32-bit wraparound arithmetic so that a stream seeded from
//! the same value yields bit-identical floats on every platform and in every other
//! implementation of the daily puzzle.

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Input that expands into a pseudo-random stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Seed {
    Text(String),
    Number(u32),
}

impl Seed {
    pub fn state(&self) -> u32 {
        match self {
            Self::Text(text) => hash_seed(text),
            Self::Number(value) => *value,
        }
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

/// Rolling `hash * 31 + code_unit` over UTF-16 code units, wrapped to `i32`, absolute value.
pub fn hash_seed(text: &str) -> u32 {
    let hash = text
        .encode_utf16()
        .fold(0_i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// `floor(next * bound)`; `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64).floor() as usize
    }
}

pub fn create_rng(seed: impl Into<Seed>) -> Mulberry32 {
    Mulberry32::new(seed.into().state())
}

/// In-place Fisher-Yates from the last index down to 1.
pub fn shuffle<'a, T>(items: &'a mut [T], rng: &mut Mulberry32) -> &'a mut [T] {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
    items
}

/// Shuffles a copy and keeps the first `n` (all of them when `n` exceeds the length).
pub fn pick_n<T: Clone>(items: &[T], n: usize, rng: &mut Mulberry32) -> Vec<T> {
    let mut copy = items.to_vec();
    shuffle(&mut copy, rng);
    copy.truncate(n);
    copy
}

/// Uniform integer in `[min, max]`, both inclusive.
pub fn rand_int(min: i64, max: i64, rng: &mut Mulberry32) -> i64 {
    debug_assert!(min <= max);
    let span = (max - min + 1) as f64;
    (rng.next_f64() * span).floor() as i64 + min
}

/// Picks one element of a non-empty slice with a single `rand_int` draw.
pub(crate) fn choose<'a, T>(items: &'a [T], rng: &mut Mulberry32) -> &'a T {
    let index = rand_int(0, items.len() as i64 - 1, rng) as usize;
    &items[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_seed_matches_rolling_31_hash() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        assert_eq!(hash_seed("ab"), 97 * 31 + 98);
        assert_eq!(hash_seed("hello"), 99_162_322);
        assert_eq!(hash_seed("world"), 113_318_802);
        assert_eq!(hash_seed("hello"), hash_seed("hello"));
        assert_ne!(hash_seed("hello"), hash_seed("world"));
    }

    #[test]
    fn hash_seed_of_ascii_matches_byte_fold() {
        let text = "logic-looper-2026-02-17";
        let expected = text
            .bytes()
            .fold(0_i32, |hash, byte| hash.wrapping_mul(31).wrapping_add(i32::from(byte)))
            .unsigned_abs();
        assert_eq!(hash_seed(text), expected);
    }

    #[test]
    fn mulberry32_matches_reference_vectors() {
        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_f64(), 0.266_429_208_684_712_65);
        assert_eq!(rng.state(), 1_831_565_813);
        assert_eq!(rng.next_f64(), 0.000_329_745_700_582_861_9);
        assert_eq!(rng.state(), 3_663_131_626);
        assert_eq!(rng.next_f64(), 0.223_272_027_447_819_7);
        assert_eq!(rng.state(), 1_199_730_143);

        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_f64(), 0.601_103_751_920_163_6);
        assert_eq!(rng.next_f64(), 0.448_290_558_997_541_67);
        assert_eq!(rng.next_f64(), 0.852_465_793_490_409_9);

        let mut rng = Mulberry32::new(0xFFFF_FFFF);
        assert_eq!(rng.next_f64(), 0.896_422_614_110_633_7);
        assert_eq!(rng.state(), 1_831_565_812);

        let mut rng = Mulberry32::new(0xDEAD_BEEF);
        assert_eq!(rng.next_f64(), 0.941_369_614_098_221_1);
        assert_eq!(rng.state(), 1_272_527_076);
    }

    #[test]
    fn same_seed_produces_identical_streams() {
        let mut left = create_rng("seed-2026-02-17");
        let mut right = create_rng("seed-2026-02-17");
        for _ in 0..100 {
            assert_eq!(left.next_f64().to_bits(), right.next_f64().to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut left = create_rng("seed-a");
        let mut right = create_rng("seed-b");
        let left: Vec<f64> = (0..5).map(|_| left.next_f64()).collect();
        let right: Vec<f64> = (0..5).map(|_| right.next_f64()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        for seed in ["bounds-test", "", "logic-looper-2024-12-31"] {
            let mut rng = create_rng(seed);
            for _ in 0..1000 {
                let value = rng.next_f64();
                assert!((0.0..1.0).contains(&value), "value out of range: {value}");
            }
        }
    }

    #[test]
    fn numeric_seed_uses_value_as_state() {
        let mut from_number = create_rng(42_u32);
        let mut direct = Mulberry32::new(42);
        assert_eq!(from_number.next_u32(), direct.next_u32());
    }

    #[test]
    fn shuffle_is_in_place_and_a_permutation() {
        let mut rng = create_rng("perm");
        let mut values = [10, 20, 30, 40, 50];
        shuffle(&mut values, &mut rng);
        let mut sorted = values;
        sorted.sort_unstable();
        assert_eq!(sorted, [10, 20, 30, 40, 50]);
    }

    #[test]
    fn shuffle_is_reproducible() {
        let mut left = [1, 2, 3, 4, 5];
        let mut right = [1, 2, 3, 4, 5];
        shuffle(&mut left, &mut create_rng("fixed"));
        shuffle(&mut right, &mut create_rng("fixed"));
        assert_eq!(left, right);
    }

    #[test]
    fn pick_n_leaves_input_untouched() {
        let mut rng = create_rng("nomutate");
        let values = vec![1, 2, 3, 4, 5];
        let picked = pick_n(&values, 2, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(pick_n(&[1, 2], 5, &mut rng).len(), 2);
    }

    #[test]
    fn rand_int_is_inclusive_on_both_ends() {
        let mut rng = create_rng("randInt");
        let mut seen = [false; 5];
        for _ in 0..500 {
            let value = rand_int(3, 7, &mut rng);
            assert!((3..=7).contains(&value));
            seen[(value - 3) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit), "every value in range should appear: {seen:?}");
        assert_eq!(rand_int(5, 5, &mut rng), 5);
    }
}
