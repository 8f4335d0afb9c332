//! Neighbor counting regression test
//!
//! Count bounds, mode semantics, monotonicity of the majority vote, and
//! agreement between the checked border path and the unchecked interior
//! path.
//!
//! Run with:
//! ```
//! cargo test -p ndbin-morph --test count_reg
//! ```

use ndbin_core::BinaryImage;
use ndbin_morph::{
    CountMode, EdgeCondition, NeighborList, count_neighbors, majority_vote,
};
use ndbin_test::random_binary;

const SEEDS: &[u64] = &[5, 61, 777];

#[test]
fn count_bounds_reg() {
    for &seed in SEEDS {
        for sizes in [vec![17, 23], vec![5, 6, 7]] {
            let img = random_binary(&sizes, 0.5, seed);
            let ndims = sizes.len();
            for connectivity in 1..=ndims {
                let table = NeighborList::new(connectivity, img.strides()).unwrap();
                for (mode, extra) in [(CountMode::Foreground, 0), (CountMode::All, 1)] {
                    for edge in [EdgeCondition::Background, EdgeCondition::Object] {
                        let counts = count_neighbors(&img, connectivity, mode, edge).unwrap();
                        let bound = table.len() as u32 + extra;
                        for &c in counts.data() {
                            assert!(c <= bound, "count {c} exceeds bound {bound}");
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn count_checked_path_agrees_with_reference_reg() {
    // Brute-force reference over every pixel, always bounds-checking.
    for &seed in SEEDS {
        let img = random_binary(&[11, 13], 0.5, seed);
        let counts =
            count_neighbors(&img, 2, CountMode::All, EdgeCondition::Object).unwrap();
        for y in 0..11i32 {
            for x in 0..13i32 {
                let mut expected = u32::from(img.get(&[y as usize, x as usize]));
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dy == 0 && dx == 0 {
                            continue;
                        }
                        let (ny, nx) = (y + dy, x + dx);
                        if (0..11).contains(&ny) && (0..13).contains(&nx) {
                            expected += u32::from(img.get(&[ny as usize, nx as usize]));
                        } else {
                            expected += 1;
                        }
                    }
                }
                assert_eq!(
                    *counts.at(&[y as usize, x as usize]),
                    expected,
                    "count mismatch at ({y}, {x}), seed {seed}"
                );
            }
        }
    }
}

#[test]
fn count_foreground_mode_zeroes_background_reg() {
    for &seed in SEEDS {
        let img = random_binary(&[12, 12], 0.4, seed);
        let counts =
            count_neighbors(&img, 1, CountMode::Foreground, EdgeCondition::Background).unwrap();
        for y in 0..12 {
            for x in 0..12 {
                if !img.get(&[y, x]) {
                    assert_eq!(*counts.at(&[y, x]), 0);
                }
            }
        }
    }
}

#[test]
fn majority_vote_monotone_reg() {
    for &seed in SEEDS {
        let smaller = random_binary(&[15, 15], 0.35, seed);
        let mut larger = smaller.clone();
        larger
            .or_with(&random_binary(&[15, 15], 0.2, seed.wrapping_add(3)))
            .unwrap();
        let vote_small = majority_vote(&smaller, 2, EdgeCondition::Background).unwrap();
        let vote_large = majority_vote(&larger, 2, EdgeCondition::Background).unwrap();
        let mut extra = vote_small.clone();
        extra.subtract(&vote_large).unwrap();
        assert_eq!(extra.count_foreground(), 0, "majority vote is monotone");
    }
}

#[test]
fn majority_vote_uniform_reg() {
    let empty = BinaryImage::new(&[10, 10]).unwrap();
    assert_eq!(
        majority_vote(&empty, 2, EdgeCondition::Background)
            .unwrap()
            .count_foreground(),
        0
    );
    let full = BinaryImage::filled(&[10, 10], 1).unwrap();
    assert_eq!(
        majority_vote(&full, 2, EdgeCondition::Object)
            .unwrap()
            .count_foreground(),
        100
    );
}
