//! Seeded propagation regression test
//!
//! Geodesic reconstruction properties: containment between seed, result
//! and mask, idempotence at convergence, monotone growth with the
//! iteration cap, and edge-object removal.
//!
//! Run with:
//! ```
//! cargo test -p ndbin-morph --test reconstruct_reg
//! ```

use ndbin_core::BinaryImage;
use ndbin_morph::{
    Connectivity, EdgeCondition, binary_propagation, edge_objects_remove,
};
use ndbin_test::{diff_count, filled_box, random_binary};

const SEEDS: &[u64] = &[3, 29, 1234];

fn subset(a: &BinaryImage, b: &BinaryImage) -> bool {
    let mut extra = a.clone();
    extra.subtract(b).unwrap();
    extra.count_foreground() == 0
}

#[test]
fn reconstruct_containment_reg() {
    for &rng_seed in SEEDS {
        let mask = random_binary(&[21, 27], 0.6, rng_seed);
        let mut seed = random_binary(&[21, 27], 0.1, rng_seed.wrapping_add(1));
        seed.and_with(&mask).unwrap();
        for conn in [Connectivity::Fixed(1), Connectivity::Fixed(2)] {
            let out = binary_propagation(
                Some(&seed),
                &mask,
                conn,
                0,
                EdgeCondition::Background,
            )
            .unwrap();
            assert!(subset(&seed, &out), "seed must be contained in the result");
            assert!(subset(&out, &mask), "result must be contained in the mask");
        }
    }
}

#[test]
fn reconstruct_convergence_idempotent_reg() {
    for &rng_seed in SEEDS {
        let mask = random_binary(&[18, 18], 0.55, rng_seed);
        let mut seed = random_binary(&[18, 18], 0.08, rng_seed.wrapping_add(7));
        seed.and_with(&mask).unwrap();
        let once = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(2),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        // Reconstructing from the converged result changes nothing.
        let again = binary_propagation(
            Some(&once),
            &mask,
            Connectivity::Fixed(2),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        assert_eq!(diff_count(&once, &again), 0);
    }
}

#[test]
fn reconstruct_iteration_cap_monotone_reg() {
    let mask = filled_box(&[16, 16], &[1, 1], &[15, 15]);
    let mut seed = BinaryImage::new(&[16, 16]).unwrap();
    seed.set(&[8, 8], true);
    let mut previous = seed.clone();
    for iterations in 1..8 {
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(1),
            iterations,
            EdgeCondition::Background,
        )
        .unwrap();
        assert!(subset(&previous, &out), "growth is monotone in the cap");
        previous = out;
    }
    let converged = binary_propagation(
        Some(&seed),
        &mask,
        Connectivity::Fixed(1),
        0,
        EdgeCondition::Background,
    )
    .unwrap();
    assert!(subset(&previous, &converged));
    assert_eq!(diff_count(&converged, &mask), 0);
}

#[test]
fn reconstruct_early_exit_reg() {
    // A huge iteration cap behaves exactly like convergence: the queue
    // drains and the loop stops early.
    let mask = filled_box(&[12, 12], &[2, 2], &[10, 10]);
    let mut seed = BinaryImage::new(&[12, 12]).unwrap();
    seed.set(&[5, 5], true);
    let capped = binary_propagation(
        Some(&seed),
        &mask,
        Connectivity::Fixed(2),
        1_000_000,
        EdgeCondition::Background,
    )
    .unwrap();
    let converged = binary_propagation(
        Some(&seed),
        &mask,
        Connectivity::Fixed(2),
        0,
        EdgeCondition::Background,
    )
    .unwrap();
    assert_eq!(diff_count(&capped, &converged), 0);
}

#[test]
fn reconstruct_edge_objects_reg() {
    // Three components: one touches the left edge, one the bottom-right
    // corner, one floats in the middle.
    let mut img = BinaryImage::new(&[12, 12]).unwrap();
    for y in 2..5 {
        img.set(&[y, 0], true);
        img.set(&[y, 1], true);
    }
    for y in 10..12 {
        for x in 10..12 {
            img.set(&[y, x], true);
        }
    }
    for y in 5..8 {
        for x in 5..8 {
            img.set(&[y, x], true);
        }
    }
    let out = edge_objects_remove(&img, Connectivity::Fixed(2)).unwrap();
    assert_eq!(out.count_foreground(), 9);
    assert!(out.get(&[6, 6]));
    assert!(!out.get(&[2, 0]));
    assert!(!out.get(&[11, 11]));
}

#[test]
fn reconstruct_edge_objects_keeps_clean_image_reg() {
    for &rng_seed in SEEDS {
        // An image with an empty border shell loses nothing.
        let mut img = random_binary(&[14, 14], 0.4, rng_seed);
        for i in 0..14 {
            img.set(&[0, i], false);
            img.set(&[13, i], false);
            img.set(&[i, 0], false);
            img.set(&[i, 13], false);
        }
        let out = edge_objects_remove(&img, Connectivity::Fixed(2)).unwrap();
        assert_eq!(diff_count(&img, &out), 0);
    }
}
