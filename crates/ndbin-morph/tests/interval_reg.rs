//! Interval and hit-or-miss regression test
//!
//! Rotation generation (including the embedded 45-degree round-trip
//! self-test), the generating operators, and the standard interval
//! sets.
//!
//! Run with:
//! ```
//! cargo test -p ndbin-morph --test interval_reg
//! ```

use ndbin_morph::{
    Expansion, Interval, RotationOrder, end_pixel_intervals, single_pixel_interval,
    sup_generating, union_sup_generating,
};
use ndbin_test::{diff_count, from_rows};

#[test]
fn interval_rotation_round_trip_reg() {
    // Eight 45-degree rotations restore the pattern exactly.
    let pattern = Interval::from_string("xxo\no.x\n.ox").unwrap();
    for clockwise in [true, false] {
        let mut rotated = pattern.clone();
        for _ in 0..8 {
            rotated = rotated.rotate_by_45(clockwise).unwrap();
        }
        assert_eq!(rotated.elements(), pattern.elements());
    }

    // Four 90-degree rotations as well.
    let mut rotated = pattern.clone();
    for _ in 0..4 {
        rotated = rotated.rotate_by_90(true).unwrap();
    }
    assert_eq!(rotated.elements(), pattern.elements());
}

#[test]
fn interval_rotated_versions_cover_all_angles_reg() {
    let base = Interval::from_string(".x.\n.x.\n...").unwrap();
    let versions = base
        .rotated_versions(45, RotationOrder::InterleavedClockwise)
        .unwrap();
    assert_eq!(versions.len(), 8);
    // All eight versions are distinct for an asymmetric base pattern.
    for i in 0..8 {
        for j in (i + 1)..8 {
            assert_ne!(
                versions[i].elements(),
                versions[j].elements(),
                "rotations {i} and {j} coincide"
            );
        }
    }
    // The interleaved array alternates between the two half-turns: the
    // second entry is the 180-degree rotation of the first.
    let opposite = versions[0]
        .rotate_by_90(true)
        .unwrap()
        .rotate_by_90(true)
        .unwrap();
    assert_eq!(versions[1].elements(), opposite.elements());
}

#[test]
fn interval_detects_line_ends_reg() {
    let img = from_rows(&[
        ".......",
        ".###...",
        "...#...",
        "...#...",
        ".......",
    ]);
    let ends = union_sup_generating(&img, &end_pixel_intervals(), Expansion::Default).unwrap();
    // Exactly the two extremities of the poly-line match.
    assert!(ends.get(&[1, 1]));
    assert!(ends.get(&[3, 3]));
    assert_eq!(ends.count_foreground(), 2);
}

#[test]
fn interval_single_pixel_detection_reg() {
    let img = from_rows(&[
        "#....#",
        "......",
        "..#...",
        "......",
        "#....."
    ]);
    let out = sup_generating(&img, &single_pixel_interval(2), Expansion::Default).unwrap();
    assert_eq!(diff_count(&img, &out), 0, "every pixel here is isolated");

    let touching = from_rows(&["##....", "......", "......", "......", "......"]);
    let out = sup_generating(&touching, &single_pixel_interval(2), Expansion::Default).unwrap();
    assert_eq!(out.count_foreground(), 0);
}

#[test]
fn interval_expansion_modes_agree_reg() {
    // Manually pre-expanding and declaring it gives the same answer as
    // the default expansion.
    let img = from_rows(&[
        "......",
        ".#.#..",
        ".###..",
        "...#..",
        "......",
    ]);
    let interval = Interval::from_string("ox.\n.xo\n..x").unwrap();
    let default = sup_generating(&img, &interval, Expansion::Default).unwrap();
    let expanded = img.pad(&[1, 1], 0).unwrap().crop_border(&[1, 1]).unwrap();
    let declared = sup_generating(&expanded, &interval, Expansion::AlreadyExpanded).unwrap();
    assert_eq!(diff_count(&default, &declared), 0);
}
