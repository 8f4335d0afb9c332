//! Sup- and inf-generating operators
//!
//! A sup-generating operator is a single correlation pass with an
//! interval: the output is foreground only where every hit position is
//! foreground and every miss position is background. The inf-generating
//! operator is its dual, evaluated under input inversion. Both extend
//! the input by the kernel radius before reading neighborhoods, unless
//! the caller states the input is already expanded (a view whose buffer
//! carries at least the kernel radius of valid samples beyond the
//! logical extent, as produced by [`Image::pad`] plus
//! [`Image::crop_border`]).
//!
//! [`Image::pad`]: ndbin_core::Image::pad
//! [`Image::crop_border`]: ndbin_core::Image::crop_border

use crate::error::{MorphError, MorphResult};
use crate::interval::{Interval, IntervalElement};
use ndbin_core::{BinaryImage, SAMPLE_BIT};
use std::str::FromStr;

/// Boundary-expansion mode for the generating operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    /// Extend the input by the kernel radius (outside per the operator's
    /// natural edge value: background for sup, foreground for inf).
    #[default]
    Default,
    /// The input buffer already holds valid samples at least a kernel
    /// radius beyond the logical extent; skip the extension.
    AlreadyExpanded,
}

impl FromStr for Expansion {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        match s {
            "" => Ok(Expansion::Default),
            "already-expanded" => Ok(Expansion::AlreadyExpanded),
            _ => Err(MorphError::InvalidParameters(format!(
                "unknown boundary expansion mode '{s}'"
            ))),
        }
    }
}

/// Hit-or-miss test: foreground where the interval matches.
pub fn sup_generating(
    input: &BinaryImage,
    interval: &Interval,
    expansion: Expansion,
) -> MorphResult<BinaryImage> {
    generating(input, interval, expansion, true)
}

/// Dual hit-or-miss test: background only where the inverted input
/// matches the interval.
pub fn inf_generating(
    input: &BinaryImage,
    interval: &Interval,
    expansion: Expansion,
) -> MorphResult<BinaryImage> {
    generating(input, interval, expansion, false)
}

/// Pixelwise OR of the sup-generating operator over an interval array.
///
/// The input is extended once by the maximum kernel radius over all
/// intervals; the per-interval passes then run on the shared expanded
/// view.
pub fn union_sup_generating(
    input: &BinaryImage,
    intervals: &[Interval],
    expansion: Expansion,
) -> MorphResult<BinaryImage> {
    combined(input, intervals, expansion, true)
}

/// Pixelwise AND of the inf-generating operator over an interval array.
pub fn intersection_inf_generating(
    input: &BinaryImage,
    intervals: &[Interval],
    expansion: Expansion,
) -> MorphResult<BinaryImage> {
    combined(input, intervals, expansion, false)
}

fn combined(
    input: &BinaryImage,
    intervals: &[Interval],
    expansion: Expansion,
    sup: bool,
) -> MorphResult<BinaryImage> {
    if intervals.is_empty() {
        return Err(MorphError::InvalidParameters(
            "interval array must not be empty".into(),
        ));
    }
    let ndims = input.dimensionality();
    let mut max_radius = vec![0usize; ndims];
    for interval in intervals {
        check_dims(input, interval)?;
        for (r, &ir) in max_radius.iter_mut().zip(&interval.radius()) {
            *r = (*r).max(ir);
        }
    }
    let expanded;
    let view = match expansion {
        Expansion::AlreadyExpanded => input,
        Expansion::Default => {
            let fill = if sup { 0 } else { SAMPLE_BIT };
            expanded = input.pad(&max_radius, fill)?.crop_border(&max_radius)?;
            &expanded
        }
    };
    let mut out = if sup {
        BinaryImage::new(input.sizes())?
    } else {
        BinaryImage::filled(input.sizes(), SAMPLE_BIT)?
    };
    for interval in intervals {
        let partial = generating(view, interval, Expansion::AlreadyExpanded, sup)?;
        if sup {
            out.or_with(&partial)?;
        } else {
            out.and_with(&partial)?;
        }
    }
    Ok(out)
}

fn generating(
    input: &BinaryImage,
    interval: &Interval,
    expansion: Expansion,
    sup: bool,
) -> MorphResult<BinaryImage> {
    check_dims(input, interval)?;
    let radius = interval.radius();
    let expanded;
    let view = match expansion {
        Expansion::AlreadyExpanded => input,
        Expansion::Default => {
            // Outside space takes the value that cannot satisfy (sup) or
            // cannot violate (inf) the constraints of the dual.
            let fill = if sup { 0 } else { SAMPLE_BIT };
            expanded = input.pad(&radius, fill)?.crop_border(&radius)?;
            &expanded
        }
    };

    // Constraint lists as linear offsets over the view's strides.
    let mut hits = Vec::new();
    let mut misses = Vec::new();
    for (rel, elem) in interval.relative_entries() {
        let offset: isize = rel.iter().zip(view.strides()).map(|(&c, &s)| c * s).sum();
        match elem {
            IntervalElement::Hit => hits.push(offset),
            IntervalElement::Miss => misses.push(offset),
            IntervalElement::DontCare => unreachable!(),
        }
    }

    let mut out = BinaryImage::new(input.sizes())?;
    let dim = view.dimensionality() - 1;
    let n = view.size(dim);
    let in_stride = view.stride(dim);
    let out_stride = out.stride(dim);
    for line in view.lines(dim) {
        let mut src = line.offset as isize;
        let mut dst = out.offset_of(&line.coords) as isize;
        for _ in 0..n {
            // Sup: foreground where every hit is foreground and every
            // miss is background. Inf is the dual under input inversion:
            // background only where every hit is background and every
            // miss is foreground.
            let value = if sup {
                hits.iter()
                    .all(|&o| view.data()[(src + o) as usize] & SAMPLE_BIT != 0)
                    && misses
                        .iter()
                        .all(|&o| view.data()[(src + o) as usize] & SAMPLE_BIT == 0)
            } else {
                !(hits
                    .iter()
                    .all(|&o| view.data()[(src + o) as usize] & SAMPLE_BIT == 0)
                    && misses
                        .iter()
                        .all(|&o| view.data()[(src + o) as usize] & SAMPLE_BIT != 0))
            };
            out.data_mut()[dst as usize] = if value { SAMPLE_BIT } else { 0 };
            src += in_stride;
            dst += out_stride;
        }
    }
    Ok(out)
}

fn check_dims(input: &BinaryImage, interval: &Interval) -> MorphResult<()> {
    if interval.dimensionality() != input.dimensionality() {
        return Err(MorphError::InvalidParameters(format!(
            "interval dimensionality {} does not match image dimensionality {}",
            interval.dimensionality(),
            input.dimensionality()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated_point_interval() -> Interval {
        Interval::from_string("ooo\noxo\nooo").unwrap()
    }

    #[test]
    fn test_sup_detects_isolated_pixel() {
        let mut img = BinaryImage::new(&[5, 5]).unwrap();
        img.set(&[2, 2], true);
        img.set(&[0, 4], true);
        img.set(&[1, 4], true);
        let out = sup_generating(&img, &isolated_point_interval(), Expansion::Default).unwrap();
        // The lone pixel matches; the two touching pixels do not.
        assert!(out.get(&[2, 2]));
        assert!(!out.get(&[0, 4]));
        assert!(!out.get(&[1, 4]));
        assert_eq!(out.count_foreground(), 1);
    }

    #[test]
    fn test_sup_isolated_pixel_at_corner() {
        // Outside space is background for the sup operator, so a lone
        // corner pixel still matches.
        let mut img = BinaryImage::new(&[4, 4]).unwrap();
        img.set(&[0, 0], true);
        let out = sup_generating(&img, &isolated_point_interval(), Expansion::Default).unwrap();
        assert!(out.get(&[0, 0]));
    }

    #[test]
    fn test_sup_all_hits_is_erosion_like() {
        let iv = Interval::from_string("xxx\nxxx\nxxx").unwrap();
        let mut img = BinaryImage::new(&[5, 5]).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                img.set(&[y, x], true);
            }
        }
        let out = sup_generating(&img, &iv, Expansion::Default).unwrap();
        assert_eq!(out.count_foreground(), 1);
        assert!(out.get(&[2, 2]));
    }

    #[test]
    fn test_inf_is_dual_of_sup() {
        let iv = Interval::from_string("ox.\n.xo\nx.o").unwrap();
        let mut img = BinaryImage::new(&[6, 7]).unwrap();
        for &(y, x) in &[(0, 1), (1, 1), (2, 3), (3, 3), (4, 5), (5, 0), (2, 6)] {
            img.set(&[y, x], true);
        }
        let inf = inf_generating(&img, &iv, Expansion::Default).unwrap();
        let mut dual = sup_generating(&img.inverted(), &iv, Expansion::Default).unwrap();
        dual.invert();
        assert!(inf.equals(&dual));
    }

    #[test]
    fn test_union_matches_or_of_singles() {
        let a = Interval::from_string(".x.\noxo\n...").unwrap();
        let b = Interval::from_string("...\noxo\n.x.").unwrap();
        let mut img = BinaryImage::new(&[6, 6]).unwrap();
        for &(y, x) in &[(1, 2), (2, 2), (3, 2), (4, 4)] {
            img.set(&[y, x], true);
        }
        let union =
            union_sup_generating(&img, &[a.clone(), b.clone()], Expansion::Default).unwrap();
        let mut or = sup_generating(&img, &a, Expansion::Default).unwrap();
        or.or_with(&sup_generating(&img, &b, Expansion::Default).unwrap())
            .unwrap();
        assert!(union.equals(&or));
    }

    #[test]
    fn test_intersection_matches_and_of_singles() {
        let a = Interval::from_string(".o.\n.x.\n...").unwrap();
        let b = Interval::from_string("...\n.x.\n.o.").unwrap();
        let mut img = BinaryImage::new(&[5, 5]).unwrap();
        img.set(&[2, 2], true);
        let both =
            intersection_inf_generating(&img, &[a.clone(), b.clone()], Expansion::Default)
                .unwrap();
        let mut and = inf_generating(&img, &a, Expansion::Default).unwrap();
        and.and_with(&inf_generating(&img, &b, Expansion::Default).unwrap())
            .unwrap();
        assert!(both.equals(&and));
    }

    #[test]
    fn test_empty_interval_array_rejected() {
        let img = BinaryImage::new(&[4, 4]).unwrap();
        assert!(union_sup_generating(&img, &[], Expansion::Default).is_err());
    }

    #[test]
    fn test_dimensionality_mismatch_rejected() {
        let img = BinaryImage::new(&[4, 4, 4]).unwrap();
        assert!(sup_generating(&img, &isolated_point_interval(), Expansion::Default).is_err());
    }

    #[test]
    fn test_expansion_mode_parsing() {
        assert_eq!("".parse::<Expansion>().unwrap(), Expansion::Default);
        assert_eq!(
            "already-expanded".parse::<Expansion>().unwrap(),
            Expansion::AlreadyExpanded
        );
        assert!("mirror".parse::<Expansion>().is_err());
    }
}
