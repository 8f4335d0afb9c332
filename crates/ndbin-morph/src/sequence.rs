//! Morphological sequence operations
//!
//! Executes chains of propagation operations specified as strings, for
//! quick composition without writing code. Operations are separated by
//! `+` and whitespace is ignored. Each operation is a case-insensitive
//! letter followed by `<connectivity>.<iterations>`:
//!
//! - `d<c>.<n>` - dilation
//! - `e<c>.<n>` - erosion
//! - `o<c>.<n>` - opening
//! - `c<c>.<n>` - closing
//!
//! Connectivity accepts the integer descriptors, including the
//! alternation sentinels `-1` and `-2`. Dilations and erosions use the
//! background edge condition; openings and closings use the `special`
//! handling, so sequences stay free of border artifacts.
//!
//! # Examples
//!
//! ```
//! use ndbin_core::BinaryImage;
//! use ndbin_morph::sequence::{MorphSequence, morph_sequence};
//!
//! let seq = MorphSequence::parse("o2.1 + d-1.2").unwrap();
//! assert_eq!(seq.ops().len(), 2);
//!
//! let img = BinaryImage::new(&[32, 32]).unwrap();
//! let result = morph_sequence(&img, "c1.2 + e2.1").unwrap();
//! assert_eq!(result.sizes(), img.sizes());
//! ```

use crate::error::{MorphError, MorphResult};
use crate::neighborhood::Connectivity;
use crate::propagation::{
    EdgeCondition, OpeningEdge, binary_closing, binary_dilation, binary_erosion, binary_opening,
};
use ndbin_core::BinaryImage;

/// A parsed morphological operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    /// Dilation
    Dilate {
        connectivity: Connectivity,
        iterations: usize,
    },
    /// Erosion
    Erode {
        connectivity: Connectivity,
        iterations: usize,
    },
    /// Opening (erosion followed by dilation)
    Open {
        connectivity: Connectivity,
        iterations: usize,
    },
    /// Closing (dilation followed by erosion)
    Close {
        connectivity: Connectivity,
        iterations: usize,
    },
}

/// A parsed morphological sequence
#[derive(Debug, Clone)]
pub struct MorphSequence {
    ops: Vec<MorphOp>,
}

impl MorphSequence {
    /// Parse a sequence string.
    ///
    /// # Errors
    ///
    /// Fails on empty sequences, unknown operation letters, and operand
    /// lists that are not `<connectivity>.<iterations>`.
    pub fn parse(sequence: &str) -> MorphResult<Self> {
        if sequence.trim().is_empty() {
            return Err(MorphError::InvalidSequence("empty sequence".to_string()));
        }

        let parts: Vec<&str> = sequence.split('+').collect();
        let mut ops = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let op_str: String = part.chars().filter(|c| !c.is_whitespace()).collect();
            if op_str.is_empty() {
                return Err(MorphError::InvalidSequence(format!(
                    "empty operation at position {}",
                    i + 1
                )));
            }
            ops.push(Self::parse_operation(&op_str)?);
        }
        Ok(MorphSequence { ops })
    }

    fn parse_operation(op_str: &str) -> MorphResult<MorphOp> {
        let first = op_str
            .chars()
            .next()
            .expect("operation string is non-empty")
            .to_ascii_lowercase();
        let (connectivity, iterations) = Self::parse_operands(&op_str[1..])?;
        match first {
            'd' => Ok(MorphOp::Dilate {
                connectivity,
                iterations,
            }),
            'e' => Ok(MorphOp::Erode {
                connectivity,
                iterations,
            }),
            'o' => Ok(MorphOp::Open {
                connectivity,
                iterations,
            }),
            'c' => Ok(MorphOp::Close {
                connectivity,
                iterations,
            }),
            _ => Err(MorphError::InvalidSequence(format!(
                "unknown operation '{first}' in '{op_str}'"
            ))),
        }
    }

    /// Parse operands from a string like "2.3" -> (connectivity 2, 3 iterations)
    fn parse_operands(operand_str: &str) -> MorphResult<(Connectivity, usize)> {
        let Some((conn_str, iter_str)) = operand_str.split_once('.') else {
            return Err(MorphError::InvalidSequence(format!(
                "invalid operands '{operand_str}', expected 'connectivity.iterations'"
            )));
        };
        let conn_value: isize = conn_str.parse().map_err(|_| {
            MorphError::InvalidSequence(format!(
                "invalid connectivity '{conn_str}' in '{operand_str}'"
            ))
        })?;
        let connectivity = Connectivity::from_int(conn_value)
            .map_err(|e| MorphError::InvalidSequence(e.to_string()))?;
        let iterations: usize = iter_str.parse().map_err(|_| {
            MorphError::InvalidSequence(format!(
                "invalid iteration count '{iter_str}' in '{operand_str}'"
            ))
        })?;
        Ok((connectivity, iterations))
    }

    /// The operations in this sequence
    pub fn ops(&self) -> &[MorphOp] {
        &self.ops
    }

    /// Run the sequence on a binary image.
    pub fn run(&self, input: &BinaryImage) -> MorphResult<BinaryImage> {
        let mut current = input.clone();
        for op in &self.ops {
            current = match *op {
                MorphOp::Dilate {
                    connectivity,
                    iterations,
                } => binary_dilation(&current, connectivity, iterations, EdgeCondition::Background)?,
                MorphOp::Erode {
                    connectivity,
                    iterations,
                } => binary_erosion(&current, connectivity, iterations, EdgeCondition::Background)?,
                MorphOp::Open {
                    connectivity,
                    iterations,
                } => binary_opening(&current, connectivity, iterations, OpeningEdge::Special)?,
                MorphOp::Close {
                    connectivity,
                    iterations,
                } => binary_closing(&current, connectivity, iterations, OpeningEdge::Special)?,
            };
        }
        Ok(current)
    }
}

/// Parse and run a morphological sequence in one call.
pub fn morph_sequence(input: &BinaryImage, sequence: &str) -> MorphResult<BinaryImage> {
    MorphSequence::parse(sequence)?.run(input)
}
