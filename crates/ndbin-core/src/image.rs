//! N-dimensional image container
//!
//! An [`Image`] is described by a size vector (extent per dimension), a
//! signed stride vector (memory step per dimension) and an origin offset
//! into an owned sample buffer. Strides allow axis reversal and cropping
//! without copying: flipped or cropped images address the same buffer
//! through adjusted strides and origin.
//!
//! # Sample layout
//!
//! Freshly allocated images use row-major strides: the last dimension
//! varies fastest in memory. Derived images (after [`Image::flip`] or
//! [`Image::crop`]) may have negative strides or address only part of the
//! buffer; all addressing goes through the origin-plus-dot-product rule,
//! so algorithms written against sizes and strides work on any layout.

use crate::error::{CoreError, Result};

/// N-dimensional array of samples with explicit strides.
#[derive(Debug, Clone)]
pub struct Image<T> {
    sizes: Vec<usize>,
    strides: Vec<isize>,
    origin: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    /// Number of dimensions.
    #[inline]
    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    /// Extent per dimension.
    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Extent of one dimension.
    #[inline]
    pub fn size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    /// Memory step per dimension, in samples.
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Memory step of one dimension.
    #[inline]
    pub fn stride(&self, dim: usize) -> isize {
        self.strides[dim]
    }

    /// Buffer index of the pixel at the all-zeros coordinate.
    #[inline]
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Number of logical pixels (product of extents).
    pub fn num_pixels(&self) -> usize {
        self.sizes.iter().product()
    }

    /// The underlying sample buffer.
    ///
    /// The buffer may be larger than the logical pixel count for cropped
    /// images; index through [`Image::offset_of`].
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the underlying sample buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Buffer index of the pixel at `coords`.
    #[inline]
    pub fn offset_of(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.sizes.len());
        let mut off = self.origin as isize;
        for (d, &c) in coords.iter().enumerate() {
            debug_assert!(c < self.sizes[d]);
            off += c as isize * self.strides[d];
        }
        off as usize
    }

    /// Sample at `coords`.
    #[inline]
    pub fn at(&self, coords: &[usize]) -> &T {
        &self.data[self.offset_of(coords)]
    }

    /// Mutable sample at `coords`.
    #[inline]
    pub fn at_mut(&mut self, coords: &[usize]) -> &mut T {
        let off = self.offset_of(coords);
        &mut self.data[off]
    }

    /// Reverse one dimension in place (no copy).
    ///
    /// The origin moves to the former last pixel of that dimension and the
    /// stride is negated, so coordinate 0 addresses what used to be the
    /// highest coordinate.
    pub fn flip(mut self, dim: usize) -> Result<Self> {
        self.check_dim(dim)?;
        let n = self.sizes[dim];
        self.origin = (self.origin as isize + (n as isize - 1) * self.strides[dim]) as usize;
        self.strides[dim] = -self.strides[dim];
        Ok(self)
    }

    /// Restrict one dimension to `start..start + len` (no copy).
    pub fn crop(mut self, dim: usize, start: usize, len: usize) -> Result<Self> {
        self.check_dim(dim)?;
        if len == 0 || start + len > self.sizes[dim] {
            return Err(CoreError::RegionOutOfBounds {
                dim,
                start,
                len,
                size: self.sizes[dim],
            });
        }
        self.origin = (self.origin as isize + start as isize * self.strides[dim]) as usize;
        self.sizes[dim] = len;
        Ok(self)
    }

    /// Shrink every dimension by `border` pixels on both sides (no copy).
    ///
    /// The returned image still owns the full buffer, so reads up to
    /// `border` pixels beyond the logical extent remain valid. This is the
    /// "already expanded" form consumed by neighborhood operators.
    pub fn crop_border(mut self, border: &[usize]) -> Result<Self> {
        if border.len() != self.sizes.len() {
            return Err(CoreError::SizeMismatch {
                expected: self.sizes.clone(),
                actual: border.to_vec(),
            });
        }
        for (dim, &b) in border.iter().enumerate() {
            let size = self.sizes[dim];
            if 2 * b >= size {
                return Err(CoreError::RegionOutOfBounds {
                    dim,
                    start: b,
                    len: size.saturating_sub(2 * b),
                    size,
                });
            }
            self = self.crop(dim, b, size - 2 * b)?;
        }
        Ok(self)
    }

    /// Iterate over the start of every scanline along `dim`.
    pub fn lines(&self, dim: usize) -> LineWalker {
        debug_assert!(dim < self.sizes.len());
        LineWalker::new(&self.sizes, &self.strides, self.origin, dim)
    }

    fn check_dim(&self, dim: usize) -> Result<()> {
        if dim >= self.sizes.len() {
            return Err(CoreError::DimensionOutOfRange {
                dim,
                ndims: self.sizes.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_sizes(sizes: &[usize]) -> Result<usize> {
        if sizes.is_empty() {
            return Err(CoreError::ZeroDimensionality);
        }
        let mut n: usize = 1;
        for (dim, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(CoreError::InvalidExtent { dim, size });
            }
            n = n.checked_mul(size).ok_or(CoreError::SizeOverflow)?;
        }
        Ok(n)
    }

    /// Row-major strides (last dimension fastest).
    pub(crate) fn canonical_strides(sizes: &[usize]) -> Vec<isize> {
        let mut strides = vec![1isize; sizes.len()];
        for d in (0..sizes.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * sizes[d + 1] as isize;
        }
        strides
    }
}

impl<T: Clone + Default> Image<T> {
    /// Allocate a zero-initialized image with row-major strides.
    ///
    /// # Errors
    ///
    /// Fails if `sizes` is empty, any extent is zero, or the total pixel
    /// count overflows.
    pub fn new(sizes: &[usize]) -> Result<Self> {
        Self::filled(sizes, T::default())
    }

    /// Allocate an image with every sample set to `value`.
    pub fn filled(sizes: &[usize], value: T) -> Result<Self> {
        let n = Self::check_sizes(sizes)?;
        Ok(Image {
            sizes: sizes.to_vec(),
            strides: Self::canonical_strides(sizes),
            origin: 0,
            data: vec![value; n],
        })
    }

    /// Copy the logical content into a freshly allocated row-major image,
    /// adding `border` pixels of `fill` on both sides of every dimension.
    pub fn pad(&self, border: &[usize], fill: T) -> Result<Self> {
        if border.len() != self.sizes.len() {
            return Err(CoreError::SizeMismatch {
                expected: self.sizes.clone(),
                actual: border.to_vec(),
            });
        }
        let padded_sizes: Vec<usize> = self
            .sizes
            .iter()
            .zip(border)
            .map(|(&s, &b)| s + 2 * b)
            .collect();
        let mut out = Self::filled(&padded_sizes, fill)?;
        let dim = self.sizes.len() - 1;
        let n = self.sizes[dim];
        let in_stride = self.strides[dim];
        let out_stride = out.strides[dim];
        for line in self.lines(dim) {
            let mut dst_coords = line.coords.clone();
            for (d, c) in dst_coords.iter_mut().enumerate() {
                *c += border[d];
            }
            let mut src = line.offset as isize;
            let mut dst = out.offset_of(&dst_coords) as isize;
            for _ in 0..n {
                out.data[dst as usize] = self.data[src as usize].clone();
                src += in_stride;
                dst += out_stride;
            }
        }
        Ok(out)
    }

    /// Extract the center region, removing `border` pixels from both sides
    /// of every dimension, into a freshly allocated row-major image.
    pub fn unpad(&self, border: &[usize]) -> Result<Self> {
        let view = self.clone().crop_border(border)?;
        let mut out = Self::new(view.sizes())?;
        let dim = out.dimensionality() - 1;
        let n = out.size(dim);
        let in_stride = view.stride(dim);
        let out_stride = out.stride(dim);
        for line in view.lines(dim) {
            let mut src = line.offset as isize;
            let mut dst = out.offset_of(&line.coords) as isize;
            for _ in 0..n {
                out.data[dst as usize] = view.data[src as usize].clone();
                src += in_stride;
                dst += out_stride;
            }
        }
        Ok(out)
    }
}

/// Start of one scanline: buffer offset plus the line's coordinates.
///
/// The coordinate along the walked dimension is always zero.
#[derive(Debug, Clone)]
pub struct Line {
    pub offset: usize,
    pub coords: Vec<usize>,
}

/// Iterator over all scanlines of an image along one dimension.
///
/// Owns copies of the geometry, so the image may be mutated while the
/// walker is live.
#[derive(Debug)]
pub struct LineWalker {
    sizes: Vec<usize>,
    strides: Vec<isize>,
    dim: usize,
    coords: Vec<usize>,
    offset: isize,
    done: bool,
}

impl LineWalker {
    fn new(sizes: &[usize], strides: &[isize], origin: usize, dim: usize) -> Self {
        LineWalker {
            sizes: sizes.to_vec(),
            strides: strides.to_vec(),
            dim,
            coords: vec![0; sizes.len()],
            offset: origin as isize,
            done: false,
        }
    }
}

impl Iterator for LineWalker {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.done {
            return None;
        }
        let line = Line {
            offset: self.offset as usize,
            coords: self.coords.clone(),
        };
        // Odometer over the non-walked dimensions, last dimension fastest.
        let mut carried = true;
        for d in (0..self.sizes.len()).rev() {
            if d == self.dim {
                continue;
            }
            self.coords[d] += 1;
            self.offset += self.strides[d];
            if self.coords[d] < self.sizes[d] {
                carried = false;
                break;
            }
            self.coords[d] = 0;
            self.offset -= self.strides[d] * self.sizes[d] as isize;
        }
        if carried {
            self.done = true;
        }
        Some(line)
    }
}

/// Recovers pixel coordinates from a buffer offset.
///
/// Valid for the stride sets this crate produces (row-major allocation,
/// optionally flipped or cropped), where each stride magnitude dominates
/// the combined span of all smaller-stride dimensions.
#[derive(Debug)]
pub struct CoordsComputer {
    origin: isize,
    entries: Vec<CcEntry>,
}

#[derive(Debug)]
struct CcEntry {
    dim: usize,
    stride: isize,
    size: usize,
    /// Lowest offset contribution of all later (smaller-stride) entries.
    rest_lo: isize,
}

impl CoordsComputer {
    pub fn new(sizes: &[usize], strides: &[isize], origin: usize) -> Self {
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by_key(|&d| std::cmp::Reverse(strides[d].unsigned_abs()));
        let mut entries: Vec<CcEntry> = order
            .iter()
            .map(|&d| CcEntry {
                dim: d,
                stride: strides[d],
                size: sizes[d],
                rest_lo: 0,
            })
            .collect();
        // Backward pass accumulating the minimum contribution of the tail.
        let mut lo = 0isize;
        for e in entries.iter_mut().rev() {
            e.rest_lo = lo;
            let span = e.stride * (e.size as isize - 1);
            lo += span.min(0);
        }
        CoordsComputer {
            origin: origin as isize,
            entries,
        }
    }

    /// Write the coordinates of the pixel at `offset` into `out`.
    pub fn coords_into(&self, offset: usize, out: &mut [usize]) {
        let mut rel = offset as isize - self.origin;
        for e in &self.entries {
            let c = if e.stride > 0 {
                div_floor(rel - e.rest_lo, e.stride)
            } else {
                div_ceil(rel - e.rest_lo, e.stride)
            };
            let c = c.clamp(0, e.size as isize - 1);
            rel -= c * e.stride;
            out[e.dim] = c as usize;
        }
        debug_assert_eq!(rel, 0, "offset does not address a pixel");
    }

    /// Coordinates of the pixel at `offset`.
    pub fn coords_of(&self, offset: usize) -> Vec<usize> {
        let mut out = vec![0; self.entries.len()];
        self.coords_into(offset, &mut out);
        out
    }
}

#[inline]
fn div_floor(a: isize, b: isize) -> isize {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }
}

#[inline]
fn div_ceil(a: isize, b: isize) -> isize {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) == (b < 0) { q + 1 } else { q }
}
