//! Partitioning the flat model output into the A, B and AB groups.
//!
//! # Block layout
//!
//! The Sobol sampling scheme evaluates the model in `N` blocks of `D + 2` points.
//! Within block `j` (0-based):
//!
//! ```text
//!   offset 0          A[j]        base sample from matrix A
//!   offset 1..=D      AB[j][i]    A with column i taken from B (i = offset - 1)
//!   offset D + 1      B[j]        base sample from matrix B
//! ```
//!
//! So for `D = 2`, `N = 3` the output reads
//! `[a1, ab11, ab12, b1,  a2, ab21, ab22, b2,  a3, ab31, ab32, b3]`.
//!
//! This ordering is fixed by the sampler that produced the outputs.  It is spelled
//! out in [`BlockLayout`] so any change has to be made on purpose in one place.

use crate::SobolError;

/// Offset of the A sample within a block.
pub const A_OFFSET: usize = 0;

/// Offset of the first AB sample (parameter 0) within a block.
pub const AB_OFFSET: usize = 1;

/// Points per block beyond the `D` AB samples: one A and one B.
pub const BLOCK_OVERHEAD: usize = 2;

/// Position of each sample group inside one block of the output array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    num_params: usize,
}

impl BlockLayout {
    pub const fn new(num_params: usize) -> Self {
        Self { num_params }
    }

    /// Block length, `D + 2`.
    pub const fn stride(&self) -> usize {
        self.num_params + BLOCK_OVERHEAD
    }

    pub const fn a_offset(&self) -> usize {
        A_OFFSET
    }

    /// Offset of the B sample: the last slot of the block.
    pub const fn b_offset(&self) -> usize {
        self.stride() - 1
    }

    /// Offset of the AB sample for parameter `i`.
    pub const fn ab_offset(&self, i: usize) -> usize {
        AB_OFFSET + i
    }

    /// Expected output length for `num_samples` blocks.
    pub const fn expected_len(&self, num_samples: usize) -> usize {
        num_samples * self.stride()
    }
}

/// The three sample groups extracted from one output array.
///
/// `A` and `B` have length `N`.  `AB` is an `N x D` matrix stored column-major,
/// so the values for one parameter form a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PartitionParts"))]
pub struct Partition {
    num_samples: usize,
    num_params: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    ab: Vec<f64>,
}

/// Unchecked field layout of a serialized [`Partition`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PartitionParts {
    num_samples: usize,
    num_params: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    ab: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<PartitionParts> for Partition {
    type Error = SobolError;

    fn try_from(p: PartitionParts) -> Result<Self, Self::Error> {
        Partition::from_columns(p.num_samples, p.num_params, p.a, p.b, p.ab)
    }
}

impl Partition {
    /// Assemble a partition from groups that were already separated.
    ///
    /// `ab` is column-major (`N` values for parameter 0, then parameter 1, ...).
    /// Fails unless `a` and `b` have length `N` and `ab` has length `N * D`.
    pub fn from_columns(
        num_samples: usize,
        num_params: usize,
        a: Vec<f64>,
        b: Vec<f64>,
        ab: Vec<f64>,
    ) -> Result<Self, SobolError> {
        if num_params == 0 || num_samples == 0 {
            return Err(SobolError::InvalidProblem {
                num_params,
                num_samples,
            });
        }
        if a.len() != num_samples || b.len() != num_samples || ab.len() != num_samples * num_params {
            let layout = BlockLayout::new(num_params);
            return Err(SobolError::DimensionMismatch {
                len: a.len() + b.len() + ab.len(),
                stride: layout.stride(),
                expected: layout.expected_len(num_samples),
            });
        }
        Ok(Self {
            num_samples,
            num_params,
            a,
            b,
            ab,
        })
    }

    /// Number of blocks (N).
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of parameters (D).
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    pub fn a(&self) -> &[f64] {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Column `i` of AB: the outputs with parameter `i` resampled from B.
    ///
    /// # Panics
    ///
    /// If `i >= num_params()`.
    pub fn ab_column(&self, i: usize) -> &[f64] {
        assert!(i < self.num_params, "parameter index {i} out of range");
        let n = self.num_samples;
        &self.ab[i * n..(i + 1) * n]
    }

    /// Single entry `AB[j][i]`.  Returns `None` if out of bounds.
    pub fn ab(&self, j: usize, i: usize) -> Option<f64> {
        if j >= self.num_samples || i >= self.num_params {
            return None;
        }
        Some(self.ab[i * self.num_samples + j])
    }

    /// Iterate over the AB columns in parameter order.
    pub fn ab_columns(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.ab.chunks_exact(self.num_samples)
    }
}

/// Check `N`, `D` and the output length against each other.
pub(crate) fn check_dimensions(
    len: usize,
    num_samples: usize,
    num_params: usize,
) -> Result<BlockLayout, SobolError> {
    if num_params == 0 || num_samples == 0 {
        return Err(SobolError::InvalidProblem {
            num_params,
            num_samples,
        });
    }
    let layout = BlockLayout::new(num_params);
    let expected = layout.expected_len(num_samples);
    if len % layout.stride() != 0 || len != expected {
        return Err(SobolError::DimensionMismatch {
            len,
            stride: layout.stride(),
            expected,
        });
    }
    Ok(layout)
}

/// Split an interleaved output array into A, B and AB.
///
/// `output` must have length exactly `num_samples * (num_params + 2)`; anything
/// else is a [`SobolError::DimensionMismatch`].  Nothing is truncated.
///
/// ```
/// use sobol_indices::partition::split;
///
/// let output = [1.0, 10.0, 20.0, 2.0, 3.0, 30.0, 40.0, 4.0];
/// let p = split(&output, 2, 2).unwrap();
/// assert_eq!(p.a(), &[1.0, 3.0]);
/// assert_eq!(p.b(), &[2.0, 4.0]);
/// assert_eq!(p.ab_column(0), &[10.0, 30.0]);
/// assert_eq!(p.ab_column(1), &[20.0, 40.0]);
/// ```
pub fn split(output: &[f64], num_samples: usize, num_params: usize) -> Result<Partition, SobolError> {
    let layout = check_dimensions(output.len(), num_samples, num_params)?;
    let stride = layout.stride();

    let mut a = Vec::with_capacity(num_samples);
    let mut b = Vec::with_capacity(num_samples);
    let mut ab = vec![0.0; num_samples * num_params];

    for (j, block) in output.chunks_exact(stride).enumerate() {
        a.push(block[layout.a_offset()]);
        b.push(block[layout.b_offset()]);
        for i in 0..num_params {
            ab[i * num_samples + j] = block[layout.ab_offset(i)];
        }
    }

    Ok(Partition {
        num_samples,
        num_params,
        a,
        b,
        ab,
    })
}
