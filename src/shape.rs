//! Extents and memory layouts
//!
//! Static extents are carried as `usize` const parameters where [`DYN`] (zero)
//! means "known only at runtime". A [`Layout`] describes where element
//! `(i, j)` of a strided region lives: at `i * row_stride + j * col_stride`.

use crate::error::{Error, Result};

/// Marker for an extent that is only known at runtime
pub const DYN: usize = 0;

/// Whether two static extents can describe the same runtime extent
#[inline]
pub const fn dims_compatible(a: usize, b: usize) -> bool {
    a == DYN || b == DYN || a == b
}

/// Static extent shared by two compatible operands
///
/// Returns the known extent when either side knows it, `DYN` otherwise.
#[inline]
pub const fn common_dim(a: usize, b: usize) -> usize {
    if a == DYN {
        b
    } else {
        a
    }
}

/// Element count of a `rows x cols` region, rejecting counts past `usize::MAX`
pub fn checked_nelems(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        Error::InvalidArgument(format!("{}x{} region overflows usize", rows, cols))
    })
}

/// Runtime extents of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Shape {
    /// Create a shape from row and column counts
    #[inline]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of elements
    #[inline]
    pub const fn nelems(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the shape holds no element
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether one of the extents is 1
    #[inline]
    pub const fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    /// Check that `other` has the same extents
    pub fn expect_same(&self, other: Shape) -> Result<()> {
        if *self == other {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: (self.rows, self.cols),
                found: (other.rows, other.cols),
            })
        }
    }
}

/// Strided placement of a `rows x cols` region inside a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Distance between vertically adjacent elements
    pub row_stride: usize,
    /// Distance between horizontally adjacent elements
    pub col_stride: usize,
}

impl Layout {
    /// Packed column-major layout
    #[inline]
    pub const fn column_major(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_stride: 1,
            col_stride: rows,
        }
    }

    /// Runtime extents
    #[inline]
    pub const fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Slice offset of element `(i, j)`
    #[inline(always)]
    pub const fn offset(&self, i: usize, j: usize) -> usize {
        i * self.row_stride + j * self.col_stride
    }

    /// Whether the region is one packed column-major run
    #[inline]
    pub const fn is_contiguous(&self) -> bool {
        (self.rows <= 1 || self.row_stride == 1) && (self.cols <= 1 || self.col_stride == self.rows)
    }

    /// Whether the elements of every column are adjacent
    #[inline]
    pub const fn is_percol_contiguous(&self) -> bool {
        self.rows <= 1 || self.row_stride == 1
    }

    /// Distance between consecutive linear (column-major) indices, if uniform
    ///
    /// Packed regions have step 1; a single row or column has the stride along
    /// its long dimension; any other strided region has none.
    #[inline]
    pub const fn linear_step(&self) -> Option<usize> {
        if self.is_contiguous() {
            Some(1)
        } else if self.cols <= 1 {
            Some(self.row_stride)
        } else if self.rows <= 1 {
            Some(self.col_stride)
        } else {
            None
        }
    }

    /// Minimum slice length able to hold the region
    ///
    /// `None` when the last offset does not fit in `usize`.
    #[inline]
    pub const fn required_len(&self) -> Option<usize> {
        if self.rows == 0 || self.cols == 0 {
            return Some(0);
        }
        let (down, o1) = (self.rows - 1).overflowing_mul(self.row_stride);
        let (across, o2) = (self.cols - 1).overflowing_mul(self.col_stride);
        let (last, o3) = down.overflowing_add(across);
        if o1 || o2 || o3 || last == usize::MAX {
            None
        } else {
            Some(last + 1)
        }
    }

    /// Reject aliasing strides and regions that overrun a slice of `len` elements
    ///
    /// Empty regions are always valid.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.shape().is_empty() {
            return Ok(());
        }
        if (self.rows > 1 && self.row_stride == 0) || (self.cols > 1 && self.col_stride == 0) {
            return Err(Error::InvalidArgument(format!(
                "zero stride along a dimension longer than 1 (row_stride = {}, col_stride = {})",
                self.row_stride, self.col_stride
            )));
        }
        let needed = self.required_len().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{}x{} region with strides ({}, {}) overflows usize",
                self.rows, self.cols, self.row_stride, self.col_stride
            ))
        })?;
        if needed > len {
            return Err(Error::InvalidArgument(format!(
                "{}x{} region with strides ({}, {}) needs {} elements, slice has {}",
                self.rows, self.cols, self.row_stride, self.col_stride, needed, len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_dims() {
        assert!(dims_compatible(DYN, 3));
        assert!(dims_compatible(3, 3));
        assert!(!dims_compatible(3, 4));
        assert_eq!(common_dim(DYN, 5), 5);
        assert_eq!(common_dim(5, DYN), 5);
        assert_eq!(common_dim(DYN, DYN), DYN);
    }

    #[test]
    fn test_contiguity() {
        assert!(Layout::column_major(4, 3).is_contiguous());

        // 4x3 block of a 10-row matrix
        let block = Layout {
            rows: 4,
            cols: 3,
            row_stride: 1,
            col_stride: 10,
        };
        assert!(!block.is_contiguous());
        assert!(block.is_percol_contiguous());
        assert_eq!(block.linear_step(), None);

        // one row of a 5x7 matrix
        let row = Layout {
            rows: 1,
            cols: 7,
            row_stride: 1,
            col_stride: 5,
        };
        assert!(!row.is_contiguous());
        assert_eq!(row.linear_step(), Some(5));
    }

    #[test]
    fn test_validate() {
        let layout = Layout {
            rows: 2,
            cols: 3,
            row_stride: 1,
            col_stride: 4,
        };
        assert_eq!(layout.required_len(), Some(10));
        assert!(layout.validate(10).is_ok());
        assert!(matches!(layout.validate(9), Err(Error::InvalidArgument(_))));

        let aliased = Layout {
            row_stride: 0,
            ..layout
        };
        assert!(aliased.validate(100).is_err());
        assert!(Layout::column_major(0, 5).validate(0).is_ok());
    }

    #[test]
    fn test_oversized_regions_rejected() {
        let huge = Layout {
            rows: 3,
            cols: 2,
            row_stride: usize::MAX / 2,
            col_stride: 1,
        };
        assert_eq!(huge.required_len(), None);
        assert!(matches!(huge.validate(usize::MAX), Err(Error::InvalidArgument(_))));

        assert_eq!(checked_nelems(4, 5), Ok(20));
        assert!(matches!(
            checked_nelems(usize::MAX, 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Shape::new(2, 3).expect_same(Shape::new(3, 2)).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: (2, 3),
                found: (3, 2)
            }
        );
    }
}
