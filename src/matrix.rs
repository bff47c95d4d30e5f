//! Dense storage
//!
//! [`DenseMatrix`] owns a packed column-major buffer and may carry static
//! extents as const parameters. [`MatrixView`] and [`MatrixViewMut`] borrow a
//! strided region of any slice.

use core::ops::{Index, IndexMut};

use crate::access::{Cached, DenseReader, DenseWriter};
use crate::error::{Error, Result};
use crate::expr::{leaf_reader, Capabilities, MatDest, MatExpr};
use crate::policy::AccessOrder;
use crate::shape::{checked_nelems, dims_compatible, Layout, Shape, DYN};
use crate::traits::Element;

/// Buffer length for a `rows x cols` matrix, rejecting sizes no `Vec` can hold
fn buffer_len<T>(rows: usize, cols: usize) -> Result<usize> {
    let len = checked_nelems(rows, cols)?;
    match len.checked_mul(core::mem::size_of::<T>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(len),
        _ => Err(Error::InvalidArgument(format!(
            "{}x{} matrix exceeds the maximum allocation size",
            rows, cols
        ))),
    }
}

fn check_static_extents(ct_rows: usize, ct_cols: usize, rows: usize, cols: usize) -> Result<()> {
    if dims_compatible(ct_rows, rows) && dims_compatible(ct_cols, cols) {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: (ct_rows, ct_cols),
            found: (rows, cols),
        })
    }
}

/// Owned column-major matrix
///
/// `M` and `N` are static extents; [`DYN`] leaves the extent to runtime.
/// A static extent must match the runtime extent given at construction.
///
/// # Example
///
/// ```rust
/// use mateval::DenseMatrix;
///
/// let m = DenseMatrix::<f64, 2, 3>::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(m[(1, 2)], 6.0);
/// assert!(DenseMatrix::<f64, 2, 3>::zeros(3, 3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T, const M: usize = DYN, const N: usize = DYN> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Element, const M: usize, const N: usize> DenseMatrix<T, M, N> {
    /// `rows x cols` matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::ZERO)
    }

    /// `rows x cols` matrix with every element set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        check_static_extents(M, N, rows, cols)?;
        let len = buffer_len::<T>(rows, cols)?;
        Ok(Self {
            data: vec![value; len],
            rows,
            cols,
        })
    }

    /// Wrap a column-major buffer of exactly `rows * cols` elements
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        check_static_extents(M, N, rows, cols)?;
        let len = buffer_len::<T>(rows, cols)?;
        if data.len() != len {
            return Err(Error::InvalidArgument(format!(
                "{}x{} matrix needs {} elements, got {}",
                rows,
                cols,
                len,
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Matrix with element `(i, j)` set to `f(i, j)`
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        check_static_extents(M, N, rows, cols)?;
        let mut data = Vec::with_capacity(buffer_len::<T>(rows, cols)?);
        for j in 0..cols {
            for i in 0..rows {
                data.push(f(i, j));
            }
        }
        Ok(Self { data, rows, cols })
    }

    /// Row count; the static extent when known
    #[inline]
    pub fn nrows(&self) -> usize {
        if M != DYN {
            M
        } else {
            self.rows
        }
    }

    /// Column count; the static extent when known
    #[inline]
    pub fn ncols(&self) -> usize {
        if N != DYN {
            N
        } else {
            self.cols
        }
    }

    /// Runtime extents
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::new(self.nrows(), self.ncols())
    }

    /// Elements in column-major order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable elements in column-major order
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Element `(i, j)`, if in range
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.nrows() && j < self.ncols() {
            Some(self.data[i + j * self.nrows()])
        } else {
            None
        }
    }

    /// Borrow as a view
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &self.data,
            layout: self.packed_layout(),
        }
    }

    /// Borrow mutably as a view
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        let layout = self.packed_layout();
        MatrixViewMut {
            data: &mut self.data,
            layout,
        }
    }

    /// Column `j` as an `m x 1` view
    pub fn column(&self, j: usize) -> Result<MatrixView<'_, T>> {
        self.view().block(0, j, self.nrows(), 1)
    }

    /// Row `i` as a `1 x n` view
    pub fn row(&self, i: usize) -> Result<MatrixView<'_, T>> {
        self.view().block(i, 0, 1, self.ncols())
    }

    /// `rows x cols` block starting at `(i, j)`
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<MatrixView<'_, T>> {
        self.view().block(i, j, rows, cols)
    }

    /// Mutable `rows x cols` block starting at `(i, j)`
    pub fn block_mut(
        &mut self,
        i: usize,
        j: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixViewMut<'_, T>> {
        self.view_mut().into_block(i, j, rows, cols)
    }

    fn packed_layout(&self) -> Layout {
        Layout::column_major(self.nrows(), self.ncols())
    }
}

impl<T: Element, const M: usize, const N: usize> Index<(usize, usize)> for DenseMatrix<T, M, N> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.nrows() && j < self.ncols(), "matrix index out of bounds");
        &self.data[i + j * self.nrows()]
    }
}

impl<T: Element, const M: usize, const N: usize> IndexMut<(usize, usize)> for DenseMatrix<T, M, N> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.nrows() && j < self.ncols(), "matrix index out of bounds");
        let rows = self.nrows();
        &mut self.data[i + j * rows]
    }
}

impl<T: Element, const M: usize, const N: usize> MatExpr for DenseMatrix<T, M, N> {
    type Elem = T;
    type Native<'a> = DenseReader<'a, T>;
    type Reader<'a> = DenseReader<'a, T>;

    const CT_ROWS: usize = M;
    const CT_COLS: usize = N;

    #[inline]
    fn nrows(&self) -> usize {
        DenseMatrix::nrows(self)
    }

    #[inline]
    fn ncols(&self) -> usize {
        DenseMatrix::ncols(self)
    }

    fn caps(&self) -> Capabilities {
        Capabilities::of_layout(&self.packed_layout())
    }

    fn native(&self) -> DenseReader<'_, T> {
        DenseReader::new(&self.data, self.packed_layout())
    }

    fn reader(&self, _order: AccessOrder) -> DenseReader<'_, T> {
        self.native()
    }
}

impl<T: Element, const M: usize, const N: usize> MatDest for DenseMatrix<T, M, N> {
    type Elem = T;

    const CT_ROWS: usize = M;
    const CT_COLS: usize = N;

    fn layout(&self) -> Layout {
        self.packed_layout()
    }

    fn writer(&mut self) -> DenseWriter<'_, T> {
        let layout = self.packed_layout();
        DenseWriter::new(&mut self.data, layout)
    }
}

/// Borrowed strided region
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    layout: Layout,
}

impl<'a, T: Element> MatrixView<'a, T> {
    /// Packed column-major `rows x cols` view of `data`
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::strided(data, rows, cols, 1, rows)
    }

    /// View with element `(i, j)` at `data[i * row_stride + j * col_stride]`
    pub fn strided(
        data: &'a [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Result<Self> {
        let layout = Layout {
            rows,
            cols,
            row_stride,
            col_stride,
        };
        layout.validate(data.len())?;
        Ok(Self { data, layout })
    }

    /// Placement of the region
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Element `(i, j)`, if in range
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.layout.rows && j < self.layout.cols {
            Some(self.data[self.layout.offset(i, j)])
        } else {
            None
        }
    }

    /// `rows x cols` sub-region starting at `(i, j)`
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<MatrixView<'a, T>> {
        let (start, layout) = sub_layout(&self.layout, i, j, rows, cols)?;
        let data: &'a [T] = self.data;
        Ok(MatrixView {
            data: &data[start..],
            layout,
        })
    }

    /// View of the transposed region, without copying
    pub fn t(&self) -> MatrixView<'a, T> {
        MatrixView {
            data: self.data,
            layout: Layout {
                rows: self.layout.cols,
                cols: self.layout.rows,
                row_stride: self.layout.col_stride,
                col_stride: self.layout.row_stride,
            },
        }
    }
}

fn sub_layout(
    parent: &Layout,
    i: usize,
    j: usize,
    rows: usize,
    cols: usize,
) -> Result<(usize, Layout)> {
    let fits = |start: usize, len: usize, extent: usize| {
        start.checked_add(len).is_some_and(|end| end <= extent)
    };
    if !fits(i, rows, parent.rows) || !fits(j, cols, parent.cols) {
        return Err(Error::InvalidArgument(format!(
            "block ({}, {}) of size {}x{} exceeds {}x{}",
            i, j, rows, cols, parent.rows, parent.cols
        )));
    }
    let start = if rows == 0 || cols == 0 {
        0
    } else {
        parent.offset(i, j)
    };
    Ok((
        start,
        Layout {
            rows,
            cols,
            row_stride: parent.row_stride,
            col_stride: parent.col_stride,
        },
    ))
}

impl<T: Element> MatExpr for MatrixView<'_, T> {
    type Elem = T;
    type Native<'a> = DenseReader<'a, T> where Self: 'a;
    type Reader<'a> = Cached<DenseReader<'a, T>> where Self: 'a;

    fn nrows(&self) -> usize {
        self.layout.rows
    }

    fn ncols(&self) -> usize {
        self.layout.cols
    }

    fn caps(&self) -> Capabilities {
        Capabilities::of_layout(&self.layout)
    }

    fn native(&self) -> Self::Native<'_> {
        DenseReader::new(self.data, self.layout)
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        leaf_reader(self, order)
    }
}

/// Mutably borrowed strided region
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
}

impl<'a, T: Element> MatrixViewMut<'a, T> {
    /// Packed column-major `rows x cols` view of `data`
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        Self::strided(data, rows, cols, 1, rows)
    }

    /// View with element `(i, j)` at `data[i * row_stride + j * col_stride]`
    pub fn strided(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Result<Self> {
        let layout = Layout {
            rows,
            cols,
            row_stride,
            col_stride,
        };
        layout.validate(data.len())?;
        Ok(Self { data, layout })
    }

    /// Read-only view of the same region
    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &*self.data,
            layout: self.layout,
        }
    }

    /// `rows x cols` sub-region starting at `(i, j)`
    pub fn into_block(self, i: usize, j: usize, rows: usize, cols: usize) -> Result<MatrixViewMut<'a, T>> {
        let (start, layout) = sub_layout(&self.layout, i, j, rows, cols)?;
        let data = self.data;
        Ok(MatrixViewMut {
            data: &mut data[start..],
            layout,
        })
    }
}

impl<T: Element> MatDest for MatrixViewMut<'_, T> {
    type Elem = T;

    fn layout(&self) -> Layout {
        self.layout
    }

    fn writer(&mut self) -> DenseWriter<'_, T> {
        DenseWriter::new(&mut *self.data, self.layout)
    }
}
