use core::ops::Index;
use crate::expression::error::Error;




/// Shape of a grid as `(rows, columns)`.
pub type Shape = (usize, usize);




/**
 * A dense 2D grid of values in a row-major buffer. Rows run along the
 * y-axis of a sweep and columns along the x-axis, matching the conventional
 * "xy" indexing of coordinate grids: `grid[(i, j)]` is the sample at the i-th
 * y value and the j-th x value.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    shape: Shape,
    data: Vec<T>,
}




/// Boolean grid marking admissible mesh points.
pub type Mask = Grid<bool>;




// ============================================================================
impl<T> Grid<T> {

    /**
     * Generate a grid of the given shape with values defined from a closure
     * of the `(row, column)` index.
     */
    pub fn from_function<F>(shape: Shape, f: F) -> Self
    where
        F: Fn(usize, usize) -> T
    {
        let (m, n) = shape;
        Self {
            shape,
            data: (0..m).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| f(i, j)).collect()
        }
    }

    /**
     * Wrap an existing row-major buffer. Returns `None` if the buffer length
     * does not match the shape.
     */
    pub fn from_vec(shape: Shape, data: Vec<T>) -> Option<Self> {
        if data.len() == shape.0 * shape.1 {
            Some(Self { shape, data })
        } else {
            None
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.0
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: (usize, usize)) -> Option<&T> {
        if index.0 < self.shape.0 && index.1 < self.shape.1 {
            Some(&self.data[self.row_major_offset(index)])
        } else {
            None
        }
    }

    /**
     * Return the slice of values in the given row.
     */
    pub fn row(&self, i: usize) -> &[T] {
        let n = self.shape.1;
        &self.data[i * n .. (i + 1) * n]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /**
     * Return a new grid of the same shape by applying a function to each
     * value.
     */
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: Fn(&T) -> U
    {
        Grid { shape: self.shape, data: self.data.iter().map(f).collect() }
    }

    /**
     * Combine two grids of the same shape elementwise.
     */
    pub fn zip_with<U, V, F>(&self, other: &Grid<U>, f: F) -> Result<Grid<V>, Error>
    where
        F: Fn(&T, &U) -> V
    {
        if self.shape != other.shape {
            return Err(Error::ShapeMismatch(self.shape, other.shape));
        }
        Ok(Grid {
            shape: self.shape,
            data: self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect()
        })
    }

    fn row_major_offset(&self, index: (usize, usize)) -> usize {
        index.0 * self.shape.1 + index.1
    }
}




// ============================================================================
impl<T: Clone> Grid<T> {
    pub fn filled(shape: Shape, value: T) -> Self {
        Self { shape, data: vec![value; shape.0 * shape.1] }
    }
}

impl Grid<f64> {

    /**
     * Build the pair of coordinate grids for 1D sample arrays `x` and `y`, by
     * outer-product broadcasting: both have `y.len()` rows and `x.len()`
     * columns, the first varying along columns and the second along rows.
     */
    pub fn meshgrid(x: &[f64], y: &[f64]) -> (Self, Self) {
        let shape = (y.len(), x.len());
        (Self::from_function(shape, |_, j| x[j]), Self::from_function(shape, |i, _| y[i]))
    }

    /**
     * Return the mask of values lying in the closed interval `[min, max]`.
     * NaN lies in no interval.
     */
    pub fn within(&self, min: f64, max: f64) -> Mask {
        self.map(|&v| v >= min && v <= max)
    }
}

impl Grid<bool> {

    /**
     * Elementwise logical AND of two masks.
     */
    pub fn and(&self, other: &Self) -> Result<Self, Error> {
        self.zip_with(other, |&a, &b| a && b)
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert!(index.0 < self.shape.0 && index.1 < self.shape.1,
            "index ({} {}) out of range on grid of shape ({} {})",
            index.0,
            index.1,
            self.shape.0,
            self.shape.1);
        &self.data[self.row_major_offset(index)]
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Grid;
    use crate::expression::error::Error;

    #[test]
    fn grids_are_row_major() {
        let grid = Grid::from_function((2, 3), |i, j| (i * 10 + j) as f64);
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(grid[(1, 2)], 12.0);
        assert_eq!(grid.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(grid.get((2, 0)), None);
    }

    #[test]
    fn meshgrid_uses_xy_indexing() {
        let (x, y) = Grid::meshgrid(&[0.0, 1.0, 2.0], &[5.0, 6.0]);
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(y.shape(), (2, 3));
        assert_eq!(x.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(x.row(1), &[0.0, 1.0, 2.0]);
        assert_eq!(y.row(0), &[5.0, 5.0, 5.0]);
        assert_eq!(y.row(1), &[6.0, 6.0, 6.0]);
    }

    #[test]
    fn within_is_a_closed_interval() {
        let grid = Grid::from_vec((1, 4), vec![1.0, 2.0, 3.0, f64::NAN]).unwrap();
        assert_eq!(grid.within(2.0, 3.0).as_slice(), &[false, true, true, false]);
    }

    #[test]
    fn zipping_grids_of_different_shape_fails() {
        let a = Grid::filled((2, 2), true);
        let b = Grid::filled((2, 3), true);
        assert_eq!(a.and(&b).unwrap_err(), Error::ShapeMismatch((2, 2), (2, 3)));
    }

    #[test]
    fn from_vec_checks_the_length() {
        assert!(Grid::from_vec((2, 2), vec![0.0; 3]).is_none());
    }
}
