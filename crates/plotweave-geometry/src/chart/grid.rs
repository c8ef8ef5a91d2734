//! Dense heatmap grids built from sparse, unordered samples.
//!
//! [`GridBuilder`] turns parallel `(x, y, value)` sequences into a rectangular
//! [`Grid`]: the unique coordinates become strictly ascending axes and every
//! sample lands in the cell addressed by its coordinates. Cells nobody sampled
//! hold NaN.

use ndarray::Array2;
use plotweave_core::profiling::profile_function;

/// Sample values for a grid, optionally with a 68% confidence interval.
#[derive(Debug, Clone, Copy)]
pub enum GridSamples<'a> {
    Plain {
        v: &'a [f64],
    },
    Uncertain {
        m: &'a [f64],
        lb68: &'a [f64],
        ub68: &'a [f64],
    },
}

impl<'a> GridSamples<'a> {
    fn primary(&self) -> &'a [f64] {
        match *self {
            Self::Plain { v } => v,
            Self::Uncertain { m, .. } => m,
        }
    }

    fn len(&self) -> usize {
        match *self {
            Self::Plain { v } => v.len(),
            Self::Uncertain { m, lb68, ub68 } => m.len().min(lb68.len()).min(ub68.len()),
        }
    }
}

/// A rectangular value grid.
///
/// `values` (and the optional bounds) are shaped `|unique x| × |unique y|`,
/// indexed `[[xi, yi]]`. In discrete mode an axis with two or more unique
/// values holds the `n + 1` cell boundaries instead of the `n` centers.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Array2<f64>,
    pub lower: Option<Array2<f64>>,
    pub upper: Option<Array2<f64>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub fn empty() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            values: Array2::from_elem((0, 0), f64::NAN),
            lower: None,
            upper: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(columns along x, rows along y)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn value(&self, xi: usize, yi: usize) -> Option<f64> {
        self.values.get([xi, yi]).copied()
    }

    /// Cell edges along x (`columns + 1` entries).
    pub fn x_edges(&self) -> Vec<f64> {
        axis_edges(&self.x, self.values.nrows())
    }

    /// Cell edges along y (`rows + 1` entries).
    pub fn y_edges(&self) -> Vec<f64> {
        axis_edges(&self.y, self.values.ncols())
    }

    /// Range of the finite values, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let (min, max) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        (min <= max).then_some((min, max))
    }
}

/// Boundaries between consecutive centers, extrapolated half a step past both ends.
///
/// Requires at least two centers.
pub fn cell_boundaries(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    debug_assert!(n >= 2, "cell boundaries need at least two centers");
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
    edges.extend(centers.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0));
    edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
    edges
}

fn axis_edges(axis: &[f64], cells: usize) -> Vec<f64> {
    match axis.len() {
        0 => Vec::new(),
        len if len == cells + 1 => axis.to_vec(),
        1 => vec![axis[0] - 0.5, axis[0] + 0.5],
        _ => cell_boundaries(axis),
    }
}

/// Sorted unique values of `coords` and, per coordinate, the index of its unique value.
fn unique_axis(coords: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..coords.len()).collect();
    // sort_by is stable, so equal coordinates keep their sample order.
    order.sort_by(|&a, &b| coords[a].total_cmp(&coords[b]));

    let mut unique: Vec<f64> = Vec::new();
    let mut bucket = vec![0; coords.len()];
    for idx in order {
        let value = coords[idx];
        // `!=` rather than total_cmp so -0.0 and 0.0 share a bucket.
        if unique.last() != Some(&value) {
            unique.push(value);
        }
        bucket[idx] = unique.len() - 1;
    }
    (unique, bucket)
}

/// Builds [`Grid`]s from parallel sample sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridBuilder {
    discrete: bool,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace axes with cell boundaries (see [`Grid`]).
    pub fn discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    /// Build a grid from `x[i], y[i] → samples[i]`.
    ///
    /// All sequences are trimmed to their shortest common length; samples
    /// with a non-finite coordinate are dropped. Empty input yields an empty
    /// grid. When several samples share a cell, the last one wins.
    pub fn build(&self, x: &[f64], y: &[f64], samples: GridSamples<'_>) -> Grid {
        profile_function!();

        let n = x.len().min(y.len()).min(samples.len());
        let kept: Vec<usize> = (0..n)
            .filter(|&i| x[i].is_finite() && y[i].is_finite())
            .collect();
        if kept.is_empty() {
            return Grid::empty();
        }
        if kept.len() < n {
            tracing::trace!(dropped = n - kept.len(), "grid samples without a position");
        }

        let xs: Vec<f64> = kept.iter().map(|&i| x[i]).collect();
        let ys: Vec<f64> = kept.iter().map(|&i| y[i]).collect();
        let (ux, bx) = unique_axis(&xs);
        let (uy, by) = unique_axis(&ys);
        let shape = (ux.len(), uy.len());

        let scatter = |source: &[f64]| {
            let mut matrix = Array2::from_elem(shape, f64::NAN);
            for (k, &i) in kept.iter().enumerate() {
                matrix[[bx[k], by[k]]] = source[i];
            }
            matrix
        };

        let values = scatter(samples.primary());
        let (lower, upper) = match samples {
            GridSamples::Plain { .. } => (None, None),
            GridSamples::Uncertain { lb68, ub68, .. } => (Some(scatter(lb68)), Some(scatter(ub68))),
        };

        let discretize = |axis: Vec<f64>| {
            if self.discrete && axis.len() >= 2 {
                cell_boundaries(&axis)
            } else {
                axis
            }
        };

        Grid {
            x: discretize(ux),
            y: discretize(uy),
            values,
            lower,
            upper,
        }
    }
}
