//! Convenience methods for constructing sample grids and observation points
//! in a way that echoes, but does not exactly match, methods common in
//! scripting languages.
use itertools::Itertools;
use num_traits::Float;

fn cast<T: Float>(i: usize) -> T {
    T::from(i).unwrap_or_else(T::nan)
}

/// Generates evenly spaced values from start to stop,
/// including the endpoint exactly.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let dx: T = (stop - start) / cast(n - 1);
            let mut out: Vec<T> = (0..n).map(|i| start + cast::<T>(i) * dx).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn)
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

/// Sample coordinates `1..=n` along each axis of a grid with shape `dims`.
pub fn sample_axes<T: Float>(dims: &[usize]) -> Vec<Vec<T>> {
    dims.iter()
        .map(|&n| (1..=n).map(cast::<T>).collect())
        .collect()
}

/// Coordinates of every sample of a grid with shape `dims`, in the same
/// C ordering as the sample values.
pub fn sample_points<T: Float>(dims: &[usize]) -> Vec<Vec<T>> {
    let axes = sample_axes::<T>(dims);
    meshgrid(axes.iter().collect())
}

/// Split a list of points into one coordinate list per axis, the layout
/// taken by [`Interpolate::evaluate_many`](crate::Interpolate::evaluate_many).
pub fn transpose_points<T: Float, const N: usize>(points: &[Vec<T>]) -> [Vec<T>; N] {
    core::array::from_fn(|i| points.iter().map(|p| p[i]).collect())
}
