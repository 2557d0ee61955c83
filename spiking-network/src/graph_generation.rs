//! Connectivity-generating functors, grounded on `network/graph_generation.py`
//! in the original implementation: a uniform draw, rescaled per-row so each
//! row's mean transmission probability matches the requested average, then
//! clipped back into `[0, 1]`.

use nalgebra::DMatrix;
use rand::Rng;

use crate::error::{Result, SpikingNetworkError};

fn validate_average(transmission_average: f32) -> Result<()> {
    if transmission_average <= 0.0 || transmission_average >= 1.0 {
        return Err(SpikingNetworkError::InvalidAverage(transmission_average));
    }
    Ok(())
}

fn row_means(matrix: &DMatrix<f32>, skip_diagonal: bool) -> Vec<f32> {
    let n = matrix.nrows();
    (0..n)
        .map(|i| {
            let (sum, count) = (0..matrix.ncols())
                .filter(|&j| !(skip_diagonal && j == i))
                .fold((0.0f32, 0usize), |(s, c), j| (s + matrix[(i, j)], c + 1));
            sum / count as f32
        })
        .collect()
}

fn rescale_rows(matrix: &mut DMatrix<f32>, target_average: f32, skip_diagonal: bool) {
    let n = matrix.nrows();
    let means = row_means(matrix, skip_diagonal);
    for i in 0..n {
        let scale = target_average / means[i];
        for j in 0..matrix.ncols() {
            if skip_diagonal && j == i {
                continue;
            }
            matrix[(i, j)] = (matrix[(i, j)] * scale).clamp(0.0, 1.0);
        }
    }
}

/// Repeats the row-rescale + clip step (steps 2-3) until every row's mean lies
/// within `tolerance` of `target_average`, or `max_attempts` is reached.
/// Clipping to `[0, 1]` can pull a row's achieved mean away from the target
/// after a single pass, so re-rescaling the already-clipped matrix (rather
/// than redrawing fresh randoms) is what lets it converge.
fn rescale_until_tolerance(
    matrix: &mut DMatrix<f32>,
    target_average: f32,
    tolerance: f32,
    max_attempts: usize,
    skip_diagonal: bool,
) {
    for _ in 0..max_attempts {
        rescale_rows(matrix, target_average, skip_diagonal);
        if row_means(matrix, skip_diagonal)
            .iter()
            .all(|mean| (mean - target_average).abs() <= tolerance)
        {
            break;
        }
    }
}

/// Generates an `n x n` matrix of edge probabilities whose every row averages
/// to `transmission_average`, with every ordered pair (including self-loops)
/// eligible to carry an edge.
pub fn fixed_average_transmission(
    n: usize,
    transmission_average: f32,
    rng: &mut impl Rng,
) -> Result<DMatrix<f32>> {
    validate_average(transmission_average)?;
    let mut matrix = DMatrix::from_fn(n, n, |_, _| rng.gen::<f32>());
    rescale_rows(&mut matrix, transmission_average, false);
    Ok(matrix)
}

/// As [`fixed_average_transmission`], but excludes self-loops: the diagonal is
/// set to `NaN` (no edge) and row means are computed over the off-diagonal
/// entries only, matching the original's `np.fill_diagonal`/`np.nanmean` use.
pub fn self_referring_fixed_average_transmission(
    n: usize,
    transmission_average: f32,
    rng: &mut impl Rng,
) -> Result<DMatrix<f32>> {
    validate_average(transmission_average)?;
    let mut matrix = DMatrix::from_fn(n, n, |_, _| rng.gen::<f32>());
    rescale_rows(&mut matrix, transmission_average, true);
    for i in 0..n {
        matrix[(i, i)] = f32::NAN;
    }
    Ok(matrix)
}

/// As [`fixed_average_transmission`], but repeats the rescale-and-clip step
/// until every row's mean lies within `tolerance` of `transmission_average`
/// (or `max_attempts` is reached), rather than accepting whatever a single
/// rescale pass happens to land on.
pub fn fixed_average_transmission_with_tolerance(
    n: usize,
    transmission_average: f32,
    tolerance: f32,
    max_attempts: usize,
    rng: &mut impl Rng,
) -> Result<DMatrix<f32>> {
    validate_average(transmission_average)?;
    let mut matrix = DMatrix::from_fn(n, n, |_, _| rng.gen::<f32>());
    rescale_until_tolerance(&mut matrix, transmission_average, tolerance, max_attempts, false);
    Ok(matrix)
}

/// As [`self_referring_fixed_average_transmission`], but repeats the
/// rescale-and-clip step, excluding the diagonal from every row mean, until
/// every row's mean is within `tolerance` of `transmission_average` (or
/// `max_attempts` is reached).
pub fn self_referring_fixed_average_transmission_with_tolerance(
    n: usize,
    transmission_average: f32,
    tolerance: f32,
    max_attempts: usize,
    rng: &mut impl Rng,
) -> Result<DMatrix<f32>> {
    validate_average(transmission_average)?;
    let mut matrix = DMatrix::from_fn(n, n, |_, _| rng.gen::<f32>());
    rescale_until_tolerance(&mut matrix, transmission_average, tolerance, max_attempts, true);
    for i in 0..n {
        matrix[(i, i)] = f32::NAN;
    }
    Ok(matrix)
}
