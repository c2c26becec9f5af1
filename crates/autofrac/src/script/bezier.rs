//! Subdivision matrices of Bezier curves and classic Cantor edges.
//!
//! A matrix maps parent control points (rows) to child control points
//! (columns): column `k` holds the barycentric weights of child point `k`.
//! Bezier pieces are computed with the polar form (blossom): child point `k`
//! of the piece `[a, b]` is `B(a, …, a, b, …, b)` with `k` copies of `b`.

use nalgebra::DMatrix;

/// Weights of the polar form `B(u₁, …, u_d)` on the `d + 1` Bernstein points.
pub fn blossom(args: &[f64]) -> Vec<f64> {
    let mut w = vec![1.0];
    for &t in args {
        let mut next = vec![0.0; w.len() + 1];
        for (j, &c) in w.iter().enumerate() {
            next[j] += c * (1.0 - t);
            next[j + 1] += c * t;
        }
        w = next;
    }
    w
}

/// Matrix of piece `piece` of `pieces` equal parameter intervals of a Bezier
/// curve of degree `degree`.
pub fn subdivision_matrix(degree: usize, piece: usize, pieces: usize) -> DMatrix<f64> {
    debug_assert!(piece < pieces);
    let a = piece as f64 / pieces as f64;
    let b = (piece + 1) as f64 / pieces as f64;
    let mut m = DMatrix::zeros(degree + 1, degree + 1);
    for k in 0..=degree {
        let mut args = vec![a; degree - k];
        args.extend(std::iter::repeat(b).take(k));
        for (row, w) in blossom(&args).into_iter().enumerate() {
            m[(row, k)] = w;
        }
    }
    m
}

/// Interior points a Bezier edge gains when its delay runs out.
///
/// The delayed parent only carries its two end points; interior point `k`
/// of the degree `degree` child is put at `k / degree` along the segment,
/// which is the straight line written as a degree `degree` curve. One 2-row
/// column per interior point.
pub fn activation_columns(degree: usize) -> Vec<DMatrix<f64>> {
    (1..degree)
        .map(|k| DMatrix::from_column_slice(2, 1, &blossom(&[k as f64 / degree as f64])))
        .collect()
}

/// Placement of the classic Cantor pieces.
///
/// The edge is cut in `2n − 1` equal parts and the `n` even parts are kept.
/// Only the *free* endpoints are constrained: the first piece's end point,
/// the last piece's start point, and both ends of the middle pieces. Each
/// entry pairs the target suffix with a 2-row matrix.
pub fn cantor_matrices(n: usize) -> Vec<(String, DMatrix<f64>)> {
    if n == 1 {
        return vec![("Sub_('0')".to_string(), DMatrix::identity(2, 2))];
    }
    let m = (2 * n - 1) as f64;
    let col = |k: usize| [(2 * n - 1 - k) as f64 / m, k as f64 / m];
    let mut out = Vec::with_capacity(n);
    out.push((
        "Sub_('0') + Bord('1')".to_string(),
        DMatrix::from_column_slice(2, 1, &col(1)),
    ));
    for j in 1..n - 1 {
        let (s, e) = (col(2 * j), col(2 * j + 1));
        out.push((
            format!("Sub_('{j}')"),
            DMatrix::from_column_slice(2, 2, &[s[0], s[1], e[0], e[1]]),
        ));
    }
    out.push((
        format!("Sub_('{}') + Bord('0')", n - 1),
        DMatrix::from_column_slice(2, 1, &col(2 * n - 2)),
    ));
    out
}
