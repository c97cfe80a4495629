use super::*;
use crate::errors::EvalErrorKind;

fn m(rows: &[&[f64]]) -> Matrix {
    let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
    Matrix::from_rows(&rows).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn rejects_ragged_rows() {
    let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::MatrixError);
    assert!(Matrix::from_rows(&[]).is_err());
}

#[test]
fn product_and_shape_errors() {
    let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
    let b = m(&[&[5.0], &[6.0]]);
    let p = DenseBackend.product(&a, &b).unwrap();
    assert_eq!(p.to_rows(), vec![vec![17.0], vec![39.0]]);

    let err = DenseBackend.product(&b, &b).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IncompatibleType);
    let err = DenseBackend.sum(&a, &b).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IncompatibleType);
}

#[test]
fn transpose_swaps_shape() {
    let a = m(&[&[1.0, 2.0, 3.0]]);
    let t = DenseBackend.transpose(&a);
    assert_eq!((t.rows(), t.cols()), (3, 1));
    assert_eq!(t.get(2, 0), Some(3.0));
}

#[test]
fn determinant_with_pivoting() {
    let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
    assert_close(DenseBackend.determinant(&a).unwrap(), -1.0);
    let s = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
    assert_close(DenseBackend.determinant(&s).unwrap(), 0.0);
}

#[test]
fn solve_and_inverse() {
    let a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
    let b = m(&[&[3.0], &[5.0]]);
    let x = DenseBackend.solve(&a, &b).unwrap();
    assert_close(x.get(0, 0).unwrap(), 0.8);
    assert_close(x.get(1, 0).unwrap(), 1.4);

    let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
    let err = DenseBackend.inverse(&singular).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::MatrixError);
}

#[test]
fn negative_power_inverts() {
    let a = m(&[&[2.0, 0.0], &[0.0, 4.0]]);
    let p = DenseBackend.power(&a, -2).unwrap();
    assert_close(p.get(0, 0).unwrap(), 0.25);
    assert_close(p.get(1, 1).unwrap(), 1.0 / 16.0);
    let id = DenseBackend.power(&a, 0).unwrap();
    assert_eq!(id.to_rows(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn symmetric_eigenvalues() {
    let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
    let ev = DenseBackend.eigenvalues(&a).unwrap();
    assert_close(ev[0], 1.0);
    assert_close(ev[1], 3.0);

    let skew = m(&[&[1.0, 2.0], &[0.0, 1.0]]);
    let err = DenseBackend.eigenvalues(&skew).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::MatrixError);
}

#[test]
fn symmetric_eigenvectors() {
    let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
    let values = DenseBackend.eigenvalues(&a).unwrap();
    let vectors = DenseBackend.eigenvectors(&a).unwrap();
    for (col, &lambda) in values.iter().enumerate() {
        let v = [vectors.get(0, col).unwrap(), vectors.get(1, col).unwrap()];
        assert_close(v[0] * v[0] + v[1] * v[1], 1.0);
        for row in 0..2 {
            let av = a.get(row, 0).unwrap() * v[0] + a.get(row, 1).unwrap() * v[1];
            assert_close(av, lambda * v[row]);
        }
    }
    // Eigenvalue 1 belongs to (1, -1), eigenvalue 3 to (1, 1).
    assert_close(vectors.get(0, 0).unwrap(), -vectors.get(1, 0).unwrap());
    assert_close(vectors.get(0, 1).unwrap(), vectors.get(1, 1).unwrap());

    let diagonal = m(&[&[5.0, 0.0], &[0.0, -1.0]]);
    let vectors = DenseBackend.eigenvectors(&diagonal).unwrap();
    assert_eq!(vectors.to_rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);

    let skew = m(&[&[1.0, 2.0], &[0.0, 1.0]]);
    let err = DenseBackend.eigenvectors(&skew).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::MatrixError);
}

#[test]
fn clones_share_until_scaled() {
    let a = m(&[&[1.0]]);
    let b = a.clone();
    let c = DenseBackend.scale(&b, 2.0);
    assert_eq!(a.get(0, 0), Some(1.0));
    assert_eq!(c.get(0, 0), Some(2.0));
    assert_eq!(a.total_cmp(&b), Ordering::Equal);
    assert_eq!(a.total_cmp(&c), Ordering::Less);
}
