use approx::assert_abs_diff_eq;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use numkit::{
    domains::float::Complex,
    tensors::matrix::{Matrix, MatrixError},
};

fn random_matrix(rng: &mut Xoshiro256StarStar, n: u32) -> Matrix<f64> {
    let data = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Matrix::from_linear(data, n, n).unwrap()
}

#[test]
fn solve_random_systems() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);

    for n in 1..8 {
        let m = random_matrix(&mut rng, n);
        let b: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();

        let x = m.solve_vec(&b).unwrap();
        let mx = &m * &Matrix::new_vec(x);

        for (r, e) in mx.data().iter().zip(&b) {
            assert_abs_diff_eq!(*r, *e, epsilon = 1e-8);
        }
    }
}

#[test]
fn inverse_random_matrices() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(7);

    for n in 1..8 {
        let m = random_matrix(&mut rng, n);
        let inv = m.inv().unwrap();

        let left = &inv * &m;
        let right = &m * &inv;
        let id = Matrix::<f64>::identity(n);

        for ((l, r), e) in left.data().iter().zip(right.data()).zip(id.data()) {
            assert_abs_diff_eq!(*l, *e, epsilon = 1e-8);
            assert_abs_diff_eq!(*r, *e, epsilon = 1e-8);
        }
    }
}

#[test]
fn determinant_properties() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);

    for n in 2..6 {
        let a = random_matrix(&mut rng, n);
        let b = random_matrix(&mut rng, n);

        // multiplicative
        let det_ab = (&a * &b).det().unwrap();
        let expected = a.det().unwrap() * b.det().unwrap();
        assert_abs_diff_eq!(det_ab, expected, epsilon = 1e-10);

        // invariant under transposition
        assert_abs_diff_eq!(a.transpose().det().unwrap(), a.det().unwrap(), epsilon = 1e-10);

        // a row swap flips the sign
        let mut swapped = a.clone();
        swapped.swap_rows(0, 1, 0);
        assert_abs_diff_eq!(swapped.det().unwrap(), -a.det().unwrap(), epsilon = 1e-10);

        // the input is left untouched
        let copy = a.clone();
        let _ = a.det();
        assert_eq!(a, copy);
    }
}

#[test]
fn echelon_form_in_place() {
    let mut m = Matrix::from_nested_vec(vec![
        vec![1., 2., 3.],
        vec![4., 5., 6.],
        vec![7., 8., 10.],
    ])
    .unwrap();

    let record = m.echelon_form();
    assert!(record.swaps >= 1);

    for i in 0..3 {
        for j in 0..i {
            assert_eq!(m[(i, j)], 0.);
        }
    }

    // pivoting keeps every multiplier at most one in magnitude
    assert_eq!(m[(0, 0)], 7.);
}

#[test]
fn singular_systems() {
    let m = Matrix::from_nested_vec(vec![
        vec![1., 2., 3.],
        vec![2., 4., 6.],
        vec![1., 0., 1.],
    ])
    .unwrap();

    assert_eq!(m.det().unwrap(), 0.);
    assert!(matches!(m.inv(), Err(MatrixError::Singular { .. })));
    assert!(matches!(
        m.solve_vec(&[1., 2., 3.]),
        Err(MatrixError::Singular { .. })
    ));
}

#[test]
fn complex_inverse() {
    let i = Complex::new(0., 1.);
    let one = Complex::new(1., 0.);
    let m = Matrix::from_nested_vec(vec![vec![one, i], vec![-i, Complex::new(2., 0.)]]).unwrap();

    let inv = m.inv().unwrap();
    let id = &m * &inv;

    for r in 0..2 {
        for c in 0..2 {
            let e = if r == c { 1. } else { 0. };
            assert_abs_diff_eq!(id[(r, c)].re, e, epsilon = 1e-12);
            assert_abs_diff_eq!(id[(r, c)].im, 0., epsilon = 1e-12);
        }
    }
}

#[test]
fn serialize_matrix() {
    let m = Matrix::from_nested_vec(vec![vec![1., 2.], vec![3., 4.]]).unwrap();
    let s = serde_json::to_string(&m).unwrap();
    let back: Matrix<f64> = serde_json::from_str(&s).unwrap();
    assert_eq!(back, m);
}
