use numkit::poly::{
    interpolation::Interpolant, regression::LeastSquaresFit, spline::CubicSpline,
};

fn main() {
    let x = [-4., -3., -2., -1., 0., 1., 2., 3., 4.];
    let y: Vec<f64> = x.iter().map(|x: &f64| (-x * x).exp()).collect();

    let p = Interpolant::vandermonde(&x, &y).unwrap();
    println!("Interpolating polynomial of degree {}: {}", p.degree(), p.polynomial());

    let fit = LeastSquaresFit::fit(&x, &y, 4).unwrap();
    println!(
        "Least-squares quartic: {} (residual {:e})",
        fit.polynomial(),
        fit.residual_sum_of_squares()
    );

    let clamped = CubicSpline::clamped(&x, &y).unwrap();
    let naive = CubicSpline::centered_differences(&x, &y).unwrap();

    println!("{:>6} {:>12} {:>12} {:>12} {:>12}", "x", "exp(-x^2)", "polynomial", "spline", "naive");
    for i in 0..16 {
        let t = -4. + i as f64 * 0.5 + 0.25;
        println!(
            "{:>6.2} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            t,
            (-t * t).exp(),
            p.evaluate(&t),
            clamped.evaluate(&t).unwrap(),
            naive.evaluate(&t).unwrap()
        );
    }
}
