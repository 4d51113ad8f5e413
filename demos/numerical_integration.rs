use std::f64::consts::PI;

use numkit::numerical_integration::{midpoint, rectangle, romberg, trapezoid, RombergSettings};

fn main() {
    // Integrate sin(x) over [0, pi], which is exactly 2
    let f = |x: &f64| x.sin();

    for n in [4, 16, 64] {
        println!(
            "n = {:3}: rectangle {:.10}, midpoint {:.10}, trapezoid {:.10}",
            n,
            rectangle(f, 0., PI, n).unwrap(),
            midpoint(f, 0., PI, n).unwrap(),
            trapezoid(f, 0., PI, n).unwrap()
        );
    }

    match romberg(f, 0., PI, &RombergSettings::default()) {
        Ok(r) => println!("Romberg after {} iterations: {}", r.iterations, r),
        Err(e) => println!("{}", e),
    }
}
