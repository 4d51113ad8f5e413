use numkit::tensors::matrix::Matrix;

fn main() {
    let system = [[2., 1., -1.], [-3., -1., 2.], [-2., 1., 2.]];
    let rhs = [8., -11., -3.];

    println!("Solve linear system in x\u{20D7}:");
    for (r, v) in system.iter().zip(&rhs) {
        println!(
            "\t ({}).x\u{20D7} = {}",
            r.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(","),
            v
        );
    }

    let m = Matrix::from_nested_vec(system.iter().map(|r| r.to_vec()).collect()).unwrap();

    match m.det() {
        Ok(d) => println!("det = {}", d),
        Err(e) => panic!("Could not compute the determinant: {}", e),
    }

    match m.solve_vec(&rhs) {
        Ok(sol) => println!(
            "x\u{20D7} = {{{}}}",
            sol.iter()
                .map(|x| format!("{:.6}", x))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Err(e) => panic!("Could not solve {:?}", e),
    }

    match m.inv() {
        Ok(inv) => println!("inverse = {}", inv),
        Err(e) => panic!("Could not invert {:?}", e),
    }
}
