#![feature(test)]
extern crate test;

use meshplan::axis::{Axis, Constraint};
use meshplan::expression::Expression;
use meshplan::mesh::{filter, generate};
use meshplan::registry::{vblg_fixed, Parameters};

const NX: usize = 400;
const NY: usize = 400;




// ============================================================================
#[bench]
fn parse_constraint_formula(b: &mut test::Bencher) {
    b.iter(|| Expression::parse("(Vtop - Vbot) / 2 + Vmlg ^ 2").unwrap());
}




// ============================================================================
#[bench]
fn filter_mesh_with_direct_and_formula_constraints(b: &mut test::Bencher) {
    let x = Axis::new("pblg", (-1.0, 1.0), NX).unwrap();
    let y = Axis::new("nblg", (-2.0, 2.0), NY).unwrap();
    let mesh = generate(&x, &y, &vblg_fixed, &Parameters::new()).unwrap();
    let constraints = vec![
        Constraint::new("Vtop", (-2.0, 2.0)),
        Constraint::new("Vbot", (-1.5, 1.5)),
        Constraint::new("Vtop - Vbot", (-2.5, 2.5)),
    ];

    b.iter(|| {
        let filtered = filter(&mesh, &constraints);
        assert!(filtered.skipped.is_empty());
    });
}
