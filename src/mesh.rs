use std::collections::BTreeMap;
use std::error;
use std::fmt;
use std::sync::Arc;
use log::{debug, info, warn};
use rayon::prelude::*;
use crate::axis::{Axis, Constraint};
use crate::error::Error;
use crate::expression::{self, Expression, Value, Variables};
use crate::grid::{Grid, Mask, Shape};
use crate::registry::{resolve_mapping_function, FunctionSource, MappingFunction, Parameters};




/**
 * The sampled sweep: the two coordinate grids and every derived quantity
 * grid, keyed by label and all of one shape (y points by x points). A mesh
 * never changes once generated.
 */
#[derive(Clone, Debug)]
pub struct Mesh {
    x_axis: Axis,
    y_axis: Axis,
    grids: BTreeMap<String, Grid<f64>>,
}




// ============================================================================
impl Mesh {

    pub fn shape(&self) -> Shape {
        (self.y_axis.points(), self.x_axis.points())
    }

    pub fn get(&self, label: &str) -> Option<&Grid<f64>> {
        self.grids.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.grids.keys().map(String::as_str)
    }

    /**
     * Return the mask admitting every point of this mesh.
     */
    pub fn full_mask(&self) -> Mask {
        Grid::filled(self.shape(), true)
    }
}

impl Variables for Mesh {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.grids.get(name).map(|g| Value::Grid(g.clone()))
    }
}




/**
 * Sample the two axes, broadcast them into coordinate grids, and merge in
 * the quantities computed from them by the mapping function. A derived grid
 * whose shape differs from the coordinate grids is an error, as are two axes
 * with the same label. Derived labels may shadow the coordinate labels.
 */
pub fn generate(
    x_axis: &Axis,
    y_axis: &Axis,
    function: &dyn MappingFunction,
    params: &Parameters) -> Result<Mesh, Error>
{
    if x_axis.label() == y_axis.label() {
        return Err(Error::InvalidAxis { label: y_axis.label().to_string(), reason: "x and y axes share a label" });
    }
    let (x, y) = Grid::meshgrid(&x_axis.samples(), &y_axis.samples());
    let shape = x.shape();
    let derived = function.map(&x, &y, params);

    let mut grids = BTreeMap::new();
    grids.insert(x_axis.label().to_string(), x);
    grids.insert(y_axis.label().to_string(), y);

    for (label, grid) in derived {
        if grid.shape() != shape {
            return Err(Error::ShapeMismatch { label, expected: shape, found: grid.shape() });
        }
        grids.insert(label, grid);
    }

    debug!("generated {}x{} mesh with grids [{}]",
        shape.0,
        shape.1,
        grids.keys().cloned().collect::<Vec<_>>().join(", "));

    Ok(Mesh {
        x_axis: x_axis.clone(),
        y_axis: y_axis.clone(),
        grids,
    })
}




/**
 * How a constraint's quantity is obtained from a mesh: directly as one of
 * its grids, or by evaluating a formula over them.
 */
#[derive(Debug)]
pub enum ConstraintTarget<'a> {
    Direct(&'a Grid<f64>),
    Expression(Expression),
}




/**
 * Resolve a constraint against a mesh. An exact label match wins; anything
 * else is parsed as a formula.
 */
pub fn resolve_constraint<'a>(mesh: &'a Mesh, constraint: &Constraint) -> Result<ConstraintTarget<'a>, expression::Error> {
    match mesh.get(constraint.expression()) {
        Some(grid) => Ok(ConstraintTarget::Direct(grid)),
        None => Ok(ConstraintTarget::Expression(Expression::parse(constraint.expression())?)),
    }
}




/**
 * Return the mask of mesh points satisfying a single constraint.
 */
pub fn constraint_mask(mesh: &Mesh, constraint: &Constraint) -> Result<Mask, expression::Error> {
    let (min, max) = constraint.range();

    match resolve_constraint(mesh, constraint)? {
        ConstraintTarget::Direct(grid) => Ok(grid.within(min, max)),
        ConstraintTarget::Expression(expr) => match expr.evaluate(mesh)? {
            Value::Grid(grid) => Ok(grid.within(min, max)),
            Value::Scalar(v) => Ok(Grid::filled(mesh.shape(), v >= min && v <= max)),
        },
    }
}




#[derive(Clone, Debug, PartialEq)]


/**
 * Error to represent a constraint that could not be applied to a mesh. The
 * constraint is skipped; the rest of the filter still applies.
 */
pub struct ConstraintEvalError {
    pub index: usize,
    pub name: String,
    pub expression: String,
    pub reason: expression::Error,
}

impl fmt::Display for ConstraintEvalError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(fmt, "constraint #{} '{}' ({}) skipped: {}", self.index, self.name, self.expression, self.reason)
    }
}

impl error::Error for ConstraintEvalError {}




/**
 * The outcome of filtering a mesh: the combined mask, and the constraints
 * that had to be skipped.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Filtered {
    pub mask: Mask,
    pub skipped: Vec<ConstraintEvalError>,
}




/**
 * AND together the masks of all constraints, starting from a mask that
 * admits every point. The result depends only on the mesh and the
 * constraints given. Constraints are evaluated in parallel; one that fails to
 * parse or evaluate is logged and left out rather than failing the filter.
 */
pub fn filter(mesh: &Mesh, constraints: &[Constraint]) -> Filtered {
    let masks: Vec<_> = constraints
        .par_iter()
        .map(|c| constraint_mask(mesh, c))
        .collect();

    let mut mask = mesh.full_mask();
    let mut skipped = Vec::new();

    for (index, (constraint, result)) in constraints.iter().zip(masks).enumerate() {
        match result.and_then(|m| mask.and(&m)) {
            Ok(m) => mask = m,
            Err(reason) => {
                let error = ConstraintEvalError {
                    index,
                    name: constraint.name().to_string(),
                    expression: constraint.expression().to_string(),
                    reason,
                };
                warn!("{}", error);
                skipped.push(error);
            }
        }
    }

    info!("{} of {} mesh points admitted by {} constraint(s), {} skipped",
        mask.count(),
        mask.len(),
        constraints.len() - skipped.len(),
        skipped.len());

    Filtered { mask, skipped }
}




/**
 * Where a mesh engine is in its lifecycle.
 */
#[derive(Clone, Debug)]
pub enum EngineState {
    Uninitialized,
    Generated(Arc<Mesh>),
    Filtered(Arc<Mesh>, Arc<Filtered>),
}




/**
 * A mesh-planning session: two axes, a mapping function with its
 * parameters, and a constraint set. The engine moves from `Uninitialized`
 * through `Generated` to `Filtered`. Filtering always starts over from the
 * full mask, so repeating it gives the same mask; constraints only
 * accumulate through `add_constraint`.
 */
pub struct MeshEngine {
    x_axis: Axis,
    y_axis: Axis,
    function: Arc<dyn MappingFunction>,
    params: Parameters,
    constraints: Vec<Constraint>,
    state: EngineState,
}




// ============================================================================
impl MeshEngine {

    pub fn new(x_axis: Axis, y_axis: Axis, source: &FunctionSource, params: Parameters) -> Result<Self, Error> {
        Ok(Self {
            x_axis,
            y_axis,
            function: resolve_mapping_function(source)?,
            params,
            constraints: Vec::new(),
            state: EngineState::Uninitialized,
        })
    }

    pub fn with_constraints<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = Constraint>
    {
        self.constraints.extend(constraints);
        self
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn function(&self) -> &dyn MappingFunction {
        self.function.as_ref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        match &self.state {
            EngineState::Uninitialized => None,
            EngineState::Generated(mesh) | EngineState::Filtered(mesh, _) => Some(mesh),
        }
    }

    /**
     * Generate the mesh. Any previous mesh and mask are discarded.
     */
    pub fn generate(&mut self) -> Result<Arc<Mesh>, Error> {
        let mesh = Arc::new(generate(&self.x_axis, &self.y_axis, self.function.as_ref(), &self.params)?);
        self.state = EngineState::Generated(mesh.clone());
        Ok(mesh)
    }

    /**
     * Filter the generated mesh by the current constraint set.
     */
    pub fn filter(&mut self) -> Result<Arc<Filtered>, Error> {
        let mesh = self.mesh().cloned().ok_or(Error::MeshNotGenerated)?;
        let filtered = Arc::new(filter(&mesh, &self.constraints));
        self.state = EngineState::Filtered(mesh, filtered.clone());
        Ok(filtered)
    }
}
