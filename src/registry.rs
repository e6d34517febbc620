use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use crate::error::Error;
use crate::grid::Grid;




/// Derived quantity grids returned by a mapping function, keyed by label.
pub type DerivedGrids = BTreeMap<String, Grid<f64>>;




/**
 * Named numeric parameters forwarded to a mapping function.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<String, f64>,
}




// ============================================================================
impl Parameters {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }
}

impl From<BTreeMap<String, f64>> for Parameters {
    fn from(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }
}




/// A trait for the physics model of a sweep: a map from the two coordinate
/// grids to a set of derived quantity grids of the same shape.
///
pub trait MappingFunction: Send + Sync {
    fn map(&self, x: &Grid<f64>, y: &Grid<f64>, params: &Parameters) -> DerivedGrids;
}

impl<F> MappingFunction for F
where
    F: Fn(&Grid<f64>, &Grid<f64>, &Parameters) -> DerivedGrids + Send + Sync
{
    fn map(&self, x: &Grid<f64>, y: &Grid<f64>, params: &Parameters) -> DerivedGrids {
        self(x, y, params)
    }
}




/**
 * Where to get a mapping function from: by name out of the static registry,
 * or directly from the caller.
 */
#[derive(Clone)]
pub enum FunctionSource {
    Named(String),
    Callable(Arc<dyn MappingFunction>),
}

impl fmt::Debug for FunctionSource {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            FunctionSource::Named(name) => write!(fmt, "Named({:?})", name),
            FunctionSource::Callable(_) => write!(fmt, "Callable(..)"),
        }
    }
}




type NamedFunction = fn(&Grid<f64>, &Grid<f64>, &Parameters) -> DerivedGrids;

static REGISTRY: [(&str, NamedFunction); 1] = [
    ("vblg_fixed", vblg_fixed),
];




/**
 * Return the names of the functions in the registry.
 */
pub fn registered_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}




/**
 * Resolve a function source to a callable. Names are looked up in the
 * registry, with an optional leading `mfunc_` ignored; an unknown name is an
 * error.
 */
pub fn resolve_mapping_function(source: &FunctionSource) -> Result<Arc<dyn MappingFunction>, Error> {
    match source {
        FunctionSource::Callable(f) => Ok(f.clone()),
        FunctionSource::Named(name) => {
            let key = name.strip_prefix("mfunc_").unwrap_or(name);
            REGISTRY
                .iter()
                .find(|(k, _)| *k == key)
                .map(|&(_, f)| Arc::new(f) as Arc<dyn MappingFunction>)
                .ok_or_else(|| Error::FunctionNotFound(name.clone()))
        }
    }
}




/**
 * Evaluate a mapping function at a single point, e.g. to find the channel
 * values at a bridge balance point.
 */
pub fn evaluate_at(function: &dyn MappingFunction, x: f64, y: f64, params: &Parameters) -> HashMap<String, f64> {
    let x = Grid::filled((1, 1), x);
    let y = Grid::filled((1, 1), y);

    function
        .map(&x, &y, params)
        .into_iter()
        .filter_map(|(label, grid)| grid.get((0, 0)).map(|&v| (label, v)))
        .collect()
}




/**
 * Gate voltages that tune a bilayer into the polarization `pblg` (x grid)
 * and density `nblg` (y grid), with the bilayer itself held at `vblg`. The
 * parameters `delta1` and `delta2` are the top/interlayer and
 * interlayer/bottom dielectric thickness imbalances, and `n0mlg` offsets the
 * monolayer density.
 */
pub fn vblg_fixed(pblg: &Grid<f64>, nblg: &Grid<f64>, params: &Parameters) -> DerivedGrids {
    let n0mlg = params.get_or("n0mlg", 0.0);
    let delta1 = params.get_or("delta1", 0.0);
    let delta2 = params.get_or("delta2", 0.0);
    let vblg = params.get_or("vblg", 0.0);

    let shape = pblg.shape();
    let p = pblg.as_slice();
    let n = nblg.as_slice();
    let at = |i: usize, j: usize| {
        let k = i * shape.1 + j;
        (p[k], n[k])
    };

    let vtop = Grid::from_function(shape, |i, j| {
        let (p, n) = at(i, j);
        vblg - (n + p) / (1.0 + delta1) / (1.0 + delta2) - n0mlg / (1.0 + delta1)
    });
    let vmlg = Grid::from_function(shape, |i, j| {
        let (p, n) = at(i, j);
        vblg - 0.5 * (n + p) / (1.0 + delta2)
    });
    let vbot = Grid::from_function(shape, |i, j| {
        let (p, n) = at(i, j);
        vblg - 0.5 * (n - p) / (1.0 - delta2)
    });

    let mut derived = DerivedGrids::new();
    derived.insert("Vtop".to_string(), vtop);
    derived.insert("Vmlg".to_string(), vmlg);
    derived.insert("Vbot".to_string(), vbot);
    derived
}
