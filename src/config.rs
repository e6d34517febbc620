use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::axis::{Axis, Constraint};
use crate::error::Error;
use crate::mesh::MeshEngine;
use crate::ramp::{ChannelBinding, ChannelId};
use crate::registry::{FunctionSource, Parameters};




#[derive(Clone, Debug, Deserialize)]
pub struct AxisConfig {
    pub label: String,
    pub range: (f64, f64),
    pub points: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AxesConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
}

/// The `function` entry names the mapping function; every other entry is a
/// numeric parameter forwarded to it.
#[derive(Clone, Debug, Deserialize)]
pub struct ParametersConfig {
    pub function: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MeshConfig {
    pub parameters: ParametersConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndependentVariable {
    pub limits: (f64, f64),
    pub channel: ChannelId,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConstraintConfig {
    pub expr: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PointConfig {
    pub x: f64,
    pub y: f64,
}




/**
 * A sweep plan configuration, as read from YAML. Maps are ordered by key so
 * that constraint and channel order does not depend on the file layout.
 */
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepConfig {
    pub axis: AxesConfig,
    pub mesh: MeshConfig,
    #[serde(default)]
    pub independent_variables: BTreeMap<String, IndependentVariable>,
    #[serde(default)]
    pub mesh_constraints: BTreeMap<String, ConstraintConfig>,
    #[serde(default)]
    pub balance_point: Option<PointConfig>,
}




// ============================================================================
impl SweepConfig {

    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::from_yaml(&fs::read_to_string(path).map_err(Error::io(path))?)
    }

    pub fn x_axis(&self) -> Result<Axis, Error> {
        let x = &self.axis.x;
        Axis::new(&x.label, x.range, x.points)
    }

    pub fn y_axis(&self) -> Result<Axis, Error> {
        let y = &self.axis.y;
        Axis::new(&y.label, y.range, y.points)
    }

    pub fn function_source(&self) -> FunctionSource {
        FunctionSource::Named(self.mesh.parameters.function.clone())
    }

    pub fn parameters(&self) -> Parameters {
        Parameters::from(self.mesh.parameters.values.clone())
    }

    /**
     * Return the constraints of the sweep: one per independent variable,
     * confining it to its channel limits, followed by the mesh constraints.
     */
    pub fn constraints(&self) -> Vec<Constraint> {
        let implicit = self
            .independent_variables
            .iter()
            .map(|(name, v)| Constraint::new(name, v.limits));

        let explicit = self
            .mesh_constraints
            .iter()
            .map(|(name, c)| Constraint::new(&c.expr, (c.min, c.max)).named(name));

        implicit.chain(explicit).collect()
    }

    pub fn channel_bindings(&self) -> Vec<ChannelBinding> {
        self.independent_variables
            .iter()
            .map(|(name, v)| ChannelBinding::new(name, v.channel, v.limits))
            .collect()
    }

    /**
     * Build a mesh engine for this configuration, resolving the mapping
     * function by name.
     */
    pub fn engine(&self) -> Result<MeshEngine, Error> {
        let engine = MeshEngine::new(self.x_axis()?, self.y_axis()?, &self.function_source(), self.parameters())?;
        Ok(engine.with_constraints(self.constraints()))
    }
}
