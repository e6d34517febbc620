use std::collections::HashMap;
use log::warn;
use serde::{Deserialize, Serialize};
use crate::axis::ordered_limits;
use crate::error::Error;
use crate::grid::Mask;
use crate::mesh::Mesh;




/// Identifier of a hardware output channel.
pub type ChannelId = u32;




/**
 * Binds a mesh quantity (an independent variable) to the hardware channel
 * that outputs it, with the limits that channel may be driven within.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelBinding {
    pub label: String,
    pub channel: ChannelId,
    pub limits: (f64, f64),
}




// ============================================================================
impl ChannelBinding {

    pub fn new(label: &str, channel: ChannelId, limits: (f64, f64)) -> Self {
        Self {
            label: label.to_string(),
            channel,
            limits: ordered_limits(limits),
        }
    }

    /**
     * Determine whether a value lies within this channel's limits.
     */
    pub fn admits(&self, value: f64) -> bool {
        value >= self.limits.0 && value <= self.limits.1
    }
}




/**
 * The endpoints of one contiguous hardware ramp along a mesh row. The
 * `start` and `stop` vectors are parallel to `channels`.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowRampParams {
    pub row: usize,
    pub channels: Vec<ChannelId>,
    pub start: Vec<f64>,
    pub stop: Vec<f64>,
    pub point_count: usize,
    pub first_column: usize,
    pub last_column: usize,
}




/**
 * The plan for one mesh row: a ramp, or nothing at all when the mask admits
 * no point in the row.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RowPlan {
    Ramp(RowRampParams),
    Empty { row: usize },
}




// ============================================================================
impl RowPlan {

    pub fn ramp(&self) -> Option<&RowRampParams> {
        match self {
            RowPlan::Ramp(params) => Some(params),
            RowPlan::Empty { .. } => None,
        }
    }
}




/**
 * Plan the ramp for one row. The ramp spans from the first to the last
 * admitted column, including any rejected columns in between, since the
 * hardware sweeps the span end to end; `point_count` is the number of
 * columns in that span.
 */
pub fn plan_row(row: usize, mesh: &Mesh, mask: &Mask, bindings: &[ChannelBinding]) -> Result<RowPlan, Error> {
    if row >= mask.rows() {
        return Err(Error::RowOutOfRange { row, rows: mask.rows() });
    }

    let admitted = mask.row(row);
    let first = admitted.iter().position(|&b| b);
    let last = admitted.iter().rposition(|&b| b);

    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(RowPlan::Empty { row }),
    };

    let mut channels = Vec::with_capacity(bindings.len());
    let mut start = Vec::with_capacity(bindings.len());
    let mut stop = Vec::with_capacity(bindings.len());

    for binding in bindings {
        let grid = mesh
            .get(&binding.label)
            .ok_or_else(|| Error::UnknownLabel(binding.label.clone()))?;

        if grid.shape() != mask.shape() {
            return Err(Error::ShapeMismatch {
                label: binding.label.clone(),
                expected: mask.shape(),
                found: grid.shape(),
            });
        }
        channels.push(binding.channel);
        start.push(grid[(row, first)]);
        stop.push(grid[(row, last)]);
    }

    Ok(RowPlan::Ramp(RowRampParams {
        row,
        channels,
        start,
        stop,
        point_count: last - first + 1,
        first_column: first,
        last_column: last,
    }))
}




/// Binary encodings the row plans can be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFormat {
    Cbor,
    Msgpack,
}




/**
 * Encode a sequence of row plans. MessagePack output keeps field names, so
 * either encoding decodes back into `RowPlan` values.
 */
pub fn encode_plans(plans: &[RowPlan], format: PlanFormat) -> Result<Vec<u8>, Error> {
    match format {
        PlanFormat::Cbor => {
            let mut bytes = Vec::new();
            ciborium::ser::into_writer(&plans, &mut bytes).map_err(|e| Error::Encode(e.to_string()))?;
            Ok(bytes)
        }
        PlanFormat::Msgpack => rmp_serde::encode::to_vec_named(&plans).map_err(|e| Error::Encode(e.to_string())),
    }
}




/**
 * Plans the ramps of every row of a filtered mesh. Nothing is cached: each
 * row is planned when asked for, and `rows` can be called any number of
 * times.
 */
#[derive(Clone, Copy)]
pub struct RampPlanner<'a> {
    mesh: &'a Mesh,
    mask: &'a Mask,
    bindings: &'a [ChannelBinding],
}




// ============================================================================
impl<'a> RampPlanner<'a> {

    pub fn new(mesh: &'a Mesh, mask: &'a Mask, bindings: &'a [ChannelBinding]) -> Self {
        Self { mesh, mask, bindings }
    }

    pub fn len(&self) -> usize {
        self.mask.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, row: usize) -> Result<RowPlan, Error> {
        plan_row(row, self.mesh, self.mask, self.bindings)
    }

    pub fn rows(&self) -> Rows<'a> {
        Rows { planner: *self, next: 0 }
    }
}




/**
 * Iterator over the row plans of a `RampPlanner`, in row order.
 */
#[derive(Clone)]
pub struct Rows<'a> {
    planner: RampPlanner<'a>,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Result<RowPlan, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.planner.len() {
            self.next += 1;
            Some(self.planner.row(self.next - 1))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.planner.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Rows<'a> {}




/**
 * Return the `(channel, value)` pairs to write for the requested values,
 * keeping only those within their channel's limits. Out-of-limit or missing
 * values are logged and dropped.
 */
pub fn setpoints(bindings: &[ChannelBinding], values: &HashMap<String, f64>) -> Vec<(ChannelId, f64)> {
    bindings
        .iter()
        .filter_map(|binding| match values.get(&binding.label) {
            Some(&v) if binding.admits(v) => Some((binding.channel, v)),
            Some(&v) => {
                warn!("{} = {} is outside limits {:?} of channel {}", binding.label, v, binding.limits, binding.channel);
                None
            }
            None => {
                warn!("no value for {} (channel {})", binding.label, binding.channel);
                None
            }
        })
        .collect()
}




// ============================================================================
#[cfg(test)]
mod test {

    use std::collections::HashMap;
    use super::*;
    use crate::axis::Axis;
    use crate::grid::Grid;
    use crate::mesh::generate;
    use crate::registry::{DerivedGrids, Parameters};

    fn voltage(x: &Grid<f64>, y: &Grid<f64>, _: &Parameters) -> DerivedGrids {
        let mut out = DerivedGrids::new();
        out.insert("V".to_string(), x.zip_with(y, |a, b| a + 10.0 * b).unwrap());
        out
    }

    fn mesh() -> Mesh {
        let x = Axis::new("x", (0.0, 4.0), 5).unwrap();
        let y = Axis::new("y", (0.0, 2.0), 3).unwrap();
        generate(&x, &y, &voltage, &Parameters::new()).unwrap()
    }

    fn mask(rows: &[&[bool]]) -> Mask {
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Grid::from_vec((rows.len(), rows[0].len()), data).unwrap()
    }

    fn bindings() -> Vec<ChannelBinding> {
        vec![ChannelBinding::new("V", 3, (-50.0, 50.0)), ChannelBinding::new("x", 1, (0.0, 4.0))]
    }

    #[test]
    fn single_admitted_column_gives_one_point() {
        let mesh = mesh();
        let mask = mask(&[
            &[false, false, true, false, false],
            &[false; 5],
            &[false; 5],
        ]);
        let plan = plan_row(0, &mesh, &mask, &bindings()).unwrap();
        let ramp = plan.ramp().unwrap();
        assert_eq!(ramp.point_count, 1);
        assert_eq!(ramp.start, ramp.stop);
        assert_eq!(ramp.channels, vec![3, 1]);
        assert_eq!(ramp.start, vec![2.0, 2.0]);
    }

    #[test]
    fn ramp_spans_interior_gaps() {
        let mesh = mesh();
        let mask = mask(&[
            &[false; 5],
            &[false, true, false, true, false],
            &[false; 5],
        ]);
        let ramp = plan_row(1, &mesh, &mask, &bindings()).unwrap().ramp().cloned().unwrap();
        assert_eq!((ramp.first_column, ramp.last_column), (1, 3));
        assert_eq!(ramp.point_count, 3);
        assert_eq!(ramp.start, vec![11.0, 1.0]);
        assert_eq!(ramp.stop, vec![13.0, 3.0]);
    }

    #[test]
    fn row_without_admitted_points_is_empty() {
        let mesh = mesh();
        let mask = mesh.full_mask().map(|_| false);
        assert_eq!(plan_row(2, &mesh, &mask, &bindings()).unwrap(), RowPlan::Empty { row: 2 });
    }

    #[test]
    fn out_of_range_rows_and_unknown_labels_are_errors() {
        let mesh = mesh();
        let mask = mesh.full_mask();
        assert!(matches!(plan_row(3, &mesh, &mask, &bindings()), Err(Error::RowOutOfRange { row: 3, rows: 3 })));
        let bad = vec![ChannelBinding::new("W", 0, (0.0, 1.0))];
        assert!(matches!(plan_row(0, &mesh, &mask, &bad), Err(Error::UnknownLabel(_))));
    }

    #[test]
    fn planner_rows_are_restartable() {
        let mesh = mesh();
        let mask = mesh.full_mask();
        let bindings = bindings();
        let planner = RampPlanner::new(&mesh, &mask, &bindings);
        let rows = planner.rows();
        assert_eq!(rows.len(), 3);

        let first: Vec<_> = rows.clone().map(Result::unwrap).collect();
        let again: Vec<_> = planner.rows().map(Result::unwrap).collect();
        assert_eq!(first, again);
        assert_eq!(first[2].ramp().unwrap().start, vec![20.0, 0.0]);
        assert_eq!(planner.row(1).unwrap(), first[1]);
    }

    #[test]
    fn encoded_plans_decode_in_both_formats() {
        let mesh = mesh();
        let mask = mask(&[
            &[false, true, false, true, false],
            &[false; 5],
            &[true; 5],
        ]);
        let bindings = bindings();
        let plans: Vec<_> = RampPlanner::new(&mesh, &mask, &bindings).rows().map(Result::unwrap).collect();

        let cbor = encode_plans(&plans, PlanFormat::Cbor).unwrap();
        let from_cbor: Vec<RowPlan> = ciborium::de::from_reader(&cbor[..]).unwrap();
        assert_eq!(from_cbor, plans);

        let msgpack = encode_plans(&plans, PlanFormat::Msgpack).unwrap();
        let from_msgpack: Vec<RowPlan> = rmp_serde::from_read_ref(&msgpack).unwrap();
        assert_eq!(from_msgpack, plans);

        assert_eq!(from_cbor[0].ramp().unwrap().point_count, 3);
        assert_eq!(from_msgpack[1], RowPlan::Empty { row: 1 });
        assert_eq!(from_msgpack[2].ramp().unwrap().point_count, 5);
    }

    #[test]
    fn nan_channel_limit_admits_nothing() {
        let binding = ChannelBinding::new("Vtop", 0, (f64::NAN, 5.0));
        assert!(!binding.admits(0.0));
        assert!(!binding.admits(5.0));
    }

    #[test]
    fn setpoints_drop_values_outside_limits() {
        let bindings = vec![
            ChannelBinding::new("Vtop", 0, (5.0, -5.0)),
            ChannelBinding::new("Vbot", 1, (-5.0, 5.0)),
            ChannelBinding::new("Vmlg", 2, (-5.0, 5.0)),
        ];
        let mut values = HashMap::new();
        values.insert("Vtop".to_string(), -4.5);
        values.insert("Vbot".to_string(), 7.0);
        assert_eq!(setpoints(&bindings, &values), vec![(0, -4.5)]);
    }
}
