use crate::error::Error;




/**
 * One swept dimension: a label naming the coordinate grid, a closed range,
 * and the number of evenly spaced samples taken over it.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    label: String,
    range: (f64, f64),
    points: usize,
}




// ============================================================================
impl Axis {

    pub fn new(label: &str, range: (f64, f64), points: usize) -> Result<Self, Error> {
        if points == 0 {
            return Err(Error::InvalidAxis { label: label.to_string(), reason: "needs at least one point" });
        }
        if !(range.0.is_finite() && range.1.is_finite()) {
            return Err(Error::InvalidAxis { label: label.to_string(), reason: "range must be finite" });
        }
        Ok(Self { label: label.to_string(), range, points })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn points(&self) -> usize {
        self.points
    }

    /**
     * Return the sample coordinates along this axis.
     */
    pub fn samples(&self) -> Vec<f64> {
        linspace(self.range.0, self.range.1, self.points)
    }
}




/**
 * Return `num` evenly spaced samples from `start` to `stop`, both ends
 * included. A single sample sits at `start`.
 */
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|n| if n == num - 1 { stop } else { start + step * n as f64 })
                .collect()
        }
    }
}




/**
 * Put a pair of limits in ascending order. A NaN limit makes the whole
 * interval NaN, so that nothing lies inside it.
 */
pub fn ordered_limits(limits: (f64, f64)) -> (f64, f64) {
    if limits.0.is_nan() || limits.1.is_nan() {
        (f64::NAN, f64::NAN)
    } else if limits.0 <= limits.1 {
        limits
    } else {
        (limits.1, limits.0)
    }
}




/**
 * An admissibility rule: the quantity given by `expression` (a mesh label,
 * or a formula over mesh labels) must lie in the closed interval `range`.
 * The range is stored ordered regardless of the order it was given in.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    name: String,
    expression: String,
    range: (f64, f64),
}




// ============================================================================
impl Constraint {

    pub fn new(expression: &str, limits: (f64, f64)) -> Self {
        Self {
            name: expression.to_string(),
            expression: expression.to_string(),
            range: ordered_limits(limits),
        }
    }

    /**
     * Attach a name used when reporting on this constraint. By default the
     * name is the expression text.
     */
    pub fn named(self, name: &str) -> Self {
        Self { name: name.to_string(), ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}
