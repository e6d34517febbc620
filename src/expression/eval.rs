use std::collections::{BTreeMap, HashMap};
use crate::grid::Grid;
use super::error::Error;
use super::lexer::Token;




/**
 * The result of evaluating an expression, or the value bound to a variable:
 * either a scalar, or a grid of values operated on elementwise.
 */
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Grid(Grid<f64>),
}




// ============================================================================
impl Value {

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Grid(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid<f64>> {
        match self {
            Value::Scalar(_) => None,
            Value::Grid(g) => Some(g),
        }
    }

    /**
     * Apply a binary function, broadcasting a scalar against a grid. Two
     * grids must have the same shape.
     */
    pub fn combine(self, other: Value, f: fn(f64, f64) -> f64) -> Result<Value, Error> {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(a, b))),
            (Value::Scalar(a), Value::Grid(b)) => Ok(Value::Grid(b.map(|&b| f(a, b)))),
            (Value::Grid(a), Value::Scalar(b)) => Ok(Value::Grid(a.map(|&a| f(a, b)))),
            (Value::Grid(a), Value::Grid(b)) => Ok(Value::Grid(a.zip_with(&b, |&a, &b| f(a, b))?)),
        }
    }
}




/// A trait for a container that can bind variable names to values at
/// evaluation time.
///
pub trait Variables {
    /// Return the value bound to the given name, if there is one.
    ///
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl Variables for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).map(|&x| Value::Scalar(x))
    }
}

impl Variables for HashMap<String, Grid<f64>> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).map(|g| Value::Grid(g.clone()))
    }
}

impl Variables for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Variables for BTreeMap<String, Grid<f64>> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).map(|g| Value::Grid(g.clone()))
    }
}




/**
 * Evaluate a postfix token sequence against a set of variables. Identifiers
 * are resolved here rather than at parse time, so one parsed sequence can be
 * evaluated against many bindings.
 *
 * Arithmetic follows IEEE-754 throughout: division by zero gives an infinity
 * and invalid operations give NaN, on the scalar and grid paths alike.
 */
pub fn evaluate<V>(postfix: &[Token], variables: &V) -> Result<Value, Error>
where
    V: Variables + ?Sized
{
    let mut stack: Vec<Value> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(x) => stack.push(Value::Scalar(*x)),
            Token::Identifier(name) => {
                let value = variables
                    .lookup(name)
                    .ok_or_else(|| Error::UndefinedVariable(name.clone()))?;
                stack.push(value)
            }
            Token::Operator(op) => {
                let apply = op.operator().apply.ok_or(Error::StackUnderflow)?;
                let b = stack.pop().ok_or(Error::StackUnderflow)?;
                let a = stack.pop().ok_or(Error::StackUnderflow)?;
                stack.push(a.combine(b, apply)?)
            }
        }
    }
    match stack.len() {
        0 => Err(Error::StackUnderflow),
        1 => stack.pop().ok_or(Error::StackUnderflow),
        n => Err(Error::UnusedOperands(n)),
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use std::collections::HashMap;
    use super::{evaluate, Value};
    use crate::expression::error::{Error, ErrorKind};
    use crate::expression::lexer::Token;
    use crate::expression::operator::Symbol;
    use crate::grid::Grid;

    fn row(values: &[f64]) -> Grid<f64> {
        Grid::from_vec((1, values.len()), values.to_vec()).unwrap()
    }

    #[test]
    fn scalars_broadcast_against_grids() {
        let postfix = vec![
            Token::Identifier("a".to_string()),
            Token::Number(2.0),
            Token::Operator(Symbol::Mul),
        ];
        let mut variables = HashMap::new();
        variables.insert("a".to_string(), Value::Grid(row(&[1.0, 2.0])));
        assert_eq!(evaluate(&postfix, &variables).unwrap(), Value::Grid(row(&[2.0, 4.0])));
    }

    #[test]
    fn mismatched_grid_shapes_are_evaluation_errors() {
        let postfix = vec![
            Token::Identifier("a".to_string()),
            Token::Identifier("b".to_string()),
            Token::Operator(Symbol::Add),
        ];
        let mut variables = HashMap::new();
        variables.insert("a".to_string(), row(&[1.0, 2.0]));
        variables.insert("b".to_string(), row(&[1.0, 2.0, 3.0]));
        assert_eq!(evaluate(&postfix, &variables).unwrap_err(), Error::ShapeMismatch((1, 2), (1, 3)));
    }

    #[test]
    fn short_postfix_sequence_underflows() {
        let postfix = vec![Token::Number(1.0), Token::Operator(Symbol::Add)];
        let variables: HashMap<String, f64> = HashMap::new();
        assert_eq!(evaluate(&postfix, &variables).unwrap_err(), Error::StackUnderflow);
        assert_eq!(evaluate(&[], &variables).unwrap_err(), Error::StackUnderflow);
    }

    #[test]
    fn leftover_operands_are_an_error() {
        let postfix = vec![Token::Number(1.0), Token::Number(2.0)];
        let variables: HashMap<String, f64> = HashMap::new();
        let error = evaluate(&postfix, &variables).unwrap_err();
        assert_eq!(error, Error::UnusedOperands(2));
        assert_eq!(error.kind(), ErrorKind::StackUnderflow);
    }

    #[test]
    fn division_by_zero_propagates_infinity() {
        let postfix = vec![Token::Number(1.0), Token::Number(0.0), Token::Operator(Symbol::Div)];
        let variables: HashMap<String, f64> = HashMap::new();
        assert_eq!(evaluate(&postfix, &variables).unwrap(), Value::Scalar(f64::INFINITY));
    }
}
