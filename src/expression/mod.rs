//! A small arithmetic expression engine for constraint formulas like
//! `"Vtop - Vbot"`. Text is split into tokens, reordered into postfix with
//! the shunting-yard algorithm, and evaluated against variables bound at
//! evaluation time. Values are scalars or grids, combined elementwise.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod operator;
pub mod postfix;

pub use error::{Error, ErrorKind};
pub use eval::{evaluate, Value, Variables};
pub use lexer::{tokenize, Token};
pub use operator::{Associativity, Operator, Symbol};
pub use postfix::to_postfix;




/**
 * A parsed formula. Construction fails on any lex or parse error, so a
 * successfully built expression always evaluates to a single value (or fails
 * only on an unbound name or a grid shape mismatch).
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    source: String,
    postfix: Vec<Token>,
}




// ============================================================================
impl Expression {

    pub fn parse(source: &str) -> Result<Self, Error> {
        let postfix = to_postfix(&tokenize(source)?)?;
        Ok(Self { source: source.to_string(), postfix })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /**
     * Return the distinct variable names the expression refers to, in order
     * of first appearance in the postfix sequence.
     */
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();

        for token in &self.postfix {
            if let Token::Identifier(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name)
                }
            }
        }
        names
    }

    pub fn evaluate<V>(&self, variables: &V) -> Result<Value, Error>
    where
        V: Variables + ?Sized
    {
        evaluate(&self.postfix, variables)
    }
}

impl std::str::FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use std::collections::HashMap;
    use super::{Error, ErrorKind, Expression, Value};
    use crate::grid::Grid;

    fn scalar(text: &str) -> f64 {
        let variables: HashMap<String, f64> = HashMap::new();
        Expression::parse(text).unwrap().evaluate(&variables).unwrap().as_scalar().unwrap()
    }

    fn bind(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn arithmetic_respects_precedence_and_grouping() {
        assert_eq!(scalar("3+4*2"), 11.0);
        assert_eq!(scalar("(3+4)*2"), 14.0);
        assert_eq!(scalar("10/4-0.5"), 2.0);
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(scalar("2^3^2"), 512.0);
        assert_eq!(scalar("(2^3)^2"), 64.0);
    }

    #[test]
    fn variables_are_bound_at_evaluation_time() {
        let expr = Expression::parse("a+b").unwrap();
        assert_eq!(expr.evaluate(&bind(&[("a", 2.0), ("b", 5.0)])).unwrap(), Value::Scalar(7.0));
        assert_eq!(expr.evaluate(&bind(&[("a", -1.0), ("b", 1.0)])).unwrap(), Value::Scalar(0.0));
    }

    #[test]
    fn grid_bindings_evaluate_elementwise() {
        let mut variables = HashMap::new();
        variables.insert("a".to_string(), Grid::from_vec((1, 3), vec![1.0, 2.0, 3.0]).unwrap());
        variables.insert("b".to_string(), Grid::from_vec((1, 3), vec![10.0, 20.0, 30.0]).unwrap());

        let result = Expression::parse("a+b").unwrap().evaluate(&variables).unwrap();
        assert_eq!(result.as_grid().unwrap().as_slice(), &[11.0, 22.0, 33.0]);
    }

    #[test]
    fn unbound_identifier_is_an_undefined_variable_error() {
        let error = Expression::parse("a+b").unwrap().evaluate(&bind(&[("a", 2.0)])).unwrap_err();
        assert_eq!(error, Error::UndefinedVariable("b".to_string()));
        assert_eq!(error.kind(), ErrorKind::UndefinedVariable);
    }

    #[test]
    fn dangling_operator_fails_at_construction() {
        let error = Expression::parse("1+").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!("(1+2".parse::<Expression>().is_err());
    }

    #[test]
    fn variables_are_listed_once_each() {
        let expr = Expression::parse("a*b + a/c").unwrap();
        assert_eq!(expr.variables(), vec!["a", "b", "c"]);
        assert_eq!(expr.source(), "a*b + a/c");
    }
}
