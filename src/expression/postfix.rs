use super::error::Error;
use super::lexer::Token;
use super::operator::{Associativity, Symbol};




/**
 * Reorder an infix token sequence into postfix (RPN) order with the
 * shunting-yard algorithm. Operands go straight to the output; an incoming
 * operator first pops every stacked operator that binds at least as tightly
 * (strictly tighter, for right-associative operators). Parentheses must
 * balance.
 *
 * The result is also checked for arity: every binary operator must find two
 * operands and exactly one value must remain at the end. This is what turns
 * `"1+"` or `"2(3)"` into a parse error instead of a partial result.
 */
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, Error> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Symbol> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Identifier(_) => output.push(token.clone()),
            Token::Operator(Symbol::LeftParen) => stack.push(Symbol::LeftParen),
            Token::Operator(Symbol::RightParen) => {
                loop {
                    match stack.pop() {
                        Some(Symbol::LeftParen) => break,
                        Some(top) => output.push(Token::Operator(top)),
                        None => return Err(Error::UnmatchedClosingParen),
                    }
                }
            }
            Token::Operator(op) => {
                while let Some(&top) = stack.last() {
                    if pops_before(top, *op) {
                        output.push(Token::Operator(top));
                        stack.pop();
                    } else {
                        break;
                    }
                }
                stack.push(*op);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Symbol::LeftParen {
            return Err(Error::UnmatchedOpeningParen);
        }
        output.push(Token::Operator(top));
    }

    validate_arity(&output)?;
    Ok(output)
}

fn pops_before(top: Symbol, op: Symbol) -> bool {
    top.precedence() > op.precedence() || (
    top.precedence() == op.precedence() && op.associativity() == Associativity::Left)
}

fn validate_arity(postfix: &[Token]) -> Result<(), Error> {
    let mut depth = 0usize;

    for token in postfix {
        match token {
            Token::Operator(op) => {
                if depth < 2 {
                    return Err(Error::MissingOperand(op.as_char()));
                }
                depth -= 1;
            }
            _ => depth += 1,
        }
    }

    match depth {
        0 => Err(Error::EmptyExpression),
        1 => Ok(()),
        _ => Err(Error::DanglingOperand),
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::to_postfix;
    use crate::expression::error::{Error, ErrorKind};
    use crate::expression::lexer::{tokenize, Token};

    fn rpn(text: &str) -> Result<String, Error> {
        let postfix = to_postfix(&tokenize(text)?)?;
        Ok(postfix
            .iter()
            .map(|t| match t {
                Token::Number(x) => x.to_string(),
                Token::Identifier(name) => name.clone(),
                Token::Operator(op) => op.as_char().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "))
    }

    #[test]
    fn precedence_orders_the_output() {
        assert_eq!(rpn("3+4*2").unwrap(), "3 4 2 * +");
        assert_eq!(rpn("3*4+2").unwrap(), "3 4 * 2 +");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(rpn("(3+4)*2").unwrap(), "3 4 + 2 *");
        assert_eq!(rpn("((a))").unwrap(), "a");
    }

    #[test]
    fn left_associative_operators_group_left() {
        assert_eq!(rpn("a-b-c").unwrap(), "a b - c -");
        assert_eq!(rpn("a/b*c").unwrap(), "a b / c *");
    }

    #[test]
    fn power_groups_right() {
        assert_eq!(rpn("2^3^2").unwrap(), "2 3 2 ^ ^");
    }

    #[test]
    fn unbalanced_parentheses_are_parse_errors() {
        assert_eq!(rpn("(1+2").unwrap_err(), Error::UnmatchedOpeningParen);
        assert_eq!(rpn("1+2)").unwrap_err(), Error::UnmatchedClosingParen);
        assert_eq!(rpn(")(").unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn operator_without_operands_is_a_parse_error() {
        assert_eq!(rpn("1+").unwrap_err(), Error::MissingOperand('+'));
        assert_eq!(rpn("*2").unwrap_err(), Error::MissingOperand('*'));
        assert_eq!(rpn("-x").unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn juxtaposed_operands_are_a_parse_error() {
        assert_eq!(rpn("2(3)").unwrap_err(), Error::DanglingOperand);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert_eq!(rpn("").unwrap_err(), Error::EmptyExpression);
        assert_eq!(rpn("()").unwrap_err(), Error::EmptyExpression);
    }
}
