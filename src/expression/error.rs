use std::error;
use std::fmt;




/**
 * Broad classification of an expression failure. Lex and parse failures
 * happen while an `Expression` is constructed; the remaining kinds only occur
 * when it is evaluated against a set of variables.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    UndefinedVariable,
    StackUnderflow,
    Evaluation,
}




#[derive(Clone, Debug, PartialEq)]


/**
 * Error to represent a malformed formula, or a failure to evaluate one.
 */
pub enum Error {
    UnexpectedCharacter { character: char, position: usize },
    MalformedNumber(String),
    UnmatchedClosingParen,
    UnmatchedOpeningParen,
    MissingOperand(char),
    DanglingOperand,
    EmptyExpression,
    UndefinedVariable(String),
    StackUnderflow,
    UnusedOperands(usize),
    ShapeMismatch((usize, usize), (usize, usize)),
}




// ============================================================================
impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;

        match self {
            UnexpectedCharacter { .. } | MalformedNumber(_) => ErrorKind::Lex,
            UnmatchedClosingParen
            | UnmatchedOpeningParen
            | MissingOperand(_)
            | DanglingOperand
            | EmptyExpression => ErrorKind::Parse,
            UndefinedVariable(_) => ErrorKind::UndefinedVariable,
            StackUnderflow | UnusedOperands(_) => ErrorKind::StackUnderflow,
            ShapeMismatch(..) => ErrorKind::Evaluation,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            UnexpectedCharacter { character, position } => {
                write!(fmt, "unexpected character '{}' at position {}", character, position)
            }
            MalformedNumber(s) => write!(fmt, "malformed number literal: {}", s),
            UnmatchedClosingParen => write!(fmt, "')' without a matching '('"),
            UnmatchedOpeningParen => write!(fmt, "'(' is never closed"),
            MissingOperand(op) => write!(fmt, "operator '{}' is missing an operand", op),
            DanglingOperand => write!(fmt, "operand is not joined to the expression by an operator"),
            EmptyExpression => write!(fmt, "empty expression"),
            UndefinedVariable(name) => write!(fmt, "undefined variable: {}", name),
            StackUnderflow => write!(fmt, "postfix sequence underflowed the operand stack"),
            UnusedOperands(n) => write!(fmt, "postfix sequence left {} operands on the stack", n),
            ShapeMismatch(a, b) => {
                write!(fmt, "grid shapes do not agree: {:?} vs {:?}", a, b)
            }
        }
    }
}

impl error::Error for Error {}
