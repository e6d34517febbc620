/**
 * Identifier for one of the single-character operator or grouping symbols
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    LeftParen,
    RightParen,
}




#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}




/**
 * Static description of an operator: its binding strength, which way ties
 * are broken, and the binary function it applies. Grouping symbols have no
 * function.
 */
#[derive(Clone, Copy, Debug)]
pub struct Operator {
    pub symbol: Symbol,
    pub precedence: u8,
    pub associativity: Associativity,
    pub apply: Option<fn(f64, f64) -> f64>,
}




/// The operator table, in `Symbol` declaration order. The closing paren
/// carries a sentinel precedence and is never applied.
static OPERATORS: [Operator; 7] = [
    Operator { symbol: Symbol::Add,        precedence: 2, associativity: Associativity::Left,  apply: Some(add)    },
    Operator { symbol: Symbol::Sub,        precedence: 2, associativity: Associativity::Left,  apply: Some(sub)    },
    Operator { symbol: Symbol::Mul,        precedence: 3, associativity: Associativity::Left,  apply: Some(mul)    },
    Operator { symbol: Symbol::Div,        precedence: 3, associativity: Associativity::Left,  apply: Some(div)    },
    Operator { symbol: Symbol::Pow,        precedence: 4, associativity: Associativity::Right, apply: Some(pow)    },
    Operator { symbol: Symbol::LeftParen,  precedence: 0, associativity: Associativity::Left,  apply: None },
    Operator { symbol: Symbol::RightParen, precedence: 9, associativity: Associativity::Left,  apply: None },
];




fn add(a: f64, b: f64) -> f64 { a + b }
fn sub(a: f64, b: f64) -> f64 { a - b }
fn mul(a: f64, b: f64) -> f64 { a * b }
fn div(a: f64, b: f64) -> f64 { a / b }
fn pow(a: f64, b: f64) -> f64 { a.powf(b) }




// ============================================================================
impl Symbol {

    /**
     * Look up the symbol for a character, if it is one of `+ - * / ^ ( )`.
     */
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Symbol::Add),
            '-' => Some(Symbol::Sub),
            '*' => Some(Symbol::Mul),
            '/' => Some(Symbol::Div),
            '^' => Some(Symbol::Pow),
            '(' => Some(Symbol::LeftParen),
            ')' => Some(Symbol::RightParen),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::Add => '+',
            Symbol::Sub => '-',
            Symbol::Mul => '*',
            Symbol::Div => '/',
            Symbol::Pow => '^',
            Symbol::LeftParen => '(',
            Symbol::RightParen => ')',
        }
    }

    /**
     * Return the entry of the static operator table for this symbol.
     */
    pub fn operator(&self) -> &'static Operator {
        &OPERATORS[*self as usize]
    }

    pub fn precedence(&self) -> u8 {
        self.operator().precedence
    }

    pub fn associativity(&self) -> Associativity {
        self.operator().associativity
    }
}
