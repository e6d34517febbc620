use super::error::Error;
use super::operator::Symbol;




/**
 * A lexical token of a formula: a number, a variable name, or one of the
 * operator and grouping symbols.
 */
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Operator(Symbol),
}




/**
 * Split a formula into tokens. Whitespace is stripped first, so `"1 2"` is the
 * single number `12`. Numbers are runs of digits with at most one decimal
 * point. Identifiers start with a letter or underscore and may continue with
 * digits (`n0mlg`). Any other character is a lex error.
 */
pub fn tokenize(text: &str) -> Result<Vec<Token>, Error> {
    let chars: Vec<(usize, char)> = text
        .char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .collect();

    let mut tokens = Vec::new();
    let mut n = 0;

    while n < chars.len() {
        let (position, c) = chars[n];

        if let Some(symbol) = Symbol::from_char(c) {
            tokens.push(Token::Operator(symbol));
            n += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let len = run_length(&chars[n..], |c| c.is_ascii_digit() || c == '.');
            let literal: String = chars[n..n + len].iter().map(|(_, c)| c).collect();
            tokens.push(Token::Number(parse_number(literal)?));
            n += len;
        } else if c.is_alphabetic() || c == '_' {
            let len = run_length(&chars[n..], |c| c.is_alphanumeric() || c == '_');
            let name: String = chars[n..n + len].iter().map(|(_, c)| c).collect();
            tokens.push(Token::Identifier(name));
            n += len;
        } else {
            return Err(Error::UnexpectedCharacter { character: c, position });
        }
    }
    Ok(tokens)
}

fn run_length<F>(chars: &[(usize, char)], accept: F) -> usize
where
    F: Fn(char) -> bool
{
    chars.iter().take_while(|(_, c)| accept(*c)).count()
}

fn parse_number(literal: String) -> Result<f64, Error> {
    if literal.matches('.').count() > 1 || literal == "." {
        return Err(Error::MalformedNumber(literal));
    }
    literal.parse().map_err(|_| Error::MalformedNumber(literal))
}
