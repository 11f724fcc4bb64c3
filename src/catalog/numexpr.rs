//! Purpose: Evaluate restricted arithmetic expressions for numeric leaf decoders.
//! Exports: `eval_int`, `eval_float`, `EvalError`.
//! Role: Safe evaluator; only literals, named constants, `+ - * / // % **` and parentheses.
//! Invariants: No names other than the supplied constants resolve; nothing else is executed.
//! Invariants: `^` is an alias for `**`; integer mode floors `/` like `//`.
//! Invariants: Python-style semantics: floor division, sign-of-divisor modulo, `-2**2 == -4`.
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum EvalError {
    Syntax(String),
    ZeroDivision,
    Overflow,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Syntax(message) => f.write_str(message),
            EvalError::ZeroDivision => f.write_str("division by zero"),
            EvalError::Overflow => f.write_str("integer overflow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(String),
    Name(String),
    Plus,
    Minus,
    Star,
    Pow,
    Slash,
    FloorDiv,
    Percent,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        if ch.is_whitespace() {
            idx += 1;
            continue;
        }
        if ch.is_ascii_digit() || (ch == '.' && chars.get(idx + 1).is_some_and(char::is_ascii_digit)) {
            let start = idx;
            while idx < chars.len() && (chars[idx].is_ascii_digit() || chars[idx] == '.' || chars[idx] == '_') {
                idx += 1;
            }
            if idx < chars.len() && matches!(chars[idx], 'e' | 'E') {
                let mut probe = idx + 1;
                if probe < chars.len() && matches!(chars[probe], '+' | '-') {
                    probe += 1;
                }
                if probe < chars.len() && chars[probe].is_ascii_digit() {
                    idx = probe;
                    while idx < chars.len() && chars[idx].is_ascii_digit() {
                        idx += 1;
                    }
                }
            }
            let text: String = chars[start..idx].iter().filter(|c| **c != '_').collect();
            tokens.push(Token::Number(text));
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let start = idx;
            while idx < chars.len() && (chars[idx].is_alphanumeric() || chars[idx] == '_') {
                idx += 1;
            }
            tokens.push(Token::Name(chars[start..idx].iter().collect()));
            continue;
        }
        let next = chars.get(idx + 1).copied();
        let (token, width) = match (ch, next) {
            ('*', Some('*')) => (Token::Pow, 2),
            ('/', Some('/')) => (Token::FloorDiv, 2),
            ('^', _) => (Token::Pow, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('%', _) => (Token::Percent, 1),
            ('(', _) => (Token::Open, 1),
            (')', _) => (Token::Close, 1),
            (other, _) => {
                return Err(EvalError::Syntax(format!("unexpected character `{other}`")));
            }
        };
        tokens.push(token);
        idx += width;
    }
    Ok(tokens)
}

/// Arithmetic over one numeric domain.
trait Arith: Copy {
    fn literal(text: &str) -> Result<Self, EvalError>;
    fn from_constant(value: f64) -> Self;
    fn add(self, rhs: Self) -> Result<Self, EvalError>;
    fn sub(self, rhs: Self) -> Result<Self, EvalError>;
    fn mul(self, rhs: Self) -> Result<Self, EvalError>;
    fn div(self, rhs: Self) -> Result<Self, EvalError>;
    fn floor_div(self, rhs: Self) -> Result<Self, EvalError>;
    fn rem(self, rhs: Self) -> Result<Self, EvalError>;
    fn pow(self, rhs: Self) -> Result<Self, EvalError>;
    fn neg(self) -> Result<Self, EvalError>;
}

fn float_literal(text: &str) -> Result<f64, EvalError> {
    text.parse::<f64>()
        .map_err(|_| EvalError::Syntax(format!("invalid number `{text}`")))
}

fn truncate(value: f64) -> Result<i64, EvalError> {
    if !value.is_finite() || value.abs() >= 9.2e18 {
        return Err(EvalError::Overflow);
    }
    Ok(value.trunc() as i64)
}

impl Arith for i64 {
    fn literal(text: &str) -> Result<Self, EvalError> {
        match text.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => truncate(float_literal(text)?),
        }
    }

    fn from_constant(value: f64) -> Self {
        value as i64
    }

    fn add(self, rhs: Self) -> Result<Self, EvalError> {
        self.checked_add(rhs).ok_or(EvalError::Overflow)
    }

    fn sub(self, rhs: Self) -> Result<Self, EvalError> {
        self.checked_sub(rhs).ok_or(EvalError::Overflow)
    }

    fn mul(self, rhs: Self) -> Result<Self, EvalError> {
        self.checked_mul(rhs).ok_or(EvalError::Overflow)
    }

    fn div(self, rhs: Self) -> Result<Self, EvalError> {
        self.floor_div(rhs)
    }

    fn floor_div(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs == 0 {
            return Err(EvalError::ZeroDivision);
        }
        let quotient = self.checked_div(rhs).ok_or(EvalError::Overflow)?;
        if self % rhs != 0 && ((self < 0) != (rhs < 0)) {
            Ok(quotient - 1)
        } else {
            Ok(quotient)
        }
    }

    fn rem(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs == 0 {
            return Err(EvalError::ZeroDivision);
        }
        let remainder = self.checked_rem(rhs).ok_or(EvalError::Overflow)?;
        if remainder != 0 && ((remainder < 0) != (rhs < 0)) {
            Ok(remainder + rhs)
        } else {
            Ok(remainder)
        }
    }

    fn pow(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs >= 0 {
            let exp = u32::try_from(rhs).map_err(|_| EvalError::Overflow)?;
            return self.checked_pow(exp).ok_or(EvalError::Overflow);
        }
        if self == 0 {
            return Err(EvalError::ZeroDivision);
        }
        let exp = i32::try_from(rhs).map_err(|_| EvalError::Overflow)?;
        truncate((self as f64).powi(exp))
    }

    fn neg(self) -> Result<Self, EvalError> {
        self.checked_neg().ok_or(EvalError::Overflow)
    }
}

impl Arith for f64 {
    fn literal(text: &str) -> Result<Self, EvalError> {
        float_literal(text)
    }

    fn from_constant(value: f64) -> Self {
        value
    }

    fn add(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self + rhs)
    }

    fn sub(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self - rhs)
    }

    fn mul(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self * rhs)
    }

    fn div(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs == 0.0 {
            return Err(EvalError::ZeroDivision);
        }
        Ok(self / rhs)
    }

    fn floor_div(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self.div(rhs)?.floor())
    }

    fn rem(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs == 0.0 {
            return Err(EvalError::ZeroDivision);
        }
        Ok(self - rhs * (self / rhs).floor())
    }

    fn pow(self, rhs: Self) -> Result<Self, EvalError> {
        if self == 0.0 && rhs < 0.0 {
            return Err(EvalError::ZeroDivision);
        }
        Ok(self.powf(rhs))
    }

    fn neg(self) -> Result<Self, EvalError> {
        Ok(-self)
    }
}

const MAX_NESTING: usize = 200;

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    constants: &'a [(&'a str, f64)],
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    // Every recursive production passes through here; the stack stays bounded.
    fn nested<N: Arith>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<N, EvalError>,
    ) -> Result<N, EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::Syntax("expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr<N: Arith>(&mut self) -> Result<N, EvalError> {
        let mut acc = self.term::<N>()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    acc = acc.add(self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    acc = acc.sub(self.term()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term<N: Arith>(&mut self) -> Result<N, EvalError> {
        let mut acc = self.unary::<N>()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    acc = acc.mul(self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    acc = acc.div(self.unary()?)?;
                }
                Some(Token::FloorDiv) => {
                    self.bump();
                    acc = acc.floor_div(self.unary()?)?;
                }
                Some(Token::Percent) => {
                    self.bump();
                    acc = acc.rem(self.unary()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary<N: Arith>(&mut self) -> Result<N, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.bump();
                self.nested(Self::unary::<N>)
            }
            Some(Token::Minus) => {
                self.bump();
                self.nested(Self::unary::<N>)?.neg()
            }
            _ => self.power(),
        }
    }

    fn power<N: Arith>(&mut self) -> Result<N, EvalError> {
        let base = self.atom::<N>()?;
        if self.peek() == Some(&Token::Pow) {
            self.bump();
            let exp = self.nested(Self::unary::<N>)?;
            return base.pow(exp);
        }
        Ok(base)
    }

    fn atom<N: Arith>(&mut self) -> Result<N, EvalError> {
        match self.bump() {
            Some(Token::Number(text)) => N::literal(&text),
            Some(Token::Name(name)) => self
                .constants
                .iter()
                .find(|(constant, _)| *constant == name)
                .map(|(_, value)| N::from_constant(*value))
                .ok_or_else(|| EvalError::Syntax(format!("undefined name `{name}`"))),
            Some(Token::Open) => {
                let inner = self.nested(Self::expr::<N>)?;
                match self.bump() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(EvalError::Syntax("missing closing parenthesis".to_string())),
                }
            }
            Some(token) => Err(EvalError::Syntax(format!("unexpected token {token:?}"))),
            None => Err(EvalError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

fn evaluate<N: Arith>(input: &str, constants: &[(&str, f64)]) -> Result<N, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Syntax("empty expression".to_string()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        constants,
    };
    let value = parser.expr::<N>()?;
    if parser.pos < parser.tokens.len() {
        return Err(EvalError::Syntax("trailing input after expression".to_string()));
    }
    Ok(value)
}

/// Integer evaluation; every literal is truncated to an integer (`2e4` is 20000).
pub fn eval_int(input: &str) -> Result<i64, EvalError> {
    evaluate::<i64>(input, &[])
}

pub fn eval_float(input: &str, constants: &[(&str, f64)]) -> Result<f64, EvalError> {
    evaluate::<f64>(input, constants)
}
