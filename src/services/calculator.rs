//! Arithmetic for the `calculation` intent.
//!
//! Input is filtered through a character whitelist and then handed to a small
//! recursive-descent parser that only knows numeric literals, `+ - * /`, unary
//! signs and parentheses. Integer operands stay integers until a division or a
//! float literal is involved, so `2 + 2` answers `4` while `4 / 2` answers `2.0`.

use anyhow::{anyhow, bail, Result};
use log::debug;
use std::fmt;

pub const GUIDANCE_MESSAGE: &str = "Use only basic math symbols (+ - * /).";
pub const INVALID_EXPRESSION_MESSAGE: &str = "Invalid math expression.";

const ALLOWED_CHARS: &str = "0123456789+-*/(). ";
const TRIGGER_WORD: &str = "calculate";

// Parentheses and unary signs both count towards this.
const MAX_NESTING: usize = 64;

/// Evaluates `input` and renders the reply line.
pub fn evaluate(input: &str) -> String {
    let expression = input.to_lowercase().replace(TRIGGER_WORD, "");

    if !expression.chars().all(|c| ALLOWED_CHARS.contains(c)) {
        debug!("Rejected calculator input with disallowed characters");
        return GUIDANCE_MESSAGE.to_string();
    }

    match evaluate_expression(expression.trim()) {
        Ok(value) => format!("Answer: {value}"),
        Err(e) => {
            debug!("Calculator failed on {:?}: {e}", expression.trim());
            INVALID_EXPRESSION_MESSAGE.to_string()
        }
    }
}

/// Parses and evaluates a whitelisted arithmetic expression.
pub fn evaluate_expression(expression: &str) -> Result<Number> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        bail!("empty expression");
    }

    let mut parser = Parser {
        tokens: &tokens,
        position: 0,
        depth: 0,
    };
    let value = parser.expression()?;

    if let Some(token) = parser.peek() {
        bail!("unexpected {token:?} at token {}", parser.position);
    }

    Ok(value)
}

// ============================================================================
// Values
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map(Number::Int)
                .unwrap_or_else(|| Number::Float(a as f64 + b as f64)),
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map(Number::Int)
                .unwrap_or_else(|| Number::Float(a as f64 - b as f64)),
            (a, b) => Number::Float(a.as_f64() - b.as_f64()),
        }
    }

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map(Number::Int)
                .unwrap_or_else(|| Number::Float(a as f64 * b as f64)),
            (a, b) => Number::Float(a.as_f64() * b.as_f64()),
        }
    }

    fn div(self, rhs: Number) -> Result<Number> {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            bail!("division by zero");
        }
        Ok(Number::Float(self.as_f64() / divisor))
    }

    fn neg(self) -> Number {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(i as f64))),
            Number::Float(f) => Number::Float(-f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-trip form; always shows a fractional part or an exponent.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{x:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(Number),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            ' ' => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Number(parse_literal(&expression[start..end])?)
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => bail!("unexpected character {other:?}"),
        };

        if !matches!(token, Token::Number(_)) {
            chars.next();
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<Number> {
    if literal.contains('.') {
        if literal == "." || literal.matches('.').count() > 1 {
            bail!("malformed number {literal:?}");
        }
        return literal
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|e| anyhow!("malformed number {literal:?}: {e}"));
    }

    if literal.len() > 1 && literal.starts_with('0') && literal.bytes().any(|b| b != b'0') {
        bail!("leading zeros in integer literal {literal:?}");
    }

    // Integers too large for i64 degrade to floating point
    match literal.parse::<i64>() {
        Ok(i) => Ok(Number::Int(i)),
        Err(_) => literal
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|e| anyhow!("malformed number {literal:?}: {e}")),
    }
}

// ============================================================================
// Parser
// ============================================================================

// expression := term (('+' | '-') term)*
// term       := unary (('*' | '/') unary)*
// unary      := ('+' | '-') unary | primary
// primary    := NUMBER | '(' expression ')'
struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            bail!("expression nested deeper than {MAX_NESTING} levels");
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Number> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value = value.add(self.term()?);
                }
                Some(Token::Minus) => {
                    self.advance();
                    value = value.sub(self.term()?);
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Number> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value = value.mul(self.unary()?);
                }
                Some(Token::Slash) => {
                    self.advance();
                    value = value.div(self.unary()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Number> {
        match self.peek() {
            Some(Token::Plus) | Some(Token::Minus) => {
                let negate = self.advance() == Some(Token::Minus);
                self.descend()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(if negate { operand.neg() } else { operand })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Number> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expression()?;
                if self.advance() != Some(Token::RParen) {
                    bail!("missing closing parenthesis");
                }
                self.depth -= 1;
                Ok(value)
            }
            Some(token) => bail!("unexpected {token:?}"),
            None => bail!("unexpected end of expression"),
        }
    }
}
