//! Calc-expression language.
//!
//! Small arithmetic expressions authored in the formula catalog, e.g.
//! `"LogsIgE_egg * age"` or `"log10(dose / 1000)"`. Supports `+ - * / ^`,
//! unary signs, parentheses, numeric literals, scope variables, the
//! constants `pi` and `e`, and a handful of one-argument functions.
//!
//! [`evaluate`] never fails: parse errors, unknown names and non-finite
//! results are logged and collapse to `0.0` so one malformed definition
//! cannot take down a whole prediction.

use std::collections::{BTreeMap, HashMap};

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::{alpha1, char, digit0, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("syntax error in \"{expression}\" at offset {offset}")]
    Syntax { expression: String, offset: usize },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("\"{expression}\" did not evaluate to a finite number (got {value})")]
    NonFinite { expression: String, value: f64 },
}

/// Read access to named numeric values.
pub trait Scope {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl Scope for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Scope for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }

    fn is_right_assoc(self) -> bool {
        self == BinaryOp::Pow
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Prefix signs bind looser than `^`, so `-2^2` is `-(2^2)`.
const UNARY_OPERAND_PRECEDENCE: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Call(String, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, scope: &dyn Scope) -> Result<f64, ExpressionError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Variable(name) => scope
                .lookup(name)
                .or_else(|| constant(name))
                .ok_or_else(|| ExpressionError::UndefinedVariable(name.clone())),
            Expr::Unary(op, operand) => {
                let v = operand.eval(scope)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary(lhs, op, rhs) => Ok(op.apply(lhs.eval(scope)?, rhs.eval(scope)?)),
            Expr::Call(name, arg) => {
                let f = function(name).ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
                Ok(f(arg.eval(scope)?))
            }
        }
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Unary(_, operand) => operand.collect_variables(out),
            Expr::Binary(lhs, _, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Expr::Call(_, arg) => arg.collect_variables(out),
        }
    }

    /// Variable names referenced by the expression, in first-use order.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

fn function(name: &str) -> Option<fn(f64) -> f64> {
    match name {
        "log" | "ln" => Some(f64::ln),
        "log10" => Some(f64::log10),
        "log2" => Some(f64::log2),
        "exp" => Some(f64::exp),
        "sqrt" => Some(f64::sqrt),
        "abs" => Some(f64::abs),
        _ => None,
    }
}

fn number(input: &str) -> IResult<&str, Expr> {
    map_res(
        recognize(pair(
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        )),
        |s: &str| s.parse::<f64>().map(Expr::Number),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, recognize(char('_')))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn call_or_variable(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, arg) = opt(delimited(
        preceded(multispace0, char('(')),
        expression,
        preceded(multispace0, char(')')),
    ))(rest)?;
    let expr = match arg {
        Some(arg) => Expr::Call(name.to_string(), Box::new(arg)),
        None => Expr::Variable(name.to_string()),
    };
    Ok((rest, expr))
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), expression, preceded(multispace0, char(')')))(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    preceded(multispace0, alt((number, call_or_variable, parenthesized)))(input)
}

fn prefixed(input: &str) -> IResult<&str, Expr> {
    let (rest, sign) = opt(preceded(multispace0, one_of("+-")))(input)?;
    match sign {
        Some(sign) => {
            let op = if sign == '-' { UnaryOp::Minus } else { UnaryOp::Plus };
            map(
                |i| binary(i, UNARY_OPERAND_PRECEDENCE),
                move |operand| Expr::Unary(op, Box::new(operand)),
            )(rest)
        }
        None => primary(input),
    }
}

/// Precedence climbing over the binary operators.
fn binary(input: &str, min_precedence: u8) -> IResult<&str, Expr> {
    let (mut input, mut lhs) = prefixed(input)?;

    loop {
        let (rest, _) = multispace0(input)?;
        let Some(op) = rest.chars().next().and_then(BinaryOp::from_char) else {
            break;
        };
        let precedence = op.precedence();
        if precedence < min_precedence {
            break;
        }
        let next_min = if op.is_right_assoc() {
            precedence
        } else {
            precedence + 1
        };
        let (rest, rhs) = binary(&rest[1..], next_min)?;
        lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        input = rest;
    }

    Ok((input, lhs))
}

fn expression(input: &str) -> IResult<&str, Expr> {
    binary(input, 0)
}

/// Parse a complete expression; trailing input is a syntax error.
pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    all_consuming(terminated(expression, multispace0))(source)
        .map(|(_, expr)| expr)
        .map_err(|e| {
            let offset = match e {
                nom::Err::Error(inner) | nom::Err::Failure(inner) => {
                    source.len() - inner.input.len()
                }
                nom::Err::Incomplete(_) => source.len(),
            };
            ExpressionError::Syntax {
                expression: source.to_string(),
                offset,
            }
        })
}

/// Parse and evaluate, rejecting non-finite results.
pub fn try_evaluate(source: &str, scope: &dyn Scope) -> Result<f64, ExpressionError> {
    let value = parse(source)?.eval(scope)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExpressionError::NonFinite {
            expression: source.to_string(),
            value,
        })
    }
}

/// Evaluate with fallback: any failure is logged and yields `0.0`.
pub fn evaluate(source: &str, scope: &dyn Scope) -> f64 {
    match try_evaluate(source, scope) {
        Ok(value) => value,
        Err(e) => {
            warn!(expression = %source, error = %e, "calc expression failed, using 0");
            0.0
        }
    }
}

/// Variable names an expression references, or `None` if it does not parse.
pub fn referenced_names(source: &str) -> Option<Vec<String>> {
    parse(source)
        .ok()
        .map(|expr| expr.variables().into_iter().map(str::to_string).collect())
}

/// Evaluates calc expressions for the intercept engine.
pub trait CalcEvaluator {
    fn evaluate(&self, expression: &str, scope: &dyn Scope) -> f64;
}

/// The default evaluator: [`evaluate`] with its fallback-to-zero policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeEvaluator;

impl CalcEvaluator for SafeEvaluator {
    fn evaluate(&self, expression: &str, scope: &dyn Scope) -> f64 {
        evaluate(expression, scope)
    }
}
