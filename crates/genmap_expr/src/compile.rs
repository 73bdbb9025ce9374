//! Parameter binding and slot evaluation.
//!
//! [`compile`] substitutes every parameter of an equation with its numeric
//! value and folds the constant subtrees, leaving a [`Compiled`] program over a
//! small array of free-variable slots.

use crate::ast::{BinaryOp, Expr};
use crate::error::ExprError;
use std::collections::BTreeMap;

/// An equation with its parameters bound.
#[derive(Clone, Debug, PartialEq)]
pub enum Compiled {
    /// A folded constant.
    Const(f64),
    /// The free variable at this slot index.
    Slot(usize),
    /// Unary negation.
    Neg(Box<Compiled>),
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Compiled>,
        /// Right operand.
        rhs: Box<Compiled>,
    },
}

/// Binds `params` into `expr`.
///
/// Variables named in `slots` stay free and are numbered by their position in
/// that list; a slot name shadows a parameter of the same name. Any other
/// variable must be a key of `params`.
pub fn compile(
    expr: &Expr,
    params: &BTreeMap<String, f64>,
    slots: &[&str],
) -> Result<Compiled, ExprError> {
    let compiled = match expr {
        Expr::Number(n) => Compiled::Const(*n),
        Expr::Var(name) => {
            if let Some(index) = slots.iter().position(|s| s == name) {
                Compiled::Slot(index)
            } else {
                let value = params
                    .get(name)
                    .ok_or_else(|| ExprError::UnboundVariable(name.clone()))?;
                Compiled::Const(*value)
            }
        }
        Expr::Neg(inner) => match compile(inner, params, slots)? {
            Compiled::Const(v) => Compiled::Const(-v),
            other => Compiled::Neg(Box::new(other)),
        },
        Expr::Binary { op, lhs, rhs } => {
            let lhs = compile(lhs, params, slots)?;
            let rhs = compile(rhs, params, slots)?;
            match (lhs, rhs) {
                (Compiled::Const(a), Compiled::Const(b)) => Compiled::Const(op.apply(a, b)),
                (lhs, rhs) => Compiled::Binary {
                    op: *op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            }
        }
    };
    Ok(compiled)
}

impl Compiled {
    /// Evaluates the program with the given slot values.
    ///
    /// A slot index beyond `slots` evaluates as NaN.
    pub fn eval(&self, slots: &[f64]) -> f64 {
        match self {
            Compiled::Const(v) => *v,
            Compiled::Slot(i) => slots.get(*i).copied().unwrap_or(f64::NAN),
            Compiled::Neg(inner) => -inner.eval(slots),
            Compiled::Binary { op, lhs, rhs } => op.apply(lhs.eval(slots), rhs.eval(slots)),
        }
    }

    /// Returns the folded value if the program uses no slots.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Compiled::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// Number of slots the program reads (one past the highest slot index).
    pub fn arity(&self) -> usize {
        match self {
            Compiled::Const(_) => 0,
            Compiled::Slot(i) => i + 1,
            Compiled::Neg(inner) => inner.arity(),
            Compiled::Binary { lhs, rhs, .. } => lhs.arity().max(rhs.arity()),
        }
    }
}
