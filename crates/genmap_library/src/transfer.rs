//! Compiled transfer functions.
//!
//! The standard UCF forms (Hill repression, linear output conversion, the
//! `x1 + x2` input sum) are recognized structurally and evaluated in closed
//! form. Anything else falls back to a compiled [`genmap_expr`] program, so
//! custom equations still score correctly.

use crate::error::LibraryError;
use crate::records::{FunctionRecord, ModelRecord};
use genmap_expr::{compile, parse, BinaryOp, Compiled, Expr};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A single-input response `y = f(x)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// `ymin + (ymax - ymin) / (1 + (x / K)^n)`.
    Hill {
        /// Fully repressed output.
        ymin: f64,
        /// Unrepressed output.
        ymax: f64,
        /// Half-repression threshold.
        k: f64,
        /// Hill coefficient.
        n: f64,
    },
    /// `c * x`.
    Linear {
        /// Unit conversion factor.
        c: f64,
    },
    /// Any other equation in `x`.
    Equation(Compiled),
}

impl Response {
    /// Compiles a response function with its free variable `x`.
    pub fn compile(
        function: &FunctionRecord,
        params: &BTreeMap<String, f64>,
    ) -> Result<Self, LibraryError> {
        let expr = parse_function(function)?;
        let templates = templates();
        let lookup = |name: &str| {
            params.get(name).copied().ok_or_else(|| LibraryError::Equation {
                function: function.name.clone(),
                source: genmap_expr::ExprError::UnboundVariable(name.to_string()),
            })
        };
        if templates.hill.contains(&expr) {
            return Ok(Response::Hill {
                ymin: lookup("ymin")?,
                ymax: lookup("ymax")?,
                k: lookup("K")?,
                n: lookup("n")?,
            });
        }
        if expr == templates.linear {
            return Ok(Response::Linear { c: lookup("c")? });
        }
        bind(function, &expr, params, &["x"]).map(Response::Equation)
    }

    /// Evaluates the response at input `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Response::Hill { ymin, ymax, k, n } => ymin + (ymax - ymin) / (1.0 + (x / k).powf(*n)),
            Response::Linear { c } => c * x,
            Response::Equation(program) => program.eval(&[x]),
        }
    }
}

/// How a two-input gate combines its predecessors' signals into one `x`.
///
/// Slots are `x1`, `x2` (first and second predecessor) and `t1`, the tandem
/// interference value of the first predecessor.
#[derive(Clone, Debug, PartialEq)]
pub enum Composition {
    /// `x1 + x2`.
    Sum,
    /// Any other equation in `x1`, `x2`, `t1`.
    Equation(Compiled),
}

impl Composition {
    /// Compiles an input composition function.
    pub fn compile(
        function: &FunctionRecord,
        params: &BTreeMap<String, f64>,
    ) -> Result<Self, LibraryError> {
        let expr = parse_function(function)?;
        if expr == templates().sum {
            return Ok(Composition::Sum);
        }
        bind(function, &expr, params, &["x1", "x2", "t1"]).map(Composition::Equation)
    }

    /// Combines two predecessor signals.
    pub fn eval(&self, x1: f64, x2: f64, t1: f64) -> f64 {
        match self {
            Composition::Sum => x1 + x2,
            Composition::Equation(program) => program.eval(&[x1, x2, t1]),
        }
    }
}

/// Evaluates an equation whose only free variable is `STATE`.
pub fn eval_state(
    function: &FunctionRecord,
    params: &BTreeMap<String, f64>,
    state: f64,
) -> Result<f64, LibraryError> {
    let expr = parse_function(function)?;
    let program = bind(function, &expr, params, &["STATE"])?;
    Ok(program.eval(&[state]))
}

/// Compiles a tandem interference factor, free in `x` with `STATE` bound.
pub fn compile_tandem(
    function: &FunctionRecord,
    params: &BTreeMap<String, f64>,
    state: Option<f64>,
) -> Result<Compiled, LibraryError> {
    let expr = parse_function(function)?;
    let mut params = params.clone();
    if let Some(state) = state {
        params.insert("STATE".to_string(), state);
    }
    bind(function, &expr, &params, &["x"])
}

/// Merges model parameters with a function's own declarations.
///
/// An inline `value` wins; otherwise a `#//model/parameters/<p>` map binds the
/// function's name to model parameter `<p>`.
pub fn resolve_parameters(model: &ModelRecord, function: &FunctionRecord) -> BTreeMap<String, f64> {
    let mut params = model.numeric_parameters();
    for declared in &function.parameters {
        if let Some(value) = declared.value {
            params.insert(declared.name.clone(), value);
        } else if let Some(alias) = declared.model_parameter() {
            if let Some(value) = params.get(alias).copied() {
                params.insert(declared.name.clone(), value);
            }
        }
    }
    params
}

fn parse_function(function: &FunctionRecord) -> Result<Expr, LibraryError> {
    let equation = function
        .equation
        .as_deref()
        .ok_or_else(|| LibraryError::Equation {
            function: function.name.clone(),
            source: genmap_expr::ExprError::Empty,
        })?;
    parse(equation).map_err(|source| LibraryError::Equation {
        function: function.name.clone(),
        source,
    })
}

fn bind(
    function: &FunctionRecord,
    expr: &Expr,
    params: &BTreeMap<String, f64>,
    slots: &[&str],
) -> Result<Compiled, LibraryError> {
    compile(expr, params, slots).map_err(|source| LibraryError::Equation {
        function: function.name.clone(),
        source,
    })
}

struct Templates {
    hill: [Expr; 2],
    linear: Expr,
    sum: Expr,
}

fn templates() -> &'static Templates {
    static TEMPLATES: OnceLock<Templates> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let var = |name: &str| Expr::Var(name.to_string());
        let bin = Expr::binary;
        let span = || bin(BinaryOp::Sub, var("ymax"), var("ymin"));

        // ymin + (ymax - ymin) / (1.0 + (x / K) ^ n)
        let ratio_form = bin(
            BinaryOp::Add,
            var("ymin"),
            bin(
                BinaryOp::Div,
                span(),
                bin(
                    BinaryOp::Add,
                    Expr::Number(1.0),
                    bin(BinaryOp::Pow, bin(BinaryOp::Div, var("x"), var("K")), var("n")),
                ),
            ),
        );
        // ymin + (ymax - ymin) * K ^ n / (x ^ n + K ^ n)
        let k_n = || bin(BinaryOp::Pow, var("K"), var("n"));
        let threshold_form = bin(
            BinaryOp::Add,
            var("ymin"),
            bin(
                BinaryOp::Div,
                bin(BinaryOp::Mul, span(), k_n()),
                bin(BinaryOp::Add, bin(BinaryOp::Pow, var("x"), var("n")), k_n()),
            ),
        );

        Templates {
            hill: [ratio_form, threshold_form],
            linear: bin(BinaryOp::Mul, var("c"), var("x")),
            sum: bin(BinaryOp::Add, var("x1"), var("x2")),
        }
    })
}
