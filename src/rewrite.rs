//! The tree rewrite pipeline: an ordered sequence of pure node transforms
//! applied while copying an expression tree.
//!
//! A transform maps a single node to a replacement node and never recurses;
//! recursion belongs to [`Expr::copy`], which copies operands first and then
//! runs the pipeline over each rebuilt node, so a full copy is one
//! bottom-up rewrite pass.

use log::debug;

use crate::expr::{is_const, is_terminal, BoxExpr, Expr};

/// A pure node-to-node rewrite.
pub type Transform = Box<dyn Fn(BoxExpr) -> BoxExpr>;

/// An ordered list of transforms. Applied strictly in order, each transform
/// receiving the previous one's output.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Transform>,
}

impl Pipeline {
    /// An empty pipeline; copying through it is an identity deep copy.
    pub fn new() -> Self {
        Pipeline { steps: Vec::new() }
    }

    pub fn with(mut self, step: impl Fn(BoxExpr) -> BoxExpr + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn push(&mut self, step: Transform) {
        self.steps.push(step);
    }

    /// Run every transform over a single node, in order.
    pub fn apply(&self, e: BoxExpr) -> BoxExpr {
        self.steps.iter().fold(e, |e, step| step(e))
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Copy `e` through the pipeline. Convenience spelling of `e.copy(pipeline)`.
pub fn simplify(e: &dyn Expr, pipeline: &Pipeline) -> BoxExpr {
    e.copy(pipeline)
}

/// A transform that replaces a variable with a snapshot of its current
/// value. Unset variables are left in place so the copy still evaluates to
/// the same error the original would.
pub fn bind_variables() -> Transform {
    Box::new(|e| {
        if let Some(var) = e.as_var() {
            if let Ok(value) = var.get() {
                debug!("binding {e} to {value}");
                return value.into();
            }
        }
        e
    })
}

/// A transform that evaluates any operator node whose operands are all
/// constants and replaces it with the resulting value. Nodes that fail to
/// evaluate are left unchanged; transforms are total.
pub fn fold_constants() -> Transform {
    Box::new(|e| {
        if is_terminal(&*e) || !e.operands().iter().all(|op| is_const(*op)) {
            return e;
        }
        match e.eval_value() {
            Ok(value) => {
                debug!("folded {e} to {value}");
                value.into()
            }
            Err(err) => {
                debug!("leaving {e} unfolded: {err}");
                e
            }
        }
    })
}
