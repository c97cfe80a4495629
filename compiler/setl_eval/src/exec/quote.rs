//! Quoted evaluation: `@(e)`.
//!
//! Builds the term of `e` like `expr_to_term`, except that the arguments
//! of calls, collection accesses and collect-maps are evaluated and their
//! values' terms substituted. Callees and access targets stay quoted.

use setl_ir::{Expr, ExprKind, NodeKind};
use setl_patterns::{expr_to_term_with, value_to_term, EvalResult, Value};

use crate::Interpreter;

impl Interpreter {
    /// Term of `expr` with argument positions evaluated.
    pub fn to_term_quoted(&mut self, expr: &Expr) -> EvalResult {
        expr_to_term_with(expr, &mut |node: &Expr| self.quote_node(node))
    }

    /// The substituted term of `expr`, or `None` when plain conversion
    /// applies.
    fn quote_node(&mut self, expr: &Expr) -> Option<EvalResult> {
        match &expr.kind {
            ExprKind::Call { callee, args } => {
                Some(self.quote_with_arguments(NodeKind::Call, callee, args))
            }
            ExprKind::CollectionAccess { target, args } => {
                Some(self.quote_with_arguments(NodeKind::CollectionAccess, target, args))
            }
            ExprKind::CollectMap { target, arg } => Some(self.quote_collect_map(target, arg)),
            _ => None,
        }
    }

    /// `kind(quoted head, [argument value terms])`
    fn quote_with_arguments(&mut self, kind: NodeKind, head: &Expr, args: &[Expr]) -> EvalResult {
        let head = self.to_term_quoted(head)?;
        let values = self.eval_args(args)?;
        let args = Value::list(values.iter().map(value_to_term).collect());
        Ok(Value::term(kind.functional_character(), vec![head, args]))
    }

    fn quote_collect_map(&mut self, target: &Expr, arg: &Expr) -> EvalResult {
        let target = self.to_term_quoted(target)?;
        let key = self.eval(arg)?;
        Ok(Value::term(
            NodeKind::CollectMap.functional_character(),
            vec![target, value_to_term(&key)],
        ))
    }
}
