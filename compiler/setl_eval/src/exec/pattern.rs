//! `match` statements.
//!
//! The subject is converted to a term once; every branch pattern is the
//! term of its expression, so `x` in a pattern is `^variable("x")` and
//! binds. A branch is taken when the structural match succeeds and its
//! guard holds; the guard only runs after a successful match, in the frame
//! that holds the match bindings.

use setl_ir::{Block, Expr, MatchBranch};
use setl_patterns::{
    expr_to_term, match_split_list, match_term, value_to_term, ControlAction, ExecResult,
    MatchResult, Value,
};

use crate::Interpreter;

impl Interpreter {
    pub(crate) fn exec_match(&mut self, subject: &Expr, branches: &[MatchBranch]) -> ExecResult {
        let subject = value_to_term(&self.eval(subject)?);
        for branch in branches {
            let taken = match branch {
                MatchBranch::Case {
                    patterns,
                    condition,
                    body,
                } => self.try_case(patterns, condition.as_ref(), body, &subject)?,
                MatchBranch::SplitList {
                    heads,
                    rest,
                    condition,
                    body,
                } => {
                    let heads: Vec<Value> = heads.iter().map(expr_to_term).collect();
                    let result = match_split_list(&heads, &expr_to_term(rest), &subject);
                    result.is_match() && self.try_branch(result, condition.as_ref(), body)?
                }
                MatchBranch::Default { body } => {
                    return self.with_env_scope(|scoped| scoped.exec_block(body));
                }
            };
            if taken {
                return Ok(());
            }
        }
        Ok(())
    }

    /// `case p1, p2 | guard:`; the first pattern that matches with a
    /// satisfied guard takes the branch.
    fn try_case(
        &mut self,
        patterns: &[Expr],
        condition: Option<&Expr>,
        body: &Block,
        subject: &Value,
    ) -> Result<bool, ControlAction> {
        for pattern in patterns {
            let result = match_term(&expr_to_term(pattern), subject);
            if result.is_match() && self.try_branch(result, condition, body)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Check the guard with the match bindings visible and run the body if
    /// it holds. Answers whether the branch was taken.
    fn try_branch(
        &mut self,
        result: MatchResult,
        condition: Option<&Expr>,
        body: &Block,
    ) -> Result<bool, ControlAction> {
        self.with_bindings(result.into_bindings(), |scoped| {
            if let Some(condition) = condition {
                if !scoped.eval_condition(condition)? {
                    return Ok(false);
                }
            }
            scoped.exec_block(body)?;
            Ok(true)
        })
    }
}
