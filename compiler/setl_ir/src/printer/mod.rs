//! Re-printing code trees as SetlX source.
//!
//! Parentheses are inserted only where the precedence of a child is lower
//! than its position requires. Blocks indent by four spaces.

use std::fmt::{self, Write};

use crate::ast::operators::{PREC_ASSIGN, PREC_LAMBDA, PREC_POSTFIX};
use crate::ast::{
    Block, ClassDef, CollectionBuilder, Expr, ExprKind, IterBinding, Literal, MatchBranch, Param,
    ProcedureDef, ProcedureKind, Stmt, StmtKind,
};
use crate::escape::{format_float, quote_string};
use setl_stack::ensure_sufficient_stack;

const INDENT: &str = "    ";

struct Printer<'a> {
    out: &'a mut String,
    indent: usize,
}

impl Printer<'_> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| self.expr_inner(expr));
    }

    /// Print `expr`, parenthesised if it binds weaker than `min_prec`.
    fn child(&mut self, expr: &Expr, min_prec: u16) {
        if expr.precedence() < min_prec {
            self.push("(");
            self.expr(expr);
            self.push(")");
        } else {
            self.expr(expr);
        }
    }

    fn list(&mut self, exprs: &[Expr]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(e);
        }
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Variable(name) => self.push(name.as_str()),
            ExprKind::Ignore => self.push("_"),
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let (lmin, rmin) = if op.is_right_associative() {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                self.child(left, lmin);
                self.push(" ");
                self.push(op.as_symbol());
                self.push(" ");
                self.child(right, rmin);
            }
            ExprKind::Unary { op, operand } => {
                if op.is_postfix() {
                    self.child(operand, op.precedence());
                    self.push(op.as_symbol());
                } else {
                    self.push(op.as_symbol());
                    self.child(operand, op.precedence());
                }
            }
            ExprKind::Assign { target, value } => {
                self.child(target, PREC_POSTFIX);
                self.push(" := ");
                self.child(value, PREC_ASSIGN);
            }
            ExprKind::CompoundAssign { op, target, value } => {
                self.child(target, PREC_POSTFIX);
                self.push(" ");
                self.push(op.as_symbol());
                self.push(" ");
                self.child(value, PREC_ASSIGN);
            }
            ExprKind::Call { callee, args } => {
                self.child(callee, PREC_POSTFIX);
                self.push("(");
                self.list(args);
                self.push(")");
            }
            ExprKind::CollectionAccess { target, args } => {
                self.child(target, PREC_POSTFIX);
                self.push("[");
                self.list(args);
                self.push("]");
            }
            ExprKind::AccessRange { target, low, high } => {
                self.child(target, PREC_POSTFIX);
                self.push("[");
                if let Some(low) = low {
                    self.expr(low);
                }
                self.push("..");
                if let Some(high) = high {
                    self.expr(high);
                }
                self.push("]");
            }
            ExprKind::CollectMap { target, arg } => {
                self.child(target, PREC_POSTFIX);
                self.push("{");
                self.expr(arg);
                self.push("}");
            }
            ExprKind::MemberAccess { target, member } => {
                self.child(target, PREC_POSTFIX);
                self.push(".");
                self.push(member.as_str());
            }
            ExprKind::List(builder) => self.builder(builder, "[", "]"),
            ExprKind::Set(builder) => self.builder(builder, "{", "}"),
            ExprKind::Exists {
                iterators,
                condition,
            } => self.quantifier("exists", iterators, condition),
            ExprKind::Forall {
                iterators,
                condition,
            } => self.quantifier("forall", iterators, condition),
            ExprKind::Procedure(def) => self.procedure(def),
            ExprKind::Class(def) => self.class(def),
            ExprKind::Term {
                functional_character,
                args,
            } => {
                let fc = functional_character.as_str();
                if !fc.starts_with(|c: char| c.is_ascii_uppercase()) {
                    self.push("@");
                }
                self.push(fc);
                self.push("(");
                self.list(args);
                self.push(")");
            }
            ExprKind::Quote(inner) => {
                self.push("@(");
                self.expr(inner);
                self.push(")");
            }
        }
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Om => self.push("om"),
            Literal::Bool(b) => self.push(if *b { "true" } else { "false" }),
            Literal::Integer(i) => {
                let _ = write!(self.out, "{i}");
            }
            Literal::Float(f) => self.push(&format_float(*f)),
            Literal::Str(s) => self.push(&quote_string(s)),
        }
    }

    fn builder(&mut self, builder: &CollectionBuilder, open: &str, close: &str) {
        self.push(open);
        match builder {
            CollectionBuilder::Explicit { elements, .. } => self.list(elements),
            CollectionBuilder::Range {
                first,
                second,
                last,
            } => {
                self.expr(first);
                if let Some(second) = second {
                    self.push(", ");
                    self.expr(second);
                }
                self.push("..");
                self.expr(last);
            }
            CollectionBuilder::Iteration {
                element,
                iterators,
                condition,
            } => {
                self.expr(element);
                self.push(" : ");
                self.iterators(iterators);
                if let Some(condition) = condition {
                    self.push(" | ");
                    self.expr(condition);
                }
            }
        }
        self.push(close);
    }

    fn iterators(&mut self, iterators: &[IterBinding]) {
        for (i, it) in iterators.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(&it.target);
            self.push(" in ");
            self.expr(&it.collection);
        }
    }

    fn quantifier(&mut self, keyword: &str, iterators: &[IterBinding], condition: &Expr) {
        self.push(keyword);
        self.push(" (");
        self.iterators(iterators);
        self.push(" | ");
        self.expr(condition);
        self.push(")");
    }

    fn params(&mut self, params: &[Param]) {
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if p.is_read_write() {
                self.push("rw ");
            }
            self.push(p.name.as_str());
        }
    }

    fn procedure(&mut self, def: &ProcedureDef) {
        if let Some(body) = def.lambda_body() {
            if let [p] = def.params.as_slice() {
                self.push(p.name.as_str());
            } else {
                self.push("[");
                self.params(&def.params);
                self.push("]");
            }
            self.push(" |-> ");
            self.child(body, PREC_LAMBDA);
            return;
        }
        self.push(match def.kind {
            ProcedureKind::Closure => "closure",
            ProcedureKind::Procedure | ProcedureKind::Lambda => "procedure",
        });
        self.push("(");
        self.params(&def.params);
        self.push(") ");
        self.block(&def.body);
    }

    fn class(&mut self, def: &ClassDef) {
        self.push("class (");
        self.params(&def.params);
        self.push(") ");
        self.block(&def.body);
    }

    fn block(&mut self, block: &Block) {
        self.push("{");
        self.indent += 1;
        for stmt in &block.stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    /// Statements of a `case`/`default` arm, one level deeper.
    fn arm_body(&mut self, block: &Block) {
        self.indent += 1;
        for stmt in &block.stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.stmt_inner(stmt));
    }

    fn stmt_inner(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                self.expr(e);
                self.push(";");
            }
            StmtKind::IfThen(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.push(" else ");
                    }
                    if let Some(cond) = &branch.condition {
                        self.push("if (");
                        self.expr(cond);
                        self.push(") ");
                    }
                    self.block(&branch.body);
                }
            }
            StmtKind::Switch(branches) => {
                self.push("switch {");
                self.indent += 1;
                for branch in branches {
                    self.newline();
                    if let Some(cond) = &branch.condition {
                        self.push("case ");
                        self.expr(cond);
                        self.push(":");
                    } else {
                        self.push("default:");
                    }
                    self.arm_body(&branch.body);
                }
                self.indent -= 1;
                self.newline();
                self.push("}");
            }
            StmtKind::Match { subject, branches } => {
                self.push("match (");
                self.expr(subject);
                self.push(") {");
                self.indent += 1;
                for branch in branches {
                    self.newline();
                    self.match_branch(branch);
                }
                self.indent -= 1;
                self.newline();
                self.push("}");
            }
            StmtKind::For {
                iterators,
                condition,
                body,
            } => {
                self.push("for (");
                self.iterators(iterators);
                if let Some(cond) = condition {
                    self.push(" | ");
                    self.expr(cond);
                }
                self.push(") ");
                self.block(body);
            }
            StmtKind::While { condition, body } => {
                self.push("while (");
                self.expr(condition);
                self.push(") ");
                self.block(body);
            }
            StmtKind::DoWhile { body, condition } => {
                self.push("do ");
                self.block(body);
                self.push(" while (");
                self.expr(condition);
                self.push(");");
            }
            StmtKind::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";");
            }
            StmtKind::Break => self.push("break;"),
            StmtKind::Continue => self.push("continue;"),
            StmtKind::TryCatch {
                body,
                error_var,
                recovery,
            } => {
                self.push("try ");
                self.block(body);
                self.push(" catch (");
                self.push(error_var.as_str());
                self.push(") ");
                self.block(recovery);
            }
            StmtKind::Throw(value) => {
                self.push("throw(");
                self.expr(value);
                self.push(");");
            }
            StmtKind::Check { body, recovery } => {
                self.push("check ");
                self.block(body);
                if let Some(recovery) = recovery {
                    self.push(" afterBacktrack ");
                    self.block(recovery);
                }
            }
            StmtKind::Backtrack => self.push("backtrack;"),
        }
    }

    fn match_branch(&mut self, branch: &MatchBranch) {
        match branch {
            MatchBranch::Case {
                patterns,
                condition,
                body,
            } => {
                self.push("case ");
                self.list(patterns);
                if let Some(cond) = condition {
                    self.push(" | ");
                    self.expr(cond);
                }
                self.push(":");
                self.arm_body(body);
            }
            MatchBranch::SplitList {
                heads,
                rest,
                condition,
                body,
            } => {
                self.push("case [");
                self.list(heads);
                self.push(" | ");
                self.expr(rest);
                self.push("]");
                if let Some(cond) = condition {
                    self.push(" | ");
                    self.expr(cond);
                }
                self.push(":");
                self.arm_body(body);
            }
            MatchBranch::Default { body } => {
                self.push("default:");
                self.arm_body(body);
            }
        }
    }
}

/// Source text of an expression.
pub fn expr_to_string(expr: &Expr) -> String {
    let mut out = String::new();
    Printer {
        out: &mut out,
        indent: 0,
    }
    .expr(expr);
    out
}

/// Source text of a statement, nested blocks indented from `indent`.
pub fn stmt_to_string(stmt: &Stmt, indent: usize) -> String {
    let mut out = String::new();
    Printer {
        out: &mut out,
        indent,
    }
    .stmt(stmt);
    out
}

/// Source text of a procedure, closure or lambda definition.
pub fn procedure_to_string(def: &ProcedureDef) -> String {
    let mut out = String::new();
    Printer {
        out: &mut out,
        indent: 0,
    }
    .procedure(def);
    out
}

/// Source text of a class definition.
pub fn class_to_string(def: &ClassDef) -> String {
    let mut out = String::new();
    Printer {
        out: &mut out,
        indent: 0,
    }
    .class(def);
    out
}

/// Statements of a block, one per line, without surrounding braces.
pub fn block_to_string(block: &Block) -> String {
    let mut out = String::new();
    let mut printer = Printer {
        out: &mut out,
        indent: 0,
    };
    for (i, stmt) in block.stmts.iter().enumerate() {
        if i > 0 {
            printer.newline();
        }
        printer.stmt(stmt);
    }
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&expr_to_string(self))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stmt_to_string(self, 0))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&block_to_string(self))
    }
}

#[cfg(test)]
mod tests;
