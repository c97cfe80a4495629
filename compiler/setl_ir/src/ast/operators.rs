//! Operators and their precedence.
//!
//! Precedences only drive re-printing with minimal parentheses: a larger
//! number binds tighter. Leaves (literals, variables, constructors) print
//! at [`PREC_ATOM`].

use crate::kind::NodeKind;

pub const PREC_ASSIGN: u16 = 1000;
pub const PREC_LAMBDA: u16 = 1050;
pub const PREC_PREFIX: u16 = 1800;
pub const PREC_POSTFIX: u16 = 2000;
pub const PREC_ATOM: u16 = 9999;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Sum,
    Difference,
    Product,
    Quotient,
    IntegerDivision,
    Modulo,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    In,
    NotIn,

    // Boolean
    Conjunction,
    Disjunction,
    Implication,
    Equivalence,
    Antivalence,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 20] = [
        Self::Sum,
        Self::Difference,
        Self::Product,
        Self::Quotient,
        Self::IntegerDivision,
        Self::Modulo,
        Self::Power,
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::LessOrEqual,
        Self::GreaterThan,
        Self::GreaterOrEqual,
        Self::In,
        Self::NotIn,
        Self::Conjunction,
        Self::Disjunction,
        Self::Implication,
        Self::Equivalence,
        Self::Antivalence,
    ];

    /// Source-level symbol.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Sum => "+",
            Self::Difference => "-",
            Self::Product => "*",
            Self::Quotient => "/",
            Self::IntegerDivision => "\\",
            Self::Modulo => "%",
            Self::Power => "**",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::Conjunction => "&&",
            Self::Disjunction => "||",
            Self::Implication => "=>",
            Self::Equivalence => "<==>",
            Self::Antivalence => "<!=>",
        }
    }

    pub const fn precedence(self) -> u16 {
        match self {
            Self::Implication => 1100,
            Self::Equivalence | Self::Antivalence => 1150,
            Self::Disjunction => 1200,
            Self::Conjunction => 1300,
            Self::Equal
            | Self::NotEqual
            | Self::LessThan
            | Self::LessOrEqual
            | Self::GreaterThan
            | Self::GreaterOrEqual
            | Self::In
            | Self::NotIn => 1500,
            Self::Sum | Self::Difference => 1600,
            Self::Product | Self::Quotient | Self::IntegerDivision | Self::Modulo => 1700,
            Self::Power => 1900,
        }
    }

    /// `a ** b ** c` is `a ** (b ** c)`, likewise for `=>`.
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Power | Self::Implication)
    }

    /// Operators whose right operand is only evaluated when needed.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::Conjunction | Self::Disjunction | Self::Implication)
    }

    pub const fn node_kind(self) -> NodeKind {
        match self {
            Self::Sum => NodeKind::Sum,
            Self::Difference => NodeKind::Difference,
            Self::Product => NodeKind::Product,
            Self::Quotient => NodeKind::Quotient,
            Self::IntegerDivision => NodeKind::IntegerDivision,
            Self::Modulo => NodeKind::Modulo,
            Self::Power => NodeKind::Power,
            Self::Equal => NodeKind::Equal,
            Self::NotEqual => NodeKind::NotEqual,
            Self::LessThan => NodeKind::LessThan,
            Self::LessOrEqual => NodeKind::LessOrEqual,
            Self::GreaterThan => NodeKind::GreaterThan,
            Self::GreaterOrEqual => NodeKind::GreaterOrEqual,
            Self::In => NodeKind::In,
            Self::NotIn => NodeKind::NotIn,
            Self::Conjunction => NodeKind::Conjunction,
            Self::Disjunction => NodeKind::Disjunction,
            Self::Implication => NodeKind::Implication,
            Self::Equivalence => NodeKind::Equivalence,
            Self::Antivalence => NodeKind::Antivalence,
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Minus,
    /// `!x`
    Not,
    /// `#x`
    Cardinality,
    /// `x!`
    Factorial,
    /// `+/ x`
    SumMembers,
    /// `*/ x`
    ProductMembers,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 6] = [
        Self::Minus,
        Self::Not,
        Self::Cardinality,
        Self::Factorial,
        Self::SumMembers,
        Self::ProductMembers,
    ];

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Not => "!",
            Self::Cardinality => "#",
            Self::Factorial => "!",
            Self::SumMembers => "+/ ",
            Self::ProductMembers => "*/ ",
        }
    }

    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::Factorial)
    }

    pub const fn precedence(self) -> u16 {
        match self {
            Self::Not => 1400,
            Self::Minus | Self::Cardinality | Self::SumMembers | Self::ProductMembers => {
                PREC_PREFIX
            }
            Self::Factorial => PREC_POSTFIX,
        }
    }

    pub const fn node_kind(self) -> NodeKind {
        match self {
            Self::Minus => NodeKind::Minus,
            Self::Not => NodeKind::Not,
            Self::Cardinality => NodeKind::Cardinality,
            Self::Factorial => NodeKind::Factorial,
            Self::SumMembers => NodeKind::SumMembers,
            Self::ProductMembers => NodeKind::ProductMembers,
        }
    }
}

/// Operators of compound assignments (`x += e`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Sum,
    Difference,
    Product,
    Quotient,
    Modulo,
}

impl AssignOp {
    pub const ALL: [AssignOp; 5] = [
        Self::Sum,
        Self::Difference,
        Self::Product,
        Self::Quotient,
        Self::Modulo,
    ];

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Sum => "+=",
            Self::Difference => "-=",
            Self::Product => "*=",
            Self::Quotient => "/=",
            Self::Modulo => "%=",
        }
    }

    /// The binary operator applied before storing.
    pub const fn binary_op(self) -> BinaryOp {
        match self {
            Self::Sum => BinaryOp::Sum,
            Self::Difference => BinaryOp::Difference,
            Self::Product => BinaryOp::Product,
            Self::Quotient => BinaryOp::Quotient,
            Self::Modulo => BinaryOp::Modulo,
        }
    }

    pub const fn node_kind(self) -> NodeKind {
        match self {
            Self::Sum => NodeKind::SumAssignment,
            Self::Difference => NodeKind::DifferenceAssignment,
            Self::Product => NodeKind::ProductAssignment,
            Self::Quotient => NodeKind::QuotientAssignment,
            Self::Modulo => NodeKind::ModuloAssignment,
        }
    }
}
