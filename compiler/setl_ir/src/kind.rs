//! Node kinds and their functional characters.
//!
//! Every kind of code node converts to a term whose functional character is
//! `"^"` followed by the kind's name with a lower-cased first letter:
//! `IfThen` becomes `^ifThen`. Adding a variant to [`NodeKind`] gives it a
//! unique functional character automatically.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Functional character derived from a kind name.
///
/// `functional_character("MatchSplitListBranch") == "^matchSplitListBranch"`
pub fn functional_character(kind_name: &str) -> String {
    let mut out = String::with_capacity(kind_name.len() + 1);
    out.push('^');
    let mut chars = kind_name.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }
    out.extend(chars);
    out
}

macro_rules! node_kinds {
    (
        expressions { $($expr:ident),* $(,)? }
        statements { $($stmt:ident),* $(,)? }
    ) => {
        /// Every kind of code node that has a term representation.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum NodeKind {
            $($expr,)*
            $($stmt,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$expr,)* $(NodeKind::$stmt,)*];

            /// Kind name as written in the enum.
            pub const fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$expr => stringify!($expr),)*
                    $(NodeKind::$stmt => stringify!($stmt),)*
                }
            }

            /// Whether terms of this kind reconstruct to statements.
            pub const fn is_statement(self) -> bool {
                match self {
                    $(NodeKind::$expr => false,)*
                    $(NodeKind::$stmt => true,)*
                }
            }
        }
    };
}

node_kinds! {
    expressions {
        Variable,
        Om,
        // Binary operators
        Sum,
        Difference,
        Product,
        Quotient,
        IntegerDivision,
        Modulo,
        Power,
        Equal,
        NotEqual,
        LessThan,
        LessOrEqual,
        GreaterThan,
        GreaterOrEqual,
        In,
        NotIn,
        Conjunction,
        Disjunction,
        Implication,
        Equivalence,
        Antivalence,
        // Unary operators
        Minus,
        Not,
        Cardinality,
        Factorial,
        SumMembers,
        ProductMembers,
        // Assignments
        Assignment,
        SumAssignment,
        DifferenceAssignment,
        ProductAssignment,
        QuotientAssignment,
        ModuloAssignment,
        // Access
        Call,
        CollectionAccess,
        AccessRange,
        CollectMap,
        MemberAccess,
        // Collections
        ListConstructor,
        SetConstructor,
        Range,
        Iteration,
        Iterator,
        // Quantifiers
        Exists,
        Forall,
        // Definitions
        Procedure,
        Closure,
        LambdaProcedure,
        Parameter,
        RwParameter,
        Class,
        Quote,
    }
    statements {
        Block,
        IfThen,
        IfThenBranch,
        IfThenElseIfBranch,
        IfThenElseBranch,
        Switch,
        SwitchCaseBranch,
        SwitchDefaultBranch,
        Match,
        MatchCaseBranch,
        MatchSplitListBranch,
        MatchDefaultBranch,
        For,
        While,
        DoWhile,
        Return,
        Break,
        Continue,
        TryCatch,
        Throw,
        Check,
        Backtrack,
    }
}

static FUNCTIONAL_CHARACTERS: LazyLock<Vec<String>> = LazyLock::new(|| {
    NodeKind::ALL
        .iter()
        .map(|kind| functional_character(kind.name()))
        .collect()
});

static BY_FUNCTIONAL_CHARACTER: LazyLock<FxHashMap<&'static str, NodeKind>> =
    LazyLock::new(|| {
        NodeKind::ALL
            .iter()
            .map(|&kind| (kind.functional_character(), kind))
            .collect()
    });

impl NodeKind {
    /// `^` + kind name with lower-cased first letter.
    pub fn functional_character(self) -> &'static str {
        FUNCTIONAL_CHARACTERS[self as usize].as_str()
    }

    /// Inverse of [`NodeKind::functional_character`].
    pub fn from_functional_character(fc: &str) -> Option<NodeKind> {
        BY_FUNCTIONAL_CHARACTER.get(fc).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn derives_lower_camel_case() {
        assert_eq!(NodeKind::IfThen.functional_character(), "^ifThen");
        assert_eq!(
            NodeKind::MatchSplitListBranch.functional_character(),
            "^matchSplitListBranch"
        );
        assert_eq!(NodeKind::Check.functional_character(), "^check");
        assert_eq!(NodeKind::Om.functional_character(), "^om");
    }

    #[test]
    fn functional_characters_are_unique() {
        let all: FxHashSet<&str> = NodeKind::ALL
            .iter()
            .map(|k| k.functional_character())
            .collect();
        assert_eq!(all.len(), NodeKind::ALL.len());
    }

    #[test]
    fn lookup_is_inverse() {
        for &kind in NodeKind::ALL {
            assert_eq!(
                NodeKind::from_functional_character(kind.functional_character()),
                Some(kind)
            );
        }
        assert_eq!(NodeKind::from_functional_character("F"), None);
    }

    #[test]
    fn statement_split() {
        assert!(NodeKind::Block.is_statement());
        assert!(NodeKind::Backtrack.is_statement());
        assert!(!NodeKind::Variable.is_statement());
        assert!(!NodeKind::Quote.is_statement());
    }
}
