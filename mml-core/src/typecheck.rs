//! Type checking for MML.
//!
//! The checker walks the program post-order, records a type for every
//! expression and declaration in a [`TypeTable`], and collects every
//! [`TypeError`] it finds instead of stopping at the first one.

use std::collections::HashMap;

use la_arena::ArenaMap;

use crate::ast::{AstArena, BinOp, NodeId, NodeKind};
use crate::error::TypeError;
use crate::span::Span;
use crate::types::Type;

/// Resolved types, keyed by node.
///
/// Kept beside the AST rather than inside it; nodes the checker never
/// typed (statements, or everything after a failed check) read back as
/// `Type::Unknown`.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: ArenaMap<NodeId, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    pub fn get(&self, id: NodeId) -> Type {
        self.types.get(id).copied().unwrap_or(Type::Unknown)
    }

    fn record(&mut self, id: NodeId, ty: Type) {
        debug_assert!(self.types.get(id).is_none(), "node typed twice");
        self.types.insert(id, ty);
    }
}

/// Result of checking one program.
#[derive(Debug)]
pub struct TypeCheckResult {
    pub types: TypeTable,
    pub errors: Vec<TypeError>,
}

impl TypeCheckResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Public entry point: type-check a `Program` node.
pub fn check(arena: &AstArena, program: NodeId) -> TypeCheckResult {
    let mut checker = TypeChecker::new(arena);
    checker.check_node(program);
    if checker.errors.is_empty() {
        log::debug!("type check passed");
    } else {
        log::debug!("type check found {} error(s)", checker.errors.len());
    }
    TypeCheckResult {
        types: checker.types,
        errors: checker.errors,
    }
}

/// Flat variable environment. Redeclaration overwrites.
#[derive(Debug, Default)]
struct TypeEnv {
    entries: HashMap<String, Type>,
}

impl TypeEnv {
    fn insert(&mut self, name: &str, ty: Type) {
        self.entries.insert(name.to_string(), ty);
    }

    fn lookup(&self, name: &str) -> Option<Type> {
        self.entries.get(name).copied()
    }
}

struct TypeChecker<'a> {
    arena: &'a AstArena,
    env: TypeEnv,
    types: TypeTable,
    errors: Vec<TypeError>,
}

impl<'a> TypeChecker<'a> {
    fn new(arena: &'a AstArena) -> Self {
        TypeChecker {
            arena,
            env: TypeEnv::default(),
            types: TypeTable::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, err: TypeError) {
        log::trace!("{err}");
        self.errors.push(err);
    }

    fn check_node(&mut self, id: NodeId) -> Type {
        let arena = self.arena;
        let node = &arena[id];
        let span = node.span;
        let ty = match &node.kind {
            NodeKind::Program { statements } => {
                for &stmt in statements {
                    self.check_node(stmt);
                }
                return Type::Unknown;
            }
            NodeKind::Print { expr } => {
                self.check_node(*expr);
                return Type::Unknown;
            }
            NodeKind::VarDecl {
                name,
                declared,
                init,
            } => self.check_var_decl(span, name, *declared, *init),
            NodeKind::Binary { op, lhs, rhs } => {
                let left = self.check_node(*lhs);
                let right = self.check_node(*rhs);
                self.infer_binary(span, *op, left, right)
            }
            NodeKind::Int(_) => Type::Int,
            NodeKind::Float(_) => Type::Float,
            NodeKind::Vector(_) => Type::Vec,
            NodeKind::Ident(name) => match self.env.lookup(name) {
                Some(ty) => ty,
                None => {
                    self.error(TypeError::UndefinedVariable {
                        name: name.clone(),
                        span,
                    });
                    Type::Unknown
                }
            },
        };
        self.types.record(id, ty);
        ty
    }

    fn check_var_decl(&mut self, span: Span, name: &str, declared: Type, init: NodeId) -> Type {
        let found = self.check_node(init);
        if !found.is_unknown() && found != declared {
            self.error(TypeError::Mismatch {
                name: name.to_string(),
                expected: declared,
                found,
                span,
            });
        }
        self.env.insert(name, declared);
        declared
    }

    fn infer_binary(&mut self, span: Span, op: BinOp, left: Type, right: Type) -> Type {
        if let Some(ty) = binary_result(op, left, right) {
            return ty;
        }
        // Operands that already failed were reported where they failed.
        if left.is_unknown() || right.is_unknown() {
            return Type::Unknown;
        }
        self.error(TypeError::InvalidOperands {
            op,
            left,
            right,
            span,
        });
        Type::Unknown
    }
}

/// Promotion rule for `left op right`; `None` when the combination is
/// not allowed.
pub fn binary_result(op: BinOp, left: Type, right: Type) -> Option<Type> {
    match (left, right) {
        (Type::Int, Type::Int) => Some(Type::Int),
        (l, r) if l.is_numeric() && r.is_numeric() => Some(Type::Float),
        (Type::Vec, Type::Vec) => Some(Type::Vec),
        (Type::Vec, s) | (s, Type::Vec) if s.is_numeric() && op.allows_scalar_mix() => {
            Some(Type::Vec)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn check_source(source: &str) -> (AstArena, NodeId, TypeCheckResult) {
        let tokens = tokenize(source);
        let mut arena = AstArena::new();
        let program = parse(&tokens, &mut arena).expect("parse");
        let result = check(&arena, program);
        (arena, program, result)
    }

    /// Type of the initializer of the `index`-th statement.
    fn init_type(source: &str, index: usize) -> Type {
        let (arena, program, result) = check_source(source);
        let stmt = arena.statements(program)[index];
        match arena[stmt].kind {
            NodeKind::VarDecl { init, .. } | NodeKind::Print { expr: init } => {
                result.types.get(init)
            }
            _ => panic!("unexpected statement"),
        }
    }

    #[test]
    fn literal_programs_check() {
        let (_, _, result) =
            check_source("let a: int = 1\nlet b: float = 2.5\nlet c: vec = [1, 2]\nprint(c)");
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn numeric_promotion() {
        assert_eq!(init_type("print(1 + 2)", 0), Type::Int);
        assert_eq!(init_type("print(1 + 2.0)", 0), Type::Float);
        assert_eq!(init_type("print(1.5 / 3)", 0), Type::Float);
        assert_eq!(init_type("print(1.5 * 2.5)", 0), Type::Float);
    }

    #[test]
    fn vec_vec_supports_all_operators() {
        for op in ["+", "-", "*", "/"] {
            let source = format!("let v: vec = [1, 2] {op} [3, 4]");
            let (_, _, result) = check_source(&source);
            assert!(result.is_ok(), "operator {op}: {:?}", result.errors);
            assert_eq!(init_type(&source, 0), Type::Vec);
        }
    }

    #[test]
    fn vec_scalar_add_and_mul_are_vec() {
        for source in [
            "let v: vec = [1, 2] + 1",
            "let v: vec = [1, 2] * 2",
            "let v: vec = 2.5 * [1, 2]",
            "let v: vec = 1 + [1, 2]",
        ] {
            let (_, _, result) = check_source(source);
            assert!(result.is_ok(), "{source}: {:?}", result.errors);
            assert_eq!(init_type(source, 0), Type::Vec);
        }
    }

    #[test]
    fn vec_scalar_sub_and_div_are_rejected() {
        for source in [
            "let v: vec = [1, 2] - 1",
            "let v: vec = [1, 2] / 2.0",
            "let v: vec = 1 - [1, 2]",
        ] {
            let (_, _, result) = check_source(source);
            assert_eq!(result.errors.len(), 1, "{source}");
            assert!(matches!(
                result.errors[0],
                TypeError::InvalidOperands { left, right, .. }
                    if left.is_vec() != right.is_vec()
            ));
            assert_eq!(init_type(source, 0), Type::Unknown);
        }
    }

    #[test]
    fn undefined_variable_is_reported() {
        let (_, _, result) = check_source("print(x)");
        assert!(!result.is_ok());
        assert_eq!(
            result.errors,
            vec![TypeError::UndefinedVariable {
                name: "x".into(),
                span: Span::new(1, 7),
            }]
        );
    }

    #[test]
    fn unknown_operands_do_not_cascade() {
        let (_, _, result) = check_source("print(x + [1] - 2)");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], TypeError::UndefinedVariable { .. }));
    }

    #[test]
    fn mismatch_still_registers_declared_type() {
        let source = "let x: int = [1, 2]\nlet y: vec = x";
        let (_, _, result) = check_source(source);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            &result.errors[0],
            TypeError::Mismatch { name, expected: Type::Int, found: Type::Vec, .. } if name == "x"
        ));
        assert!(matches!(
            &result.errors[1],
            TypeError::Mismatch { expected: Type::Vec, found: Type::Int, .. }
        ));
        assert_eq!(init_type(source, 1), Type::Int);
    }

    #[test]
    fn mismatch_is_not_reported_for_unknown_initializer() {
        let (_, _, result) = check_source("let x: int = y");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], TypeError::UndefinedVariable { .. }));
    }

    #[test]
    fn last_declaration_wins() {
        let source = "let x: int = 1\nlet x: int = 2\nlet x: float = 3.0\nprint(x)";
        let (_, _, result) = check_source(source);
        assert!(result.is_ok());
        assert_eq!(init_type(source, 3), Type::Float);
    }

    #[test]
    fn declaration_nodes_get_declared_type() {
        let (arena, program, result) = check_source("let x: float = 1.0");
        let decl = arena.statements(program)[0];
        assert_eq!(result.types.get(decl), Type::Float);
        assert_eq!(result.types.get(program), Type::Unknown);
    }

    #[test]
    fn checking_continues_after_errors() {
        let (_, _, result) = check_source("print(a)\nlet b: int = 1.5\nprint([1] / 2)");
        assert_eq!(result.errors.len(), 3);
        let codes: Vec<&str> = result.errors.iter().map(TypeError::code).collect();
        assert_eq!(codes, vec!["E0202", "E0201", "E0203"]);
    }

    #[test]
    fn empty_vector_is_vec() {
        assert_eq!(init_type("print([])", 0), Type::Vec);
    }

    #[test]
    fn every_expression_is_typed_after_success() {
        let (arena, program, result) =
            check_source("let a: vec = [1, 2] * 3 + [4, 5]\nprint(a / a)\nprint(1 - 2 * 3.0)");
        assert!(result.is_ok());
        let mut pending: Vec<NodeId> = arena.statements(program).to_vec();
        while let Some(id) = pending.pop() {
            match &arena[id].kind {
                NodeKind::Print { expr } => pending.push(*expr),
                NodeKind::VarDecl { init, .. } => {
                    assert!(!result.types.get(id).is_unknown());
                    pending.push(*init);
                }
                NodeKind::Binary { lhs, rhs, .. } => {
                    assert!(!result.types.get(id).is_unknown());
                    pending.push(*lhs);
                    pending.push(*rhs);
                }
                _ => assert!(!result.types.get(id).is_unknown()),
            }
        }
    }

    #[test]
    fn promotion_table() {
        assert_eq!(binary_result(BinOp::Div, Type::Int, Type::Int), Some(Type::Int));
        assert_eq!(binary_result(BinOp::Sub, Type::Float, Type::Int), Some(Type::Float));
        assert_eq!(binary_result(BinOp::Div, Type::Vec, Type::Vec), Some(Type::Vec));
        assert_eq!(binary_result(BinOp::Mul, Type::Int, Type::Vec), Some(Type::Vec));
        assert_eq!(binary_result(BinOp::Sub, Type::Vec, Type::Float), None);
        assert_eq!(binary_result(BinOp::Add, Type::Unknown, Type::Int), None);
    }
}
