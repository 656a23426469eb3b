//! C++ backend.
//!
//! Lowers a checked program into a standalone C++ translation unit: the
//! fixed runtime from [`crate::runtime`] followed by a `main` that owns
//! the program's arena and runs one statement group per source
//! statement.
//!
//! Source variables are renamed to `v_<name>_<n>`, where `n` counts
//! earlier declarations of the same name. Redeclarations become fresh C++
//! variables, and source names never meet C++ keywords or the generator's
//! own identifiers.
//!
//! The generator trusts the type table. Running it on a program that
//! did not pass [`crate::typecheck::check`] yields meaningless output.

use core::fmt::Write;
use std::collections::HashMap;

use crate::ast::{AstArena, BinOp, NodeId, NodeKind};
use crate::compiler::CompileOptions;
use crate::runtime;
use crate::typecheck::TypeTable;
use crate::types::Type;

const INDENT: &str = "    ";

/// Generate C++ for `program` with default options.
pub fn generate(arena: &AstArena, types: &TypeTable, program: NodeId) -> String {
    generate_with(arena, types, program, &CompileOptions::default())
}

pub fn generate_with(
    arena: &AstArena,
    types: &TypeTable,
    program: NodeId,
    options: &CompileOptions,
) -> String {
    let mut generator = CodeGen {
        arena,
        types,
        out: String::new(),
        temp_counter: 0,
        versions: HashMap::new(),
    };

    generator.out.push_str(runtime::PRELUDE);
    generator.out.push_str("\nint main() {\n");
    let _ = writeln!(generator.out, "{INDENT}Arena arena({});\n", options.arena_bytes);

    for &stmt in arena.statements(program) {
        generator.statement(stmt);
    }

    generator.out.push_str("\n    return 0;\n}\n");
    log::debug!(
        "generated {} bytes of C++ ({} temporaries)",
        generator.out.len(),
        generator.temp_counter
    );
    generator.out
}

struct CodeGen<'a> {
    arena: &'a AstArena,
    types: &'a TypeTable,
    out: String,
    temp_counter: usize,
    /// Number of declarations seen so far, per source name.
    versions: HashMap<String, usize>,
}

impl<'a> CodeGen<'a> {
    fn statement(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena[id].kind {
            NodeKind::VarDecl {
                name,
                declared,
                init,
            } => {
                // The initializer still sees the previous declaration.
                let value = self.expression(*init);
                let variable = self.declare(name);
                let _ = writeln!(self.out, "{INDENT}{} {variable} = {value};", declared.cpp_name());
            }
            NodeKind::Print { expr } => {
                let value = self.expression(*expr);
                if self.types.get(*expr) == Type::Vec {
                    let _ = writeln!(self.out, "{INDENT}{}({value});", runtime::PRINT_VEC);
                } else {
                    let _ = writeln!(self.out, "{INDENT}std::cout << {value} << std::endl;");
                }
            }
            other => {
                debug_assert!(false, "not a statement: {other:?}");
            }
        }
    }

    /// Lower an expression to inline C++ text. Vector literals first
    /// emit the statements that build their temporary.
    fn expression(&mut self, id: NodeId) -> String {
        let arena = self.arena;
        match &arena[id].kind {
            NodeKind::Int(value) => value.to_string(),
            NodeKind::Float(value) => format!("{}f", float_text(*value)),
            NodeKind::Vector(values) => self.vector_literal(values),
            NodeKind::Ident(name) => self.variable(name),
            NodeKind::Binary { op, lhs, rhs } => {
                let left = self.expression(*lhs);
                let right = self.expression(*rhs);
                self.binary(*op, self.types.get(*lhs), left, self.types.get(*rhs), right)
            }
            other => {
                debug_assert!(false, "not an expression: {other:?}");
                String::new()
            }
        }
    }

    fn binary(&self, op: BinOp, left_ty: Type, left: String, right_ty: Type, right: String) -> String {
        if left_ty.is_vec() && right_ty.is_vec() {
            let func = match op {
                BinOp::Add => runtime::VEC_ADD,
                BinOp::Sub => runtime::VEC_SUB,
                BinOp::Mul => runtime::VEC_MUL,
                BinOp::Div => runtime::VEC_DIV,
            };
            return format!("{func}(arena, {left}, {right})");
        }

        if (left_ty.is_vec() || right_ty.is_vec()) && op.allows_scalar_mix() {
            let (vector, scalar) = if left_ty.is_vec() {
                (left, right)
            } else {
                (right, left)
            };
            let func = match op {
                BinOp::Mul => runtime::VEC_SCALAR_MUL,
                _ => runtime::VEC_SCALAR_ADD,
            };
            return format!("{func}(arena, {vector}, {scalar})");
        }

        format!("({left} {op} {right})")
    }

    fn vector_literal(&mut self, values: &[f32]) -> String {
        let temp = self.new_temp();
        let _ = writeln!(self.out, "{INDENT}Vec {temp}(arena, {});", values.len());
        for (index, value) in values.iter().enumerate() {
            let _ = writeln!(self.out, "{INDENT}{temp}[{index}] = {}f;", float_text(*value));
        }
        temp
    }

    fn declare(&mut self, name: &str) -> String {
        let version = self.versions.entry(name.to_string()).or_insert(0);
        let variable = cpp_variable(name, *version);
        *version += 1;
        variable
    }

    /// C++ name of the latest declaration of `name`.
    fn variable(&self, name: &str) -> String {
        let version = self.versions.get(name).map_or(0, |count| count.saturating_sub(1));
        cpp_variable(name, version)
    }

    fn new_temp(&mut self) -> String {
        let name = format!("_t{}", self.temp_counter);
        self.temp_counter += 1;
        log::trace!("allocated temporary {name}");
        name
    }
}

fn cpp_variable(name: &str, version: usize) -> String {
    format!("v_{name}_{version}")
}

/// Fixed six-decimal rendering, the same text `std::to_string(float)`
/// produces.
fn float_text(value: f32) -> String {
    format!("{value:.6}")
}
