use core::fmt::Write;

use crate::ast::AstArena;
use crate::codegen;
use crate::error::CoreError;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::typecheck::check;

/// Knobs for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Capacity in bytes of the arena the generated program allocates
    /// its vectors from.
    pub arena_bytes: usize,
}

pub const DEFAULT_ARENA_BYTES: usize = 4096;

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            arena_bytes: DEFAULT_ARENA_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationArtifact {
    /// Complete C++ translation unit.
    pub cpp: String,
    pub token_count: usize,
    pub statement_count: usize,
}

/// Run the whole pipeline: lex, parse, check, generate.
///
/// Code generation only runs when checking found no errors.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompilationArtifact, CoreError> {
    let tokens = tokenize(source);
    log::info!("lexing produced {} tokens", tokens.len());

    let mut arena = AstArena::new();
    let program = parse(&tokens, &mut arena)?;
    let statement_count = arena.statements(program).len();
    log::info!("parsed {statement_count} statements");

    let checked = check(&arena, program);
    if !checked.is_ok() {
        log::info!("type checking failed");
        return Err(CoreError::TypeCheck(checked.errors));
    }
    log::info!("type checking passed");

    let cpp = codegen::generate_with(&arena, &checked.types, program, options);
    log::info!("generated {} bytes of C++", cpp.len());

    Ok(CompilationArtifact {
        cpp,
        token_count: tokens.len(),
        statement_count,
    })
}

/// One line per token: `line:column Kind 'text'`.
pub fn dump_tokens(source: &str) -> String {
    let mut out = String::new();
    for token in tokenize(source) {
        let _ = writeln!(out, "{} {:?} '{}'", token.span, token.kind, token.text);
    }
    out
}

/// Parse `source` and render each statement in prefix form.
///
/// Type errors are not fatal here; only parse errors are.
pub fn dump_ast(source: &str) -> Result<String, CoreError> {
    let tokens = tokenize(source);
    let mut arena = AstArena::new();
    let program = parse(&tokens, &mut arena)?;
    let mut out = arena.render(program);
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
