//! Core of the MML compiler.
//!
//! MML is a tiny language of `let` declarations and `print` statements
//! over ints, floats and fixed-length float vectors. This crate turns
//! MML source text into a standalone C++ program:
//!
//!   source .mml
//!     -> lexer     (tokens)
//!     -> parser    (arena-allocated AST)
//!     -> typecheck (type table + collected errors)
//!     -> codegen   (C++ text with the vector runtime)
//!
//! The crate performs no file or process I/O. Reading sources, writing
//! the generated code and invoking a C++ compiler belong to front ends
//! such as `mml-cli`.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod diagnostic;
pub mod error;
pub mod span;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod ast;
pub mod lexer;
pub mod parser;

// ---------------------------------------------------------------------
// Semantic layer
// ---------------------------------------------------------------------

pub mod typecheck;
pub mod types;

// ---------------------------------------------------------------------
// Back-end: code generation and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen;
pub mod compiler;
pub mod runtime;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CompilationArtifact, CompileOptions, compile, dump_ast, dump_tokens};
pub use diagnostic::Diagnostic;
pub use error::{CoreError, ParseError, TypeError};
