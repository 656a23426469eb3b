//! Recursive-descent parser.
//!
//! ```text
//! program    := statement* EOF
//! statement  := var_decl | print_stmt
//! var_decl   := 'let' IDENT ':' type '=' expression
//! print_stmt := 'print' '(' expression ')'
//! type       := 'int' | 'float' | 'vec'
//! expression := term
//! term       := factor (('+' | '-') factor)*
//! factor     := primary (('*' | '/') primary)*
//! primary    := INT | FLOAT | '[' (number (',' number)*)? ']' | IDENT | '(' expression ')'
//! ```
//!
//! The first grammar violation aborts the parse, as does nesting
//! parentheses deeper than [`MAX_NESTING`].

use crate::ast::{AstArena, BinOp, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;
use crate::types::Type;

/// Deepest parenthesised expression the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Parse a token stream into a `Program` node allocated in `arena`.
///
/// `tokens` is expected to end with an `Eof` token, as produced by
/// [`crate::lexer::tokenize`]; a missing one is treated as if present.
pub fn parse(tokens: &[Token], arena: &mut AstArena) -> Result<NodeId, ParseError> {
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
        arena,
    };
    let program = parser.parse_program()?;
    log::debug!(
        "parsed {} statements into {} nodes",
        parser.arena.statements(program).len(),
        parser.arena.len()
    );
    Ok(program)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
    arena: &'a mut AstArena,
}

impl<'a> Parser<'a> {
    fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let span = self.current_span();
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(self.arena.alloc(NodeKind::Program { statements }, span))
    }

    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Let => self.parse_var_decl(),
            TokenKind::Print => self.parse_print(),
            _ => Err(self.error("expected statement")),
        }
    }

    fn parse_var_decl(&mut self) -> Result<NodeId, ParseError> {
        let span = self.expect(TokenKind::Let, "expected 'let'")?.span;
        let name = self
            .expect(TokenKind::Ident, "expected variable name")?
            .text
            .clone();
        self.expect(TokenKind::Colon, "expected ':'")?;
        let declared = self.parse_type()?;
        self.expect(TokenKind::Assign, "expected '='")?;
        let init = self.parse_expression()?;
        Ok(self.arena.alloc(
            NodeKind::VarDecl {
                name,
                declared,
                init,
            },
            span,
        ))
    }

    fn parse_print(&mut self) -> Result<NodeId, ParseError> {
        let span = self.expect(TokenKind::Print, "expected 'print'")?.span;
        self.expect(TokenKind::LParen, "expected '('")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen, "expected ')'")?;
        Ok(self.arena.alloc(NodeKind::Print { expr }, span))
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let ty = match self.current_kind() {
            TokenKind::TypeInt => Type::Int,
            TokenKind::TypeFloat => Type::Float,
            TokenKind::TypeVec => Type::Vec,
            _ => return Err(self.error("expected type")),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_primary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.current();
        let span = token.span;
        match token.kind {
            TokenKind::IntLiteral => {
                let value = int_value(token)?;
                self.advance();
                Ok(self.arena.alloc(NodeKind::Int(value), span))
            }
            TokenKind::FloatLiteral => {
                let value = float_value(token)?;
                self.advance();
                Ok(self.arena.alloc(NodeKind::Float(value), span))
            }
            TokenKind::LBracket => {
                self.advance();
                let values = self.parse_vector_elements()?;
                Ok(self.arena.alloc(NodeKind::Vector(values), span))
            }
            TokenKind::Ident => {
                let name = token.text.clone();
                self.advance();
                Ok(self.arena.alloc(NodeKind::Ident(name), span))
            }
            TokenKind::LParen => {
                if self.depth == MAX_NESTING {
                    return Err(self.error("expression nested too deeply"));
                }
                self.advance();
                self.depth += 1;
                let expr = self.parse_expression();
                self.depth -= 1;
                let expr = expr?;
                self.expect(TokenKind::RParen, "expected ')'")?;
                Ok(expr)
            }
            _ => Err(self.error("unexpected token")),
        }
    }

    /// Elements after the opening `[`, up to and including the `]`.
    fn parse_vector_elements(&mut self) -> Result<Vec<f32>, ParseError> {
        let mut values = Vec::new();
        if self.at(TokenKind::RBracket) {
            self.advance();
            return Ok(values);
        }
        loop {
            let token = self.current();
            let value = match token.kind {
                TokenKind::FloatLiteral => float_value(token)?,
                TokenKind::IntLiteral => int_value(token)? as f32,
                _ => return Err(self.error("expected number in vector literal")),
            };
            values.push(value);
            self.advance();
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "expected ']'")?;
        Ok(values)
    }

    fn binary(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.arena[lhs].span;
        self.arena.alloc(NodeKind::Binary { op, lhs, rhs }, span)
    }

    fn current(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        match tokens.get(self.position).or_else(|| tokens.last()) {
            Some(token) => token,
            None => &EOF,
        }
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<&'a Token, ParseError> {
        let token = self.current();
        if token.kind != kind {
            return Err(self.error(message));
        }
        self.advance();
        Ok(token)
    }

    fn error(&self, message: &str) -> ParseError {
        let token = self.current();
        ParseError::new(message, token.text.clone(), token.span)
    }
}

fn int_value(token: &Token) -> Result<i32, ParseError> {
    token
        .text
        .parse::<i32>()
        .map_err(|_| ParseError::new("integer literal out of range", token.text.clone(), token.span))
}

fn float_value(token: &Token) -> Result<f32, ParseError> {
    let value = token
        .text
        .parse::<f32>()
        .map_err(|_| ParseError::new("invalid float literal", token.text.clone(), token.span))?;
    // Overflow parses to infinity rather than failing.
    if !value.is_finite() {
        return Err(ParseError::new(
            "float literal out of range",
            token.text.clone(),
            token.span,
        ));
    }
    Ok(value)
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    text: String::new(),
    span: Span::new(1, 1),
};
