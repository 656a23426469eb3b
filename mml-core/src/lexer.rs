//! Lexer for MML.

use crate::span::Span;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Let,
    Print,

    // Type names
    TypeInt,
    TypeFloat,
    TypeVec,

    // Literals and identifiers
    IntLiteral,
    FloatLiteral,
    Ident,

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Assign, // =
    Colon,  // :
    Comma,  // ,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]

    // Special
    Eof,
    /// A character the language has no use for. The lexer keeps it and
    /// lets the parser reject it with a position.
    Unknown,
}

/// A single token with its raw text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }
}

/// Lex a source string into tokens.
///
/// Never fails. The returned vector always ends with a single
/// `TokenKind::Eof` token positioned just past the last character.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        index: 0,
        line: 1,
        column: 1,
    };
    let tokens = lexer.run();
    log::debug!("lexed {} tokens", tokens.len());
    tokens
}

struct Lexer<'src> {
    source: &'src str,
    /// Byte offset of the next unread character.
    index: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.consume_char();
                continue;
            }

            if ch == '/' && self.peek_next() == Some('/') {
                self.skip_comment();
                continue;
            }

            let start = self.index;
            let span = self.span();
            let token = match ch {
                '0'..='9' => self.lex_number(start, span),
                c if is_ident_start(c) => self.lex_ident_or_keyword(start, span),
                _ => {
                    self.consume_char();
                    let kind = match ch {
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        '=' => TokenKind::Assign,
                        ':' => TokenKind::Colon,
                        ',' => TokenKind::Comma,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        _ => TokenKind::Unknown,
                    };
                    self.simple_token(kind, start, span)
                }
            };
            tokens.push(token);
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: self.span(),
        });
        tokens
    }

    fn simple_token(&self, kind: TokenKind, start: usize, span: Span) -> Token {
        Token {
            kind,
            text: self.source[start..self.index].to_string(),
            span,
        }
    }

    /// Consume up to, but not including, the next newline.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.consume_char();
        }
    }

    fn lex_number(&mut self, start: usize, span: Span) -> Token {
        self.consume_digits();

        let mut kind = TokenKind::IntLiteral;
        if self.peek_char() == Some('.') {
            kind = TokenKind::FloatLiteral;
            self.consume_char(); // '.'
            self.consume_digits();
        }

        self.simple_token(kind, start, span)
    }

    fn consume_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.consume_char();
            } else {
                break;
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize, span: Span) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }

        let kind = match &self.source[start..self.index] {
            "let" => TokenKind::Let,
            "print" => TokenKind::Print,
            "int" => TokenKind::TypeInt,
            "float" => TokenKind::TypeFloat,
            "vec" => TokenKind::TypeVec,
            _ => TokenKind::Ident,
        };
        self.simple_token(kind, start, span)
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.index..].chars();
        chars.next();
        chars.next()
    }

    fn consume_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.index += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            kinds("let x: int = 42"),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::TypeInt,
                TokenKind::Assign,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_source_is_just_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].span, Span::new(1, 1));
    }

    #[test]
    fn classifies_numbers_by_dot() {
        let tokens = tokenize("12 3.25 7.");
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[0].text, "12");
        assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[1].text, "3.25");
        assert_eq!(tokens[2].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[2].text, "7.");
    }

    #[test]
    fn leading_dot_is_not_a_float() {
        assert_eq!(
            kinds(".5"),
            vec![TokenKind::Unknown, TokenKind::IntLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn keywords_and_type_names() {
        assert_eq!(
            kinds("let print int float vec vector _x9"),
            vec![
                TokenKind::Let,
                TokenKind::Print,
                TokenKind::TypeInt,
                TokenKind::TypeFloat,
                TokenKind::TypeVec,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_and_delimiters() {
        assert_eq!(
            kinds("+-*/=:,()[]"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let tokens = tokenize("print(1) // print(2)\nprint(3)");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["print", "(", "1", ")", "print", "(", "3", ")", ""]
        );
        assert_eq!(tokens[4].span, Span::new(2, 1));
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(kinds("// nothing here"), vec![TokenKind::Eof]);
    }

    #[test]
    fn single_slash_is_division() {
        assert_eq!(
            kinds("a / b"),
            vec![TokenKind::Ident, TokenKind::Slash, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("let a: int = 1\n  print(a)");
        let print = &tokens[6];
        assert_eq!(print.kind, TokenKind::Print);
        assert_eq!((print.line(), print.column()), (2, 3));
        let a = &tokens[8];
        assert_eq!((a.line(), a.column()), (2, 9));
    }

    #[test]
    fn unknown_characters_become_tokens() {
        let tokens = tokenize("let x: int = 1 $ é");
        let unknown: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Unknown)
            .collect();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].text, "$");
        assert_eq!(unknown[1].text, "é");
        assert_eq!(unknown[1].column(), 18);
    }

    #[test]
    fn joined_texts_reproduce_significant_lexemes() {
        let source = "let v: vec = [1, 2.5] // trailing\nprint(v * 2)";
        let joined: String = tokenize(source).iter().map(|t| t.text.as_str()).collect();
        let expected: String = "let v: vec = [1, 2.5]\nprint(v * 2)"
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert_eq!(joined, expected);
    }
}
