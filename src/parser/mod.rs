//! Source Parser
//!
//! Line-oriented tokenization of Python-like fixture sources.
//! Only as much structure as the built-in rules need: tokens with columns,
//! indentation, and bracket depth carried across lines.

pub mod lexer;

pub use lexer::{tokenize_line, Lexer, Token, TokenKind};

/// A tokenized source line with the context rules need
#[derive(Debug, Clone, PartialEq)]
pub struct LexedLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub text: &'a str,
    /// Leading whitespace, in characters
    pub indent: usize,
    /// Bracket nesting depth before the first token of this line
    pub depth: usize,
    /// The line starts inside a triple-quoted string
    pub in_string: bool,
    pub tokens: Vec<Token>,
}

impl LexedLine<'_> {
    /// A line that starts a new logical statement
    pub fn starts_statement(&self) -> bool {
        self.depth == 0 && !self.in_string && self.has_code()
    }

    /// Whether the line has anything besides comments
    pub fn has_code(&self) -> bool {
        self.tokens.iter().any(|t| t.kind != TokenKind::Comment)
    }
}

/// Tokenize a whole document, tracking strings and brackets across lines
pub fn tokenize_document(content: &str) -> Vec<LexedLine<'_>> {
    let mut lexer = Lexer::new();
    let mut depth = 0usize;
    let mut lines = Vec::new();

    for (idx, text) in content.lines().enumerate() {
        let in_string = lexer.in_string();
        let tokens = lexer.tokenize(text);
        let indent = text.chars().take_while(|c| c.is_whitespace()).count();
        let line_depth = depth;

        for token in &tokens {
            match token.kind {
                TokenKind::Open => depth += 1,
                TokenKind::Close => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        lines.push(LexedLine {
            number: idx + 1,
            text,
            indent,
            depth: line_depth,
            in_string,
            tokens,
        });
    }

    lines
}
