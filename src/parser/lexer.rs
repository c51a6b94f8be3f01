//! Source Lexer
//!
//! Fast, simple tokenization of Python-like lines.
//! Columns are 1-based character positions, the way linters report them.

/// Token types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    Number,
    /// String literal, including any prefix like `f` or `rb`
    String,
    Operator,
    Comma,
    /// `(`, `[` or `{`
    Open,
    /// `)`, `]` or `}`
    Close,
    /// `#` comment to end of line
    Comment,
    /// Anything the lexer does not recognize
    Other,
}

/// A token with its text and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based column of the first character
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, chars: &[char], start: usize, end: usize) -> Self {
        Self {
            kind,
            text: chars[start..end].iter().collect(),
            column: start + 1,
        }
    }

    /// 1-based column just past the last character
    pub fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    /// An f-string literal, whose braces may reference names
    pub fn is_format_string(&self) -> bool {
        self.kind == TokenKind::String
            && self
                .text
                .chars()
                .take_while(|c| *c != '\'' && *c != '"')
                .any(|c| c == 'f' || c == 'F')
    }
}

const THREE_CHAR_OPS: &[&str] = &["**=", "//=", ">>=", "<<=", "..."];
const TWO_CHAR_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "**", "//",
    "<<", ">>", "->", ":=",
];
const ONE_CHAR_OPS: &str = "=+-*/%<>&|^~@:.;";

/// Stateful lexer; remembers an unterminated triple-quoted string between lines
#[derive(Debug, Default)]
pub struct Lexer {
    open_triple: Option<char>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next line starts inside a triple-quoted string
    pub fn in_string(&self) -> bool {
        self.open_triple.is_some()
    }

    /// Tokenize one line, continuing any string left open by the previous line
    pub fn tokenize(&mut self, line: &str) -> Vec<Token> {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        if let Some(quote) = self.open_triple {
            match find_triple_end(&chars, 0, quote) {
                Some(end) => {
                    tokens.push(Token::new(TokenKind::String, &chars, 0, end));
                    self.open_triple = None;
                    i = end;
                }
                None => {
                    if !chars.is_empty() {
                        tokens.push(Token::new(TokenKind::String, &chars, 0, chars.len()));
                    }
                    return tokens;
                }
            }
        }

        while i < chars.len() {
            let ch = chars[i];
            match ch {
                c if c.is_whitespace() => i += 1,

                // Comment: consume rest of line
                '#' => {
                    tokens.push(Token::new(TokenKind::Comment, &chars, i, chars.len()));
                    break;
                }

                '\'' | '"' => {
                    i = self.lex_string(&chars, i, i, &mut tokens);
                }

                c if c.is_alphabetic() || c == '_' => {
                    let start = i;
                    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                        i += 1;
                    }

                    let is_prefixed_string = i < chars.len()
                        && matches!(chars[i], '\'' | '"')
                        && is_string_prefix(&chars[start..i]);

                    if is_prefixed_string {
                        i = self.lex_string(&chars, start, i, &mut tokens);
                    } else {
                        tokens.push(Token::new(TokenKind::Name, &chars, start, i));
                    }
                }

                c if c.is_ascii_digit()
                    || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let start = i;
                    i += 1;
                    while i < chars.len() {
                        let next = chars[i];
                        let exponent_sign = matches!(next, '+' | '-')
                            && matches!(chars[i - 1], 'e' | 'E')
                            && !is_hex_literal(&chars[start..i]);
                        if next.is_ascii_alphanumeric() || next == '.' || next == '_' || exponent_sign
                        {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    tokens.push(Token::new(TokenKind::Number, &chars, start, i));
                }

                ',' => {
                    tokens.push(Token::new(TokenKind::Comma, &chars, i, i + 1));
                    i += 1;
                }

                '(' | '[' | '{' => {
                    tokens.push(Token::new(TokenKind::Open, &chars, i, i + 1));
                    i += 1;
                }

                ')' | ']' | '}' => {
                    tokens.push(Token::new(TokenKind::Close, &chars, i, i + 1));
                    i += 1;
                }

                _ => {
                    let len = operator_len(&chars[i..]);
                    let kind = if len > 0 {
                        TokenKind::Operator
                    } else {
                        TokenKind::Other
                    };
                    let end = i + len.max(1);
                    tokens.push(Token::new(kind, &chars, i, end));
                    i = end;
                }
            }
        }

        tokens
    }

    /// Lex a string literal whose opening quote is at `quote_at`.
    /// Returns the index just past the literal.
    fn lex_string(
        &mut self,
        chars: &[char],
        start: usize,
        quote_at: usize,
        tokens: &mut Vec<Token>,
    ) -> usize {
        let quote = chars[quote_at];
        let is_triple = chars.len() >= quote_at + 3
            && chars[quote_at + 1] == quote
            && chars[quote_at + 2] == quote;

        if is_triple {
            return match find_triple_end(chars, quote_at + 3, quote) {
                Some(end) => {
                    tokens.push(Token::new(TokenKind::String, chars, start, end));
                    end
                }
                None => {
                    tokens.push(Token::new(TokenKind::String, chars, start, chars.len()));
                    self.open_triple = Some(quote);
                    chars.len()
                }
            };
        }

        let mut i = quote_at + 1;
        while i < chars.len() {
            match chars[i] {
                '\\' => i += 2,
                c if c == quote => {
                    i += 1;
                    break;
                }
                _ => i += 1,
            }
        }

        // Unterminated literals run to end of line
        let end = i.min(chars.len());
        tokens.push(Token::new(TokenKind::String, chars, start, end));
        end
    }
}

/// Tokenize a single line with no surrounding context
pub fn tokenize_line(line: &str) -> Vec<Token> {
    Lexer::new().tokenize(line)
}

/// Index just past the closing triple quote, searching from `from`
fn find_triple_end(chars: &[char], from: usize, quote: char) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if i + 2 < chars.len()
            && chars[i] == quote
            && chars[i + 1] == quote
            && chars[i + 2] == quote
        {
            return Some(i + 3);
        }
        i += 1;
    }
    None
}

fn is_string_prefix(prefix: &[char]) -> bool {
    prefix.len() <= 2
        && prefix
            .iter()
            .all(|c| matches!(c.to_ascii_lowercase(), 'r' | 'b' | 'u' | 'f'))
}

fn is_hex_literal(chars: &[char]) -> bool {
    chars.len() >= 2 && chars[0] == '0' && matches!(chars[1], 'x' | 'X')
}

fn operator_len(rest: &[char]) -> usize {
    let starts_with = |op: &str| {
        let op: Vec<char> = op.chars().collect();
        rest.len() >= op.len() && rest[..op.len()] == op[..]
    };

    if THREE_CHAR_OPS.iter().any(|&op| starts_with(op)) {
        3
    } else if TWO_CHAR_OPS.iter().any(|&op| starts_with(op)) {
        2
    } else if ONE_CHAR_OPS.contains(rest[0]) {
        1
    } else {
        0
    }
}
