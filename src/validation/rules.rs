//! Built-in Rules
//!
//! Each check appends diagnostics for one rule. Columns are 1-based.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::Diagnostic;
use crate::parser::{LexedLine, Token, TokenKind};

pub const LINE_TOO_LONG: &str = "line-too-long";
pub const TRAILING_WHITESPACE: &str = "trailing-whitespace";
pub const DEBUG_PRINT: &str = "debug-print";
pub const MISSING_WHITESPACE_AROUND_OPERATOR: &str = "missing-whitespace-around-operator";
pub const MISSING_WHITESPACE_AFTER_COMMA: &str = "missing-whitespace-after-comma";
pub const SHADOWED_BUILTIN: &str = "shadowed-builtin";
pub const UNUSED_VARIABLE: &str = "unused-variable";

/// Every rule id the built-in linter can report
pub const ALL_RULES: &[&str] = &[
    LINE_TOO_LONG,
    TRAILING_WHITESPACE,
    DEBUG_PRINT,
    MISSING_WHITESPACE_AROUND_OPERATOR,
    MISSING_WHITESPACE_AFTER_COMMA,
    SHADOWED_BUILTIN,
    UNUSED_VARIABLE,
];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "bin", "bool", "bytes", "callable", "chr", "compile", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "filter", "float", "format", "frozenset", "hash",
    "help", "hex", "id", "input", "int", "iter", "len", "list", "map", "max", "min", "next",
    "object", "oct", "open", "ord", "pow", "print", "range", "repr", "reversed", "round", "set",
    "slice", "sorted", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const AUGMENTED_OPS: &[&str] = &[
    "+=", "-=", "*=", "/=", "//=", "%=", "**=", "&=", "|=", "^=", ">>=", "<<=", "@=", ":=",
];
const COMPARISON_OPS: &[&str] = &["==", "!=", "<=", ">=", "<", ">"];
const BINARY_OPS: &[&str] = &["+", "-", "*", "/", "//", "%", "@", "<<", ">>", "&", "|", "^"];

static FORMAT_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid format field regex"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid identifier regex"));

fn code_tokens<'t>(line: &'t LexedLine<'_>) -> Vec<&'t Token> {
    line.tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .collect()
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Lines longer than `max` characters
pub fn check_line_length(line: &LexedLine<'_>, max: usize, out: &mut Vec<Diagnostic>) {
    let len = line.text.chars().count();
    if len > max {
        out.push(Diagnostic::new(
            LINE_TOO_LONG,
            line.number,
            max + 1,
            format!("Line too long ({} > {})", len, max),
        ));
    }
}

pub fn check_trailing_whitespace(line: &LexedLine<'_>, out: &mut Vec<Diagnostic>) {
    let trimmed = line.text.trim_end();
    if trimmed.len() != line.text.len() {
        out.push(Diagnostic::new(
            TRAILING_WHITESPACE,
            line.number,
            trimmed.chars().count() + 1,
            "Trailing whitespace",
        ));
    }
}

/// Calls to `print(...)` left in the source
pub fn check_debug_print(line: &LexedLine<'_>, out: &mut Vec<Diagnostic>) {
    let code = code_tokens(line);

    for (i, token) in code.iter().enumerate() {
        if !token.is_name("print") {
            continue;
        }

        let is_call = code
            .get(i + 1)
            .is_some_and(|next| next.kind == TokenKind::Open && next.text == "(");
        let is_attribute_or_def =
            i > 0 && (code[i - 1].is_operator(".") || code[i - 1].is_name("def"));

        if is_call && !is_attribute_or_def {
            out.push(Diagnostic::new(
                DEBUG_PRINT,
                line.number,
                token.column,
                "`print` found",
            ));
        }
    }
}

/// Whether an operator token in this position takes a left operand
fn has_left_operand(prev: Option<&&Token>) -> bool {
    match prev {
        Some(t) => match t.kind {
            TokenKind::Name => !is_keyword(&t.text),
            TokenKind::Number | TokenKind::String | TokenKind::Close => true,
            _ => false,
        },
        None => false,
    }
}

pub fn check_operator_whitespace(line: &LexedLine<'_>, out: &mut Vec<Diagnostic>) {
    let chars: Vec<char> = line.text.chars().collect();
    let code = code_tokens(line);
    let mut depth = line.depth;

    for (i, token) in code.iter().enumerate() {
        match token.kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close => depth = depth.saturating_sub(1),
            _ => {}
        }
        if token.kind != TokenKind::Operator {
            continue;
        }

        let op = token.text.as_str();
        let checked = if op == "=" {
            // keyword arguments and defaults
            depth == 0
        } else if AUGMENTED_OPS.contains(&op) || COMPARISON_OPS.contains(&op) {
            true
        } else if BINARY_OPS.contains(&op) {
            has_left_operand(i.checked_sub(1).and_then(|p| code.get(p)))
        } else {
            false
        };
        if !checked {
            continue;
        }

        let spaced_before = token.column == 1 || chars[token.column - 2].is_whitespace();
        let spaced_after = chars
            .get(token.end_column() - 1)
            .is_none_or(|c| c.is_whitespace());

        if !spaced_before || !spaced_after {
            out.push(Diagnostic::new(
                MISSING_WHITESPACE_AROUND_OPERATOR,
                line.number,
                token.column,
                format!("Missing whitespace around operator `{}`", op),
            ));
        }
    }
}

pub fn check_comma_whitespace(line: &LexedLine<'_>, out: &mut Vec<Diagnostic>) {
    let chars: Vec<char> = line.text.chars().collect();

    for token in line.tokens.iter().filter(|t| t.kind == TokenKind::Comma) {
        // `column` is 1-based, so it indexes the character after the comma
        if let Some(next) = chars.get(token.column) {
            if !next.is_whitespace() && !matches!(next, ')' | ']' | '}') {
                out.push(Diagnostic::new(
                    MISSING_WHITESPACE_AFTER_COMMA,
                    line.number,
                    token.column,
                    "Missing whitespace after ','",
                ));
            }
        }
    }
}

/// Target of a simple `name = value` statement
fn assignment_target<'t>(line: &'t LexedLine<'_>) -> Option<&'t Token> {
    if !line.starts_statement() {
        return None;
    }

    let code = code_tokens(line);
    match code.as_slice() {
        [target, op, ..]
            if target.kind == TokenKind::Name
                && !is_keyword(&target.text)
                && op.is_operator("=") =>
        {
            Some(*target)
        }
        _ => None,
    }
}

pub fn check_shadowed_builtin(line: &LexedLine<'_>, out: &mut Vec<Diagnostic>) {
    if let Some(target) = assignment_target(line) {
        if BUILTINS.contains(&target.text.as_str()) {
            out.push(Diagnostic::new(
                SHADOWED_BUILTIN,
                line.number,
                target.column,
                format!("Variable `{}` is shadowing a Python builtin", target.text),
            ));
        }
    }
}

fn is_function_header(line: &LexedLine<'_>) -> bool {
    if !line.starts_statement() {
        return false;
    }

    let mut names = line
        .tokens
        .iter()
        .take_while(|t| t.kind == TokenKind::Name)
        .map(|t| t.text.as_str());
    match names.next() {
        Some("def") => true,
        Some("async") => names.next() == Some("def"),
        _ => false,
    }
}

/// Local variables assigned inside a function and never read there
pub fn check_unused_variables(lines: &[LexedLine<'_>], out: &mut Vec<Diagnostic>) {
    for (idx, header) in lines.iter().enumerate() {
        if !is_function_header(header) {
            continue;
        }

        let body_start = idx + 1;
        let body_len = lines[body_start..]
            .iter()
            .position(|line| line.starts_statement() && line.indent <= header.indent)
            .unwrap_or(lines.len() - body_start);

        check_function_body(&lines[body_start..body_start + body_len], out);
    }
}

fn check_function_body(body: &[LexedLine<'_>], out: &mut Vec<Diagnostic>) {
    let mut targets: Vec<(usize, &Token)> = Vec::new();
    let mut reads: HashSet<String> = HashSet::new();

    for line in body {
        let target = assignment_target(line);
        if let Some(target) = target {
            targets.push((line.number, target));
        }

        for token in &line.tokens {
            if target.is_some_and(|t| std::ptr::eq(t, token)) {
                continue;
            }
            match token.kind {
                TokenKind::Name => {
                    reads.insert(token.text.clone());
                }
                TokenKind::String if token.is_format_string() => {
                    for field in FORMAT_FIELD.captures_iter(&token.text) {
                        for name in IDENTIFIER.find_iter(&field[1]) {
                            reads.insert(name.as_str().to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    for (line_number, target) in targets {
        if target.text.starts_with('_') || reads.contains(&target.text) {
            continue;
        }
        out.push(Diagnostic::new(
            UNUSED_VARIABLE,
            line_number,
            target.column,
            format!(
                "Local variable `{}` is assigned to but never used",
                target.text
            ),
        ));
    }
}
