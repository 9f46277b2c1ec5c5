use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::TaggerError;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"(",
        r"//[^\n]*",
        r"|/\*(?s:.*?)\*/",
        r"|`[^`]*`",
        r#"|"(?:[^"\\\n]|\\.)*""#,
        r"|'(?:[^'\\\n]|\\.)*'",
        r"|[\p{L}_][\p{L}\p{Nd}_]*",
        r"|\.?[0-9](?:[eEpP][+-]|[0-9A-Za-z_.])*",
        r"|<<=|>>=|&\^=|\.\.\.|&&|\|\||<-|\+\+|--|==|!=|<=|>=|:=|[-+*/%&|^<>]=|<<|>>|&\^",
        r"|[-+*/%&|^<>=!~(){}\[\],;.:]",
        r"|\s+",
        r")",
    ))
    .unwrap();
}

const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type", "var",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Number,
    String,
    Rune,
    Operator,
    Comment,
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub line:   usize,
    pub column: usize,
    pub start:  usize,
    pub end:    usize,
}

impl Token {
    pub fn is(&self, text: &str) -> bool {
        match self.kind {
            TokenKind::Semicolon => text == ";",
            TokenKind::Operator | TokenKind::Keyword => self.text == text,
            _ => false,
        }
    }

    /// Go inserts a semicolon at a newline that follows one of these tokens.
    fn ends_statement(&self) -> bool {
        match self.kind {
            TokenKind::Ident | TokenKind::Number | TokenKind::String | TokenKind::Rune => true,
            TokenKind::Keyword => matches!(
                self.text.as_str(),
                "break" | "continue" | "fallthrough" | "return"
            ),
            TokenKind::Operator => matches!(self.text.as_str(), "++" | "--" | ")" | "]" | "}"),
            _ => false,
        }
    }
}

fn classify(part: &str) -> Option<TokenKind> {
    let mut chars = part.chars();
    let first = chars.next()?;
    let second = chars.next();
    let kind = match first {
        '/' if matches!(second, Some('/') | Some('*')) => TokenKind::Comment,
        ';' => TokenKind::Semicolon,
        '`' | '"' => TokenKind::String,
        '\'' => TokenKind::Rune,
        c if c.is_whitespace() => return None,
        c if c.is_ascii_digit() => TokenKind::Number,
        '.' if second.is_some_and(|c| c.is_ascii_digit()) => TokenKind::Number,
        c if c == '_' || c.is_alphabetic() => {
            if KEYWORDS.contains(&part) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            }
        }
        _ => TokenKind::Operator,
    };
    Some(kind)
}

/// Splits Go source into tokens, comments included, with automatic
/// semicolons inserted where the Go grammar puts them.
pub fn tokenize_source(text: &str) -> Result<Vec<Token>, TaggerError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;
    let mut needs_semicolon = false;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(error(
                &format!("Syntax error: {}", quote(unexpected)),
                line,
                column,
            ));
        }

        let kind = classify(part);
        // A `/*` the comment pattern did not match has no closing `*/`.
        if part == "/" && text[end..].starts_with('*') {
            return Err(error("Comment not terminated", line, column));
        }
        let has_newline = part.contains('\n');

        if needs_semicolon && has_newline && kind != Some(TokenKind::String) {
            tokens.push(Token {
                kind:   TokenKind::Semicolon,
                text:   "\n".to_string(),
                line,
                column,
                start,
                end:    start,
            });
            needs_semicolon = false;
        }

        if let Some(kind) = kind {
            let token = Token {
                kind,
                text: part.to_string(),
                line,
                column,
                start,
                end,
            };
            if kind != TokenKind::Comment {
                needs_semicolon = token.ends_statement();
            }
            tokens.push(token);
        }

        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(error(
            &format!("Syntax error: {}", quote(unexpected)),
            line,
            column,
        ));
    }

    if needs_semicolon {
        tokens.push(Token {
            kind:   TokenKind::Semicolon,
            text:   "\n".to_string(),
            line,
            column,
            start:  text.len(),
            end:    text.len(),
        });
    }

    tokens.push(Token {
        kind:   TokenKind::Eof,
        text:   "".to_string(),
        line,
        column,
        start:  text.len(),
        end:    text.len(),
    });
    Ok(tokens)
}
