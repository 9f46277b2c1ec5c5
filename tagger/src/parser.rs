use crate::{
    tokenizer::{tokenize_source, Token, TokenKind},
    types::{FieldDecl, SourceFile, Span, StructDecl, Tag},
    utils::{error, quote},
    error::TaggerError,
};

/// Parses Go source into a [`SourceFile`].
///
/// Only struct type declarations are materialised; everything else is checked
/// for bracket balance and skipped. Comments are dropped from the token stream
/// (the printer works from the original text and keeps them).
pub fn parse_source(text: &str) -> Result<SourceFile, TaggerError> {
    let tokens: Vec<Token> = tokenize_source(text)?
        .into_iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .collect();

    let mut parser = Parser {
        tokens:  &tokens,
        index:   0,
        structs: Vec::new(),
    };
    let package = parser.parse_package_clause()?;
    parser.parse_declarations()?;

    Ok(SourceFile {
        text: text.to_string(),
        package,
        structs: parser.structs,
    })
}

struct Parser<'a> {
    tokens:  &'a [Token],
    index:   usize,
    structs: Vec<StructDecl>,
}

impl<'a> Parser<'a> {
    // The token list always ends with EOF, which is never stepped over.
    fn peek(&self, offset: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[(self.index + offset).min(tokens.len() - 1)]
    }

    fn current(&self) -> &'a Token {
        self.peek(0)
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.current().is(text) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<&'a Token, TaggerError> {
        let tok = self.current();
        if self.eat(text) {
            Ok(tok)
        } else {
            Err(self.unexpected(&format!("Expected {}", quote(text))))
        }
    }

    fn expect_ident(&mut self) -> Result<&'a Token, TaggerError> {
        let tok = self.current();
        if tok.kind == TokenKind::Ident {
            self.index += 1;
            Ok(tok)
        } else {
            Err(self.unexpected("Expected identifier"))
        }
    }

    fn unexpected(&self, expected: &str) -> TaggerError {
        let tok = self.current();
        error(
            &format!("{} but found {}", expected, describe(tok)),
            tok.line,
            tok.column,
        )
    }

    fn unclosed(&self, open: &Token) -> TaggerError {
        let tok = self.current();
        error(
            &format!(
                "Expected {} to close {} from line {} but found {}",
                quote(closer(&open.text)),
                quote(&open.text),
                open.line,
                describe(tok)
            ),
            tok.line,
            tok.column,
        )
    }

    fn parse_package_clause(&mut self) -> Result<String, TaggerError> {
        while self.eat(";") {}
        self.expect("package")?;
        let name = self.expect_ident()?;
        self.expect(";")?;
        Ok(name.text.clone())
    }

    fn parse_declarations(&mut self) -> Result<(), TaggerError> {
        loop {
            let tok = self.current();
            match tok.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon => self.index += 1,
                TokenKind::Keyword if tok.text == "type" => {
                    self.index += 1;
                    self.parse_type_decl()?;
                }
                TokenKind::Keyword
                    if matches!(tok.text.as_str(), "import" | "const" | "var" | "func") =>
                {
                    self.index += 1;
                    self.skip_declaration()?;
                }
                _ => return Err(self.unexpected("Expected declaration")),
            }
        }
    }

    /// Skips a non-type declaration, descending into local type declarations
    /// found in function bodies.
    fn skip_declaration(&mut self) -> Result<(), TaggerError> {
        let mut open: Vec<&'a Token> = Vec::new();
        loop {
            let tok = self.current();
            match tok.kind {
                TokenKind::Eof => {
                    return match open.last() {
                        Some(o) => Err(self.unclosed(o)),
                        None => Ok(()),
                    };
                }
                TokenKind::Semicolon if open.is_empty() => {
                    self.index += 1;
                    return Ok(());
                }
                TokenKind::Keyword
                    if tok.text == "type" && !open.is_empty() && !self.at_type_switch_guard() =>
                {
                    self.index += 1;
                    self.parse_type_decl()?;
                    continue;
                }
                _ => {}
            }
            track_bracket(&mut open, tok)?;
            self.index += 1;
        }
    }

    /// `x.(type)` in a type switch.
    fn at_type_switch_guard(&self) -> bool {
        self.index > 0 && self.tokens[self.index - 1].is("(") && self.peek(1).is(")")
    }

    fn parse_type_decl(&mut self) -> Result<(), TaggerError> {
        if !self.eat("(") {
            return self.parse_type_spec();
        }
        loop {
            if self.eat(";") {
                continue;
            }
            if self.eat(")") {
                break;
            }
            if self.current().kind == TokenKind::Eof {
                return Err(self.unexpected("Expected \")\""));
            }
            self.parse_type_spec()?;
        }
        self.end_of_spec()
    }

    fn parse_type_spec(&mut self) -> Result<(), TaggerError> {
        let name_tok = self.expect_ident()?;

        if self.current().is("[") && self.at_type_parameters() {
            self.skip_balanced()?;
        }
        self.eat("=");

        if !(self.current().is("struct") && self.peek(1).is("{")) {
            return self.skip_type_expression();
        }
        self.index += 1;
        let fields = self.parse_struct_body()?;
        self.structs.push(StructDecl {
            name:   name_tok.text.clone(),
            line:   name_tok.line,
            column: name_tok.column,
            fields,
        });
        self.end_of_spec()
    }

    /// A spec ends at `;`, or right before the `)` or `}` closing its group.
    fn end_of_spec(&mut self) -> Result<(), TaggerError> {
        let tok = self.current();
        if self.eat(";") || tok.is(")") || tok.is("}") || tok.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("Expected \";\""))
        }
    }

    /// Tells `type G[T any] ...` apart from `type A [N]T`: a parameter list
    /// holds at least a name and a constraint.
    fn at_type_parameters(&self) -> bool {
        let first = self.peek(1);
        first.kind == TokenKind::Ident && !self.peek(2).is("]")
    }

    fn skip_balanced(&mut self) -> Result<(), TaggerError> {
        let mut open: Vec<&'a Token> = Vec::new();
        loop {
            let tok = self.current();
            if tok.kind == TokenKind::Eof {
                return Err(match open.last() {
                    Some(o) => self.unclosed(o),
                    None => self.unexpected("Expected type"),
                });
            }
            track_bracket(&mut open, tok)?;
            self.index += 1;
            if open.is_empty() {
                return Ok(());
            }
        }
    }

    fn skip_type_expression(&mut self) -> Result<(), TaggerError> {
        let mut open: Vec<&'a Token> = Vec::new();
        loop {
            let tok = self.current();
            if open.is_empty()
                && (tok.kind == TokenKind::Semicolon
                    || tok.kind == TokenKind::Eof
                    || tok.is(")")
                    || tok.is("}"))
            {
                return self.end_of_spec();
            }
            if tok.kind == TokenKind::Eof {
                return Err(match open.last() {
                    Some(o) => self.unclosed(o),
                    None => self.unexpected("Expected type"),
                });
            }
            track_bracket(&mut open, tok)?;
            self.index += 1;
        }
    }

    fn parse_struct_body(&mut self) -> Result<Vec<FieldDecl>, TaggerError> {
        let brace = self.expect("{")?;
        let mut fields = Vec::new();
        loop {
            let tok = self.current();
            if tok.is("}") {
                self.index += 1;
                return Ok(fields);
            }
            if tok.kind == TokenKind::Eof {
                return Err(self.unclosed(brace));
            }
            if tok.kind == TokenKind::Semicolon {
                self.index += 1;
                continue;
            }

            let start = self.index;
            let mut open: Vec<&'a Token> = Vec::new();
            loop {
                let tok = self.current();
                if open.is_empty() && (tok.kind == TokenKind::Semicolon || tok.is("}")) {
                    break;
                }
                if tok.kind == TokenKind::Eof {
                    return Err(self.unclosed(open.last().copied().unwrap_or(brace)));
                }
                track_bracket(&mut open, tok)?;
                self.index += 1;
            }
            fields.push(parse_field(&self.tokens[start..self.index])?);
        }
    }
}

fn parse_field(tokens: &[Token]) -> Result<FieldDecl, TaggerError> {
    let (body, tag_tok) = match tokens.split_last() {
        Some((last, rest)) if last.kind == TokenKind::String && !rest.is_empty() => (rest, Some(last)),
        _ => (tokens, None),
    };
    let first = &body[0];

    let (names, type_tokens) = if is_embedded(body) {
        (Vec::new(), body)
    } else {
        let mut names = Vec::new();
        let mut i = 0;
        loop {
            let tok = match body.get(i) {
                Some(tok) if tok.kind == TokenKind::Ident => tok,
                Some(tok) => {
                    return Err(error(
                        &format!("Expected field name or embedded type but found {}", describe(tok)),
                        tok.line,
                        tok.column,
                    ))
                }
                None => {
                    let last = &body[body.len() - 1];
                    return Err(error("Expected field name after \",\"", last.line, last.column));
                }
            };
            names.push(tok.text.clone());
            i += 1;
            if body.get(i).is_some_and(|t| t.is(",")) {
                i += 1;
            } else {
                break;
            }
        }
        (names, &body[i..])
    };

    let (Some(type_first), Some(type_last)) = (type_tokens.first(), type_tokens.last()) else {
        let last = &body[body.len() - 1];
        return Err(error(
            &format!("Expected type for field {}", quote(&last.text)),
            last.line,
            last.column,
        ));
    };
    let last = tag_tok.unwrap_or(type_last);

    Ok(FieldDecl {
        names,
        line:      first.line,
        column:    first.column,
        span:      Span { start: first.start, end: last.end },
        type_span: Span { start: type_first.start, end: type_last.end },
        tag:       tag_tok.map(|t| Tag {
            text: t.text.clone(),
            span: Some(Span { start: t.start, end: t.end }),
        }),
    })
}

/// `T`, `*T`, `pkg.T` and `T[Args]` declare an embedded field.
fn is_embedded(body: &[Token]) -> bool {
    if body[0].is("*") {
        return true;
    }
    if body[0].kind != TokenKind::Ident {
        return false;
    }
    let mut i = 1;
    if body.get(i).is_some_and(|t| t.is(".")) && body.get(i + 1).is_some_and(|t| t.kind == TokenKind::Ident) {
        i += 2;
    }
    if i == body.len() {
        return true;
    }
    body[i].is("[") && matching_close(body, i) == Some(body.len() - 1)
}

fn matching_close(tokens: &[Token], open_index: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open_index) {
        if tok.is("(") || tok.is("[") || tok.is("{") {
            depth += 1;
        } else if tok.is(")") || tok.is("]") || tok.is("}") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn track_bracket<'a>(open: &mut Vec<&'a Token>, tok: &'a Token) -> Result<(), TaggerError> {
    if tok.kind != TokenKind::Operator {
        return Ok(());
    }
    match tok.text.as_str() {
        "(" | "[" | "{" => open.push(tok),
        ")" | "]" | "}" => match open.pop() {
            Some(o) if closer(&o.text) == tok.text => {}
            Some(o) => {
                return Err(error(
                    &format!("Expected {} but found {}", quote(closer(&o.text)), quote(&tok.text)),
                    tok.line,
                    tok.column,
                ))
            }
            None => {
                return Err(error(
                    &format!("Unexpected token {}", quote(&tok.text)),
                    tok.line,
                    tok.column,
                ))
            }
        },
        _ => {}
    }
    Ok(())
}

fn closer(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn describe(tok: &Token) -> String {
    match tok.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Semicolon if tok.text == "\n" => "newline".to_string(),
        _ => quote(&tok.text),
    }
}
