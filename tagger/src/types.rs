use serde::Serialize;

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end:   usize,
}

impl Span {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// A parsed Go file: the source text plus every struct type declared in it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub text:    String,
    pub package: String,
    pub structs: Vec<StructDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Empty for embedded fields.
    pub names:     Vec<String>,
    pub line:      usize,
    pub column:    usize,
    /// The whole field as written, original tag included.
    pub span:      Span,
    pub type_span: Span,
    pub tag:       Option<Tag>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// A struct tag literal, delimiters included.
/// `span` is `None` for a tag that does not exist in the source yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub text: String,
    pub span: Option<Span>,
}

impl Tag {
    /// True when `text` no longer matches what the source holds at `span`.
    pub fn is_dirty(&self, source: &str) -> bool {
        match self.span {
            Some(span) => span.slice(source) != self.text,
            None => true,
        }
    }
}
