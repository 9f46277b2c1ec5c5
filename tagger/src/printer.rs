use crate::{
    layout::align_cells,
    types::{FieldDecl, SourceFile},
};

/// Prints a (possibly rewritten) source file.
///
/// Text outside struct fields is copied as is. Fields that sit alone on
/// their line are re-laid out in columns the way gofmt does it; any other
/// field only gets its tag spliced in. The output always ends with a newline.
pub fn print_source(file: &SourceFile) -> String {
    let text = file.text.as_str();
    let lines = LineIndex::new(text);
    let mut edits = Vec::new();

    for decl in &file.structs {
        let mut section: Vec<Row> = Vec::new();
        for field in &decl.fields {
            match aligned_row(text, &lines, field) {
                Some(row) => {
                    if section.last().is_some_and(|prev| prev.line + 1 != row.line) {
                        flush(text, &mut section, &mut edits);
                    }
                    section.push(row);
                }
                None => {
                    flush(text, &mut section, &mut edits);
                    edits.extend(tag_edit(text, field));
                }
            }
        }
        flush(text, &mut section, &mut edits);
    }

    apply(text, edits)
}

#[derive(Debug)]
struct Edit {
    start: usize,
    end:   usize,
    text:  String,
}

#[derive(Debug)]
struct Row {
    line:   usize,
    start:  usize,
    end:    usize,
    indent: String,
    cells:  Vec<String>,
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Byte range of a line without its line terminator.
    fn bounds(&self, text: &str, line: usize) -> (usize, usize) {
        let start = self.starts[line];
        let mut end = self.starts.get(line + 1).map_or(text.len(), |next| next - 1);
        if end > start && text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        (start, end)
    }
}

/// Cells of a field that owns its line, following the layout of go/printer:
/// named fields are `names, type[, "", tag]`, embedded ones `type[, tag]`,
/// and a trailing comment goes into the column right after the last cell,
/// with untagged fields putting it under the tags.
fn aligned_row(text: &str, lines: &LineIndex, field: &FieldDecl) -> Option<Row> {
    let line = lines.line_of(field.span.start);
    let (start, end) = lines.bounds(text, line);

    let indent = &text[start..field.span.start];
    if !indent.chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }
    if field.span.slice(text).contains('\n') {
        return None;
    }
    let code_end = field
        .tag
        .as_ref()
        .and_then(|tag| tag.span)
        .map_or(field.span.end, |span| span.start);
    let code = &text[field.span.start..code_end];
    if code.contains("//") || code.contains("/*") {
        return None;
    }
    let rest = text[field.span.end..end].trim();
    let comment = match rest {
        "" => None,
        c if c.starts_with("//") => Some(c),
        _ => return None,
    };

    let type_text = field.type_span.slice(text).to_string();
    let tag = field.tag.as_ref().map(|t| t.text.clone());
    let mut cells = Vec::new();
    let mut extra = if field.is_embedded() {
        cells.push(type_text);
        2
    } else {
        cells.push(field.names.join(", "));
        cells.push(type_text);
        1
    };
    if let Some(tag) = tag {
        if !field.is_embedded() {
            cells.push(String::new());
        }
        cells.push(tag);
        extra = 0;
    }
    if let Some(comment) = comment {
        cells.extend(std::iter::repeat(String::new()).take(extra));
        cells.push(comment.to_string());
    }

    Some(Row {
        line,
        start,
        end,
        indent: indent.to_string(),
        cells,
    })
}

fn flush(text: &str, section: &mut Vec<Row>, edits: &mut Vec<Edit>) {
    if section.is_empty() {
        return;
    }
    let cells: Vec<Vec<String>> = section.iter().map(|row| row.cells.clone()).collect();
    for (row, aligned) in section.drain(..).zip(align_cells(&cells)) {
        let line = format!("{}{}", row.indent, aligned);
        if text[row.start..row.end] != line {
            edits.push(Edit {
                start: row.start,
                end:   row.end,
                text:  line,
            });
        }
    }
}

fn tag_edit(text: &str, field: &FieldDecl) -> Option<Edit> {
    let tag = field.tag.as_ref().filter(|tag| tag.is_dirty(text))?;
    Some(match tag.span {
        Some(span) => Edit {
            start: span.start,
            end:   span.end,
            text:  tag.text.clone(),
        },
        None => Edit {
            start: field.type_span.end,
            end:   field.type_span.end,
            text:  format!(" {}", tag.text),
        },
    })
}

fn apply(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.start);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for edit in edits {
        out.push_str(&text[pos..edit.start]);
        out.push_str(&edit.text);
        pos = edit.end;
    }
    out.push_str(&text[pos..]);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
