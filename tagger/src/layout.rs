//! Elastic tabstops, as gofmt lays out struct fields.
//!
//! Every row is a list of cells. All cells but the last one of a row are
//! padded to the width of their column block: the run of adjacent rows that
//! also have a padded cell in that column. The last cell of a row is written
//! as is and does not widen any column.

const PADDING: usize = 1;

/// Lays out `rows` and returns one string per row.
pub fn align_cells(rows: &[Vec<String>]) -> Vec<String> {
    let mut out = vec![String::new(); rows.len()];
    let mut widths = Vec::new();
    format_block(rows, 0, rows.len(), &mut widths, &mut out);
    out
}

fn format_block(
    rows: &[Vec<String>],
    line0: usize,
    line1: usize,
    widths: &mut Vec<usize>,
    out: &mut [String],
) {
    let column = widths.len();
    let mut start = line0;
    let mut this = line0;

    while this < line1 {
        if column + 1 >= rows[this].len() {
            this += 1;
            continue;
        }

        write_rows(rows, start, this, widths, out);
        start = this;

        let mut width = 0;
        let mut discardable = true;
        while this < line1 && column + 1 < rows[this].len() {
            let cell_width = display_width(&rows[this][column]);
            width = width.max(cell_width + PADDING);
            if cell_width > 0 {
                discardable = false;
            }
            this += 1;
        }
        if discardable {
            width = 0;
        }

        widths.push(width);
        format_block(rows, start, this, widths, out);
        widths.pop();
        start = this;
    }

    write_rows(rows, start, line1, widths, out);
}

fn write_rows(rows: &[Vec<String>], line0: usize, line1: usize, widths: &[usize], out: &mut [String]) {
    for i in line0..line1 {
        let mut line = String::new();
        for (j, cell) in rows[i].iter().enumerate() {
            line.push_str(cell);
            if j < widths.len() && j + 1 < rows[i].len() {
                let pad = widths[j].saturating_sub(display_width(cell));
                line.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out[i] = line;
    }
}

fn display_width(cell: &str) -> usize {
    cell.chars().count()
}
