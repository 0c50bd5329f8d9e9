use super::Element;

/// Render a row-major buffer with the given `shape` as nested brackets.
///
/// A rank-1 buffer (or a single-row matrix) renders on one line, like `( 1  2  3 )`. Otherwise
/// each innermost row is printed on its own line with every element right-justified to the
/// widest element, and each enclosing 2-D block is bracketed with `⎛ ⎜ ⎝` glyphs. Consecutive
/// blocks are separated by a blank row.
pub fn describe<T: Element>(values: &[T], shape: &[usize]) -> String {
    let text: Vec<String> = values.iter().map(Element::describe).collect();

    if shape.len() < 2 || (shape.len() == 2 && shape[0] == 1) {
        return format!("( {} )", text.join("  "));
    }

    let columns = shape[shape.len() - 1].max(1);
    let width = text.iter().map(|t| t.chars().count()).max().unwrap_or(1);

    let lines: Vec<String> = text
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|t| format!("{:>width$}", t, width = width))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect();

    let boundaries = last_rows(shape[..shape.len() - 1].iter().rev().copied());
    let first = boundaries.first().copied().unwrap_or(1);
    let blank = " ".repeat((width + 2) * columns - 2);

    let mut rows = Rows::new(&boundaries);
    for line in &lines {
        if rows.n % (first + 1) == first {
            rows.push(&blank);
        }

        rows.push(line);
    }

    rows.out
}

// the index of the last row of each nested block, counting the blank rows between blocks
fn last_rows<I: IntoIterator<Item = usize>>(dims: I) -> Vec<usize> {
    dims.into_iter().fold(Vec::new(), |mut rows, dim| {
        let row = match rows.last() {
            Some(last) => last * dim + dim - 1,
            None => dim,
        };

        rows.push(row);
        rows
    })
}

struct Rows<'a> {
    boundaries: &'a [usize],
    last: usize,
    n: usize,
    out: String,
}

impl<'a> Rows<'a> {
    fn new(boundaries: &'a [usize]) -> Self {
        Self {
            boundaries,
            last: boundaries.last().copied().unwrap_or(1),
            n: 0,
            out: String::new(),
        }
    }

    fn push(&mut self, line: &str) {
        for boundary in self.boundaries.iter().rev() {
            self.out.push_str(glyph(self.n, *boundary, Side::Left));
        }

        self.out.push_str(line);

        for boundary in self.boundaries {
            self.out.push_str(glyph(self.n, *boundary, Side::Right));
        }

        if self.n + 1 != self.last {
            self.out.push('\n');
        }

        self.n += 1;
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn glyph(n: usize, boundary: usize, side: Side) -> &'static str {
    let position = n % (boundary + 1);

    match side {
        Side::Left if position == 0 && boundary == 1 => "( ",
        Side::Left if position == 0 => "⎛ ",
        Side::Left if position + 1 == boundary => "⎝ ",
        Side::Left if position == boundary => "  ",
        Side::Left => "⎜ ",
        Side::Right if position == 0 && boundary == 1 => " )",
        Side::Right if position == 0 => " ⎞",
        Side::Right if position + 1 == boundary => " ⎠",
        Side::Right if position == boundary => "  ",
        Side::Right => " ⎟",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_rows() {
        assert_eq!(last_rows(vec![2]), vec![2]);
        assert_eq!(last_rows(vec![2, 2]), vec![2, 5]);
        assert_eq!(last_rows(vec![2, 3]), vec![2, 8]);
    }

    #[test]
    fn test_describe_vector() {
        assert_eq!(describe(&[1, 2, 3], &[3]), "( 1  2  3 )");
        assert_eq!(describe(&[1.5f32, -2.], &[1, 2]), "( 1.50  -2.00 )");
    }

    #[test]
    fn test_describe_matrix() {
        let values = [3., 4., 8., 10., 11., 18.2];
        let expected = "⎛  3.0000   4.0000   8.0000 ⎞\n⎝ 10.0000  11.0000  18.2000 ⎠";
        assert_eq!(describe(&values, &[2, 3]), expected);
    }

    #[test]
    fn test_describe_two_row_blocks() {
        let values = [1, 2, 3, 4, 5, 6];
        assert_eq!(describe(&values, &[3, 2]), "⎛ 1  2 ⎞\n⎜ 3  4 ⎟\n⎝ 5  6 ⎠");
    }

    #[test]
    fn test_describe_rank_three() {
        let values: Vec<i32> = (1..=12).collect();
        let expected = [
            "⎛ ⎛  1   2   3 ⎞ ⎞",
            "⎜ ⎝  4   5   6 ⎠ ⎟",
            "⎜                ⎟",
            "⎜ ⎛  7   8   9 ⎞ ⎟",
            "⎝ ⎝ 10  11  12 ⎠ ⎠",
        ]
        .join("\n");

        assert_eq!(describe(&values, &[2, 2, 3]), expected);
    }
}
