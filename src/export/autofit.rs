use std::collections::{BTreeMap, BTreeSet};

/// Column width (in characters) beyond which text wraps when fitting
/// `until_max_width`.
pub const MAX_WIDTH: usize = 35;
/// Row height cap, in points.
pub const MAX_HEIGHT: f64 = 120.0;
/// Height of one text line, in points.
pub const LINE_HEIGHT: f64 = 14.4;

/// Cosmetic sizing for one worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fit {
    pub column_widths: BTreeMap<u16, f64>,
    pub row_heights: BTreeMap<u32, f64>,
    pub wrapped: BTreeSet<(u32, u16)>,
}

fn longest_line(text: &str) -> usize {
    text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0)
}

/// Sizes every used column to its longest line plus padding.
///
/// With `until_max_width`, columns stop growing at [`MAX_WIDTH`] and the
/// overflowing cells are marked for wrapping. Rows whose estimated height
/// exceeds [`MAX_HEIGHT`] are capped; other rows keep the default height.
pub fn autofit(cells: &BTreeMap<(u32, u16), String>, until_max_width: bool) -> Fit {
    let mut fit = Fit::default();

    for (&(row, col), text) in cells {
        let mut width = longest_line(text);
        if until_max_width && width > MAX_WIDTH {
            fit.wrapped.insert((row, col));
            width = MAX_WIDTH;
        }
        let entry = fit.column_widths.entry(col).or_insert(0.0);
        *entry = entry.max((width + 2) as f64);
    }

    let mut lines_per_row: BTreeMap<u32, usize> = BTreeMap::new();
    for (&(row, _), text) in cells {
        let lines: Vec<&str> = text.split('\n').collect();
        let wrapped = lines.iter().filter(|l| l.chars().count() > MAX_WIDTH).count();
        let entry = lines_per_row.entry(row).or_insert(0);
        *entry = (*entry).max(lines.len() + wrapped);
    }
    for (row, lines) in lines_per_row {
        if LINE_HEIGHT * lines as f64 > MAX_HEIGHT {
            fit.row_heights.insert(row, MAX_HEIGHT);
        }
    }

    fit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[((u32, u16), &str)]) -> BTreeMap<(u32, u16), String> {
        cells.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn width_tracks_longest_line() {
        let fit = autofit(&grid(&[((0, 0), "abc"), ((1, 0), "a\nabcdef"), ((0, 1), "")]), false);
        assert_eq!(fit.column_widths[&0], 8.0);
        assert_eq!(fit.column_widths[&1], 2.0);
        assert!(fit.wrapped.is_empty());
    }

    #[test]
    fn long_cells_wrap_at_max_width() {
        let long = "x".repeat(50);
        let fit = autofit(&grid(&[((0, 0), &long)]), true);
        assert_eq!(fit.column_widths[&0], (MAX_WIDTH + 2) as f64);
        assert!(fit.wrapped.contains(&(0, 0)));

        let unbounded = autofit(&grid(&[((0, 0), &long)]), false);
        assert_eq!(unbounded.column_widths[&0], 52.0);
    }

    #[test]
    fn tall_rows_are_capped() {
        let tall = vec!["line"; 10].join("\n");
        let fit = autofit(&grid(&[((3, 0), &tall), ((4, 0), "short")]), true);
        assert_eq!(fit.row_heights.get(&3), Some(&MAX_HEIGHT));
        assert!(fit.row_heights.get(&4).is_none());
    }
}
