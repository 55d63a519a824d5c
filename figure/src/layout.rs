/// Grid used to lay out `count` plots: columns grow first, then rows, until
/// every plot has a cell.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    let mut rows = 0;
    let mut cols = 0;
    while rows * cols < count {
        cols += 1;
        if rows * cols < count {
            rows += 1;
        }
    }
    (rows, cols)
}

/// (row, column) of the plot at `index` in a grid with `cols` columns.
pub fn cell_position(index: usize, cols: usize) -> (usize, usize) {
    if cols == 0 {
        return (0, 0);
    }
    (index / cols, index % cols)
}

/// Height of each plot when `rows` rows share `available` points after the header.
pub fn row_height(available: f32, header: f32, rows: usize) -> f32 {
    if rows == 0 {
        return 0.0;
    }
    ((available - header) / rows as f32).max(0.0)
}
