//! CSS table layout.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! A single traversal of the table subtree interprets row-group / row /
//! cell display values into a grid (synthesizing an implicit row when
//! cells appear directly under the table), records col/row spans and
//! cell borders, then the two-phase width algorithm of § 17.5.2 runs:
//! per-cell minimum/maximum content widths, column min/max from
//! single-column cells, span deficits distributed evenly, and the used
//! table width selected from the declared width or the containing
//! block.

use tern_css::keywords::{BorderCollapse, Display};
use tern_css::CssLength;
use tern_dom::NodeId;

use crate::document::Document;

/// One grid slot. Spanned slots keep `el: None`.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableCell {
    pub el: Option<NodeId>,
    pub colspan: i32,
    pub rowspan: i32,
    pub min_width: i32,
    pub max_width: i32,
    pub border_left: i32,
    pub border_right: i32,
    pub border_top: i32,
    pub border_bottom: i32,
}

/// Per-row bookkeeping.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableRow {
    pub el: Option<NodeId>,
    pub height: i32,
    pub top: i32,
    pub bottom: i32,
    pub css_height: CssLength,
    pub border_top: i32,
    pub border_bottom: i32,
}

/// Per-column bookkeeping.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableColumn {
    pub min_width: i32,
    pub max_width: i32,
    pub width: i32,
    pub left: i32,
    pub right: i32,
    pub css_width: CssLength,
    pub border_left: i32,
    pub border_right: i32,
}

/// The table grid: rows × columns of cells plus captions.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableGrid {
    pub rows: Vec<TableRow>,
    pub columns: Vec<TableColumn>,
    /// `cells[row][col]`; every row has `columns.len()` slots.
    pub cells: Vec<Vec<TableCell>>,
    /// `<caption>` elements, rendered above the grid.
    pub captions: Vec<NodeId>,
}

impl TableGrid {
    pub fn rows_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cols_count(&self) -> usize {
        self.columns.len()
    }

    /// Distribute a span deficit evenly over a column range.
    fn distribute_min_width(&mut self, deficit: i32, from: usize, to: usize) {
        distribute(&mut self.columns, deficit, from, to, |c| &mut c.min_width);
    }

    fn distribute_max_width(&mut self, deficit: i32, from: usize, to: usize) {
        distribute(&mut self.columns, deficit, from, to, |c| &mut c.max_width);
    }

    /// [§ 17.5.2 Table width algorithms](https://www.w3.org/TR/CSS2/tables.html#width-layout)
    ///
    /// Pick column widths for the available width. With a declared
    /// width the used width is `max(W, Σmin)`; with `width: auto` it is
    /// `min(available, Σmax)` clamped below by `Σmin`. Extra space over
    /// the minima is distributed in proportion to each column's
    /// `max - min` headroom.
    fn calc_table_width(&mut self, available: i32, is_auto: bool) -> i32 {
        let min_sum: i32 = self.columns.iter().map(|c| c.min_width).sum();
        let max_sum: i32 = self.columns.iter().map(|c| c.max_width).sum();

        if max_sum <= available {
            for col in &mut self.columns {
                col.width = col.max_width;
            }
            if is_auto {
                return max_sum;
            }
            // Declared width: stretch the remainder evenly.
            let extra = available - max_sum;
            if extra > 0 && !self.columns.is_empty() {
                let n = self.columns.len() as i32;
                for (i, col) in self.columns.iter_mut().enumerate() {
                    col.width += extra / n + i32::from((i as i32) < extra % n);
                }
            }
            return available;
        }

        if min_sum >= available {
            for col in &mut self.columns {
                col.width = col.min_width;
            }
            return min_sum;
        }

        // min_sum < available < max_sum: grow from the minima.
        let headroom: i32 = self
            .columns
            .iter()
            .map(|c| (c.max_width - c.min_width).max(0))
            .sum();
        let extra = available - min_sum;
        let count = self.columns.len().max(1) as i32;
        for col in &mut self.columns {
            let share = if headroom > 0 {
                (i64::from(extra) * i64::from((col.max_width - col.min_width).max(0))
                    / i64::from(headroom)) as i32
            } else {
                extra / count
            };
            col.width = col.min_width + share;
        }
        // Rounding remainder lands in the last column.
        let total: i32 = self.columns.iter().map(|c| c.width).sum();
        if let Some(last) = self.columns.last_mut() {
            last.width += available - total;
        }
        available
    }

    /// Assign column left/right edges with the horizontal spacing.
    fn calc_horizontal_positions(&mut self, spacing_x: i32) {
        let mut left = spacing_x;
        for col in &mut self.columns {
            col.left = left;
            col.right = left + col.width;
            left = col.right + spacing_x;
        }
    }

    /// Assign row top/bottom edges with the vertical spacing.
    fn calc_vertical_positions(&mut self, start_y: i32, spacing_y: i32) {
        let mut top = start_y + spacing_y;
        for row in &mut self.rows {
            row.top = top;
            row.bottom = top + row.height;
            top = row.bottom + spacing_y;
        }
    }
}

fn distribute<F>(columns: &mut [TableColumn], deficit: i32, from: usize, to: usize, field: F)
where
    F: Fn(&mut TableColumn) -> &mut i32,
{
    if deficit <= 0 || from > to || to >= columns.len() {
        return;
    }
    let span = (to - from + 1) as i32;
    for (i, col) in columns.iter_mut().enumerate().take(to + 1).skip(from) {
        let add = deficit / span + i32::from(((i - from) as i32) < deficit % span);
        *field(col) += add;
    }
}

impl Document {
    /// Build the grid for a table element.
    fn build_table_grid(&mut self, table: NodeId) -> TableGrid {
        let mut grid = TableGrid::default();
        // (row, col) slots already taken by a span.
        let mut blocked: Vec<(usize, usize)> = Vec::new();
        let mut max_cols = 0usize;

        let mut rows: Vec<NodeId> = Vec::new();
        let mut implicit_cells: Vec<NodeId> = Vec::new();
        self.collect_table_rows(table, &mut rows, &mut implicit_cells, &mut grid.captions);

        // Cells directly under the table get an anonymous row.
        let implicit_row = !implicit_cells.is_empty();

        let mut raw_rows: Vec<(Option<NodeId>, Vec<NodeId>)> = Vec::new();
        if implicit_row {
            raw_rows.push((None, implicit_cells));
        }
        for row in rows {
            let mut cells = Vec::new();
            for &child in self.tree.children(row) {
                if self.st(child).display == Display::TableCell {
                    cells.push(child);
                }
            }
            raw_rows.push((Some(row), cells));
        }

        let mut placed: Vec<Vec<(usize, TableCell)>> = Vec::new();
        for (r, (row_el, cells)) in raw_rows.iter().enumerate() {
            let mut row = TableRow {
                el: *row_el,
                css_height: row_el.map_or_else(CssLength::default, |el| self.st(el).css_height),
                ..TableRow::default()
            };
            let mut row_cells: Vec<(usize, TableCell)> = Vec::new();
            let mut col = 0usize;
            for &cell_el in cells {
                while blocked.contains(&(r, col)) {
                    col += 1;
                }
                let colspan = self
                    .tree
                    .attr(cell_el, "colspan")
                    .and_then(|v| v.trim().parse::<i32>().ok())
                    .unwrap_or(1)
                    .max(1);
                let rowspan = self
                    .tree
                    .attr(cell_el, "rowspan")
                    .and_then(|v| v.trim().parse::<i32>().ok())
                    .unwrap_or(1)
                    .max(1);

                self.calc_outlines(cell_el, 0);
                let borders = self.st(cell_el).borders;
                let cell = TableCell {
                    el: Some(cell_el),
                    colspan,
                    rowspan,
                    border_left: borders.left,
                    border_right: borders.right,
                    border_top: borders.top,
                    border_bottom: borders.bottom,
                    ..TableCell::default()
                };

                for rr in r..r + rowspan as usize {
                    for cc in col..col + colspan as usize {
                        if (rr, cc) != (r, col) {
                            blocked.push((rr, cc));
                        }
                    }
                }

                row_cells.push((col, cell));
                col += colspan as usize;
                max_cols = max_cols.max(col);
                if let Some(row_el) = row_el {
                    row.border_top = row.border_top.max(self.st(*row_el).borders.top);
                    row.border_bottom = row.border_bottom.max(self.st(*row_el).borders.bottom);
                }
            }
            max_cols = max_cols.max(col);
            grid.rows.push(row);
            placed.push(row_cells);
        }

        grid.columns = vec![TableColumn::default(); max_cols];
        grid.cells = placed
            .into_iter()
            .map(|row_cells| {
                let mut slots = vec![TableCell::default(); max_cols];
                for (col, cell) in row_cells {
                    if col < max_cols {
                        slots[col] = cell;
                    }
                }
                slots
            })
            .collect();

        // Column width hints and edge borders from origin cells.
        for r in 0..grid.rows_count() {
            for c in 0..grid.cols_count() {
                let cell = &grid.cells[r][c];
                if let Some(el) = cell.el {
                    if cell.colspan == 1 {
                        let w = self.st(el).css_width;
                        if !w.is_predefined() {
                            grid.columns[c].css_width = w;
                        }
                    }
                    grid.columns[c].border_left =
                        grid.columns[c].border_left.max(cell.border_left);
                    let right_col = (c + cell.colspan as usize - 1).min(max_cols - 1);
                    grid.columns[right_col].border_right =
                        grid.columns[right_col].border_right.max(cell.border_right);
                }
            }
        }

        grid
    }

    /// Collect rows (descending through row groups), stray cells and
    /// captions under a table element.
    fn collect_table_rows(
        &self,
        parent: NodeId,
        rows: &mut Vec<NodeId>,
        implicit_cells: &mut Vec<NodeId>,
        captions: &mut Vec<NodeId>,
    ) {
        for &child in self.tree.children(parent) {
            match self.st(child).display {
                Display::TableRow => rows.push(child),
                Display::TableRowGroup
                | Display::TableHeaderGroup
                | Display::TableFooterGroup => {
                    self.collect_table_rows(child, rows, implicit_cells, captions);
                }
                Display::TableCell => implicit_cells.push(child),
                Display::TableCaption => captions.push(child),
                _ => {}
            }
        }
    }

    /// [§ 17.5 Table layout](https://www.w3.org/TR/CSS2/tables.html#model)
    pub(crate) fn render_table(
        &mut self,
        id: NodeId,
        x: i32,
        y: i32,
        mut max_width: i32,
        _second_pass: bool,
    ) -> i32 {
        let parent_width = max_width;
        self.calc_outlines(id, parent_width);

        {
            let cml = self.content_margins_left(id);
            let cmt = self.content_margins_top(id);
            let st = self.st_mut(id);
            st.pos.clear();
            st.pos.move_to(x + cml, y + cmt);
        }
        self.st_mut(id).reset_layout();

        let mut grid = self.build_table_grid(id);

        let mut block_width: Option<i32> = None;
        if !self.st(id).css_width.is_predefined() {
            let w = self.calc_width(id, parent_width)
                - self.st(id).padding.width()
                - self.st(id).borders.width();
            block_width = Some(w);
            max_width = w;
        } else if max_width != 0 {
            max_width -= self.content_margins_left(id) + self.content_margins_right(id);
        }

        let collapse = self.st(id).border_collapse == BorderCollapse::Collapse;
        let spacing_x = if collapse { 0 } else { self.st(id).border_spacing_x };
        let spacing_y = if collapse { 0 } else { self.st(id).border_spacing_y };

        // [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
        //
        // Each inter-cell edge contributes max(adjacent borders); the
        // used width loses the shared halves.
        let table_width_spacing = if collapse {
            let mut spacing = 0;
            if grid.cols_count() > 0 {
                spacing -= self.st(id).borders.left.min(grid.columns[0].border_left);
                spacing -= self
                    .st(id)
                    .borders
                    .right
                    .min(grid.columns[grid.cols_count() - 1].border_right);
                for col in 1..grid.cols_count() {
                    spacing -= grid.columns[col]
                        .border_left
                        .min(grid.columns[col - 1].border_right);
                }
            }
            spacing
        } else {
            spacing_x * (grid.cols_count() as i32 + 1)
        };

        // Phase 1: per-cell minimum and maximum content widths.
        //
        // "The minimum is that required by the cell with the largest
        // minimum cell width; the maximum is that required by the cell
        // with the largest maximum cell width."
        if grid.cols_count() == 1 && block_width.is_some() {
            let w = block_width.unwrap_or(0);
            for r in 0..grid.rows_count() {
                if let Some(el) = grid.cells[r][0].el {
                    let rendered = self.render_element(el, 0, 0, w - table_width_spacing, false);
                    grid.cells[r][0].min_width = rendered;
                    grid.cells[r][0].max_width = rendered;
                }
            }
        } else {
            for r in 0..grid.rows_count() {
                for c in 0..grid.cols_count() {
                    let Some(el) = grid.cells[r][c].el else {
                        continue;
                    };
                    let col_width = grid.columns[c].css_width;
                    if !col_width.is_predefined()
                        && col_width.units() != tern_css::CssUnit::Percent
                        && grid.cells[r][c].colspan == 1
                    {
                        let css_w = col_width.calc_percent(block_width.unwrap_or(0));
                        let el_w = self.render_element(el, 0, 0, css_w, false);
                        let w = css_w.max(el_w);
                        grid.cells[r][c].min_width = w;
                        grid.cells[r][c].max_width = w;
                    } else {
                        grid.cells[r][c].min_width = self.render_element(el, 0, 0, 1, false);
                        grid.cells[r][c].max_width = self.render_element(
                            el,
                            0,
                            0,
                            (max_width - table_width_spacing).max(1),
                            false,
                        );
                    }
                }
            }
        }

        // Phase 2: column min/max from single-column cells...
        for c in 0..grid.cols_count() {
            grid.columns[c].min_width = 0;
            grid.columns[c].max_width = 0;
            for r in 0..grid.rows_count() {
                if grid.cells[r][c].colspan <= 1 {
                    grid.columns[c].min_width =
                        grid.columns[c].min_width.max(grid.cells[r][c].min_width);
                    grid.columns[c].max_width =
                        grid.columns[c].max_width.max(grid.cells[r][c].max_width);
                }
            }
        }

        // ...then spanning cells widen their columns to cover the span.
        for c in 0..grid.cols_count() {
            for r in 0..grid.rows_count() {
                let cell = grid.cells[r][c].clone();
                if cell.colspan > 1 && cell.el.is_some() {
                    let last = (c + cell.colspan as usize - 1).min(grid.cols_count() - 1);
                    let min_total: i32 =
                        grid.columns[c..=last].iter().map(|col| col.min_width).sum();
                    let max_total: i32 =
                        grid.columns[c..=last].iter().map(|col| col.max_width).sum();
                    if min_total < cell.min_width {
                        grid.distribute_min_width(cell.min_width - min_total, c, last);
                    }
                    if max_total < cell.max_width {
                        grid.distribute_max_width(cell.max_width - max_total, c, last);
                    }
                }
            }
        }

        // Width selection.
        let table_width = match block_width {
            Some(w) => grid.calc_table_width(w - table_width_spacing, false),
            None => grid.calc_table_width(max_width - table_width_spacing, true),
        } + table_width_spacing;
        grid.calc_horizontal_positions(spacing_x);

        // Captions render first, full width, above the rows.
        let mut caption_height = 0;
        for &caption in &grid.captions.clone() {
            self.render_element(caption, 0, caption_height, table_width, false);
            caption_height += self.el_height(caption);
        }

        // Render cells at their final widths; first-pass row heights
        // come from rowspan-1 cells.
        let mut row_span_found = false;
        for r in 0..grid.rows_count() {
            grid.rows[r].height = 0;
            for c in 0..grid.cols_count() {
                let cell = grid.cells[r][c].clone();
                let Some(el) = cell.el else { continue };
                let span_col = (c + cell.colspan as usize - 1).min(grid.cols_count() - 1);
                let cell_width = grid.columns[span_col].right - grid.columns[c].left;

                self.render_element(el, grid.columns[c].left, 0, cell_width, false);
                let cml = self.content_margins_left(el);
                let cmr = self.content_margins_right(el);
                self.st_mut(el).pos.width = cell_width - cml - cmr;
                self.st_mut(el).pos.x = grid.columns[c].left + cml;

                if cell.rowspan <= 1 {
                    grid.rows[r].height = grid.rows[r].height.max(self.el_height(el));
                } else {
                    row_span_found = true;
                }
            }
            // A row's declared height is a minimum.
            let css_h = grid.rows[r].css_height;
            if !css_h.is_predefined() && css_h.units() != tern_css::CssUnit::Percent {
                grid.rows[r].height = grid.rows[r].height.max(css_h.val() as i32);
            }
        }

        // Rowspanned cells expand the last row of their span.
        if row_span_found {
            for c in 0..grid.cols_count() {
                for r in 0..grid.rows_count() {
                    let cell = grid.cells[r][c].clone();
                    let Some(el) = cell.el else { continue };
                    if cell.rowspan > 1 {
                        let span_row = (r + cell.rowspan as usize - 1).min(grid.rows_count() - 1);
                        let spanned: i32 =
                            grid.rows[r..=span_row].iter().map(|row| row.height).sum();
                        let cell_height = self.el_height(el);
                        if spanned < cell_height {
                            grid.rows[span_row].height += cell_height - spanned;
                        }
                    }
                }
            }
        }

        grid.calc_vertical_positions(caption_height, spacing_y);

        // Row elements cover the full grid width (row backgrounds).
        for row in &grid.rows {
            if let Some(row_el) = row.el {
                let st = self.st_mut(row_el);
                st.pos = crate::geometry::Position::new(spacing_x, row.top, table_width - 2 * spacing_x, row.height);
                st.margins = Default::default();
                st.padding = Default::default();
                st.borders = Default::default();
            }
        }

        // Position cells vertically, stretch them to their span, then
        // re-express each cell relative to its tree ancestors (rows
        // carry a table-relative position; groups stay at the origin)
        // so the paint/hit-test recursion accumulates correctly.
        for r in 0..grid.rows_count() {
            for c in 0..grid.cols_count() {
                let cell = grid.cells[r][c].clone();
                let Some(el) = cell.el else { continue };
                let span_row = (r + cell.rowspan as usize - 1).min(grid.rows_count() - 1);
                let span_bottom = grid.rows[span_row].bottom;
                let cmt = self.content_margins_top(el);
                let cmb = self.content_margins_bottom(el);
                self.st_mut(el).pos.y = grid.rows[r].top + cmt;
                let h = span_bottom - grid.rows[r].top - cmt - cmb;
                if h > self.st(el).pos.height {
                    self.st_mut(el).pos.height = h;
                }

                let mut offset_x = 0;
                let mut offset_y = 0;
                let mut ancestor = self.tree.parent(el);
                while let Some(a) = ancestor {
                    if a == id {
                        break;
                    }
                    offset_x += self.st(a).pos.x;
                    offset_y += self.st(a).pos.y;
                    ancestor = self.tree.parent(a);
                }
                self.st_mut(el).pos.x -= offset_x;
                self.st_mut(el).pos.y -= offset_y;
            }
        }

        let grid_bottom = grid.rows.last().map_or(caption_height, |row| row.bottom);
        let table_height = grid_bottom + spacing_y;

        {
            let st = self.st_mut(id);
            st.pos.width = table_width;
            st.pos.height = table_height;
        }
        if let Some(h) = self.predefined_height(id) {
            if h > self.st(id).pos.height {
                self.st_mut(id).pos.height = h;
            }
        }

        self.st_mut(id).grid = Some(grid);

        table_width + self.content_margins_left(id) + self.content_margins_right(id)
    }
}
