//! Traversal state for nested lists and tables.
//!
//! Both are plain value types owned by the renderer. Lists nest, so they live
//! on a stack; tables cannot nest in the source tree, so one context suffices.

use crate::builder::NumberingId;

/// Context of one open list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListContext {
    /// Numbering definition shared by all items of this list.
    pub numbering: NumberingId,
    /// Whether items are numbered rather than bulleted.
    pub ordered: bool,
    /// Nesting depth, 0 for a top-level list.
    pub depth: usize,
}

/// Stack of open lists, innermost last.
#[derive(Debug, Default)]
pub struct ListStack {
    stack: Vec<ListContext>,
}

impl ListStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a list whose depth is the current stack size.
    pub fn enter(&mut self, numbering: NumberingId, ordered: bool) -> ListContext {
        let context = ListContext {
            numbering,
            ordered,
            depth: self.stack.len(),
        };
        self.stack.push(context);
        context
    }

    /// Pop the innermost list. Does nothing when no list is open.
    pub fn exit(&mut self) -> Option<ListContext> {
        self.stack.pop()
    }

    /// Innermost open list.
    #[must_use]
    pub fn current(&self) -> Option<&ListContext> {
        self.stack.last()
    }

    /// Number of open lists.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// State for tracking table rendering.
#[derive(Debug)]
pub struct TableState {
    /// Width of the first row; fixed for the whole table.
    column_count: usize,
    /// Index of the current row, counted from 0.
    row_index: usize,
    /// Whether the current row is a header row.
    is_header_row: bool,
    /// Whether anything block-level was emitted into the current cell.
    cell_has_content: bool,
}

impl TableState {
    /// Start a new table with the given column count.
    #[must_use]
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            row_index: 0,
            is_header_row: false,
            cell_has_content: false,
        }
    }

    /// Column count taken from the first row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Start the row at `row_index`.
    pub fn start_row(&mut self, row_index: usize, is_header: bool) {
        self.row_index = row_index;
        self.is_header_row = is_header;
    }

    /// Current row index.
    #[must_use]
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Check if the current row is a header row.
    #[must_use]
    pub fn is_header_row(&self) -> bool {
        self.is_header_row
    }

    /// Start a new cell with no content.
    pub fn start_cell(&mut self) {
        self.cell_has_content = false;
    }

    /// Record that a paragraph was emitted into the current cell.
    pub fn mark_content(&mut self) {
        self.cell_has_content = true;
    }

    /// End the current cell, reporting whether it needs filler content.
    pub fn end_cell(&mut self) -> bool {
        let needs_filler = !self.cell_has_content;
        self.cell_has_content = false;
        needs_filler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_stack_depths() {
        let mut stack = ListStack::new();
        assert_eq!(stack.depth(), 0);

        let outer = stack.enter(NumberingId(1), false);
        assert_eq!(outer.depth, 0);
        let inner = stack.enter(NumberingId(2), true);
        assert_eq!(inner.depth, 1);
        assert_eq!(stack.current(), Some(&inner));

        stack.exit();
        assert_eq!(stack.current(), Some(&outer));
        stack.exit();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_list_stack_exit_on_empty_is_noop() {
        let mut stack = ListStack::new();
        assert_eq!(stack.exit(), None);
        assert_eq!(stack.exit(), None);
        assert_eq!(stack.depth(), 0);

        stack.enter(NumberingId(7), true);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_table_state_rows() {
        let mut state = TableState::new(3);
        assert_eq!(state.column_count(), 3);

        state.start_row(0, true);
        assert!(state.is_header_row());
        assert_eq!(state.row_index(), 0);

        state.start_row(1, false);
        assert!(!state.is_header_row());
        assert_eq!(state.row_index(), 1);
        assert_eq!(state.column_count(), 3);
    }

    #[test]
    fn test_table_state_cell_content() {
        let mut state = TableState::new(1);

        state.start_cell();
        assert!(state.end_cell());

        state.start_cell();
        state.mark_content();
        assert!(!state.end_cell());
    }
}
