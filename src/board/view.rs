use crate::model::{Paginated, Task, TaskState};

/// Tasks of one page grouped into the three state columns, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: [Vec<Task>; 3],
}

impl Board {
    pub fn partition(page: &Paginated<Task>) -> Self {
        let mut board = Board::default();
        for task in &page.data {
            board.columns[task.state.index()].push(task.clone());
        }
        board
    }

    pub fn column(&self, state: TaskState) -> &[Task] {
        &self.columns[state.index()]
    }

    /// Number of cards per column, in `TaskState::ALL` order.
    pub fn counts(&self) -> [(TaskState, usize); 3] {
        TaskState::ALL.map(|state| (state, self.column(state).len()))
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
