//! Physical data precedence table.
//!
//! The router's output: one row per physical qubit, one column per
//! relative time step. A cell holds a placed operation or nothing; an
//! operation spanning several qubits occupies one cell in each of its
//! rows, at the same column. Rows are ragged while routing runs and are
//! padded on demand; reading a row left to right gives the exact order
//! its physical qubit executes.

use grani_ir::{Event, LinearSchedule};

/// One operation placed into the table, qubit ids already physical.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The placed event, on physical indices.
    pub event: Event,
    /// Whether routing inserted this operation (a SWAP), as opposed to it
    /// originating in the source program.
    pub routing_swap: bool,
}

/// Ragged table of placements, indexed `[physical qubit][column]`.
#[derive(Debug, Clone)]
pub struct PhysicalDataPrecedenceTable {
    /// Per-row cells; `Some(idx)` points into `placements`.
    rows: Vec<Vec<Option<usize>>>,
    /// Arena of placed operations, shared by all rows they span.
    placements: Vec<Placement>,
}

impl PhysicalDataPrecedenceTable {
    /// An empty table with one row per physical qubit.
    pub fn new(num_physical: u32) -> Self {
        PhysicalDataPrecedenceTable {
            rows: vec![Vec::new(); num_physical as usize],
            placements: Vec::new(),
        }
    }

    /// Number of rows (physical qubits).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Current length of `row`.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Number of columns: the longest row.
    pub fn num_columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The placement at `(row, column)`, if any.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Placement> {
        let idx = *self.rows.get(row)?.get(column)?.as_ref()?;
        Some(&self.placements[idx])
    }

    /// All placements in insertion order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Write one operation into every row of `rows` at `column`.
    ///
    /// Rows shorter than `column` are padded with empty cells first, so
    /// the operation lands at the same relative time step everywhere it
    /// appears. `column` must be at or past the end of every row.
    pub fn place(&mut self, event: Event, rows: &[usize], column: usize, routing_swap: bool) {
        debug_assert!(rows.iter().all(|&row| self.rows[row].len() <= column));

        let idx = self.placements.len();
        self.placements.push(Placement {
            event,
            routing_swap,
        });
        for &row in rows {
            self.rows[row].resize(column, None);
            self.rows[row].push(Some(idx));
        }
    }

    /// Flatten into a linear schedule: columns outer, rows inner, each
    /// multi-row operation emitted once per column.
    pub fn flatten(&self) -> LinearSchedule {
        let mut schedule = LinearSchedule::new();
        for column in 0..self.num_columns() {
            let mut emitted: Vec<usize> = Vec::new();
            for row in &self.rows {
                let Some(Some(idx)) = row.get(column) else {
                    continue;
                };
                if !emitted.contains(idx) {
                    emitted.push(*idx);
                    schedule.push(self.placements[*idx].event.clone());
                }
            }
        }
        schedule
    }
}
