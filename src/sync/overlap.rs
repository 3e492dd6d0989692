/*!
 * Timing overlap model.
 *
 * Every subtitle is modeled as a Gaussian pulse centered on its midpoint
 * with a standard deviation of a quarter of its duration. Two subtitles
 * score close to 1.0 when their centers coincide relative to their combined
 * spread and decay smoothly towards 0.0 as they drift apart.
 */

use crate::subtitle_processor::SubtitleEntry;

/// Center and spread of one subtitle's display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Temporal midpoint in ms
    pub mu: f64,
    /// Squared quarter duration
    pub variance: f64,
}

impl Pulse {
    pub fn of(entry: &SubtitleEntry) -> Self {
        let duration = entry.duration_ms() as f64;
        let sigma = duration / 4.0;
        Self {
            mu: entry.start_time_ms as f64 + duration / 2.0,
            variance: sigma * sigma,
        }
    }

    /// Overlap score against another pulse.
    pub fn overlap(&self, other: &Pulse) -> f64 {
        let distance = self.mu - other.mu;
        // Two zero-length subtitles: 1.0 when they coincide, 0.0 otherwise
        let spread = (2.0 * (self.variance + other.variance)).max(f64::MIN_POSITIVE);
        (-(distance * distance) / spread).exp()
    }
}

/// Dense row-major score matrix; rows are primary entries, columns are
/// secondary entries of the same block.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl OverlapMatrix {
    /// Score every primary entry against every secondary entry.
    pub fn build(primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> Self {
        let row_pulses: Vec<Pulse> = primary.iter().map(Pulse::of).collect();
        let col_pulses: Vec<Pulse> = secondary.iter().map(Pulse::of).collect();

        let data = row_pulses
            .iter()
            .flat_map(|row| col_pulses.iter().map(move |col| row.overlap(col)))
            .collect();

        Self {
            rows: row_pulses.len(),
            cols: col_pulses.len(),
            data,
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` when the buffer
    /// does not hold exactly `rows * cols` scores.
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (rows.checked_mul(cols)? == data.len()).then_some(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutable rows; yields nothing for a matrix without columns.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        // A matrix without columns has an empty buffer
        self.data.chunks_exact_mut(self.cols.max(1))
    }

    pub fn column_max(&self, col: usize) -> f64 {
        (0..self.rows).map(|row| self.get(row, col)).fold(0.0, f64::max)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
