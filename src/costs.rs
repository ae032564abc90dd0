//! Weighted terrain. A cost file holds one grid row per line with positive integers separated by
//! whitespace, for example
//! ```text
//! 6 5 1
//! 1 8 5
//! 2 8 1
//! ```
//! The weight of a cell is the cost of entering it.
use core::fmt;
use std::io::{self, BufRead, Write};

use itertools::Itertools;
use log::warn;
use rand::Rng;

use crate::cell::Cell;
use crate::config::CostConfig;
use crate::error::{Result, SearchError};

/// Dense `rows x cols` table of strictly positive weights, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    values: Vec<u32>,
}

impl WeightMatrix {
    pub fn filled(rows: usize, cols: usize, weight: u32) -> Result<WeightMatrix> {
        if rows == 0 || cols == 0 {
            return Err(SearchError::InvalidDimensions { rows, cols });
        }
        if weight == 0 {
            return Err(SearchError::InvalidConfig("weights must be positive"));
        }
        Ok(WeightMatrix {
            rows,
            cols,
            values: vec![weight; rows * cols],
        })
    }

    /// Builds a matrix from nested rows. All rows must have the same non-zero length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<WeightMatrix> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(SearchError::InvalidDimensions {
                rows: height,
                cols: width,
            });
        }
        if rows.iter().flatten().any(|&w| w == 0) {
            return Err(SearchError::InvalidConfig("weights must be positive"));
        }
        Ok(WeightMatrix {
            rows: height,
            cols: width,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, cell: Cell) -> Option<u32> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(self.values[cell.row * self.cols + cell.col])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        self.values.chunks(self.cols)
    }
}

impl fmt::Display for WeightMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.iter_rows() {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

fn parse_weight(token: &str, line: usize) -> Result<u32> {
    match token.parse::<u32>() {
        Ok(0) => Err(SearchError::MalformedInput {
            line,
            reason: "weights must be positive".to_owned(),
        }),
        Ok(w) => Ok(w),
        Err(e) => Err(SearchError::MalformedInput {
            line,
            reason: format!("{token:?} is not a positive integer: {e}"),
        }),
    }
}

/// Reads a cost matrix that must be exactly `rows x cols`. Blank lines are skipped.
///
/// Lines whose value count differs from the first row are [SearchError::MalformedInput]; a
/// consistent matrix of the wrong shape is [SearchError::DimensionMismatch].
pub fn read_costs<R: BufRead>(reader: R, rows: usize, cols: usize) -> Result<WeightMatrix> {
    let mut parsed: Vec<Vec<u32>> = Vec::new();
    let mut width: Option<usize> = None;
    for (ix, line) in reader.lines().enumerate() {
        let line_no = ix + 1;
        let line = line.map_err(|e| SearchError::MalformedInput {
            line: line_no,
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_weight(token, line_no))
            .collect::<Result<Vec<u32>>>()?;
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(SearchError::MalformedInput {
                    line: line_no,
                    reason: format!("expected {} values, found {}", w, row.len()),
                });
            }
            Some(_) => {}
        }
        parsed.push(row);
    }
    let found = (parsed.len(), width.unwrap_or(0));
    if found != (rows, cols) {
        warn!(
            "Rejected cost matrix: expected {}x{}, found {}x{}",
            rows, cols, found.0, found.1
        );
        return Err(SearchError::DimensionMismatch {
            expected: (rows, cols),
            found,
        });
    }
    Ok(WeightMatrix {
        rows,
        cols,
        values: parsed.into_iter().flatten().collect(),
    })
}

/// [read_costs] over an in-memory string.
pub fn load_costs(source: &str, rows: usize, cols: usize) -> Result<WeightMatrix> {
    read_costs(source.as_bytes(), rows, cols)
}

/// Writes a matrix in the format [read_costs] accepts.
pub fn write_costs<W: Write>(matrix: &WeightMatrix, mut writer: W) -> io::Result<()> {
    for row in matrix.iter_rows() {
        writeln!(writer, "{}", row.iter().join(" "))?;
    }
    writer.flush()
}

/// Random terrain with weights drawn uniformly from `[min_cost, max_cost]`.
pub fn generate_costs<R: Rng + ?Sized>(config: &CostConfig, rng: &mut R) -> Result<WeightMatrix> {
    config.validate()?;
    let values = (0..config.rows * config.cols)
        .map(|_| rng.gen_range(config.min_cost..=config.max_cost))
        .collect();
    Ok(WeightMatrix {
        rows: config.rows,
        cols: config.cols,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    const COSTS: &str = "6 5 1\n1 8 5\n2 8 1";

    #[test]
    fn parses_rows() {
        let m = load_costs(COSTS, 3, 3).unwrap();
        assert_eq!(m.dimensions(), (3, 3));
        assert_eq!(m.get(Cell::new(0, 0)), Some(6));
        assert_eq!(m.get(Cell::new(1, 1)), Some(8));
        assert_eq!(m.get(Cell::new(2, 2)), Some(1));
        assert_eq!(m.get(Cell::new(3, 0)), None);
    }

    #[test]
    fn tolerates_trailing_newlines_and_extra_spaces() {
        let m = load_costs("  6 5\t1\n1 8 5\n2 8 1\n\n", 3, 3).unwrap();
        assert_eq!(m, load_costs(COSTS, 3, 3).unwrap());
    }

    #[test]
    fn rejects_bad_tokens() {
        for (source, line) in [("6 5 1\n1 x 5\n2 8 1", 2), ("6 5 1\n1 8 5\n2 0 1", 3), ("-1 5 1", 1)] {
            match load_costs(source, 3, 3) {
                Err(SearchError::MalformedInput { line: l, .. }) => assert_eq!(l, line),
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = load_costs("6 5 1\n1 8\n2 8 1", 3, 3).unwrap_err();
        assert!(matches!(err, SearchError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(
            load_costs("6 5 1\n1 8 5", 3, 3),
            Err(SearchError::DimensionMismatch {
                expected: (3, 3),
                found: (2, 3)
            })
        );
        assert_eq!(
            load_costs("6 5\n1 8\n2 8", 3, 3),
            Err(SearchError::DimensionMismatch {
                expected: (3, 3),
                found: (3, 2)
            })
        );
        assert!(matches!(
            load_costs("", 3, 3),
            Err(SearchError::DimensionMismatch { found: (0, 0), .. })
        ));
    }

    #[test]
    fn writes_expected_format() {
        let m = load_costs(COSTS, 3, 3).unwrap();
        let mut out = Vec::new();
        write_costs(&m, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "6 5 1\n1 8 5\n2 8 1\n");
        assert_eq!(m.to_string(), "6 5 1\n1 8 5\n2 8 1\n");
    }

    #[test]
    fn generated_costs_respect_bounds() {
        let config = CostConfig {
            rows: 7,
            cols: 5,
            min_cost: 2,
            max_cost: 4,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let m = generate_costs(&config, &mut rng).unwrap();
        assert_eq!(m.dimensions(), (7, 5));
        assert!(m.iter_rows().flatten().all(|w| (2..=4).contains(w)));
    }

    #[test]
    fn from_rows_validates() {
        assert!(WeightMatrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
        assert!(WeightMatrix::from_rows(vec![vec![1, 0]]).is_err());
        assert!(WeightMatrix::from_rows(Vec::new()).is_err());
        let m = WeightMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(m.get(Cell::new(1, 0)), Some(3));
    }
}
