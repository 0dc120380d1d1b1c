//! Descriptor dataset: container and text loader.
//!
//! A dataset is a contiguous row-major `f32` slab of `count` rows, each
//! exactly `dimension` wide. It is built once by the loader, borrowed
//! read-only by every worker for the duration of a search, and dropped by
//! its owner afterwards.
//!
//! On-disk text format (produced by the descriptor summarizer):
//!
//! ```text
//! <count>
//! <dimension>
//! v0,v1,...,v(D-1),
//! ...               (count rows, trailing comma tolerated)
//! ```
//!
//! The two header integers may share a line or occupy one line each.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

/// Error from dataset construction or parsing.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset header is incomplete: expected count and dimension")]
    MissingHeader,
    #[error("invalid {field} in dataset header: {value:?}")]
    InvalidHeader { field: &'static str, value: String },
    #[error("dataset dimension must be non-zero")]
    ZeroDimension,
    #[error("row {row}: expected {expected} values, got {got}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("row {row}: invalid value {value:?}")]
    InvalidValue { row: usize, value: String },
    #[error("expected {expected} rows, found {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row count {0} exceeds the supported maximum")]
    TooManyRows(usize),
    #[error("value buffer length {len} is not count x dimension ({count} x {dimension})")]
    ShapeMismatch {
        len: usize,
        count: usize,
        dimension: usize,
    },
}

/// An immutable table of fixed-width `f32` descriptors.
#[derive(Debug, Clone)]
pub struct Dataset {
    values: Vec<f32>,
    count: usize,
    dimension: usize,
}

impl Dataset {
    /// Wrap an existing row-major slab. The slab length must be an exact
    /// multiple of `dimension`.
    pub fn new(values: Vec<f32>, dimension: usize) -> Result<Self, DatasetError> {
        if dimension == 0 {
            if !values.is_empty() {
                return Err(DatasetError::ZeroDimension);
            }
            return Ok(Self {
                values,
                count: 0,
                dimension,
            });
        }
        if !values.len().is_multiple_of(dimension) {
            return Err(DatasetError::ShapeMismatch {
                len: values.len(),
                count: values.len() / dimension,
                dimension,
            });
        }
        let count = values.len() / dimension;
        if count > u32::MAX as usize {
            return Err(DatasetError::TooManyRows(count));
        }
        Ok(Self {
            values,
            count,
            dimension,
        })
    }

    /// Build a dataset from individual rows, checking that every row has
    /// the same width.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, DatasetError> {
        let dimension = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * dimension);
        for (row, descriptor) in rows.iter().enumerate() {
            if descriptor.len() != dimension {
                return Err(DatasetError::RowWidth {
                    row,
                    expected: dimension,
                    got: descriptor.len(),
                });
            }
            values.extend_from_slice(descriptor);
        }
        Self::new(values, dimension)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Width of every descriptor.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Borrow descriptor `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.values[start..start + self.dimension]
    }

    /// Parse the text format from any buffered reader.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, DatasetError> {
        let mut lines = reader.lines();

        // Header: two integers, possibly sharing a line.
        let mut header: Vec<String> = Vec::with_capacity(2);
        for line in lines.by_ref() {
            let line = line?;
            header.extend(line.split_whitespace().map(str::to_owned));
            if header.len() >= 2 {
                break;
            }
        }
        if header.len() > 2 {
            return Err(DatasetError::InvalidHeader {
                field: "header",
                value: header.join(" "),
            });
        }
        let [count_token, dimension_token] = header.as_slice() else {
            return Err(DatasetError::MissingHeader);
        };
        let count: usize =
            count_token
                .parse()
                .map_err(|_| DatasetError::InvalidHeader {
                    field: "count",
                    value: count_token.clone(),
                })?;
        let dimension: usize =
            dimension_token
                .parse()
                .map_err(|_| DatasetError::InvalidHeader {
                    field: "dimension",
                    value: dimension_token.clone(),
                })?;
        if dimension == 0 {
            return Err(DatasetError::ZeroDimension);
        }
        if count > u32::MAX as usize {
            return Err(DatasetError::TooManyRows(count));
        }

        let mut values = Vec::with_capacity(count * dimension);
        let mut rows_read = 0usize;
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if rows_read == count {
                return Err(DatasetError::RowCount {
                    expected: count,
                    got: rows_read + 1,
                });
            }
            let mut width = 0usize;
            for token in line.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    // Trailing delimiter.
                    continue;
                }
                let value: f32 = token.parse().map_err(|_| DatasetError::InvalidValue {
                    row: rows_read,
                    value: token.to_owned(),
                })?;
                values.push(value);
                width += 1;
            }
            if width != dimension {
                return Err(DatasetError::RowWidth {
                    row: rows_read,
                    expected: dimension,
                    got: width,
                });
            }
            rows_read += 1;
        }
        if rows_read != count {
            return Err(DatasetError::RowCount {
                expected: count,
                got: rows_read,
            });
        }

        Ok(Self {
            values,
            count,
            dimension,
        })
    }

    /// Load a dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open dataset file {path:?}"))?;
        let dataset = Self::read_from(BufReader::new(file))
            .with_context(|| format!("parse dataset file {path:?}"))?;
        Ok(dataset)
    }
}
