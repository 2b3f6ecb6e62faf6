//! Input data types: the point set, the label alphabet and tabular loading.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Cluster label: an index into a [`LabelAlphabet`].
pub type Label = usize;

/// Immutable ordered set of feature vectors, stored as one flat row-major buffer.
///
/// Holds at least one point of at least one feature, and every coordinate is
/// finite.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    data: Vec<f64>,
    dim: usize,
}

impl PointSet {
    /// Build a point set from rows of equal length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PointSetError> {
        let first = rows.first().ok_or(PointSetError::Empty)?;
        let dim = first.as_ref().len();
        if dim == 0 {
            return Err(PointSetError::ZeroDimension);
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dim {
                return Err(PointSetError::RaggedRow {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            if let Some(column) = values.iter().position(|v| !v.is_finite()) {
                return Err(PointSetError::NonFinite { row, column });
            }
            data.extend_from_slice(values);
        }

        Ok(Self { data, dim })
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Feature dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Feature vector of point `index`.
    #[inline]
    pub fn point(&self, index: usize) -> &[f64] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterate over all points in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.data.chunks_exact(self.dim)
    }
}

/// Point set construction errors.
#[derive(Debug, thiserror::Error)]
pub enum PointSetError {
    #[error("Point set must contain at least one point")]
    Empty,
    #[error("Points must have at least one feature")]
    ZeroDimension,
    #[error("Row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}, column {column} is not a finite number")]
    NonFinite { row: usize, column: usize },
}

/// The finite set of valid cluster labels for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAlphabet {
    names: Vec<String>,
}

impl LabelAlphabet {
    /// Sorted, de-duplicated labels of a reference labeling.
    pub fn from_reference<S: AsRef<str>>(labels: &[S]) -> Self {
        let names: BTreeSet<&str> = labels.iter().map(|label| label.as_ref()).collect();
        Self {
            names: names.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Alphabet of `count` anonymous clusters named "0".."count-1".
    pub fn with_count(count: usize) -> Self {
        Self {
            names: (0..count).map(|i| i.to_string()).collect(),
        }
    }

    /// Number of labels (K).
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name of a label.
    pub fn name(&self, label: Label) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A tabular dataset: feature rows plus one reference label per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Feature vectors.
    pub points: Vec<Vec<f64>>,
    /// Reference labels, only used to derive the label alphabet.
    pub labels: Vec<String>,
}

impl Dataset {
    /// Load a dataset, choosing JSON or delimited text by file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let dataset = if is_json {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::from_delimited(BufReader::new(File::open(path)?))?
        };

        dataset.check_lengths()?;
        log::info!(
            "Loaded {} points from {}",
            dataset.points.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse comma separated rows: numeric features followed by a label column.
    ///
    /// A leading row whose feature cells are not numeric is treated as a header.
    pub fn from_delimited<R: BufRead>(reader: R) -> Result<Self, DatasetError> {
        let mut points = Vec::new();
        let mut labels = Vec::new();
        let mut columns: Option<usize> = None;
        let mut seen_row = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let cells: Vec<&str> = trimmed.split(',').map(str::trim).collect();
            if cells.len() < 2 {
                return Err(DatasetError::MissingLabelColumn { line: line_no });
            }

            let (label, features) = cells.split_last().ok_or(DatasetError::Empty)?;
            let parsed: Result<Vec<f64>, _> = features
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    cell.parse::<f64>().map_err(|_| DatasetError::NotNumeric {
                        line: line_no,
                        column: column + 1,
                        value: (*cell).to_owned(),
                    })
                })
                .collect();

            let is_first = !seen_row;
            seen_row = true;
            let row = match parsed {
                Ok(row) => row,
                Err(_) if is_first => {
                    log::debug!("Treating line {} as a header", line_no);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(column) = row.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFinite {
                    line: line_no,
                    column: column + 1,
                });
            }

            match columns {
                Some(expected) if expected != cells.len() => {
                    return Err(DatasetError::RaggedRow {
                        line: line_no,
                        expected,
                        found: cells.len(),
                    });
                }
                Some(_) => {}
                None => columns = Some(cells.len()),
            }

            points.push(row);
            labels.push((*label).to_owned());
        }

        if points.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { points, labels })
    }

    fn check_lengths(&self) -> Result<(), DatasetError> {
        if self.points.is_empty() {
            return Err(DatasetError::Empty);
        }
        if self.points.len() != self.labels.len() {
            return Err(DatasetError::LabelCountMismatch {
                points: self.points.len(),
                labels: self.labels.len(),
            });
        }
        Ok(())
    }

    /// Build the immutable point set.
    pub fn point_set(&self) -> Result<PointSet, DatasetError> {
        Ok(PointSet::from_rows(&self.points)?)
    }

    /// Label alphabet: `clusters` anonymous labels when requested, otherwise
    /// the distinct reference labels.
    pub fn alphabet(&self, clusters: Option<usize>) -> LabelAlphabet {
        match clusters {
            Some(count) => LabelAlphabet::with_count(count),
            None => LabelAlphabet::from_reference(&self.labels),
        }
    }
}

/// Dataset loading errors.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Line {line}, column {column}: '{value}' is not a number")]
    NotNumeric {
        line: usize,
        column: usize,
        value: String,
    },
    #[error("Line {line}, column {column}: value is not finite")]
    NonFinite { line: usize, column: usize },
    #[error("Line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line} needs at least one feature and a label column")]
    MissingLabelColumn { line: usize },
    #[error("Dataset contains no rows")]
    Empty,
    #[error("Dataset has {points} points but {labels} labels")]
    LabelCountMismatch { points: usize, labels: usize },
    #[error("Invalid point set: {0}")]
    Points(#[from] PointSetError),
}
