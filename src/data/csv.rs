//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label (a class name or a real-valued target)
//! - All other columns are numeric features
//! - First row can be headers (automatically detected)
//! - Blank lines and lines starting with `#` are skipped

use crate::core::{LSSVMError, Result};
use log::debug;
use ndarray::{Array2, ArrayView2};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dense dataset loaded from a CSV file
#[derive(Debug, Clone)]
pub struct CSVDataset {
    features: Array2<f64>,
    labels: Vec<String>,
    header: Option<Vec<String>>,
}

impl CSVDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader, detecting a header line
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(
        reader: R,
        auto_detect_header: bool,
    ) -> Result<Self> {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        let mut header = None;
        let mut n_features = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Only the first data-bearing line may be a header
            if n_features.is_none()
                && header.is_none()
                && auto_detect_header
                && Self::is_header_line(line)
            {
                header = Some(line.split(',').map(|f| f.trim().to_string()).collect());
                continue;
            }

            let (row, label) = Self::parse_data_line(line, line_no + 1)?;
            match n_features {
                None => n_features = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(LSSVMError::ParseError(format!(
                        "Line {}: expected {} feature columns, found {}",
                        line_no + 1,
                        expected,
                        row.len()
                    )));
                }
                Some(_) => {}
            }
            values.extend(row);
            labels.push(label);
        }

        let n_features = n_features.ok_or_else(|| {
            LSSVMError::InvalidInput("CSV input contains no data rows".to_string())
        })?;
        let features = Array2::from_shape_vec((labels.len(), n_features), values)
            .map_err(|e| LSSVMError::ParseError(e.to_string()))?;

        debug!(
            "Loaded CSV dataset: {} samples, {} features, header = {}",
            labels.len(),
            n_features,
            header.is_some()
        );

        Ok(CSVDataset {
            features,
            labels,
            header,
        })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Most feature columns fail to parse as numbers
        let n_feature_fields = fields.len() - 1;
        let non_numeric_count = fields
            .iter()
            .take(n_feature_fields)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        2 * non_numeric_count > n_feature_fields
    }

    /// Parse a CSV data line into feature values and a label
    fn parse_data_line(line: &str, line_no: usize) -> Result<(Vec<f64>, String)> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(LSSVMError::ParseError(format!(
                "Line {line_no}: too few fields: {line}"
            )));
        }

        let (label, feature_fields) = fields.split_last().ok_or_else(|| {
            LSSVMError::ParseError(format!("Line {line_no}: empty line"))
        })?;
        if label.is_empty() {
            return Err(LSSVMError::ParseError(format!(
                "Line {line_no}: missing label"
            )));
        }

        let row = feature_fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    LSSVMError::ParseError(format!(
                        "Line {line_no}: invalid feature value at column {}: {field}",
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((row, label.to_string()))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<f64> {
        self.features.view()
    }

    /// Raw label column
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column names, if the file had a header line
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Label column parsed as real-valued regression targets
    pub fn targets(&self) -> Result<Vec<f64>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                label.parse::<f64>().map_err(|_| {
                    LSSVMError::ParseError(format!(
                        "Sample {}: target '{label}' is not a number",
                        i + 1
                    ))
                })
            })
            .collect()
    }

    /// Split into owned features and labels
    pub fn into_parts(self) -> (Array2<f64>, Vec<String>) {
        (self.features, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Cursor;

    #[test]
    fn test_csv_basic() {
        let data = "1.0,2.0,1\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.features(), array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(dataset.labels(), &["1", "-1"]);
        assert!(dataset.header().is_none());
    }

    #[test]
    fn test_csv_with_headers() {
        let data = "feature1,feature2,label\n1.0,2.0,cat\n3.0,4.0,dog\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels(), &["cat", "dog"]);
        assert_eq!(
            dataset.header().unwrap(),
            &["feature1", "feature2", "label"]
        );
    }

    #[test]
    fn test_csv_keeps_zero_features() {
        let data = "1.0,0.0,2.0,a\n0.0,3.0,0.0,b\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.features(), array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]]);
    }

    #[test]
    fn test_csv_regression_targets() {
        let data = "1.0,2.0,0.5\n3.0,4.0,-0.25\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.targets().unwrap(), vec![0.5, -0.25]);

        let data = "1.0,2.0,setosa\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();
        assert!(matches!(
            dataset.targets(),
            Err(LSSVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_csv_empty_lines_and_comments() {
        let data = "# Comment\n1.0,2.0,1\n\n# another\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_csv_invalid_format() {
        // Too few fields
        let result = CSVDataset::from_reader(Cursor::new("1.0\n"));
        assert!(result.is_err());

        // Invalid number
        let result = CSVDataset::from_reader(Cursor::new("1.0,abc,-1\n2.0,3.0,1\n"));
        assert!(matches!(result, Err(LSSVMError::ParseError(_))));

        // Ragged rows
        let result = CSVDataset::from_reader(Cursor::new("1.0,2.0,1\n3.0,1\n"));
        assert!(matches!(result, Err(LSSVMError::ParseError(_))));
    }

    #[test]
    fn test_csv_no_data() {
        let result = CSVDataset::from_reader(Cursor::new("# nothing here\n\n"));
        assert!(matches!(result, Err(LSSVMError::InvalidInput(_))));

        let result = CSVDataset::from_reader(Cursor::new("x1,x2,label\n"));
        assert!(matches!(result, Err(LSSVMError::InvalidInput(_))));
    }

    #[test]
    fn test_csv_manual_header_control() {
        let data = "x,y,label\n1.0,2.0,1\n";

        let result = CSVDataset::from_reader_with_options(Cursor::new(data), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_header_line() {
        assert!(CSVDataset::is_header_line("feature1,feature2,label"));
        assert!(CSVDataset::is_header_line("x1,x2,x3,y"));
        assert!(CSVDataset::is_header_line("x,y"));
        assert!(!CSVDataset::is_header_line("1.5,y"));
        assert!(!CSVDataset::is_header_line("1.0,2.0,3.0,1"));
        assert!(!CSVDataset::is_header_line("1.0,2.0,virginica"));
        assert!(!CSVDataset::is_header_line("1"));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.5,1.5,yes").unwrap();
        writeln!(file, "2.5,3.5,no").unwrap();
        file.flush().unwrap();

        let dataset = CSVDataset::from_file(file.path()).unwrap();
        let (features, labels) = dataset.into_parts();
        assert_eq!(features.dim(), (2, 2));
        assert_eq!(labels, vec!["yes", "no"]);
    }
}
