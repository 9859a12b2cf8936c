//! Ingredient matrix CSV files
//!
//! Ingredient names form the header and the first (index) column, the same
//! layout pandas writes with `to_csv()` and reads back with `index_col=0`.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use super::loader::read_csv_as_strings;
use super::{DataError, DataResult};
use crate::analysis::ingredients::IngredientMatrix;

const INDEX_COLUMN: &str = "ingredient";

pub fn load_matrix(path: &Path) -> DataResult<IngredientMatrix> {
    let df = read_csv_as_strings(path)?;
    let names = df.get_column_names_str();
    let Some((_, labels)) = names.split_first() else {
        return Err(DataError::Shape(format!("{:?} has no columns", path)));
    };
    let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();

    let index = df.get_columns()[0].str()?;
    let columns = df.get_columns()[1..]
        .iter()
        .map(|c| c.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut values = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row_label = index.get(i).unwrap_or_default();
        if labels.get(i).map(String::as_str) != Some(row_label) {
            return Err(DataError::Shape(format!(
                "row {} is labelled '{}' but column {} is '{}'",
                i,
                row_label,
                i + 1,
                labels.get(i).map(String::as_str).unwrap_or_default()
            )));
        }
        let row = columns
            .iter()
            .enumerate()
            .map(|(j, col)| {
                let raw = col.get(i).unwrap_or("0").trim();
                raw.parse::<f64>().map_err(|_| DataError::Parse {
                    row: i,
                    column: labels[j].clone(),
                    message: format!("invalid number '{}'", raw),
                })
            })
            .collect::<DataResult<Vec<f64>>>()?;
        values.push(row);
    }

    let matrix = IngredientMatrix::new(labels, values)?;
    info!("Loaded {}x{} matrix from {:?}", matrix.len(), matrix.len(), path);
    Ok(matrix)
}

pub fn save_matrix(matrix: &IngredientMatrix, path: &Path) -> DataResult<()> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut columns = vec![Column::new(INDEX_COLUMN.into(), matrix.labels())];
    for (j, label) in matrix.labels().iter().enumerate() {
        let values: Vec<f64> = matrix.rows().iter().map(|row| row[j]).collect();
        columns.push(Column::new(label.as_str().into(), &values));
    }
    let mut df = DataFrame::new(columns)?;

    let mut file = File::create(path).map_err(io_err)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    info!("Wrote {}x{} matrix to {:?}", matrix.len(), matrix.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_pandas_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ",salt,sugar").unwrap();
        writeln!(file, "salt,10,3").unwrap();
        writeln!(file, "sugar,3,7").unwrap();
        file.flush().unwrap();

        let m = load_matrix(file.path()).unwrap();
        assert_eq!(m.labels(), &["salt", "sugar"]);
        assert_eq!(m.get("salt", "sugar"), Some(3.0));
        assert_eq!(m.get("sugar", "sugar"), Some(7.0));
    }

    #[test]
    fn test_mislabelled_rows_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ",salt,sugar").unwrap();
        writeln!(file, "sugar,3,7").unwrap();
        writeln!(file, "salt,10,3").unwrap();
        file.flush().unwrap();

        assert!(matches!(load_matrix(file.path()), Err(DataError::Shape(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jaccard.csv");
        let m = IngredientMatrix::new(
            vec!["egg".into(), "flour".into()],
            vec![vec![1.0, 0.25], vec![0.25, 1.0]],
        )
        .unwrap();

        save_matrix(&m, &path).unwrap();
        let back = load_matrix(&path).unwrap();
        assert_eq!(back.labels(), m.labels());
        assert_eq!(back.get("egg", "flour"), Some(0.25));
    }
}
