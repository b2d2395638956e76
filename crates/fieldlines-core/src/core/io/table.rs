use crate::core::models::charge::Charge;
use crate::core::models::charge_set::ChargeSet;
use crate::core::models::streamline::Streamline;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid value on record {record}: {message}")]
    InvalidValue { record: usize, message: String },
    #[error("Sample grid has {lambdas} values but line {line} has {samples} samples")]
    GridMismatch {
        line: usize,
        lambdas: usize,
        samples: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct ChargeRecord {
    magnitude: f64,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct SampleRecord {
    line: usize,
    charge: usize,
    seed: usize,
    sample: usize,
    lambda: f64,
    x: f64,
    y: f64,
}

/// Reads charges from CSV with the header `magnitude,x,y`.
///
/// Records are appended in file order, so the row number (excluding the
/// header) becomes the charge index.
///
/// # Errors
///
/// Returns [`TableError::InvalidValue`] for non-finite numbers and
/// [`TableError::Csv`] for malformed rows.
pub fn read_charges<R: Read>(reader: R) -> Result<ChargeSet, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut charges = ChargeSet::new();
    for (record_idx, result) in csv_reader.deserialize::<ChargeRecord>().enumerate() {
        let record = result?;
        if !(record.magnitude.is_finite() && record.x.is_finite() && record.y.is_finite()) {
            return Err(TableError::InvalidValue {
                record: record_idx + 1,
                message: "charge values must be finite".to_string(),
            });
        }
        charges.add(record.magnitude, Point2::new(record.x, record.y));
    }
    Ok(charges)
}

pub fn read_charges_from_path<P: AsRef<Path>>(path: P) -> Result<ChargeSet, TableError> {
    let file = File::open(path)?;
    read_charges(BufReader::new(file))
}

pub fn write_charges<W: Write>(charges: &ChargeSet, writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for &Charge {
        magnitude,
        position,
    } in charges.iter()
    {
        csv_writer.serialize(ChargeRecord {
            magnitude,
            x: position.x,
            y: position.y,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_charges_to_path<P: AsRef<Path>>(
    charges: &ChargeSet,
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_charges(charges, BufWriter::new(file))
}

/// Writes traced field lines as one CSV row per sample.
///
/// Columns: `line,charge,seed,sample,lambda,x,y`. `lambdas` is the sample
/// grid shared by every line.
///
/// # Errors
///
/// Returns [`TableError::GridMismatch`] if a line's sample count differs
/// from the grid length.
pub fn write_streamlines<W: Write>(
    lines: &[Streamline],
    lambdas: &[f64],
    writer: W,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (line_idx, line) in lines.iter().enumerate() {
        if line.len() != lambdas.len() {
            return Err(TableError::GridMismatch {
                line: line_idx,
                lambdas: lambdas.len(),
                samples: line.len(),
            });
        }
        for (sample_idx, (point, &lambda)) in line.samples().iter().zip(lambdas).enumerate() {
            csv_writer.serialize(SampleRecord {
                line: line_idx,
                charge: line.charge_index,
                seed: line.seed_index,
                sample: sample_idx,
                lambda,
                x: point.x,
                y: point.y,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_streamlines_to_path<P: AsRef<Path>>(
    lines: &[Streamline],
    lambdas: &[f64],
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_streamlines(lines, lambdas, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn read_charges_parses_rows_in_order() {
        let data = "magnitude,x,y\n1,1,0\n-2.5, 0.5 ,-1\n";
        let charges = read_charges(Cursor::new(data)).unwrap();
        assert_eq!(
            charges.list(),
            vec![
                (1.0, Point2::new(1.0, 0.0)),
                (-2.5, Point2::new(0.5, -1.0)),
            ]
        );
    }

    #[test]
    fn read_charges_accepts_header_only() {
        let charges = read_charges(Cursor::new("magnitude,x,y\n")).unwrap();
        assert!(charges.is_empty());
    }

    #[test]
    fn read_charges_rejects_malformed_number() {
        let result = read_charges(Cursor::new("magnitude,x,y\n1,abc,0\n"));
        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn read_charges_rejects_non_finite_values() {
        let result = read_charges(Cursor::new("magnitude,x,y\n1,0,0\ninf,0,0\n"));
        assert!(matches!(
            result,
            Err(TableError::InvalidValue { record: 2, .. })
        ));
    }

    #[test]
    fn charges_survive_a_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charges.csv");
        let original = ChargeSet::demo();

        write_charges_to_path(&original, &path).unwrap();
        let restored = read_charges_from_path(&path).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn write_streamlines_emits_one_row_per_sample() {
        let lines = vec![
            Streamline::new(0, 0, 0.0, vec![Point2::new(0.2, 0.0), Point2::new(0.4, 0.0)]),
            Streamline::new(3, 1, 1.5, vec![Point2::new(1.0, 1.0), Point2::new(1.0, 2.0)]),
        ];
        let mut buffer = Vec::new();
        write_streamlines(&lines, &[0.0, 10.0], &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "line,charge,seed,sample,lambda,x,y");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1], "0,0,0,0,0.0,0.2,0.0");
        assert_eq!(rows[4], "1,3,1,1,10.0,1.0,2.0");
    }

    #[test]
    fn write_streamlines_rejects_grid_mismatch() {
        let lines = vec![Streamline::new(0, 0, 0.0, vec![Point2::origin()])];
        let result = write_streamlines(&lines, &[0.0, 1.0], Vec::new());
        assert!(matches!(
            result,
            Err(TableError::GridMismatch {
                line: 0,
                lambdas: 2,
                samples: 1
            })
        ));
    }
}
