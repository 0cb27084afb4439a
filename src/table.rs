//! Tabular I/O: reading the entity column and exporting the result table.

use std::collections::HashSet;
use std::io;

use crate::pipeline::ExtractionRecord;

pub const EXPORT_HEADER: [&str; 2] = ["entity", "extracted_info"];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("column '{0}' not found in input header")]
    ColumnNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Reads the values of `column` from CSV data, dropping blank cells and
/// duplicates while preserving first-seen order.
pub fn column_values<R: io::Read>(input: R, column: &str) -> Result<Vec<String>, TableError> {
    let mut reader = csv::Reader::from_reader(input);
    let index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(value) = record.get(index) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        if seen.insert(value.to_string()) {
            values.push(value.to_string());
        }
    }
    Ok(values)
}

/// Writes the result table as CSV. The `entity,extracted_info` header is
/// always present, even for an empty table.
pub fn write_csv<W: io::Write>(out: W, table: &[ExtractionRecord]) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(EXPORT_HEADER)?;
    for record in table {
        writer.write_record([record.entity.as_str(), record.extracted_info.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_values_preserve_order_and_drop_blanks_and_duplicates() {
        let csv_data = "\
company,city
Acme,Springfield
,Shelbyville
Globex,Cypress Creek
Acme,Springfield
  ,Ogdenville
Initech,Austin
";
        let values = column_values(csv_data.as_bytes(), "company").unwrap();
        assert_eq!(values, vec!["Acme", "Globex", "Initech"]);
    }

    #[test]
    fn column_values_from_other_column() {
        let csv_data = "company,city\nAcme,Springfield\nGlobex,Cypress Creek\n";
        let values = column_values(csv_data.as_bytes(), "city").unwrap();
        assert_eq!(values, vec!["Springfield", "Cypress Creek"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv_data = "company\nAcme\n";
        let result = column_values(csv_data.as_bytes(), "email");
        assert!(matches!(result, Err(TableError::ColumnNotFound(c)) if c == "email"));
    }

    #[test]
    fn export_writes_header_then_rows() {
        let table = vec![
            ExtractionRecord {
                entity: "Acme".to_string(),
                extracted_info: "info@acme.com".to_string(),
            },
            ExtractionRecord {
                entity: "Globex".to_string(),
                extracted_info: "hello@globex.com".to_string(),
            },
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "entity,extracted_info\nAcme,info@acme.com\nGlobex,hello@globex.com\n"
        );
    }

    #[test]
    fn export_of_empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "entity,extracted_info\n");
    }

    #[test]
    fn export_round_trip_preserves_values() {
        let table = vec![
            ExtractionRecord {
                entity: "Acme, Inc.".to_string(),
                extracted_info: "info@acme.com; \"sales\" line".to_string(),
            },
            ExtractionRecord {
                entity: "Globex".to_string(),
                extracted_info: "no public email found".to_string(),
            },
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &table).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let back: Vec<ExtractionRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(back, table);
    }
}
