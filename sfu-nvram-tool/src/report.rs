use std::path::Path;

use csv::Writer;
use serde::Serialize;
use sfu_nvram::NvramRecord;

use crate::error::Error;

/// One row of the field export.
#[derive(Debug, Serialize)]
struct FieldRow<'a> {
    field: &'a str,
    offset: usize,
    length: usize,
    value: String,
}

/// Console lines describing every field of `record`, followed by the serial in token notation.
pub fn field_lines(record: &NvramRecord) -> Vec<String> {
    let mut lines: Vec<String> = record
        .fields()
        .map(|(field, value)| format!("{:<18} {}", format!("{field}:"), value))
        .collect();
    lines.push(format!("{:<18} \"{}\"", "serial_formatted:", record.serial_token()));
    lines
}

/// Export every field of `record` as CSV to the file at `path`.
pub fn write_csv<P: AsRef<Path>>(record: &NvramRecord, path: P) -> Result<(), Error> {
    let mut wtr = Writer::from_path(path)?;
    write_rows(&mut wtr, record)
}

/// Export every field of `record` as CSV and return the content as a `String`.
pub fn to_csv(record: &NvramRecord) -> Result<String, Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    write_rows(&mut wtr, record)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidValue(format!("CSV output is not valid UTF-8: {}", e)))
}

fn write_rows<W: std::io::Write>(wtr: &mut Writer<W>, record: &NvramRecord) -> Result<(), Error> {
    for (field, value) in record.fields() {
        let spec = field.spec();
        wtr.serialize(FieldRow {
            field: field.name(),
            offset: spec.offset,
            length: spec.len,
            value: value.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
