use crate::dto::Record;
use crate::error::EngineError;
use csv::{Reader, Writer};
use std::fs::File;
use std::path::Path;

/// Loads an `id,text` candidate file, enforcing the input contract: ids are
/// dense, zero-based, and ascending. A duplicate or out-of-order id is an
/// upstream bug and refuses the whole run.
pub fn read_candidate_file(path: &Path) -> Result<Vec<Record>, EngineError> {
    let file =
        File::open(path).map_err(|err| EngineError::io(format!("{}: {err}", path.display())))?;
    let mut reader = Reader::from_reader(file);
    let headers = reader.headers().map_err(EngineError::io)?.clone();
    let records: Vec<Record> = reader
        .records()
        .map(|record| match record {
            Ok(rec) => rec.deserialize(Some(&headers)).map_err(|_| {
                EngineError::invalid_input("candidate file must contain columns 'id' and 'text'")
            }),
            Err(err) => Err(EngineError::io(err)),
        })
        .collect::<Result<_, _>>()?;
    for (row, record) in records.iter().enumerate() {
        if record.id as usize != row {
            return Err(EngineError::invalid_input(format!(
                "candidate ids must be dense and ascending from 0, found id {} at row {row}",
                record.id,
            )));
        }
    }
    Ok(records)
}

pub fn write_candidate_file(path: &Path, records: &[Record]) -> Result<(), EngineError> {
    let file =
        File::create(path).map_err(|err| EngineError::io(format!("{}: {err}", path.display())))?;
    let mut writer = Writer::from_writer(file);
    for record in records {
        writer.serialize(record).map_err(EngineError::io)?;
    }
    writer.flush().map_err(EngineError::io)
}
