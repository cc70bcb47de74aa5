use sentence_dedup::error::EngineError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes one threshold's groups as a json array of id arrays, named
/// `groups-<threshold>.json` under `dir`.
pub fn write_group_file(
    dir: &Path,
    threshold: f64,
    groups: &[Vec<u32>],
) -> Result<PathBuf, EngineError> {
    let path = dir.join(format!("groups-{threshold}.json"));
    let file = File::create(&path)
        .map_err(|err| EngineError::io(format!("{}: {err}", path.display())))?;
    serde_json::to_writer(BufWriter::new(file), groups).map_err(EngineError::io)?;
    Ok(path)
}
