use eg_types::{EgError, EgResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

fn io_err(path: &str, source: std::io::Error) -> EgError {
    EgError::Io {
        path: path.to_string(),
        source: Arc::new(source),
    }
}

/// Reads the candidate file per spec §6: one sequence per line, trailing
/// whitespace stripped, empty lines ignored.
pub fn read_candidates(path: &str) -> EgResult<Vec<String>> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| io_err(path, e))?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        lines.push(trimmed.to_string());
    }
    Ok(lines)
}

/// Writes `edges` as a flat stream of little-endian `(i32, i32)` pairs, no
/// header, no terminator (spec §6 "Edge output file").
pub fn write_edges(path: &str, edges: &[(u32, u32)]) -> EgResult<()> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    for &(i, j) in edges {
        writer
            .write_all(&(i as i32).to_le_bytes())
            .map_err(|e| io_err(path, e))?;
        writer
            .write_all(&(j as i32).to_le_bytes())
            .map_err(|e| io_err(path, e))?;
    }
    writer.flush().map_err(|e| io_err(path, e))?;
    Ok(())
}
