use anyhow::{bail, Context};
use fiscore::tracks::TrackRecord;
use std::fs;
use std::path::Path;

/// Loads whitespace-delimited track records: one record per line, one
/// column per declared variable. Blank lines and `#` comments are
/// skipped.
pub fn load_records<P: AsRef<Path>>(
    path: P,
    expected_columns: usize,
) -> anyhow::Result<Vec<TrackRecord>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading track data {}", path_ref.display()))?;
    parse_records(&contents, expected_columns)
        .with_context(|| format!("parsing track data {}", path_ref.display()))
}

pub fn parse_records(contents: &str, expected_columns: usize) -> anyhow::Result<Vec<TrackRecord>> {
    let mut records = Vec::new();
    for (line_number, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut inputs = Vec::with_capacity(expected_columns);
        for token in trimmed.split_whitespace() {
            let value: f64 = token.parse().with_context(|| {
                format!("line {}: invalid value {:?}", line_number + 1, token)
            })?;
            inputs.push(value);
        }
        if inputs.len() != expected_columns {
            bail!(
                "line {}: expected {} columns, found {}",
                line_number + 1,
                expected_columns,
                inputs.len()
            );
        }
        records.push(TrackRecord::new(inputs));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let contents = "# speed altitude cpa tbh threat\n\n640 1500 4 75 50\n320 8000 30 400 50\n";
        let records = parse_records(contents, 5).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].inputs, vec![640.0, 1500.0, 4.0, 75.0, 50.0]);
    }

    #[test]
    fn parse_rejects_short_rows_with_the_line_number() {
        let err = parse_records("640 1500 4\n", 5).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }

    #[test]
    fn parse_rejects_non_numeric_values() {
        assert!(parse_records("640 fast 4 75 50\n", 5).is_err());
    }

    #[test]
    fn load_reads_a_data_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"# header\n10 20\n30 40\n").unwrap();
        let path = temp.into_temp_path();
        let records = load_records(&path, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].inputs, vec![30.0, 40.0]);
    }
}
