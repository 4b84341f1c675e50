//! Blocks-per-entity CSV files.
//!
//! Header: `Entity \ Time period,<chunk labels...>`, then one row per entity
//! in first-seen order with one integer count per chunk. Fields containing a
//! comma, a quote or a line break are quoted, with quotes doubled.

use super::path::{file_size, prepare_path};
use crate::aggregator::BlocksPerEntity;
use crate::utils::config::CSV_HEADER_LABEL;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write per-entity block counts to a CSV file
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_blocks_per_entity(
    blocks_per_entity: &BlocksPerEntity,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing blocks per entity to: {}", output_path.display());

    prepare_path(output_path)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(blocks_per_entity_to_string(blocks_per_entity).as_bytes())?;
    writer.flush()?;

    info!(
        "Blocks per entity written successfully ({} bytes)",
        file_size(output_path)
    );
    Ok(())
}

/// Render per-entity block counts as CSV text
pub fn blocks_per_entity_to_string(blocks_per_entity: &BlocksPerEntity) -> String {
    let mut out = String::new();

    let header: Vec<&str> = std::iter::once(CSV_HEADER_LABEL)
        .chain(blocks_per_entity.chunks().iter().map(String::as_str))
        .collect();
    push_record(&mut out, header);

    for (entity, counts) in blocks_per_entity.iter() {
        let counts: Vec<String> = counts.iter().map(u64::to_string).collect();
        push_record(
            &mut out,
            std::iter::once(entity).chain(counts.iter().map(String::as_str)),
        );
    }

    out
}

/// Read per-entity block counts from a CSV file
///
/// # Errors
/// * `OutputError::WriteFailed` - file read error (reusing WriteFailed for I/O)
/// * `OutputError::MalformedCsv` - missing header, bad count, wrong row length
///   or duplicate entity
pub fn read_blocks_per_entity(input_path: impl AsRef<Path>) -> Result<BlocksPerEntity, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading blocks per entity from: {}", input_path.display());

    let contents = fs::read_to_string(input_path)?;
    parse_blocks_per_entity(&contents)
}

/// Parse CSV text written by [`blocks_per_entity_to_string`]
pub fn parse_blocks_per_entity(contents: &str) -> Result<BlocksPerEntity, OutputError> {
    let mut records = parse_records(contents)?.into_iter().enumerate();

    let (_, header) = records.next().ok_or_else(|| OutputError::MalformedCsv {
        line: 1,
        reason: "missing header".to_string(),
    })?;
    let chunks: Vec<String> = header.into_iter().skip(1).collect();
    let mut table = BlocksPerEntity::new(chunks);

    for (i, record) in records {
        let line = i + 1;
        let malformed = |reason: String| OutputError::MalformedCsv { line, reason };

        let mut fields = record.into_iter();
        let entity = fields
            .next()
            .ok_or_else(|| malformed("empty row".to_string()))?;
        let counts = fields
            .map(|field| {
                field
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| malformed(format!("invalid block count '{}'", field)))
            })
            .collect::<Result<Vec<u64>, OutputError>>()?;

        if counts.len() != table.chunks().len() {
            return Err(malformed(format!(
                "expected {} counts, found {}",
                table.chunks().len(),
                counts.len()
            )));
        }
        if !table.insert_row(entity.clone(), counts) {
            return Err(malformed(format!("duplicate entity '{}'", entity)));
        }
    }

    debug!(
        "Loaded {} entities over {} chunks",
        table.len(),
        table.chunks().len()
    );
    Ok(table)
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;

        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Split CSV text into records
///
/// Blank lines are skipped.
fn parse_records(contents: &str) -> Result<Vec<Vec<String>>, OutputError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut line = 1;
    let mut chars = contents.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => quoted = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                if !(record.is_empty() && field.is_empty()) {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
            }
            _ => field.push(c),
        }
    }

    if quoted {
        return Err(OutputError::MalformedCsv {
            line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !(record.is_empty() && field.is_empty()) {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> BlocksPerEntity {
        let mut table = BlocksPerEntity::new(vec!["Jan-2021".to_string(), "Feb-2021".to_string()]);
        table.add("Foundry USA", 0, 3);
        table.add("Pool, Inc.", 1, 7);
        table.add("say \"hi\"", 1, 1);
        table
    }

    #[test]
    fn test_exact_text() {
        let text = blocks_per_entity_to_string(&sample());
        assert_eq!(
            text,
            "Entity \\ Time period,Jan-2021,Feb-2021\n\
             Foundry USA,3,0\n\
             \"Pool, Inc.\",0,7\n\
             \"say \"\"hi\"\"\",0,1\n"
        );
    }

    #[test]
    fn test_parse_written_text() {
        let table = sample();
        let parsed = parse_blocks_per_entity(&blocks_per_entity_to_string(&table)).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let parsed =
            parse_blocks_per_entity("Entity \\ Time period,2021\r\n\r\nA,4\r\nB,0\r\n").unwrap();
        assert_eq!(parsed.counts_of("A"), Some(&[4][..]));
        assert_eq!(parsed.counts_of("B"), Some(&[0][..]));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_blocks_per_entity(""),
            Err(OutputError::MalformedCsv { line: 1, .. })
        ));
        assert!(matches!(
            parse_blocks_per_entity("h,2021\nA,x\n"),
            Err(OutputError::MalformedCsv { line: 2, .. })
        ));
        assert!(matches!(
            parse_blocks_per_entity("h,2021\nA,1,2\n"),
            Err(OutputError::MalformedCsv { .. })
        ));
        assert!(matches!(
            parse_blocks_per_entity("h,2021\nA,1\nA,2\n"),
            Err(OutputError::MalformedCsv { line: 3, .. })
        ));
        assert!(matches!(
            parse_blocks_per_entity("h,2021\n\"A,1\n"),
            Err(OutputError::MalformedCsv { .. })
        ));
    }
}
