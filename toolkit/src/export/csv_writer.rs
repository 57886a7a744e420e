// CSV rendering for exported records
use crate::config::ColumnSchema;
use crate::error::ExportError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use shared::models::ExportRecord;

/// Column order for `records` under the given schema policy.
pub fn derive_columns(records: &[ExportRecord], schema: ColumnSchema) -> Vec<String> {
    match schema {
        ColumnSchema::FirstRecord => records
            .first()
            .map(|first| first.fields().map(str::to_string).collect())
            .unwrap_or_default(),
        ColumnSchema::Union => {
            let mut columns: Vec<String> = Vec::new();
            for field in records.iter().flat_map(|r| r.fields()) {
                if !columns.iter().any(|c| c == field) {
                    columns.push(field.to_string());
                }
            }
            columns
        }
    }
}

// Header cells are quoted only when needed; data cells are always quoted.
// Embedded quotes are doubled by the csv writer.
pub fn render_csv(records: &[ExportRecord], columns: &[String]) -> Result<Vec<u8>, ExportError> {
    // The csv writer emits `""` for a zero-field record; keep such lines empty.
    if columns.is_empty() {
        return Ok(vec![b'\n'; records.len() + 1]);
    }

    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(columns)?;
    let buffer = header.into_inner().map_err(|e| ExportError::from(e.into_error()))?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for record in records {
        rows.write_record(columns.iter().map(|column| record.cell_text(column)))?;
    }
    rows.into_inner().map_err(|e| ExportError::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: &[ExportRecord], schema: ColumnSchema) -> String {
        let columns = derive_columns(records, schema);
        String::from_utf8(render_csv(records, &columns).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_field_renders_empty_cell() {
        let records = vec![
            ExportRecord::new().with("name", "Alice").with("amt", 100),
            ExportRecord::new().with("name", "Bob"),
        ];
        let csv = render(&records, ColumnSchema::Union);
        assert_eq!(csv, "name,amt\n\"Alice\",\"100\"\n\"Bob\",\"\"\n");
    }

    #[test]
    fn test_union_schema_collects_later_fields() {
        let records = vec![
            ExportRecord::new().with("school", "Nanjati"),
            ExportRecord::new().with("school", "Kafue").with("grant", 5000),
        ];
        assert_eq!(derive_columns(&records, ColumnSchema::Union), vec!["school", "grant"]);
        let csv = render(&records, ColumnSchema::Union);
        assert_eq!(csv, "school,grant\n\"Nanjati\",\"\"\n\"Kafue\",\"5000\"\n");
    }

    #[test]
    fn test_first_record_schema_drops_extra_fields() {
        let records = vec![
            ExportRecord::new().with("school", "Nanjati"),
            ExportRecord::new().with("school", "Kafue").with("grant", 5000),
        ];
        assert_eq!(derive_columns(&records, ColumnSchema::FirstRecord), vec!["school"]);
        let csv = render(&records, ColumnSchema::FirstRecord);
        assert_eq!(csv, "school\n\"Nanjati\"\n\"Kafue\"\n");
    }

    #[test]
    fn test_quotes_and_commas_are_escaped() {
        let records = vec![ExportRecord::new()
            .with("item", "Desks, \"large\"")
            .with("note", "line one")];
        let output = render(&records, ColumnSchema::Union);
        assert_eq!(output, "item,note\n\"Desks, \"\"large\"\"\",\"line one\"\n");

        // Parses back to the original value
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Desks, \"large\"");
    }

    #[test]
    fn test_header_with_delimiter_is_quoted() {
        let records = vec![ExportRecord::new().with("amount, ZMW", 10)];
        let csv = render(&records, ColumnSchema::Union);
        assert_eq!(csv, "\"amount, ZMW\"\n\"10\"\n");
    }

    #[test]
    fn test_records_without_fields_render_empty_lines() {
        let records = vec![ExportRecord::new(), ExportRecord::new()];
        assert!(derive_columns(&records, ColumnSchema::Union).is_empty());
        let output = render(&records, ColumnSchema::Union);
        assert_eq!(output, "\n\n\n");
        assert_eq!(output.lines().count(), 1 + records.len());
        assert!(output.lines().all(str::is_empty));
    }

    #[test]
    fn test_column_and_row_counts_follow_first_record() {
        let records: Vec<ExportRecord> = (0..5)
            .map(|i| ExportRecord::new().with("a", i).with("b", "x").with("c", i * 2))
            .collect();
        let csv = render(&records, ColumnSchema::FirstRecord);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + records.len());
        assert_eq!(lines[0].split(',').count(), records[0].len());
    }
}
