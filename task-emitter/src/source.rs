//! CSV task source.
//!
//! Every line in the file becomes one message: its fields rejoined with a
//! comma. There is no header row and no row-shape validation. A blank line is
//! an empty message; a quoted field may continue over several lines.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};

use crate::error::EmitterError;

/// An opened CSV file of tasks.
pub struct CsvSource {
    path: PathBuf,
    file: File,
}

impl CsvSource {
    /// Open the CSV file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EmitterError> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|e| EmitterError::Source {
            path: path.display().to_string(),
            source: csv::Error::from(e),
        })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the source as a lazy sequence of messages in file order.
    ///
    /// The file is closed when the iterator is dropped.
    pub fn messages(self) -> Messages {
        Messages {
            path: self.path.display().to_string(),
            lines: BufReader::new(self.file).lines(),
        }
    }
}

/// Iterator over the messages of a [`CsvSource`].
pub struct Messages {
    path: String,
    lines: Lines<BufReader<File>>,
}

impl Messages {
    fn source_error(&self, source: csv::Error) -> EmitterError {
        EmitterError::Source {
            path: self.path.clone(),
            source,
        }
    }
}

impl Iterator for Messages {
    type Item = Result<String, EmitterError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pending = String::new();

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(self.source_error(csv::Error::from(e)))),
                // Unterminated quote at end of file: parse what was read.
                None if !pending.is_empty() => break,
                None => return None,
            };
            let line = line.strip_suffix('\r').unwrap_or(line.as_str());

            if pending.is_empty() && line.is_empty() {
                return Some(Ok(String::new()));
            }

            if !pending.is_empty() {
                pending.push('\n');
            }
            pending.push_str(line);

            if !ends_inside_quotes(&pending) {
                break;
            }
        }

        Some(parse_line(&pending).map_err(|e| self.source_error(e)))
    }
}

/// Whether `text` stops inside a quoted field.
///
/// A quote only opens a field at the start of that field; `""` inside a
/// quoted field is an escaped quote.
fn ends_inside_quotes(text: &str) -> bool {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field_start => in_quotes = true,
            ',' | '\n' if !in_quotes => {
                field_start = true;
                continue;
            }
            _ => {}
        }
        field_start = false;
    }

    in_quotes
}

/// Split one logical CSV line into fields and rejoin them.
fn parse_line(line: &str) -> Result<String, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(join_fields(&record))
}

/// Join a record's fields with `,`, no trailing delimiter.
pub fn join_fields(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn collect(file: &NamedTempFile) -> Vec<String> {
        CsvSource::open(file.path())
            .unwrap()
            .messages()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_join_fields() {
        let record = StringRecord::from(vec!["a", "b", "c"]);
        assert_eq!(join_fields(&record), "a,b,c");
        assert_eq!(join_fields(&StringRecord::from(vec!["solo"])), "solo");
    }

    #[test]
    fn test_messages_in_file_order() {
        let file = csv_file("a,b,c\n1,2\n");
        assert_eq!(collect(&file), vec!["a,b,c", "1,2"]);
    }

    #[test]
    fn test_first_row_is_data_not_header() {
        let file = csv_file("name,duration\ntask one,5\n");
        assert_eq!(collect(&file), vec!["name,duration", "task one,5"]);
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let file = csv_file("1,2,3,4\n5\n6,7\n");
        assert_eq!(collect(&file), vec!["1,2,3,4", "5", "6,7"]);
    }

    #[test]
    fn test_quoted_fields_are_unquoted() {
        let file = csv_file("\"hello, world\",x\n");
        assert_eq!(collect(&file), vec!["hello, world,x"]);
    }

    #[test]
    fn test_blank_line_is_empty_message() {
        let file = csv_file("a,b\n\nc\n");
        assert_eq!(collect(&file), vec!["a,b", "", "c"]);
    }

    #[test]
    fn test_trailing_blank_line_counts_final_newline_does_not() {
        let file = csv_file("a\n\n");
        assert_eq!(collect(&file), vec!["a", ""]);

        let file = csv_file("a\nb");
        assert_eq!(collect(&file), vec!["a", "b"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let file = csv_file("a,b\r\n\r\nc\r\n");
        assert_eq!(collect(&file), vec!["a,b", "", "c"]);
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let file = csv_file("\"first\nsecond\",x\ny\n");
        assert_eq!(collect(&file), vec!["first\nsecond,x", "y"]);
    }

    #[test]
    fn test_escaped_quotes() {
        let file = csv_file("\"say \"\"hi\"\"\",z\n");
        assert_eq!(collect(&file), vec!["say \"hi\",z"]);
    }

    #[test]
    fn test_bare_quote_inside_field_is_literal() {
        let file = csv_file("5\" pipe,3\nnext\n");
        assert_eq!(collect(&file), vec!["5\" pipe,3", "next"]);
    }

    #[test]
    fn test_ends_inside_quotes() {
        assert!(ends_inside_quotes("\"open,"));
        assert!(!ends_inside_quotes("\"closed\",x"));
        assert!(!ends_inside_quotes("\"a\"\"b\""));
        assert!(!ends_inside_quotes("5\" pipe"));
    }

    #[test]
    fn test_empty_file_has_no_messages() {
        let file = csv_file("");
        assert!(collect(&file).is_empty());
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvSource::open(dir.path().join("tasks.csv"));
        assert!(matches!(result, Err(EmitterError::Source { .. })));
    }
}
