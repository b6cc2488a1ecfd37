#![warn(clippy::all, rust_2018_idioms)]

//! A small CSV reader for header-first tables of text cells.
//!
//! Lines starting with `#` and blank lines are ignored. The first remaining
//! line names the columns. Cells are kept as text; interpreting them is up to
//! the caller.

use std::path::{Path, PathBuf};

use thiserror::Error;

const DELIMITER_CANDIDATES: [char; 3] = [',', ';', '\t'];
const COMMENT_CHAR: char = '#';

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("input contains no header row")]
    MissingHeader,
    #[error("unterminated quoted field in line {line}")]
    UnterminatedQuote { line: usize },
}

pub struct Parser {
    // Holds the raw text, without a leading byte order mark.
    raw_input: String,
    delimiter: Option<char>,
}

#[derive(PartialEq, Copy, Clone, Debug)]
enum State {
    StartOfField,
    InField,
    InQuoted,
    QuoteInQuoted,
}

impl Parser {
    pub fn from_path(path: &Path) -> Result<Self, CsvError> {
        let raw_input = std::fs::read_to_string(path).map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("read {} bytes from {:?}", raw_input.len(), path);
        Ok(Parser::from_string(raw_input))
    }

    pub fn from_string(raw_input: String) -> Self {
        let raw_input = match raw_input.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_owned(),
            None => raw_input,
        };
        Self {
            raw_input,
            delimiter: None,
        }
    }

    /// Use `delimiter` instead of guessing it from the header line.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn parse(self) -> Result<Table, CsvError> {
        let mut lines = self
            .raw_input
            .lines()
            .enumerate()
            .map(|(line_no, line)| (line_no + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with(COMMENT_CHAR));

        let (header_line_no, header_line) = lines.next().ok_or(CsvError::MissingHeader)?;
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(header_line));
        log::debug!("using delimiter {:?}", delimiter);

        let headers = split_line(header_line, header_line_no, delimiter)?;
        let mut records = Vec::new();
        for (line_no, line) in lines {
            let fields = split_line(line, line_no, delimiter)?;
            if fields.len() != headers.len() {
                log::warn!(
                    "line {} has {} fields, header has {}",
                    line_no,
                    fields.len(),
                    headers.len()
                );
            }
            records.push(Record {
                line: line_no,
                fields,
            });
        }
        log::debug!("parsed {} rows with columns {:?}", records.len(), headers);

        Ok(Table { headers, records })
    }
}

/// Pick the candidate that appears most often outside quotes in `line`.
/// Ties go to the earlier candidate, no candidate at all means `,`.
fn detect_delimiter(line: &str) -> char {
    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for chr in line.chars() {
        if chr == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(i) = DELIMITER_CANDIDATES.iter().position(|c| *c == chr) {
            counts[i] += 1;
        }
    }
    let (best, count) = counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best, best_count), (i, count)| {
            if *count > best_count {
                (i, *count)
            } else {
                (best, best_count)
            }
        });
    if count == 0 {
        ','
    } else {
        DELIMITER_CANDIDATES[best]
    }
}

/// Split a single line into cells.
fn split_line(line: &str, line_no: usize, delimiter: char) -> Result<Vec<String>, CsvError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut state = State::StartOfField;

    for chr in line.chars() {
        match state {
            State::StartOfField => match chr {
                '"' => {
                    quoted = true;
                    state = State::InQuoted;
                }
                c if c == delimiter => {
                    fields.push(String::new());
                }
                // Leading whitespace of unquoted cells is dropped.
                ' ' | '\t' => (),
                c => {
                    current.push(c);
                    state = State::InField;
                }
            },

            State::InField => match chr {
                c if c == delimiter => {
                    fields.push(finish_field(&mut current, quoted));
                    quoted = false;
                    state = State::StartOfField;
                }
                c => current.push(c),
            },

            State::InQuoted => match chr {
                '"' => state = State::QuoteInQuoted,
                c => current.push(c),
            },

            State::QuoteInQuoted => match chr {
                // A doubled quote is a literal quote.
                '"' => {
                    current.push('"');
                    state = State::InQuoted;
                }
                c if c == delimiter => {
                    fields.push(finish_field(&mut current, quoted));
                    quoted = false;
                    state = State::StartOfField;
                }
                // Text after the closing quote is kept as is.
                c => {
                    current.push(c);
                    state = State::InField;
                }
            },
        }
    }

    match state {
        State::InQuoted => return Err(CsvError::UnterminatedQuote { line: line_no }),
        State::StartOfField if !fields.is_empty() => fields.push(String::new()),
        State::StartOfField => (),
        State::InField | State::QuoteInQuoted => fields.push(finish_field(&mut current, quoted)),
    }
    Ok(fields)
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted {
        field
    } else {
        field.trim_end().to_owned()
    }
}

/// A parsed CSV file: column names and the rows below them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of the column called `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(move |record| Row {
            table: self,
            record,
        })
    }
}

/// A borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a Record,
}

impl<'a> Row<'a> {
    /// Line number in the source text, starting at 1.
    pub fn line(&self) -> usize {
        self.record.line
    }

    /// Cell of column `name`, `None` if there is no such column or the row
    /// is too short.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.table.column(name).and_then(|i| self.get_index(i))
    }

    pub fn get_index(&self, index: usize) -> Option<&'a str> {
        self.record.fields.get(index).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parse(text: &str) -> Table {
        Parser::from_string(text.to_string()).parse().unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        init();
        let table = parse("country,population,gdp,ecc\nX,10,1.0,50\nY,20,2.5,100\n");
        assert_eq!(table.headers(), ["country", "population", "gdp", "ecc"]);
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("country"), Some("X"));
        assert_eq!(rows[1].get("gdp"), Some("2.5"));
        assert_eq!(rows[1].line(), 3);
        assert_eq!(rows[0].get("missing"), None);
    }

    #[test]
    fn test_detects_semicolon_and_tab() {
        init();
        let table = parse("a;b;c\n1;2;3");
        assert_eq!(table.headers(), ["a", "b", "c"]);
        let table = parse("a\tb\n1\t2");
        assert_eq!(table.rows().next().unwrap().get("b"), Some("2"));
        // A comma inside quotes does not count.
        assert_eq!(detect_delimiter("\"x,y\";z"), ';');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_explicit_delimiter_wins() {
        init();
        let table = Parser::from_string("a|b\n1|2".into())
            .with_delimiter('|')
            .parse()
            .unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
    }

    #[test]
    fn test_quoted_fields() {
        init();
        let table = parse("name,value\n\"Korea, South\",3\n\"say \"\"hi\"\"\",4\n");
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("name"), Some("Korea, South"));
        assert_eq!(rows[1].get("name"), Some("say \"hi\""));
        assert_eq!(rows[1].get("value"), Some("4"));
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        init();
        let res = Parser::from_string("a,b\n\"open,2\n".into()).parse();
        assert!(matches!(res, Err(CsvError::UnterminatedQuote { line: 2 })));
    }

    #[test]
    fn test_comments_blank_lines_whitespace_and_bom() {
        init();
        let table = parse("\u{feff}# a comment\n\n a , b \r\n 1 , 2 \r\n\n");
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows().next().unwrap().get("b"), Some("2"));
    }

    #[test]
    fn test_ragged_rows_and_empty_cells() {
        init();
        let table = parse("a,b,c\n1,,3\n4\n5,6,\n");
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[1].get("b"), None);
        assert_eq!(rows[2].get("c"), Some(""));
    }

    #[test]
    fn test_missing_header() {
        init();
        let res = Parser::from_string("# only a comment\n\n".into()).parse();
        assert!(matches!(res, Err(CsvError::MissingHeader)));
    }

    #[test]
    fn test_missing_file() {
        init();
        let res = Parser::from_path(Path::new("/definitely/not/here.csv"));
        assert!(matches!(res, Err(CsvError::Io { .. })));
    }
}
