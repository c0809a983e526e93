//! Reference dataset loading.
//!
//! The dataset is a comma-separated file with a header row. The columns in
//! [`REQUIRED_COLUMNS`] must be present; any others are kept on the
//! [`Record`] as extra metadata but play no part in matching.

use crate::Identifier;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read};
use std::path::Path;
use tracing::instrument;

/// Columns every reference dataset must declare, in report order.
pub const REQUIRED_COLUMNS: [&str; 4] = ["identifier", "title", "date", "description"];

/// One row of the reference dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// The `identifier` cell exactly as read; lookups use it trimmed.
    pub identifier: String,
    pub title: String,
    pub date: String,
    pub description: String,
    /// Any non-required columns, in header order.
    pub extra: IndexMap<String, String>,
}
impl Record {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            date: date.into(),
            description: description.into(),
            extra: IndexMap::new(),
        }
    }

    /// Looks up a column by name, required or extra.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            "identifier" => Some(&self.identifier),
            "title" => Some(&self.title),
            "date" => Some(&self.date),
            "description" => Some(&self.description),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// The required columns, in [`REQUIRED_COLUMNS`] order.
    pub fn required_fields(&self) -> [&str; 4] {
        [&self.identifier, &self.title, &self.date, &self.description]
    }
}

/// A row whose identifier was already present when it was read.
///
/// Kept for auditing only; the later row has already replaced the earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRow {
    pub identifier: String,
    /// 1-based line number in the dataset file.
    pub line: u64,
}

/// In-memory lookup from identifier to [`Record`].
///
/// Loaded once per run and read-only afterwards. When several rows share an
/// identifier the last one read wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: HashMap<String, Record>,
    duplicates: Vec<DuplicateRow>,
}
impl Catalog {
    /// Reads the reference dataset at `path`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotFound`] if the file does not exist.
    /// - [`ErrorKind::MissingColumns`] if the header lacks a required column.
    /// - [`ErrorKind::InvalidData`] if a row cannot be decoded.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == IoErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
        };
        let catalog = Self::from_reader(file)?;
        tracing::debug!(records = catalog.len(), duplicates = catalog.duplicates.len(), "Loaded reference dataset");
        Ok(catalog)
    }

    /// Reads a reference dataset from any byte source.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers().or_raise(|| ErrorKind::InvalidData)?.clone();
        // A repeated header name refers to its last column.
        let position = |column: &str| headers.iter().collect::<Vec<_>>().into_iter().rposition(|header| header == column);

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| position(*column).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            exn::bail!(ErrorKind::MissingColumns(missing));
        }
        // Presence was checked above.
        let [identifier, title, date, description] = REQUIRED_COLUMNS.map(|column| position(column).unwrap_or(0));
        let extra: Vec<(usize, &str)> =
            headers.iter().enumerate().filter(|(_, header)| !REQUIRED_COLUMNS.contains(header)).collect();

        let mut catalog = Self::default();
        for row in reader.records() {
            let row = row.or_raise(|| ErrorKind::InvalidData)?;
            // Short rows are allowed; absent cells read as empty.
            let cell = |index: usize| row.get(index).unwrap_or_default().to_string();
            let raw_identifier = cell(identifier);
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            if raw_identifier.trim().is_empty() {
                tracing::trace!(line, "Skipping reference row without an identifier");
                continue;
            }
            let record = Record {
                identifier: raw_identifier,
                title: cell(title),
                date: cell(date),
                description: cell(description),
                extra: extra.iter().map(|(index, header)| (header.to_string(), cell(*index))).collect(),
            };
            catalog.insert_at(record, line);
        }
        Ok(catalog)
    }

    /// Adds a record under its trimmed identifier, replacing (and returning)
    /// any record with the same key.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.identifier.trim().to_string(), record)
    }

    fn insert_at(&mut self, record: Record, line: u64) {
        let identifier = record.identifier.trim().to_string();
        if self.insert(record).is_some() {
            tracing::trace!(%identifier, line, "Reference row replaces an earlier row");
            self.duplicates.push(DuplicateRow { identifier, line });
        }
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&Record> {
        self.records.get(identifier.as_str())
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.records.contains_key(identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows that overwrote an earlier row with the same identifier, in file order.
    pub fn duplicates(&self) -> &[DuplicateRow] {
        &self.duplicates
    }

    /// Identifiers in the dataset that no image filename could ever produce,
    /// sorted for stable reporting.
    pub fn unmatchable(&self) -> Vec<&str> {
        let mut keys: Vec<&str> =
            self.records.keys().map(String::as_str).filter(|key| key.parse::<Identifier>().is_err()).collect();
        keys.sort_unstable();
        keys
    }
}
impl FromIterator<Record> for Catalog {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut catalog = Self::default();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const HEADER: &str = "identifier,title,date,description";

    fn load_str(csv: &str) -> Result<Catalog> {
        Catalog::from_reader(csv.as_bytes())
    }

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    #[test]
    fn test_load_basic() {
        let catalog = load_str(&format!(
            "{HEADER}\nBA2449-089,SB RPM Backpack,2013-05-01,\"Elephant print, black\"\nBA5403-010,SB RPM,2017-01-01,\n"
        ))
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.title, "SB RPM Backpack");
        assert_eq!(record.date, "2013-05-01");
        assert_eq!(record.description, "Elephant print, black");
        assert_eq!(catalog.get(&id("BA5403-010")).unwrap().description, "");
        assert!(catalog.duplicates().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let catalog =
            load_str(&format!("{HEADER}\nBA2449-089,First,2013,a\nBA5403-010,Other,2014,b\nBA2449-089,Second,2015,c\n"))
                .unwrap();
        assert_eq!(catalog.len(), 2);
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.title, "Second");
        assert_eq!(record.date, "2015");
        assert_eq!(catalog.duplicates(), &[DuplicateRow { identifier: "BA2449-089".to_string(), line: 4 }]);
    }

    #[test]
    fn test_identifier_key_is_trimmed() {
        let catalog = load_str(&format!("{HEADER}\n  BA2449-089 ,Backpack,2013,\n")).unwrap();
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.identifier, "  BA2449-089 ");
        assert!(catalog.unmatchable().is_empty());
    }

    #[test]
    fn test_padded_duplicates_share_a_key() {
        let catalog = load_str(&format!("{HEADER}\nBA2449-089,First,,\n BA2449-089,Second,,\n")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&id("BA2449-089")).unwrap().title, "Second");
        assert_eq!(catalog.duplicates(), &[DuplicateRow { identifier: "BA2449-089".to_string(), line: 3 }]);
    }

    #[test]
    fn test_repeated_header_uses_last_column() {
        let catalog = load_str("identifier,title,date,description,title\nBA2449-089,First,2013,desc,Last\n").unwrap();
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.title, "Last");
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_extra_columns_and_order() {
        let catalog =
            load_str("notes,identifier,colour,title,date,description\nnice,BA2449-089,Elephant,Backpack,2013,desc\n")
                .unwrap();
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.title, "Backpack");
        assert_eq!(record.extra.keys().collect::<Vec<_>>(), ["notes", "colour"]);
        assert_eq!(record.field("colour"), Some("Elephant"));
        assert_eq!(record.field("description"), Some("desc"));
        assert_eq!(record.field("nonexistent"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let catalog = load_str(&format!("{HEADER}\nBA2449-089,Backpack\n")).unwrap();
        let record = catalog.get(&id("BA2449-089")).unwrap();
        assert_eq!(record.title, "Backpack");
        assert_eq!(record.date, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_blank_identifiers_are_skipped() {
        let catalog = load_str(&format!("{HEADER}\n   ,Nameless,2013,\nBA2449-089,Backpack,2013,\n")).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[rstest]
    #[case("identifier,title,date", &["description"])]
    #[case("identifier,title", &["date", "description"])]
    #[case("title,date,description,notes", &["identifier"])]
    #[case("", &["date", "description", "identifier", "title"])]
    fn test_missing_columns(#[case] header: &str, #[case] expected: &[&str]) {
        let err = load_str(&format!("{header}\n")).unwrap_err();
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(*err, ErrorKind::MissingColumns(expected));
    }

    #[test]
    fn test_missing_description_names_column() {
        let err = load_str("identifier,title,date\nBA2449-089,Backpack,2013\n").unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_unmatchable() {
        let catalog = load_str(&format!("{HEADER}\nBA2449-089,ok,,\nBA2449,style only,,\n12345,numeric,,\n")).unwrap();
        assert_eq!(catalog.unmatchable(), ["12345", "BA2449"]);
    }

    #[test]
    fn test_load_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("model_data.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "BA2449-089,SB RPM Backpack,2013-05-01,Elephant").unwrap();
        drop(file);
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.contains(&id("BA2449-089")));
    }

    #[test]
    fn test_load_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("model_data.csv");
        let err = Catalog::load(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
        assert!(err.to_string().contains("please create this file"));
    }

    #[test]
    fn test_from_iter() {
        let catalog: Catalog =
            [Record::new("BA2449-089", "First", "", ""), Record::new("BA2449-089", "Second", "", "")].into_iter().collect();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&id("BA2449-089")).unwrap().title, "Second");
    }
}
