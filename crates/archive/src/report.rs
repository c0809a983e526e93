//! CSV report output.

use crate::Archive;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use rpmlog_catalog::{REQUIRED_COLUMNS, Record};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// Writes the archive to `path` as CSV, replacing any existing file.
///
/// The header row is always `identifier,title,date,description`, followed by
/// one row per archived record in first-seen order. Extra catalog columns are
/// not included.
#[instrument(skip(archive, path), fields(path = %path.as_ref().display(), entries = archive.len()))]
pub fn write_report(archive: &Archive, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).or_raise(|| ErrorKind::Write(path.to_path_buf()))?;
    write_records(archive.records(), file).or_raise(|| ErrorKind::Write(path.to_path_buf()))?;
    tracing::debug!("Report written");
    Ok(())
}

/// Writes the header and `records` to any byte sink.
pub fn write_records<'a>(records: impl IntoIterator<Item = &'a Record>, sink: impl Write) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().terminator(csv::Terminator::CRLF).from_writer(sink);
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in records {
        writer.write_record(record.required_fields())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScanOptions, build};
    use rpmlog_catalog::Catalog;
    use std::fs;

    fn records() -> Vec<Record> {
        vec![
            Record::new("BA5403-010", "SB RPM Backpack", "2017-08-01", "Black, \"stealth\" edition"),
            Record::new("BA2449-089", "SB RPM Backpack", "2013-05-01", "Line one\nline two"),
            Record::new("DV1234-001", "", "", ""),
        ]
    }

    #[test]
    fn test_write_records_header_only() {
        let mut out = Vec::new();
        write_records(std::iter::empty(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "identifier,title,date,description\r\n");
    }

    #[test]
    fn test_write_records_reads_back() {
        let records = records();
        let mut out = Vec::new();
        write_records(&records, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), REQUIRED_COLUMNS);
        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.iter().collect::<Vec<_>>(), record.required_fields());
        }
    }

    #[test]
    fn test_write_report_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let images = temp_dir.path().join("images");
        fs::create_dir(&images).unwrap();
        for record in records() {
            fs::write(images.join(format!("{}_front.jpg", record.identifier)), b"").unwrap();
        }
        let catalog: Catalog = records().into_iter().collect();
        let archive = build(&images, &catalog, &ScanOptions::default()).unwrap();
        assert_eq!(archive.len(), 3);

        let output = temp_dir.path().join("archive_output.csv");
        write_report(&archive, &output).unwrap();

        let reread = Catalog::load(&output).unwrap();
        assert_eq!(reread.len(), archive.len());
        for identifier in archive.identifiers() {
            assert_eq!(reread.get(identifier), archive.get(identifier));
        }
    }

    #[test]
    fn test_write_report_preserves_order() {
        let catalog: Catalog = records().into_iter().collect();
        let mut archive = Archive::new();
        for name in ["DV1234-001_a.jpg", "BA5403-010_b.jpg", "BA2449-089_c.jpg"] {
            archive.consider(Path::new(name), &catalog, &ScanOptions::default());
        }
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("archive_output.csv");
        write_report(&archive, &output).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let order: Vec<String> = reader.records().map(|row| row.unwrap()[0].to_string()).collect();
        assert_eq!(order, ["DV1234-001", "BA5403-010", "BA2449-089"]);
    }

    #[test]
    fn test_identifier_cell_is_written_as_read() {
        let dataset = "identifier,title,date,description\n  BA2449-089 ,Backpack,,\n";
        let catalog = Catalog::from_reader(dataset.as_bytes()).unwrap();
        let mut archive = Archive::new();
        archive.consider(Path::new("BA2449-089_front.jpg"), &catalog, &ScanOptions::default());
        let mut out = Vec::new();
        write_records(archive.records(), &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "  BA2449-089 ");
    }

    #[test]
    fn test_write_report_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("archive_output.csv");
        fs::write(&output, "stale contents that are much longer than the new report will be\n".repeat(10)).unwrap();
        write_report(&Archive::new(), &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "identifier,title,date,description\r\n");
    }

    #[test]
    fn test_write_report_unwritable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("missing-dir").join("archive_output.csv");
        let err = write_report(&Archive::new(), &output).unwrap_err();
        assert_eq!(*err, ErrorKind::Write(output));
    }
}
