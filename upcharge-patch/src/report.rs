//! CSV artifacts of a run
//!
//! Four files per run, each overwritten: every collected product, the
//! products needing a patch, accepted updates and failed updates. Every file
//! starts with a header row, also when it has no data rows.

use crate::core::AppResult;
use shared::{ItemRecord, PatchOutcome};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const PRODUCTS_FILE: &str = "products_data.csv";
pub const FILTERED_FILE: &str = "products_data_filtered.csv";
pub const PASSED_FILE: &str = "passed_items.csv";
pub const FAILED_FILE: &str = "failed_items.csv";

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if needed
    pub fn prepare(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Item rows are written from each field's text form so nested values
    /// land in a single cell as compact JSON.
    pub fn write_items(&self, file_name: &str, items: &[ItemRecord]) -> AppResult<PathBuf> {
        self.write_rows(file_name, &ItemRecord::COLUMNS, items, |writer, item| {
            writer.write_record(item.values().iter().map(|value| value.to_string()))
        })
    }

    pub fn write_outcomes(&self, file_name: &str, outcomes: &[PatchOutcome]) -> AppResult<PathBuf> {
        self.write_rows(file_name, &PatchOutcome::COLUMNS, outcomes, |writer, outcome| {
            writer.serialize(outcome)
        })
    }

    fn write_rows<T>(
        &self,
        file_name: &str,
        header: &[&str],
        rows: &[T],
        write_row: impl Fn(&mut csv::Writer<File>, &T) -> csv::Result<()>,
    ) -> AppResult<PathBuf> {
        let path = self.dir.join(file_name);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(header)?;
        for row in rows {
            write_row(&mut writer, row)?;
        }
        writer.flush()?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "Artifact written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::catering_item;
    use shared::FieldValue;

    #[test]
    fn item_dump_has_header_and_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let mut item = catering_item(5001, "64.99", "59.99");
        item.variable_pricing_by = FieldValue::Null;
        let path = writer.write_items(PRODUCTS_FILE, &[item]).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "combo_upcharge,id,establishment,name,attribute_type,price,sorting,\
             updated_by,variable_pricing_by,tax_class,created_by,category"
        );
        assert_eq!(
            lines.next().unwrap(),
            "59.99,5001,/enterprise/Establishment/1/,Tray 5001,0,64.99,1,\
             /enterprise/User/1/,,1,/enterprise/User/1/,/products/ProductCategory/11/"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn nested_field_lands_in_one_cell() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let mut item = catering_item(5002, "10.00", "8.00");
        item.updated_by = serde_json::from_str(r#"{"id": 3, "name": "ops"}"#).unwrap();
        let path = writer.write_items(PRODUCTS_FILE, &[item]).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), ItemRecord::COLUMNS.len());
        assert_eq!(&row[7], r#"{"id":3,"name":"ops"}"#);
    }

    #[test]
    fn empty_outcome_file_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let path = writer.write_outcomes(FAILED_FILE, &[]).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            content.trim_end(),
            "product_id,name,establishment,category,status_code,response_text"
        );
    }

    #[test]
    fn outcome_without_status_leaves_cell_empty() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let outcome = PatchOutcome {
            product_id: "7".into(),
            name: "Tray, Large".into(),
            establishment: "/enterprise/Establishment/1/".into(),
            category: "/products/ProductCategory/11/".into(),
            status_code: None,
            response_text: "Transport error: timed out".into(),
        };

        let path = writer.write_outcomes(FAILED_FILE, &[outcome]).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "7,\"Tray, Large\",/enterprise/Establishment/1/,/products/ProductCategory/11/,,\
             Transport error: timed out"
        );
    }

    #[test]
    fn prepare_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("runs").join("today"));
        writer.prepare().unwrap();
        assert!(writer.dir().is_dir());
    }
}
