//! Export/import of record lists as CSV.
//!
//! Spreadsheet users keep working with tabular files: one header row, then
//! one row per record, columns named after the record fields. Imported rows
//! go back through the normal services so they are validated and receive
//! fresh ids.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use shared::WorkingDayRecord;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::models::Record;
use super::record_service::RecordService;
use super::working_days_service::WorkingDaysService;

/// Write records as CSV and return how many rows were written
pub fn export_csv<T: Serialize, W: Write>(records: &[T], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Parse CSV rows into records
pub fn import_csv<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize().enumerate() {
        // Row 1 is the header
        let record: T = row.with_context(|| format!("Malformed CSV row {}", index + 2))?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a CSV file, replacing it atomically.
///
/// Rows go to a uniquely named temporary file in the target directory which
/// is renamed over `path` once complete. A failed export removes it again.
pub fn export_to_path<T: Serialize>(records: &[T], path: &Path) -> Result<usize> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    let count = export_csv(records, &mut temp_file)?;
    temp_file
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move export into {}", path.display()))?;

    info!("Exported {} rows to {}", count, path.display());
    Ok(count)
}

pub fn import_from_path<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    import_csv(file)
}

/// Export every stored record of one type
pub async fn export_records<T: Record>(service: &RecordService<T>, path: &Path) -> Result<usize> {
    let records = service.list().await?;
    export_to_path(&records, path)
}

/// Import a CSV file through the record service, stopping at the first failure
pub async fn import_records<T: Record>(service: &RecordService<T>, path: &Path) -> Result<Vec<T>> {
    let rows: Vec<T> = import_from_path(path)?;
    let mut stored = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let record = service
            .create(row)
            .await
            .with_context(|| format!("Failed to import {} row {}", T::KIND, index + 1))?;
        stored.push(record);
    }
    info!("Imported {} {} records from {}", stored.len(), T::KIND, path.display());
    Ok(stored)
}

/// Export the saved working-day history
pub async fn export_working_days(service: &WorkingDaysService, path: &Path) -> Result<usize> {
    let records = service.history(None).await?;
    export_to_path(&records, path)
}

/// Import working-day records.
///
/// Only `year` and `additional_holidays` are taken from each row; the rest is
/// recomputed and appended as a new record. Figures in the file that disagree
/// with the calculation are logged and replaced.
pub async fn import_working_days(
    service: &WorkingDaysService,
    path: &Path,
) -> Result<Vec<WorkingDayRecord>> {
    let rows: Vec<WorkingDayRecord> = import_from_path(path)?;
    let mut stored = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let record = service
            .calculate_and_save(row.year, row.additional_holidays)
            .await
            .with_context(|| format!("Failed to import working-days row {}", index + 1))?;
        if record.working_days != row.working_days {
            warn!(
                "Row {} for {} listed {} working days, stored {}",
                index + 1,
                row.year,
                row.working_days,
                record.working_days
            );
        }
        stored.push(record);
    }
    info!("Imported {} working-day records from {}", stored.len(), path.display());
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::working_days::WorkingDaysCalculator;
    use crate::storage::{MemoryRecordRepository, MemoryWorkingDayRepository};
    use shared::{BudgetItem, MasterRate};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn rate(category: &str, amount: f64) -> MasterRate {
        MasterRate {
            id: None,
            category: category.to_string(),
            level: "ชำนาญการพิเศษ".to_string(),
            amount,
            unit: "บาท/วัน".to_string(),
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut buffer = Vec::new();
        let count = export_csv(&[rate("เบี้ยเลี้ยง", 240.0).with_id(1)], &mut buffer).unwrap();
        assert_eq!(count, 1);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,category,level,amount,unit"));
        assert_eq!(lines.next(), Some("1,เบี้ยเลี้ยง,ชำนาญการพิเศษ,240.0,บาท/วัน"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_import_accepts_blank_ids_and_optional_fields() {
        let csv_text = "id,fiscal_year,code,name,category,amount,note\n\
                        ,2568,5101,เงินเดือน,งบบุคลากร,1200000,\n\
                        7,2568,5201,ค่าวัสดุ,งบดำเนินงาน,35000.5,จัดซื้อไตรมาส 1\n";
        let items: Vec<BudgetItem> = import_csv(csv_text.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, None);
        assert_eq!(items[0].note, None);
        assert_eq!(items[1].id, Some(7));
        assert_eq!(items[1].amount, 35000.5);
        assert_eq!(items[1].note.as_deref(), Some("จัดซื้อไตรมาส 1"));
    }

    #[test]
    fn test_import_reports_bad_row() {
        let csv_text = "id,category,level,amount,unit\n,เบี้ยเลี้ยง,ชำนาญการ,abc,บาท/วัน\n";
        let err = import_csv::<MasterRate, _>(csv_text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[tokio::test]
    async fn test_records_survive_export_and_import() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exports").join("rates.csv");

        let source = RecordService::<MasterRate>::new(Arc::new(MemoryRecordRepository::new()));
        source.create(rate("เบี้ยเลี้ยง", 240.0)).await.unwrap();
        source.create(rate("ค่าที่พัก", 1500.0)).await.unwrap();

        assert_eq!(export_records(&source, &path).await.unwrap(), 2);

        let target = RecordService::<MasterRate>::new(Arc::new(MemoryRecordRepository::new()));
        target.create(rate("ค่าพาหนะ", 100.0)).await.unwrap();
        let imported = import_records(&target, &path).await.unwrap();

        assert_eq!(imported.len(), 2);
        // Fresh ids from the target store
        assert_eq!(imported[0].id, Some(2));
        assert_eq!(imported[1].category, "ค่าที่พัก");
        assert_eq!(imported[1].amount, 1500.0);
    }

    #[tokio::test]
    async fn test_import_stops_at_invalid_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rates.csv");
        let csv_text = "id,category,level,amount,unit\n\
                        ,เบี้ยเลี้ยง,ชำนาญการ,240,บาท/วัน\n\
                        ,ค่าที่พัก,ชำนาญการ,-5,บาท/คืน\n";
        fs::write(&path, csv_text).unwrap();

        let service = RecordService::<MasterRate>::new(Arc::new(MemoryRecordRepository::new()));
        let err = import_records(&service, &path).await.unwrap_err();
        assert!(err.to_string().contains("row 2"));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_working_days_export_and_import() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("working_days.csv");

        let source = WorkingDaysService::new(
            WorkingDaysCalculator::new(),
            Arc::new(MemoryWorkingDayRepository::new()),
        );
        source.calculate_and_save(2568, 0).await.unwrap();
        source.calculate_and_save(2571, 5).await.unwrap();
        export_working_days(&source, &path).await.unwrap();

        let target = WorkingDaysService::new(
            WorkingDaysCalculator::new(),
            Arc::new(MemoryWorkingDayRepository::new()),
        );
        let imported = import_working_days(&target, &path).await.unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(target.latest_for_year(2571).await.unwrap().unwrap().working_days, 241);
        assert_eq!(target.latest_for_year(2568).await.unwrap().unwrap().working_days, 243);
    }

    #[tokio::test]
    async fn test_working_days_import_recomputes_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("working_days.csv");
        let csv_text = "id,year,total_days,weekend_days,holidays,additional_holidays,working_days\n\
                        ,2568,365,104,18,0,999\n\
                        9,2571,1,1,1,5,-40\n";
        fs::write(&path, csv_text).unwrap();

        let service = WorkingDaysService::new(
            WorkingDaysCalculator::new(),
            Arc::new(MemoryWorkingDayRepository::new()),
        );
        let imported = import_working_days(&service, &path).await.unwrap();
        assert_eq!(imported.len(), 2);

        let latest = service.latest_for_year(2568).await.unwrap().unwrap();
        assert_eq!(latest.working_days, 243);
        let latest = service.latest_for_year(2571).await.unwrap().unwrap();
        assert_eq!(latest.total_days, 366);
        assert_eq!(latest.weekend_days, 104);
        assert_eq!(latest.holidays, 16);
        assert_eq!(latest.additional_holidays, 5);
        assert_eq!(latest.working_days, 241);

        for record in service.history(None).await.unwrap() {
            assert_eq!(
                record.working_days,
                record.total_days
                    - record.weekend_days
                    - record.holidays
                    - record.additional_holidays
            );
        }
    }

    #[test]
    fn test_export_leaves_sibling_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rates.csv");
        let sibling = temp_dir.path().join("rates.tmp");
        fs::write(&sibling, "keep me").unwrap();

        export_to_path(&[rate("เบี้ยเลี้ยง", 240.0)], &path).unwrap();

        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
        assert!(fs::read_to_string(&path).unwrap().starts_with("id,category"));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_export_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");
        fs::write(&path, "previous").unwrap();

        // Rows of different lengths are rejected by the CSV writer
        let rows = vec![vec![1, 2], vec![3]];
        assert!(export_to_path(&rows, &path).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = import_from_path::<MasterRate>(&temp_dir.path().join("nope.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
