use anyhow::{Context, Result};
use shared::WorkingDayRecord;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::working_days::WorkingDaysCalculator;
use crate::storage::WorkingDayStorage;

/// What to show for a year: the saved record if there is one, otherwise a
/// fresh calculation with no additional holidays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDaysView {
    pub record: WorkingDayRecord,
    pub saved: bool,
}

/// Service that pairs the calculator with working-day storage
#[derive(Clone)]
pub struct WorkingDaysService {
    calculator: WorkingDaysCalculator,
    storage: Arc<dyn WorkingDayStorage>,
    /// Serializes saves so two calculations cannot land out of order
    write_lock: Arc<Mutex<()>>,
}

impl WorkingDaysService {
    pub fn new(calculator: WorkingDaysCalculator, storage: Arc<dyn WorkingDayStorage>) -> Self {
        Self {
            calculator,
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Compute a breakdown without storing it
    pub fn calculate(&self, year: i32, additional_holidays: i32) -> WorkingDayRecord {
        let record = self.calculator.compute_working_days(year, additional_holidays);
        if record.working_days < 0 {
            warn!(
                "Year {} with {} additional holidays leaves {} working days",
                year, additional_holidays, record.working_days
            );
        }
        record
    }

    /// Compute a breakdown and append it to storage.
    ///
    /// This is the only way a record reaches storage, so every stored row
    /// satisfies the working-day identity for the holiday table in use.
    pub async fn calculate_and_save(
        &self,
        year: i32,
        additional_holidays: i32,
    ) -> Result<WorkingDayRecord> {
        let record = self.calculate(year, additional_holidays);
        self.save(record).await
    }

    async fn save(&self, record: WorkingDayRecord) -> Result<WorkingDayRecord> {
        let _guard = self.write_lock.lock().await;

        let stored = self
            .storage
            .create(&WorkingDayRecord { id: None, ..record })
            .await
            .context("Failed to save working-day record")?;

        info!(
            "Saved working days for {}: {} working days (record {:?})",
            stored.year, stored.working_days, stored.id
        );
        Ok(stored)
    }

    /// Most recently saved record for a year
    pub async fn latest_for_year(&self, year: i32) -> Result<Option<WorkingDayRecord>> {
        self.storage.latest_for_year(year).await
    }

    /// Saved record for a year, or an unsaved calculation with no additional holidays
    pub async fn current_for_year(&self, year: i32) -> Result<WorkingDaysView> {
        match self.latest_for_year(year).await? {
            Some(record) => Ok(WorkingDaysView { record, saved: true }),
            None => {
                info!("No saved working days for {}, showing a fresh calculation", year);
                Ok(WorkingDaysView {
                    record: self.calculate(year, 0),
                    saved: false,
                })
            }
        }
    }

    /// Saved records in creation order, optionally for one year only
    pub async fn history(&self, year: Option<i32>) -> Result<Vec<WorkingDayRecord>> {
        let records = self.storage.list().await?;
        Ok(match year {
            Some(year) => records.into_iter().filter(|r| r.year == year).collect(),
            None => records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::working_days::HolidayTable;
    use crate::storage::MemoryWorkingDayRepository;

    fn service() -> WorkingDaysService {
        WorkingDaysService::new(
            WorkingDaysCalculator::new(),
            Arc::new(MemoryWorkingDayRepository::new()),
        )
    }

    #[tokio::test]
    async fn test_calculate_does_not_persist() {
        let service = service();
        let record = service.calculate(2568, 0);
        assert_eq!(record.working_days, 243);
        assert!(service.history(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calculate_and_save_assigns_id() {
        let service = service();
        let stored = service.calculate_and_save(2571, 5).await.unwrap();
        assert!(stored.id.is_some());
        assert_eq!(stored.working_days, 241);
        assert_eq!(service.latest_for_year(2571).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_recalculating_appends() {
        let service = service();
        service.calculate_and_save(2568, 0).await.unwrap();
        let newer = service.calculate_and_save(2568, 2).await.unwrap();

        assert_eq!(service.history(Some(2568)).await.unwrap().len(), 2);
        assert_eq!(service.latest_for_year(2568).await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn test_save_strips_incoming_id() {
        let service = service();
        let mut record = service.calculate(2569, 1);
        record.id = Some(77);
        let stored = service.save(record).await.unwrap();
        assert_eq!(stored.id, Some(1));
    }

    #[tokio::test]
    async fn test_current_for_year_falls_back_to_calculation() {
        let service = service();

        let view = service.current_for_year(2572).await.unwrap();
        assert!(!view.saved);
        assert_eq!(view.record.working_days, 245);
        assert_eq!(view.record.id, None);

        let stored = service.calculate_and_save(2572, 3).await.unwrap();
        let view = service.current_for_year(2572).await.unwrap();
        assert!(view.saved);
        assert_eq!(view.record, stored);
    }

    #[tokio::test]
    async fn test_history_filters_by_year() {
        let service = service();
        service.calculate_and_save(2568, 0).await.unwrap();
        service.calculate_and_save(2569, 0).await.unwrap();
        service.calculate_and_save(2568, 1).await.unwrap();

        assert_eq!(service.history(None).await.unwrap().len(), 3);
        let years: Vec<i32> = service
            .history(Some(2568))
            .await
            .unwrap()
            .iter()
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2568, 2568]);
    }

    #[tokio::test]
    async fn test_concurrent_saves_all_land() {
        let service = service();
        let mut handles = Vec::new();
        for additional in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.calculate_and_save(2568, additional).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<i64> = service
            .history(Some(2568))
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.id)
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_custom_holiday_table_is_used() {
        let table = HolidayTable::default().with_entry(2569, 20);
        let service = WorkingDaysService::new(
            WorkingDaysCalculator::with_holiday_table(table),
            Arc::new(MemoryWorkingDayRepository::new()),
        );
        assert_eq!(service.calculate(2569, 0).holidays, 20);
        assert_eq!(service.calculate(2568, 0).holidays, 18);
    }
}
