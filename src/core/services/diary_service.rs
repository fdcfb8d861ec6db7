use chrono::Utc;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::RecordId;
use crate::domain::diary::DiaryEntry;
use crate::ledger::Ledger;

/// Operations for diary entries.
pub struct DiaryService;

impl DiaryService {
    pub fn add(ledger: &mut Ledger, entry: DiaryEntry) -> ServiceResult<RecordId> {
        if entry.title.trim().is_empty() && entry.content.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "diary entry needs a title or content".into(),
            ));
        }
        Ok(ledger.add_diary_entry(entry))
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut DiaryEntry),
    ) -> ServiceResult<()> {
        let entry = ledger
            .diary_entry_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("diary entry {id} not found")))?;
        mutate(entry);
        entry.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<DiaryEntry> {
        ledger
            .remove_diary_entry(id)
            .ok_or_else(|| ServiceError::Invalid(format!("diary entry {id} not found")))
    }

    /// Entries sorted newest first.
    pub fn list(ledger: &Ledger) -> Vec<&DiaryEntry> {
        let mut entries: Vec<&DiaryEntry> = ledger.diary.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}
