use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{ApplicationFields, ApplicationRecord};
use crate::storage::Storage;

/// Owns the ordered collection of applications and mirrors it to a single
/// storage key. The in-memory collection is authoritative: a failed write is
/// logged and remembered, never rolled back.
pub struct RecordStore<S: Storage> {
    storage: S,
    key: String,
    records: Vec<ApplicationRecord>,
    last_save_error: Option<String>,
}

impl<S: Storage> RecordStore<S> {
    /// Restores the collection from `storage`. Never fails: anything that is
    /// not a readable, well-formed array of records becomes an empty store.
    pub fn load(storage: S, key: &str) -> Self {
        let records = read_records(&storage, key);
        log::debug!("loaded {} application(s) from '{}'", records.len(), key);
        Self {
            storage,
            key: key.to_string(),
            records,
            last_save_error: None,
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let serialized =
            serde_json::to_string(&self.records).context("Failed to serialize applications")?;
        self.storage.write(&self.key, &serialized)
    }

    pub fn list(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn create(&mut self, fields: ApplicationFields) -> Result<i64, StoreError> {
        let (company, position, application_date) = validate(&fields)?;
        let id = self.next_id();
        self.records.push(ApplicationRecord {
            id,
            company,
            position,
            location: fields.location,
            salary: fields.salary,
            status: fields.status,
            job_type: fields.job_type,
            remote: fields.remote,
            application_date,
            notes: fields.notes,
            created_at: Utc::now(),
        });
        log::debug!("created application #{}", id);
        self.persist();
        Ok(id)
    }

    pub fn update(&mut self, id: i64, fields: ApplicationFields) -> Result<(), StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let (company, position, application_date) = validate(&fields)?;

        let record = &mut self.records[idx];
        record.company = company;
        record.position = position;
        record.location = fields.location;
        record.salary = fields.salary;
        record.status = fields.status;
        record.job_type = fields.job_type;
        record.remote = fields.remote;
        record.application_date = application_date;
        record.notes = fields.notes;

        log::debug!("updated application #{}", id);
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        log::debug!("deleted application #{}", id);
        self.persist();
        Ok(())
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                log::error!("Error saving applications: {:#}", e);
                self.last_save_error = Some(format!("{:#}", e));
            }
        }
    }

    // Epoch millis, bumped past the largest id so rapid creates never collide.
    fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.records.iter().map(|r| r.id).max() {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }
}

fn validate(fields: &ApplicationFields) -> Result<(String, String, NaiveDate), StoreError> {
    let company = fields.company.trim();
    if company.is_empty() {
        return Err(StoreError::MissingField("company"));
    }
    let position = fields.position.trim();
    if position.is_empty() {
        return Err(StoreError::MissingField("position"));
    }
    let date = fields
        .application_date
        .ok_or(StoreError::MissingField("application date"))?;
    Ok((company.to_string(), position.to_string(), date))
}

fn read_records<S: Storage>(storage: &S, key: &str) -> Vec<ApplicationRecord> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::error!("Error loading applications: {:#}", e);
            return Vec::new();
        }
    };

    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" || raw == "null" {
        return Vec::new();
    }

    let records: Vec<ApplicationRecord> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Discarding malformed applications under '{}': {}", key, e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id) {
            log::warn!("Discarding stored applications: duplicate id {}", record.id);
            return Vec::new();
        }
        if record.company.trim().is_empty() || record.position.trim().is_empty() {
            log::warn!(
                "Discarding stored applications: #{} is missing company or position",
                record.id
            );
            return Vec::new();
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobType, Status};
    use crate::storage::{MemoryStorage, SqliteStorage};

    const KEY: &str = "jobApplications";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn empty_store() -> RecordStore<MemoryStorage> {
        RecordStore::load(MemoryStorage::new(), KEY)
    }

    #[test]
    fn creates_keep_order_and_unique_ids() {
        let mut store = empty_store();
        let a = store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        let b = store.create(ApplicationFields::new("Meta", "SWE", date(2024, 6, 2))).unwrap();
        let c = store.create(ApplicationFields::new("Apple", "PM", date(2024, 6, 3))).unwrap();

        let ids: Vec<i64> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert!(a < b && b < c);

        let companies: Vec<&str> = store.list().iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["Google", "Meta", "Apple"]);
        assert_eq!(store.storage().writes, 3);
    }

    #[test]
    fn create_applies_defaults() {
        let mut store = empty_store();
        let id = store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        let record = store.get(id).unwrap();
        assert_eq!(record.status, Status::Applied);
        assert_eq!(record.job_type, JobType::FullTime);
        assert!(!record.remote);
        assert_eq!(record.notes, "");
    }

    #[test]
    fn create_rejects_missing_fields_without_writing() {
        let mut store = empty_store();

        let blank_company = ApplicationFields::new("   ", "SRE", date(2024, 6, 1));
        assert_eq!(store.create(blank_company), Err(StoreError::MissingField("company")));

        let blank_position = ApplicationFields::new("Google", "", date(2024, 6, 1));
        assert_eq!(store.create(blank_position), Err(StoreError::MissingField("position")));

        let mut no_date = ApplicationFields::new("Google", "SRE", date(2024, 6, 1));
        no_date.application_date = None;
        assert_eq!(
            store.create(no_date),
            Err(StoreError::MissingField("application date"))
        );

        assert!(store.list().is_empty());
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn update_replaces_fields_but_keeps_identity() {
        let mut store = empty_store();
        let id = store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        let created_at = store.get(id).unwrap().created_at;

        let mut fields = ApplicationFields::from(store.get(id).unwrap());
        fields.status = Status::Interview;
        fields.remote = true;
        fields.notes = "Phone screen Tuesday".to_string();
        store.update(id, fields).unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.status, Status::Interview);
        assert!(record.remote);
        assert_eq!(record.notes, "Phone screen Tuesday");
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.storage().writes, 2);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = empty_store();
        store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        let before = store.list().to_vec();

        let result = store.update(42, ApplicationFields::new("Meta", "SWE", date(2024, 6, 2)));
        assert_eq!(result, Err(StoreError::NotFound(42)));
        assert_eq!(store.list(), before.as_slice());
        assert_eq!(store.storage().writes, 1);
    }

    #[test]
    fn delete_removes_and_absent_delete_is_harmless() {
        let mut store = empty_store();
        let a = store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        let b = store.create(ApplicationFields::new("Meta", "SWE", date(2024, 6, 2))).unwrap();

        store.delete(a).unwrap();
        assert!(store.get(a).is_none());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, b);

        assert_eq!(store.delete(a), Err(StoreError::NotFound(a)));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.storage().writes, 3);
    }

    #[test]
    fn every_mutation_rewrites_the_whole_collection() {
        let mut store = empty_store();
        store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        store.create(ApplicationFields::new("Meta", "SWE", date(2024, 6, 2))).unwrap();

        let raw = store.storage().raw(KEY).unwrap();
        let stored: Vec<ApplicationRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(stored, store.list());
    }

    #[test]
    fn save_then_load_reproduces_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orbit.db");

        let expected = {
            let storage = SqliteStorage::open(&path).unwrap();
            let mut store = RecordStore::load(storage, KEY);
            let mut fields = ApplicationFields::new("Google", "SRE", date(2024, 6, 1));
            fields.job_type = JobType::Contract;
            fields.salary = "$150k".to_string();
            store.create(fields).unwrap();
            store.create(ApplicationFields::new("Meta", "SWE", date(2024, 6, 2))).unwrap();
            store.list().to_vec()
        };

        let mut reloaded = RecordStore::load(SqliteStorage::open(&path).unwrap(), KEY);
        assert_eq!(reloaded.list(), expected.as_slice());

        reloaded.save().unwrap();
        let again = RecordStore::load(SqliteStorage::open(&path).unwrap(), KEY);
        assert_eq!(again.list(), expected.as_slice());
    }

    #[test]
    fn load_falls_back_to_empty_on_bad_data() {
        for raw in [
            "",
            "undefined",
            "null",
            "{not json",
            r#"{"id": 1}"#,
            r#"[{"id":1,"company":"A","position":"B","status":"ghosted","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"}]"#,
            r#"[{"id":1,"company":"A","position":"B","applicationDate":"not a date","createdAt":"2024-06-01T00:00:00Z"}]"#,
        ] {
            let store = RecordStore::load(MemoryStorage::with_value(KEY, raw), KEY);
            assert!(store.list().is_empty(), "expected empty store for {:?}", raw);
        }
    }

    #[test]
    fn load_falls_back_to_empty_when_storage_cannot_be_read() {
        let raw = r#"[{"id":1,"company":"A","position":"B","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"}]"#;
        let mut storage = MemoryStorage::with_value(KEY, raw);
        storage.fail_reads = true;

        let store = RecordStore::load(storage, KEY);
        assert!(store.list().is_empty());
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn load_rejects_blank_required_fields() {
        for raw in [
            r#"[{"id":1,"company":"  ","position":"B","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"}]"#,
            r#"[{"id":1,"company":"A","position":"","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"}]"#,
        ] {
            let store = RecordStore::load(MemoryStorage::with_value(KEY, raw), KEY);
            assert!(store.list().is_empty(), "expected empty store for {:?}", raw);
        }
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":1,"company":"A","position":"B","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"},
            {"id":1,"company":"C","position":"D","applicationDate":"2024-06-02","createdAt":"2024-06-02T00:00:00Z"}
        ]"#;
        let store = RecordStore::load(MemoryStorage::with_value(KEY, raw), KEY);
        assert!(store.list().is_empty());
    }

    #[test]
    fn ids_continue_past_stored_future_ids() {
        let far_future = 9_000_000_000_000_i64;
        let raw = format!(
            r#"[{{"id":{},"company":"A","position":"B","applicationDate":"2024-06-01","createdAt":"2024-06-01T00:00:00Z"}}]"#,
            far_future
        );
        let mut store = RecordStore::load(MemoryStorage::with_value(KEY, &raw), KEY);
        let id = store.create(ApplicationFields::new("Meta", "SWE", date(2024, 6, 2))).unwrap();
        assert_eq!(id, far_future + 1);
    }

    #[test]
    fn write_failure_keeps_the_mutation() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes = true;
        let mut store = RecordStore::load(storage, KEY);

        let id = store.create(ApplicationFields::new("Google", "SRE", date(2024, 6, 1))).unwrap();
        assert!(store.get(id).is_some());
        assert!(store.last_save_error().unwrap().contains("quota"));
        assert_eq!(store.storage().raw(KEY), None);
    }
}
