//! Transactional store over the four workflow entities.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use hrflow_core::{
    AccessRecord, AccessType, DecisionLog, Employee, EmployeeId, Error, HrReviewStatus,
    PerformanceReview, Result, ReviewId,
};

// Employees table: key = employee id, value = Employee (serialized as JSON)
const EMPLOYEES_TABLE: TableDefinition<u64, &str> = TableDefinition::new("employees");

// Access table: key = "<employee_id>/<access_type>", value = AccessRecord.
// The key shape enforces at most one record per (employee, access type) pair.
const ACCESS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("access_controls");

// Reviews table: key = review id, value = PerformanceReview
const REVIEWS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("performance_reviews");

// Decision log table: key = "<padded millis>_<decision id>", value = DecisionLog.
// Keys iterate in chronological order; readers reverse for newest-first.
const DECISIONS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("decision_logs");

fn access_key(employee_id: EmployeeId, access_type: AccessType) -> String {
    format!("{}/{}", employee_id.0, access_type.as_str())
}

fn decision_key(log: &DecisionLog) -> String {
    format!("{:020}_{}", log.created_at.timestamp_millis(), log.id)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Persistence(format!("Failed to serialize: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::Persistence(format!("Failed to deserialize: {}", e)))
}

/// Store for employees, access records, reviews, and the decision log.
pub struct HrStore {
    db: Arc<Database>,
}

impl HrStore {
    /// Open (or create) the store under the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .map_err(|e| Error::Persistence(format!("Failed to create data directory: {}", e)))?;

        let db_path = path.join("hrflow.redb");
        let db = Database::create(db_path)
            .map_err(|e| Error::Persistence(format!("Failed to open database: {}", e)))?;

        // Create tables up front so reads never hit a missing table
        let write_txn = db
            .begin_write()
            .map_err(|e| Error::Persistence(format!("Failed to begin write: {}", e)))?;
        {
            write_txn
                .open_table(EMPLOYEES_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open employees table: {}", e)))?;
            write_txn
                .open_table(ACCESS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open access table: {}", e)))?;
            write_txn
                .open_table(REVIEWS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open reviews table: {}", e)))?;
            write_txn
                .open_table(DECISIONS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn begin_write(&self) -> Result<redb::WriteTransaction> {
        self.db
            .begin_write()
            .map_err(|e| Error::Persistence(format!("Failed to begin write: {}", e)))
    }

    fn begin_read(&self) -> Result<redb::ReadTransaction> {
        self.db
            .begin_read()
            .map_err(|e| Error::Persistence(format!("Failed to begin read: {}", e)))
    }

    // ---- employees ----

    /// Insert or replace an employee record.
    pub fn put_employee(&self, employee: &Employee) -> Result<()> {
        let json = to_json(employee)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn
                .open_table(EMPLOYEES_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open employees table: {}", e)))?;
            table
                .insert(employee.id.0, json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to insert employee: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    /// Get an employee by id.
    pub fn employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(EMPLOYEES_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open employees table: {}", e)))?;
        match table.get(id.0) {
            Ok(Some(value)) => Ok(Some(from_json(value.value())?)),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::Persistence(format!("Failed to read employee: {}", e))),
        }
    }

    /// Get an employee, failing with NotFound when absent.
    pub fn require_employee(&self, id: EmployeeId) -> Result<Employee> {
        self.employee(id)?
            .ok_or_else(|| Error::NotFound(format!("Employee {} not found", id)))
    }

    /// List all employees, ordered by id.
    pub fn list_employees(&self) -> Result<Vec<Employee>> {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(EMPLOYEES_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open employees table: {}", e)))?;

        let mut employees = Vec::new();
        let iter = table
            .iter()
            .map_err(|e| Error::Persistence(format!("Failed to iterate: {}", e)))?;
        for result in iter {
            let (_id, value) =
                result.map_err(|e| Error::Persistence(format!("Failed to read entry: {}", e)))?;
            employees.push(from_json(value.value())?);
        }
        Ok(employees)
    }

    /// Update an employee and append the audit entry for the transition in
    /// one transaction.
    pub fn update_employee_with_log(&self, employee: &Employee, log: &DecisionLog) -> Result<()> {
        let employee_json = to_json(employee)?;
        let log_json = to_json(log)?;
        let log_key = decision_key(log);

        let write_txn = self.begin_write()?;
        {
            let mut employees = write_txn
                .open_table(EMPLOYEES_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open employees table: {}", e)))?;
            employees
                .insert(employee.id.0, employee_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to update employee: {}", e)))?;

            let mut decisions = write_txn
                .open_table(DECISIONS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;
            decisions
                .insert(log_key.as_str(), log_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to append log: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    // ---- access records ----

    /// Get the access record for an (employee, access type) pair.
    pub fn access(
        &self,
        employee_id: EmployeeId,
        access_type: AccessType,
    ) -> Result<Option<AccessRecord>> {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(ACCESS_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open access table: {}", e)))?;
        let key = access_key(employee_id, access_type);
        match table.get(key.as_str()) {
            Ok(Some(value)) => Ok(Some(from_json(value.value())?)),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::Persistence(format!("Failed to read access: {}", e))),
        }
    }

    /// All access records for an employee.
    pub fn access_for(&self, employee_id: EmployeeId) -> Result<Vec<AccessRecord>> {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(ACCESS_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open access table: {}", e)))?;

        let mut records = Vec::new();
        let prefix = format!("{}/", employee_id.0);
        let iter = table
            .iter()
            .map_err(|e| Error::Persistence(format!("Failed to iterate: {}", e)))?;
        for result in iter {
            let (key, value) =
                result.map_err(|e| Error::Persistence(format!("Failed to read entry: {}", e)))?;
            if key.value().starts_with(&prefix) {
                records.push(from_json(value.value())?);
            }
        }
        Ok(records)
    }

    /// Write an access record and its audit entry in one transaction.
    ///
    /// The access mutation is never durable without the log entry that
    /// documents it.
    pub fn upsert_access_with_log(&self, record: &AccessRecord, log: &DecisionLog) -> Result<()> {
        let record_json = to_json(record)?;
        let log_json = to_json(log)?;
        let record_key = access_key(record.employee_id, record.access_type);
        let log_key = decision_key(log);

        let write_txn = self.begin_write()?;
        {
            let mut access = write_txn
                .open_table(ACCESS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open access table: {}", e)))?;
            access
                .insert(record_key.as_str(), record_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to write access record: {}", e)))?;

            let mut decisions = write_txn
                .open_table(DECISIONS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;
            decisions
                .insert(log_key.as_str(), log_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to append log: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    // ---- reviews ----

    /// Persist a submitted review together with its audit entry.
    pub fn insert_review_with_log(
        &self,
        review: &PerformanceReview,
        log: &DecisionLog,
    ) -> Result<()> {
        let review_json = to_json(review)?;
        let log_json = to_json(log)?;
        let review_key = review.id.to_string();
        let log_key = decision_key(log);

        let write_txn = self.begin_write()?;
        {
            let mut reviews = write_txn
                .open_table(REVIEWS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open reviews table: {}", e)))?;
            reviews
                .insert(review_key.as_str(), review_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to insert review: {}", e)))?;

            let mut decisions = write_txn
                .open_table(DECISIONS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;
            decisions
                .insert(log_key.as_str(), log_json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to append log: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    /// Get a review by id.
    pub fn review(&self, id: ReviewId) -> Result<Option<PerformanceReview>> {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(REVIEWS_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open reviews table: {}", e)))?;
        let key = id.to_string();
        match table.get(key.as_str()) {
            Ok(Some(value)) => Ok(Some(from_json(value.value())?)),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::Persistence(format!("Failed to read review: {}", e))),
        }
    }

    /// Replace a stored review.
    pub fn update_review(&self, review: &PerformanceReview) -> Result<()> {
        let json = to_json(review)?;
        let key = review.id.to_string();
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn
                .open_table(REVIEWS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open reviews table: {}", e)))?;
            table
                .insert(key.as_str(), json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to update review: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    fn reviews_where<F>(&self, mut keep: F) -> Result<Vec<PerformanceReview>>
    where
        F: FnMut(&PerformanceReview) -> bool,
    {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(REVIEWS_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open reviews table: {}", e)))?;

        let mut reviews = Vec::new();
        let iter = table
            .iter()
            .map_err(|e| Error::Persistence(format!("Failed to iterate: {}", e)))?;
        for result in iter {
            let (_key, value) =
                result.map_err(|e| Error::Persistence(format!("Failed to read entry: {}", e)))?;
            let review: PerformanceReview = from_json(value.value())?;
            if keep(&review) {
                reviews.push(review);
            }
        }
        reviews.sort_by(|a, b| b.review_date.cmp(&a.review_date));
        Ok(reviews)
    }

    /// Most recent review for an employee, if any.
    pub fn latest_review(&self, employee_id: EmployeeId) -> Result<Option<PerformanceReview>> {
        Ok(self
            .reviews_where(|r| r.employee_id == employee_id)?
            .into_iter()
            .next())
    }

    /// Reviews still awaiting a human verdict, newest first.
    pub fn pending_reviews(&self) -> Result<Vec<PerformanceReview>> {
        self.reviews_where(|r| r.is_pending() && r.requires_hr_review)
    }

    // ---- decision log ----

    /// Append a single audit entry.
    pub fn append_log(&self, log: &DecisionLog) -> Result<()> {
        let json = to_json(log)?;
        let key = decision_key(log);
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn
                .open_table(DECISIONS_TABLE)
                .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;
            table
                .insert(key.as_str(), json.as_str())
                .map_err(|e| Error::Persistence(format!("Failed to append log: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    /// Rewrite an entry after a human closed the loop. The key is derived
    /// from the immutable creation time and id, so this can only overwrite
    /// the existing row.
    pub fn update_log(&self, log: &DecisionLog) -> Result<()> {
        self.append_log(log)
    }

    fn logs_where<F>(&self, mut keep: F) -> Result<Vec<DecisionLog>>
    where
        F: FnMut(&DecisionLog) -> bool,
    {
        let read_txn = self.begin_read()?;
        let table = read_txn
            .open_table(DECISIONS_TABLE)
            .map_err(|e| Error::Persistence(format!("Failed to open decisions table: {}", e)))?;

        let mut logs = Vec::new();
        let iter = table
            .iter()
            .map_err(|e| Error::Persistence(format!("Failed to iterate: {}", e)))?;
        for result in iter {
            let (_key, value) =
                result.map_err(|e| Error::Persistence(format!("Failed to read entry: {}", e)))?;
            let log: DecisionLog = from_json(value.value())?;
            if keep(&log) {
                logs.push(log);
            }
        }
        // Keys iterate oldest-first; callers want newest-first
        logs.reverse();
        Ok(logs)
    }

    /// All audit entries for an employee, newest first.
    pub fn logs_for(&self, employee_id: EmployeeId) -> Result<Vec<DecisionLog>> {
        self.logs_where(|l| l.employee_id == employee_id)
    }

    /// Look up a single entry by id.
    pub fn log(&self, id: hrflow_core::DecisionId) -> Result<Option<DecisionLog>> {
        Ok(self.logs_where(|l| l.id == id)?.pop())
    }

    /// Count entries of one decision type for an employee.
    pub fn count_decisions(&self, employee_id: EmployeeId, type_name: &str) -> Result<usize> {
        Ok(self
            .logs_where(|l| l.employee_id == employee_id && l.decision_type.name() == type_name)?
            .len())
    }

    /// Entries not yet reviewed by a human, newest first.
    pub fn unreviewed_logs(&self) -> Result<Vec<DecisionLog>> {
        self.logs_where(|l| l.hr_review_status == HrReviewStatus::Pending)
    }

    /// Access-modification entries for an employee, optionally narrowed to
    /// one access type, newest first.
    pub fn access_logs(
        &self,
        employee_id: EmployeeId,
        access_type: Option<AccessType>,
    ) -> Result<Vec<DecisionLog>> {
        self.logs_where(|l| {
            l.employee_id == employee_id
                && l.decision_type.is_access_change()
                && access_type.is_none_or(|ty| l.decision_type.access_type() == Some(ty))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hrflow_core::{AccessAction, DecisionType};

    fn store() -> (tempfile::TempDir, HrStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HrStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn employee(id: u64) -> Employee {
        Employee::new(
            EmployeeId(id),
            format!("emp{}@example.com", id),
            "Test",
            "Person",
            "Engineering",
            "Developer",
            Utc::now(),
        )
    }

    #[test]
    fn test_employee_round_trip() {
        let (_dir, store) = store();
        store.put_employee(&employee(1)).unwrap();

        let found = store.employee(EmployeeId(1)).unwrap().unwrap();
        assert_eq!(found.email, "emp1@example.com");
        assert!(store.employee(EmployeeId(999)).unwrap().is_none());
    }

    #[test]
    fn test_require_employee_not_found() {
        let (_dir, store) = store();
        let err = store.require_employee(EmployeeId(42)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_access_upsert_writes_log_atomically() {
        let (_dir, store) = store();
        let mut record = AccessRecord::inactive(EmployeeId(1), AccessType::Building);
        record.apply(AccessAction::Grant, None);
        let log = DecisionLog::reviewed(
            EmployeeId(1),
            DecisionType::AccessChange(AccessAction::Grant, AccessType::Building),
            serde_json::json!({"reason": "onboarding"}),
            None,
        );

        store.upsert_access_with_log(&record, &log).unwrap();

        let stored = store
            .access(EmployeeId(1), AccessType::Building)
            .unwrap()
            .unwrap();
        assert!(stored.is_active);

        let logs = store.access_logs(EmployeeId(1), None).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].decision_type.name(), "grant_building_access");
    }

    #[test]
    fn test_one_record_per_pair() {
        let (_dir, store) = store();
        for _ in 0..3 {
            let mut record = AccessRecord::inactive(EmployeeId(1), AccessType::System);
            record.apply(AccessAction::Grant, None);
            let log = DecisionLog::reviewed(
                EmployeeId(1),
                DecisionType::AccessChange(AccessAction::Grant, AccessType::System),
                serde_json::json!({}),
                None,
            );
            store.upsert_access_with_log(&record, &log).unwrap();
        }
        // Record is keyed, so repeats overwrite; the audit trail keeps all entries
        assert_eq!(store.access_for(EmployeeId(1)).unwrap().len(), 1);
        assert_eq!(
            store.access_logs(EmployeeId(1), Some(AccessType::System)).unwrap().len(),
            3
        );
    }

    #[test]
    fn test_review_insert_and_pending() {
        let (_dir, store) = store();
        let mut review = PerformanceReview::new(
            EmployeeId(1),
            EmployeeId(2),
            std::collections::HashMap::from([("goals_achieved".to_string(), 3.0)]),
            None,
        );
        review.score(hrflow_core::Recommendation::Satisfactory, 3.0);
        let log = DecisionLog::new(
            EmployeeId(1),
            DecisionType::Satisfactory,
            serde_json::json!({"score": 3.0}),
            true,
        );

        store.insert_review_with_log(&review, &log).unwrap();

        assert_eq!(store.pending_reviews().unwrap().len(), 1);
        assert_eq!(store.unreviewed_logs().unwrap().len(), 1);

        let mut stored = store.review(review.id).unwrap().unwrap();
        stored.resolve(hrflow_core::ReviewStatus::Approved, None);
        store.update_review(&stored).unwrap();
        assert!(store.pending_reviews().unwrap().is_empty());
    }

    #[test]
    fn test_logs_newest_first() {
        let (_dir, store) = store();
        for i in 0..3 {
            let mut log = DecisionLog::new(
                EmployeeId(1),
                DecisionType::Satisfactory,
                serde_json::json!({"seq": i}),
                true,
            );
            // Force distinct, increasing timestamps
            log.created_at = Utc::now() + chrono::Duration::milliseconds(i * 10);
            store.append_log(&log).unwrap();
        }

        let logs = store.logs_for(EmployeeId(1)).unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].decision_data["seq"], 2);
        assert_eq!(logs[2].decision_data["seq"], 0);
    }

    #[test]
    fn test_count_decisions_by_type() {
        let (_dir, store) = store();
        for _ in 0..2 {
            store
                .append_log(&DecisionLog::new(
                    EmployeeId(5),
                    DecisionType::PerformanceImprovementNeeded,
                    serde_json::json!({}),
                    true,
                ))
                .unwrap();
        }
        store
            .append_log(&DecisionLog::new(
                EmployeeId(5),
                DecisionType::Satisfactory,
                serde_json::json!({}),
                true,
            ))
            .unwrap();

        assert_eq!(
            store
                .count_decisions(EmployeeId(5), "performance_improvement_needed")
                .unwrap(),
            2
        );
        assert_eq!(store.count_decisions(EmployeeId(5), "termination").unwrap(), 0);
    }

    #[test]
    fn test_update_log_closes_loop_in_place() {
        let (_dir, store) = store();
        let mut log = DecisionLog::new(
            EmployeeId(1),
            DecisionType::PromotionRecommended,
            serde_json::json!({}),
            true,
        );
        store.append_log(&log).unwrap();
        assert_eq!(store.unreviewed_logs().unwrap().len(), 1);

        log.close(HrReviewStatus::Approved, EmployeeId(9), None);
        store.update_log(&log).unwrap();

        assert!(store.unreviewed_logs().unwrap().is_empty());
        assert_eq!(store.logs_for(EmployeeId(1)).unwrap().len(), 1);
    }
}
