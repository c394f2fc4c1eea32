use async_trait::async_trait;
use letter_registry_api::LetterFilter;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::audit::{AuditLogModel, Audited};
use crate::models::letter::{LetterModel, SequenceKey};
use crate::repository::{
    allocate_sequence::{retry_transient, AllocateSequence, AllocationRetryPolicy},
    append_audit::AppendAudit,
    create_batch::CreateBatch,
    error::RepositoryError,
    find_letters::{letter_matches, FindLetters},
    load::Load,
    load_audits::LoadAudits,
    load_batch::LoadBatch,
    pagination::{Page, PageRequest},
    unit_of_work::{UnitOfWork, UnitOfWorkSession},
    update_batch::UpdateBatch,
};

#[derive(Default)]
struct MemoryState {
    counters: HashMap<SequenceKey, i32>,
    letters: HashMap<Uuid, LetterModel>,
    formatted_numbers: HashSet<String>,
    running_slots: HashSet<(SequenceKey, i32)>,
    audits: Vec<AuditLogModel>,
    audit_ids: HashSet<Uuid>,
    audit_slots: HashSet<(Uuid, i32)>,
    #[cfg(test)]
    faults: Faults,
}

#[cfg(test)]
#[derive(Default)]
struct Faults {
    transient_allocation_failures: u32,
    fail_next_create: bool,
}

impl MemoryState {
    #[cfg(test)]
    fn injected_allocation_failure(&mut self) -> Option<RepositoryError> {
        if self.faults.transient_allocation_failures == 0 {
            return None;
        }
        self.faults.transient_allocation_failures -= 1;
        Some(RepositoryError::Transient("injected allocation failure".into()))
    }

    #[cfg(not(test))]
    fn injected_allocation_failure(&mut self) -> Option<RepositoryError> {
        None
    }

    #[cfg(test)]
    fn injected_create_failure(&mut self) -> Option<RepositoryError> {
        std::mem::take(&mut self.faults.fail_next_create)
            .then(|| RepositoryError::Transient("injected create failure".into()))
    }

    #[cfg(not(test))]
    fn injected_create_failure(&mut self) -> Option<RepositoryError> {
        None
    }

    fn try_allocate(&mut self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        if let Some(error) = self.injected_allocation_failure() {
            return Err(error);
        }
        let last_issued = self.counters.entry(key.clone()).or_insert(0);
        *last_issued += 1;
        Ok(*last_issued)
    }

    fn check_audit(&self, entry: &AuditLogModel) -> Result<(), RepositoryError> {
        if self.audit_ids.contains(&entry.id) {
            return Err(RepositoryError::Duplicate(format!("audit log id {}", entry.id)));
        }
        if self.audit_slots.contains(&(entry.letter_id, entry.revision)) {
            return Err(RepositoryError::Duplicate(format!(
                "audit revision {} of letter {}",
                entry.revision, entry.letter_id
            )));
        }
        Ok(())
    }

    fn push_audit(&mut self, entry: AuditLogModel) {
        self.audit_ids.insert(entry.id);
        self.audit_slots.insert((entry.letter_id, entry.revision));
        self.audits.push(entry);
    }
}

/// Shared in-memory database. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryLetterStore {
    state: Arc<Mutex<MemoryState>>,
    retry_policy: AllocationRetryPolicy,
}

impl InMemoryLetterStore {
    pub fn new(retry_policy: AllocationRetryPolicy) -> Self {
        Self {
            state: Arc::default(),
            retry_policy,
        }
    }

    pub fn letter_count(&self) -> usize {
        self.state.lock().letters.len()
    }

    /// Makes the next `count` allocation attempts fail transiently.
    #[cfg(test)]
    pub fn inject_allocation_failures(&self, count: u32) {
        self.state.lock().faults.transient_allocation_failures = count;
    }

    /// Makes the next `create_batch` fail after its numbers were allocated.
    #[cfg(test)]
    pub fn inject_create_failure(&self) {
        self.state.lock().faults.fail_next_create = true;
    }
}

#[async_trait]
impl UnitOfWork for InMemoryLetterStore {
    type Session = InMemorySession;

    async fn start_session(&self) -> Result<Self::Session, RepositoryError> {
        Ok(InMemorySession {
            state: self.state.clone(),
        })
    }
}

pub struct InMemorySession {
    state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl UnitOfWorkSession for InMemorySession {
    async fn commit(self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn rollback(self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl AllocateSequence for InMemoryLetterStore {
    async fn allocate_next(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        retry_transient(&self.retry_policy, key, || {
            let result = self.state.lock().try_allocate(key);
            async move { result }
        })
        .await
    }

    async fn last_issued(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        Ok(self.state.lock().counters.get(key).copied().unwrap_or(0))
    }
}

#[async_trait]
impl AppendAudit for InMemorySession {
    async fn append(&self, entry: AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        let mut state = self.state.lock();
        state.check_audit(&entry)?;
        state.push_audit(entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl CreateBatch<LetterModel> for InMemorySession {
    async fn create_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        let mut state = self.state.lock();

        if let Some(error) = state.injected_create_failure() {
            return Err(error);
        }

        let mut prepared = Vec::with_capacity(items.len());
        let mut batch_numbers = HashSet::new();
        for Audited { mut entity, audit_log } in items {
            if audit_log.letter_id != entity.id {
                return Err(RepositoryError::Invalid(format!(
                    "audit entry {} does not belong to letter {}",
                    audit_log.id, entity.id
                )));
            }
            let number = entity.formatted_number.to_string();
            if state.letters.contains_key(&entity.id) {
                return Err(RepositoryError::Duplicate(format!("letter id {}", entity.id)));
            }
            if state.formatted_numbers.contains(&number) || !batch_numbers.insert(number.clone()) {
                return Err(RepositoryError::Duplicate(format!("formatted number {number}")));
            }
            if state.running_slots.contains(&(entity.sequence_key(), entity.running_number)) {
                return Err(RepositoryError::Duplicate(format!(
                    "running number {} for {}",
                    entity.running_number,
                    entity.sequence_key()
                )));
            }
            state.check_audit(&audit_log)?;
            entity.seal_created(audit_log.id)?;
            prepared.push((entity, audit_log));
        }

        let mut saved = Vec::with_capacity(prepared.len());
        for (entity, audit_log) in prepared {
            state.push_audit(audit_log);
            state.formatted_numbers.insert(entity.formatted_number.to_string());
            state.running_slots.insert((entity.sequence_key(), entity.running_number));
            state.letters.insert(entity.id, entity.clone());
            saved.push(entity);
        }
        Ok(saved)
    }
}

#[async_trait]
impl UpdateBatch<LetterModel> for InMemorySession {
    async fn update_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        let mut state = self.state.lock();

        let mut results = Vec::with_capacity(items.len());
        let mut writes = Vec::new();
        for Audited { mut entity, audit_log } in items {
            let Some(previous_hash) = entity.seal_updated(audit_log.id)? else {
                results.push(entity);
                continue;
            };
            let stored = state
                .letters
                .get(&entity.id)
                .ok_or(RepositoryError::NotFound(entity.id))?;
            if stored.hash != previous_hash {
                return Err(RepositoryError::Conflict(entity.id));
            }
            state.check_audit(&audit_log)?;
            writes.push((entity.clone(), audit_log));
            results.push(entity);
        }

        for (entity, audit_log) in writes {
            state.push_audit(audit_log);
            state.letters.insert(entity.id, entity);
        }
        Ok(results)
    }
}

#[async_trait]
impl Load<LetterModel> for InMemorySession {
    async fn load(&self, id: Uuid) -> Result<LetterModel, RepositoryError> {
        self.state
            .lock()
            .letters
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl LoadBatch<LetterModel> for InMemorySession {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<LetterModel>>, RepositoryError> {
        let state = self.state.lock();
        Ok(ids.iter().map(|id| state.letters.get(id).cloned()).collect())
    }
}

#[async_trait]
impl FindLetters for InMemorySession {
    async fn find_letters(&self, filter: &LetterFilter) -> Result<Vec<LetterModel>, RepositoryError> {
        let search = filter.search_term();
        let mut letters: Vec<LetterModel> = self
            .state
            .lock()
            .letters
            .values()
            .filter(|letter| letter_matches(letter, filter, search.as_deref()))
            .cloned()
            .collect();
        letters.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.running_number.cmp(&a.running_number))
        });
        Ok(letters)
    }
}

#[async_trait]
impl LoadAudits<AuditLogModel> for InMemorySession {
    async fn load_audits(&self, id: Uuid, page: PageRequest) -> Result<Page<AuditLogModel>, RepositoryError> {
        let mut entries: Vec<AuditLogModel> = self
            .state
            .lock()
            .audits
            .iter()
            .filter(|entry| entry.letter_id == id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.revision.cmp(&a.revision));
        Ok(Page::from_slice(&entries, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::letter::test_utils::create_test_letter;
    use chrono::Utc;
    use letter_registry_api::LetterStatus;

    fn created_entry(letter: &LetterModel) -> AuditLogModel {
        AuditLogModel::created(letter.id, letter.creator_id, "created".into(), Utc::now())
    }

    #[tokio::test]
    async fn test_create_and_load() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let session = store.start_session().await?;

        let letter = create_test_letter(Uuid::new_v4(), false);
        let entry = created_entry(&letter);
        let saved = session.create_batch(vec![Audited::new(letter.clone(), entry.clone())]).await?;

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].audit_log_id, Some(entry.id));
        assert_eq!(session.load(letter.id).await?, saved[0]);

        let audits = session.load_audits(letter.id, PageRequest::default()).await?;
        assert_eq!(audits.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_number_is_rejected() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let session = store.start_session().await?;

        let first = create_test_letter(Uuid::new_v4(), false);
        session.create_batch(vec![Audited::new(first.clone(), created_entry(&first))]).await?;

        let second = create_test_letter(Uuid::new_v4(), false);
        let result = session.create_batch(vec![Audited::new(second.clone(), created_entry(&second))]).await;

        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
        assert_eq!(store.letter_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let session = store.start_session().await?;

        let letter = create_test_letter(Uuid::new_v4(), false);
        let saved = session
            .create_batch(vec![Audited::new(letter.clone(), created_entry(&letter))])
            .await?
            .remove(0);

        let mut first = saved.clone();
        first.status = LetterStatus::Sent;
        first.revision = 2;
        let entry = AuditLogModel::updated(first.id, first.creator_id, "status: draft".into(), "status: sent".into(), Utc::now(), 2);
        session.update_batch(vec![Audited::new(first, entry)]).await?;

        let mut stale = saved;
        stale.status = LetterStatus::Closed;
        stale.revision = 2;
        let entry = AuditLogModel::updated(stale.id, stale.creator_id, "status: draft".into(), "status: closed".into(), Utc::now(), 2);
        let result = session.update_batch(vec![Audited::new(stale, entry)]).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(session.load(letter.id).await?.status, LetterStatus::Sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_allocation_is_per_key() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let letter = create_test_letter(Uuid::new_v4(), false);
        let key = letter.sequence_key();
        let mut other = key.clone();
        other.month = 4;

        assert_eq!(store.allocate_next(&key).await?, 1);
        assert_eq!(store.allocate_next(&key).await?, 2);
        assert_eq!(store.allocate_next(&other).await?, 1);
        assert_eq!(store.last_issued(&key).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_revision() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let session = store.start_session().await?;
        let letter_id = Uuid::new_v4();

        let entry = AuditLogModel::created(letter_id, Uuid::new_v4(), "created".into(), Utc::now());
        session.append(entry).await?;
        let again = AuditLogModel::created(letter_id, Uuid::new_v4(), "created".into(), Utc::now());

        assert!(matches!(session.append(again).await, Err(RepositoryError::Duplicate(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_batch_is_positional() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = InMemoryLetterStore::default();
        let session = store.start_session().await?;
        let letter = create_test_letter(Uuid::new_v4(), false);
        session.create_batch(vec![Audited::new(letter.clone(), created_entry(&letter))]).await?;

        let missing = Uuid::new_v4();
        let loaded = session.load_batch(&[missing, letter.id]).await?;

        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].is_none());
        assert_eq!(loaded[1].as_ref().map(|l| l.id), Some(letter.id));
        Ok(())
    }
}
