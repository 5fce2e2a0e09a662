use std::str::FromStr;

use anyhow::Result;
use log::info;

use crate::{
    errors::AssistantError,
    traits::{Record, SnapshotStore, Sortable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "возрастание" | "asc" | "ascending" => Ok(SortDirection::Ascending),
            "убывание" | "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(AssistantError::InvalidInput(
                "Ошибка! Введите 'возрастание' или 'убывание'!".to_string(),
            )
            .into()),
        }
    }
}

/// In-memory owner of one collection, written through to its store after
/// every mutation.
///
/// Records stay in insertion order until `sort_by` reorders them. A reorder is
/// not saved on its own; the next mutation persists the new order.
pub struct Repository<R, S> {
    records: Vec<R>,
    store: S,
    last_issued: u32,
}

impl<R, S> Repository<R, S>
where
    R: Record,
    S: SnapshotStore,
{
    /// Loads the collection, creating an empty store if none exists yet.
    pub fn open(store: S) -> Result<Self> {
        let records: Vec<R> = store.load(Vec::new())?;
        let last_issued = records.iter().map(Record::id).max().unwrap_or(0);
        Ok(Repository {
            records,
            store,
            last_issued,
        })
    }

    /// Every record, in current order, without the empty-collection check.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// The id the next `add` will assign.
    ///
    /// One more than the largest id present, and never at or below an id this
    /// repository has already handed out. Fails with `ValueOverflow` once the
    /// id space is used up.
    pub fn next_id(&self) -> Result<u32> {
        let max_present = self.records.iter().map(Record::id).max().unwrap_or(0);
        let id = max_present
            .max(self.last_issued)
            .checked_add(1)
            .ok_or(AssistantError::ValueOverflow)?;
        Ok(id)
    }

    pub fn add(&mut self, draft: R::Draft) -> Result<&R> {
        R::validate(&draft)?;
        let id = self.next_id()?;
        self.records.push(R::create(id, draft));
        self.last_issued = id;
        self.persist()?;
        info!("event=record_add kind={} id={}", R::KIND, id);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Lists the collection, reporting `EmptyCollection` when there is nothing
    /// to show.
    pub fn list(&self) -> Result<&[R]> {
        if self.records.is_empty() {
            return Err(AssistantError::EmptyCollection(R::KIND))?;
        }
        Ok(&self.records)
    }

    pub fn get(&self, id: u32) -> Result<&R> {
        let position = self.position(id)?;
        Ok(&self.records[position])
    }

    pub fn edit(&mut self, id: u32, draft: R::Draft) -> Result<&R> {
        R::validate(&draft)?;
        self.update(id, |record| record.apply(draft))
    }

    /// Mutates one record in place and persists the collection.
    pub fn update(&mut self, id: u32, change: impl FnOnce(&mut R)) -> Result<&R> {
        let position = self.position(id)?;
        change(&mut self.records[position]);
        self.persist()?;
        info!("event=record_edit kind={} id={}", R::KIND, id);
        Ok(&self.records[position])
    }

    pub fn delete(&mut self, id: u32) -> Result<R> {
        let position = self.position(id)?;
        let removed = self.records.remove(position);
        self.persist()?;
        info!("event=record_delete kind={} id={}", R::KIND, id);
        Ok(removed)
    }

    fn position(&self, id: u32) -> Result<usize> {
        let position = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(AssistantError::NotFound { kind: R::KIND, id })?;
        Ok(position)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.records)
    }
}

impl<R, S> Repository<R, S>
where
    R: Sortable,
    S: SnapshotStore,
{
    /// Reorders the in-memory collection. The sort is stable.
    pub fn sort_by(&mut self, key: R::Key, direction: SortDirection) {
        match direction {
            SortDirection::Ascending => self.records.sort_by(|a, b| a.compare(b, key)),
            SortDirection::Descending => self.records.sort_by(|a, b| b.compare(a, key)),
        }
    }

    /// Parses key and direction, then sorts. Nothing moves when either is
    /// unrecognized.
    pub fn sort_by_names(&mut self, key: &str, direction: &str) -> Result<()> {
        let key = key.parse::<R::Key>()?;
        let direction = direction.parse::<SortDirection>()?;
        self.sort_by(key, direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FinanceDraft, FinanceRecord, FinanceSortKey, Note, NoteDraft, Task, TaskDraft, TaskStatus,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Serialize, de::DeserializeOwned};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryStore {
        snapshot: RefCell<Option<String>>,
        saves: Cell<usize>,
    }

    impl SnapshotStore for &MemoryStore {
        fn load<R: Serialize + DeserializeOwned>(&self, default: Vec<R>) -> Result<Vec<R>> {
            let stored = self.snapshot.borrow().clone();
            match stored {
                Some(json) => Ok(serde_json::from_str(&json)?),
                None => {
                    self.save(&default)?;
                    Ok(default)
                }
            }
        }

        fn save<R: Serialize>(&self, records: &[R]) -> Result<()> {
            *self.snapshot.borrow_mut() = Some(serde_json::to_string(records)?);
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn entry(amount: &str, category: &str, date: NaiveDateTime) -> FinanceDraft {
        let mut draft = FinanceDraft::parse(amount, category, "").unwrap();
        draft.date = Some(date);
        draft
    }

    fn ids<R: Record>(records: &[R]) -> Vec<u32> {
        records.iter().map(Record::id).collect()
    }

    fn is_error(err: &anyhow::Error, check: impl Fn(&AssistantError) -> bool) -> bool {
        err.downcast_ref::<AssistantError>().is_some_and(check)
    }

    #[test]
    fn test_ids_start_at_one_and_increase() -> Result<()> {
        let store = MemoryStore::default();
        let mut notes: Repository<Note, _> = Repository::open(&store)?;

        assert_eq!(notes.add(NoteDraft::new("a", "1"))?.id(), 1);
        assert_eq!(notes.add(NoteDraft::new("b", "2"))?.id(), 2);
        assert_eq!(notes.add(NoteDraft::new("c", "3"))?.id(), 3);
        Ok(())
    }

    #[test]
    fn test_ids_are_never_reissued_after_delete() -> Result<()> {
        let store = MemoryStore::default();
        let mut notes: Repository<Note, _> = Repository::open(&store)?;
        let mut issued: Vec<u32> = Vec::new();

        for round in 0..4 {
            let id = notes.add(NoteDraft::new(format!("n{round}"), ""))?.id();
            assert!(issued.iter().all(|previous| id > *previous));
            issued.push(id);
            notes.delete(id)?;
        }
        assert_eq!(issued, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_ids_continue_from_stored_maximum() -> Result<()> {
        let store = MemoryStore::default();
        {
            let mut notes: Repository<Note, _> = Repository::open(&store)?;
            notes.add(NoteDraft::new("a", ""))?;
            notes.add(NoteDraft::new("b", ""))?;
            notes.add(NoteDraft::new("c", ""))?;
            notes.delete(2)?;
        }

        let mut reopened: Repository<Note, _> = Repository::open(&store)?;
        assert_eq!(ids(reopened.records()), vec![1, 3]);
        assert_eq!(reopened.add(NoteDraft::new("d", ""))?.id(), 4);
        Ok(())
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() -> Result<()> {
        let store = MemoryStore::default();
        *store.snapshot.borrow_mut() = Some(format!(
            r#"[{{"id":{},"title":"last","content":"","timestamp":"01-01-2024 00:00:00"}}]"#,
            u32::MAX
        ));
        let mut notes: Repository<Note, _> = Repository::open(&store)?;

        let err = notes.add(NoteDraft::new("one too many", "")).unwrap_err();
        assert!(is_error(&err, |e| matches!(e, AssistantError::ValueOverflow)));
        assert_eq!(ids(notes.records()), vec![u32::MAX]);
        assert_eq!(store.saves.get(), 0);
        Ok(())
    }

    #[test]
    fn test_every_mutation_writes_through() -> Result<()> {
        let store = MemoryStore::default();
        let mut tasks: Repository<Task, _> = Repository::open(&store)?;
        let after_open = store.saves.get();

        let draft = TaskDraft {
            description: "call bank".to_string(),
            deadline: "10-01-2024".to_string(),
        };
        let id = tasks.add(draft)?.id();
        assert_eq!(store.saves.get(), after_open + 1);

        tasks.update(id, Task::mark_done)?;
        assert_eq!(store.saves.get(), after_open + 2);

        tasks.delete(id)?;
        assert_eq!(store.saves.get(), after_open + 3);
        Ok(())
    }

    #[test]
    fn test_list_reports_empty_collection() -> Result<()> {
        let store = MemoryStore::default();
        let notes: Repository<Note, _> = Repository::open(&store)?;

        let err = notes.list().unwrap_err();
        assert!(is_error(&err, |e| matches!(e, AssistantError::EmptyCollection(_))));
        Ok(())
    }

    #[test]
    fn test_get_edit_delete_report_not_found() -> Result<()> {
        let store = MemoryStore::default();
        let mut notes: Repository<Note, _> = Repository::open(&store)?;
        notes.add(NoteDraft::new("kept", ""))?;
        let saves = store.saves.get();

        let not_found = |e: &AssistantError| matches!(e, AssistantError::NotFound { id: 9, .. });
        assert!(is_error(&notes.get(9).unwrap_err(), not_found));
        assert!(is_error(&notes.edit(9, NoteDraft::new("x", "")).unwrap_err(), not_found));
        assert!(is_error(&notes.delete(9).unwrap_err(), not_found));

        assert_eq!(ids(notes.records()), vec![1]);
        assert_eq!(store.saves.get(), saves);
        Ok(())
    }

    #[test]
    fn test_edit_replaces_fields() -> Result<()> {
        let store = MemoryStore::default();
        let mut tasks: Repository<Task, _> = Repository::open(&store)?;
        let id = tasks
            .add(TaskDraft {
                description: "old".to_string(),
                deadline: "01-01-2024".to_string(),
            })?
            .id();

        let edited = tasks.edit(
            id,
            TaskDraft {
                description: "new".to_string(),
                deadline: "02-01-2024".to_string(),
            },
        )?;
        assert_eq!(edited.description(), "new");
        assert_eq!(edited.deadline(), "02-01-2024");
        assert_eq!(*edited.status(), TaskStatus::NotDone);
        Ok(())
    }

    #[test]
    fn test_invalid_draft_allocates_nothing() -> Result<()> {
        let store = MemoryStore::default();
        let mut tasks: Repository<Task, _> = Repository::open(&store)?;
        let blank = TaskDraft {
            description: String::new(),
            deadline: String::new(),
        };

        assert!(tasks.add(blank).is_err());
        assert!(tasks.records().is_empty());
        assert_eq!(tasks.next_id()?, 1);
        Ok(())
    }

    #[test]
    fn test_reopen_yields_identical_records() -> Result<()> {
        let store = MemoryStore::default();
        let mut finance: Repository<FinanceRecord, _> = Repository::open(&store)?;
        let mut salary = entry("100", "salary", day(2024, 1, 5));
        salary.description = "jan".to_string();
        finance.add(salary)?;
        finance.add(entry("-40", "food", day(2024, 1, 10)))?;

        let reopened: Repository<FinanceRecord, _> = Repository::open(&store)?;
        assert_eq!(reopened.records(), finance.records());
        Ok(())
    }

    #[test]
    fn test_sort_is_idempotent_and_reversible() -> Result<()> {
        let store = MemoryStore::default();
        let mut finance: Repository<FinanceRecord, _> = Repository::open(&store)?;
        finance.add(entry("1", "food", day(2024, 1, 3)))?;
        finance.add(entry("2", "car", day(2024, 1, 1)))?;
        finance.add(entry("3", "rent", day(2024, 1, 2)))?;

        finance.sort_by(FinanceSortKey::Category, SortDirection::Ascending);
        let ascending = ids(finance.records());
        assert_eq!(ascending, vec![2, 1, 3]);

        finance.sort_by(FinanceSortKey::Category, SortDirection::Ascending);
        assert_eq!(ids(finance.records()), ascending);

        finance.sort_by(FinanceSortKey::Category, SortDirection::Descending);
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(ids(finance.records()), reversed);

        finance.sort_by(FinanceSortKey::Date, SortDirection::Ascending);
        assert_eq!(ids(finance.records()), vec![2, 3, 1]);
        Ok(())
    }

    #[test]
    fn test_sort_order_reaches_next_snapshot() -> Result<()> {
        let store = MemoryStore::default();
        let mut finance: Repository<FinanceRecord, _> = Repository::open(&store)?;
        finance.add(entry("1", "b", day(2024, 1, 1)))?;
        finance.add(entry("2", "a", day(2024, 1, 2)))?;
        let saves = store.saves.get();

        finance.sort_by_names("категория", "возрастание")?;
        assert_eq!(store.saves.get(), saves);

        finance.add(entry("3", "c", day(2024, 1, 3)))?;
        let reopened: Repository<FinanceRecord, _> = Repository::open(&store)?;
        assert_eq!(ids(reopened.records()), vec![2, 1, 3]);
        Ok(())
    }

    #[test]
    fn test_unknown_sort_names_keep_order() -> Result<()> {
        let store = MemoryStore::default();
        let mut finance: Repository<FinanceRecord, _> = Repository::open(&store)?;
        finance.add(entry("1", "b", day(2024, 1, 1)))?;
        finance.add(entry("2", "a", day(2024, 1, 2)))?;

        let invalid = |e: &AssistantError| matches!(e, AssistantError::InvalidInput(_));
        assert!(is_error(&finance.sort_by_names("сумма", "возрастание").unwrap_err(), invalid));
        assert!(is_error(&finance.sort_by_names("категория", "вбок").unwrap_err(), invalid));
        assert_eq!(ids(finance.records()), vec![1, 2]);
        Ok(())
    }
}
