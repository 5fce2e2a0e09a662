use std::{cmp::Ordering, fmt, str::FromStr};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use getset::Getters;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    errors::AssistantError,
    traits::{CsvExchange, Record, Sortable},
};

/// Display format of note timestamps.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

pub fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Note,
    Task,
    Contact,
    Finance,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Note => "note",
            RecordKind::Task => "task",
            RecordKind::Contact => "contact",
            RecordKind::Finance => "finance",
        })
    }
}

fn require_non_empty(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssistantError::InvalidInput(message.to_string()))?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Note {
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get = "pub")]
    content: String,
    #[getset(get = "pub")]
    timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// Kept as given when present, otherwise the creation time is used.
    pub timestamp: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp: None,
        }
    }
}

impl Record for Note {
    type Draft = NoteDraft;

    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> u32 {
        self.id
    }

    fn create(id: u32, draft: NoteDraft) -> Self {
        Note {
            id,
            title: draft.title,
            content: draft.content,
            timestamp: draft.timestamp.unwrap_or_else(now_stamp),
        }
    }

    fn apply(&mut self, draft: NoteDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.timestamp = now_stamp();
    }
}

/// One line of the notes table. The id column is written on export and
/// ignored on import. Every column is optional so short rows still read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRow {
    #[serde(rename = "id", default)]
    pub id: Option<String>,
    #[serde(rename = "Заголовок", default)]
    pub title: Option<String>,
    #[serde(rename = "Содержимое", default)]
    pub content: Option<String>,
    #[serde(rename = "Дата", default)]
    pub timestamp: Option<String>,
}

impl CsvExchange for Note {
    type Row = NoteRow;

    const HEADERS: &'static [&'static str] = &["id", "Заголовок", "Содержимое", "Дата"];

    fn to_row(&self) -> NoteRow {
        NoteRow {
            id: Some(self.id.to_string()),
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            timestamp: Some(self.timestamp.clone()),
        }
    }

    fn draft_from_row(row: NoteRow) -> NoteDraft {
        NoteDraft {
            title: row.title.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            timestamp: row.timestamp.filter(|stamp| !stamp.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Не выполнено")]
    NotDone,
    #[serde(rename = "Выполнено")]
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::NotDone => "Не выполнено",
            TaskStatus::Done => "Выполнено",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Task {
    id: u32,
    #[getset(get = "pub")]
    description: String,
    /// Free text, usually dd-mm-yyyy.
    #[getset(get = "pub")]
    deadline: String,
    #[getset(get = "pub")]
    status: TaskStatus,
}

impl Task {
    pub fn mark_done(&mut self) {
        self.status = TaskStatus::Done;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub description: String,
    pub deadline: String,
}

impl Record for Task {
    type Draft = TaskDraft;

    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> u32 {
        self.id
    }

    fn create(id: u32, draft: TaskDraft) -> Self {
        Task {
            id,
            description: draft.description,
            deadline: draft.deadline,
            status: TaskStatus::NotDone,
        }
    }

    fn apply(&mut self, draft: TaskDraft) {
        self.description = draft.description;
        self.deadline = draft.deadline;
    }

    fn validate(draft: &TaskDraft) -> Result<()> {
        require_non_empty(&draft.description, "Описание задачи не может быть пустым")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Contact {
    id: u32,
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    phone: String,
    #[getset(get = "pub")]
    email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Record for Contact {
    type Draft = ContactDraft;

    const KIND: RecordKind = RecordKind::Contact;

    fn id(&self) -> u32 {
        self.id
    }

    fn create(id: u32, draft: ContactDraft) -> Self {
        Contact {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
        }
    }

    fn apply(&mut self, draft: ContactDraft) {
        self.name = draft.name;
        self.phone = draft.phone;
        self.email = draft.email;
    }

    fn validate(draft: &ContactDraft) -> Result<()> {
        require_non_empty(&draft.name, "Имя контакта не может быть пустым")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct FinanceRecord {
    id: u32,
    /// Positive amounts are revenue, everything else is an expense.
    #[getset(get = "pub")]
    amount: Decimal,
    #[getset(get = "pub")]
    category: String,
    #[getset(get = "pub")]
    date: NaiveDateTime,
    #[getset(get = "pub")]
    description: String,
}

impl FinanceRecord {
    pub fn is_revenue(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceDraft {
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    /// The moment of creation is used when absent.
    pub date: Option<NaiveDateTime>,
}

impl FinanceDraft {
    /// Builds a draft from user input.
    ///
    /// # Arguments
    /// * `amount` - The signed amount as typed by the user.
    /// * `category` - Free-text category.
    /// * `description` - Free-text description.
    ///
    /// # Returns
    /// The draft, or `InvalidInput` when `amount` is not a number.
    pub fn parse(amount: &str, category: &str, description: &str) -> Result<Self> {
        let amount = amount
            .trim()
            .replace(',', ".")
            .parse::<Decimal>()
            .map_err(|_| AssistantError::InvalidInput(format!("Некорректная сумма: {amount}")))?;
        Ok(FinanceDraft {
            amount,
            category: category.to_string(),
            description: description.to_string(),
            date: None,
        })
    }
}

impl Record for FinanceRecord {
    type Draft = FinanceDraft;

    const KIND: RecordKind = RecordKind::Finance;

    fn id(&self) -> u32 {
        self.id
    }

    fn create(id: u32, draft: FinanceDraft) -> Self {
        FinanceRecord {
            id,
            amount: draft.amount,
            category: draft.category,
            date: draft.date.unwrap_or_else(|| Local::now().naive_local()),
            description: draft.description,
        }
    }

    fn apply(&mut self, draft: FinanceDraft) {
        self.amount = draft.amount;
        self.category = draft.category;
        self.description = draft.description;
        if let Some(date) = draft.date {
            self.date = date;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceSortKey {
    Category,
    Date,
}

impl FromStr for FinanceSortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "категория" | "category" => Ok(FinanceSortKey::Category),
            "дата" | "date" => Ok(FinanceSortKey::Date),
            _ => Err(AssistantError::InvalidInput(
                "Ошибка! Введите 'категория' или 'дата'!".to_string(),
            )
            .into()),
        }
    }
}

impl Sortable for FinanceRecord {
    type Key = FinanceSortKey;

    fn compare(&self, other: &Self, key: FinanceSortKey) -> Ordering {
        match key {
            FinanceSortKey::Category => self.category.cmp(&other.category),
            FinanceSortKey::Date => self.date.cmp(&other.date),
        }
    }
}
