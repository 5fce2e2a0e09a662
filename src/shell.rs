use std::{io::Write, path::Path};

use anyhow::Result;
use console::style;
use log::warn;

use crate::{
    calculator::{self, Operation},
    config::Config,
    errors::AssistantError,
    exchange,
    models::{
        Contact, ContactDraft, FinanceDraft, FinanceRecord, Note, NoteDraft, RecordKind, Task,
        TaskDraft,
    },
    report,
    repository::Repository,
    store::JsonFileStore,
    traits::{Prompt, Record},
};

const MAIN_MENU: &str = "
Добро пожаловать в Персональный помощник!
Выберите действие:
1. Управление заметками
2. Управление задачами
3. Управление контактами
4. Управление финансовыми записями
5. Калькулятор
6. Выход";

const NOTES_MENU: &str = "
Управление заметками:
1. Добавить новую заметку
2. Посмотреть список заметок
3. Посмотреть заметку
4. Редактировать заметку
5. Удалить заметку
6. Экспорт заметок в CSV
7. Импорт заметок из CSV
8. Назад";

const TASKS_MENU: &str = "
Управление задачами:
1. Добавить новую задачу
2. Просмотреть задачи
3. Отметить задачу выполненной
4. Редактировать задачу
5. Удалить задачу
6. Назад";

const CONTACTS_MENU: &str = "
Управление контактами:
1. Добавить контакт
2. Просмотреть контакты
3. Посмотреть контакт
4. Редактировать контакт
5. Удалить контакт
6. Назад";

const FINANCE_MENU: &str = "
Управление финансовыми записями:
1. Добавить новую запись
2. Просмотреть все записи
3. Посмотреть запись
4. Редактировать запись
5. Генерация отчёта
6. Удалить запись
7. Назад";

const CALCULATOR_MENU: &str = "
Калькулятор:
1. Сложение
2. Вычитание
3. Умножение
4. Деление
5. Назад";

const FAREWELL: &str = "Не благодарите за помощь)\nХорошего дня!";

fn not_found_message(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Note => "Заметка не найдена",
        RecordKind::Task => "Задача не найдена",
        RecordKind::Contact => "Контакт не найден",
        RecordKind::Finance => "Финансовая запись не найдена",
    }
}

fn empty_message(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Note => "Список заметок пуст",
        RecordKind::Task => "Список задач пуст",
        RecordKind::Contact => "Список контактов пуст",
        RecordKind::Finance => "Список финансовых записей пуст",
    }
}

/// User-facing status line for a failure the menu loop survives.
fn status_message(err: &AssistantError) -> String {
    match err {
        AssistantError::NotFound { kind, .. } => not_found_message(*kind).to_string(),
        AssistantError::EmptyCollection(kind) => empty_message(*kind).to_string(),
        AssistantError::InvalidInput(message) => message.clone(),
        AssistantError::ResourceMissing(_) => "Файл не найден".to_string(),
        AssistantError::DateParse { input, .. } => {
            format!("Некорректная дата {input:?}, ожидается дд-мм-гггг")
        }
        AssistantError::ValueOverflow => "Ошибка: превышено допустимое значение".to_string(),
        AssistantError::DivisionByZero => "Ошибка: деление на ноль".to_string(),
    }
}

fn parse_id(raw: &str) -> Result<u32> {
    let id = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| AssistantError::InvalidInput("Некорректный ID".to_string()))?;
    Ok(id)
}

/// The interactive menu loop over the four collections and the calculator.
pub struct Shell<P, W> {
    prompt: P,
    out: W,
    config: Config,
    notes: Repository<Note, JsonFileStore>,
    tasks: Repository<Task, JsonFileStore>,
    contacts: Repository<Contact, JsonFileStore>,
    finance: Repository<FinanceRecord, JsonFileStore>,
}

impl<P, W> Shell<P, W>
where
    P: Prompt,
    W: Write,
{
    /// Loads every collection named by `config`.
    pub fn open(config: Config, prompt: P, out: W) -> Result<Self> {
        let store = |kind| JsonFileStore::new(config.store_path(kind));
        let notes = Repository::open(store(RecordKind::Note))?;
        let tasks = Repository::open(store(RecordKind::Task))?;
        let contacts = Repository::open(store(RecordKind::Contact))?;
        let finance = Repository::open(store(RecordKind::Finance))?;
        Ok(Shell {
            prompt,
            out,
            config,
            notes,
            tasks,
            contacts,
            finance,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(MAIN_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5/6)")?;
            match choice.trim() {
                "1" => self.notes_menu()?,
                "2" => self.tasks_menu()?,
                "3" => self.contacts_menu()?,
                "4" => self.finance_menu()?,
                "5" => self.calculator_menu()?,
                "6" => {
                    writeln!(self.out, "{FAREWELL}")?;
                    return Ok(());
                }
                _ => self.unknown_option()?,
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompt.input(prompt)
    }

    fn ask_id(&mut self, prompt: &str) -> Result<u32> {
        let raw = self.ask(prompt)?;
        parse_id(&raw)
    }

    fn unknown_option(&mut self) -> Result<()> {
        writeln!(self.out, "Такой опции нет!")?;
        Ok(())
    }

    /// Turns a recoverable failure into a status line; anything else ends the
    /// program.
    fn settle(&mut self, outcome: Result<()>) -> Result<()> {
        let err = match outcome {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        match err.downcast_ref::<AssistantError>() {
            Some(domain) => {
                warn!("event=request_failed reason={domain}");
                writeln!(self.out, "{}", style(status_message(domain)).red())?;
                Ok(())
            }
            None => Err(err),
        }
    }

    fn notes_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(NOTES_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5/6/7/8)")?;
            let outcome = match choice.trim() {
                "1" => self.add_note(),
                "2" => self.list_notes(),
                "3" => self.view_note(),
                "4" => self.edit_note(),
                "5" => self.delete_note(),
                "6" => self.export_notes(),
                "7" => self.import_notes(),
                "8" => return Ok(()),
                _ => self.unknown_option(),
            };
            self.settle(outcome)?;
        }
    }

    fn add_note(&mut self) -> Result<()> {
        let title = self.ask("Введите заголовок заметки")?;
        let content = self.ask("Введите содержимое заметки")?;
        self.notes.add(NoteDraft::new(title, content))?;
        writeln!(self.out, "Заметка успешно добавлена")?;
        Ok(())
    }

    fn list_notes(&mut self) -> Result<()> {
        for note in self.notes.list()? {
            writeln!(
                self.out,
                "{}. {} (дата: {})",
                note.id(),
                note.title(),
                note.timestamp()
            )?;
        }
        Ok(())
    }

    fn view_note(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID заметки")?;
        let note = self.notes.get(id)?;
        writeln!(self.out, "Заголовок: {}", note.title())?;
        writeln!(self.out, "Содержимое: {}", note.content())?;
        writeln!(self.out, "Дата создания / изменения: {}", note.timestamp())?;
        Ok(())
    }

    fn edit_note(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID заметки")?;
        self.notes.get(id)?;
        let title = self.ask("Введите заголовок заметки")?;
        let content = self.ask("Введите содержимое заметки")?;
        self.notes.edit(id, NoteDraft::new(title, content))?;
        writeln!(self.out, "Заметка успешно изменена")?;
        Ok(())
    }

    fn delete_note(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID заметки")?;
        self.notes.delete(id)?;
        writeln!(self.out, "Заметка успешно удалена")?;
        Ok(())
    }

    fn export_notes(&mut self) -> Result<()> {
        let path = self.config.notes_export_path();
        exchange::export_to_path(&self.notes, &path)?;
        writeln!(
            self.out,
            "Заметки успешно экспортированы в файл {}",
            path.display()
        )?;
        Ok(())
    }

    fn import_notes(&mut self) -> Result<()> {
        let file_name = self.ask("Введите имя CSV-файла")?;
        let ids = exchange::import(Path::new(file_name.trim()), &mut self.notes)?;
        writeln!(self.out, "Импортировано заметок: {}", ids.len())?;
        Ok(())
    }

    fn tasks_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(TASKS_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5/6)")?;
            let outcome = match choice.trim() {
                "1" => self.add_task(),
                "2" => self.list_tasks(),
                "3" => self.mark_task_done(),
                "4" => self.edit_task(),
                "5" => self.delete_task(),
                "6" => return Ok(()),
                _ => self.unknown_option(),
            };
            self.settle(outcome)?;
        }
    }

    fn ask_task(&mut self) -> Result<TaskDraft> {
        let description = self.ask("Введите описание задачи")?;
        let deadline = self.ask("Введите дедлайн (дд-мм-гггг)")?;
        Ok(TaskDraft {
            description,
            deadline,
        })
    }

    fn add_task(&mut self) -> Result<()> {
        let draft = self.ask_task()?;
        self.tasks.add(draft)?;
        writeln!(self.out, "Задача успешно добавлена")?;
        Ok(())
    }

    fn list_tasks(&mut self) -> Result<()> {
        for task in self.tasks.list()? {
            writeln!(
                self.out,
                "{}. {} (Дедлайн: {}, Статус: {})",
                task.id(),
                task.description(),
                task.deadline(),
                task.status()
            )?;
        }
        Ok(())
    }

    fn mark_task_done(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID задачи")?;
        self.tasks.update(id, Task::mark_done)?;
        writeln!(self.out, "Задача отмечена как выполненная")?;
        Ok(())
    }

    fn edit_task(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID задачи")?;
        self.tasks.get(id)?;
        let draft = self.ask_task()?;
        self.tasks.edit(id, draft)?;
        writeln!(self.out, "Задача успешно изменена")?;
        Ok(())
    }

    fn delete_task(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID задачи")?;
        self.tasks.delete(id)?;
        writeln!(self.out, "Задача удалена")?;
        Ok(())
    }

    fn contacts_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(CONTACTS_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5/6)")?;
            let outcome = match choice.trim() {
                "1" => self.add_contact(),
                "2" => self.list_contacts(),
                "3" => self.view_contact(),
                "4" => self.edit_contact(),
                "5" => self.delete_contact(),
                "6" => return Ok(()),
                _ => self.unknown_option(),
            };
            self.settle(outcome)?;
        }
    }

    fn ask_contact(&mut self) -> Result<ContactDraft> {
        let name = self.ask("Введите имя контакта")?;
        let phone = self.ask("Введите телефон контакта")?;
        let email = self.ask("Введите email контакта")?;
        Ok(ContactDraft { name, phone, email })
    }

    fn add_contact(&mut self) -> Result<()> {
        let draft = self.ask_contact()?;
        self.contacts.add(draft)?;
        writeln!(self.out, "Контакт успешно добавлен")?;
        Ok(())
    }

    fn list_contacts(&mut self) -> Result<()> {
        for contact in self.contacts.list()? {
            writeln!(
                self.out,
                "{}. {} (Телефон: {}, Email: {})",
                contact.id(),
                contact.name(),
                contact.phone(),
                contact.email()
            )?;
        }
        Ok(())
    }

    fn view_contact(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID контакта")?;
        let contact = self.contacts.get(id)?;
        writeln!(self.out, "Имя: {}", contact.name())?;
        writeln!(self.out, "Телефон: {}", contact.phone())?;
        writeln!(self.out, "Email: {}", contact.email())?;
        Ok(())
    }

    fn edit_contact(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID контакта")?;
        self.contacts.get(id)?;
        let draft = self.ask_contact()?;
        self.contacts.edit(id, draft)?;
        writeln!(self.out, "Контакт успешно изменен")?;
        Ok(())
    }

    fn delete_contact(&mut self) -> Result<()> {
        let id = self.ask_id("Введите ID контакта")?;
        self.contacts.delete(id)?;
        writeln!(self.out, "Контакт удален")?;
        Ok(())
    }

    fn finance_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(FINANCE_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5/6/7)")?;
            let outcome = match choice.trim() {
                "1" => self.add_record(),
                "2" => self.list_records(),
                "3" => self.view_record(),
                "4" => self.edit_record(),
                "5" => self.generate_report(),
                "6" => self.delete_record(),
                "7" => return Ok(()),
                _ => self.unknown_option(),
            };
            self.settle(outcome)?;
        }
    }

    fn ask_record(&mut self) -> Result<FinanceDraft> {
        let amount = self.ask("Введите размер операции")?;
        let category = self.ask("Введите категорию")?;
        let description = self.ask("Введите описание")?;
        FinanceDraft::parse(&amount, &category, &description)
    }

    fn add_record(&mut self) -> Result<()> {
        let draft = self.ask_record()?;
        self.finance.add(draft)?;
        writeln!(self.out, "Финансовая запись успешно добавлена")?;
        Ok(())
    }

    fn write_record_line(out: &mut W, record: &FinanceRecord) -> Result<()> {
        writeln!(
            out,
            "{}. {} (Сумма: {}, Категория: {}, Дата: {})",
            record.id(),
            record.description(),
            record.amount(),
            record.category(),
            record.date()
        )?;
        Ok(())
    }

    fn list_records(&mut self) -> Result<()> {
        self.finance.list()?;
        let key = self.ask(
            "Фильтровать по (категория / дата). Если не требуется фильтрация, то оставьте поле пустым",
        )?;
        if !key.trim().is_empty() {
            let direction = self.ask("Фильтровать по (возрастание / убывание)")?;
            self.finance.sort_by_names(&key, &direction)?;
        }
        for record in self.finance.list()? {
            Self::write_record_line(&mut self.out, record)?;
        }
        Ok(())
    }

    fn view_record(&mut self) -> Result<()> {
        let id = self.ask_id("Введите id финансовой записи")?;
        let record = self.finance.get(id)?;
        Self::write_record_line(&mut self.out, record)
    }

    fn edit_record(&mut self) -> Result<()> {
        let id = self.ask_id("Введите id финансовой записи")?;
        self.finance.get(id)?;
        let draft = self.ask_record()?;
        self.finance.edit(id, draft)?;
        writeln!(self.out, "Финансовая запись успешно изменена")?;
        Ok(())
    }

    fn generate_report(&mut self) -> Result<()> {
        let start = self.ask("Введите начальную дату (дд-мм-гггг)")?;
        let end = self.ask("Введите конечную дату (дд-мм-гггг)")?;
        let generated =
            report::generate_report(&self.finance, &start, &end, self.config.output_dir())?;
        let report = &generated.report;
        writeln!(
            self.out,
            "Финансовый отчёт за период с {} по {}:\n- Общий доход: {} руб.\n- Общие расходы: {} руб.\n- Баланс: {} руб.\nПодробная информация сохранена в файле {}",
            start.trim(),
            end.trim(),
            report.revenue(),
            report.expense(),
            report.balance(),
            generated.path.display()
        )?;
        Ok(())
    }

    fn delete_record(&mut self) -> Result<()> {
        let id = self.ask_id("Введите id финансовой записи")?;
        self.finance.delete(id)?;
        writeln!(self.out, "Финансовая запись удалена")?;
        Ok(())
    }

    fn calculator_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", style(CALCULATOR_MENU).bold())?;
            let choice = self.ask("Выберите действие (1/2/3/4/5)")?;
            let operation = match choice.trim() {
                "1" => Operation::Add,
                "2" => Operation::Subtract,
                "3" => Operation::Multiply,
                "4" => Operation::Divide,
                "5" => return Ok(()),
                _ => {
                    self.unknown_option()?;
                    continue;
                }
            };
            let outcome = self.calculate(operation);
            self.settle(outcome)?;
        }
    }

    fn calculate(&mut self, operation: Operation) -> Result<()> {
        let a = calculator::parse_operand(&self.ask("Введите первое число")?)?;
        let b = calculator::parse_operand(&self.ask("Введите второе число")?)?;
        let result = operation.apply(a, b)?;
        writeln!(self.out, "Результат: {result}")?;
        Ok(())
    }
}
