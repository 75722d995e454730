mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::*;
use crate::pagination::Pagination;

const PROJECT_COLUMNS: &str = "id, name, description, created_at";
const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, created_at";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        configure(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "taskdeck")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("taskdeck.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    pub fn pending_migrations(&self) -> Result<Vec<&'static str>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::pending_migrations(&conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    /// One page of projects, newest first, plus the total project count.
    pub fn list_projects(&self, page: Pagination) -> Result<(Vec<Project>, u64)> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             ORDER BY created_at DESC, rowid DESC
             LIMIT ? OFFSET ?"
        ))?;
        let projects = stmt
            .query_map((page.limit, page.offset() as i64), row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((projects, total as u64))
    }

    pub fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let project = conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"),
                [id.to_string()],
                row_to_project,
            )
            .optional()?;

        Ok(project)
    }

    pub fn create_project(&self, input: NewProject) -> Result<Project> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = now();

        conn.execute(
            "INSERT INTO projects (id, name, description, created_at) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                &input.name,
                &input.description,
                format_datetime(now),
            ),
        )?;

        Ok(Project {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
        })
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                [id.to_string()],
                row_to_task,
            )
            .optional()?;

        Ok(task)
    }

    /// One page of a project's tasks matching `filter`, newest first, plus
    /// the number of matching tasks across all pages.
    ///
    /// Count and slice are two separate reads.
    pub fn find_tasks(
        &self,
        project_id: Uuid,
        filter: &TaskFilter,
        page: Pagination,
    ) -> Result<(Vec<Task>, u64)> {
        let mut clauses = vec!["project_id = ?"];
        let mut params = vec![Value::Text(project_id.to_string())];

        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(title) = &filter.title {
            clauses.push("ulower(title) LIKE ? ESCAPE '\\'");
            params.push(Value::Text(like_pattern(title)));
        }
        let where_clause = clauses.join(" AND ");

        let conn = self.conn.lock().expect("database lock poisoned");

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM tasks WHERE {where_clause}"),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        params.push(Value::Integer(i64::from(page.limit)));
        params.push(Value::Integer(page.offset() as i64));
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE {where_clause}
             ORDER BY created_at DESC, rowid DESC
             LIMIT ? OFFSET ?"
        ))?;
        let tasks = stmt
            .query_map(params_from_iter(params.iter()), row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((tasks, total as u64))
    }

    /// Insert a task. The caller is responsible for checking the project
    /// exists; the foreign key rejects dangling references regardless.
    pub fn create_task(&self, project_id: Uuid, input: NewTask) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = now();

        conn.execute(
            "INSERT INTO tasks (id, project_id, title, description, status, priority, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                project_id.to_string(),
                &input.title,
                &input.description,
                input.status.as_str(),
                input.priority.as_str(),
                format_datetime(now),
            ),
        )?;

        Ok(Task {
            id,
            project_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            created_at: now,
        })
    }

    /// Apply a patch in a single statement. Fields left `None` keep their
    /// stored value. Returns false when no task has this id.
    pub fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "UPDATE tasks
             SET status = COALESCE(?, status), priority = COALESCE(?, priority)
             WHERE id = ?",
            (
                patch.status.map(|s| s.as_str()),
                patch.priority.map(|p| p.as_str()),
                id.to_string(),
            ),
        )?;
        Ok(rows > 0)
    }

    pub fn delete_task(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
    })
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_uuid(row.get::<_, String>(0)?),
        project_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        description: row.get(3)?,
        status: parse_enum(row, 4, TaskStatus::from_str)?,
        priority: parse_enum(row, 5, TaskPriority::from_str)?,
        created_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

/// Stored enum columns must hold a known value; anything else is a
/// conversion failure rather than a fallback.
fn parse_enum<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown enum value {raw:?}").into(),
        )
    })
}

/// Per-connection setup: foreign keys and the `ulower` scalar.
///
/// SQLite's built-in `LOWER` only folds ASCII, so title matching goes
/// through `ulower`, which applies full Unicode lowercasing.
fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.create_scalar_function(
        "ulower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// `%needle%` for a case-insensitive literal substring match against
/// `ulower(column)`. The needle is lowercased with the same rules.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Fix"), "%fix%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_pattern("ÉCLAIR"), "%éclair%");
    }

    #[test]
    fn unknown_stored_status_is_an_error() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let project = db
            .create_project(NewProject {
                name: "P".to_string(),
                description: None,
            })
            .unwrap();
        let id = Uuid::new_v4();

        {
            let conn = db.conn.lock().unwrap();
            conn.pragma_update(None, "ignore_check_constraints", "ON").unwrap();
            conn.execute(
                "INSERT INTO tasks (id, project_id, title, status, priority, created_at)
                 VALUES (?, ?, 'T', 'blocked', 'medium', ?)",
                (id.to_string(), project.id.to_string(), format_datetime(now())),
            )
            .unwrap();
        }

        let err = db.get_task(id).unwrap_err();
        let err = err.downcast_ref::<rusqlite::Error>().unwrap();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(4, Type::Text, _)));
    }

    #[test]
    fn ulower_folds_non_ascii() {
        let db = Database::open_memory().unwrap();
        let conn = db.conn.lock().unwrap();
        let folded: String = conn
            .query_row("SELECT ulower('ÉCLAIR Straße')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "éclair straße");
    }

    #[test]
    fn stored_timestamps_sort_lexically() {
        let later = DateTime::parse_from_rfc3339("2024-05-01T10:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let earlier = DateTime::parse_from_rfc3339("2024-05-01T10:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(format_datetime(later) > format_datetime(earlier));
        assert_eq!(format_datetime(later), "2024-05-01T10:00:00.500000Z");
    }

    #[test]
    fn timestamps_survive_a_round_trip() {
        let t = now();
        assert_eq!(parse_datetime(format_datetime(t)), t);
    }
}
