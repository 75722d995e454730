use std::fmt;
use std::sync::{Arc, Mutex};

use speculate2::speculate;
use taskdeck::db::Database;
use taskdeck::models::*;
use taskdeck::services;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Fields of one event recorded on the `audit` target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AuditRecord {
    task_id: String,
    project_id: String,
    message: String,
}

impl Visit for AuditRecord {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{value:?}");
        match field.name() {
            "task_id" => self.task_id = value,
            "project_id" => self.project_id = value,
            "message" => self.message = value,
            _ => {}
        }
    }
}

/// Collects `audit` events, ignoring every other target.
#[derive(Clone, Default)]
struct AuditLog(Arc<Mutex<Vec<AuditRecord>>>);

impl<S: tracing::Subscriber> Layer<S> for AuditLog {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "audit" {
            return;
        }
        let mut record = AuditRecord::default();
        event.record(&mut record);
        self.0.lock().unwrap().push(record);
    }
}

/// Run `f` with an audit-capturing subscriber installed on this thread.
fn capture_audit<T>(f: impl FnOnce() -> T) -> (T, Vec<AuditRecord>) {
    let log = AuditLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let records = log.0.lock().unwrap().clone();
    (out, records)
}

fn create_task(db: &Database) -> Task {
    let project = services::create_project(db, CreateProjectInput::new("Audit"))
        .expect("Failed to create project");
    services::create_task(db, project.id, CreateTaskInput::new("T", "medium"))
        .expect("Failed to create task")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "update_task" {
        it "records a fast-tracked move from todo to done" {
            let task = create_task(&db);

            let (result, records) = capture_audit(|| {
                services::update_task(&db, task.id, UpdateTaskInput::status("done"))
            });
            assert_eq!(result.unwrap().status, TaskStatus::Done);

            assert_eq!(records.len(), 1);
            assert_eq!(records[0].task_id, task.id.to_string());
            assert_eq!(records[0].project_id, task.project_id.to_string());
            assert_eq!(records[0].message, "Task was fast-tracked from todo to done");
        }

        it "records nothing for the regular path through in_progress" {
            let task = create_task(&db);

            let (_, records) = capture_audit(|| {
                services::update_task(&db, task.id, UpdateTaskInput::status("in_progress")).unwrap();
                services::update_task(&db, task.id, UpdateTaskInput::status("done")).unwrap();
            });
            assert!(records.is_empty());
        }

        it "records nothing for a rejected transition" {
            let task = create_task(&db);
            services::update_task(&db, task.id, UpdateTaskInput::status("in_progress")).unwrap();

            let (result, records) = capture_audit(|| {
                services::update_task(&db, task.id, UpdateTaskInput::status("todo"))
            });
            assert!(result.is_err());
            assert!(records.is_empty());
        }

        it "records nothing for a priority-only change" {
            let task = create_task(&db);

            let (_, records) = capture_audit(|| {
                services::update_task(&db, task.id, UpdateTaskInput::priority("high")).unwrap();
            });
            assert!(records.is_empty());
        }
    }
}
