use crate::libtrivia::error::StoreError;
use crate::libtrivia::model::{Category, NewQuestion, Question, ALL_CATEGORIES};
use crate::libtrivia::store::QuestionStore;
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result, Row};
use std::path::Path;
use std::time::Instant;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// [`QuestionStore`] backed by a SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn create_or_open(path: &Path) -> Result<Self> {
        create_or_open(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = init_db(Connection::open_in_memory()?)?;
        Ok(Self::new(conn))
    }

    pub fn close(self) -> Result<()> {
        close_db(self.conn)
    }

    pub fn add_category(&self, category: &Category) -> Result<(), StoreError> {
        match self.conn.execute(
            "INSERT INTO Category(id, type) VALUES (?1, ?2)",
            params![category.id, category.kind],
        ) {
            Ok(_) => {
                debug!("[DB] Created new Category {} '{}'", category.id, category.kind);
                Ok(())
            }
            Err(err) => {
                error!("[DB] Error while creating new Category {}: {:?}", category.id, err);
                Err(err.into())
            }
        }
    }

    fn question_from_row(row: &Row) -> Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
        })
    }

    fn category_from_row(row: &Row) -> Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            kind: row.get(1)?,
        })
    }
}

impl QuestionStore for SqliteStore {
    fn list_all_questions(&self) -> Result<Vec<Question>, StoreError> {
        let mut statement = self
            .conn
            .prepare(&format!("SELECT {} FROM Question ORDER BY id", QUESTION_COLUMNS))?;
        let rows = statement.query_map([], |row| Self::question_from_row(row))?;

        Ok(rows.collect::<Result<Vec<_>>>()?)
    }

    fn list_all_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut statement = self.conn.prepare("SELECT id, type FROM Category ORDER BY id")?;
        let rows = statement.query_map([], |row| Self::category_from_row(row))?;

        Ok(rows.collect::<Result<Vec<_>>>()?)
    }

    fn get_question_by_id(&self, id: i32) -> Result<Option<Question>, StoreError> {
        let mut statement = self.conn.prepare(&format!(
            "SELECT {} FROM Question WHERE id = :id LIMIT 1",
            QUESTION_COLUMNS
        ))?;
        let row = statement
            .query_row(&[(":id", &id)], |row| Self::question_from_row(row))
            .optional()?;

        Ok(row)
    }

    fn get_category_by_id(&self, id: i32) -> Result<Option<Category>, StoreError> {
        let mut statement = self
            .conn
            .prepare("SELECT id, type FROM Category WHERE id = :id LIMIT 1")?;
        let row = statement
            .query_row(&[(":id", &id)], |row| Self::category_from_row(row))
            .optional()?;

        Ok(row)
    }

    fn delete_question_by_id(&self, id: i32) -> Result<(), StoreError> {
        match self.conn.execute("DELETE FROM Question WHERE id = ?1", params![id]) {
            Ok(0) => {
                debug!("[DB] No Question {} to delete", id);
                Err(StoreError::NotFound(id))
            }
            Ok(_) => {
                debug!("[DB] Deleted Question {}", id);
                Ok(())
            }
            Err(err) => {
                error!("[DB] Error while deleting Question {}: {:?}", id, err);
                Err(err.into())
            }
        }
    }

    fn insert_question(&self, new: &NewQuestion) -> Result<Question, StoreError> {
        let draft = match new.draft() {
            Some(draft) => draft,
            None => {
                let field = new.missing_field().unwrap_or("question");
                warn!("[DB] Refusing to insert Question without `{}`", field);
                return Err(StoreError::Validation(format!("`{}` is required", field)));
            }
        };

        match self.conn.execute(
            "INSERT INTO Question(question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![draft.question, draft.answer, draft.category, draft.difficulty],
        ) {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!("[DB] Created new Question {} in Category {}", id, draft.category);
                let mut statement = self.conn.prepare(&format!(
                    "SELECT {} FROM Question WHERE id = ?1",
                    QUESTION_COLUMNS
                ))?;
                Ok(statement.query_row(params![id], |row| Self::question_from_row(row))?)
            }
            Err(err) => {
                error!("[DB] Error while creating new Question: {:?}", err);
                Err(err.into())
            }
        }
    }

    fn questions_in_category(&self, category_id: i32) -> Result<Vec<Question>, StoreError> {
        if category_id == ALL_CATEGORIES {
            return self.list_all_questions();
        }
        let mut statement = self.conn.prepare(&format!(
            "SELECT {} FROM Question WHERE category = :category ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = statement.query_map(&[(":category", &category_id)], |row| {
            Self::question_from_row(row)
        })?;

        Ok(rows.collect::<Result<Vec<_>>>()?)
    }
}

pub(crate) fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub(crate) fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = init_db(Connection::open_in_memory()?)?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            close_db(db)?;
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            open_db(dest)
        }
        Err(err) => {
            warn!("[DB] Failed to create database file: {}", err);
            close_db(db)?;
            Err(err)
        }
    }
}

pub(crate) fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    db.execute_batch("PRAGMA foreign_keys = ON;")?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub(crate) fn close_db(mut connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    for attempt in 1..=3 {
        match connection.close() {
            Ok(_) => return Ok(()),
            Err((conn, err)) => {
                if attempt == 3 {
                    error!("[DB] Cannot close connection! Giving up.");
                    return Err(err);
                }
                error!("[DB] Cannot close connection. Retrying {}/2...", attempt);
                connection = conn;
            }
        }
    }
    Ok(())
}

fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute(
        "CREATE TABLE Category (
              id INTEGER NOT NULL PRIMARY KEY,
              type TEXT NOT NULL
            )",
        (),
    )?;
    info!("[DB INIT] Created table Category");
    conn.execute(
        "CREATE TABLE Question (
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              question TEXT NOT NULL,
              answer TEXT NOT NULL,
              category INTEGER NOT NULL,
              difficulty INTEGER NOT NULL,
              FOREIGN KEY (category) REFERENCES Category(id) ON DELETE CASCADE ON UPDATE CASCADE
            )",
        (),
    )?;
    info!("[DB INIT] Created table Question");
    conn.execute("CREATE INDEX Question_category_idx ON Question(category)", ())?;
    info!("[DB INIT] Created index Question_category_idx");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}
