use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use trivia::libtrivia::db::SqliteStore;
use trivia::{Category, NewQuestion, QuestionStore, StoreError, TriviaError, TriviaService};

#[derive(Parser, Debug)]
#[command(name = "trivia-porter")]
#[command(version, about = "Import and export trivia questions as JSON", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, env = "TRIVIA_LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", env = "TRIVIA_DB", default_value = "trivia.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Import { json: PathBuf },
    Export { json: PathBuf },
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TriviaJson {
    categories: Vec<CategoryJson>,
}
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CategoryJson {
    id: i32,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    questions: Vec<QuestionJson>,
}
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct QuestionJson {
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<i32>,
}

#[derive(Debug, Default, PartialEq)]
struct ImportReport {
    categories: usize,
    questions: usize,
    skipped: usize,
}

#[derive(Debug, Error)]
enum Error {
    #[error("cannot access file: {0}")]
    File(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Trivia(#[from] TriviaError),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    info!("{}", format!("Database at {:?}", args.db).cyan());
    let store = match SqliteStore::create_or_open(&args.db) {
        Ok(store) => store,
        Err(err) => {
            error!("{}{}", "Unable to open Database: ".red(), err);
            return Err(err.into());
        }
    };
    let service = TriviaService::new(store);

    let result = run(&service, args.command);
    if let Err(err) = &result {
        error!("{}", err.to_string().red());
    }
    service.into_store().close()?;
    result
}

fn run(service: &TriviaService<SqliteStore>, command: Commands) -> Result<(), Error> {
    match command {
        Commands::Import { json } => {
            info!("{}", format!("Reading from file {:?}", json).cyan());
            let content: TriviaJson = serde_json::from_str(&std::fs::read_to_string(json)?)?;
            let report = import(service, &content)?;
            info!(
                "{}",
                format!(
                    "[Porter] Imported {} categories and {} questions ({} skipped)",
                    report.categories, report.questions, report.skipped
                )
                .blue()
            );
        }
        Commands::Export { json } => {
            let content = export(service)?;
            std::fs::write(&json, serde_json::to_string_pretty(&content)?)?;
            info!(
                "{}",
                format!("[Porter] Exported {} categories to {:?}", content.categories.len(), json)
                    .blue()
            );
        }
    }
    Ok(())
}

fn import(service: &TriviaService<SqliteStore>, content: &TriviaJson) -> Result<ImportReport, Error> {
    let mut report = ImportReport::default();
    info!(
        "{}",
        format!("Importing data... ({} Categories)", content.categories.len()).blue()
    );

    for category in &content.categories {
        info!(
            "{}",
            format!(
                "├ Category: {} {} ({} Questions)",
                category.id,
                category.kind,
                category.questions.len()
            )
            .blue()
        );
        if service.store().get_category_by_id(category.id)?.is_none() {
            service.store().add_category(&Category {
                id: category.id,
                kind: category.kind.clone(),
            })?;
            report.categories += 1;
        }

        for question in &category.questions {
            let new = NewQuestion {
                question: question.question.clone(),
                answer: question.answer.clone(),
                category: Some(category.id),
                difficulty: question.difficulty,
            };
            match service.create_question(&new) {
                Ok(_) => {
                    report.questions += 1;
                    info!("{} {}", "│".blue(), format!("├ Question: {:?}", question).green());
                }
                Err(TriviaError::BadRequest(reason)) => {
                    report.skipped += 1;
                    error!(
                        "{} {}",
                        "│".blue(),
                        format!("├ ✘ Question: {:?} ({})", question, reason)
                            .red()
                            .strikethrough()
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(report)
}

fn export(service: &TriviaService<SqliteStore>) -> Result<TriviaJson, Error> {
    let store = service.store();
    let mut categories = Vec::new();
    for category in store.list_all_categories()? {
        let questions = store
            .questions_in_category(category.id)?
            .into_iter()
            .map(|q| QuestionJson {
                question: Some(q.question),
                answer: Some(q.answer),
                difficulty: Some(q.difficulty),
            })
            .collect();
        categories.push(CategoryJson {
            id: category.id,
            kind: category.kind,
            questions,
        });
    }
    Ok(TriviaJson { categories })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "categories": [
            {
                "id": 1,
                "type": "Science",
                "questions": [
                    {"question": "What is the heaviest organ in the human body?", "answer": "The Liver", "difficulty": 4},
                    {"question": "Who discovered penicillin?", "answer": "Alexander Fleming", "difficulty": 3},
                    {"question": "Missing answer?", "difficulty": 2}
                ]
            },
            {
                "id": 6,
                "type": "Sports",
                "questions": [
                    {"question": "Which is the only team to play in every soccer World Cup tournament?", "answer": "Brazil", "difficulty": 3},
                    {"question": "Too hard?", "answer": "Yes", "difficulty": 8}
                ]
            },
            {"id": 3, "type": "Geography"}
        ]
    }"#;

    #[test]
    fn import_skips_invalid_questions() {
        let service = TriviaService::new(SqliteStore::open_in_memory().unwrap());
        let content: TriviaJson = serde_json::from_str(DOCUMENT).unwrap();

        let report = import(&service, &content).unwrap();
        assert_eq!(
            report,
            ImportReport {
                categories: 3,
                questions: 3,
                skipped: 2,
            }
        );

        let again = import(&service, &content).unwrap();
        assert_eq!(again.categories, 0);
        assert_eq!(service.questions(None).unwrap().total_questions, 6);
    }

    #[test]
    fn export_groups_questions_by_category() {
        let service = TriviaService::new(SqliteStore::open_in_memory().unwrap());
        let content: TriviaJson = serde_json::from_str(DOCUMENT).unwrap();
        import(&service, &content).unwrap();

        let exported = export(&service).unwrap();
        let ids: Vec<i32> = exported.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3, 6]);
        assert_eq!(exported.categories[0].questions.len(), 2);
        assert!(exported.categories[1].questions.is_empty());
        assert_eq!(
            exported.categories[2].questions[0].answer.as_deref(),
            Some("Brazil")
        );
    }
}
