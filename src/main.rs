use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::{debug, error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trivia::libtrivia::config::QUESTIONS_PER_QUIZ;
use trivia::libtrivia::db::SqliteStore;
use trivia::libtrivia::paginate::QUESTIONS_PER_PAGE;
use trivia::libtrivia::quiz::QuizCategory;
use trivia::{Config, NewQuestion, QuizPicker, QuizRequest, TriviaError, TriviaService, ALL_CATEGORIES};

mod cli;

#[derive(Parser, Debug)]
#[command(name = "trivia")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "FILE", env = "TRIVIA_DB", default_value = "trivia.db")]
    db: PathBuf,
    #[arg(long, env = "TRIVIA_PAGE_SIZE", default_value_t = QUESTIONS_PER_PAGE)]
    page_size: usize,
    #[arg(long, env = "TRIVIA_QUIZ_LENGTH", default_value_t = QUESTIONS_PER_QUIZ)]
    quiz_length: usize,
    #[arg(short, long, env = "TRIVIA_LOG_LEVEL", default_value = "error")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every category
    Categories,
    /// List questions one page at a time
    Questions {
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Find questions containing a term
    Search { term: Option<String> },
    /// List the questions in one category
    Category {
        #[arg(allow_negative_numbers = true)]
        id: i32,
    },
    /// Delete a question
    Delete { id: i32 },
    /// Add a question
    Add {
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        category: Option<i32>,
        #[arg(long)]
        difficulty: Option<i32>,
    },
    /// Pick one unseen question
    Quiz {
        #[arg(short, long)]
        category: Option<i32>,
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        previous: Option<Vec<i32>>,
    },
    /// Play a round in the terminal
    Play {
        #[arg(short, long, default_value_t = ALL_CATEGORIES)]
        category: i32,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let config = Config {
        db_path: args.db,
        page_size: args.page_size,
        quiz_length: args.quiz_length,
    };
    if let Err(err) = config.validate() {
        return emit::<()>(Err(err));
    }

    let store = match open_store(&config.db_path) {
        Ok(store) => store,
        Err(err) => return emit::<()>(Err(err)),
    };
    debug!("[DB] Database Connection Successful!");

    let service = match TriviaService::with_config(store, &config) {
        Ok(service) => service,
        Err(err) => return emit::<()>(Err(err)),
    };

    let code = run(&service, args.command, &config);
    finish(service, code)
}

fn open_store(path: &Path) -> Result<SqliteStore, TriviaError> {
    SqliteStore::create_or_open(path).map_err(|err| {
        error!("{}{}", "Unable to open Database: ".red(), err);
        TriviaError::Internal(format!("unable to open database {:?}: {}", path, err))
    })
}

fn run(service: &TriviaService<SqliteStore>, command: Commands, config: &Config) -> ExitCode {
    match command {
        Commands::Categories => emit(service.categories()),
        Commands::Questions { page } => emit(service.questions(page.as_deref())),
        Commands::Search { term } => emit(service.search(term.as_deref())),
        Commands::Category { id } => emit(service.questions_in_category(id)),
        Commands::Delete { id } => emit(service.delete_question(id)),
        Commands::Add {
            question,
            answer,
            category,
            difficulty,
        } => emit(service.create_question(&NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })),
        Commands::Quiz { category, previous } => {
            let request = QuizRequest {
                previous_questions: previous,
                quiz_category: category.map(|id| QuizCategory { id, kind: None }),
            };
            emit(service.play(&request, &mut QuizPicker::from_thread_rng()))
        }
        Commands::Play { category } => {
            let mut picker = QuizPicker::from_thread_rng();
            match cli::cli_loop(service, &mut picker, category, config.quiz_length) {
                Ok(score) => {
                    info!("[Quiz] Finished with {}/{}", score.correct, score.asked);
                    ExitCode::SUCCESS
                }
                Err(err) => emit::<()>(Err(err)),
            }
        }
    }
}

fn emit<T: Serialize>(result: Result<T, TriviaError>) -> ExitCode {
    let (rendered, code) = match result {
        Ok(response) => (serde_json::to_string_pretty(&response), ExitCode::SUCCESS),
        Err(err) => {
            error!("{}", format!("{} {}", err.status(), err).red());
            (serde_json::to_string_pretty(&err.body()), ExitCode::FAILURE)
        }
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            code
        }
        Err(err) => {
            error!("Cannot render response: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn finish(service: TriviaService<SqliteStore>, code: ExitCode) -> ExitCode {
    match service.into_store().close() {
        Ok(_) => code,
        Err(err) => {
            error!("{}{}", "Unable to close Database: ".red(), err);
            ExitCode::FAILURE
        }
    }
}
