use colored::Colorize;
use log::debug;
use rand::Rng;
use std::io::{self, Write};
use text_io::read;
use trivia::libtrivia::quiz::{QuizOutcome, QuizPicker, QuizState};
use trivia::{QuestionStore, TriviaError, TriviaService};

#[derive(Debug, PartialEq)]
pub enum Choice {
    Answer(String),
    DontKnow,
    Quit,
}

#[derive(Debug, Default, PartialEq)]
pub struct Score {
    pub asked: usize,
    pub correct: usize,
}

impl Choice {
    pub fn from_str(input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            "" => Choice::DontKnow,
            answer => Choice::Answer(answer.to_string()),
        }
    }
}

impl Score {
    /// Counts an answered question. Quitting leaves the score untouched and yields `None`.
    pub fn tally(&mut self, choice: &Choice, expected: &str) -> Option<bool> {
        let correct = match choice {
            Choice::Answer(answer) => is_correct(expected, answer),
            Choice::DontKnow => false,
            Choice::Quit => return None,
        };
        self.asked += 1;
        if correct {
            self.correct += 1;
        }
        Some(correct)
    }
}

pub fn is_correct(expected: &str, given: &str) -> bool {
    expected.trim().to_lowercase() == given.trim().to_lowercase()
}

pub fn cli_loop<S: QuestionStore, R: Rng>(
    service: &TriviaService<S>,
    picker: &mut QuizPicker<R>,
    category: i32,
    quiz_length: usize,
) -> Result<Score, TriviaError> {
    let mut state = QuizState::new(category);
    let mut score = Score::default();

    for idx in 1..=quiz_length {
        let question = match service.next_question(&state, picker)? {
            QuizOutcome::Next(question) => question,
            QuizOutcome::Exhausted => {
                println!("{}", "No more new questions in this category!".yellow());
                break;
            }
        };
        state.record(question.id);

        let leading = format!("{}/{}. ", idx, quiz_length);
        println!(
            "{}{}",
            leading.cyan(),
            format!("{} ({})", question.question, question.difficulty)
                .black()
                .bold()
                .on_white()
        );
        print!(
            "{} ",
            "Answer (q to quit prematurely, leave empty if you don't know):".cyan()
        );
        io::stdout().flush().ok();
        let choice_string: String = read!("{}\n");
        let choice = Choice::from_str(choice_string.as_str());
        debug!("choice: {:?}", choice);

        match score.tally(&choice, &question.answer) {
            Some(true) => println!("{}", "Correct!".bright_green()),
            Some(false) => {
                println!("{}", "Incorrect!".bright_red());
                println!(
                    "{}",
                    format!("The correct answer was {:?}.", question.answer).green()
                )
            }
            None => {
                println!("{}", "Quitting Early!".cyan());
                break;
            }
        }
    }

    println!(
        "{}",
        format!("Score: {}/{}", score.correct, score.asked).cyan().bold()
    );
    Ok(score)
}
