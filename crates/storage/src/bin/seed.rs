use std::fmt;

use chrono::{DateTime, Duration, Utc};
use quiz_core::model::{LeaderboardEntry, PlayerName, Question, QuestionId};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    questions: u32,
    scores: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidQuestions { raw: String },
    InvalidScores { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
            ArgsError::InvalidScores { raw } => write!(f, "invalid --scores value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3".into());
        let mut questions = std::env::var("QUIZ_QUESTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(10);
        let mut scores = std::env::var("QUIZ_SCORES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    questions = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidQuestions { raw: value.clone() })?;
                }
                "--scores" => {
                    let value = require_value(&mut args, "--scores")?;
                    scores = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidScores { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions,
            scores,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   SQLite URL (default: sqlite:quiz.sqlite3)");
    eprintln!("  --questions <n>     Number of sample questions to upsert (default: 10)");
    eprintln!("  --scores <n>        Number of sample scores to append (default: 0)");
    eprintln!("  --now <rfc3339>     Fixed current time for deterministic seeding");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_SCORES");
}

const TEXT_SAMPLES: [(&str, &str, [&str; 3]); 5] = [
    (
        "Which planet is known as the red planet?",
        "Mars",
        ["Venus", "Jupiter", "Mercury"],
    ),
    (
        "What is the largest ocean on Earth?",
        "Pacific",
        ["Atlantic", "Indian", "Arctic"],
    ),
    (
        "Which element has the chemical symbol O?",
        "Oxygen",
        ["Gold", "Osmium", "Oganesson"],
    ),
    (
        "In which year did the first crewed Moon landing take place?",
        "1969",
        ["1959", "1972", "1966"],
    ),
    (
        "Which instrument has 88 keys?",
        "Piano",
        ["Organ", "Accordion", "Harpsichord"],
    ),
];

const IMAGE_SAMPLES: [(&str, &str, [&str; 3]); 5] = [
    (
        "https://example.com/quiz/flag-jp.png",
        "Japan",
        ["China", "South Korea", "Vietnam"],
    ),
    (
        "https://example.com/quiz/landmark-eiffel.png",
        "Paris",
        ["London", "Rome", "Madrid"],
    ),
    (
        "https://example.com/quiz/animal-okapi.png",
        "Okapi",
        ["Zebra", "Antelope", "Giraffe"],
    ),
    (
        "https://example.com/quiz/painting-starry-night.png",
        "Van Gogh",
        ["Monet", "Picasso", "Vermeer"],
    ),
    (
        "https://example.com/quiz/flag-br.png",
        "Brazil",
        ["Portugal", "Argentina", "Colombia"],
    ),
];

const SAMPLE_PLAYERS: [&str; 4] = ["Ada", "Linus", "Grace", "Edsger"];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    // Alternate text and image samples so both kinds are represented.
    for i in 0..args.questions {
        let id = QuestionId::new(u64::from(i + 1));
        let question = if i % 2 == 0 {
            let idx = (i as usize / 2) % TEXT_SAMPLES.len();
            let (text, correct, wrong) = TEXT_SAMPLES[idx];
            Question::text(id, text, correct, wrong)?
        } else {
            let idx = (i as usize / 2) % IMAGE_SAMPLES.len();
            let (url, correct, wrong) = IMAGE_SAMPLES[idx];
            Question::image(id, url, correct, wrong)?
        };
        storage.questions.upsert_question(&question).await?;
    }

    for i in 0..args.scores {
        let name = PlayerName::new(SAMPLE_PLAYERS[(i as usize) % SAMPLE_PLAYERS.len()])?;
        let created_at = now - Duration::minutes(i64::from(args.scores - i));
        let entry = LeaderboardEntry::new(name, 10 + i * 7, created_at);
        let _ = storage.scores.append_score(&entry).await?;
    }

    println!(
        "Seeded {} questions and {} scores into {}",
        args.questions, args.scores, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
