use std::fs;

use clap::{Parser, Subcommand};
use thiserror::Error;

use robokode::grammar::{self, Keyword};
use robokode::parser::lexer;
use robokode::runtime::governor::INSTRUCTION_LIMIT;
use robokode::{Direction, EngineConfig, Interpreter, Message, SyntaxError};

#[derive(Error, Debug)]
enum CliError {
    #[error("Unknown direction: {0} (expected HAUTGAUCHE, HAUTDROIT, BASGAUCHE or BASDROIT)")]
    UnknownDirection(String),

    #[error("{path}: {count} error(s)")]
    Script { path: String, count: usize },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn parse_direction(value: &str) -> Result<Direction, CliError> {
    Direction::from_keyword(value).ok_or_else(|| CliError::UnknownDirection(value.to_string()))
}

#[derive(Parser)]
#[command(name = "robokode")]
#[command(about = "Interpreter for RoboKode robot scripts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script, answering the robot's questions from the flags
    Run {
        /// Script file
        input: String,

        /// Statements executed before the run is stopped
        #[arg(short, long, default_value_t = INSTRUCTION_LIMIT)]
        limit: usize,

        /// Answer given to detecterEnnemi(); no enemy in sight when omitted
        #[arg(short, long, value_parser = parse_direction)]
        enemy: Option<Direction>,

        /// Answer given to estVivant() (1 or 0)
        #[arg(short, long, default_value_t = 1)]
        alive: i32,
    },

    /// Show the tokens of a script
    Tokens {
        /// Script file
        input: String,
    },

    /// Parse a script and show its statements, labels and errors without running it
    Parse {
        /// Script file
        input: String,
    },

    /// List the words and symbols of the language
    Keywords,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, limit, enemy, alive } => {
            let source = fs::read_to_string(&input)?;
            let config = EngineConfig { instruction_limit: limit };
            let mut interpreter = Interpreter::new().with_config(config);

            let mut message = interpreter.interpret(&source);
            loop {
                match &message {
                    Message::Terminated => {
                        println!("Program finished");
                        break;
                    }
                    Message::Move(direction) => println!("> deplacer {}", direction),
                    Message::Shoot(direction) => println!("> tirer {}", direction),
                    Message::Melee(direction) => println!("> melee {}", direction),
                    Message::Reload => println!("> recharger"),
                    Message::DetectEnemy => match enemy {
                        Some(direction) => {
                            println!("? detecterEnnemi -> {}", direction);
                            interpreter.set_direction_result(direction);
                        }
                        None => println!("? detecterEnnemi -> nothing in sight"),
                    },
                    Message::AliveCheck => {
                        println!("? estVivant -> {}", alive);
                        interpreter.set_boolean_result(alive);
                    }
                    Message::LoopLimitExceeded => {
                        println!("Stopped: more than {} statements executed", limit);
                        break;
                    }
                    Message::SyntaxErrors(errors) => {
                        report_errors(errors);
                        return Err(CliError::Script { path: input, count: errors.len() }.into());
                    }
                }
                message = interpreter.resume();
            }

            println!("Statements executed: {}", interpreter.state().instruction_count());
        }
        Commands::Tokens { input } => {
            let source = fs::read_to_string(&input)?;
            for token in lexer::tokenize(&source) {
                let kind = format!("{:?}", token.kind);
                let marker = if grammar::is_keyword(&token.text) { "*" } else { "" };
                println!("{:>6}  {:<12} {:?}{}", token.span.to_string(), kind, token.text, marker);
            }
        }
        Commands::Parse { input } => {
            println!("Parsing {}...", input);

            let source = fs::read_to_string(&input)?;
            let result = robokode::parse(&source);

            println!("=== STATEMENTS ===");
            for (index, statement) in result.program.statements.iter().enumerate() {
                println!("{:>4}: {:?}", index, statement);
            }

            println!("=== LABELS ===");
            let mut labels: Vec<_> = result.program.labels.iter().collect();
            labels.sort_by_key(|(name, target)| (**target, (*name).clone()));
            for (name, target) in labels {
                println!("  {:<12} -> {}", name, target);
            }

            if result.has_errors() {
                report_errors(&result.errors);
                return Err(CliError::Script { path: input, count: result.errors.len() }.into());
            }
        }
        Commands::Keywords => {
            println!("Keywords:");
            for keyword in Keyword::all() {
                let category = format!("{:?}", keyword.category());
                println!("  {:<15} {:<9} {}", keyword.name(), category, keyword.description());
            }
            println!("Directions: {}", grammar::directions().collect::<Vec<_>>().join(", "));
            let operators: Vec<String> = grammar::OPERATORS.iter().map(|c| c.to_string()).collect();
            println!("Operators:  {}", operators.join(" "));
            println!("Comments:   {} to end of line", grammar::COMMENT);
        }
    }

    Ok(())
}

fn report_errors(errors: &[SyntaxError]) {
    eprintln!("=== ERRORS ===");
    for error in errors {
        let location = error.span.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let marker = if error.should_highlight() { "*" } else { " " };
        eprintln!("{} {:>6}  {}", marker, location, error);
    }
}
