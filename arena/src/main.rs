mod error;
mod grid;
mod robot;

use std::fs;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use robokode::{Interpreter, Message};

use error::ArenaError;
use grid::{ArenaConfig, Grid, Outcome};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Pits a RoboKode script against a turret on a text grid", version)]
struct Args {
    /// Script driving the player robot
    input: String,

    /// Width and height of the grid
    #[arg(long, default_value_t = 10)]
    size: usize,

    /// Seed for the layout; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of obstacle tiles
    #[arg(long, default_value_t = 8)]
    obstacles: usize,

    /// Actions played before the match is called off
    #[arg(long, default_value_t = 50)]
    turns: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = fs::read_to_string(&args.input).map_err(ArenaError::from)?;

    let config = ArenaConfig {
        size: args.size,
        obstacles: args.obstacles,
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut grid = Grid::generate(&config, &mut rng)?;
    println!("Arena {0}x{0}, R = your robot, T = turret, # = obstacle", grid.size());
    println!("{}", grid.render());

    let mut robot = Interpreter::new();
    let mut message = robot.interpret(&source);
    let mut turns = 0;

    loop {
        let outcome = match &message {
            Message::Terminated => {
                println!("The robot has run all of its instructions");
                break;
            }
            Message::LoopLimitExceeded => {
                println!("The robot is going round in circles, match stopped");
                break;
            }
            Message::SyntaxErrors(errors) => {
                for error in errors {
                    let location = error.span.map(|s| s.to_string()).unwrap_or_default();
                    eprintln!("{:>6}  {}", location, error);
                }
                return Err(ArenaError::Script {
                    path: args.input,
                    count: errors.len(),
                }
                .into());
            }
            Message::DetectEnemy => {
                match grid.detect() {
                    Some(direction) => {
                        log::info!("enemy spotted towards {}", direction);
                        robot.set_direction_result(direction);
                    }
                    None => log::info!("no enemy in sight"),
                }
                None
            }
            Message::AliveCheck => {
                robot.set_boolean_result(grid.turret.is_alive() as i32);
                None
            }
            Message::Move(direction) => {
                Some((format!("deplacer {}", direction), grid.move_player(*direction)))
            }
            Message::Shoot(direction) => {
                Some((format!("tirer {}", direction), grid.shoot(*direction)))
            }
            Message::Melee(direction) => {
                Some((format!("melee {}", direction), grid.melee(*direction)))
            }
            Message::Reload => Some(("recharger".to_string(), grid.reload())),
        };

        if let Some((action, outcome)) = outcome {
            turns += 1;
            println!("[{:>3}] {:<20} {}", turns, action, describe(outcome));

            if !grid.turret.is_alive() {
                println!("{}", grid.render());
                println!("Turret destroyed in {} turn(s)!", turns);
                break;
            }
            if let Some((direction, hp)) = grid.turret_fire() {
                println!("      turret fires {:<10} robot at {} HP", direction.keyword(), hp);
            }
            println!("{}", grid.render());

            if !grid.player.is_alive() {
                println!("Your robot was destroyed after {} turn(s)", turns);
                break;
            }
            if turns >= args.turns {
                println!("Out of turns, the turret survives with {} HP", grid.turret.hp);
                break;
            }
        }

        message = robot.resume();
    }

    log::info!("statements executed: {}", robot.state().instruction_count());
    Ok(())
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Moved((row, column)) => format!("moved to ({}, {})", row, column),
        Outcome::Blocked => "blocked".to_string(),
        Outcome::Hit { hp } => format!("hit! turret at {} HP", hp),
        Outcome::Missed => "missed".to_string(),
        Outcome::OutOfAmmo => "click, no shots left".to_string(),
        Outcome::Reloaded => "reloaded".to_string(),
    }
}
