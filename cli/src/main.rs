use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sweeper_core::{Difficulty, GameConfig, GameSession, PlayerStats};
use tracing_subscriber::filter::LevelFilter;
use web_time::Instant;

use command::Command;

mod command;
mod saves;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
            Level::Expert => Difficulty::Expert,
        }
    }
}

/// Parses `ROWSxCOLS:MINES`, for example `12x20:40`.
fn parse_custom(value: &str) -> Result<GameConfig, String> {
    let (size, mines) = value
        .split_once(':')
        .ok_or("expected ROWSxCOLS:MINES")?;
    let (rows, cols) = size
        .split_once(['x', 'X'])
        .ok_or("expected ROWSxCOLS:MINES")?;
    fn number<T: std::str::FromStr>(text: &str) -> Result<T, String> {
        text.trim().parse().map_err(|_| format!("invalid number {text:?}"))
    }
    GameConfig::custom(number(rows)?, number(cols)?, number(mines)?).map_err(|err| err.to_string())
}

#[derive(Parser, Debug)]
#[command(version, about = "Play minesweeper from move scripts", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset difficulty
    #[arg(short, long, value_enum, default_value_t = Level::Easy)]
    difficulty: Level,

    /// Custom grid as ROWSxCOLS:MINES, overrides --difficulty
    #[arg(short, long, value_parser = parse_custom)]
    custom: Option<GameConfig>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Player stats file, loaded at start and saved at exit
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Player name stored in the stats file
    #[arg(long)]
    name: Option<String>,

    /// Show every cell value when printing the board
    #[arg(long)]
    cheat: bool,

    /// Print the final session as JSON
    #[arg(long)]
    json: bool,

    /// Spread the bomb reveal after a loss over this many milliseconds
    #[arg(long, default_value_t = 0)]
    reveal_ms: u64,

    /// Moves such as "s 3 4" or "f 0 1"; read from stdin, one per line, when omitted
    moves: Vec<String>,
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    let Some(level) = verbose.log_level() else {
        return;
    };
    let filter = match level {
        log::Level::Error => LevelFilter::ERROR,
        log::Level::Warn => LevelFilter::WARN,
        log::Level::Info => LevelFilter::INFO,
        log::Level::Debug => LevelFilter::DEBUG,
        log::Level::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(io::stderr)
        .init();
}

/// Command loop state around a session: wall clock and end-of-game bookkeeping.
struct Game {
    session: GameSession,
    stats: PlayerStats,
    cheat: bool,
    reveal_time: Duration,
    clock_started: bool,
    recorded: bool,
}

impl Game {
    /// Runs one command and redraws the board when it changed. Returns whether it did.
    fn apply(&mut self, command: Command) -> anyhow::Result<bool> {
        log::debug!("command: {:?}", command);
        let changed = match command {
            Command::Sweep(coords) => {
                if !self.clock_started {
                    self.session.init_timer(Instant::now());
                    self.session.start_timer();
                    self.clock_started = true;
                }
                let outcome = self.session.sweep(coords)?;
                log::info!("sweep {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Command::Mark(coords) => self.session.mark(coords)?.has_update(),
            Command::Unmark(coords) => self.session.unmark(coords)?.has_update(),
            Command::Toggle(coords) => self.session.toggle_mark(coords)?.has_update(),
            Command::Restart => {
                self.session.restart_game();
                self.reset();
                true
            }
            Command::NewGame => {
                self.session.new_game();
                self.reset();
                true
            }
            Command::Revive => {
                self.session.revive_game();
                self.session.start_timer();
                self.recorded = false;
                true
            }
            Command::RevealBombs => {
                let count = self.session.reveal_bombs();
                log::info!("revealed {} bombs", count);
                count > 0
            }
            Command::RandomFlags => {
                self.session.randomly_flag_mine_count();
                true
            }
            Command::ClearFlags => {
                self.session.clear_flags();
                true
            }
            Command::Print => true,
        };

        self.session.update_timer(Instant::now());
        self.check_end();
        if changed {
            print!("{}", self.session.render(self.cheat));
        } else {
            log::debug!("nothing changed");
        }
        Ok(changed)
    }

    fn reset(&mut self) {
        self.clock_started = false;
        self.recorded = false;
    }

    fn check_end(&mut self) {
        if self.recorded || !self.session.is_finished() {
            return;
        }
        self.session.stop_timer();
        self.recorded = true;

        let seconds = self.session.time().as_secs();
        if self.session.is_game_won() {
            println!("You won in {}:{:02}!", seconds / 60, seconds % 60);
            if self.stats.record_session(&self.session) {
                println!("New best time for {}!", self.session.difficulty());
            }
        } else {
            println!("Boom! Game over after {}:{:02}.", seconds / 60, seconds % 60);
            self.reveal_slowly();
        }
    }

    fn reveal_slowly(&mut self) {
        if self.reveal_time.is_zero() {
            self.session.reveal_bombs();
            return;
        }
        let mut schedule = self.session.bomb_reveal_schedule(self.reveal_time);
        while let Some(coords) = schedule.step(&mut self.session) {
            log::debug!("revealing bomb at {:?}", coords);
            thread::sleep(schedule.interval());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);
    log::debug!("seed: {:?}", args.seed);

    let config = args
        .custom
        .unwrap_or_else(|| GameConfig::preset(args.difficulty.into()));
    let session = match args.seed {
        Some(seed) => GameSession::with_seed(config, seed),
        None => GameSession::new(config),
    };

    let mut stats = args
        .stats
        .as_deref()
        .map(saves::load_or_default)
        .unwrap_or_default();
    if let Some(name) = args.name {
        stats.name = name;
    }
    if let Some(best) = stats.best_time(config.difficulty) {
        println!("Best {} time: {}:{:02}", config.difficulty, best / 60, best % 60);
    }

    let mut game = Game {
        session,
        stats,
        cheat: args.cheat,
        reveal_time: Duration::from_millis(args.reveal_ms),
        clock_started: false,
        recorded: false,
    };

    let moves: Box<dyn Iterator<Item = io::Result<String>>> = if args.moves.is_empty() {
        Box::new(io::stdin().lock().lines())
    } else {
        Box::new(args.moves.into_iter().map(Ok))
    };

    for line in moves {
        let line = line.context("Could not read move")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if let Err(err) = game.apply(command) {
                    log::error!("{:#}", err);
                    eprintln!("{}", err);
                }
            }
            Err(err) => eprintln!("{}", err),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game.session.snapshot())?);
    }

    if let Some(path) = args.stats.as_deref() {
        if let Err(err) = saves::save(path, &game.stats) {
            log::error!("Could not save stats: {:#}", err);
        }
    }

    Ok(())
}
