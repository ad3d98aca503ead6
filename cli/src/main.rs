use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mineboard_core::*;

use crate::command::{Command, HELP};

mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board side length, in cells
    #[arg(short = 'n', long)]
    size: Option<Coord>,

    /// easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file with `size` and `difficulty` keys, flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every outcome as a JSON line instead of redrawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("Could not parse {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        Ok(config)
    }
}

struct Frontend<W> {
    session: Session,
    out: W,
    json: bool,
}

impl<W: Write> Frontend<W> {
    fn redraw(&mut self) -> io::Result<()> {
        if self.json {
            let snapshot = self.session.snapshot();
            writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)
        } else {
            let board = render::board(&self.session.snapshot());
            writeln!(self.out, "{board}{}", render::status(&self.session))
        }
    }

    fn report(&mut self, outcome: &TapOutcome) -> io::Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(outcome)?)
        } else if outcome.has_update() {
            self.redraw()
        } else {
            writeln!(self.out, "nothing to do there")
        }
    }

    /// Runs one command, returns `false` once the player wants to leave.
    fn execute(&mut self, command: Command) -> io::Result<bool> {
        log::debug!("Command: {command:?}");
        let result = match command {
            Command::Reveal(coords) => self.session.reveal(coords).map(TapOutcome::Reveal),
            Command::Mark(coords) => self.session.toggle_mark(coords).map(TapOutcome::Mark),
            Command::Tap(coords) => self.session.tap(coords),
            Command::ToggleMode => {
                let mode = self.session.toggle_mode();
                writeln!(self.out, "mode: {mode:?}")?;
                return Ok(true);
            }
            Command::Show => {
                self.redraw()?;
                return Ok(true);
            }
            Command::New { size, difficulty } => {
                let mut config = self.session.config();
                config.size = size.unwrap_or(config.size);
                config.difficulty = difficulty.unwrap_or(config.difficulty);
                match self.session.reset(Some(config), None) {
                    Ok(()) => self.redraw()?,
                    Err(err) => writeln!(self.out, "{err}")?,
                }
                return Ok(true);
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        match result {
            Ok(outcome) => {
                self.report(&outcome)?;
                if !self.json {
                    match self.session.state() {
                        GameState::Won => {
                            writeln!(self.out, "Board cleared, \"new\" to play again")?
                        }
                        GameState::Lost(at) => {
                            writeln!(self.out, "Mine at {at}, \"new\" to try again")?
                        }
                        GameState::InProgress => {}
                    }
                }
            }
            // the game carries on after a bad tap
            Err(err) => writeln!(self.out, "{err}")?,
        }
        Ok(true)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = args.game_config()?;
    let session = Session::new(config, args.seed).context("Could not create board")?;
    log::info!("Started game with seed {}", session.seed());

    let mut frontend = Frontend {
        session,
        out: io::stdout().lock(),
        json: args.json,
    };
    frontend.redraw()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let keep_going = match line.parse::<Command>() {
            Ok(command) => frontend.execute(command)?,
            Err(err) => {
                writeln!(frontend.out, "{err}")?;
                true
            }
        };
        frontend.out.flush()?;
        if !keep_going {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontend(json: bool) -> Frontend<Vec<u8>> {
        let session = Session::new(GameConfig::new(4, Difficulty::Easy), Some(17)).unwrap();
        Frontend {
            session,
            out: Vec::new(),
            json,
        }
    }

    fn output(frontend: &mut Frontend<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut frontend.out)).unwrap()
    }

    #[test]
    fn out_of_bounds_tap_is_reported_and_ignored() {
        let mut frontend = frontend(false);

        assert!(frontend.execute(Command::Reveal(Coord2::new(9, 9))).unwrap());

        assert!(output(&mut frontend).contains("outside the 4x4 board"));
        assert_eq!(frontend.session.board().revealed_count(), 0);
    }

    #[test]
    fn json_mode_prints_outcomes() {
        let mut frontend = frontend(true);

        frontend.execute(Command::Mark(Coord2::new(0, 0))).unwrap();

        assert_eq!(output(&mut frontend).trim(), r#"{"Mark":"Marked"}"#);
    }

    #[test]
    fn new_command_applies_partial_config() {
        let mut frontend = frontend(false);

        frontend
            .execute(Command::New {
                size: Some(6),
                difficulty: None,
            })
            .unwrap();

        assert_eq!(frontend.session.config(), GameConfig::new(6, Difficulty::Easy));

        frontend
            .execute(Command::New {
                size: Some(1),
                difficulty: None,
            })
            .unwrap();

        assert!(output(&mut frontend).contains("too small"));
        assert_eq!(frontend.session.config().size, 6);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut frontend = frontend(false);
        assert!(!frontend.execute(Command::Quit).unwrap());
    }

    #[test]
    fn config_file_is_overridden_by_flags() {
        let path = std::env::temp_dir().join(format!("mineboard-{}.toml", std::process::id()));
        fs::write(&path, "size = 7\ndifficulty = \"medium\"\n").unwrap();

        let args = Args::parse_from([
            "mineboard",
            "--config",
            path.to_str().unwrap(),
            "--difficulty",
            "easy",
        ]);
        let config = args.game_config().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config, GameConfig::new(7, Difficulty::Easy));
    }
}
