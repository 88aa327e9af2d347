//! Line-based scorekeeping console.

use crate::command::{Command, CommandError};
use crate::scorekeeper::Scorekeeper;
use anyhow::Result;
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::time::Duration;
use strictly_cricket::{Dart, MatchArchiver, MatchSnapshot, Outcome, Target, TurnChange};
use tracing::{debug, info, instrument};

/// Console behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Pause after the third dart before the next thrower is shown.
    pub turn_change_delay: Duration,
    /// Print each input line back (for scripts).
    pub echo: bool,
}

/// Counts of what happened during a console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    /// Actions the engine accepted.
    pub accepted: usize,
    /// Actions the engine rejected.
    pub rejected: usize,
    /// Lines that did not parse.
    pub invalid: usize,
}

fn mark_glyph(marks: u8) -> &'static str {
    match marks {
        0 => ".",
        1 => "/",
        2 => "X",
        _ => "O",
    }
}

/// Short text for a recorded dart.
pub fn describe_dart(dart: &Dart) -> String {
    match dart {
        Dart::Hit {
            target,
            multiplier,
            marks,
            points,
        } if *points > 0 => format!("{}{} +{}m +{}", multiplier.prefix(), target, marks, points),
        Dart::Hit {
            target,
            multiplier,
            marks,
            ..
        } => format!("{}{} +{}m", multiplier.prefix(), target, marks),
        Dart::Miss => "miss".to_string(),
        Dart::Skip { target } => format!("skip {}", target),
        Dart::KoHit {
            victim,
            ko_points,
            eliminated: true,
        } => format!("KO {} ({}) OUT", victim, ko_points),
        Dart::KoHit {
            victim, ko_points, ..
        } => format!("KO {} ({})", victim, ko_points),
        Dart::KoHeal { ko_points } => format!("heal ({})", ko_points),
        Dart::Pin { side, counter } => format!("pin {:?} ({:+})", side, counter),
    }
}

/// Renders the scoreboard.
pub fn render(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();
    let entries: Vec<_> = snapshot.ledger.iter().collect();
    let show_ko = snapshot.variant.has_ko_phase();

    let _ = writeln!(
        out,
        "{} | phase {:?} | PIN {:+}",
        snapshot.variant.label(),
        snapshot.phase,
        snapshot.pin_counter
    );

    let _ = write!(out, "{:<8}", "");
    for entry in &entries {
        let mut name = entry.display_name().to_string();
        if entry.is_eliminated() {
            name.push('†');
        } else if snapshot.skipped.contains(entry.id()) {
            name.push('~');
        }
        let _ = write!(out, "{:>14}", name);
    }
    out.push('\n');

    for target in Target::ALL {
        let _ = write!(out, "{:<8}", target.label());
        for entry in &entries {
            let _ = write!(out, "{:>14}", mark_glyph(entry.marks(target)));
        }
        out.push('\n');
    }

    let _ = write!(out, "{:<8}", "Points");
    for entry in &entries {
        let _ = write!(out, "{:>14}", entry.points());
    }
    out.push('\n');

    if show_ko {
        let _ = write!(out, "{:<8}", "KO");
        for entry in &entries {
            let ko = match entry.ko_number() {
                Some(number) => format!("{}@{}", entry.ko_points(), number),
                None => entry.ko_points().to_string(),
            };
            let _ = write!(out, "{:>14}", ko);
        }
        out.push('\n');
    }

    match &snapshot.winner {
        Some(winner) => {
            let _ = writeln!(out, "Winner: {}", winner);
        }
        None => {
            let darts: Vec<_> = snapshot.darts.iter().map(describe_dart).collect();
            let _ = writeln!(
                out,
                "Throwing: {} ({}) | darts [{}] | next x{}",
                snapshot.current_player.display_name,
                snapshot.current_participant,
                darts.join(", "),
                snapshot.selected_multiplier.value()
            );
        }
    }
    out
}

/// Reads commands from `input` until it ends, `quit` is typed, or the match
/// is decided.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails; bad
/// commands and rejected actions are reported on `out` and skipped.
#[instrument(skip_all)]
pub fn run<A, R, W>(
    keeper: &mut Scorekeeper<A>,
    input: R,
    out: &mut W,
    options: ConsoleOptions,
) -> Result<SessionReport>
where
    A: MatchArchiver,
    R: BufRead,
    W: Write,
{
    let mut report = SessionReport::default();
    write!(out, "{}", render(&keeper.snapshot()))?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if options.echo {
            writeln!(out, "> {}", trimmed)?;
        }

        let action = match Command::parse(trimmed) {
            Ok(Command::Play(action)) => action,
            Ok(Command::Show) => {
                write!(out, "{}", render(&keeper.snapshot()))?;
                continue;
            }
            Ok(Command::Help) => {
                writeln!(out, "{}", Command::HELP)?;
                continue;
            }
            Ok(Command::Quit) => {
                debug!("Console quit");
                break;
            }
            Err(CommandError::Empty) => continue,
            Err(e) => {
                report.invalid += 1;
                writeln!(out, "? {}", e)?;
                continue;
            }
        };

        match keeper.apply(action) {
            Ok(Outcome::Dart { dart, turn, winner }) => {
                report.accepted += 1;
                writeln!(out, "  {}", describe_dart(&dart))?;
                if let Some(winner) = winner {
                    write!(out, "{}", render(&keeper.snapshot()))?;
                    writeln!(out, "Game over: {} wins", winner)?;
                    if let Some(e) = keeper.archive_error() {
                        writeln!(out, "Archive failed: {}", e)?;
                    }
                    break;
                }
                if let Some(change) = turn {
                    if !options.turn_change_delay.is_zero() {
                        std::thread::sleep(options.turn_change_delay);
                    }
                    if change == TurnChange::Bonus {
                        writeln!(out, "Bonus turn!")?;
                    }
                    write!(out, "{}", render(&keeper.snapshot()))?;
                }
            }
            Ok(Outcome::Undone { entries }) => {
                report.accepted += 1;
                writeln!(out, "  undone ({} entries)", entries)?;
                write!(out, "{}", render(&keeper.snapshot()))?;
            }
            Err(rejection) => {
                report.rejected += 1;
                writeln!(out, "! {}", rejection)?;
            }
        }
    }

    out.flush()?;
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        invalid = report.invalid,
        "Console session ended"
    );
    Ok(report)
}
