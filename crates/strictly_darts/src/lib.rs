//! Strictly Darts - cricket scorekeeper built on `strictly_cricket`.
//!
//! # Architecture
//!
//! - **Config**: match setup and rule flags from TOML
//! - **Scorekeeper**: engine wrapper that archives the finished match once
//! - **Archive**: finished matches as JSON files
//! - **Console**: text commands and a plain scoreboard
//!
//! # Example
//!
//! ```
//! use strictly_darts::{Command, MatchConfig, PlayerConfig, Scorekeeper};
//! use strictly_cricket::{MemoryArchiver, Variant};
//!
//! let config = MatchConfig::new(
//!     Variant::Singles,
//!     vec![PlayerConfig::new("ann", "Ann", None), PlayerConfig::new("bob", "Bob", None)],
//! );
//! let mut keeper = Scorekeeper::new(config.start()?, MemoryArchiver::new());
//!
//! if let Command::Play(action) = "t20".parse::<Command>()? {
//!     keeper.apply(action)?;
//! }
//! assert_eq!(keeper.engine().turn().darts_thrown(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod command;
mod config;
mod console;
mod scorekeeper;

pub use archive::{ArchiveError, JsonFileArchiver};
pub use command::{Command, CommandError};
pub use config::{ConfigError, MatchConfig, PlayerConfig};
pub use console::{ConsoleOptions, SessionReport, describe_dart, render, run};
pub use scorekeeper::Scorekeeper;
