use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slidenav")]
#[command(author, version, about)]
#[command(long_about = "Present course decks with a progress bar and footer navigation.\n\n\
    Examples:\n  \
    slidenav deck.yaml              Launch presentation (fullscreen)\n  \
    slidenav deck.yaml --windowed   Launch in a window\n  \
    slidenav deck.yaml --solution   Review answers in solution mode\n  \
    slidenav inspect deck.yaml      Print the navigation view as JSON")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Ignore and overwrite any stored resume state
    #[arg(long, global = false)]
    pub fresh: bool,

    /// Append every published statement as a JSON line to this file
    #[arg(long, global = false, value_name = "FILE")]
    pub statements: Option<PathBuf>,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// How a deck is opened; shared by the player and `inspect`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SessionArgs {
    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Open in solution mode
    #[arg(long)]
    pub solution: bool,

    /// Open in editor mode: no summary slide, answers are frozen
    #[arg(long)]
    pub editor: bool,

    /// Disable the hover popup on progress-bar segments
    #[arg(long)]
    pub no_hover: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the navigation view tree of a deck as JSON
    Inspect {
        /// Deck file to inspect
        file: PathBuf,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.start_mode, l10n.summary)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log filter for `-v`/`-q`, overridden by `RUST_LOG` when set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Inspect { file, session }) => {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::commands::inspect::run(&file, &session)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::version::run();
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(crate::app::Options {
                        file,
                        windowed: self.windowed,
                        fresh: self.fresh,
                        statements: self.statements,
                        session: self.session,
                    })
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
