use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "timetable",
    about = "Timetable: today's class schedule over a local JSONL store",
    version
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to the schedule store JSONL (overrides the config)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store and seed the configured classrooms
    Init,

    /// Add a lesson to today's schedule
    Add {
        /// `Subject : Teacher1, Teacher2 : Classroom` (words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show today's schedule
    Schedule,

    /// Hide a lesson by its number in today's schedule
    Hide {
        /// Lesson number as shown by `schedule`
        #[arg(allow_negative_numbers = true)]
        number: String,
    },

    /// Show the lesson command formats
    Usage,
}
