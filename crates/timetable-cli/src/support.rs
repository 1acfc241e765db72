use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use timetable_engine::{Reply, ScheduleError, Timetable, TimetableConfig};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TIMETABLE_LOG";

/// Install the stderr subscriber. `TIMETABLE_LOG` takes `EnvFilter` syntax.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_config_or_exit(config: Option<&str>, store: Option<&str>) -> TimetableConfig {
    let mut config = match config {
        Some(path) => TimetableConfig::load(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
        None => TimetableConfig::default(),
    };
    if let Some(store) = store {
        config.store_path = PathBuf::from(store);
    }
    tracing::debug!(store = %config.store_path.display(), "config resolved");
    config
}

/// Open the store and run the idempotent startup seeding.
pub fn open(config: &TimetableConfig) -> Result<Timetable, ScheduleError> {
    let timetable = Timetable::from_config(config);
    timetable.initialize()?;
    Ok(timetable)
}

/// Like `open`, but a startup failure becomes the command's single reply.
pub fn open_or_reply(config: &TimetableConfig, json_output: bool) -> Timetable {
    open(config).unwrap_or_else(|err| {
        emit_reply(&Reply::rejected(&err), json_output);
        std::process::exit(1);
    })
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print one reply and exit non-zero when it is a rejection.
pub fn emit_reply(reply: &Reply, json_output: bool) {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(reply).expect("json serialization")
        );
    } else {
        println!("{}", reply.message);
    }
    if !reply.ok {
        std::process::exit(1);
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
