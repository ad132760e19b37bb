use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Build the dispatcher every component logs through: console plus `log_file`
/// (appended, no colours), INFO and above.
///
/// Nothing is installed globally; callers hand the returned `Dispatch` to
/// whoever needs to log and scope events with `tracing::dispatcher::with_default`.
pub fn build_dispatch(log_file: &Path) -> io::Result<Dispatch> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let subscriber = Registry::default()
        .with(LevelFilter::INFO)
        .with(fmt::layer().with_writer(io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    Ok(Dispatch::new(subscriber))
}
