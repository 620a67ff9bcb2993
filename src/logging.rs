use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FILTER: &str = "warn,quill=info";
const DEFAULT_LOG_FILE_PATH: &str = "logs/quill.log";

// Keeps the non-blocking file writer alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Eq)]
enum Sink {
    Stderr,
    File(PathBuf),
    Both(PathBuf),
}

fn parse_sink(output: Option<&str>, file_path: Option<&str>) -> Sink {
    let path = file_path
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));

    match output.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("file") => Sink::File(path),
        Some("both") => Sink::Both(path),
        _ => Sink::Stderr,
    }
}

fn json_format_enabled(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("json")
    )
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn try_init(json: bool, writer: BoxMakeWriter) -> bool {
    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .try_init()
    };
    result.is_ok()
}

fn file_writer(path: &Path) -> std::io::Result<BoxMakeWriter> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::ffi::OsStr::new("quill.log"));

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(BoxMakeWriter::new(writer))
}

/// Initialize the global subscriber from `LOG_FORMAT`, `LOG_OUTPUT` and
/// `LOG_FILE_PATH`. An unwritable log file degrades to stderr logging
/// instead of failing startup.
pub fn init() {
    let json = json_format_enabled(env::var("LOG_FORMAT").ok().as_deref());
    let sink = parse_sink(
        env::var("LOG_OUTPUT").ok().as_deref(),
        env::var("LOG_FILE_PATH").ok().as_deref(),
    );

    match sink {
        Sink::Stderr => {
            try_init(json, BoxMakeWriter::new(std::io::stderr));
        }
        Sink::File(path) => match file_writer(&path) {
            Ok(writer) => {
                try_init(json, writer);
            }
            Err(err) => {
                eprintln!(
                    "quill: failed to initialize LOG_OUTPUT=file at '{}': {}; using stderr instead",
                    path.display(),
                    err
                );
                try_init(json, BoxMakeWriter::new(std::io::stderr));
            }
        },
        Sink::Both(path) => match file_writer(&path) {
            Ok(writer) => {
                try_init(
                    json,
                    BoxMakeWriter::new(std::io::stderr.and(writer)),
                );
            }
            Err(err) => {
                eprintln!(
                    "quill: failed to initialize LOG_OUTPUT=both at '{}': {}; using stderr only",
                    path.display(),
                    err
                );
                try_init(json, BoxMakeWriter::new(std::io::stderr));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DEFAULT_LOG_FILE_PATH, Sink, json_format_enabled, parse_sink};

    #[test]
    fn parse_sink_defaults_to_stderr() {
        assert_eq!(parse_sink(None, None), Sink::Stderr);
        assert_eq!(parse_sink(Some("unknown"), None), Sink::Stderr);
    }

    #[test]
    fn parse_sink_accepts_file_and_both() {
        assert_eq!(
            parse_sink(Some("file"), Some("custom/quill.log")),
            Sink::File(PathBuf::from("custom/quill.log"))
        );
        assert_eq!(
            parse_sink(Some(" BOTH "), None),
            Sink::Both(PathBuf::from(DEFAULT_LOG_FILE_PATH))
        );
    }

    #[test]
    fn parse_sink_falls_back_to_default_path_for_blank_values() {
        assert_eq!(
            parse_sink(Some("file"), Some("   ")),
            Sink::File(PathBuf::from(DEFAULT_LOG_FILE_PATH))
        );
    }

    #[test]
    fn json_format_is_opt_in() {
        assert!(!json_format_enabled(None));
        assert!(!json_format_enabled(Some("pretty")));
        assert!(json_format_enabled(Some("json")));
        assert!(json_format_enabled(Some(" JSON ")));
    }
}
