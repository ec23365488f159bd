//! `modal` entrypoint: replay key sequences through the modal command
//! interpreter over a text file and print (or write back) the result.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Coordinator, EditorContext, build_coordinator};
use core_config::{ConfigFile, load_from};
use core_events::parse_key_sequence;
use core_model::{HeadlessCursor, HeadlessSelection, HeadlessUi, UiHandle};
use core_text::{Buffer, Position};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "modal.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "modal", version, about = "Replay modal editing keys over a text file")]
struct Args {
    /// File to edit (UTF-8 text). If omitted an empty buffer is used.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `modal.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Keys in `<...>` notation. Repeat the flag to type in separate bursts;
    /// ambiguous mappings are resolved between bursts.
    #[arg(short = 'k', long = "keys")]
    pub keys: Vec<String>,
    /// Read bursts from a file, one per line, after any `--keys`.
    #[arg(long = "keys-file")]
    pub keys_file: Option<PathBuf>,
    /// Write the result back to PATH instead of printing it.
    #[arg(short = 'w', long = "write", requires = "path")]
    pub write: bool,
    /// Directory receiving `modal.log`.
    #[arg(long = "log-dir", default_value = ".")]
    pub log_dir: PathBuf,
}

/// File contents with line endings normalized to `\n`.
#[derive(Debug)]
struct LoadedText {
    name: String,
    text: String,
    crlf: bool,
}

impl LoadedText {
    fn read(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                name: "untitled".to_string(),
                text: String::new(),
                crlf: false,
            });
        };
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(target: "io", file = %path.display(), "new_file");
                String::new()
            }
            Err(e) => {
                error!(target: "io", file = %path.display(), ?e, "file_open_error");
                return Err(e).with_context(|| format!("cannot read {}", path.display()));
            }
        };
        let crlf = raw.contains("\r\n");
        let text = if crlf { raw.replace("\r\n", "\n") } else { raw };
        debug!(target: "io", file = %path.display(), size_bytes = text.len(), crlf, "file_read_ok");
        Ok(Self { name, text, crlf })
    }

    /// Text as it should be written back.
    fn restore_endings(&self, text: &str) -> String {
        if self.crlf {
            text.replace('\n', "\r\n")
        } else {
            text.to_string()
        }
    }
}

/// One interpreter over one buffer, fed in bursts of keys.
struct Session {
    coordinator: Coordinator,
    ui: UiHandle,
    timeout: bool,
}

impl Session {
    fn new(name: &str, text: &str, config: &ConfigFile) -> Result<Self> {
        let ui = HeadlessUi::new();
        let handle = ui.handle();
        let editor = EditorContext::new(
            Box::new(Buffer::from_str(name, text)?),
            Box::new(HeadlessCursor::at(Position::origin())),
            Box::new(HeadlessSelection::new()),
            Box::new(ui),
        );
        Ok(Self {
            coordinator: build_coordinator(editor, config),
            ui: handle,
            timeout: config.input.timeout,
        })
    }

    /// Type `notation`, then pause. With `timeout` enabled the pause resolves
    /// keys still waiting for a longer mapping.
    fn burst(&mut self, notation: &str) -> Result<()> {
        let keys = parse_key_sequence(notation)
            .with_context(|| format!("invalid key notation: {notation}"))?;
        debug!(target: "runtime", keys = keys.len(), "burst");
        for key in keys {
            self.coordinator.handle_key(key);
        }
        if self.coordinator.is_pending() {
            if self.timeout {
                self.coordinator.handle_timeout();
            } else {
                debug!(target: "runtime", "keys_left_pending");
            }
        }
        Ok(())
    }

    fn text(&self) -> String {
        let content = self.coordinator.editor().content();
        content.text(0, content.text_length())
    }

    /// Mode indicator and the latest message, as a status line would show them.
    fn status(&self) -> String {
        let ui = self.ui.borrow();
        let mut status = format!("-- {} --", ui.mode);
        if let Some(message) = ui.last_message() {
            status.push(' ');
            status.push_str(message);
        }
        status
    }
}

/// Every burst to type: `--keys` values first, then the lines of `--keys-file`.
fn bursts(args: &Args) -> Result<Vec<String>> {
    let mut out = args.keys.clone();
    if let Some(path) = &args.keys_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read keys from {}", path.display()))?;
        out.extend(
            content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    Ok(out)
}

/// Run the whole replay and return the resulting text with the status line.
fn run(args: &Args) -> Result<(String, String)> {
    let config = load_from(args.config.clone())?;
    let loaded = LoadedText::read(args.path.as_deref())?;
    let mut session = Session::new(&loaded.name, &loaded.text, &config.file)?;
    let bursts = bursts(args)?;
    info!(
        target: "runtime.startup",
        buffer = loaded.name.as_str(),
        bursts = bursts.len(),
        config_override = args.config.is_some(),
        mappings = config.file.map.len(),
        "bootstrap_complete"
    );
    for burst in &bursts {
        session.burst(burst)?;
    }
    let status = session.status();
    let text = loaded.restore_endings(&session.text());
    if args.write
        && let Some(path) = &args.path
    {
        std::fs::write(path, &text).with_context(|| format!("cannot write {}", path.display()))?;
        info!(target: "io", file = %path.display(), size_bytes = text.len(), "file_write_ok");
    }
    Ok((text, status))
}

fn configure_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // A global subscriber is already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_dir);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let (text, status) = match run(&args) {
        Ok(done) => done,
        Err(err) => {
            error!(target: "runtime", %err, "run_failed");
            return Err(err);
        }
    };
    if !args.write {
        print!("{text}");
    }
    eprintln!("{status}");
    info!(target: "runtime", "shutdown");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(path: Option<PathBuf>, keys: &[&str]) -> Args {
        Args {
            path,
            config: Some(PathBuf::from("__nonexistent_modal__.toml")),
            keys: keys.iter().map(|k| k.to_string()).collect(),
            keys_file: None,
            write: false,
            log_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn cli_parses_repeated_keys() {
        let args = Args::try_parse_from(["modal", "notes.txt", "-k", "dd", "--keys", "x", "-w"]).unwrap();
        assert_eq!(args.path, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.keys, vec!["dd".to_string(), "x".to_string()]);
        assert!(args.write);
        assert!(Args::try_parse_from(["modal", "-w"]).is_err());
    }

    #[test]
    fn replays_keys_over_empty_buffer() {
        let (text, status) = run(&args(None, &["ihello<CR>world<Esc>", "kx"])).unwrap();
        assert_eq!(text, "hell\nworld");
        assert_eq!(status, "-- NORMAL --");
    }

    #[test]
    fn status_carries_last_error() {
        let (_, status) = run(&args(None, &[":nope<CR>"])).unwrap();
        assert_eq!(status, "-- NORMAL -- E492: Not an editor command: nope");
    }

    #[test]
    fn bursts_resolve_pending_mappings() {
        let (text, status) = run(&args(None, &[":imap jj <lt>Esc><CR>", "ij", "j"])).unwrap();
        assert_eq!(text, "jj");
        assert_eq!(status, "-- INSERT --");
        let (text, status) = run(&args(None, &[":imap jj <lt>Esc><CR>", "ijj"])).unwrap();
        assert_eq!(text, "");
        assert_eq!(status, "-- NORMAL --");
    }

    #[test]
    fn writes_back_preserving_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("in.txt");
        std::fs::write(&file, "one\r\ntwo\r\n").unwrap();
        let mut a = args(Some(file.clone()), &["ddp"]);
        a.write = true;
        let (text, _) = run(&a).unwrap();
        assert_eq!(text, "two\r\none\r\n");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "two\r\none\r\n");
    }

    #[test]
    fn keys_file_lines_are_bursts() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("keys.txt");
        std::fs::write(&keys, "x\n\n$x\n").unwrap();
        let file = dir.path().join("doc.txt");
        std::fs::write(&file, "abcd").unwrap();
        let mut a = args(Some(file), &[]);
        a.keys_file = Some(keys);
        let (text, _) = run(&a).unwrap();
        assert_eq!(text, "bc");
    }

    #[test]
    fn invalid_notation_is_an_error() {
        assert!(run(&args(None, &["<Bogus>"])).is_err());
    }
}
