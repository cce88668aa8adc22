use std::fs;
use std::io;
use std::path::Path;

use crate::config::AppConfig;
use crate::error::LedgerError;
use crate::export::{write_loadout_csv, write_loot_csv};
use crate::loadout::{find_loadout, load_loadouts};
use crate::parallel::{calculate_many, summarize, WorkerPool};
use crate::parser::{split_log_line, LineParser, ParserOptions};
use crate::server::{self, ApiContext};
use crate::session::store::load_session_file;
use crate::session::{ingest_lines, now_millis, Session, SessionStore};
use crate::stats::{calculate_session_stats, load_markup_table, MarkupTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Replay,
    Stats,
    Export,
    History,
    Serve,
}

const USAGE: &str = "usage: lootledger <replay|stats|export|history|serve>";

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("replay") => Some(Command::Replay),
        Some("stats") => Some(Command::Stats),
        Some("export") => Some(Command::Export),
        Some("history") => Some(Command::History),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    run_with_config(args, &config)
}

pub fn run_with_config(args: &[String], config: &AppConfig) -> i32 {
    match parse_command(args) {
        Some(Command::Replay) => handle_replay(args, config),
        Some(Command::Stats) => handle_stats(args, config),
        Some(Command::Export) => handle_export(args, config),
        Some(Command::History) => handle_history(args, config),
        Some(Command::Serve) => handle_serve(config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_replay(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2).filter(|arg| !arg.starts_with("--")) else {
        eprintln!("usage: lootledger replay <chat.log> [--loadout <id>] [--save]");
        return 2;
    };
    let loadout_id = flag_value(args, "--loadout");
    if args.iter().any(|arg| arg == "--loadout") && loadout_id.is_none() {
        eprintln!("usage: lootledger replay <chat.log> [--loadout <id>] [--save]");
        return 2;
    }
    let save = args.iter().any(|arg| arg == "--save");

    match replay(Path::new(path), loadout_id, save, config) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("replay failed: {err}");
            1
        }
    }
}

fn replay(
    path: &Path,
    loadout_id: Option<&str>,
    save: bool,
    config: &AppConfig,
) -> Result<String, LedgerError> {
    let raw =
        fs::read_to_string(path).map_err(|err| LedgerError::io(path.display().to_string(), err))?;

    let loadouts = match loadout_id {
        Some(_) => load_loadouts(config.loadouts_path())?,
        None => Vec::new(),
    };
    let active = match loadout_id {
        Some(id) => Some(
            find_loadout(&loadouts, id)
                .ok_or_else(|| LedgerError::NotFound(format!("loadout '{id}'")))?,
        ),
        None => None,
    };

    let started_at = raw
        .lines()
        .find_map(|line| split_log_line(line).and_then(|parsed| parsed.timestamp))
        .unwrap_or_else(now_millis);
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "replay".to_string());
    let parser = LineParser::new(ParserOptions {
        player_name: config.player_name.clone(),
    });

    let (session, report) = ingest_lines(
        &Session::started_at(name, started_at),
        raw.lines(),
        &parser,
        active,
    );
    let ended_at = session
        .events()
        .last()
        .map(|event| event.timestamp)
        .unwrap_or(started_at);
    let session = session.end_session(ended_at);
    tracing::info!(
        path = %path.display(),
        events = report.events_appended,
        dropped = report.lines_dropped,
        "replayed chat log"
    );

    if save {
        let saved = SessionStore::new(config.sessions_dir()).save(&session)?;
        eprintln!("saved session {} to {}", session.id, saved.display());
    }

    let markup = load_optional_markup(config)?;
    let stats = calculate_session_stats(&session, markup.as_ref());
    Ok(serde_json::to_string_pretty(&stats)?)
}

fn handle_stats(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: lootledger stats <session.json>");
        return 2;
    };

    let result = load_session_file(path).and_then(|session| {
        let markup = load_optional_markup(config)?;
        let stats = calculate_session_stats(&session, markup.as_ref());
        Ok(serde_json::to_string_pretty(&stats)?)
    });
    match result {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("stats failed: {err}");
            1
        }
    }
}

fn handle_export(args: &[String], config: &AppConfig) -> i32 {
    let (Some(path), Some(kind)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: lootledger export <session.json> <loot|loadouts>");
        return 2;
    };
    if kind != "loot" && kind != "loadouts" {
        eprintln!("unknown export '{kind}', expected loot or loadouts");
        return 2;
    }

    let result = load_session_file(path).and_then(|session| {
        let markup = load_optional_markup(config)?;
        let stats = calculate_session_stats(&session, markup.as_ref());
        let stdout = io::stdout().lock();
        if kind == "loot" {
            write_loot_csv(&stats, stdout)
        } else {
            write_loadout_csv(&stats, stdout)
        }
    });
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_history(args: &[String], config: &AppConfig) -> i32 {
    let workers = parse_usize_arg(flag_value(args, "--workers"), "workers", 0);
    let store = SessionStore::new(config.sessions_dir());

    let result = store.load_all().and_then(|sessions| {
        let markup = load_optional_markup(config)?;
        let stats = calculate_many(
            &sessions,
            markup.as_ref(),
            now_millis(),
            &WorkerPool::with_workers(workers),
        );
        Ok(serde_json::to_string_pretty(&summarize(&stats))?)
    });
    match result {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("history failed: {err}");
            1
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    let markup = match load_optional_markup(config) {
        Ok(markup) => markup,
        Err(err) => {
            eprintln!("server error: {err}");
            return 1;
        }
    };
    let context = ApiContext {
        parser: LineParser::new(ParserOptions {
            player_name: config.player_name.clone(),
        }),
        markup,
    };
    match server::run_server(&config.bind_addr, &context) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// The markup table from the data dir, or `None` when there is no file.
fn load_optional_markup(config: &AppConfig) -> Result<Option<MarkupTable>, LedgerError> {
    let path = config.markup_path();
    if !path.is_file() {
        return Ok(None);
    }
    load_markup_table(&path).map(Some)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
        .filter(|value| !value.starts_with("--"))
}

fn parse_usize_arg(raw: Option<&str>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["x", "replay"])), Some(Command::Replay));
        assert_eq!(parse_command(&args(&["x", "history"])), Some(Command::History));
        assert_eq!(parse_command(&args(&["x", "simulate"])), None);
        assert_eq!(parse_command(&args(&["x"])), None);
    }

    #[test]
    fn flag_value_skips_other_flags() {
        let list = args(&["x", "replay", "a.log", "--loadout", "--save"]);
        assert_eq!(flag_value(&list, "--loadout"), None);
        let list = args(&["x", "replay", "a.log", "--loadout", "rifle"]);
        assert_eq!(flag_value(&list, "--loadout"), Some("rifle"));
    }

    #[test]
    fn bad_worker_count_defaults() {
        assert_eq!(parse_usize_arg(Some("many"), "workers", 0), 0);
        assert_eq!(parse_usize_arg(Some("4"), "workers", 0), 4);
    }
}
