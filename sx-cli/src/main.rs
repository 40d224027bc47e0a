//! sx: CLI binary for the Schnapsen assignment checker.
//!
//! Subcommands:
//! - check    grade the student bot against a transcript bundle
//! - record   record a bundle from the student bot
//! - report   re-render a saved assessment

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use serde::Serialize;

use sx_check::{assess_correctness, record_bundle, Assessment, Assignment, AssessmentObserver};
use sx_check::{render_status_report, Config, UnitReport};
use sx_logging::{
    AssessmentEndEventV1, AssessmentStartEventV1, FirstErrorV1, NdjsonError, NdjsonWriter,
    UnitResultEventV1, VersionInfoV1,
};
use sx_student::StudentBot;
use sx_transcript::{BundleSource, CachedSource, FileSource, HttpSource, TranscriptBundle};

/// Writes one `unit_result` line per finished unit.
struct EventObserver {
    writer: Option<NdjsonWriter>,
    run_id: String,
    error: Option<NdjsonError>,
}

impl EventObserver {
    fn write<T: Serialize>(&mut self, event: &T) {
        if self.error.is_some() {
            return;
        }
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = w.write_event(event) {
                self.error = Some(e);
            }
        }
    }

    fn finish(mut self) -> Result<(), NdjsonError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        if let Some(w) = self.writer.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}

impl AssessmentObserver for EventObserver {
    fn on_unit(&mut self, report: &UnitReport) {
        let first_error = report.first_error().map(|e| FirstErrorV1 {
            kind: format!("{:?}", e.kind).to_lowercase(),
            transcript_index: e.transcript_index as u64,
            game_id: e.game_id,
            decision_point: e.decision_point as u64,
            message: e.message.clone(),
        });
        let event = UnitResultEventV1 {
            event: "unit_result".to_string(),
            ts_ms: sx_logging::now_ms(),
            run_id: self.run_id.clone(),
            unit: report.unit.to_string(),
            passed: report.passed(),
            transcripts_total: report.transcripts_total as u64,
            transcripts_tried: report.transcripts_tried as u64,
            first_error,
        };
        self.write(&event);
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i + 1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Invalid or missing value for {flag}");
            process::exit(1);
        })
}

fn load_config(path: Option<&str>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    }
}

fn cmd_check(args: &[String]) {
    let mut student_id: Option<u64> = None;
    let mut config_path: Option<String> = None;
    let mut bundle_path: Option<String> = None;
    let mut events_path: Option<String> = None;
    let mut out: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sx check

USAGE:
    sx check --id STUDENT_ID [--config cfg.yaml] [--events PATH] [--out PATH]
    sx check --bundle bot.gamelog [--events PATH] [--out PATH]

OPTIONS:
    --id N          Student id; the bundle is fetched from the transcript server
    --config PATH   Path to YAML config (default: built-in defaults)
    --bundle PATH   Grade against a bundle on disk instead of fetching one
    --events PATH   Append NDJSON events to PATH (overrides logging.events_path)
    --out PATH      Also write the full assessment as JSON (see `sx report`)
"#
                );
                return;
            }
            "--id" => {
                student_id = Some(parse_value(args, i, "--id"));
                i += 2;
            }
            "--config" => {
                config_path = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            "--bundle" => {
                bundle_path = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            "--events" => {
                events_path = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            "--out" => {
                out = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `sx check`: {}", other);
                eprintln!("Run `sx check --help` for usage.");
                process::exit(1);
            }
        }
    }

    let cfg = load_config(config_path.as_deref());

    let source: Box<dyn BundleSource> = match (&bundle_path, student_id) {
        (Some(path), _) => Box::new(FileSource::new(path)),
        (None, Some(_)) => {
            let http = HttpSource::new(
                cfg.server.base_url.clone(),
                Duration::from_secs(cfg.server.timeout_secs),
            );
            if cfg.cache.enabled {
                Box::new(CachedSource::new(http, cfg.cache.dir.clone()))
            } else {
                Box::new(http)
            }
        }
        (None, None) => {
            eprintln!("Missing --id (or --bundle)");
            process::exit(1);
        }
    };
    let id = student_id.unwrap_or(0);

    eprintln!("Fetching transcripts from {}", source.describe(id));
    let bytes = source.fetch(id).unwrap_or_else(|e| {
        eprintln!("Could not obtain transcripts: {e}");
        process::exit(1);
    });
    let bundle = TranscriptBundle::from_bytes(&bytes).unwrap_or_else(|e| {
        eprintln!("Could not decode transcripts: {e}");
        process::exit(1);
    });

    let started = sx_logging::now_ms();
    let bundle_hash = sx_logging::hash_bundle_bytes(&bytes);
    let run_id = sx_logging::make_run_id(started, &bundle_hash);

    let events_path = events_path
        .map(PathBuf::from)
        .or_else(|| cfg.logging.events_path.clone());
    let writer = events_path.map(|p| {
        NdjsonWriter::open_append_with_flush(&p, cfg.logging.flush_every_lines).unwrap_or_else(
            |e| {
                eprintln!("Failed to open event log {}: {e}", p.display());
                process::exit(1);
            },
        )
    });
    let mut observer = EventObserver {
        writer,
        run_id: run_id.clone(),
        error: None,
    };

    let bot = StudentBot;
    observer.write(&AssessmentStartEventV1 {
        event: "assessment_start".to_string(),
        ts_ms: started,
        v: VersionInfoV1::new(sx_check::VERSION, bundle.format_version()),
        run_id: run_id.clone(),
        bot: bot.name().to_string(),
        student_id,
        source: source.describe(id),
        bundle_hash,
        bundle_bytes: bytes.len() as u64,
    });

    let result = assess_correctness(&bot, &bundle, &mut observer);

    let (units_total, units_passed, all_passed, fatal) = match &result {
        Ok(a) => (
            a.units().count() as u32,
            a.units().filter(|u| u.passed()).count() as u32,
            a.all_passed(),
            None,
        ),
        Err(e) => (0, 0, false, Some(e.to_string())),
    };
    let ended = sx_logging::now_ms();
    observer.write(&AssessmentEndEventV1 {
        event: "assessment_end".to_string(),
        ts_ms: ended,
        run_id,
        units_total,
        units_passed,
        all_passed,
        duration_ms: ended.saturating_sub(started),
        fatal,
    });
    if let Err(e) = observer.finish() {
        eprintln!("Failed to write event log: {e}");
    }

    let assessment = result.unwrap_or_else(|e| {
        eprintln!("Assessment aborted: {e}");
        process::exit(1);
    });

    println!();
    print!("{}", render_status_report(bot.name(), &assessment));

    if let Some(out) = out {
        sx_logging::write_json_atomic(&out, &assessment).unwrap_or_else(|e| {
            eprintln!("Failed to write {out}: {e}");
            process::exit(1);
        });
    }
}

fn cmd_record(args: &[String]) {
    let mut games: u64 = 20;
    let mut first_id: u64 = 0;
    let mut out: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sx record

USAGE:
    sx record --out bot.gamelog [--games N] [--first-id ID]

OPTIONS:
    --out PATH       Where to write the bundle (required)
    --games N        Number of game ids to record (default: 20)
    --first-id ID    First game id; ids are consecutive (default: 0)
"#
                );
                return;
            }
            "--games" => {
                games = parse_value(args, i, "--games");
                i += 2;
            }
            "--first-id" => {
                first_id = parse_value(args, i, "--first-id");
                i += 2;
            }
            "--out" => {
                out = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `sx record`: {}", other);
                eprintln!("Run `sx record --help` for usage.");
                process::exit(1);
            }
        }
    }
    let out = out.unwrap_or_else(|| {
        eprintln!("Missing --out");
        process::exit(1);
    });

    let ids: Vec<u64> = (first_id..first_id.saturating_add(games)).collect();
    let bundle = record_bundle(&StudentBot, &ids).unwrap_or_else(|e| {
        eprintln!("Recording failed: {e}");
        process::exit(1);
    });
    bundle.write_atomic(&out).unwrap_or_else(|e| {
        eprintln!("Failed to write {out}: {e}");
        process::exit(1);
    });
    println!("Recorded {} games to {out}", ids.len());
}

fn cmd_report(args: &[String]) {
    let mut bot_name = StudentBot.name().to_string();
    let mut path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sx report

USAGE:
    sx report ASSESSMENT_JSON [--bot NAME]

OPTIONS:
    --bot NAME    Bot name for the report header (default: StudentBot)
"#
                );
                return;
            }
            "--bot" => {
                bot_name = args.get(i + 1).cloned().unwrap_or_default();
                i += 2;
            }
            other if path.is_none() && !other.starts_with("--") => {
                path = Some(other.to_string());
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `sx report`: {}", other);
                eprintln!("Run `sx report --help` for usage.");
                process::exit(1);
            }
        }
    }
    let path = path.unwrap_or_else(|| {
        eprintln!("Missing assessment path");
        process::exit(1);
    });
    let assessment: Assessment = sx_logging::read_json(&path).unwrap_or_else(|e| {
        eprintln!("Failed to read {path}: {e}");
        process::exit(1);
    });
    print!("{}", render_status_report(&bot_name, &assessment));
}

fn print_help() {
    eprintln!(
        r#"sx - Schnapsen assignment checker

USAGE:
    sx <COMMAND> [OPTIONS]

COMMANDS:
    check     Grade the student bot against recorded transcripts
    record    Record a transcript bundle from the student bot
    report    Print the status report of a saved assessment

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `sx <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("sx {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(1);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "check" => {
            cmd_check(&args[2..]);
        }
        "record" => {
            cmd_record(&args[2..]);
        }
        "report" => {
            cmd_report(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `sx --help` for usage.");
            process::exit(1);
        }
    }
}
