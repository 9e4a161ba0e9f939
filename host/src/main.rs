use chrono::{DateTime, NaiveDate, Utc};
use host::{start_of_day, RopeConfig, RopeService};
use rope_core::{compute_tap_log_hash, ReplayOutcome, Submission, TapOutcome};
use serde::Serialize;
use std::env;
use std::fs;
use std::time::Instant;

/// Saved replay report format
#[derive(Serialize)]
struct ReplayReport {
    player_id: i64,
    day: String,
    seed_hint: String,
    scene_digest: String,
    tap_log_hash: String,
    taps: usize,
    outcome: ReplayOutcome,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = RopeConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ Configuration error: {}", e);
        std::process::exit(1);
    });
    let service = RopeService::new(config);

    let command = &args[1];

    match command.as_str() {
        "start" => start_command(&service),

        "scene" => {
            let opts = parse_options_or_exit(&args[2..]);
            if let Some(extra) = opts.output_file {
                eprintln!("❌ Error: unexpected argument '{}'", extra);
                std::process::exit(1);
            }
            scene_command(&service, opts.day());
        }

        "replay" => {
            if args.len() < 3 {
                eprintln!(
                    "Usage: {} replay <submission_file> [--date YYYY-MM-DD] [output_file]",
                    args[0]
                );
                std::process::exit(1);
            }

            let submission_file = &args[2];
            let opts = parse_options_or_exit(&args[3..]);

            replay_command(
                &service,
                submission_file,
                opts.day(),
                opts.output_file.as_deref(),
            );
        }

        "--help" | "-h" => {
            print_usage(&args[0]);
            std::process::exit(0);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  start");
    eprintln!("      Print today's round parameters (duration and seed hint) as JSON");
    eprintln!();
    eprintln!("  scene [--date YYYY-MM-DD]");
    eprintln!("      Print the items of a day's scene (defaults to today, UTC)");
    eprintln!();
    eprintln!("  replay <submission_file> [--date YYYY-MM-DD] [output_file]");
    eprintln!("      Replay a saved submission against a day's scene");
    eprintln!("      - submission_file: JSON {{player_id, tap_timestamps_ms, started_at}}");
    eprintln!("      - --date, -d: Day whose scene to use (defaults to today, UTC)");
    eprintln!("      - output_file: Optional file for the JSON report");
    eprintln!("                     Defaults to: rope-replay_player<id>_<timestamp>.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SECRET_KEY, ROPE_DURATION_SEC, ROPE_GRACE_SEC");
}

/// Options following the positional arguments of `scene` and `replay`
#[derive(Debug, Default, PartialEq, Eq)]
struct CommandOptions {
    date: Option<NaiveDate>,
    output_file: Option<String>,
}

impl CommandOptions {
    /// Midnight UTC of `--date`, or now.
    fn day(&self) -> DateTime<Utc> {
        self.date.map(start_of_day).unwrap_or_else(Utc::now)
    }
}

/// Parses `[--date|-d YYYY-MM-DD] [output_file]` in any order.
fn parse_options(args: &[String]) -> Result<CommandOptions, String> {
    let mut opts = CommandOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--date" | "-d" => {
                let raw = iter.next().ok_or("--date requires a value (YYYY-MM-DD)")?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| format!("invalid date '{}': {}", raw, e))?;
                opts.date = Some(date);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            path => {
                if opts.output_file.is_some() {
                    return Err(format!("unexpected argument '{}'", path));
                }
                opts.output_file = Some(path.to_string());
            }
        }
    }
    Ok(opts)
}

fn parse_options_or_exit(args: &[String]) -> CommandOptions {
    parse_options(args).unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    })
}

fn start_command(service: &RopeService) {
    let start = service.round_start(Utc::now());
    match serde_json::to_string_pretty(&start) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Error encoding round parameters: {}", e);
            std::process::exit(1);
        }
    }
}

fn scene_command(service: &RopeService, now: DateTime<Utc>) {
    let scene = service.scene_for(now);

    println!("⛏️  Scene for {}", now.format("%Y-%m-%d"));
    println!("  Seed hint: {}", service.seed_for(now).hint());
    println!("  Digest: 0x{}", hex::encode(scene.digest()));
    println!();
    println!("  {:>3}  {:<10} {:>5} {:>5} {:>5}", "#", "kind", "x", "y", "value");
    for (i, it) in scene.items().enumerate() {
        println!(
            "  {:>3}  {:<10} {:>5} {:>5} {:>5}",
            i,
            it.kind.as_str(),
            it.x,
            it.y,
            it.value
        );
    }
    println!();
    println!("  Total value: {}", scene.total_value());
}

fn replay_command(
    service: &RopeService,
    submission_file: &str,
    now: DateTime<Utc>,
    output_file: Option<&str>,
) {
    println!("📋 Replaying submission");
    println!("  Submission file: {}", submission_file);
    println!("  Day: {}", now.format("%Y-%m-%d"));
    println!();

    // Check file size before reading
    const MAX_SUBMISSION_SIZE: u64 = 1024 * 1024; // 1 MB
    let metadata = fs::metadata(submission_file).unwrap_or_else(|e| {
        eprintln!("❌ Error accessing file '{}': {}", submission_file, e);
        std::process::exit(1);
    });

    if metadata.len() > MAX_SUBMISSION_SIZE {
        eprintln!(
            "❌ Submission file too large: {} bytes (max {} bytes)",
            metadata.len(),
            MAX_SUBMISSION_SIZE
        );
        std::process::exit(1);
    }

    let submission = load_submission(submission_file).unwrap_or_else(|e| {
        eprintln!("❌ Error loading submission: {}", e);
        std::process::exit(1);
    });

    println!(
        "📦 Loaded {} taps for player {}",
        submission.tap_timestamps_ms.len(),
        submission.player_id
    );
    println!();

    let start = Instant::now();
    let outcome = service.replay_taps(&submission.tap_timestamps_ms, now, print_tap);
    let duration = start.elapsed();

    let scene = service.scene_for(now);
    let report = ReplayReport {
        player_id: submission.player_id,
        day: now.format("%Y-%m-%d").to_string(),
        seed_hint: service.seed_for(now).hint().to_string(),
        scene_digest: hex::encode(scene.digest()),
        tap_log_hash: hex::encode(compute_tap_log_hash(&submission.tap_timestamps_ms)),
        taps: submission.tap_timestamps_ms.len(),
        outcome,
    };

    let default_filename = format!(
        "rope-replay_player{}_{}.json",
        report.player_id,
        Utc::now().timestamp()
    );
    let file_to_save = output_file.unwrap_or(&default_filename);

    match save_report(&report, file_to_save) {
        Ok(()) => {
            println!();
            println!("✅ Replay finished in {:.2}ms", duration.as_secs_f64() * 1000.0);
            println!("  Score: {}", report.outcome.score);
            println!(
                "  Taps applied: {} (skipped {})",
                report.outcome.taps_applied, report.outcome.taps_skipped
            );
            println!("  Items caught: {}", report.outcome.caught.len());
            if report.outcome.out_of_time {
                println!("  Round ended: time budget exhausted");
            }
            println!("  Tap log hash: 0x{}", report.tap_log_hash);
            println!();
            println!("💾 Report saved to: {}", file_to_save);
        }
        Err(e) => {
            eprintln!("❌ Error saving report: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_tap(outcome: &TapOutcome) {
    match outcome {
        TapOutcome::Skipped { tap_ms, cursor_ms } => {
            println!("  {:>6}ms  skipped (hook busy until {}ms)", tap_ms, cursor_ms)
        }
        TapOutcome::Ignored { tap_ms } => println!("  {:>6}ms  ignored (round over)", tap_ms),
        TapOutcome::Missed {
            tap_ms,
            length,
            cursor_ms,
        } => println!("  {:>6}ms  miss, {}px, back at {}ms", tap_ms, length, cursor_ms),
        TapOutcome::Caught {
            tap_ms,
            kind,
            value,
            length,
            cursor_ms,
            ..
        } => println!(
            "  {:>6}ms  {} +{}, {}px, back at {}ms",
            tap_ms, kind, value, length, cursor_ms
        ),
        TapOutcome::OutOfTime { tap_ms, ends_at_ms } => println!(
            "  {:>6}ms  out of time (would end at {}ms)",
            tap_ms, ends_at_ms
        ),
    }
}

fn load_submission(path: &str) -> Result<Submission, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    let submission: Submission = serde_json::from_str(&json)?;
    Ok(submission)
}

fn save_report(report: &ReplayReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn march_first() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 3, 1)
    }

    #[test]
    fn test_short_date_flag_is_not_an_output_file() {
        let opts = parse_options(&args(&["-d", "2025-03-01"])).unwrap();
        assert_eq!(opts.date, march_first());
        assert_eq!(opts.output_file, None);
    }

    #[test]
    fn test_output_file_on_either_side_of_date() {
        let expected = CommandOptions {
            date: march_first(),
            output_file: Some("out.json".to_string()),
        };
        assert_eq!(parse_options(&args(&["--date", "2025-03-01", "out.json"])), Ok(expected));
        let expected = CommandOptions {
            date: march_first(),
            output_file: Some("out.json".to_string()),
        };
        assert_eq!(parse_options(&args(&["out.json", "-d", "2025-03-01"])), Ok(expected));
    }

    #[test]
    fn test_no_options() {
        assert_eq!(parse_options(&[]), Ok(CommandOptions::default()));
    }

    #[test]
    fn test_bad_options_rejected() {
        assert!(parse_options(&args(&["--date"])).is_err());
        assert!(parse_options(&args(&["-d", "03/01/2025"])).is_err());
        assert!(parse_options(&args(&["--verbose"])).is_err());
        assert!(parse_options(&args(&["a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_date_resolves_to_midnight_utc() {
        let opts = parse_options(&args(&["--date", "2025-03-01"])).unwrap();
        assert_eq!(opts.day().format("%Y-%m-%d %H:%M:%S").to_string(), "2025-03-01 00:00:00");
    }
}
