use chrono::{DateTime, NaiveDate, Utc};
use rope_core::{
    check_submission_window, DailySeed, Phase, ReplayOutcome, ReplayState, RopeError, RoundRules,
    RoundStart, Scene, SubmitResult, Submission, TapOutcome,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Secret used when `SECRET_KEY` is unset
pub const DEFAULT_SECRET: &str = "okapi";

/// Runtime configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RopeConfig {
    /// Salts the daily seed; never sent to clients
    pub secret: String,
    pub duration_sec: u32,
    pub grace_sec: u32,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            duration_sec: rope_core::constants::ROUND_DURATION_SEC,
            grace_sec: rope_core::constants::SUBMIT_GRACE_SEC,
        }
    }
}

impl RopeConfig {
    /// Reads `SECRET_KEY`, `ROPE_DURATION_SEC` and `ROPE_GRACE_SEC`.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RopeConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let secret = match lookup("SECRET_KEY") {
            Some(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("SECRET_KEY not set; using the built-in default secret");
                defaults.secret
            }
        };

        let duration_sec = parse_seconds(&lookup, "ROPE_DURATION_SEC", defaults.duration_sec)?;
        if duration_sec == 0 {
            return Err("ROPE_DURATION_SEC must be greater than zero".into());
        }
        let grace_sec = parse_seconds(&lookup, "ROPE_GRACE_SEC", defaults.grace_sec)?;

        Ok(Self {
            secret,
            duration_sec,
            grace_sec,
        })
    }

    pub fn rules(&self) -> RoundRules {
        RoundRules::new(self.duration_sec, self.grace_sec)
    }
}

fn parse_seconds<F>(lookup: &F, key: &str, default: u32) -> Result<u32, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => Ok(raw
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("Invalid {}: '{}' ({})", key, raw, e))?),
    }
}

/// `YYYYMMDD` stamp of a UTC instant
pub fn day_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// Midnight UTC of a calendar date
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Binds the pure game core to the wall clock and the configured secret.
///
/// Stateless apart from configuration; safe to share across request workers.
#[derive(Debug, Clone)]
pub struct RopeService {
    config: RopeConfig,
}

impl RopeService {
    pub fn new(config: RopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    pub fn rules(&self) -> RoundRules {
        self.config.rules()
    }

    pub fn seed_for(&self, now: DateTime<Utc>) -> DailySeed {
        DailySeed::derive(&self.config.secret, &day_stamp(now))
    }

    pub fn scene_for(&self, now: DateTime<Utc>) -> Scene {
        Scene::from_seed(self.seed_for(now).as_bytes())
    }

    /// Round parameters for the UTC day containing `now`.
    pub fn round_start(&self, now: DateTime<Utc>) -> RoundStart {
        RoundStart::new(&self.seed_for(now), &self.rules())
    }

    /// Checks the submission window, replays the taps and returns the score.
    pub fn submit(
        &self,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<SubmitResult, RopeError> {
        let rules = self.rules();
        if let Err(e) =
            check_submission_window(&rules, submission.started_at, now.timestamp_millis())
        {
            tracing::warn!("Rejected submission for player {}: {}", submission.player_id, e);
            return Err(e);
        }

        let mut state = ReplayState::new(self.scene_for(now), rules);
        for &tap in &submission.tap_timestamps_ms {
            step_logged(&mut state, tap);
            if state.phase() == Phase::Done {
                break;
            }
        }
        let outcome = state.finish();

        tracing::info!(
            "Scored submission for player {}: {} points ({} taps, {} applied, {} skipped{})",
            submission.player_id,
            outcome.score,
            submission.tap_timestamps_ms.len(),
            outcome.taps_applied,
            outcome.taps_skipped,
            if outcome.out_of_time { ", ran out of time" } else { "" }
        );
        Ok(SubmitResult::ok(outcome.score))
    }

    /// Replays taps against the scene of `now`'s day without the wall-clock gate.
    ///
    /// `on_tap` sees every tap outcome in order; used by the offline CLI.
    pub fn replay_taps<F>(&self, taps: &[i64], now: DateTime<Utc>, mut on_tap: F) -> ReplayOutcome
    where
        F: FnMut(&TapOutcome),
    {
        let mut state = ReplayState::new(self.scene_for(now), self.rules());
        for &tap in taps {
            on_tap(&step_logged(&mut state, tap));
        }
        state.finish()
    }
}

fn step_logged(state: &mut ReplayState, tap: i64) -> TapOutcome {
    let outcome = state.step(tap);
    tracing::debug!("tap {}ms -> {:?}", tap, outcome);
    outcome
}

/// Downstream store of cumulative player scores.
pub trait ScoreSink: Send + Sync {
    /// Adds `score` to the player's running total and returns the new total.
    fn record(&self, player_id: i64, score: u32) -> u64;

    fn total(&self, player_id: i64) -> u64;
}

/// In-process [`ScoreSink`]; totals are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryScoreSink {
    totals: Mutex<HashMap<i64, u64>>,
}

impl MemoryScoreSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreSink for MemoryScoreSink {
    fn record(&self, player_id: i64, score: u32) -> u64 {
        let mut totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        let total = totals.entry(player_id).or_insert(0);
        *total += score as u64;
        *total
    }

    fn total(&self, player_id: i64) -> u64 {
        let totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        totals.get(&player_id).copied().unwrap_or(0)
    }
}
