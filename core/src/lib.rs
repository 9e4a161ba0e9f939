#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod angle;
pub mod constants;
pub mod fixed;
pub mod ray;
pub mod replay;
pub mod rng;
pub mod scene;
pub mod seed;
pub mod timing;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use replay::{
    check_submission_window, replay, verify_submission, CaughtItem, Phase, ReplayOutcome,
    ReplayState, RoundRules, TapOutcome,
};
pub use scene::{Item, ItemKind, Scene};
pub use seed::DailySeed;

/// Round parameters handed to the client before play
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoundStart {
    pub duration_seconds: u32,
    /// First characters of the day's seed, for display only
    pub seed_hint: alloc::string::String,
}

impl RoundStart {
    pub fn new(seed: &DailySeed, rules: &RoundRules) -> Self {
        Self {
            duration_seconds: rules.duration_sec(),
            seed_hint: seed.hint().into(),
        }
    }
}

/// A finished round as reported by the client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    #[serde(alias = "telegram_id")]
    pub player_id: i64,
    /// Tap times in ms since round start, in the order they happened
    #[serde(alias = "taps_ms", default)]
    pub tap_timestamps_ms: Vec<i64>,
    /// Claimed round start, epoch ms
    pub started_at: i64,
}

/// Authoritative result of a submission
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    pub ok: bool,
    pub score: u32,
}

impl SubmitResult {
    pub fn ok(score: u32) -> Self {
        Self { ok: true, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopeError {
    /// `now - started_at` is past the round duration plus grace
    TimeExceeded { elapsed_ms: i64, limit_ms: i64 },
}

impl core::fmt::Display for RopeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RopeError::TimeExceeded {
                elapsed_ms,
                limit_ms,
            } => write!(
                f,
                "time exceeded: submitted {}ms after start (limit {}ms)",
                elapsed_ms, limit_ms
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RopeError {}

/// Compute SHA-256 hash of a tap log
/// Binds a replay report to the exact taps that produced it
pub fn compute_tap_log_hash(taps: &[i64]) -> [u8; 32] {
    let mut h = Sha256::new();

    // Version prefix: 10 bytes
    // Taps: 8 bytes per i64, little-endian
    let mut buf = Vec::with_capacity(10 + taps.len() * 8);
    buf.extend_from_slice(b"ROPETAPSv1");
    for t in taps.iter() {
        buf.extend_from_slice(&t.to_le_bytes());
    }
    h.update(&buf);

    let out = h.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}
