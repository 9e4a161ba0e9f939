//! Replay-driven scoring of a client's tap log.
//!
//! `Ready -> Processing -> Done`. The cursor only ever moves forward, by the
//! physical cost of each tap that could actually have been acted on.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::angle::angle_at;
use crate::constants::{ROUND_DURATION_SEC, SUBMIT_GRACE_SEC};
use crate::ray::cast_ray;
use crate::scene::{ItemKind, Scene};
use crate::seed::DailySeed;
use crate::timing::{miss_ms, retract_ms, travel_ms};
use crate::{RopeError, Submission};

/// Server-fixed round timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRules {
    pub duration_ms: i64,
    pub grace_ms: i64,
}

impl RoundRules {
    pub fn new(duration_sec: u32, grace_sec: u32) -> Self {
        Self {
            duration_ms: duration_sec as i64 * 1000,
            grace_ms: grace_sec as i64 * 1000,
        }
    }

    pub fn duration_sec(&self) -> u32 {
        (self.duration_ms / 1000) as u32
    }

    /// Latest accepted `now - started_at`.
    pub fn submit_window_ms(&self) -> i64 {
        self.duration_ms + self.grace_ms
    }
}

impl Default for RoundRules {
    fn default() -> Self {
        Self::new(ROUND_DURATION_SEC, SUBMIT_GRACE_SEC)
    }
}

/// Rejects submissions that arrive too long after their claimed start.
pub fn check_submission_window(
    rules: &RoundRules,
    started_at_ms: i64,
    now_ms: i64,
) -> Result<(), RopeError> {
    let elapsed_ms = now_ms.saturating_sub(started_at_ms);
    let limit_ms = rules.submit_window_ms();
    if elapsed_ms > limit_ms {
        return Err(RopeError::TimeExceeded {
            elapsed_ms,
            limit_ms,
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ready,
    Processing,
    Done,
}

/// What a single tap did to the replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TapOutcome {
    /// Tap landed while the hook was still out.
    Skipped { tap_ms: i64, cursor_ms: i64 },
    /// Replay already finished.
    Ignored { tap_ms: i64 },
    Missed {
        tap_ms: i64,
        length: u32,
        cursor_ms: i64,
    },
    Caught {
        tap_ms: i64,
        index: usize,
        kind: ItemKind,
        value: u32,
        length: u32,
        cursor_ms: i64,
    },
    /// The tap's round trip would end past the round; nothing granted.
    OutOfTime { tap_ms: i64, ends_at_ms: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CaughtItem {
    pub index: usize,
    pub kind: ItemKind,
    pub value: u32,
    pub tap_ms: i64,
}

/// Final result of one replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub score: u32,
    pub taps_applied: u32,
    pub taps_skipped: u32,
    pub caught: Vec<CaughtItem>,
    pub cursor_ms: i64,
    pub out_of_time: bool,
}

/// Per-submission replay state. Owns its scene exclusively.
#[derive(Clone, Debug)]
pub struct ReplayState {
    rules: RoundRules,
    scene: Scene,
    phase: Phase,
    cursor_ms: i64,
    score: u32,
    taps_applied: u32,
    taps_skipped: u32,
    out_of_time: bool,
    caught: Vec<CaughtItem>,
}

impl ReplayState {
    pub fn new(scene: Scene, rules: RoundRules) -> Self {
        Self {
            rules,
            scene,
            phase: Phase::Ready,
            cursor_ms: 0,
            score: 0,
            taps_applied: 0,
            taps_skipped: 0,
            out_of_time: false,
            caught: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor_ms(&self) -> i64 {
        self.cursor_ms
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Applies one tap, in the order the client supplied it.
    pub fn step(&mut self, tap_ms: i64) -> TapOutcome {
        if self.phase == Phase::Done {
            return TapOutcome::Ignored { tap_ms };
        }
        if tap_ms < self.cursor_ms {
            self.taps_skipped += 1;
            return TapOutcome::Skipped {
                tap_ms,
                cursor_ms: self.cursor_ms,
            };
        }
        self.phase = Phase::Processing;

        let cast = cast_ray(angle_at(tap_ms), &self.scene);
        let hit = cast.hit.and_then(|i| self.scene.get(i).map(|it| (i, *it)));

        let cost = match hit {
            None => miss_ms(cast.length),
            Some((_, item)) => travel_ms(cast.length) + retract_ms(cast.length, item.kind),
        };
        let ends_at_ms = tap_ms.saturating_add(cost as i64);
        if ends_at_ms > self.rules.duration_ms {
            self.phase = Phase::Done;
            self.out_of_time = true;
            return TapOutcome::OutOfTime { tap_ms, ends_at_ms };
        }

        self.taps_applied += 1;
        self.cursor_ms = ends_at_ms;

        match hit {
            None => TapOutcome::Missed {
                tap_ms,
                length: cast.length,
                cursor_ms: self.cursor_ms,
            },
            Some((index, item)) => {
                self.scene.consume(index);
                self.score += item.value;
                self.caught.push(CaughtItem {
                    index,
                    kind: item.kind,
                    value: item.value,
                    tap_ms,
                });
                TapOutcome::Caught {
                    tap_ms,
                    index,
                    kind: item.kind,
                    value: item.value,
                    length: cast.length,
                    cursor_ms: self.cursor_ms,
                }
            }
        }
    }

    pub fn finish(self) -> ReplayOutcome {
        ReplayOutcome {
            score: self.score,
            taps_applied: self.taps_applied,
            taps_skipped: self.taps_skipped,
            caught: self.caught,
            cursor_ms: self.cursor_ms,
            out_of_time: self.out_of_time,
        }
    }
}

/// Replays a whole tap log; stops early once the round budget is spent.
pub fn replay(scene: Scene, taps: &[i64], rules: RoundRules) -> ReplayOutcome {
    let mut state = ReplayState::new(scene, rules);
    for &tap in taps {
        state.step(tap);
        if state.phase() == Phase::Done {
            break;
        }
    }
    state.finish()
}

/// Full verification of a submission: time window, scene rebuild, replay.
pub fn verify_submission(
    seed: &DailySeed,
    submission: &Submission,
    rules: RoundRules,
    now_ms: i64,
) -> Result<ReplayOutcome, RopeError> {
    check_submission_window(&rules, submission.started_at, now_ms)?;
    let scene = Scene::from_seed(seed.as_bytes());
    Ok(replay(scene, &submission.tap_timestamps_ms, rules))
}
