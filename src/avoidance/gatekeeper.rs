//! Hysteresis gate between the arbiter and the motors.
//!
//! Per command tick:
//! 1. Watchdog: a missing or stale obstacle snapshot forces a zero twist.
//! 2. Arbitrate the command against the snapshot (safe / unsafe).
//! 3. Hysteresis: several consecutive verdicts are needed to switch mode.
//! 4. Output: zero while stopped, the command (or the arbiter's twist) while running.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::arbiter::VelocityArbiter;
use super::fault::FaultMonitor;
use crate::core::Twist;
use crate::error::{Fault, FaultEvent};
use crate::obstacle::ObstacleSet;
use crate::shared::{ObstacleProvider, ObstacleSnapshot};

/// Twist emitted while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutput {
    /// The command as received
    #[default]
    Original,
    /// The arbiter's (possibly bent) twist; the command on a tolerated unsafe tick
    Adjusted,
}

/// Gatekeeper parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Consecutive safe ticks needed to leave STOP
    #[serde(default = "default_count")]
    pub stop_to_run_count: u32,

    /// Consecutive unsafe ticks needed to leave RUN
    #[serde(default = "default_count")]
    pub run_to_stop_count: u32,

    /// Maximum obstacle snapshot age before the watchdog trips (ms)
    #[serde(default = "default_sensor_timeout_ms")]
    pub sensor_timeout_ms: u64,

    /// Use the dense sweep instead of the left/right search
    #[serde(default)]
    pub smart_choice: bool,

    #[serde(default)]
    pub run_output: RunOutput,
}

fn default_count() -> u32 {
    5
}
fn default_sensor_timeout_ms() -> u64 {
    400
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            stop_to_run_count: default_count(),
            run_to_stop_count: default_count(),
            sensor_timeout_ms: default_sensor_timeout_ms(),
            smart_choice: false,
            run_output: RunOutput::default(),
        }
    }
}

impl GatekeeperConfig {
    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_millis(self.sensor_timeout_ms)
    }
}

/// Output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateMode {
    Run,
    #[default]
    Stop,
}

/// Per-tick arbitration outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
    /// Watchdog tripped, arbitration skipped
    Stale,
}

/// Hysteresis state. Starts in STOP with zero counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArbiterState {
    pub consecutive_safe: u32,
    pub consecutive_unsafe: u32,
    pub mode: GateMode,
}

impl ArbiterState {
    /// Count one verdict. Returns the new mode on a switch.
    fn observe(&mut self, safe: bool, config: &GatekeeperConfig) -> Option<GateMode> {
        if safe {
            self.consecutive_safe += 1;
            self.consecutive_unsafe = 0;
        } else {
            self.consecutive_unsafe += 1;
            self.consecutive_safe = 0;
        }

        let next = match self.mode {
            GateMode::Stop if safe && self.consecutive_safe >= config.stop_to_run_count => GateMode::Run,
            GateMode::Run if !safe && self.consecutive_unsafe >= config.run_to_stop_count => GateMode::Stop,
            _ => return None,
        };
        *self = ArbiterState {
            mode: next,
            ..ArbiterState::default()
        };
        Some(next)
    }
}

/// What the gate did with one command.
#[derive(Clone, Debug, PartialEq)]
pub struct GateDecision {
    /// Twist to send to the base
    pub twist: Twist,
    /// Mode after this tick
    pub mode: GateMode,
    pub verdict: Verdict,
    /// Fault transition caused by this tick, if any
    pub fault: Option<FaultEvent>,
}

/// Converts per-tick verdicts into a stable output twist.
pub struct TwistGatekeeper<P> {
    arbiter: VelocityArbiter,
    provider: P,
    config: GatekeeperConfig,
    state: ArbiterState,
    faults: FaultMonitor,
    timeout_fault: Fault,
}

impl<P: ObstacleProvider> TwistGatekeeper<P> {
    pub fn new(arbiter: VelocityArbiter, provider: P, config: GatekeeperConfig) -> Self {
        Self {
            arbiter,
            provider,
            config,
            state: ArbiterState::default(),
            faults: FaultMonitor::new(),
            timeout_fault: Fault::DataTimeout {
                what: "obstacle".to_string(),
            },
        }
    }

    pub fn state(&self) -> ArbiterState {
        self.state
    }

    pub fn mode(&self) -> GateMode {
        self.state.mode
    }

    pub fn arbiter(&self) -> &VelocityArbiter {
        &self.arbiter
    }

    pub fn faults(&self) -> &FaultMonitor {
        &self.faults
    }

    fn arbitrate_against(&self, command: Twist, snapshot: Option<&ObstacleSnapshot>) -> Option<Twist> {
        let empty = ObstacleSet::empty();
        let obstacles = snapshot.map_or(&empty, |s| s.value.as_ref());
        if self.config.smart_choice {
            self.arbiter.smart_arbitrate(command, obstacles)
        } else {
            self.arbiter.arbitrate(command, obstacles)
        }
    }

    /// Arbitrate `command` against the latest snapshot without touching
    /// the hysteresis state. No snapshot means no known obstacles.
    pub fn choose(&self, command: Twist) -> Option<Twist> {
        self.arbitrate_against(command, self.provider.current_obstacles().as_ref())
    }

    /// Process one command tick.
    pub fn tick(&mut self, command: Twist, now: Instant) -> GateDecision {
        let snapshot = self.provider.current_obstacles();
        let stale = snapshot
            .as_ref()
            .is_none_or(|s| s.age(now) > self.config.sensor_timeout());

        if stale {
            if self.state.mode == GateMode::Run {
                tracing::info!("Gate RUN -> STOP: obstacle data timed out");
            }
            self.state = ArbiterState::default();
            let fault = self.faults.raise(self.timeout_fault.clone());
            return GateDecision {
                twist: Twist::ZERO,
                mode: GateMode::Stop,
                verdict: Verdict::Stale,
                fault,
            };
        }

        let fault = self.faults.clear(&self.timeout_fault);
        let result = self.arbitrate_against(command, snapshot.as_ref());
        let verdict = if result.is_some() {
            Verdict::Safe
        } else {
            Verdict::Unsafe
        };

        if let Some(mode) = self.state.observe(result.is_some(), &self.config) {
            match mode {
                GateMode::Run => tracing::info!("Gate STOP -> RUN"),
                GateMode::Stop => tracing::info!("Gate RUN -> STOP: no safe twist"),
            }
        }

        let twist = match (self.state.mode, self.config.run_output) {
            (GateMode::Stop, _) => Twist::ZERO,
            (GateMode::Run, RunOutput::Original) => command,
            (GateMode::Run, RunOutput::Adjusted) => result.unwrap_or(command),
        };
        tracing::trace!(
            "Gate {:?} {:?}: ({:.2}, {:.2}) -> ({:.2}, {:.2})",
            self.state.mode,
            verdict,
            command.linear,
            command.angular,
            twist.linear,
            twist.angular
        );

        GateDecision {
            twist,
            mode: self.state.mode,
            verdict,
            fault,
        }
    }
}
