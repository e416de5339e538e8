//! Avoidance side: from a commanded twist to a gated output twist.
//!
//! - [`VelocityArbiter`]: Forward simulation and twist search
//! - [`TwistGatekeeper`]: Hysteresis and watchdog
//! - [`FaultMonitor`]: Occurred/recovered reporting

mod arbiter;
mod fault;
mod gatekeeper;

pub use arbiter::{ArbiterConfig, MAX_SWEEP_SAMPLES, OutlineKind, VelocityArbiter};
pub use fault::FaultMonitor;
pub use gatekeeper::{
    ArbiterState, GateDecision, GateMode, GatekeeperConfig, RunOutput, TwistGatekeeper, Verdict,
};
