//! Recoverable fault bookkeeping.

use crate::error::{Fault, FaultEvent};

/// Tracks active faults and reports each transition exactly once.
#[derive(Debug, Default)]
pub struct FaultMonitor {
    active: Vec<Fault>,
}

impl FaultMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `fault` active. Returns `Occurred` only on the first raise.
    pub fn raise(&mut self, fault: Fault) -> Option<FaultEvent> {
        if self.active.contains(&fault) {
            return None;
        }
        tracing::warn!("Fault occurred: {}", fault);
        self.active.push(fault.clone());
        Some(FaultEvent::Occurred(fault))
    }

    /// Mark `fault` resolved. Returns `Recovered` only if it was active.
    pub fn clear(&mut self, fault: &Fault) -> Option<FaultEvent> {
        let index = self.active.iter().position(|f| f == fault)?;
        let fault = self.active.remove(index);
        tracing::info!("Fault recovered: {}", fault);
        Some(FaultEvent::Recovered(fault))
    }

    pub fn is_active(&self, fault: &Fault) -> bool {
        self.active.contains(fault)
    }

    pub fn active(&self) -> &[Fault] {
        &self.active
    }
}
