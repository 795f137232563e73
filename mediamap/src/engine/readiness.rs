/// Tracks whether the map engine has finished its asynchronous initialization.
///
/// The load signal is one-shot from the point of view of the gate: the first signal opens it,
/// the following ones change nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessGate {
    ready: bool,
}

impl ReadinessGate {
    /// Returns `true` once the load signal was received.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Registers a load signal. Returns `true` if this signal opened the gate.
    pub fn signal_loaded(&mut self) -> bool {
        let opened = !self.ready;
        self.ready = true;
        opened
    }
}
