//! Player input requests
//!
//! Key handlers and the `request_*` methods only queue requests; the session
//! applies them before integrating the next tick.

/// A player action waiting for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRequest {
    /// Jump key went down
    JumpStart,
    /// Jump key went up
    JumpStop,
    /// Start a new session after game over
    Restart,
}

/// Pending requests in arrival order
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    requests: Vec<InputRequest>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            requests: Vec::with_capacity(4),
        }
    }

    pub fn push(&mut self, request: InputRequest) {
        self.requests.push(request);
    }

    /// Take every pending request, oldest first
    pub fn drain(&mut self) -> Vec<InputRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}
