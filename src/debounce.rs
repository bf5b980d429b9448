/// Holds the latest scheduled value and releases it once no newer value has
/// arrived for a full window. Times are milliseconds on a caller-supplied clock.
#[derive(Debug)]
pub struct CoalescingTimer<T> {
    window_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> CoalescingTimer<T> {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, pending: None }
    }

    /// Replaces any pending value and restarts the window.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms.saturating_add(self.window_ms)));
    }

    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn time_until_ready(&self, now_ms: u64) -> Option<u64> {
        self.pending.as_ref().map(|(_, deadline)| deadline.saturating_sub(now_ms))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
