/// A clock-free leading + trailing throttle.
///
/// The host drives time: [`Throttle::call`] reports whether a value may be handled right away,
/// and [`Throttle::poll`] releases the deferred trailing value once its deadline has passed.
/// Nothing is queued; a newer deferred value replaces the previous one, so the last value of a
/// burst is always the one that is eventually released.
///
/// Two releases are never closer than `interval_ms` apart (unless [`Throttle::flush`] is used).
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    value: T,
    due_ms: u64,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
            pending: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    /// Offers a value at `now_ms`.
    ///
    /// Returns `Some(value)` when at least `interval_ms` has elapsed since the last release (the
    /// caller should handle it now). Otherwise the value is parked until the remaining delay
    /// runs out, replacing whatever was parked before, and `None` is returned.
    pub fn call(&mut self, value: T, now_ms: u64) -> Option<T> {
        match self.last_fired_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                let due_ms = last.saturating_add(self.interval_ms);
                if self.pending.is_some() {
                    vtrace!(now_ms, "Throttle::call superseding parked value");
                }
                self.pending = Some(Pending { value, due_ms });
                vtrace!(now_ms, due_ms, "Throttle::call deferred");
                None
            }
            _ => {
                self.pending = None;
                self.last_fired_ms = Some(now_ms);
                Some(value)
            }
        }
    }

    /// Releases the parked value if its deadline is at or before `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let due_ms = self.pending.as_ref()?.due_ms;
        if now_ms < due_ms {
            return None;
        }
        let pending = self.pending.take()?;
        self.last_fired_ms = Some(now_ms);
        Some(pending.value)
    }

    /// When the parked value becomes due, if any. Hosts can arm a timer for this instant.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the parked value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Releases the parked value immediately, ignoring its deadline.
    pub fn flush(&mut self, now_ms: u64) -> Option<T> {
        let pending = self.pending.take()?;
        self.last_fired_ms = Some(now_ms);
        Some(pending.value)
    }
}
