// Bounded wait-for-condition polling
use std::future::Future;
use tokio::time::{Duration, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    attempts: u32,
    interval: Duration,
    delay_first: bool,
}

impl PollPolicy {
    /// `attempts` probes separated by `interval`
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts,
            interval,
            delay_first: false,
        }
    }

    /// Also wait `interval` before the first probe
    pub fn delay_first(mut self) -> Self {
        self.delay_first = true;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `probe` (with the 1-based attempt number) until it yields a value
    /// or the attempts are used up.
    pub async fn until<T, F, Fut>(&self, mut probe: F) -> Option<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        for attempt in 1..=self.attempts {
            if self.delay_first || attempt > 1 {
                sleep(self.interval).await;
            }
            if let Some(value) = probe(attempt).await {
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_first_success() {
        let calls = Cell::new(0);
        let start = Instant::now();
        let found = PollPolicy::new(5, Duration::from_secs(1))
            .until(|attempt| {
                calls.set(calls.get() + 1);
                async move { (attempt == 3).then_some(attempt) }
            })
            .await;

        assert_eq!(found, Some(3));
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_is_bounded() {
        let calls = Cell::new(0);
        let start = Instant::now();
        let found: Option<()> = PollPolicy::new(5, Duration::from_secs(1))
            .delay_first()
            .until(|_| {
                calls.set(calls.get() + 1);
                async { None }
            })
            .await;

        assert_eq!(found, None);
        assert_eq!(calls.get(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_never_probes() {
        let calls = Cell::new(0);
        let found: Option<()> = PollPolicy::new(0, Duration::from_secs(1))
            .until(|_| {
                calls.set(calls.get() + 1);
                async { None }
            })
            .await;
        assert_eq!(found, None);
        assert_eq!(calls.get(), 0);
    }
}
