use std::time::Duration;

/// Bounded retry with a linearly increasing pause between attempts. The
/// delay is a pure function of the attempt number; the sleeper is
/// injected so tests never actually sleep.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff grows linearly with the attempt number.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` up to `max_attempts` times, sleeping between failures.
    /// The last error is returned when every attempt fails. An attempt
    /// either completes or is abandoned wholesale; there is no mid-attempt
    /// cancellation.
    pub fn run<T, E, F, S>(&self, mut op: F, mut sleep: S) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        S: FnMut(Duration),
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= attempts {
                        return Err(err);
                    }
                    sleep(self.delay_for(attempt));
                    attempt += 1;
                }
            }
        }
    }
}
