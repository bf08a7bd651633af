use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Ceiling used when `max_delay` is not a usable finite bound.
const MAX_SLEEP_SECS: f64 = 86_400.0;

/// Multiplicative delay sequence with jitter on both the multiplier and the result.
///
/// Each step draws `m' = multiplier * U(0.9, 1.1)`, sets
/// `delay = min(delay * m', max_delay)` and then adds `U(0, 0.1 * delay)`.
/// The jittered value seeds the next step.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: f64,
    multiplier: f64,
    max_delay: f64,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            current: config.initial_delay,
            multiplier: config.multiplier,
            max_delay: config.max_delay,
        }
    }

    #[cfg(test)]
    fn current(&self) -> f64 {
        self.current
    }

    pub fn next_delay(&mut self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    pub fn next_delay_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Duration {
        let ceiling = if self.max_delay.is_finite() && self.max_delay > 0.0 {
            self.max_delay
        } else {
            MAX_SLEEP_SECS
        };

        let multiplier = self.multiplier * rng.gen_range(0.9..=1.1);
        // f64::min drops NaN, so an overflowed or NaN product lands on the ceiling
        let mut delay = (self.current * multiplier).min(ceiling).max(0.0);
        delay += rng.gen_range(0.0..=0.1 * delay);

        self.current = delay;
        Duration::try_from_secs_f64(delay).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(initial_delay: f64, multiplier: f64, max_delay: f64) -> RetryConfig {
        RetryConfig {
            initial_delay,
            multiplier,
            max_delay,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_delay_range() {
        let cfg = config(1.0, 1.5, 60.0);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let delay = Backoff::new(&cfg).next_delay_with(&mut rng).as_secs_f64();
            // 1.0 * 1.5 * [0.9, 1.1], plus up to 10%
            assert!(delay >= 1.35 - 1e-9, "delay {} too small", delay);
            assert!(delay <= 1.65 * 1.1 + 1e-9, "delay {} too large", delay);
        }
    }

    #[test]
    fn test_delay_grows_from_previous() {
        let cfg = config(0.5, 2.0, 1_000.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut backoff = Backoff::new(&cfg);

        for _ in 0..6 {
            let prior = backoff.current();
            let delay = backoff.next_delay_with(&mut rng).as_secs_f64();
            assert!(delay >= prior * cfg.multiplier * 0.9 - 1e-9);
            assert!(delay <= prior * cfg.multiplier * 1.1 * 1.1 + 1e-9);
        }
    }

    #[test]
    fn test_delay_bounded_by_max() {
        let cfg = config(1.0, 3.0, 5.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut backoff = Backoff::new(&cfg);
            for _ in 0..20 {
                let delay = backoff.next_delay_with(&mut rng).as_secs_f64();
                assert!(delay <= cfg.max_delay * 1.21);
            }
            // Once clamped, only the additive jitter remains
            assert!(backoff.current() >= cfg.max_delay - 1e-9);
            assert!(backoff.current() <= cfg.max_delay * 1.1 + 1e-9);
        }
    }

    #[test]
    fn test_unbounded_config_saturates() {
        let cfg = config(1e308, 10.0, f64::INFINITY);
        let mut rng = StdRng::seed_from_u64(3);
        let mut backoff = Backoff::new(&cfg);

        for _ in 0..3 {
            let delay = backoff.next_delay_with(&mut rng).as_secs_f64();
            assert!(delay >= MAX_SLEEP_SECS - 1e-9, "delay {}", delay);
            assert!(delay <= MAX_SLEEP_SECS * 1.1 + 1e-9, "delay {}", delay);
        }

        let cfg = config(f64::NAN, 1.5, f64::NAN);
        let delay = Backoff::new(&cfg).next_delay_with(&mut rng);
        assert!(delay.as_secs_f64() >= MAX_SLEEP_SECS - 1e-9);
    }

    #[test]
    fn test_huge_finite_delay_does_not_collapse_to_zero() {
        let cfg = config(1e300, 2.0, 1e300);
        let delay = Backoff::new(&cfg).next_delay_with(&mut StdRng::seed_from_u64(1));
        assert_eq!(delay, Duration::MAX);
    }

    #[test]
    fn test_thread_rng_path() {
        let cfg = config(1.0, 1.5, 60.0);
        let mut backoff = Backoff::new(&cfg);
        let first = backoff.next_delay();
        let second = backoff.next_delay();
        assert!(first > Duration::ZERO);
        assert!(second.as_secs_f64() >= first.as_secs_f64() * 1.5 * 0.9 - 1e-9);
    }
}
