//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use rand::Rng;

/// Default remote API, used only with `--source remote`.
pub const DEFAULT_BASE_URL: &str = "https://api.dailytalk.jp";

/// Where quiz content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// Bundled datasets served through the mock gateway.
    #[default]
    Fixture,
    /// A real HTTP API exposing the same paths.
    Remote,
}

/// Artificial delay window of the mock gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// A uniformly random delay inside the window.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min..=max))
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(300, 800)
    }
}

/// Fixed feedback holds during which quiz input is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Celebration pause after a correct choice, before advancing.
    pub correct_hold: Duration,
    /// Pause after a wrong choice, before the question is re-presented.
    pub incorrect_hold: Duration,
    /// "Thinking" pause before a sentence answer is graded.
    pub grading: Duration,
}

impl Timings {
    /// Zero-length holds, for tests and scripted sessions.
    pub fn instant() -> Self {
        Self {
            correct_hold: Duration::ZERO,
            incorrect_hold: Duration::ZERO,
            grading: Duration::ZERO,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            correct_hold: Duration::from_millis(1200),
            incorrect_hold: Duration::from_millis(1000),
            grading: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceKind,
    pub base_url: String,
    /// Directory whose JSON files replace the bundled datasets.
    pub data_dir: Option<PathBuf>,
    pub latency: Latency,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            latency: Latency::default(),
            timings: Timings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_latency_orders_bounds() {
        let latency = Latency::from_millis(800, 300);
        assert_eq!(latency.min(), Duration::from_millis(300));
        assert_eq!(latency.max(), Duration::from_millis(800));
    }

    #[test]
    fn test_latency_sample_stays_in_window() {
        let latency = Latency::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let delay = latency.sample(&mut rng);
            assert!(delay >= latency.min() && delay <= latency.max());
        }
        assert_eq!(Latency::none().sample(&mut rng), Duration::ZERO);
    }
}
