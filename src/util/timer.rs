//! Wall-clock measurements of rounds and runs.

use std::convert::TryFrom;
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

const MICROS_PER_MILLI: u128 = 1_000;

/// Starts on creation. `elapsed` can be read any number of times.
#[derive(Clone, Copy, Debug)]
pub struct GsTimer {
    started: Instant,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GsDuration(Duration);

impl GsTimer {
    pub fn now() -> Self {
        Self { started: Instant::now() }
    }

    pub fn elapsed(&self) -> GsDuration {
        self.started.elapsed().into()
    }
}

impl GsDuration {
    /// Milliseconds with microsecond precision, e.g. `7.106 ms`.
    pub fn to_millis_string(self) -> String {
        let micros = self.0.as_micros();
        format!("{}.{:03} ms", micros / MICROS_PER_MILLI, micros % MICROS_PER_MILLI)
    }

    /// Seconds with microsecond precision, e.g. `0.007106 s`.
    pub fn to_seconds_string(self) -> String {
        format!("{}.{:06} s", self.0.as_secs(), self.0.subsec_micros())
    }

    /// Mean duration of `count` equal parts. Zero parts average to zero.
    pub fn average(self, count: usize) -> GsDuration {
        match u32::try_from(count) {
            Ok(count) if count > 0 => GsDuration(self.0 / count),
            _ => GsDuration::default(),
        }
    }
}

impl From<Duration> for GsDuration {
    fn from(duration: Duration) -> Self {
        GsDuration(duration)
    }
}

impl fmt::Debug for GsDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl AddAssign for GsDuration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for GsDuration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(GsDuration::default(), |mut total, duration| {
            total += duration;
            total
        })
    }
}

#[cfg(test)]
mod tests {
    use super::GsDuration;
    use std::time::Duration;

    #[test]
    fn string_format() {
        let inputs = vec![
            (0, 7_106_780, "0.007106 s", "7.106 ms"),
            (152, 628_093_000, "152.628093 s", "152628.093 ms"),
        ];
        for (sec, nano, sec_str, milli_str) in inputs {
            let duration = GsDuration::from(Duration::new(sec, nano));
            assert_eq!(duration.to_seconds_string(), sec_str);
            assert_eq!(duration.to_millis_string(), milli_str);
        }
    }

    #[test]
    fn round_totals() {
        let rounds = vec![1500, 250, 50].into_iter().map(Duration::from_millis);
        let total = rounds.map(GsDuration::from).sum::<GsDuration>();
        assert_eq!(total.to_seconds_string(), "1.800000 s");
        assert_eq!(total.average(3).to_millis_string(), "600.000 ms");
        assert_eq!(total.average(0), GsDuration::default());
    }
}
