//! Latency statistics for benchmark iterations.
//!
//! Collects per-iteration wall-clock times and reports minimum, average,
//! maximum and a fixed-width histogram.

const BUCKETS: usize = 20;

/// Accumulates latency samples with constant memory.
///
/// Samples are in nanoseconds. The histogram has `BUCKETS` buckets of
/// `bucket_ns` each; the last bucket also collects everything beyond it.
pub struct LatencyStats {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    pub count: u64,
    pub bucket_ns: u64,
    pub buckets: [u64; BUCKETS],
}

impl LatencyStats {
    pub fn new(bucket_ns: u64) -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            bucket_ns: bucket_ns.max(1),
            buckets: [0; BUCKETS],
        }
    }

    /// Records one sample in nanoseconds.
    pub fn update(&mut self, nanos: u64) {
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
        self.sum = self.sum.saturating_add(nanos);
        self.count += 1;

        let idx = (nanos / self.bucket_ns).min(BUCKETS as u64 - 1) as usize;
        self.buckets[idx] += 1;
    }

    /// Average sample, or 0.0 when nothing was recorded.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    pub fn print_report(&self) {
        println!("Count: {}", self.count);
        if self.count == 0 {
            return;
        }

        println!("Min:   {}", format_nanos(self.min as f64));
        println!("Avg:   {}", format_nanos(self.avg()));
        println!("Max:   {}", format_nanos(self.max as f64));

        println!("Distribution ({} buckets):", format_nanos(self.bucket_ns as f64));
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let lower = i as u64 * self.bucket_ns;
                let upper = (i as u64 + 1) * self.bucket_ns;
                let open = if i == BUCKETS - 1 { "+" } else { "" };
                println!(
                    "[{} - {}{}]: {}",
                    format_nanos(lower as f64),
                    format_nanos(upper as f64),
                    open,
                    count
                );
            }
        }
    }
}

/// Picks ns, us or ms so the number stays readable.
pub fn format_nanos(nanos: f64) -> String {
    if nanos < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.2} us", nanos / 1_000.0)
    } else {
        format!("{:.2} ms", nanos / 1_000_000.0)
    }
}
