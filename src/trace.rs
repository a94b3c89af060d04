use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Backward,
}
impl core::fmt::Display for Pass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Pass::Forward => write!(f, "forward"),
            Pass::Backward => write!(f, "backward"),
        }
    }
}

/// Timing of one layer of one pass
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTrace {
    pub pass: Pass,
    pub layer: usize,
    pub gates: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Tracer {
    /// Print every record to stderr
    verbose: bool,
    records: Vec<LayerTrace>,
}
impl Tracer {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            records: vec![],
        }
    }

    pub fn begin(&mut self) {
        self.records.clear();
    }

    pub fn record(&mut self, record: LayerTrace) {
        if self.verbose {
            eprintln!(
                "{} layer {}: {} gates; {}",
                record.pass,
                record.layer,
                record.gates,
                human_duration(record.elapsed)
            );
        }
        self.records.push(record);
    }

    /// Closes a pass; prints its total time when verbose.
    pub fn finish(&self, pass: Pass) {
        if self.verbose {
            eprintln!(
                "{pass}: {} layers; {}",
                self.records.len(),
                human_duration(self.total())
            );
        }
    }

    pub fn records(&self) -> &[LayerTrace] {
        &self.records
    }
    pub fn total(&self) -> Duration {
        self.records.iter().map(|r| r.elapsed).sum()
    }
}

pub fn human_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    let minutes = seconds / 60.;
    let milliseconds = seconds * 1_000.;
    let microseconds = milliseconds * 1_000.;
    let nanoseconds = microseconds * 1_000.;
    if 1. < minutes {
        return format!("{minutes:.2} min");
    }
    if 1. < seconds {
        return format!("{seconds:.2} s");
    }
    if 1. < milliseconds {
        return format!("{milliseconds:.2} ms");
    }
    if 1. < microseconds {
        return format!("{microseconds:.2} µs");
    }
    format!("{nanoseconds:.2} ns")
}
