use std::{
    collections::HashSet,
    fmt::{self, Display},
};

use crate::types::{CheckResult, Status};

/// Tally of one document's check outcomes
#[derive(Debug, Default)]
pub struct ResponseStats {
    total: usize,
    successful: usize,
    failed: HashSet<String>,
    timeouts: HashSet<String>,
    exhausted: HashSet<String>,
}

impl ResponseStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn tally(result: &CheckResult) -> Self {
        let mut stats = Self::new();
        for (target, status) in result {
            stats.add(target, status);
        }
        stats
    }

    pub fn add(&mut self, target: &str, status: &Status) {
        self.total += 1;
        match status {
            Status::Ok(_) => self.successful += 1,
            Status::Failed(_) | Status::Error(_) => {
                self.failed.insert(target.to_string());
            }
            Status::Timeout => {
                self.timeouts.insert(target.to_string());
            }
            Status::RetriesExhausted => {
                self.exhausted.insert(target.to_string());
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.total == self.successful
    }

    /// One-line overview: reachable links, dead links, everything else
    pub fn overview(&self) -> String {
        format!(
            "ok[{}] - bad[{}] - other[{}]",
            self.successful,
            self.failed.len(),
            self.timeouts.len() + self.exhausted.len()
        )
    }
}

impl Display for ResponseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📝 Summary")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "🔍 Total: {}", self.total)?;
        writeln!(f, "✅ Successful: {}", self.successful)?;
        writeln!(f, "⌛ Timeouts: {}", self.timeouts.len())?;
        writeln!(f, "🐌 Throttled out: {}", self.exhausted.len())?;
        writeln!(f, "🚫 Failed: {}", self.failed.len())
    }
}
