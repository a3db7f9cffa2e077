//! Check orchestration: capture the listing, scan it, emit metrics, and fold
//! the result into one of three check states.

use crate::config::CheckConfig;
use crate::emit::emit_rule;
use crate::listing::capture_listing;
use crate::scan::scan;
use std::io::Write;

/// Final state of one check invocation, in ascending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Metrics emitted (possibly zero of them).
    Ok,
    /// Configuration was incomplete; nothing was spawned or emitted.
    Warning,
    /// The listing command failed, or the metric sink broke.
    Critical,
}

impl CheckOutcome {
    /// Conventional check-framework exit code: OK=0, WARNING=1, CRITICAL=2.
    pub fn exit_code(self) -> u8 {
        match self {
            CheckOutcome::Ok => 0,
            CheckOutcome::Warning => 1,
            CheckOutcome::Critical => 2,
        }
    }
}

/// Run one complete check: validate config, capture the listing, emit two
/// metric lines per recognized rule to `out`.
///
/// Metric lines go to `out` (stdout in production); diagnostics go through
/// tracing, which the binary points at stderr.
pub async fn run_check<W: Write>(config: &CheckConfig, out: &mut W) -> CheckOutcome {
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "configuration incomplete, skipping check");
        return CheckOutcome::Warning;
    }

    let listing = match capture_listing(&config.bin, &config.ftype).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!(error = %e, "listing capture failed");
            return CheckOutcome::Critical;
        }
    };

    let mut rules = 0u32;
    for counters in scan(&listing) {
        if let Err(e) = emit_rule(out, &config.scheme, &counters) {
            tracing::error!(error = %e, "failed to write metric line");
            return CheckOutcome::Critical;
        }
        rules += 1;
    }

    tracing::debug!(rules, "check complete");
    CheckOutcome::Ok
}
