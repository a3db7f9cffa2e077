//! Graphite plaintext emission for extracted rule counters.

use crate::scan::RuleCounters;
use chrono::Utc;
use std::io::Write;

/// Format one metric line: `<scheme>.iptables.<family>.<index>.<label> <value> <ts>`.
fn format_metric(
    scheme: &str,
    family: &str,
    rule_index: u64,
    label: &str,
    value: u64,
    timestamp: i64,
) -> String {
    format!(
        "{}.iptables.{}.{}.{} {} {}",
        scheme, family, rule_index, label, value, timestamp
    )
}

/// Write the packets line then the bytes line for one rule to `out`.
///
/// Each line samples the clock at its own emission time, so the two lines of
/// one rule may carry timestamps one second apart.
pub fn emit_rule<W: Write>(
    out: &mut W,
    scheme: &str,
    counters: &RuleCounters,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        format_metric(
            scheme,
            "packets",
            counters.rule_index,
            &counters.label,
            counters.packets,
            Utc::now().timestamp(),
        )
    )?;
    writeln!(
        out,
        "{}",
        format_metric(
            scheme,
            "bytes",
            counters.rule_index,
            &counters.label,
            counters.bytes,
            Utc::now().timestamp(),
        )
    )?;
    Ok(())
}
