//! Rule-line extraction from a firewall accounting listing.
//!
//! A verbose numeric listing (`-L -n -v -x`) prints packet and byte counters
//! as the first two columns of each rule line. Rules worth reporting carry a
//! trailing comment of the form `/* <index> <label> */`; everything else
//! (chain headers, policy lines, blank separators) is skipped.

use regex::Regex;
use std::sync::LazyLock;

/// Matches one accounting rule line: packet and byte counters up front,
/// rule index and label in the trailing comment. Lines missing the comment,
/// or with a label outside `[A-Za-z0-9_\- +]`, do not match.
static RULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(\d+)\s+(\d+).*?/\*\s+(\d+)\s+([A-Za-z0-9_\-\s+]+)\s+\*/").unwrap()
});

/// Counters extracted from a single rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCounters {
    /// Cumulative packet count (first column).
    pub packets: u64,
    /// Cumulative byte count (second column).
    pub bytes: u64,
    /// Rule number from the trailing comment.
    pub rule_index: u64,
    /// Label from the trailing comment, whitespace runs collapsed to `_`.
    pub label: String,
}

/// Scan a captured listing and yield counters for each recognized rule line,
/// in input order. Single forward pass; non-matching lines are skipped.
pub fn scan(listing: &str) -> impl Iterator<Item = RuleCounters> + '_ {
    listing.lines().filter_map(parse_line)
}

/// Parse one line of listing output.
///
/// Returns `None` for any line that does not have the full rule-line shape.
/// There is no error path here; a line either yields counters or is skipped.
pub fn parse_line(line: &str) -> Option<RuleCounters> {
    let caps = RULE_LINE.captures(line)?;

    // Digit runs too large for u64 skip the line like any other mismatch.
    let packets = caps[1].parse().ok()?;
    let bytes = caps[2].parse().ok()?;
    let rule_index = caps[3].parse().ok()?;

    Some(RuleCounters {
        packets,
        bytes,
        rule_index,
        label: normalize_label(&caps[4]),
    })
}

/// Collapse each run of whitespace in a rule label to a single underscore,
/// so the label can stand as one dotted-metric-name component.
fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_rule_line() {
        let line = "  12 3456 ACCEPT all -- * * 0.0.0.0/0 0.0.0.0/0 /* 3 ACCEPT_ALL */";
        let counters = parse_line(line).unwrap();
        assert_eq!(counters.packets, 12);
        assert_eq!(counters.bytes, 3456);
        assert_eq!(counters.rule_index, 3);
        assert_eq!(counters.label, "ACCEPT_ALL");
    }

    #[test]
    fn test_parse_label_with_space_is_joined() {
        let line = "10 200 DROP tcp -- eth0 * 10.0.0.0/8 0.0.0.0/0 /* 1 drop bad */";
        let counters = parse_line(line).unwrap();
        assert_eq!(counters.label, "drop_bad");
    }

    #[test]
    fn test_parse_label_whitespace_run_collapses() {
        let line = "10 200 DROP all -- * * 0.0.0.0/0 0.0.0.0/0 /* 1 drop   bad */";
        assert_eq!(parse_line(line).unwrap().label, "drop_bad");
    }

    #[test]
    fn test_parse_label_with_hyphen_and_plus() {
        let line = "7 89 ACCEPT udp -- * * 0.0.0.0/0 0.0.0.0/0 /* 2 drop-bad+worse */";
        assert_eq!(parse_line(line).unwrap().label, "drop-bad+worse");
    }

    #[test]
    fn test_parse_skips_label_with_punctuation() {
        // `.` is outside the label character set; the whole line is skipped.
        let line = "10 200 DROP all -- * * 0.0.0.0/0 0.0.0.0/0 /* 1 drop.bad */";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_parse_skips_chain_header() {
        assert!(parse_line("Chain INPUT (policy ACCEPT 1234 packets, 5678 bytes)").is_none());
    }

    #[test]
    fn test_parse_skips_column_header() {
        assert!(
            parse_line("    pkts      bytes target     prot opt in     out     source").is_none()
        );
    }

    #[test]
    fn test_parse_skips_rule_without_comment() {
        assert!(parse_line("  55 1024 ACCEPT all -- lo * 0.0.0.0/0 0.0.0.0/0").is_none());
    }

    #[test]
    fn test_parse_skips_empty_and_whitespace_lines() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   \t  ").is_none());
    }

    #[test]
    fn test_parse_skips_oversized_counter() {
        // 21 digits does not fit u64; skipped rather than erroring.
        let line = "999999999999999999999 1 ACCEPT all /* 1 huge */";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_parse_zero_counters() {
        let line = "0 0 DROP all -- * * 0.0.0.0/0 0.0.0.0/0 /* 4 unused-rule */";
        let counters = parse_line(line).unwrap();
        assert_eq!(counters.packets, 0);
        assert_eq!(counters.bytes, 0);
    }

    #[test]
    fn test_scan_empty_input_yields_nothing() {
        assert_eq!(scan("").count(), 0);
    }

    #[test]
    fn test_scan_preserves_input_order() {
        let listing = "\
Chain INPUT (policy ACCEPT 0 packets, 0 bytes)
    pkts      bytes target     prot opt in     out     source               destination
      10      200 ACCEPT     all  --  *      *       0.0.0.0/0            0.0.0.0/0            /* 1 first rule */
      20      400 DROP       all  --  *      *       0.0.0.0/0            0.0.0.0/0

Chain FORWARD (policy DROP 0 packets, 0 bytes)
      30      600 ACCEPT     all  --  *      *       0.0.0.0/0            0.0.0.0/0            /* 2 second */
";
        let rules: Vec<RuleCounters> = scan(listing).collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule_index, 1);
        assert_eq!(rules[0].label, "first_rule");
        assert_eq!(rules[1].rule_index, 2);
        assert_eq!(rules[1].label, "second");
    }

    #[test]
    fn test_scan_headers_only_yields_nothing() {
        let listing = "\
Chain INPUT (policy ACCEPT 1234 packets, 99999 bytes)
    pkts      bytes target     prot opt in     out     source               destination
";
        assert_eq!(scan(listing).count(), 0);
    }

    #[test]
    fn test_scan_mixed_matching_and_malformed() {
        let listing = "\
Chain INPUT (policy ACCEPT 0 packets, 0 bytes)
      10      200 ACCEPT     all  --  *      *       0.0.0.0/0            0.0.0.0/0            /* 1 drop-bad */
      15      300 ACCEPT     all  --  *      *       0.0.0.0/0            0.0.0.0/0            /* 2 bad.label */
";
        let rules: Vec<RuleCounters> = scan(listing).collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].packets, 10);
        assert_eq!(rules[0].bytes, 200);
        assert_eq!(rules[0].label, "drop-bad");
    }

    #[test]
    fn test_scan_duplicate_rule_index_not_deduplicated() {
        let listing = "\
1 2 ACCEPT all /* 5 one */
3 4 ACCEPT all /* 5 two */
";
        let rules: Vec<RuleCounters> = scan(listing).collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule_index, 5);
        assert_eq!(rules[1].rule_index, 5);
    }
}
