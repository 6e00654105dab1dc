use crate::types::SkipReason;

/// What a benchmarked executable printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// Elapsed seconds, the first whitespace-delimited token.
    pub seconds: f64,
    /// Optional computed result that follows the time (π for the reference workload).
    pub value: Option<f64>,
}

/// Parse an executable's stdout into a `Report`.
///
/// Only the first token is required. It must be a finite, non-negative
/// float. A second token is kept when it parses as a float and ignored
/// otherwise. Anything after that is ignored.
pub fn parse_report(stdout: &str) -> Result<Report, SkipReason> {
    let mut tokens = stdout.split_whitespace();
    let first = tokens.next().ok_or(SkipReason::EmptyOutput)?;

    let seconds = match first.parse::<f64>() {
        Ok(s) if s.is_finite() && s >= 0.0 => s,
        _ => return Err(SkipReason::Unparseable(first.to_string())),
    };

    let value = tokens.next().and_then(|t| t.parse::<f64>().ok());

    Ok(Report { seconds, value })
}

/// Parse just the elapsed time, or `None` if the point should be dropped.
pub fn parse_elapsed(stdout: &str) -> Option<f64> {
    parse_report(stdout).ok().map(|r| r.seconds)
}
