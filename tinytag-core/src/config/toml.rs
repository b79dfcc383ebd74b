//! Minimal TOML parser for the tag configuration
//!
//! Handles only the subset the tag needs, without allocation:
//!
//! - `[section]` headers
//! - `key = integer` pairs (decimal, `_` separators allowed)
//! - Comments (`# ...`), including trailing comments
//!
//! Unknown sections and keys are errors so typos do not silently fall
//! back to defaults.

use super::types::TagConfig;

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: u16,
    pub kind: ParseErrorKind,
}

/// Parse error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed or unknown section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Key not known in the current section
    UnknownKey,
    /// Value is not a decimal integer
    InvalidValue,
    /// Value does not fit the field
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motion,
    Sampler,
    Advertising,
    Link,
    Intervals,
}

/// Parse TOML configuration into a [`TagConfig`]
///
/// Starts from defaults; the result is not validated.
pub fn parse_config(input: &str) -> Result<TagConfig, ParseError> {
    let mut config = TagConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let err = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(err(ParseErrorKind::InvalidSection));
            }
            section = parse_section_header(line[1..line.len() - 1].trim())
                .ok_or(err(ParseErrorKind::InvalidSection))?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(err(ParseErrorKind::InvalidLine))?;
        let key = key.trim();
        let value = parse_integer(value.trim()).ok_or(err(ParseErrorKind::InvalidValue))?;

        apply(&mut config, section, key, value).map_err(err)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(name: &str) -> Option<Section> {
    match name {
        "motion" => Some(Section::Motion),
        "sampler" => Some(Section::Sampler),
        "advertising" => Some(Section::Advertising),
        "link" => Some(Section::Link),
        "intervals" => Some(Section::Intervals),
        _ => None,
    }
}

fn parse_integer(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10)?;
        value = value.checked_mul(10)?.checked_add(digit as u64)?;
    }
    Some(value)
}

fn apply(config: &mut TagConfig, section: Section, key: &str, value: u64) -> Result<(), ParseErrorKind> {
    match (section, key) {
        (Section::Motion, "threshold") => config.motion.threshold = narrow(value)?,
        (Section::Motion, "start_samples") => config.motion.start_samples = narrow(value)?,
        (Section::Motion, "stop_samples") => config.motion.stop_samples = narrow(value)?,
        (Section::Motion, "baseline_shift") => config.motion.baseline_shift = narrow(value)?,
        (Section::Sampler, "failure_limit") => config.sampler.failure_limit = narrow(value)?,
        (Section::Advertising, "idle_timeout_ms") => {
            config.advertising.idle_timeout_ms = narrow(value)?
        }
        (Section::Link, "retries") => config.link.retries = narrow(value)?,
        (Section::Intervals, "idle_ms") => config.intervals.idle_ms = narrow(value)?,
        (Section::Intervals, "advertising_ms") => config.intervals.advertising_ms = narrow(value)?,
        (Section::Intervals, "connecting_ms") => config.intervals.connecting_ms = narrow(value)?,
        (Section::Intervals, "connected_ms") => config.intervals.connected_ms = narrow(value)?,
        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

fn narrow<T: TryFrom<u64>>(value: u64) -> Result<T, ParseErrorKind> {
    T::try_from(value).map_err(|_| ParseErrorKind::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let input = r#"
            # comment
            [motion]
            threshold = 40   # trailing comment
            start_samples = 2
            stop_samples = 20

            [advertising]
            idle_timeout_ms = 60_000

            [intervals]
            connected_ms = 50
        "#;

        let config = parse_config(input).unwrap();
        assert_eq!(config.motion.threshold, 40);
        assert_eq!(config.motion.start_samples, 2);
        assert_eq!(config.motion.stop_samples, 20);
        assert_eq!(config.advertising.idle_timeout_ms, 60_000);
        assert_eq!(config.intervals.connected_ms, 50);
        // Untouched keys keep defaults
        assert_eq!(config.sampler.failure_limit, 5);
        assert_eq!(config.intervals.idle_ms, 500);
    }

    #[test]
    fn test_unknown_section() {
        let err = parse_config("[motion]\nthreshold = 1\n[radio]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 3,
                kind: ParseErrorKind::InvalidSection
            }
        );
    }

    #[test]
    fn test_key_outside_section() {
        let err = parse_config("threshold = 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownKey);
    }

    #[test]
    fn test_out_of_range() {
        let err = parse_config("[motion]\nstart_samples = 300").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::OutOfRange);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_invalid_value() {
        let err = parse_config("[link]\nretries = \"one\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[link]\nretries = -1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_config("[link]\nretries").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLine);
    }
}
