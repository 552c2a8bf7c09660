//! Measurement row parsing.
//!
//! Instrument exports are whitespace-separated tables:
//!
//! ```text
//! Area	Feret	FeretX	FeretY	FeretAngle	MinFeret
//! 1	8914.940	128.412	226.768	248.444	117.031	85.135
//! 2	23.243	8.696	214.429	267.119	57.529	3.673
//! ```
//!
//! The header has no leading ordinal column, so data rows carry one more
//! token than the header. Only area and feret are kept; the remaining
//! columns are parsed to validate the row and then dropped.

use std::str::FromStr;

use crate::error::NephroError;
use crate::Result;

use super::geometry::GeometryInfo;

/// Substring that marks a header line.
pub const HEADER_MARKER: &str = "Area";

/// Number of leading tokens a measurement row must provide.
pub const REQUIRED_TOKENS: usize = 7;

/// One parsed measurement row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRow {
    /// Row ordinal from the first column
    pub ordinal: i64,
    pub geometry: GeometryInfo,
}

/// What a raw line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLine {
    Header,
    Measurement(MeasurementRow),
}

/// Check whether a line is a header line.
pub fn is_header_line(line: &str) -> bool {
    line.contains(HEADER_MARKER)
}

/// Parse a raw line into a header marker or a measurement.
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    if is_header_line(line) {
        return Ok(ParsedLine::Header);
    }
    parse_measurement(line).map(ParsedLine::Measurement)
}

/// Parse a measurement row: ordinal, area, feret, then four more numeric
/// columns. Anything after the seventh token is ignored.
pub fn parse_measurement(line: &str) -> Result<MeasurementRow> {
    let tokens: Vec<&str> = line.split_whitespace().take(REQUIRED_TOKENS).collect();

    if tokens.len() < REQUIRED_TOKENS {
        return Err(malformed(
            line,
            format!(
                "expected at least {} columns, found {}",
                REQUIRED_TOKENS,
                tokens.len()
            ),
        ));
    }

    let ordinal: i64 = parse_token(line, tokens[0], "ordinal")?;
    let area: f64 = parse_token(line, tokens[1], "area")?;
    let feret: f64 = parse_token(line, tokens[2], "feret")?;

    for (offset, token) in tokens[3..].iter().enumerate() {
        parse_token::<f64>(line, token, &format!("column {}", offset + 4))?;
    }

    Ok(MeasurementRow {
        ordinal,
        geometry: GeometryInfo::new(area, feret)?,
    })
}

fn parse_token<T: FromStr>(line: &str, token: &str, column: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| malformed(line, format!("{column} '{token}' is not a valid number")))
}

fn malformed(line: &str, reason: String) -> NephroError {
    NephroError::MalformedRow {
        line: line.to_string(),
        reason,
    }
}
