//! PSF time strings
//!
//! Lengths and fades are written as `[[h:]m:]s[.fff]`. A comma may stand in
//! for the decimal point, and only the first three fraction digits count.
//! A trailing separator with no digits is accepted.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, space0},
    combinator::{all_consuming, map_res, opt},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
    IResult,
};

fn number(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse::<u64>)(input)
}

fn fraction(input: &str) -> IResult<&str, &str> {
    preceded(alt((char('.'), char(','))), digit0)(input)
}

fn time_string(input: &str) -> IResult<&str, (Vec<u64>, Option<&str>)> {
    all_consuming(delimited(
        space0,
        pair(separated_list1(char(':'), number), opt(fraction)),
        space0,
    ))(input)
}

/// Parse a PSF time string into milliseconds.
///
/// Returns `None` for malformed input, more than three `:`-separated
/// fields, or a value that does not fit in `u32`.
pub fn parse_length_ms(input: &str) -> Option<u32> {
    let (_, (fields, fraction)) = time_string(input).ok()?;
    if fields.len() > 3 {
        return None;
    }

    let seconds = fields
        .iter()
        .try_fold(0u64, |acc, &field| acc.checked_mul(60)?.checked_add(field))?;

    let millis = fraction
        .map(|digits| {
            let significant = &digits[..digits.len().min(3)];
            let scale = 10u64.pow(3 - significant.len() as u32);
            significant.parse::<u64>().unwrap_or(0) * scale
        })
        .unwrap_or(0);

    let total = seconds.checked_mul(1000)?.checked_add(millis)?;
    u32::try_from(total).ok()
}
