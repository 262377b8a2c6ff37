use std::path::Path;
use std::str::FromStr;

use num_traits::PrimInt;
use regex::Regex;

pub(crate) fn parse_positive_int<T: PrimInt + FromStr>(int_str: &str) -> Option<T> {
    int_str.parse::<T>().ok().filter(|i| !i.is_zero())
}

pub(crate) fn digit_vec(int_str: &str) -> Vec<u8> {
    int_str
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|u| u as u8)
        .collect()
}

/// The first run of consecutive ASCII digits in the string, or an empty string.
pub(crate) fn first_digit_run(value: &str) -> &str {
    let Some(start) = value.find(|c: char| c.is_ascii_digit()) else {
        return "";
    };
    let rest = &value[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// A pattern matches a token only if its leftmost match covers the whole token.
/// Patterns are expected to be anchored with `^`.
pub(crate) fn is_full_match(regex: &Regex, value: &str) -> bool {
    regex.find(value).is_some_and(|m| m.as_str() == value)
}

/// Seasons are encoded in Retrosheet file names, e.g. `2018ANA.EVA` or `TEAM2018`.
pub fn year_from_file_name(path: &Path) -> Option<u16> {
    let name = path.file_name()?.to_str()?;
    let digits: String = name.chars().filter(char::is_ascii_digit).collect();
    parse_positive_int::<u16>(&digits)
}
