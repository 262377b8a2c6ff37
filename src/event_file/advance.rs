use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use tracing::trace;

/// A runner who is safe at the destination, with an optional uncertainty mark.
/// Runners thrown out (`X`) are not recorded.
const ADVANCE: &str = r"^(?P<from>[B123])-(?P<to>[123H])#?$";

lazy_static! {
    static ref ADVANCE_REGEX: Regex = Regex::new(ADVANCE).unwrap();
    static ref ADVANCE_DETAIL_REGEX: Regex = Regex::new(r"\(.+\)").unwrap();
}

#[derive(
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    EnumString,
    Copy,
    Clone,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Base {
    #[strum(serialize = "1")]
    First = 1,
    #[strum(serialize = "2")]
    Second,
    #[strum(serialize = "3")]
    Third,
    #[strum(serialize = "H")]
    Home,
}

#[derive(
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    EnumString,
    Copy,
    Clone,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum BaseRunner {
    #[strum(serialize = "B")]
    Batter = 0,
    #[strum(serialize = "1")]
    First,
    #[strum(serialize = "2")]
    Second,
    #[strum(serialize = "3")]
    Third,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct RunnerAdvance {
    pub baserunner: BaseRunner,
    pub to: Base,
}

impl RunnerAdvance {
    pub const fn new(baserunner: BaseRunner, to: Base) -> Self {
        Self { baserunner, to }
    }

    /// Batter is 0, runners are numbered by the base they started on.
    pub fn start_base(self) -> u8 {
        self.baserunner.into()
    }

    /// Home is 4.
    pub fn finish_base(self) -> u8 {
        self.to.into()
    }

    /// Decodes the `;`-separated runner tokens that follow the `.` of a play, keeping
    /// their order and any duplicates. Outs on the bases and anything malformed are dropped.
    pub fn parse_advances<'a, I>(tokens: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter_map(Self::parse_single_advance)
            .collect()
    }

    pub fn parse_single_advance(token: &str) -> Option<Self> {
        let stripped = ADVANCE_DETAIL_REGEX.replace_all(token, "");
        let advance = ADVANCE_REGEX
            .captures(&stripped)
            .and_then(|c| Self::from_captures(&c));
        if advance.is_none() {
            trace!("Dropping runner advance {:?}", token);
        }
        advance
    }

    fn from_captures(captures: &Captures) -> Option<Self> {
        let baserunner = BaseRunner::from_str(captures.name("from")?.as_str()).ok()?;
        let to = Base::from_str(captures.name("to")?.as_str()).ok()?;
        // A runner can only move forward
        (u8::from(to) > u8::from(baserunner)).then_some(Self { baserunner, to })
    }
}

impl fmt::Display for RunnerAdvance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_base(), self.finish_base())
    }
}
