use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error, Result};
use csv::StringRecord;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::util::digit_vec;

pub type RetrosheetEventRecord = StringRecord;

pub type GameId = String;
pub type Inning = u8;
pub type Player = String;
pub type Batter = Player;
pub type Team = String;

pub trait FromRetrosheetRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self>
    where
        Self: Sized;

    fn error(msg: &str, record: &RetrosheetEventRecord) -> Error {
        anyhow!("{}\nRecord: {:?}", msg, record)
    }
}

/// Exact-match lookup of a short Retrosheet code. Codes within one table are unique,
/// so there is no precedence to worry about, and an unknown code is simply `None`.
pub trait Classify: FromStr {
    fn classify(code: &str) -> Option<Self> {
        Self::from_str(code).ok()
    }
}

#[derive(
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    EnumString,
    EnumIter,
    TryFromPrimitive,
    IntoPrimitive,
    Copy,
    Clone,
    Hash,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Position {
    #[strum(disabled)]
    Unknown = 0,
    #[strum(serialize = "1")]
    Pitcher,
    #[strum(serialize = "2", serialize = "C")]
    Catcher,
    #[strum(serialize = "3")]
    FirstBase,
    #[strum(serialize = "4")]
    SecondBase,
    #[strum(serialize = "5")]
    ThirdBase,
    #[strum(serialize = "6")]
    ShortStop,
    #[strum(serialize = "7")]
    LeftField,
    #[strum(serialize = "8")]
    CenterField,
    #[strum(serialize = "9")]
    RightField,
}

impl Position {
    /// Every digit is one fielder. Input is trusted, so a `0` becomes `Unknown`
    /// rather than being rejected.
    pub fn fielding_vec(int_str: &str) -> Vec<Self> {
        digit_vec(int_str)
            .into_iter()
            .map(|d| Self::try_from(d).unwrap_or(Self::Unknown))
            .collect()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Pitcher => "Pitcher",
            Self::Catcher => "Catcher",
            Self::FirstBase => "First Base",
            Self::SecondBase => "Second Base",
            Self::ThirdBase => "Third Base",
            Self::ShortStop => "Short Stop",
            Self::LeftField => "Left Field",
            Self::CenterField => "Center Field",
            Self::RightField => "Right Field",
        }
    }
}

impl Classify for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Eq, PartialEq, EnumString, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum InningHalf {
    #[strum(serialize = "0")]
    Top,
    #[strum(serialize = "1")]
    Bottom,
}

impl Classify for InningHalf {}

impl fmt::Display for InningHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        })
    }
}

#[derive(Debug, Eq, PartialEq, EnumString, Copy, Clone, Serialize, Deserialize)]
pub enum Hand {
    #[strum(serialize = "R", serialize = "r")]
    Right,
    #[strum(serialize = "L", serialize = "l")]
    Left,
    #[strum(serialize = "B", serialize = "b")]
    Both,
}

impl Classify for Hand {}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Both => "Both",
        })
    }
}

#[derive(Debug, Eq, PartialEq, EnumString, Copy, Clone, Serialize, Deserialize)]
pub enum League {
    #[strum(serialize = "A", serialize = "a")]
    American,
    #[strum(serialize = "N", serialize = "n")]
    National,
}

impl Classify for League {}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::American => "American",
            Self::National => "National",
        })
    }
}

/// The first field of every line in an event file.
#[derive(Debug, Eq, PartialEq, EnumString, Copy, Clone, Hash)]
pub enum RecordType {
    #[strum(serialize = "id")]
    GameId,
    #[strum(serialize = "version")]
    Version,
    #[strum(serialize = "info")]
    Info,
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "play")]
    Play,
    #[strum(serialize = "sub")]
    Substitution,
    #[strum(serialize = "data")]
    Data,
    #[strum(serialize = "com")]
    Comment,
    #[strum(serialize = "badj")]
    BatHandAdjustment,
    #[strum(serialize = "ladj")]
    LineupAdjustment,
    #[strum(serialize = "padj")]
    PitchHandAdjustment,
}

impl Classify for RecordType {}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GameId => "Game ID",
            Self::Version => "Version",
            Self::Info => "Info",
            Self::Start => "Start",
            Self::Play => "Play",
            Self::Substitution => "Substitution",
            Self::Data => "Data",
            Self::Comment => "Comment",
            Self::BatHandAdjustment => "Bat hand adjustment",
            Self::LineupAdjustment => "Lineup adjustment",
            Self::PitchHandAdjustment => "Pitch hand adjustment",
        })
    }
}

#[derive(Debug, Eq, PartialEq, EnumString, Copy, Clone, Hash)]
pub enum InfoType {
    #[strum(serialize = "visteam")]
    VisitingTeam,
    #[strum(serialize = "hometeam")]
    HomeTeam,
    #[strum(serialize = "date")]
    GameDate,
    #[strum(serialize = "site")]
    Site,
    #[strum(serialize = "number")]
    DoubleheaderNumber,
    #[strum(serialize = "daynight")]
    DayNight,
    #[strum(serialize = "usedh")]
    UseDh,
    #[strum(serialize = "attendance")]
    Attendance,
    #[strum(serialize = "inputprogvers")]
    InputProgramVersion,
}

impl Classify for InfoType {}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VisitingTeam => "Visiting team",
            Self::HomeTeam => "Home team",
            Self::GameDate => "Game date",
            Self::Site => "Site",
            Self::DoubleheaderNumber => "Doubleheader number",
            Self::DayNight => "Day/night",
            Self::UseDh => "Designated hitter",
            Self::Attendance => "Attendance",
            Self::InputProgramVersion => "Input program version",
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn positions_classify_from_digits_and_catcher_letter() {
        assert_eq!(Position::classify("6"), Some(Position::ShortStop));
        assert_eq!(Position::classify("C"), Some(Position::Catcher));
        assert_eq!(Position::classify("2"), Some(Position::Catcher));
        assert_eq!(Position::classify("0"), None);
        assert_eq!(Position::classify("Unknown"), None);
        assert_eq!(Position::classify("10"), None);
    }

    #[test]
    fn position_digits_match_discriminants() {
        for position in Position::iter().filter(|p| *p != Position::Unknown) {
            let digit: u8 = position.into();
            assert_eq!(Position::classify(&digit.to_string()), Some(position));
        }
    }

    #[test]
    fn fielding_vec_trusts_input() {
        assert_eq!(
            Position::fielding_vec("603"),
            vec![Position::ShortStop, Position::Unknown, Position::FirstBase]
        );
        assert_eq!(Position::ShortStop.to_string(), "Short Stop");
    }

    #[test]
    fn record_and_info_types() {
        assert_eq!(RecordType::classify("play"), Some(RecordType::Play));
        assert_eq!(RecordType::classify("com"), Some(RecordType::Comment));
        assert_eq!(RecordType::classify("PLAY"), None);
        assert_eq!(InfoType::classify("visteam"), Some(InfoType::VisitingTeam));
        assert_eq!(InfoType::classify("umphome"), None);
    }

    #[test]
    fn inning_half_hand_and_league() {
        assert_eq!(InningHalf::classify("1"), Some(InningHalf::Bottom));
        assert_eq!(InningHalf::classify("2"), None);
        assert_eq!(Hand::classify("b"), Some(Hand::Both));
        assert_eq!(Hand::classify("S"), None);
        assert_eq!(League::classify("N"), Some(League::National));
        assert_eq!(League::classify("F"), None);
        assert_eq!(League::American.to_string(), "American");
    }
}
