use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::trace;

use crate::event_file::traits::Classify;
use crate::util::is_full_match;

/// Trailing location of a trajectory code, e.g. `G5` or `F78XD`.
const LOCATION: &str = r"(?:[0-9]|$)[0-9A-Z+\-]*";

/// Ordered from most to least specific: multi-letter codes (longest first), then codes
/// that take an optional numeric suffix, then single-letter trajectories with a location.
/// As with basic plays, a rule only applies when it covers the whole token.
const MODIFIER_RULES: [(&str, PlayModifier); 45] = [
    ("^BGDP", PlayModifier::GroundBallDoublePlayBunt),
    ("^BPDP", PlayModifier::PopupDoublePlayBunt),
    ("^BINT", PlayModifier::BatterInterference),
    ("^BOOT", PlayModifier::BattingOutOfTurn),
    ("^COUB", PlayModifier::CourtesyBatter),
    ("^COUF", PlayModifier::CourtesyFielder),
    ("^COUR", PlayModifier::CourtesyRunner),
    ("^FINT", PlayModifier::FanInterference),
    ("^IPHR", PlayModifier::InsideTheParkHomeRun),
    ("^MREV", PlayModifier::ManagerChallenge),
    ("^PASS", PlayModifier::PassedRunner),
    ("^RINT", PlayModifier::RunnerInterference),
    ("^UINT", PlayModifier::UmpireInterference),
    ("^UREV", PlayModifier::UmpireReviewCallOnField),
    ("^FDP", PlayModifier::FlyBallDoublePlay),
    ("^GDP", PlayModifier::GroundBallDoublePlay),
    ("^GTP", PlayModifier::GroundBallTriplePlay),
    ("^LDP", PlayModifier::LinedIntoDoublePlay),
    ("^LTP", PlayModifier::LinedIntoTriplePlay),
    ("^NDP", PlayModifier::NoDoublePlay),
    ("^OBS", PlayModifier::Obstruction),
    ("^INT", PlayModifier::Interference),
    ("^AP", PlayModifier::AppealPlay),
    ("^BR", PlayModifier::RunnerHitByBattedBall),
    ("^DP", PlayModifier::UnspecifiedDoublePlay),
    ("^FL", PlayModifier::FoulBall),
    ("^FO", PlayModifier::ForceOut),
    ("^IF", PlayModifier::InfieldFlyRule),
    ("^SF", PlayModifier::SacrificeFly),
    ("^SH", PlayModifier::SacrificeBunt),
    ("^TP", PlayModifier::UnspecifiedTriplePlay),
    ("^TH[0-9H]?", PlayModifier::Throwing),
    ("^E[0-9]?", PlayModifier::ErrorOn),
    ("^R[0-9]*", PlayModifier::RelayThrow),
    ("^C", PlayModifier::CalledThirdStrike),
    ("^BP", PlayModifier::PopupBunt),
    ("^BG", PlayModifier::GroundBallBunt),
    ("^BL", PlayModifier::LinedDriveBunt),
    ("^BF", PlayModifier::FoulBunt),
    ("^B", PlayModifier::Bunt),
    ("^F", PlayModifier::FlyBall),
    ("^G", PlayModifier::GroundBall),
    ("^L", PlayModifier::LinedDrive),
    ("^P", PlayModifier::Popup),
    ("^U", PlayModifier::Unassisted),
];

lazy_static! {
    static ref MODIFIER_REGEXES: Vec<(Regex, PlayModifier)> = MODIFIER_RULES
        .iter()
        .map(|(pattern, modifier)| {
            let pattern = if modifier.takes_location() {
                format!("{pattern}{LOCATION}")
            } else {
                (*pattern).to_string()
            };
            (Regex::new(&pattern).unwrap(), *modifier)
        })
        .collect();
    static ref HIT_LOCATION_REGEX: Regex = Regex::new(r"[0-9].*").unwrap();
    static ref HIT_LOCATION_PARTS_REGEX: Regex =
        Regex::new(r"^(?P<zone>[0-9]+)(?P<qualifiers>.*)$").unwrap();
    static ref LOCATION_QUALIFIER_REGEX: Regex = Regex::new("XD|.").unwrap();
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Display, Serialize, Deserialize)]
pub enum PlayModifier {
    #[strum(to_string = "Fly ball")]
    FlyBall,
    #[strum(to_string = "Line drive")]
    LinedDrive,
    #[strum(to_string = "Error")]
    ErrorOn,
    #[strum(to_string = "Throwing")]
    Throwing,
    #[strum(to_string = "Sacrifice fly")]
    SacrificeFly,
    #[strum(to_string = "Sacrifice bunt")]
    SacrificeBunt,
    #[strum(to_string = "Unassisted")]
    Unassisted,
    #[strum(to_string = "Ground ball")]
    GroundBall,
    #[strum(to_string = "Ground ball bunt")]
    GroundBallBunt,
    #[strum(to_string = "Ground ball double play")]
    GroundBallDoublePlay,
    #[strum(to_string = "Lined into double play")]
    LinedIntoDoublePlay,
    #[strum(to_string = "Lined into triple play")]
    LinedIntoTriplePlay,
    #[strum(to_string = "Popup")]
    Popup,
    #[strum(to_string = "Ground ball double play bunt")]
    GroundBallDoublePlayBunt,
    #[strum(to_string = "Umpire review call on field")]
    UmpireReviewCallOnField,
    #[strum(to_string = "Umpire interference")]
    UmpireInterference,
    #[strum(to_string = "Unspecified triple play")]
    UnspecifiedTriplePlay,
    #[strum(to_string = "Relay throw")]
    RelayThrow,
    #[strum(to_string = "Runner passed another runner")]
    PassedRunner,
    #[strum(to_string = "Obstruction")]
    Obstruction,
    #[strum(to_string = "No double play")]
    NoDoublePlay,
    #[strum(to_string = "Manager challenge")]
    ManagerChallenge,
    #[strum(to_string = "Inside the park homerun")]
    InsideTheParkHomeRun,
    #[strum(to_string = "Interference")]
    Interference,
    #[strum(to_string = "Infield fly rule")]
    InfieldFlyRule,
    #[strum(to_string = "Ground ball triple play")]
    GroundBallTriplePlay,
    #[strum(to_string = "Foul ball")]
    FoulBall,
    #[strum(to_string = "Fan interference")]
    FanInterference,
    #[strum(to_string = "Fly ball double play")]
    FlyBallDoublePlay,
    #[strum(to_string = "Unspecified double play")]
    UnspecifiedDoublePlay,
    #[strum(to_string = "Courtesy batter")]
    CourtesyBatter,
    #[strum(to_string = "Courtesy fielder")]
    CourtesyFielder,
    #[strum(to_string = "Courtesy runner")]
    CourtesyRunner,
    #[strum(to_string = "Called third strike")]
    CalledThirdStrike,
    #[strum(to_string = "Runner hit by batted ball")]
    RunnerHitByBattedBall,
    #[strum(to_string = "Popup double play bunt")]
    PopupDoublePlayBunt,
    #[strum(to_string = "Batting out of turn")]
    BattingOutOfTurn,
    #[strum(to_string = "Lined drive bunt")]
    LinedDriveBunt,
    #[strum(to_string = "Batter interference")]
    BatterInterference,
    #[strum(to_string = "Appeal play")]
    AppealPlay,
    #[strum(to_string = "Popup bunt")]
    PopupBunt,
    #[strum(to_string = "Forced out")]
    ForceOut,
    #[strum(to_string = "Bunt")]
    Bunt,
    #[strum(to_string = "Foul bunt")]
    FoulBunt,
    #[strum(to_string = "Runner interference")]
    RunnerInterference,
}

impl PlayModifier {
    /// Trajectory codes may be followed by where the ball went.
    pub const fn takes_location(self) -> bool {
        matches!(
            self,
            Self::PopupBunt
                | Self::GroundBallBunt
                | Self::LinedDriveBunt
                | Self::FoulBunt
                | Self::Bunt
                | Self::FlyBall
                | Self::GroundBall
                | Self::LinedDrive
                | Self::Popup
                | Self::Unassisted
        )
    }
}

/// Free-form location text, starting at the first digit of a modifier token.
#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitLocation(String);

impl HitLocation {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Structured reading of the location. `None` when the leading digits are not one of
    /// the standard field zones. Qualifiers may come in any order; the first of each kind
    /// counts and anything unknown is ignored.
    pub fn detail(&self) -> Option<HitLocationDetail> {
        let captures = HIT_LOCATION_PARTS_REGEX.captures(&self.0)?;
        let mut detail = HitLocationDetail {
            general_location: HitLocationGeneral::classify(&captures["zone"])?,
            depth: None,
            angle: None,
            strength: None,
        };
        for code in LOCATION_QUALIFIER_REGEX.find_iter(&captures["qualifiers"]) {
            let code = code.as_str();
            detail.depth = detail.depth.or_else(|| HitDepth::classify(code));
            detail.angle = detail.angle.or_else(|| HitAngle::classify(code));
            detail.strength = detail.strength.or_else(|| HitStrength::classify(code));
        }
        Some(detail)
    }
}

impl From<&str> for HitLocation {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub modifier: PlayModifier,
    pub location: Option<HitLocation>,
}

impl Modifier {
    pub const fn new(modifier: PlayModifier) -> Self {
        Self {
            modifier,
            location: None,
        }
    }

    pub fn with_location(modifier: PlayModifier, location: &str) -> Self {
        Self {
            modifier,
            location: Some(HitLocation::from(location)),
        }
    }

    /// Decodes the `/`-separated tokens that follow a basic play. Tokens that match no
    /// known modifier are skipped rather than treated as errors.
    pub fn parse_modifiers<'a, I>(tokens: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter_map(Self::parse_single_modifier)
            .collect()
    }

    pub fn parse_single_modifier(token: &str) -> Option<Self> {
        let Some(modifier) = MODIFIER_REGEXES
            .iter()
            .find(|(regex, _)| is_full_match(regex, token))
            .map(|(_, modifier)| *modifier)
        else {
            trace!("Skipping unrecognized modifier {:?}", token);
            return None;
        };
        let location = HIT_LOCATION_REGEX
            .find(token)
            .map(|m| HitLocation::from(m.as_str()));
        Some(Self { modifier, location })
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}, {}", self.modifier, location),
            None => write!(f, "{}", self.modifier),
        }
    }
}

/// Field zone a location starts with: a fielder's position, or two adjacent ones.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, EnumString, Serialize, Deserialize)]
pub enum HitLocationGeneral {
    #[strum(serialize = "1")]
    Pitcher,
    #[strum(serialize = "13")]
    PitcherFirst,
    #[strum(serialize = "15")]
    PitcherThird,
    #[strum(serialize = "2")]
    Catcher,
    #[strum(serialize = "23")]
    CatcherFirst,
    #[strum(serialize = "25")]
    CatcherThird,
    #[strum(serialize = "3")]
    First,
    #[strum(serialize = "34")]
    FirstSecond,
    #[strum(serialize = "4")]
    Second,
    #[strum(serialize = "46")]
    SecondShortstop,
    #[strum(serialize = "5")]
    Third,
    #[strum(serialize = "56")]
    ThirdShortstop,
    #[strum(serialize = "6")]
    Shortstop,
    #[strum(serialize = "7")]
    Left,
    #[strum(serialize = "78")]
    LeftCenter,
    #[strum(serialize = "8")]
    Center,
    #[strum(serialize = "89")]
    RightCenter,
    #[strum(serialize = "9")]
    Right,
}

impl Classify for HitLocationGeneral {}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, EnumString, Serialize, Deserialize)]
pub enum HitDepth {
    #[strum(serialize = "S")]
    Shallow,
    #[strum(serialize = "D")]
    Deep,
    #[strum(serialize = "XD")]
    ExtraDeep,
}

impl Classify for HitDepth {}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, EnumString, Serialize, Deserialize)]
pub enum HitAngle {
    #[strum(serialize = "F")]
    Foul,
    #[strum(serialize = "M")]
    Middle,
    #[strum(serialize = "L")]
    FoulLine,
}

impl Classify for HitAngle {}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, EnumString, Serialize, Deserialize)]
pub enum HitStrength {
    #[strum(serialize = "+")]
    Hard,
    #[strum(serialize = "-")]
    Soft,
}

impl Classify for HitStrength {}

/// A location split into its zone and the qualifiers after it, e.g. `78XD` is
/// left-center, extra deep.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct HitLocationDetail {
    pub general_location: HitLocationGeneral,
    pub depth: Option<HitDepth>,
    pub angle: Option<HitAngle>,
    pub strength: Option<HitStrength>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(token: &str) -> Option<Modifier> {
        Modifier::parse_single_modifier(token)
    }

    #[test]
    fn trajectories_carry_locations() {
        assert_eq!(parse("L9LS"), Some(Modifier::with_location(PlayModifier::LinedDrive, "9LS")));
        assert_eq!(parse("F78XD"), Some(Modifier::with_location(PlayModifier::FlyBall, "78XD")));
        assert_eq!(parse("P5F"), Some(Modifier::with_location(PlayModifier::Popup, "5F")));
        assert_eq!(parse("G6M"), Some(Modifier::with_location(PlayModifier::GroundBall, "6M")));
        assert_eq!(
            parse("BG15"),
            Some(Modifier::with_location(PlayModifier::GroundBallBunt, "15"))
        );
        assert_eq!(parse("G"), Some(Modifier::new(PlayModifier::GroundBall)));
        assert_eq!(parse("L7L+"), Some(Modifier::with_location(PlayModifier::LinedDrive, "7L+")));
    }

    #[test]
    fn literal_codes_win_over_trajectory_prefixes() {
        let cases = [
            ("GDP", PlayModifier::GroundBallDoublePlay),
            ("GTP", PlayModifier::GroundBallTriplePlay),
            ("LDP", PlayModifier::LinedIntoDoublePlay),
            ("LTP", PlayModifier::LinedIntoTriplePlay),
            ("BGDP", PlayModifier::GroundBallDoublePlayBunt),
            ("BPDP", PlayModifier::PopupDoublePlayBunt),
            ("BP", PlayModifier::PopupBunt),
            ("BR", PlayModifier::RunnerHitByBattedBall),
            ("FL", PlayModifier::FoulBall),
            ("FO", PlayModifier::ForceOut),
            ("FDP", PlayModifier::FlyBallDoublePlay),
            ("FINT", PlayModifier::FanInterference),
            ("COUB", PlayModifier::CourtesyBatter),
            ("C", PlayModifier::CalledThirdStrike),
            ("PASS", PlayModifier::PassedRunner),
            ("RINT", PlayModifier::RunnerInterference),
            ("UREV", PlayModifier::UmpireReviewCallOnField),
        ];
        for (token, expected) in cases {
            assert_eq!(parse(token).map(|m| m.modifier), Some(expected), "{token}");
        }
    }

    #[test]
    fn every_modifier_token_matches_one_rule() {
        for token in [
            "GDP", "G", "G5", "BG", "BGDP", "BP5", "BPDP", "FL", "F", "F7", "FO", "FDP", "FINT",
            "P", "PASS", "R", "R84", "RINT", "U", "UINT", "UREV", "TH", "TH2", "THH", "E4", "C",
            "COUR", "L", "LDP", "LTP", "B", "BF", "BL1",
        ] {
            let count = MODIFIER_REGEXES
                .iter()
                .filter(|(regex, _)| is_full_match(regex, token))
                .count();
            assert_eq!(count, 1, "{token}");
        }
    }

    #[test]
    fn suffixed_codes_keep_their_digits_as_location() {
        assert_eq!(parse("E5"), Some(Modifier::with_location(PlayModifier::ErrorOn, "5")));
        assert_eq!(parse("TH"), Some(Modifier::new(PlayModifier::Throwing)));
        assert_eq!(parse("TH2"), Some(Modifier::with_location(PlayModifier::Throwing, "2")));
        assert_eq!(parse("R84"), Some(Modifier::with_location(PlayModifier::RelayThrow, "84")));
    }

    #[test]
    fn unrecognized_tokens_are_skipped() {
        let mods = Modifier::parse_modifiers(["FO", "XYZ", "", "GDPX", "G5"]);
        assert_eq!(
            mods,
            vec![
                Modifier::new(PlayModifier::ForceOut),
                Modifier::with_location(PlayModifier::GroundBall, "5"),
            ]
        );
    }

    #[test]
    fn hit_location_detail() {
        let detail = HitLocation::from("78XD").detail().unwrap();
        assert_eq!(detail.general_location, HitLocationGeneral::LeftCenter);
        assert_eq!(detail.depth, Some(HitDepth::ExtraDeep));
        assert_eq!(detail.angle, None);

        let detail = HitLocation::from("9LS").detail().unwrap();
        assert_eq!(detail.general_location, HitLocationGeneral::Right);
        assert_eq!(detail.angle, Some(HitAngle::FoulLine));
        assert_eq!(detail.depth, Some(HitDepth::Shallow));

        let detail = HitLocation::from("7LSF+").detail().unwrap();
        assert_eq!(detail.general_location, HitLocationGeneral::Left);
        assert_eq!(detail.angle, Some(HitAngle::FoulLine));
        assert_eq!(detail.strength, Some(HitStrength::Hard));

        assert_eq!(HitLocation::from("5").detail().map(|d| d.depth), Some(None));

        assert!(HitLocation::from("99").detail().is_none());
    }

    #[test]
    fn modifiers_render_with_location() {
        assert_eq!(
            Modifier::with_location(PlayModifier::LinedDrive, "9LS").to_string(),
            "Line drive, 9LS"
        );
        assert_eq!(Modifier::new(PlayModifier::ForceOut).to_string(), "Forced out");
    }
}
