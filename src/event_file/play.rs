use const_format::concatcp;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use tracing::trace;

use crate::event_file::traits::Position;
use crate::util::{first_digit_run, is_full_match};

const FIELDING_SEQUENCE: &str = r"\([0-9A-Z]+\)";
const OPTIONAL_FIELDING_SEQUENCE: &str = concatcp!("(?:", FIELDING_SEQUENCE, ")?");
const PUTOUT_MARKER: &str = r"\([B123]\)";

/// Events that can be chained with `+` onto a walk or strikeout, e.g. `K+SB2` or `W+WP`.
const CHAINED_EVENT: &str = concatcp!(
    r"\+(?:WP|PB|DI|OA|E[0-9]|(?:SB[23H];?)+|POCS[23H]",
    OPTIONAL_FIELDING_SEQUENCE,
    "|PO[123]",
    OPTIONAL_FIELDING_SEQUENCE,
    "|CS[23H]",
    OPTIONAL_FIELDING_SEQUENCE,
    ")"
);
const CHAINED_EVENTS: &str = concatcp!("(?:", CHAINED_EVENT, ")*");

/// Ordered from most to least specific. The first rule whose match covers the whole
/// segment wins, so a longer lettered code always comes before any code it starts with,
/// and a fielded out with more put-out markers comes before one with fewer.
const PLAY_RULES: [(&str, BasicPlay); 30] = [
    // Baserunning
    (concatcp!("^POCS[23H]", OPTIONAL_FIELDING_SEQUENCE), BasicPlay::PickOffCaughtStealing),
    (concatcp!("^PO[123]", OPTIONAL_FIELDING_SEQUENCE), BasicPlay::PickOff),
    (r"^(?:SB[23H];?)+", BasicPlay::StolenBase),
    (concatcp!("^CS[23H]", OPTIONAL_FIELDING_SEQUENCE), BasicPlay::CaughtStealing),
    // Lettered plays
    ("^HP", BasicPlay::HitByPitch),
    ("^DGR?", BasicPlay::GroundRuleDouble),
    ("^FLE[0-9]?", BasicPlay::ErrorOnFlyBall),
    ("^FC[0-9]?", BasicPlay::FieldersChoice),
    ("^NP", BasicPlay::NoPlay),
    ("^BK", BasicPlay::Balk),
    ("^DI", BasicPlay::DefensiveIndifference),
    ("^OA", BasicPlay::OtherAdvance),
    ("^PB", BasicPlay::PassedBall),
    ("^WP", BasicPlay::WildPitch),
    (concatcp!("^IW?", CHAINED_EVENTS), BasicPlay::IntentionalWalk),
    (concatcp!("^W", CHAINED_EVENTS), BasicPlay::Walk),
    (concatcp!("^K[0-9]*", CHAINED_EVENTS), BasicPlay::StrikeOut),
    ("^E[0-9]?", BasicPlay::Error),
    ("^C", BasicPlay::CatcherInterference),
    ("^S[0-9]*", BasicPlay::Single),
    ("^D[0-9]*", BasicPlay::Double),
    ("^T[0-9]*", BasicPlay::Triple),
    ("^HR?[0-9]*", BasicPlay::HomeRun),
    // Fielded outs. The triple-play rule needs a marker after every fielder run, so a
    // ground-ball triple play written `5(2)4(1)3` matches nothing and is NoPlay.
    (
        concatcp!("^[0-9]+", PUTOUT_MARKER, "[0-9]+", PUTOUT_MARKER, "[0-9]+", PUTOUT_MARKER),
        BasicPlay::LinedIntoTriplePlay,
    ),
    (
        concatcp!("^[0-9]+", PUTOUT_MARKER, "[0-9]+", PUTOUT_MARKER),
        BasicPlay::LinedIntoDoublePlay,
    ),
    (concatcp!("^[0-9]+", PUTOUT_MARKER, "[0-9]"), BasicPlay::GroundedIntoDoublePlay),
    (concatcp!("^[0-9]{2,}(?:", PUTOUT_MARKER, ")?"), BasicPlay::GroundBallOut),
    ("^[0-9]", BasicPlay::FlyBallOut),
    // Unfielded batting outs with a runner marker only, e.g. `3(B)`
    (concatcp!("^[0-9]", PUTOUT_MARKER), BasicPlay::GroundBallOut),
    // Error on a throw after a fielding attempt, e.g. `6E3`
    ("^[0-9]+E[0-9]", BasicPlay::Error),
];

lazy_static! {
    static ref PLAY_REGEXES: Vec<(Regex, BasicPlay)> = PLAY_RULES
        .iter()
        .map(|(pattern, play)| (Regex::new(pattern).unwrap(), *play))
        .collect();
    static ref PUTOUT_MARKER_REGEX: Regex = Regex::new(PUTOUT_MARKER).unwrap();
    static ref FIELDING_SEQUENCE_REGEX: Regex = Regex::new(FIELDING_SEQUENCE).unwrap();
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum BasicPlay {
    FlyBallOut,
    GroundBallOut,
    GroundedIntoDoublePlay,
    LinedIntoDoublePlay,
    LinedIntoTriplePlay,
    CatcherInterference,
    Single,
    Double,
    Triple,
    HomeRun,
    GroundRuleDouble,
    Error,
    FieldersChoice,
    ErrorOnFlyBall,
    HitByPitch,
    StrikeOut,
    NoPlay,
    Walk,
    IntentionalWalk,
    Balk,
    CaughtStealing,
    DefensiveIndifference,
    OtherAdvance,
    PassedBall,
    WildPitch,
    PickOff,
    PickOffCaughtStealing,
    StolenBase,
}

impl Default for BasicPlay {
    fn default() -> Self {
        Self::NoPlay
    }
}

impl BasicPlay {
    /// Resolves the primary outcome of a basic-play segment (the part before any `/` or `.`).
    /// Anything unrecognized is `NoPlay`; decoding never fails here.
    pub fn from_notation(segment: &str) -> Self {
        PLAY_REGEXES
            .iter()
            .find(|(regex, _)| is_full_match(regex, segment))
            .map_or_else(
                || {
                    trace!("Unrecognized basic play {:?}", segment);
                    Self::NoPlay
                },
                |(_, play)| *play,
            )
    }

    pub const fn allows_extra_plays(self) -> bool {
        matches!(self, Self::Walk | Self::IntentionalWalk | Self::StrikeOut)
    }

    pub const fn is_multiple_out(self) -> bool {
        matches!(
            self,
            Self::GroundedIntoDoublePlay | Self::LinedIntoDoublePlay | Self::LinedIntoTriplePlay
        )
    }

    /// Events chained after a walk or strikeout, e.g. the wild pitch in `K+WP`.
    pub fn extra_plays(self, segment: &str) -> Vec<Self> {
        if !self.allows_extra_plays() {
            return vec![];
        }
        segment.split('+').skip(1).map(Self::from_notation).collect()
    }

    /// Fielders involved in the play, in the order they handled the ball.
    pub fn fielders(self, segment: &str) -> Vec<Position> {
        match self {
            _ if self.is_multiple_out() => {
                Position::fielding_vec(&PUTOUT_MARKER_REGEX.replace_all(segment, ""))
            }
            Self::CaughtStealing | Self::PickOff | Self::PickOffCaughtStealing => {
                FIELDING_SEQUENCE_REGEX
                    .find(segment)
                    .map(|m| Position::fielding_vec(m.as_str()))
                    .unwrap_or_default()
            }
            Self::HomeRun | Self::StolenBase => vec![],
            Self::Error => Position::fielding_vec(segment),
            _ if self.allows_extra_plays() => {
                let main_event = segment.split('+').next().unwrap_or_default();
                Position::fielding_vec(first_digit_run(main_event))
            }
            // Digits after a put-out marker name a runner rather than a fielder
            _ => Position::fielding_vec(first_digit_run(segment)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Position::*;

    fn matching_rules(segment: &str) -> Vec<BasicPlay> {
        PLAY_REGEXES
            .iter()
            .filter(|(regex, _)| is_full_match(regex, segment))
            .map(|(_, play)| *play)
            .collect()
    }

    #[test]
    fn matches_basic_plays() {
        let cases = [
            ("SB2", BasicPlay::StolenBase),
            ("SBH;SB3", BasicPlay::StolenBase),
            ("POCSH(1361)", BasicPlay::PickOffCaughtStealing),
            ("PO1(16343)", BasicPlay::PickOff),
            ("CS2(2E4)", BasicPlay::CaughtStealing),
            ("CS3(23)", BasicPlay::CaughtStealing),
            ("CSH(12)", BasicPlay::CaughtStealing),
            ("IW+PO3", BasicPlay::IntentionalWalk),
            ("IW+SB3", BasicPlay::IntentionalWalk),
            ("W+WP", BasicPlay::Walk),
            ("W+SB3", BasicPlay::Walk),
            ("IW", BasicPlay::IntentionalWalk),
            ("W", BasicPlay::Walk),
            ("K", BasicPlay::StrikeOut),
            ("K+PB", BasicPlay::StrikeOut),
            ("K23+WP", BasicPlay::StrikeOut),
            ("K+SB2", BasicPlay::StrikeOut),
            ("HP", BasicPlay::HitByPitch),
            ("HR9", BasicPlay::HomeRun),
            ("H", BasicPlay::HomeRun),
            ("FLE5", BasicPlay::ErrorOnFlyBall),
            ("FC5", BasicPlay::FieldersChoice),
            ("E3", BasicPlay::Error),
            ("E1", BasicPlay::Error),
            ("E", BasicPlay::Error),
            ("DGR", BasicPlay::GroundRuleDouble),
            ("T9", BasicPlay::Triple),
            ("D7", BasicPlay::Double),
            ("S9", BasicPlay::Single),
            ("C", BasicPlay::CatcherInterference),
            ("1(B)16(2)63(1)", BasicPlay::LinedIntoTriplePlay),
            ("8(B)84(2)", BasicPlay::LinedIntoDoublePlay),
            ("3(B)3(1)", BasicPlay::LinedIntoDoublePlay),
            ("64(1)3", BasicPlay::GroundedIntoDoublePlay),
            ("6(1)3", BasicPlay::GroundedIntoDoublePlay),
            ("63", BasicPlay::GroundBallOut),
            ("8", BasicPlay::FlyBallOut),
            ("BK", BasicPlay::Balk),
            ("DI", BasicPlay::DefensiveIndifference),
            ("OA", BasicPlay::OtherAdvance),
            ("PB", BasicPlay::PassedBall),
            ("WP", BasicPlay::WildPitch),
            ("NP", BasicPlay::NoPlay),
        ];
        for (segment, expected) in cases {
            assert_eq!(BasicPlay::from_notation(segment), expected, "{segment}");
        }
    }

    #[test]
    fn unrecognized_plays_are_no_play() {
        for segment in ["", "XYZ", "S9S9", "CS4(12)", "PO4", "K+ZZ", "?"] {
            assert_eq!(BasicPlay::from_notation(segment), BasicPlay::NoPlay, "{segment}");
        }
    }

    #[test]
    fn ambiguous_prefixes_resolve_to_most_specific_rule() {
        // Each of these has a shorter rule matching a prefix of it
        let cases = [
            ("64(1)3", BasicPlay::GroundedIntoDoublePlay),
            ("3(B)3(1)", BasicPlay::LinedIntoDoublePlay),
            ("1(B)16(2)63(1)", BasicPlay::LinedIntoTriplePlay),
            ("54(1)", BasicPlay::GroundBallOut),
            ("HP", BasicPlay::HitByPitch),
            ("HR", BasicPlay::HomeRun),
            ("DGR", BasicPlay::GroundRuleDouble),
            ("DI", BasicPlay::DefensiveIndifference),
            ("POCS2(14)", BasicPlay::PickOffCaughtStealing),
            ("CS2(24)", BasicPlay::CaughtStealing),
            ("SB3", BasicPlay::StolenBase),
            ("WP", BasicPlay::WildPitch),
            ("FLE7", BasicPlay::ErrorOnFlyBall),
        ];
        for (segment, expected) in cases {
            assert_eq!(BasicPlay::from_notation(segment), expected, "{segment}");
        }
    }

    #[test]
    fn every_sample_is_accepted_by_exactly_one_rule() {
        let samples = [
            "8", "63", "543", "54(1)", "3(B)", "6(1)3", "64(1)3", "3(B)3(1)", "8(B)84(2)",
            "1(B)16(2)63(1)", "C", "S", "S9", "D7", "DGR", "T9", "H", "HR", "HR9", "HP", "E", "E3",
            "6E3", "FC5", "FLE5", "K", "K23", "K+WP", "K+SB2;SB3", "W", "W+PB", "W+E2", "I", "IW",
            "IW+PO3(13)", "NP", "BK", "DI", "OA", "PB", "WP", "SB2", "SB3;SB2", "CS2(24)",
            "CSH(1E2)", "PO1(13)", "POCS2(1361)",
        ];
        for sample in samples {
            assert_eq!(matching_rules(sample).len(), 1, "{sample}: {:?}", matching_rules(sample));
        }
    }

    #[test]
    fn grounded_triple_play_is_no_play() {
        assert!(matching_rules("5(2)4(1)3").is_empty());
        assert_eq!(BasicPlay::from_notation("5(2)4(1)3"), BasicPlay::NoPlay);
        assert_eq!(BasicPlay::NoPlay.fielders("5(2)4(1)3"), vec![ThirdBase]);
    }

    #[test]
    fn decoding_is_deterministic() {
        for segment in ["64(1)3", "K23+WP", "POCSH(1361)", "garbage"] {
            let first = BasicPlay::from_notation(segment);
            assert!((0..50).all(|_| BasicPlay::from_notation(segment) == first));
        }
    }

    #[test]
    fn extra_plays_only_follow_walks_and_strikeouts() {
        assert_eq!(BasicPlay::StrikeOut.extra_plays("K23+WP"), vec![BasicPlay::WildPitch]);
        assert_eq!(
            BasicPlay::Walk.extra_plays("W+SB2+E2"),
            vec![BasicPlay::StolenBase, BasicPlay::Error]
        );
        assert_eq!(
            BasicPlay::IntentionalWalk.extra_plays("IW+PO1(13)"),
            vec![BasicPlay::PickOff]
        );
        assert!(BasicPlay::StrikeOut.extra_plays("K").is_empty());
        assert!(BasicPlay::Single.extra_plays("S9+E9").is_empty());
    }

    #[test]
    fn fielders_for_multiple_outs_skip_putout_markers() {
        assert_eq!(
            BasicPlay::GroundedIntoDoublePlay.fielders("64(1)3"),
            vec![ShortStop, SecondBase, FirstBase]
        );
        assert_eq!(
            BasicPlay::LinedIntoDoublePlay.fielders("8(B)84(2)"),
            vec![CenterField, CenterField, SecondBase]
        );
        assert_eq!(
            BasicPlay::LinedIntoTriplePlay.fielders("1(B)16(2)63(1)"),
            vec![Pitcher, Pitcher, ShortStop, ShortStop, FirstBase]
        );
    }

    #[test]
    fn fielders_by_play_kind() {
        assert_eq!(BasicPlay::CaughtStealing.fielders("CSH(12)"), vec![Pitcher, Catcher]);
        assert_eq!(BasicPlay::CaughtStealing.fielders("CS2(2E4)"), vec![Catcher, SecondBase]);
        assert_eq!(
            BasicPlay::PickOffCaughtStealing.fielders("POCSH(1361)"),
            vec![Pitcher, FirstBase, ShortStop, Pitcher]
        );
        assert!(BasicPlay::CaughtStealing.fielders("CS2").is_empty());
        assert!(BasicPlay::HomeRun.fielders("HR9").is_empty());
        assert!(BasicPlay::StolenBase.fielders("SB2").is_empty());
        assert_eq!(BasicPlay::StrikeOut.fielders("K23+SB2"), vec![Catcher, FirstBase]);
        assert!(BasicPlay::Walk.fielders("W+SB3").is_empty());
        assert_eq!(BasicPlay::GroundBallOut.fielders("54(1)"), vec![ThirdBase, SecondBase]);
        assert_eq!(BasicPlay::Error.fielders("E3"), vec![FirstBase]);
        assert_eq!(BasicPlay::Error.fielders("6E3"), vec![ShortStop, FirstBase]);
        assert!(BasicPlay::CatcherInterference.fielders("C").is_empty());
    }
}
