use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::event_file::advance::{Base, BaseRunner};
use crate::event_file::event_detail::EventDetail;
use crate::event_file::game::{EventId, GameContext};
use crate::event_file::modifier::{
    HitAngle, HitDepth, HitLocationGeneral, HitStrength, PlayModifier,
};
use crate::event_file::play::BasicPlay;
use crate::event_file::traits::{Inning, InningHalf};

pub type SequenceId = usize;

pub trait ContextToVec<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a>
    where
        Self: Sized;
}

/// Nested values are stored as one JSON column.
fn as_json<T: Serialize, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    let json = serde_json::to_string(value).map_err(S::Error::custom)?;
    serializer.serialize_str(&json)
}

#[derive(Debug, Clone, Serialize)]
pub struct Event<'a> {
    game_id: &'a str,
    event_id: EventId,
    inning: Inning,
    inning_half: InningHalf,
    batter_id: &'a str,
    count_balls: Option<u8>,
    count_strikes: Option<u8>,
    pitch_sequence: &'a str,
    notation: &'a str,
    play: BasicPlay,
    #[serde(serialize_with = "as_json")]
    event_detail: &'a EventDetail,
}

impl<'a> ContextToVec<'a> for Event<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::from(gc.events.iter().map(|e| Self {
            game_id: &e.game_id,
            event_id: e.event_id,
            inning: e.inning,
            inning_half: e.half,
            batter_id: &e.batter,
            count_balls: e.count.balls,
            count_strikes: e.count.strikes,
            pitch_sequence: &e.pitches,
            notation: &e.notation,
            play: e.detail.play,
            event_detail: &e.detail,
        }))
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct EventExtraPlay<'a> {
    game_id: &'a str,
    event_id: EventId,
    sequence_id: SequenceId,
    extra_play: BasicPlay,
}

impl<'a> ContextToVec<'a> for EventExtraPlay<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::from(gc.events.iter().flat_map(|e| {
            e.detail
                .extra_plays
                .iter()
                .enumerate()
                .map(move |(i, play)| Self {
                    game_id: &e.game_id,
                    event_id: e.event_id,
                    sequence_id: i + 1,
                    extra_play: *play,
                })
        }))
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct EventFieldingPlay<'a> {
    game_id: &'a str,
    event_id: EventId,
    sequence_id: SequenceId,
    fielding_position: u8,
}

impl<'a> ContextToVec<'a> for EventFieldingPlay<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::from(gc.events.iter().flat_map(|e| {
            e.detail
                .fielders
                .iter()
                .enumerate()
                .map(move |(i, position)| Self {
                    game_id: &e.game_id,
                    event_id: e.event_id,
                    sequence_id: i + 1,
                    fielding_position: (*position).into(),
                })
        }))
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct EventModifier<'a> {
    game_id: &'a str,
    event_id: EventId,
    sequence_id: SequenceId,
    modifier: PlayModifier,
    hit_location: Option<&'a str>,
    general_location: Option<HitLocationGeneral>,
    depth: Option<HitDepth>,
    angle: Option<HitAngle>,
    strength: Option<HitStrength>,
}

impl<'a> ContextToVec<'a> for EventModifier<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::from(gc.events.iter().flat_map(|e| {
            e.detail
                .modifiers
                .iter()
                .enumerate()
                .map(move |(i, m)| {
                    let detail = m.location.as_ref().and_then(|hl| hl.detail());
                    Self {
                        game_id: &e.game_id,
                        event_id: e.event_id,
                        sequence_id: i + 1,
                        modifier: m.modifier,
                        hit_location: m.location.as_ref().map(|hl| hl.as_str()),
                        general_location: detail.map(|d| d.general_location),
                        depth: detail.and_then(|d| d.depth),
                        angle: detail.and_then(|d| d.angle),
                        strength: detail.and_then(|d| d.strength),
                    }
                })
        }))
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct EventRunnerAdvance<'a> {
    game_id: &'a str,
    event_id: EventId,
    sequence_id: SequenceId,
    baserunner: BaseRunner,
    to_base: Base,
}

impl<'a> ContextToVec<'a> for EventRunnerAdvance<'a> {
    fn from_game_context(gc: &'a GameContext) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::from(gc.events.iter().flat_map(|e| {
            e.detail
                .runner_advances
                .iter()
                .enumerate()
                .map(move |(i, a)| Self {
                    game_id: &e.game_id,
                    event_id: e.event_id,
                    sequence_id: i + 1,
                    baserunner: a.baserunner,
                    to_base: a.to,
                })
        }))
    }
}
