use std::fmt;

use anyhow::{bail, Error, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::event_file::advance::RunnerAdvance;
use crate::event_file::modifier::Modifier;
use crate::event_file::play::BasicPlay;
use crate::event_file::traits::Position;

/// Everything that can be read out of a single play notation such as `64(1)3/GDP/G6.3-H`.
#[derive(Debug, Eq, PartialEq, Default, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub play: BasicPlay,
    pub extra_plays: Vec<BasicPlay>,
    pub fielders: Vec<Position>,
    pub modifiers: Vec<Modifier>,
    pub runner_advances: Vec<RunnerAdvance>,
}

impl EventDetail {
    pub fn decode(notation: &str) -> Result<Self> {
        Self::try_from(notation)
    }
}

impl TryFrom<&str> for EventDetail {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let (play_part, advance_part) = match value.split('.').collect_tuple() {
            Some((play_part, advance_part)) => (play_part, Some(advance_part)),
            None if !value.contains('.') => (value, None),
            None => bail!("More than one advance section in play notation {:?}", value),
        };

        let mut play_tokens = play_part.split('/');
        let segment = play_tokens.next().unwrap_or_default();
        let play = BasicPlay::from_notation(segment);

        Ok(Self {
            play,
            extra_plays: play.extra_plays(segment),
            fielders: play.fielders(segment),
            modifiers: Modifier::parse_modifiers(play_tokens),
            runner_advances: advance_part
                .map(|a| RunnerAdvance::parse_advances(a.split(';')))
                .unwrap_or_default(),
        })
    }
}

impl fmt::Display for EventDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.play)?;
        if !self.extra_plays.is_empty() {
            write!(f, " + {}", self.extra_plays.iter().join(" + "))?;
        }
        if !self.fielders.is_empty() {
            write!(f, " ({})", self.fielders.iter().join(", "))?;
        }
        for modifier in &self.modifiers {
            write!(f, " / {modifier}")?;
        }
        if !self.runner_advances.is_empty() {
            write!(f, ". {}", self.runner_advances.iter().join("; "))?;
        }
        Ok(())
    }
}
