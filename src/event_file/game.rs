use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use tracing::warn;

use crate::event_file::event_detail::EventDetail;
use crate::event_file::parser::{Count, FileInfo, InfoRecord, MappedRecord};
use crate::event_file::traits::{Batter, Classify, GameId, InfoType, Inning, InningHalf, Team};

const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Eq, PartialEq, EnumString, Copy, Clone, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum DayNight {
    Day,
    Night,
}

impl Classify for DayNight {}

#[derive(Debug, Default, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub season: Option<u16>,
    pub visiting_team: Option<Team>,
    pub home_team: Option<Team>,
    pub date: Option<NaiveDate>,
    pub site: Option<String>,
    pub doubleheader_number: Option<u8>,
    pub day_night: Option<DayNight>,
    pub use_dh: Option<bool>,
    pub attendance: Option<u32>,
    pub input_program_version: Option<String>,
}

impl Game {
    pub fn new(game_id: &str, season: Option<u16>) -> Self {
        Self {
            game_id: game_id.to_string(),
            season,
            ..Self::default()
        }
    }

    /// Later records of the same type overwrite earlier ones. Values that cannot be
    /// read are logged and left empty.
    fn apply_info(&mut self, info: &InfoRecord) {
        let value = info.value.trim();
        if value.is_empty() {
            return;
        }
        match info.info_type {
            InfoType::VisitingTeam => self.visiting_team = Some(value.to_string()),
            InfoType::HomeTeam => self.home_team = Some(value.to_string()),
            InfoType::GameDate => {
                self.date = NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map_err(|e| warn!("{}: invalid game date {:?}: {}", self.game_id, value, e))
                    .ok();
            }
            InfoType::Site => self.site = Some(value.to_string()),
            InfoType::DoubleheaderNumber => self.doubleheader_number = value.parse().ok(),
            InfoType::DayNight => self.day_night = DayNight::classify(value),
            InfoType::UseDh => self.use_dh = value.parse().ok(),
            InfoType::Attendance => self.attendance = value.parse().ok(),
            InfoType::InputProgramVersion => {
                self.input_program_version = Some(value.to_string());
            }
        }
    }
}

pub type EventId = usize;

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct GameEvent {
    pub game_id: GameId,
    pub event_id: EventId,
    pub inning: Inning,
    pub half: InningHalf,
    pub batter: Batter,
    pub count: Count,
    pub pitches: String,
    pub notation: String,
    pub detail: EventDetail,
}

/// A game and its decoded plays, in file order.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct GameContext {
    pub game: Game,
    pub events: Vec<GameEvent>,
}

impl GameContext {
    pub fn new(records: &[MappedRecord], file_info: &FileInfo) -> Result<Self> {
        let Some(MappedRecord::GameId(game_id)) = records.first() else {
            bail!("Game in {} does not start with a game ID", file_info.filename)
        };
        let mut game = Game::new(game_id, file_info.season);
        let mut events = vec![];
        for record in &records[1..] {
            match record {
                MappedRecord::Info(info) => game.apply_info(info),
                MappedRecord::Play(play) => events.push(GameEvent {
                    game_id: game_id.clone(),
                    event_id: events.len() + 1,
                    inning: play.inning,
                    half: play.half,
                    batter: play.batter.clone(),
                    count: play.count,
                    pitches: play.pitches.clone(),
                    notation: play.notation.clone(),
                    detail: play.detail.clone(),
                }),
                MappedRecord::GameId(g) => {
                    bail!("Unexpected game ID {} inside game {}", g, game_id)
                }
                MappedRecord::Skipped(_) => {}
            }
        }
        Ok(Self { game, events })
    }
}
