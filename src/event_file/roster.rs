use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event_file::parser::retrosheet_csv;
use crate::event_file::traits::{
    Classify, FromRetrosheetRecord, Hand, League, Player, RetrosheetEventRecord, Team,
};
use crate::util::year_from_file_name;

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: Player,
    pub last_name: String,
    pub first_name: String,
    pub bats: Option<Hand>,
    pub throws: Option<Hand>,
}

impl FromRetrosheetRecord for PlayerRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self> {
        let field = |i| record.get(i).unwrap_or_default().trim();
        if field(0).is_empty() {
            return Err(Self::error("Roster line without a player ID", record));
        }
        Ok(Self {
            player_id: field(0).to_string(),
            last_name: field(1).to_string(),
            first_name: field(2).to_string(),
            bats: Hand::classify(field(3)),
            throws: Hand::classify(field(4)),
        })
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub season: u16,
    pub team_id: Team,
    pub league: Option<League>,
    pub city: String,
    pub nickname: String,
}

impl TeamRecord {
    fn new(record: &RetrosheetEventRecord, season: u16) -> Result<Self> {
        let field = |i| record.get(i).unwrap_or_default().trim();
        if field(0).is_empty() {
            bail!("Team line without a team ID\nRecord: {:?}", record)
        }
        Ok(Self {
            season,
            team_id: field(0).to_string(),
            league: League::classify(field(1)),
            city: field(2).to_string(),
            nickname: field(3).to_string(),
        })
    }
}

fn read_lines<R, T, F>(read: R, filename: &str, mut parse: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&RetrosheetEventRecord) -> Result<T>,
{
    let mut rows = vec![];
    for record in retrosheet_csv(read).records() {
        let record = record.with_context(|| format!("Could not read line of {filename}"))?;
        match parse(&record) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{}: {:?}", filename, e),
        }
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<(BufReader<File>, String)> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    Ok((BufReader::new(file), path.display().to_string()))
}

/// Reads a `.ROS` file: `id,last,first,bats,throws`, with any further fields ignored.
pub fn read_roster(path: &Path) -> Result<Vec<PlayerRecord>> {
    let (file, filename) = open(path)?;
    read_lines(file, &filename, PlayerRecord::new)
}

/// Reads a `TEAM` file: `code,league,city,nickname`. The season is part of the file name.
pub fn read_teams(path: &Path) -> Result<Vec<TeamRecord>> {
    let season = year_from_file_name(path)
        .with_context(|| format!("No season in team file name {}", path.display()))?;
    let (file, filename) = open(path)?;
    read_lines(file, &filename, |r| TeamRecord::new(r, season))
}

/// A player appears on one roster per team and season. The first occurrence wins.
pub fn unique_players<I>(players: I) -> Vec<PlayerRecord>
where
    I: IntoIterator<Item = PlayerRecord>,
{
    players
        .into_iter()
        .unique_by(|p| p.player_id.clone())
        .collect()
}
