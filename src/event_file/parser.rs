use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Error, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::warn;

use crate::event_file::event_detail::EventDetail;
use crate::event_file::traits::{
    Batter, Classify, FromRetrosheetRecord, GameId, InfoType, Inning, InningHalf, RecordType,
    RetrosheetEventRecord,
};
use crate::util::year_from_file_name;

/// All Retrosheet files are headerless, and lines of one file have different lengths.
pub fn retrosheet_csv<R: Read>(read: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(read)
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub season: Option<u16>,
}

impl From<&Path> for FileInfo {
    fn from(path: &Path) -> Self {
        Self {
            filename: path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            season: year_from_file_name(path),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct InfoRecord {
    pub info_type: InfoType,
    pub value: String,
}

#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct Count {
    pub balls: Option<u8>,
    pub strikes: Option<u8>,
}

impl Count {
    /// Two digits, balls then strikes. `??` means the count is unknown.
    fn new(count_str: &str) -> Self {
        let mut ints = count_str.chars().map(|c| c.to_digit(10).map(|i| i as u8));
        Self {
            balls: ints.next().flatten(),
            strikes: ints.next().flatten(),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PlayRecord {
    pub inning: Inning,
    pub half: InningHalf,
    pub batter: Batter,
    pub count: Count,
    pub pitches: String,
    pub notation: String,
    pub detail: EventDetail,
}

impl FromRetrosheetRecord for PlayRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self> {
        let record = record.deserialize::<[&str; 7]>(None)?;
        Ok(Self {
            inning: record[1]
                .parse::<Inning>()
                .with_context(|| format!("Invalid inning {:?}", record[1]))?,
            half: InningHalf::classify(record[2])
                .with_context(|| format!("Unknown inning half {:?}", record[2]))?,
            batter: record[3].to_string(),
            count: Count::new(record[4]),
            pitches: record[5].to_string(),
            notation: record[6].to_string(),
            detail: EventDetail::try_from(record[6])?,
        })
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum MappedRecord {
    GameId(GameId),
    Info(InfoRecord),
    Play(PlayRecord),
    /// Recognized, but carries nothing that is extracted.
    Skipped(RecordType),
}

impl FromRetrosheetRecord for MappedRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self> {
        let line_type = record.get(0).context("No record")?;
        let Some(record_type) = RecordType::classify(line_type) else {
            return Err(Self::error("Unrecognized record type", record));
        };
        let mapped = match record_type {
            RecordType::GameId => match record.get(1) {
                Some(id) if !id.is_empty() => Self::GameId(id.to_string()),
                _ => return Err(Self::error("Missing game ID", record)),
            },
            RecordType::Info => {
                let info_type = record.get(1).and_then(InfoType::classify);
                match info_type {
                    Some(info_type) => Self::Info(InfoRecord {
                        info_type,
                        value: record.get(2).unwrap_or_default().to_string(),
                    }),
                    None => Self::Skipped(RecordType::Info),
                }
            }
            RecordType::Play => Self::Play(
                PlayRecord::new(record).map_err(|e| Self::error(&e.to_string(), record))?,
            ),
            _ => Self::Skipped(record_type),
        };
        Ok(mapped)
    }
}

pub type RecordVec = Vec<MappedRecord>;

/// Reads an event file one game at a time. Each yielded vector starts with the
/// game's `id` record. Lines that cannot be mapped are logged and left out.
pub struct RetrosheetReader<R: Read> {
    reader: Reader<R>,
    current_record: StringRecord,
    next_game_id: Option<GameId>,
    pub file_info: FileInfo,
}

impl<R: Read> Iterator for RetrosheetReader<R> {
    type Item = Result<RecordVec>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_game().transpose()
    }
}

impl<R: Read> RetrosheetReader<R> {
    pub fn new(read: R, file_info: FileInfo) -> Result<Self> {
        let mut reader = retrosheet_csv(read);
        let mut current_record = StringRecord::new();
        let next_game_id = if reader.read_record(&mut current_record)? {
            match MappedRecord::new(&current_record)? {
                MappedRecord::GameId(g) => Some(g),
                _ => bail!(
                    "First record of {} was not a game ID, cannot read file",
                    file_info.filename
                ),
            }
        } else {
            None
        };
        Ok(Self {
            reader,
            current_record,
            next_game_id,
            file_info,
        })
    }

    fn next_game(&mut self) -> Result<Option<RecordVec>> {
        let Some(game_id) = self.next_game_id.take() else {
            return Ok(None);
        };
        let mut records = vec![MappedRecord::GameId(game_id)];
        while self.reader.read_record(&mut self.current_record)? {
            match MappedRecord::new(&self.current_record) {
                Ok(MappedRecord::GameId(g)) => {
                    self.next_game_id = Some(g);
                    break;
                }
                Ok(mapped) => records.push(mapped),
                Err(e) => warn!("{}: {:?}", self.file_info.filename, e),
            }
        }
        Ok(Some(records))
    }
}

impl TryFrom<&Path> for RetrosheetReader<BufReader<File>> {
    type Error = Error;

    fn try_from(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        Self::new(BufReader::new(file), FileInfo::from(path))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::event_file::play::BasicPlay;

    const EVENT_FILE: &str = "\
id,ANA201804020
version,2
info,visteam,CLE
info,hometeam,ANA
info,umphome,wintm901
play,1,0,lindf001,01,CX,8/F78
com,\"Scored a run, then left\"
play,1,2,kipnj001,??,,S8
play,1,0,kipnj001,??,,
id,ANA201804030
info,date,2018/04/03
xyz,1
play,1,1,troum001,32,BBCFBB,W.1-2
";

    fn reader(text: &str) -> RetrosheetReader<&[u8]> {
        let info = FileInfo::from(PathBuf::from("2018ANA.EVA").as_path());
        RetrosheetReader::new(text.as_bytes(), info).unwrap()
    }

    #[test]
    fn groups_records_by_game() {
        let games = reader(EVENT_FILE).collect::<Result<Vec<RecordVec>>>().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0][0], MappedRecord::GameId("ANA201804020".to_string()));
        assert_eq!(games[1][0], MappedRecord::GameId("ANA201804030".to_string()));
        assert_eq!(reader(EVENT_FILE).file_info.season, Some(2018));
    }

    #[test]
    fn unusable_lines_are_skipped() {
        let games = reader(EVENT_FILE).collect::<Result<Vec<RecordVec>>>().unwrap();
        // The bad inning half is dropped
        assert_eq!(
            games[0][1..],
            [
                MappedRecord::Skipped(RecordType::Version),
                MappedRecord::Info(InfoRecord {
                    info_type: InfoType::VisitingTeam,
                    value: "CLE".to_string()
                }),
                MappedRecord::Info(InfoRecord {
                    info_type: InfoType::HomeTeam,
                    value: "ANA".to_string()
                }),
                MappedRecord::Skipped(RecordType::Info),
                games[0][5].clone(),
                MappedRecord::Skipped(RecordType::Comment),
                games[0][7].clone(),
            ]
        );
        // An empty notation is still a play, with nothing decoded
        let MappedRecord::Play(empty) = &games[0][7] else {
            panic!("expected a play record, got {:?}", games[0][7]);
        };
        assert_eq!(empty.batter, "kipnj001");
        assert_eq!(empty.detail.play, BasicPlay::NoPlay);
        // So is the unknown record type
        assert_eq!(games[1].len(), 3);
    }

    #[test]
    fn play_records_are_decoded() {
        let games = reader(EVENT_FILE).collect::<Result<Vec<RecordVec>>>().unwrap();
        let MappedRecord::Play(play) = &games[1][2] else {
            panic!("Expected play record, got {:?}", games[1][2]);
        };
        assert_eq!(play.inning, 1);
        assert_eq!(play.half, InningHalf::Bottom);
        assert_eq!(play.batter, "troum001");
        assert_eq!(play.count, Count { balls: Some(3), strikes: Some(2) });
        assert_eq!(play.pitches, "BBCFBB");
        assert_eq!(play.detail.play, BasicPlay::Walk);
        assert_eq!(play.detail.runner_advances.len(), 1);
    }

    #[test]
    fn unknown_count_is_empty() {
        assert_eq!(Count::new("??"), Count::default());
    }

    #[test]
    fn file_must_start_with_game_id() {
        let info = FileInfo::from(PathBuf::from("2018ANA.EVA").as_path());
        assert!(RetrosheetReader::new("info,visteam,CLE\n".as_bytes(), info.clone()).is_err());
        assert_eq!(RetrosheetReader::new("".as_bytes(), info).unwrap().count(), 0);
    }
}
