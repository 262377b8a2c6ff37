#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::cargo)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions, clippy::significant_drop_tightening)]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use csv::{Writer, WriterBuilder};
use fixed_map::{Key, Map};
use glob::{glob_with, MatchOptions};
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use retrosheet_pbp::event_file::game::GameContext;
use retrosheet_pbp::event_file::parser::RetrosheetReader;
use retrosheet_pbp::event_file::roster::{read_roster, read_teams, unique_players};
use retrosheet_pbp::event_file::schemas::{
    ContextToVec, Event, EventExtraPlay, EventFieldingPlay, EventModifier, EventRunnerAdvance,
};

const ABOUT: &str = "Decodes Retrosheet event, roster and team files into CSV datasets.";

struct ThreadSafeCsvWriter {
    csv: Mutex<Writer<File>>,
}

impl ThreadSafeCsvWriter {
    pub fn new(output_root: &Path, schema: OutputSchema) -> Result<Self> {
        let output_path = output_root.join(format!("{schema}.csv"));
        debug!("Creating file {}", output_path.display());
        let csv = WriterBuilder::new()
            .has_headers(true)
            .from_path(&output_path)
            .with_context(|| format!("Failed to create file {}", output_path.display()))?;
        Ok(Self {
            csv: Mutex::new(csv),
        })
    }

    pub fn csv(&self) -> Result<MutexGuard<Writer<File>>> {
        self.csv
            .lock()
            .map_err(|e| anyhow!("Failed to acquire writer lock: {}", e))
    }
}

struct WriterMap {
    map: Map<OutputSchema, ThreadSafeCsvWriter>,
}

impl WriterMap {
    fn new(output_root: &Path) -> Result<Self> {
        let mut map = Map::new();
        for schema in OutputSchema::iter() {
            map.insert(schema, ThreadSafeCsvWriter::new(output_root, schema)?);
        }
        Ok(Self { map })
    }

    fn flush_all(&self) -> Result<()> {
        self.map
            .iter()
            .par_bridge()
            .try_for_each(|(_, writer)| {
                writer
                    .csv()?
                    .flush()
                    .map_err(|e| anyhow!("Failed to flush writer: {}", e))
            })
    }

    fn get_csv(&self, schema: OutputSchema) -> Result<MutexGuard<Writer<File>>> {
        self.map
            .get(schema)
            .context("Failed to initialize writer for schema")?
            .csv()
    }

    fn write_rows<T: Serialize>(
        &self,
        schema: OutputSchema,
        rows: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        let mut csv = self.get_csv(schema)?;
        for row in rows {
            csv.serialize(row)?;
        }
        Ok(())
    }

    fn write_csv<'a, C: ContextToVec<'a> + Serialize>(
        &self,
        schema: OutputSchema,
        game_context: &'a GameContext,
    ) -> Result<()> {
        self.write_rows(schema, C::from_game_context(game_context))
    }

    fn write_game(&self, game_context: &GameContext) -> Result<()> {
        self.get_csv(OutputSchema::Game)?
            .serialize(&game_context.game)?;
        self.write_csv::<Event>(OutputSchema::Event, game_context)?;
        self.write_csv::<EventExtraPlay>(OutputSchema::EventExtraPlay, game_context)?;
        self.write_csv::<EventFieldingPlay>(OutputSchema::EventFieldingPlay, game_context)?;
        self.write_csv::<EventModifier>(OutputSchema::EventModifier, game_context)?;
        self.write_csv::<EventRunnerAdvance>(OutputSchema::EventRunnerAdvance, game_context)
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Ord, PartialOrd, Hash, Display, EnumIter, Key)]
#[strum(serialize_all = "snake_case")]
enum OutputSchema {
    Team,
    Player,
    Game,
    Event,
    EventExtraPlay,
    EventFieldingPlay,
    EventModifier,
    EventRunnerAdvance,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Display)]
enum InputFileType {
    Team,
    Roster,
    Event,
}

impl InputFileType {
    const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Team => &["TEAM*"],
            Self::Roster => &["*.ROS"],
            Self::Event => &["*.EVA", "*.EVN"],
        }
    }

    fn glob(self, input: &Path) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        let mut files = vec![];
        for pattern in self.patterns() {
            let pattern = input.join(pattern);
            let pattern = pattern.to_str().context("Input path is not valid UTF-8")?;
            for file in glob_with(pattern, options)? {
                files.push(file?);
            }
        }
        files.par_sort();
        debug!("Found {} {} files", files.len(), self);
        Ok(files)
    }
}

#[derive(Parser, Debug)]
#[command(name = "retrosheet-pbp", about = ABOUT)]
struct Opt {
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output_dir: PathBuf,

    /// Also log each file as it is processed
    #[arg(short, long)]
    verbose: bool,
}

fn get_output_root(opt: &Opt) -> Result<PathBuf> {
    std::fs::create_dir_all(&opt.output_dir).context("Error occurred on output dir check")?;
    opt.output_dir
        .canonicalize()
        .context("Error occurred on output dir canonicalization")
}

struct FileProcessor {
    opt: Opt,
    writers: WriterMap,
}

impl FileProcessor {
    pub fn new(opt: Opt) -> Result<Self> {
        let writers = WriterMap::new(&get_output_root(&opt)?)?;
        Ok(Self { opt, writers })
    }

    /// Logs the error and moves on, so one bad file never stops the others.
    fn log_failure<T>(path: &Path, result: Result<T>) -> Option<T> {
        result
            .map_err(|e| error!("Failed to process {}: {:?}", path.display(), e))
            .ok()
    }

    fn process_teams(&self) -> Result<()> {
        let files = InputFileType::Team.glob(&self.opt.input)?;
        let count: usize = files
            .par_iter()
            .filter_map(|f| {
                Self::log_failure(
                    f,
                    read_teams(f).and_then(|teams| {
                        self.writers.write_rows(OutputSchema::Team, &teams)?;
                        Ok(teams.len())
                    }),
                )
            })
            .sum();
        info!("Wrote {} teams", count);
        Ok(())
    }

    fn process_rosters(&self) -> Result<()> {
        let files = InputFileType::Roster.glob(&self.opt.input)?;
        let rosters: Vec<_> = files
            .par_iter()
            .filter_map(|f| Self::log_failure(f, read_roster(f)))
            .collect();
        let players = unique_players(rosters.into_iter().flatten());
        self.writers.write_rows(OutputSchema::Player, &players)?;
        info!("Wrote {} players", players.len());
        Ok(())
    }

    fn process_event_file(&self, path: &Path) -> Result<usize> {
        let reader = RetrosheetReader::<BufReader<File>>::try_from(path)?;
        let file_info = reader.file_info.clone();
        debug!("Processing file {}", file_info.filename);

        let mut game_count = 0;
        for record_vec_result in reader {
            let record_vec = record_vec_result?;
            let game_context = match GameContext::new(&record_vec, &file_info) {
                Ok(gc) => gc,
                Err(e) => {
                    error!("{:?}", e);
                    continue;
                }
            };
            self.writers.write_game(&game_context)?;
            game_count += 1;
        }
        Ok(game_count)
    }

    fn process_events(&self) -> Result<()> {
        let files = InputFileType::Event.glob(&self.opt.input)?;
        let count: usize = files
            .par_iter()
            .filter_map(|f| Self::log_failure(f, self.process_event_file(f)))
            .sum();
        info!("Wrote {} games", count);
        Ok(())
    }

    pub fn process_files(&self) -> Result<()> {
        info!("Parsing team files");
        self.process_teams()?;

        info!("Parsing roster files");
        self.process_rosters()?;

        info!("Parsing event files");
        self.process_events()?;

        self.writers.flush_all()
    }
}

fn main() -> Result<()> {
    let opt: Opt = Opt::parse();
    let level = if opt.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to initialize trace")?;

    let start = Instant::now();
    FileProcessor::new(opt)?
        .process_files()
        .context("Error occurred while processing files")?;

    info!("Elapsed: {:?}", start.elapsed());
    Ok(())
}
