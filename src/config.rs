//! Command-line configuration

use crate::game::{Dictionary, DictionaryError};
use crate::lobby::settings::{
    GameSettings, SettingsRejection, DEFAULT_INITIAL_LIVES, DEFAULT_MAX_TIME, DEFAULT_MIN_TIME,
};
use crate::network::DEFAULT_PORT;
use clap::Parser;
use directories::ProjectDirs;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Word list file name looked up in the data directory
const WORD_LIST_FILE: &str = "words.txt";

/// kaboom - authoritative server for a turn-based word bomb game
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on (the next free one is used if taken)
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to a newline-delimited word list
    #[arg(short, long)]
    pub words: Option<PathBuf>,

    /// Lives each player starts a game with
    #[arg(long, default_value_t = DEFAULT_INITIAL_LIVES)]
    pub lives: u32,

    /// Shortest bomb countdown, in seconds
    #[arg(long, default_value_t = DEFAULT_MIN_TIME)]
    pub min_time: u32,

    /// Longest bomb countdown, in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_TIME)]
    pub max_time: u32,

    /// Name advertised on the LAN (random if omitted)
    #[arg(long)]
    pub lobby_name: Option<String>,

    /// Do not advertise the room over mDNS
    #[arg(long)]
    pub no_mdns: bool,
}

/// Where the vocabulary comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    /// `--words`; failing to load it is fatal
    File(PathBuf),
    Embedded,
}

impl Cli {
    /// Initial settings from the command line
    pub fn settings(&self) -> Result<GameSettings, SettingsRejection> {
        let settings = GameSettings {
            initial_lives: self.lives,
            min_time: self.min_time,
            max_time: self.max_time,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// `--words`, else `words.txt` in the data directory, else the embedded list
    pub fn word_source(&self) -> WordSource {
        if let Some(path) = &self.words {
            return WordSource::File(path.clone());
        }
        match data_dir_word_list() {
            Some(path) => WordSource::File(path),
            None => WordSource::Embedded,
        }
    }

    pub fn load_dictionary(&self) -> Result<Arc<Dictionary>, DictionaryError> {
        match self.word_source() {
            WordSource::File(path) => Ok(Arc::new(Dictionary::load(&path)?)),
            WordSource::Embedded => Ok(Dictionary::embedded()),
        }
    }
}

/// `<data dir>/words.txt`, if present
fn data_dir_word_list() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kaboom")
        .map(|dirs| dirs.data_dir().join(WORD_LIST_FILE))
        .filter(|path| path.is_file())
}
