use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_RAW_PATH, DEFAULT_TABLE_PATH, RAW_PATH_ENV, TABLE_PATH_ENV};
use crate::data::filter::{Choice, FilterState};
use crate::data::model::{PrizeTable, RoleSimple};

#[derive(Parser, Debug)]
#[command(name = "prizes", version, about = "Clean and summarize literary prize records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize raw records into the dashboard table.
    Clean {
        #[arg(long, env = RAW_PATH_ENV, default_value = DEFAULT_RAW_PATH)]
        input: PathBuf,
        #[arg(long, env = TABLE_PATH_ENV, default_value = DEFAULT_TABLE_PATH)]
        output: PathBuf,
    },
    /// Print summary statistics and the genre distribution for a filter state.
    Summary {
        #[arg(long, env = TABLE_PATH_ENV, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, help = "Print every view as JSON")]
        json: bool,
    },
    /// Write the filtered row listing as CSV.
    Export {
        #[arg(long, env = TABLE_PATH_ENV, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, help = "Destination file (stdout when omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "First year to include")]
    pub from: Option<i32>,
    #[arg(long, help = "Last year to include")]
    pub to: Option<i32>,
    #[arg(long = "genre", help = "Genre to include (repeatable; all when omitted)")]
    pub genres: Vec<String>,
    #[arg(long, default_value = "All", help = "Winner, Shortlisted, Other or All")]
    pub role: Choice<RoleSimple>,
    #[arg(long, default_value = "All")]
    pub gender: Choice<String>,
    #[arg(long, help = "Only UK residents")]
    pub uk_only: bool,
    #[arg(long, default_value = "All", help = "Highest degree (demographics only)")]
    pub degree: Choice<String>,
}

impl FilterArgs {
    /// Turn the flags into a filter state. An open end of the year range is
    /// taken from the table's bounds.
    pub fn to_filter_state(&self, table: &PrizeTable) -> FilterState {
        let year_range = match (self.from, self.to, table.year_bounds()) {
            (None, None, _) => None,
            (from, to, Some((lo, hi))) => Some((from.unwrap_or(lo), to.unwrap_or(hi))),
            (from, to, None) => Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))),
        };
        let genres = if self.genres.is_empty() {
            None
        } else {
            Some(self.genres.iter().cloned().collect::<BTreeSet<_>>())
        };

        FilterState {
            year_range,
            genres,
            role: self.role.clone(),
            gender: self.gender.clone(),
            uk_only: self.uk_only,
            degree: self.degree.clone(),
        }
    }
}
