//! Command-line interface

use std::path::PathBuf;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::storage;
use crate::store::TaskStore;
use crate::ui::{self, App};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Keep a to-do list in a flat file")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Task file, overrides the config
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all tasks
    List {
        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many tasks are done
    Stats,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut config = Config::load(&self.config);
        if let Some(file) = self.file {
            config.file = file;
        }
        let mut store = storage::load(&config.file);
        store.set_due_offset(TimeDelta::days(config.due_in_days));

        match self.command {
            Some(Command::List { json }) => list(&store, json),
            Some(Command::Stats) => {
                println!("{}", stats_line(&store));
                Ok(())
            }
            None => {
                let app = App::new(store, config.category_options());
                ui::run(app, &config.file)?;
                Ok(())
            }
        }
    }
}

fn list(store: &TaskStore, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(store.tasks())?);
        return Ok(());
    }
    for task in store {
        println!(
            "[{}] {} ({}, {}, due {})",
            if task.done { "x" } else { " " },
            task.text,
            task.category,
            task.priority,
            task.due_date_label()
        );
    }
    Ok(())
}

pub fn stats_line(store: &TaskStore) -> String {
    format!(
        "{}/{} ({:.0}%)",
        store.done_count(),
        store.len(),
        store.completion_fraction() * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::deserialize;

    #[test]
    fn stats_line_reports_fraction() {
        assert_eq!(stats_line(&TaskStore::new()), "0/0 (0%)");
        let store = deserialize(
            "\"a\",1,Work,High,1\n\"b\",0,Work,High,1\n\"c\",1,Work,High,1\n\"d\",0,Work,High,1\n",
        );
        assert_eq!(stats_line(&store), "2/4 (50%)");
    }

    #[test]
    fn file_flag_is_global() {
        let cli = Cli::try_parse_from(["todo", "list", "--file", "other.csv"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("other.csv")));
        assert!(matches!(cli.command, Some(Command::List { json: false })));
    }
}
