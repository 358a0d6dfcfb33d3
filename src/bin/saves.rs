//! Save Store Binary
//!
//! Inspects and clears a directory of session snapshots.

use calpoker::save::*;
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "saves")]
    dir: std::path::PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    #[command(about = "List saves, newest first", alias = "ls")]
    List,
    #[command(about = "Print one save as JSON")]
    Show {
        #[arg(required = true)]
        id: String,
    },
    #[command(about = "Find the newest fresh save shared with a peer")]
    Match {
        #[arg(required = true)]
        peer: Vec<String>,
    },
    #[command(about = "Delete every save")]
    Clear,
}

fn main() -> anyhow::Result<()> {
    calpoker::log();
    let args = Args::parse();
    let saves = Saves::open(&args.dir)?;
    match args.command {
        Command::List => {
            let now = now();
            for entry in saves.list()? {
                let age = now.saturating_sub(entry.saved_at);
                let stale = match age > calpoker::STALE_SAVE_SECS {
                    true => " (stale)",
                    false => "",
                };
                println!("{:<32} {:>6}s ago{}", entry.id, age, stale);
            }
        }
        Command::Show { id } => match saves.load(&id)? {
            Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            None => log::warn!("[saves] no save {}", id),
        },
        Command::Match { peer } => match saves.find_matching(&peer)? {
            Some(id) => println!("{}", id),
            None => log::info!("[saves] nothing in common"),
        },
        Command::Clear => {
            saves.clear()?;
            log::info!("[saves] cleared {}", saves.root().display());
        }
    }
    Ok(())
}
