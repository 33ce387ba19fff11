pub mod confirm;
pub mod interactive;
pub mod output;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use confirm::{Answered, PromptConfirm};
use interactive::run_session;
use output::{render_table, TablePrinter};
use tokio::io::BufReader;
use tracing::info;

use crate::{
    storage::{kv_store::FileKeyValueStore, snapshot_store::SnapshotStore},
    tracker::{
        entities::{ActivityId, Rewards, Tier, TierSet},
        transitions::ActivityDraft,
        Action, Confirm, Outcome, Tracker,
    },
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::LogSettings,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Weekgold", version, long_about = None)]
#[command(about = "Calculator for weekly raid gold across your characters", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value_t = TierSet::default(),
        help = "Reward tiers raids offer, comma separated. For example \"normal,hard\""
    )]
    tiers: TierSet,
    #[arg(long, global = true, help = "Don't use terminal styling in the table")]
    plain: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    #[command(about = "Print the table. This is the default")]
    Show,
    #[command(about = "Add a raid. Gold is required for every configured tier")]
    Add {
        name: String,
        #[arg(long, help = "Gold for single mode")]
        single: Option<u64>,
        #[arg(long, help = "Gold for normal mode")]
        normal: Option<u64>,
        #[arg(long, help = "Gold for hard mode")]
        hard: Option<u64>,
    },
    #[command(about = "Delete a raid with all of its selections")]
    Delete { id: ActivityId },
    #[command(about = "Rename a character. Characters are numbered from 0")]
    Rename { index: usize, name: String },
    #[command(about = "Choose the tier a character runs a raid on")]
    Select {
        activity: ActivityId,
        character: usize,
        #[arg(value_enum)]
        tier: Tier,
    },
    #[command(about = "Throw everything away and start from the defaults")]
    Reset {
        #[arg(long, short, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Edit the table interactively, one command per line")]
    Interactive,
}

impl Commands {
    /// The tracker action behind a one-shot command, if there is one.
    fn action(&self) -> Option<Action> {
        match self {
            Commands::Show | Commands::Interactive | Commands::Reset { .. } => None,
            Commands::Add {
                name,
                single,
                normal,
                hard,
            } => Some(Action::AddActivity(ActivityDraft {
                name: name.clone(),
                rewards: Rewards {
                    single_gold: *single,
                    normal_gold: *normal,
                    hard_gold: *hard,
                },
            })),
            Commands::Delete { id } => Some(Action::DeleteActivity(*id)),
            Commands::Rename { index, name } => Some(Action::RenameCharacter {
                index: *index,
                name: name.clone(),
            }),
            Commands::Select {
                activity,
                character,
                tier,
            } => Some(Action::SetSelection {
                activity: *activity,
                character: *character,
                tier: *tier,
            }),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    LogSettings::new(&app_dir, args.log).init()?;

    let store = SnapshotStore::new(FileKeyValueStore::new(app_dir)?);
    let mut tracker = Tracker::open(store, args.tiers.clone()).await?;
    let styled = !args.plain;
    let print = |tracker: &Tracker<FileKeyValueStore>| {
        println!(
            "{}",
            render_table(tracker.snapshot(), tracker.editing(), tracker.tiers(), styled)
        );
    };

    match args.commands.unwrap_or(Commands::Show) {
        Commands::Show => print(&tracker),
        Commands::Interactive => {
            print(&tracker);
            tracker.subscribe(Box::new(TablePrinter::new(
                io::stdout(),
                args.tiers,
                styled,
            )));
            run_session(&mut tracker, BufReader::new(tokio::io::stdin()), io::stdout()).await?;
        }
        Commands::Reset { yes } => {
            let outcome = if yes {
                tracker.dispatch(Action::Reset, &mut Answered(true)).await?
            } else {
                let mut confirm =
                    PromptConfirm::new(BufReader::new(tokio::io::stdin()), io::stdout());
                tracker.dispatch(Action::Reset, &mut confirm).await?
            };
            report(outcome)?;
            print(&tracker);
        }
        command => {
            if let Some(action) = command.action() {
                let outcome = dispatch_once(&mut tracker, action, &mut Answered(false)).await?;
                report(outcome)?;
                print(&tracker);
            }
        }
    }
    Ok(())
}

async fn dispatch_once(
    tracker: &mut Tracker<FileKeyValueStore>,
    action: Action,
    confirm: &mut impl Confirm,
) -> Result<Outcome> {
    info!("Running {action:?}");
    tracker.dispatch(action, confirm).await
}

/// Turns a rejected action into an error so the process exits with a failure.
fn report(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Changed | Outcome::ViewChanged => Ok(()),
        Outcome::Declined => {
            println!("Nothing was reset.");
            Ok(())
        }
        Outcome::Rejected(e) => Err(e.into()),
    }
}
