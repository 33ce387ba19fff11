use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::{
    storage::kv_store::KeyValueStore,
    tracker::{
        entities::{Rewards, Tier, TierSet},
        transitions::ActivityDraft,
        Action, Outcome, Tracker, RESET_PROMPT,
    },
};

use super::{
    confirm::{is_yes, Answered},
    output::render_table,
};

const HELP: &str = "\
Commands:
  show                                   print the table
  add <name> <gold per tier...>          add a raid, one amount per configured tier
  delete <raid id>                       delete a raid
  select <raid id> <character> <tier>    pick none/single/normal/hard for a character
  rename <character> <name>              rename a character
  edit <character>                       start editing a character name
  type <text>                            replace the name being edited
  commit                                 save the name being edited (Enter)
  cancel                                 throw the edit away (Escape)
  reset                                  restore the defaults, asks first
  help                                   show this text
  quit                                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Dispatch(Action),
    Show,
    Help,
    Quit,
}

/// Parses one line of the interactive session. Blank lines give [None].
pub fn parse_line(line: &str, tiers: &TierSet) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    let Some((command, rest)) = split_word(line) else {
        return Ok(None);
    };
    let command = match command.to_lowercase().as_str() {
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        "add" => SessionCommand::Dispatch(Action::AddActivity(parse_draft(rest, tiers)?)),
        "delete" => {
            SessionCommand::Dispatch(Action::DeleteActivity(parse_number(rest, "raid id")?))
        }
        "select" => {
            let args = rest.split_whitespace().collect::<Vec<_>>();
            let [activity, character, tier] = args.as_slice() else {
                return Err("Usage: select <raid id> <character> <tier>".into());
            };
            SessionCommand::Dispatch(Action::SetSelection {
                activity: parse_number(activity, "raid id")?,
                character: parse_number(character, "character")?,
                tier: <Tier as clap::ValueEnum>::from_str(tier, true)
                    .map_err(|_| format!("Unknown tier {tier:?}"))?,
            })
        }
        "rename" => {
            let Some((index, name)) = split_word(rest) else {
                return Err("Usage: rename <character> <name>".into());
            };
            SessionCommand::Dispatch(Action::RenameCharacter {
                index: parse_number(index, "character")?,
                name: name.to_string(),
            })
        }
        "edit" => SessionCommand::Dispatch(Action::BeginEdit(parse_number(rest, "character")?)),
        "type" => SessionCommand::Dispatch(Action::EditInput(rest.to_string())),
        "commit" => SessionCommand::Dispatch(Action::CommitEdit),
        "cancel" => SessionCommand::Dispatch(Action::CancelEdit),
        "reset" => SessionCommand::Dispatch(Action::Reset),
        other => return Err(format!("Unknown command {other:?}, try \"help\"")),
    };
    Ok(Some(command))
}

fn split_word(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((line, "")),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Expected a number for {what}, got {value:?}"))
}

/// `<name...> <amount>...` with one amount per configured tier, in tier order.
fn parse_draft(rest: &str, tiers: &TierSet) -> Result<ActivityDraft, String> {
    let words = rest.split_whitespace().collect::<Vec<_>>();
    let tier_count = tiers.iter().count();
    let usage = || {
        format!(
            "Usage: add <name> {}",
            tiers
                .iter()
                .map(|v| format!("<{v} gold>"))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    if words.len() < tier_count {
        return Err(usage());
    }
    let (name, amounts) = words.split_at(words.len() - tier_count);
    let rewards = tiers
        .iter()
        .zip(amounts)
        .try_fold(Rewards::default(), |rewards, (tier, amount)| {
            let amount = amount.replace(',', "");
            amount
                .parse::<u64>()
                .map(|v| rewards.with(tier, v))
                .map_err(|_| usage())
        })?;
    Ok(ActivityDraft {
        name: name.join(" "),
        rewards,
    })
}

/// Runs commands from `input` until it ends or `quit` is entered. The table itself is printed by
/// whatever observers the tracker has, `out` only gets messages.
pub async fn run_session<S, R, W>(tracker: &mut Tracker<S>, input: R, mut out: W) -> Result<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let tiers = tracker.tiers().clone();
    let mut lines = input.lines();
    writeln!(out, "Type \"help\" for a list of commands.")?;

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line, &tiers) {
            Ok(Some(v)) => v,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!("Session command {command:?}");

        let action = match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            SessionCommand::Show => {
                writeln!(
                    out,
                    "{}",
                    render_table(tracker.snapshot(), tracker.editing(), &tiers, false)
                )?;
                continue;
            }
            SessionCommand::Dispatch(action) => action,
        };

        // The answer to the reset question is the next line of input.
        let mut confirm = Answered(false);
        if action == Action::Reset {
            write!(out, "{RESET_PROMPT} [y/N] ")?;
            out.flush()?;
            let answer = lines.next_line().await?.unwrap_or_default();
            confirm = Answered(is_yes(&answer));
        }

        match tracker.dispatch(action, &mut confirm).await? {
            Outcome::Changed | Outcome::ViewChanged => {}
            Outcome::Declined => writeln!(out, "Nothing was reset.")?,
            Outcome::Rejected(e) => writeln!(out, "Error: {e}")?,
        }
    }

    if tracker.editing().is_some() {
        tracker.dispatch(Action::CommitEdit, &mut Answered(false)).await?;
    }
    info!("Interactive session finished");
    Ok(())
}
