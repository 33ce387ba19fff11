pub mod format;

use std::io::Write;

use ansi_term::Style;
use format::format_gold;
use tracing::error;

use crate::tracker::{
    aggregation::Totals,
    editing::EditState,
    entities::{Activity, Snapshot, Tier, TierSet},
    SnapshotObserver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    align: Align,
    bold: bool,
}

impl Cell {
    fn left(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: Align::Left,
            bold: false,
        }
    }

    fn right(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: Align::Right,
            bold: false,
        }
    }

    fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Renders the whole calculator: a header with character names, one row per raid, and the totals.
/// `styled` turns on bold totals for terminals.
pub fn render_table(
    snapshot: &Snapshot,
    editing: Option<&EditState>,
    tiers: &TierSet,
    styled: bool,
) -> String {
    let totals = Totals::compute(snapshot);
    let mut rows = Vec::with_capacity(snapshot.activities.len() + 2);

    let mut header = vec![Cell::left("Raid")];
    header.extend(snapshot.characters.iter().enumerate().map(|(index, name)| {
        match editing.filter(|v| v.index == index) {
            Some(edit) => Cell::left(format!("{index}: [{}]", edit.buffer)),
            None => Cell::left(format!("{index}: {name}")),
        }
    }));
    header.push(Cell::right("Total"));
    rows.push(header);

    for (activity, (_, total)) in snapshot.activities.iter().zip(&totals.by_activity) {
        let mut row = vec![Cell::left(activity_label(activity, tiers))];
        row.extend((0..snapshot.characters.len()).map(|character| {
            let tier = snapshot.selections.get(activity.id, character);
            selection_cell(activity, tier)
        }));
        row.push(Cell::right(format_gold(*total)).bold());
        rows.push(row);
    }

    let mut footer = vec![Cell::left("Character total").bold()];
    footer.extend(
        totals
            .by_character
            .iter()
            .map(|v| Cell::right(format_gold(*v)).bold()),
    );
    footer.push(Cell::right(format_gold(totals.grand)).bold());
    rows.push(footer);

    layout(&rows, styled)
}

fn activity_label(activity: &Activity, tiers: &TierSet) -> String {
    let rewards = tiers
        .iter()
        .filter_map(|tier| activity.rewards.get(tier))
        .map(format_gold)
        .collect::<Vec<_>>();
    format!("#{} {} ({})", activity.id, activity.name, rewards.join("/"))
}

fn selection_cell(activity: &Activity, tier: Tier) -> Cell {
    match tier {
        Tier::None => Cell::right("-"),
        tier => Cell::right(format!("{tier} {}", format_gold(activity.rewards.amount(tier)))),
    }
}

fn layout(rows: &[Vec<Cell>], styled: bool) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..columns)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(Cell::width)
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");

    let mut output = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i == 1 || i + 1 == rows.len() {
            output.push_str(&separator);
            output.push('\n');
        }
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let padding = " ".repeat(width - cell.width());
                let text = if styled && cell.bold {
                    Style::new().bold().paint(cell.text.as_str()).to_string()
                } else {
                    cell.text.clone()
                };
                match cell.align {
                    Align::Left => format!(" {text}{padding} "),
                    Align::Right => format!(" {padding}{text} "),
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Prints the table every time the tracker changes.
pub struct TablePrinter<W> {
    out: W,
    tiers: TierSet,
    styled: bool,
}

impl<W: Write> TablePrinter<W> {
    pub fn new(out: W, tiers: TierSet, styled: bool) -> Self {
        Self { out, tiers, styled }
    }
}

impl<W: Write> SnapshotObserver for TablePrinter<W> {
    fn snapshot_changed(&mut self, snapshot: &Snapshot, editing: Option<&EditState>) {
        let table = render_table(snapshot, editing, &self.tiers, self.styled);
        if let Err(e) = writeln!(self.out, "{table}") {
            error!("Failed to print table {e:?}");
        }
    }
}
