//! Interactive terminal browser for the art collection.
//!
//! Pages through records full-screen, with single-letter commands to step,
//! delete and edit. Edits round-trip through `$EDITOR` and the text-block
//! parser, so an edit can split one record into several by inserting
//! separator lines. Changes only touch the database file after an explicit
//! confirmation at the end of the session.

use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use tracing::{debug, info, warn};

use crate::config::WireFormat;
use crate::domain::ArtRecord;
use crate::import;
use crate::store::ArtCollection;

mod cursor;

pub use cursor::Cursor;

/// Browse `db` interactively, offering to persist to `db_path` on exit.
///
/// With `verbose` set the screen is not cleared between records so log
/// output stays visible.
pub async fn run(
    db: &mut ArtCollection,
    db_path: &Path,
    fmt: &WireFormat,
    verbose: bool,
) -> Result<()> {
    info!("Starting art browser ({} records)", db.len());

    let mut cursor = Cursor::new();

    'browsing: while !db.is_empty() {
        if !verbose {
            clear_screen()?;
        }

        let record = db.get(cursor.index())?.clone();
        let rule = "#".repeat(terminal_width());
        println!("{rule}");
        println!("{}", record.decode()?);
        println!("{rule}");

        loop {
            let answer = match prompt(&format!(
                "Art record #{}/{} -- N(ext) p(revious) d(elete) e(dit) q(uit): ",
                cursor.index() + 1,
                db.len()
            ))? {
                Some(line) => line,
                None => break 'browsing,
            };

            match answer.trim().to_lowercase().as_str() {
                "" | "n" | "next" => cursor.advance(db.len()),
                "p" | "previous" => cursor.retreat(db.len()),
                "d" | "delete" => {
                    info!("Removing record from collection");
                    db.remove(&record)?;
                    cursor.rebase(db.len());
                }
                "e" | "edit" => {
                    edit_record(db, &record, &cursor, fmt).await?;
                    cursor.rebase(db.len());
                }
                "q" | "quit" | "exit" => break 'browsing,
                other => {
                    warn!("unknown command: {other}");
                    continue;
                }
            }
            break;
        }
    }

    if !verbose {
        clear_screen()?;
    }
    info!("Done browsing, kept {} records", db.len());

    save_changes(db, db_path, fmt).await
}

/// Open the record in the user's editor and replace it with the result.
///
/// The edited file is re-read through the block parser, so separator lines
/// split it into multiple records, inserted at the cursor in file order.
async fn edit_record(
    db: &mut ArtCollection,
    record: &ArtRecord,
    cursor: &Cursor,
    fmt: &WireFormat,
) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .context("Failed to create editor scratch file")?;
    file.write_all(record.decode()?.as_bytes())?;
    file.flush()?;
    let path = file.into_temp_path();
    let scratch: &Path = &path;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    debug!("starting editor {editor} on {}", scratch.display());
    let status = Command::new(&editor)
        .arg(scratch)
        .status()
        .with_context(|| format!("Failed to launch editor: {editor}"))?;
    if !status.success() {
        warn!("editor exited with {status}, keeping record");
        return Ok(());
    }

    let payloads = import::parse_file(scratch, fmt).await?;

    db.remove(record)?;
    for (offset, payload) in payloads.iter().enumerate() {
        db.insert(cursor.index() + offset, ArtRecord::new(payload));
    }

    Ok(())
}

async fn save_changes(db: &ArtCollection, db_path: &Path, fmt: &WireFormat) -> Result<()> {
    loop {
        let answer = match prompt("Save updates to database [y/n]: ")? {
            Some(line) => line,
            None => return Ok(()),
        };

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                db.write(db_path, false, true, fmt).await?;
                return Ok(());
            }
            "n" | "no" => return Ok(()),
            _ => warn!("incorrect input"),
        }
    }
}

/// Print a prompt and read one line; `None` once stdin is closed.
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("Failed to read from terminal")?;

    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

fn terminal_width() -> usize {
    terminal::size().map(|(cols, _)| cols as usize).unwrap_or(80)
}

fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}
