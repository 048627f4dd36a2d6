//! Command-line interface for artdb.
//!
//! Provides commands for serving the collection over HTTP, loading art from
//! text files, writing records back out as text files, and interactive
//! browsing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::browse;
use crate::config::WireFormat;
use crate::domain::ArtRecord;
use crate::export::{self, ExportOptions};
use crate::import;
use crate::serve;
use crate::store::ArtCollection;

/// artdb - ASCII art database and server
#[derive(Parser, Debug)]
#[command(name = "artdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Server port
        #[arg(short = 'P', long, default_value_t = 80)]
        port: u16,

        /// Address to listen on
        #[arg(short = 'l', long, default_value = "0.0.0.0")]
        listen_address: String,

        /// Database file
        db: PathBuf,
    },

    /// Load art from text files
    Load {
        /// Output database file (prints the database to stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Append to the output database instead of starting fresh
        #[arg(short, long)]
        append: bool,

        /// Remove blank lines at the top/bottom of each record
        #[arg(short, long)]
        trim: bool,

        /// Base64-encode the database file
        #[arg(long)]
        b64: bool,

        /// Do not line-wrap the base64 database file
        #[arg(long)]
        no_wrap: bool,

        /// Art text files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write records back out as text files
    Write {
        /// File name prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// File name suffix
        #[arg(short, long, default_value = "")]
        suffix: String,

        /// File extension
        #[arg(short, long, default_value = "txt")]
        extension: String,

        /// Write all records to one file
        #[arg(short = 'o', long)]
        one_file: bool,

        /// Base64-encode each record
        #[arg(long)]
        b64: bool,

        /// Database file
        db: PathBuf,

        /// Target directory (or target file with --one-file)
        target: PathBuf,
    },

    /// Display and browse records
    Browse {
        /// Database file
        db: PathBuf,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let fmt = WireFormat::default();

        match self.command {
            Commands::Serve {
                port,
                listen_address,
                db,
            } => {
                let collection = open_existing(&db, &fmt).await?;
                serve::run(collection, &listen_address, port).await
            }
            Commands::Load {
                out,
                append,
                trim,
                b64,
                no_wrap,
                files,
            } => load_files(out, append, trim, b64, no_wrap, files, &fmt).await,
            Commands::Write {
                prefix,
                suffix,
                extension,
                one_file,
                b64,
                db,
                target,
            } => {
                let collection = open_existing(&db, &fmt).await?;
                let opts = ExportOptions {
                    prefix,
                    suffix,
                    extension,
                    one_file,
                    base64: b64,
                };
                export::write_records(&collection, &target, &opts, &fmt).await
            }
            Commands::Browse { db } => {
                let mut collection = open_existing(&db, &fmt).await?;
                browse::run(&mut collection, &db, &fmt, self.verbose).await
            }
        }
    }
}

/// Open a database that must already exist on disk.
async fn open_existing(path: &Path, fmt: &WireFormat) -> Result<ArtCollection> {
    if !path.is_file() {
        bail!("{} does not exist", path.display());
    }

    ArtCollection::open(path, fmt)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))
}

/// Import art blocks from text files into a (possibly preloaded) database.
async fn load_files(
    out: Option<PathBuf>,
    append: bool,
    trim: bool,
    b64: bool,
    no_wrap: bool,
    files: Vec<PathBuf>,
    fmt: &WireFormat,
) -> Result<()> {
    let mut db = ArtCollection::new();

    if append {
        match &out {
            None => warn!("Cannot append, no output database file given"),
            Some(path) if !path.is_file() => {
                warn!("Cannot append, database file does not exist yet")
            }
            Some(path) => {
                db = ArtCollection::open(path, fmt)
                    .await
                    .with_context(|| format!("Failed to open database: {}", path.display()))?;
            }
        }
    }

    info!("Loading {} files", files.len());
    for file in &files {
        let payloads = import::parse_file(file, fmt).await?;
        for payload in payloads {
            let mut record = ArtRecord::new(&payload);
            if trim {
                record = record.trimmed()?;
            }
            db.add(record);
        }
        info!("{} unique art records loaded", db.len());
    }

    match out {
        None => println!("{}", db.to_json()?),
        Some(path) => db.write(&path, b64, !no_wrap, fmt).await?,
    }

    Ok(())
}
