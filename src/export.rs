//! Export database records back out as text files.
//!
//! Two layouts: one file per record (named with a unique token so repeated
//! exports never clobber each other) or a single combined file with records
//! delimited by the separator line, ready for re-import. Record bodies are
//! written as decoded text, or base64-wrapped at the configured width when
//! requested; base64 bodies carry no header/footer markers since the importer
//! auto-detects encoding per block.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::WireFormat;
use crate::domain::ArtRecord;
use crate::store::{codec, ArtCollection};

/// File naming and layout options for an export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Prepended to each generated file name.
    pub prefix: String,

    /// Appended to each generated file name, before the extension.
    pub suffix: String,

    /// File extension, without the dot.
    pub extension: String,

    /// Concatenate all records into the target file instead of writing a
    /// file per record.
    pub one_file: bool,

    /// Base64-encode each record body.
    pub base64: bool,
}

/// Write all records of `db` under `target` according to `opts`.
///
/// In per-file mode `target` must be an existing directory; in one-file mode
/// it is the output file itself.
pub async fn write_records(
    db: &ArtCollection,
    target: &Path,
    opts: &ExportOptions,
    fmt: &WireFormat,
) -> Result<()> {
    if opts.one_file {
        write_combined(db, target, opts, fmt).await
    } else {
        write_individual(db, target, opts, fmt).await
    }
}

async fn write_combined(
    db: &ArtCollection,
    target: &Path,
    opts: &ExportOptions,
    fmt: &WireFormat,
) -> Result<()> {
    let mut document = String::new();
    for record in db {
        document.push_str(&render_body(record, opts, fmt)?);
        document.push('\n');
        document.push_str(&fmt.separator);
        document.push('\n');
    }

    fs::write(target, document)
        .await
        .with_context(|| format!("Failed to write art file: {}", target.display()))?;

    info!("{} records written to {}", db.len(), target.display());
    Ok(())
}

async fn write_individual(
    db: &ArtCollection,
    target: &Path,
    opts: &ExportOptions,
    fmt: &WireFormat,
) -> Result<()> {
    if !target.is_dir() {
        bail!("{} is not a directory", target.display());
    }

    for record in db {
        let file_name = format!(
            "{}{}{}.{}",
            opts.prefix,
            Uuid::new_v4(),
            opts.suffix,
            opts.extension
        );
        let path = target.join(file_name);

        debug!("writing record {} to {}", record.identity(), path.display());
        fs::write(&path, render_body(record, opts, fmt)?)
            .await
            .with_context(|| format!("Failed to write art file: {}", path.display()))?;
    }

    info!("{} records written to {}", db.len(), target.display());
    Ok(())
}

fn render_body(record: &ArtRecord, opts: &ExportOptions, fmt: &WireFormat) -> Result<String> {
    if opts.base64 {
        // The stored content is already the canonical base64 of the text.
        Ok(codec::wrap_text(record.content(), fmt.wrap_width))
    } else {
        Ok(record.decode()?)
    }
}
