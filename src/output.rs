//! Match serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::search::collector::Match;

/// Write one line per match, `distance,left,right`, in the order the
/// merge produced (worker order, scan order within a worker).
pub fn write_matches<W: Write>(mut writer: W, matches: &[Match]) -> Result<()> {
    for m in matches {
        writeln!(writer, "{},{},{}", m.distance, m.left, m.right)
            .context("write match line")?;
    }
    writer.flush().context("flush match output")?;
    Ok(())
}

/// Write matches to a file, replacing any existing content.
pub fn write_matches_to_path(path: &Path, matches: &[Match]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create match file {path:?}"))?;
    write_matches(BufWriter::new(file), matches)
}
