//! Report rendering.

use std::io::Write;

use anyhow::Result;

use gambit_engine::TransferReport;

/// Writes one transfer report, human-readable or JSON.
pub fn emit(out: &mut impl Write, report: &TransferReport, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        write!(out, "{report}")?;
    }
    Ok(())
}
