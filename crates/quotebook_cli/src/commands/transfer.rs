//! Export and import commands.

use super::CliWidget;
use crate::widget::Reply;
use std::io::Read;
use std::path::Path;

/// Writes the collection to `output`, or to stdout when `output` is `-`.
pub fn export(widget: &CliWidget, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if output == Path::new("-") {
        println!("{}", widget.export_json()?);
        return Ok(());
    }

    widget.export_to_file(output)?;
    println!("{}", Reply::ExportedTo(output.to_path_buf()));
    Ok(())
}

/// Merges the quotes in `file` into the collection; `-` reads stdin.
pub fn import(widget: &CliWidget, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if file == Path::new("-") {
        let mut document = String::new();
        std::io::stdin().read_to_string(&mut document)?;
        let count = widget.import_json(&document)?;
        println!("{}", Reply::Imported(count));
        return Ok(());
    }

    let count = widget
        .import_from_file(file)
        .map_err(|e| format!("Failed to import {}: {e}", file.display()))?;
    println!("{}", Reply::Imported(count));
    Ok(())
}
