use crate::config::SessionConfig;
use crate::error::{XlError, XlResult};
use crate::excel::XlsxBackend;
use crate::reference::{resolve_mixed, RefInput, Resolved};
use crate::session::{Session, DEFAULT_SHEET};
use crate::types::{FetchFormat, Fetched, FetchedItem};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A workbook file split the way the session addresses it
#[derive(Debug, PartialEq, Eq)]
struct WorkbookPath {
    directory: PathBuf,
    name: String,
    extension: Option<String>,
}

/// Split `dir/name.ext`; a bare name falls back to the configured directory
fn split_path(file: &Path, config: &SessionConfig) -> XlResult<WorkbookPath> {
    let name = file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| XlError::NotFound(file.display().to_string()))?
        .to_string();

    let directory = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => config.default_directory.clone(),
    };

    let extension = file
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_string);

    Ok(WorkbookPath {
        directory,
        name,
        extension,
    })
}

fn parse_refs(refs: &[String]) -> XlResult<Vec<RefInput>> {
    refs.iter().map(|r| r.parse()).collect()
}

/// Open a single workbook and select it
fn open_one(file: &Path, config: &SessionConfig) -> XlResult<(Session<XlsxBackend>, WorkbookPath)> {
    let target = split_path(file, config)?;
    let mut session = Session::with_config(XlsxBackend, config.clone());
    session.open(
        &[target.name.as_str()],
        Some(target.directory.as_path()),
        target.extension.as_deref(),
    )?;
    Ok((session, target))
}

#[derive(Serialize)]
struct LabeledResolved<'a> {
    reference: String,
    resolved: &'a Resolved,
}

#[derive(Serialize)]
struct LabeledFetched<'a> {
    reference: String,
    result: &'a FetchedItem,
}

/// Execute the resolve command
pub fn resolve(refs: Vec<String>, json: bool) -> XlResult<()> {
    let inputs = parse_refs(&refs)?;
    let resolved = resolve_mixed(&inputs)?;

    if json {
        let labeled: Vec<_> = inputs
            .iter()
            .zip(&resolved)
            .map(|(input, resolved)| LabeledResolved {
                reference: input.to_string(),
                resolved,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&labeled)?);
        return Ok(());
    }

    for (input, resolved) in inputs.iter().zip(&resolved) {
        println!("{}", input.to_string().bright_blue().bold());
        match resolved {
            Resolved::Cell(coord) => {
                println!("   {} → column {}, row {}", coord.to_a1(), coord.column(), coord.row());
            }
            Resolved::Grid(grid) => {
                println!("   {} rows × {} columns", grid.height(), grid.width());
                for row in grid.rows() {
                    let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                    println!("   {}", cells.join(" "));
                }
            }
        }
    }

    Ok(())
}

/// Execute the fetch command
pub fn fetch(
    file: PathBuf,
    refs: Vec<String>,
    sheet: Option<String>,
    format: FetchFormat,
    json: bool,
    config: SessionConfig,
) -> XlResult<()> {
    let (mut session, _) = open_one(&file, &config)?;
    if let Some(ref sheet) = sheet {
        session.use_sheet(sheet)?;
    }

    let inputs = parse_refs(&refs)?;
    let items = session.fetch_range(&inputs, format)?;

    if json {
        let labeled: Vec<_> = inputs
            .iter()
            .zip(&items)
            .map(|(input, result)| LabeledFetched {
                reference: input.to_string(),
                result,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&labeled)?);
        return Ok(());
    }

    println!("{}", "📊 xlkit - Fetch".bold().green());
    println!("   File:  {}", file.display());
    println!(
        "   Sheet: {}\n",
        session.active_sheet_name().unwrap_or("-").cyan()
    );

    for (input, item) in inputs.iter().zip(&items) {
        match item {
            FetchedItem::Single(fetched) => {
                println!("   {} = {}", input.to_string().bright_blue(), display(fetched));
            }
            FetchedItem::Grid(rows) => {
                println!("   {}", input.to_string().bright_blue());
                for row in rows {
                    let cells: Vec<String> = row.iter().map(display).collect();
                    println!("      {}", cells.join("\t"));
                }
            }
        }
    }
    println!();

    Ok(())
}

fn display(fetched: &Fetched) -> String {
    match fetched {
        Fetched::Value(v) if v.is_empty() => "(empty)".dimmed().to_string(),
        Fetched::Cell(content) => {
            let kind = format!("[{}]", content.value.type_name());
            format!("{} {}", fetched, kind.dimmed()).trim_start().to_string()
        }
        other => other.to_string(),
    }
}

/// Execute the sheets command
pub fn sheets(file: PathBuf, config: SessionConfig) -> XlResult<()> {
    let (session, _) = open_one(&file, &config)?;
    let workbook = session.workbook(None)?;

    println!("{}", "📋 xlkit - Sheets".bold().green());
    println!("   File: {}\n", file.display());

    for sheet in workbook.sheets() {
        let bounds = match sheet.used_bounds() {
            Some((start, end)) => format!("{}:{}", start.to_a1(), end.to_a1()),
            None => "empty".to_string(),
        };
        println!(
            "   {}  {}  ({} cells)",
            sheet.name().bright_blue().bold(),
            bounds.cyan(),
            sheet.len()
        );
    }
    println!();

    Ok(())
}

/// Execute the create command
pub fn create(file: PathBuf, sheets: Vec<String>, config: SessionConfig) -> XlResult<()> {
    let target = split_path(&file, &config)?;
    let mut session = Session::with_config(XlsxBackend, config);

    session.add_workbook(&target.name, true)?;
    for sheet in &sheets {
        if sheet != DEFAULT_SHEET {
            session.add_sheet(sheet, None, false)?;
        }
    }
    if !sheets.is_empty() && !sheets.iter().any(|s| s == DEFAULT_SHEET) {
        session.delete_sheet(DEFAULT_SHEET, None)?;
    }

    let path = session.save(Some(target.directory.as_path()), target.extension.as_deref())?;

    println!("{}", "✅ Workbook created".bold().green());
    println!("   File:   {}", path.display());
    println!("   Sheets: {}\n", session.list_sheets(None)?.join(", ").cyan());

    Ok(())
}

/// Execute the save-as command
pub fn save_as(
    file: PathBuf,
    names: Vec<String>,
    out_dir: Option<PathBuf>,
    config: SessionConfig,
) -> XlResult<()> {
    let (session, source) = open_one(&file, &config)?;
    let directory = out_dir.unwrap_or(source.directory);

    let saved = session.save_as(names.as_slice(), Some(directory.as_path()), source.extension.as_deref())?;

    println!("{}", "✅ Saved copies".bold().green());
    for path in saved {
        println!("   {}", path.display());
    }
    println!();

    Ok(())
}
