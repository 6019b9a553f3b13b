use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xlkit::cli;
use xlkit::config::SessionConfig;
use xlkit::types::FetchFormat;

#[derive(Parser)]
#[command(name = "xlkit")]
#[command(about = "Resolve A1 references and read or copy xlsx workbooks.")]
#[command(long_about = "xlkit - A1 reference resolution and xlsx workbook sessions

COMMANDS:
  resolve   - Convert references like B3 or A1:C4 to coordinates
  fetch     - Read cells from a workbook
  sheets    - List the sheets of a workbook
  create    - Create a new workbook
  save-as   - Copy a workbook under new names

EXAMPLES:
  xlkit resolve AB27 B10:A1 3,7
  xlkit fetch data/Budget.xlsx C10 A1:B4 --format formula
  xlkit create out/Report.xlsx --sheet Summary --sheet Data
  xlkit save-as data/Budget.xlsx Budget2024 Budget2025 --out-dir archive

Set RUST_LOG=xlkit=info for session diagnostics on stderr.")]
#[command(version)]
struct Cli {
    /// Directory used for bare workbook names
    #[arg(long, global = true, env = "XLKIT_DIR", default_value = "./")]
    dir: PathBuf,

    /// Extension used when a workbook path has none
    #[arg(long, global = true, env = "XLKIT_EXT", default_value = "xlsx")]
    ext: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Resolve cell references, ranges or column,row pairs.

Columns use bijective base-26 letters (A=1, Z=26, AA=27) and rows are 1-based.
Range corners may be given in any order; the grid is always row-major from the
top-left cell.

EXAMPLES:
  xlkit resolve B3            # (2, 3)
  xlkit resolve B10:A1        # same grid as A1:B10
  xlkit resolve A1 3,7 --json")]
    /// Resolve references to numeric coordinates
    Resolve {
        /// References: A1, A1:B2 or column,row
        #[arg(required = true)]
        refs: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Fetch cells from a workbook.

Formats:
  value    - the cell value (formula cells give their cached result)
  formula  - the formula, or the value when the cell has none
  style    - number format, bold, italic and fill colour
  cell     - all of the above

EXAMPLES:
  xlkit fetch Budget.xlsx C10
  xlkit fetch Budget.xlsx A1:D5 --sheet Q2 --format formula --json")]
    /// Read cells from a workbook
    Fetch {
        /// Workbook file (dir/name.xlsx)
        file: PathBuf,

        /// References: A1, A1:B2 or column,row
        #[arg(required = true)]
        refs: Vec<String>,

        /// Sheet to read (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// What to return for each cell
        #[arg(short, long, default_value = "value")]
        format: FetchFormat,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Workbook file (dir/name.xlsx)
        file: PathBuf,
    },

    /// Create a new workbook
    Create {
        /// Workbook file to write (dir/name.xlsx)
        file: PathBuf,

        /// Sheet to add (repeatable, default: Sheet1)
        #[arg(short, long = "sheet")]
        sheets: Vec<String>,
    },

    /// Copy a workbook under one or more new names
    SaveAs {
        /// Source workbook file (dir/name.xlsx)
        file: PathBuf,

        /// New workbook names, without extension
        #[arg(required = true)]
        names: Vec<String>,

        /// Output directory (default: the source directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xlkit=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SessionConfig::default()
        .with_directory(cli.dir)
        .with_extension(cli.ext);

    match cli.command {
        Commands::Resolve { refs, json } => cli::resolve(refs, json)?,

        Commands::Fetch {
            file,
            refs,
            sheet,
            format,
            json,
        } => cli::fetch(file, refs, sheet, format, json, config)?,

        Commands::Sheets { file } => cli::sheets(file, config)?,

        Commands::Create { file, sheets } => cli::create(file, sheets, config)?,

        Commands::SaveAs {
            file,
            names,
            out_dir,
        } => cli::save_as(file, names, out_dir, config)?,
    }

    Ok(())
}
