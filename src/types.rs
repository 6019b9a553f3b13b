use serde::Serialize;
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Cell contents
//==============================================================================

/// Stored value of a cell. For formula cells this is the cached result.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Excel error literal such as `#DIV/0!`
    Error(String),
    /// Excel serial date-time (days since 1899-12-30)
    DateTime(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Short type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Bool(_) => "bool",
            CellValue::Error(_) => "error",
            CellValue::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) | CellValue::DateTime(n) => write!(f, "{}", n),
            CellValue::Text(s) | CellValue::Error(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Minimal cell style carried through the backend
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CellStyle {
    /// Excel number format code, e.g. `"0.00"` or `"yyyy-mm-dd"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    pub bold: bool,
    pub italic: bool,
    /// Background fill as `0xRRGGBB`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<u32>,
}

impl CellStyle {
    pub fn is_default(&self) -> bool {
        *self == CellStyle::default()
    }

    pub fn with_number_format(mut self, code: impl Into<String>) -> Self {
        self.number_format = Some(code.into());
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_fill_color(mut self, rgb: u32) -> Self {
        self.fill_color = Some(rgb);
        self
    }
}

/// Everything a backend stores for one cell
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CellContent {
    pub value: CellValue,
    /// Formula text without the leading `=`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    pub style: CellStyle,
}

impl CellContent {
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.formula.is_none() && self.style.is_default()
    }
}

/// What to write into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Value(CellValue),
    /// Formula (leading `=` optional) plus an optional cached result
    Formula {
        formula: String,
        cached: Option<CellValue>,
    },
}

impl CellInput {
    pub fn formula(formula: impl Into<String>) -> Self {
        CellInput::Formula {
            formula: formula.into(),
            cached: None,
        }
    }
}

impl From<CellValue> for CellInput {
    fn from(value: CellValue) -> Self {
        CellInput::Value(value)
    }
}

impl From<f64> for CellInput {
    fn from(n: f64) -> Self {
        CellInput::Value(CellValue::Number(n))
    }
}

impl From<bool> for CellInput {
    fn from(b: bool) -> Self {
        CellInput::Value(CellValue::Bool(b))
    }
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        CellInput::Value(CellValue::Text(s.to_string()))
    }
}

//==============================================================================
// Fetching
//==============================================================================

/// Which facet of a cell `fetch` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFormat {
    #[default]
    Value,
    Formula,
    Style,
    Cell,
}

impl FromStr for FetchFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "value" => Ok(FetchFormat::Value),
            "formula" => Ok(FetchFormat::Formula),
            "style" => Ok(FetchFormat::Style),
            "cell" => Ok(FetchFormat::Cell),
            other => Err(format!(
                "unknown format '{}' (expected value, formula, style or cell)",
                other
            )),
        }
    }
}

/// One fetched cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fetched {
    Value(CellValue),
    Formula(String),
    Style(CellStyle),
    Cell(CellContent),
}

impl Fetched {
    /// Project a cell onto the requested facet
    pub fn from_content(content: CellContent, format: FetchFormat) -> Self {
        match format {
            FetchFormat::Value => Fetched::Value(content.value),
            FetchFormat::Formula => match content.formula {
                Some(formula) => Fetched::Formula(formula),
                None => Fetched::Value(content.value),
            },
            FetchFormat::Style => Fetched::Style(content.style),
            FetchFormat::Cell => Fetched::Cell(content),
        }
    }
}

impl fmt::Display for Fetched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fetched::Value(v) => write!(f, "{}", v),
            Fetched::Formula(formula) => write!(f, "={}", formula),
            Fetched::Style(style) => write!(f, "{:?}", style),
            Fetched::Cell(content) => match &content.formula {
                Some(formula) => write!(f, "{} (={})", content.value, formula),
                None => write!(f, "{}", content.value),
            },
        }
    }
}

/// One element of a `fetch_range` result, mirroring the reference it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchedItem {
    Single(Fetched),
    Grid(Vec<Vec<Fetched>>),
}
