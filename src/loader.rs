use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::TabError;
use crate::engine::{ColumnDef, Record, Value};

#[derive(Debug)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// Rows plus the schema a page hands to the table engine.
pub struct Dataset {
    pub name: String,
    pub rows: Vec<Record>,
    pub columns: Vec<ColumnDef<Record>>,
    pub searchable_fields: Option<Vec<String>>,
    pub placeholder: Option<String>,
    pub page_size: Option<usize>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, rows: Vec<Record>, columns: Vec<ColumnDef<Record>>) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            searchable_fields: None,
            placeholder: None,
            page_size: None,
        }
    }
}

struct LoadedColumn {
    name: String,
    values: Vec<Value>,
    dtype: DataType,
}

/// Loads a CSV, Parquet or Arrow IPC file. Every file column becomes a plain,
/// sortable field column.
pub fn load_data_file(path: PathBuf) -> Result<Dataset, TabError> {
    let file_info = get_file_info(path)?;
    debug!("Loading {:?}", file_info);
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    // Each column is converted in its own rayon task.
    let start_time = Instant::now();
    let df = frame.collect()?;
    let columns: Vec<LoadedColumn> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect::<Result<_, PolarsError>>()?;

    if columns.is_empty() {
        return Err(TabError::EmptyDataset);
    }

    let schema = Arc::new(columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>());
    let nrows = columns[0].values.len();
    let rows: Vec<Record> = (0..nrows)
        .map(|ridx| {
            let values = columns.iter().map(|c| c.values[ridx].clone()).collect();
            Record::new(Arc::clone(&schema), values)
        })
        .collect();

    info!(
        "Loaded {} rows x {} columns ({} bytes) in {}ms",
        nrows,
        columns.len(),
        file_info.file_size,
        start_time.elapsed().as_millis()
    );
    for c in columns.iter() {
        debug!("Column \"{}\": {:?}", c.name, c.dtype);
    }

    let defs = columns
        .iter()
        .map(|c| ColumnDef::field(c.name.clone(), c.name.clone()))
        .collect();
    let name = file_info
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();

    Ok(Dataset::new(name, rows, defs))
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, TabError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TabError::FileNotFound,
        ErrorKind::PermissionDenied => TabError::PermissionDenied,
        _ => TabError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(TabError::LoadingFailed("Not a file!".into()));
    }

    Ok(FileInfo {
        file_type: detect_file_type(&path)?,
        file_size: metadata.len(),
        path,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, TabError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(TabError::UnknownFileType),
    }
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<LoadedColumn, PolarsError> {
    let dtype = df.column(col_name)?.dtype().clone();

    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let values = series
        .into_iter()
        .map(|value| match value {
            Some(s) => to_value(s, &dtype),
            None => Value::Null,
        })
        .collect();

    Ok(LoadedColumn {
        name: col_name.to_string(),
        values,
        dtype,
    })
}

// Numeric columns keep numeric values so they sort by magnitude.
fn to_value(s: &str, dtype: &DataType) -> Value {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => s.parse::<i64>().map(Value::Int).unwrap_or_else(|_| s.into()),
        DataType::UInt64 | DataType::Float32 | DataType::Float64 => {
            s.parse::<f64>().map(Value::Float).unwrap_or_else(|_| s.into())
        }
        DataType::Boolean => match s {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => s.into(),
        },
        _ => Value::Text(s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")),
    }
}
