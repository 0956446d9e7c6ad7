//! 将每个受试者的形态学统计表格汇总为一个 CSV.
//!
//! 输入布局:
//!
//! ```text
//! <root>/<subject>/<...>axon_morphometrics.xlsx
//! ```
//!
//! 每张表只读取第一个工作表, 其第一行为表头. 输出 `<root>/aggregated_morphometrics.csv`
//! 的列为所有表头 (各自末尾追加 `subject` 列) 按首次出现顺序的并集, 缺失的单元格留空.

use super::subject_dirs;
use crate::consts::{AGGREGATED_CSV, MORPHOMETRICS_SUFFIX, SUBJECT_COLUMN};
use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Reader};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 单个受试者的一张统计表.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MorphometricsSheet {
    /// 所属受试者.
    pub subject: String,

    /// 表头.
    pub header: Vec<String>,

    /// 数据行, 不含表头.
    pub rows: Vec<Vec<String>>,
}

/// 汇总后的表格. 每行与 `columns` 等长.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MorphometricsTable {
    /// 列名.
    pub columns: Vec<String>,

    /// 数据行.
    pub rows: Vec<Vec<String>>,
}

impl MorphometricsTable {
    /// 一次性合并所有表, 行顺序与 `sheets` 一致.
    ///
    /// 表自身若已有 `subject` 列, 其值会被所属受试者覆盖.
    pub fn assemble(sheets: &[MorphometricsSheet]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut pos: HashMap<&str, usize> = HashMap::new();
        let mut layouts = Vec::with_capacity(sheets.len());
        for sheet in sheets {
            let idx: Vec<usize> = sheet
                .header
                .iter()
                .map(String::as_str)
                .chain([SUBJECT_COLUMN])
                .map(|name| {
                    *pos.entry(name).or_insert_with(|| {
                        columns.push(name.to_owned());
                        columns.len() - 1
                    })
                })
                .collect();
            layouts.push(idx);
        }

        let width = columns.len();
        let mut rows = Vec::new();
        for (sheet, idx) in sheets.iter().zip(layouts.iter()) {
            // idx 的最后一项是 subject 列.
            let (subject_at, cells_at) = match idx.split_last() {
                Some((s, c)) => (*s, c),
                None => continue,
            };
            for raw in sheet.rows.iter() {
                let mut row = vec![String::new(); width];
                for (&at, cell) in cells_at.iter().zip(raw.iter()) {
                    row[at] = cell.clone();
                }
                row[subject_at] = sheet.subject.clone();
                rows.push(row);
            }
        }
        Self { columns, rows }
    }

    /// 以 CSV 格式写入 `w`. 没有任何列时不写出内容.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(&self.columns)?;
        for row in self.rows.iter() {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// 读取 `path` 处表格的第一个工作表. 文件不存在时返回 [`Error::MissingFile`].
///
/// 空表格返回只有受试者的空表.
pub fn read_sheet<P: AsRef<Path>>(path: P, subject: &str) -> Result<MorphometricsSheet> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_owned()));
    }
    let mut sheet = MorphometricsSheet {
        subject: subject.to_owned(),
        ..Default::default()
    };

    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(sheet);
    };
    let range = range?;
    let mut rows = range
        .rows()
        .map(|r| r.iter().map(ToString::to_string).collect::<Vec<_>>());
    sheet.header = rows.next().unwrap_or_default();
    sheet.rows = rows.collect();
    Ok(sheet)
}

/// 受试者目录下所有形态学统计表格, 按文件名排序.
fn morphometrics_files(subject_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut ans = Vec::new();
    for entry in fs::read_dir(subject_dir)? {
        let path = entry?.path();
        let matched = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(MORPHOMETRICS_SUFFIX));
        if matched && path.is_file() {
            ans.push(path);
        }
    }
    ans.sort();
    Ok(ans)
}

/// 汇总 `root` 下所有受试者的形态学统计表格, 写入 `<root>/aggregated_morphometrics.csv`.
///
/// 先读取全部表格, 再一次性合并写出; 任一表格读取失败时不会写出任何内容.
/// 返回写出的表格.
pub fn aggregate_morphometrics<P: AsRef<Path>>(root: P) -> Result<MorphometricsTable> {
    let root = root.as_ref();
    let mut sheets = Vec::new();
    for dir in subject_dirs(root)? {
        let subject = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for path in morphometrics_files(&dir)? {
            let sheet = read_sheet(&path, &subject)?;
            debug!("{}: {} rows", path.display(), sheet.rows.len());
            sheets.push(sheet);
        }
    }

    let table = MorphometricsTable::assemble(&sheets);
    let out = root.join(AGGREGATED_CSV);
    table.write_csv(File::create(&out)?)?;
    info!(
        "aggregated {} rows from {} sheets into {}",
        table.rows.len(),
        sheets.len(),
        out.display()
    );
    Ok(table)
}
