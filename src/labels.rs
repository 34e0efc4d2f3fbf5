// 该文件是 Shiwu （识物） 项目的一部分。
// src/labels.rs - 类别标签表
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LabelTableError {
  #[error("标签表读取错误: {0}")]
  Io(#[from] std::io::Error),
}

/// 类别标签表：按行读取，行号即类别下标。进程启动时加载一次，之后只读。
#[derive(Debug, Clone)]
pub struct LabelTable {
  names: Vec<String>,
}

impl LabelTable {
  /// 从行序列构造标签表。行序即下标序，空行保留占位以免下标错位。
  pub fn from_lines<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let names = lines
      .into_iter()
      .map(|line| line.as_ref().trim().to_string())
      .collect();
    Self { names }
  }

  /// 从标签文件加载。
  pub fn load(path: &Path) -> Result<Self, LabelTableError> {
    let text = std::fs::read_to_string(path)?;
    let table = Self::from_lines(text.lines());
    debug!("标签表 {} 共 {} 类", path.display(), table.len());
    Ok(table)
  }

  pub fn name(&self, class_index: usize) -> Option<&str> {
    self.names.get(class_index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn line_index_is_class_index() {
    let table = LabelTable::from_lines(["person", "bicycle", "car"]);
    assert_eq!(table.name(0), Some("person"));
    assert_eq!(table.name(2), Some("car"));
    assert_eq!(table.len(), 3);
  }

  #[test]
  fn blank_lines_keep_their_slot() {
    let table = LabelTable::from_lines(["cat", "", "dog"]);
    assert_eq!(table.name(1), Some(""));
    assert_eq!(table.name(2), Some("dog"));
  }

  #[test]
  fn out_of_range_index_yields_none() {
    let table = LabelTable::from_lines(["cat"]);
    assert_eq!(table.name(1), None);
  }
}
