// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/labels.rs - 类别标签表
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LabelTableError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("标签表解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("货架类别 ID {0} 超出标签表范围（共 {1} 个类别）")]
  ShelfClassOutOfRange(u32, usize),
}

/// 类别标签表
///
/// 由训练数据集约定的类别名称表，以及保留给货架的类别 ID。
/// 表在启动时加载一次，处理过程中只读。
#[derive(Debug, Clone, Deserialize)]
pub struct LabelTable {
  /// 按类别 ID 顺序排列的类别名称
  names: Vec<String>,
  /// 货架类别 ID
  shelf_class: u32,
}

impl LabelTable {
  pub fn new(
    names: Vec<String>,
    shelf_class: u32,
  ) -> Result<Self, LabelTableError> {
    Self { names, shelf_class }.validate()
  }

  /// 从 JSON 文件加载标签表
  ///
  /// 文件格式: `{"names": ["Abben", "Boncha", "Joco", "Shelf"], "shelf_class": 3}`
  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelTableError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let table: LabelTable = serde_json::from_str(&content)?;
    let table = table.validate()?;
    info!(
      "标签表加载完成: {} 个类别, 货架类别 ID {}",
      table.names.len(),
      table.shelf_class
    );
    Ok(table)
  }

  /// 覆盖货架类别 ID（命令行参数优先于文件内容）
  pub fn with_shelf_class(mut self, shelf_class: u32) -> Result<Self, LabelTableError> {
    self.shelf_class = shelf_class;
    self.validate()
  }

  fn validate(self) -> Result<Self, LabelTableError> {
    if (self.shelf_class as usize) >= self.names.len() {
      return Err(LabelTableError::ShelfClassOutOfRange(
        self.shelf_class,
        self.names.len(),
      ));
    }
    Ok(self)
  }

  /// 按类别 ID 查询名称，超出表范围返回 None
  pub fn name(&self, class_id: u32) -> Option<&str> {
    self.names.get(class_id as usize).map(String::as_str)
  }

  pub fn is_shelf(&self, class_id: u32) -> bool {
    class_id == self.shelf_class
  }

  pub fn shelf_class(&self) -> u32 {
    self.shelf_class
  }

  pub fn class_count(&self) -> usize {
    self.names.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bottle_table() -> LabelTable {
    LabelTable::new(
      vec![
        "Abben".to_string(),
        "Boncha".to_string(),
        "Joco".to_string(),
        "Shelf".to_string(),
      ],
      3,
    )
    .unwrap()
  }

  #[test]
  fn lookup_by_class_id() {
    let table = bottle_table();
    assert_eq!(table.name(0), Some("Abben"));
    assert_eq!(table.name(2), Some("Joco"));
    assert_eq!(table.name(3), Some("Shelf"));
    assert_eq!(table.name(4), None);
  }

  #[test]
  fn shelf_class_is_not_a_brand() {
    let table = bottle_table();
    assert!(table.is_shelf(3));
    assert!(!table.is_shelf(0));
  }

  #[test]
  fn shelf_class_out_of_range_is_rejected() {
    let result = LabelTable::new(vec!["Abben".to_string()], 5);
    assert!(matches!(
      result,
      Err(LabelTableError::ShelfClassOutOfRange(5, 1))
    ));
  }

  #[test]
  fn load_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.json");
    std::fs::write(
      &path,
      r#"{"names": ["Abben", "Boncha", "Joco", "Shelf"], "shelf_class": 3}"#,
    )
    .unwrap();

    let table = LabelTable::from_json_file(&path).unwrap();
    assert_eq!(table.class_count(), 4);
    assert_eq!(table.shelf_class(), 3);
    assert_eq!(table.name(1), Some("Boncha"));
  }

  #[test]
  fn override_shelf_class() {
    let table = bottle_table().with_shelf_class(0).unwrap();
    assert!(table.is_shelf(0));
    assert!(!table.is_shelf(3));

    assert!(bottle_table().with_shelf_class(9).is_err());
  }
}
