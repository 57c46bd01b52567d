// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/report.rs - 货架报告聚合与序列化
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

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::assign::Assignment;

/// 单一品牌在某货架上的数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTotal {
  pub brand: String,
  pub total: u32,
}

/// 单个货架的报告条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfReport {
  pub shelf: u32,
  pub products: Vec<BrandTotal>,
}

#[derive(Error, Debug)]
pub enum ReportError {
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("报告文件落盘失败: {0}")]
  PersistError(#[from] tempfile::PersistError),
}

/// 将分配结果聚合为逐货架的品牌计数
///
/// 货架按排名升序输出，没有商品的货架保留空表。品牌顺序为
/// 该货架商品中的首次出现顺序，不排序，保证逐字节可复现。
pub fn aggregate(assignment: &Assignment) -> Vec<ShelfReport> {
  assignment
    .iter()
    .map(|(shelf, products)| {
      let mut counts: Vec<BrandTotal> = Vec::new();
      for product in products {
        match counts.iter_mut().find(|c| c.brand == product.brand) {
          Some(count) => count.total += 1,
          None => counts.push(BrandTotal {
            brand: product.brand.clone(),
            total: 1,
          }),
        }
      }
      ShelfReport {
        shelf: shelf.rank,
        products: counts,
      }
    })
    .collect()
}

/// 报告的 JSON 文本，两空格缩进
pub fn to_json(reports: &[ShelfReport]) -> Result<String, serde_json::Error> {
  serde_json::to_string_pretty(reports)
}

/// 原子写入报告文件
///
/// 先写入同目录下的临时文件再改名，失败时不留下半成品报告。
pub fn write_report<P: AsRef<Path>>(path: P, reports: &[ShelfReport]) -> Result<(), ReportError> {
  let path = path.as_ref();
  let json = to_json(reports)?;

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => {
      std::fs::create_dir_all(parent)?;
      parent
    }
    _ => Path::new("."),
  };

  let mut file = NamedTempFile::new_in(dir)?;
  file.write_all(json.as_bytes())?;
  file.persist(path)?;
  Ok(())
}
