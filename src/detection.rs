// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/detection.rs - 检测结果归一化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::LabelTable;

/// 检测器输出的单条原始记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectItem {
  pub class_id: u32,
  pub score: f32,
  pub bbox: [f32; 4], // [x_min, y_min, x_max, y_max]
}

#[derive(Error, Debug)]
pub enum NormalizeError {
  #[error("未知类别 ID: {0}, 标签表中无对应条目")]
  UnknownClass(u32),
}

/// 整数像素坐标的边界框
///
/// 检测器不保证 x1 <= x2 与 y1 <= y2，构造时对调反转的角点，
/// 之后所有几何运算都建立在角点有序的前提上。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
  pub x1: i32,
  pub y1: i32,
  pub x2: i32,
  pub y2: i32,
}

impl BoundingBox {
  pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
    let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
    Self { x1, y1, x2, y2 }
  }

  /// 浮点角点按截断转为整数像素坐标
  pub fn from_corners(bbox: &[f32; 4]) -> Self {
    Self::new(
      bbox[0] as i32,
      bbox[1] as i32,
      bbox[2] as i32,
      bbox[3] as i32,
    )
  }

  /// 边界框质心，向下取整的整数除法
  pub fn centroid(&self) -> (i32, i32) {
    (
      (self.x1 + self.x2).div_euclid(2),
      (self.y1 + self.y2).div_euclid(2),
    )
  }

  /// 包含测试，四边均为闭区间
  pub fn contains(&self, x: i32, y: i32) -> bool {
    self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
  }
}

/// 货架检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfDetection {
  pub bbox: BoundingBox,
  /// 置信度 0-100
  pub confidence: u8,
}

/// 商品检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetection {
  pub bbox: BoundingBox,
  /// 置信度 0-100
  pub confidence: u8,
  /// 品牌名称，由标签表解析
  pub brand: String,
}

/// 归一化后的检测集合，货架与商品各自保持输入顺序
#[derive(Debug, Clone, Default)]
pub struct Normalized {
  pub shelves: Vec<ShelfDetection>,
  pub products: Vec<ProductDetection>,
}

/// 置信度从 [0,1] 截断缩放到 0-100 整数
fn scale_confidence(score: f32) -> u8 {
  (score * 100.0) as u8
}

/// 将原始检测记录拆分为货架与商品两个序列
///
/// 货架类别进货架表，其余类别按标签表解析品牌后进商品表。
/// 标签表中不存在的类别 ID 立即报错，绝不退回占位品牌。
pub fn normalize(
  items: &[DetectItem],
  labels: &LabelTable,
) -> Result<Normalized, NormalizeError> {
  let mut normalized = Normalized::default();

  for item in items {
    let bbox = BoundingBox::from_corners(&item.bbox);
    let confidence = scale_confidence(item.score);

    if labels.is_shelf(item.class_id) {
      normalized.shelves.push(ShelfDetection { bbox, confidence });
    } else {
      let brand = labels
        .name(item.class_id)
        .ok_or(NormalizeError::UnknownClass(item.class_id))?
        .to_string();
      normalized.products.push(ProductDetection {
        bbox,
        confidence,
        brand,
      });
    }
  }

  Ok(normalized)
}
