// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/assign.rs - 商品货架分配引擎
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use tracing::debug;

use crate::detection::ProductDetection;
use crate::shelf::RankedShelf;

/// 一张图像的货架分配结果
///
/// 货架按排名升序保存，assigned 与 shelves 平行，
/// 第 i 项为排名 i+1 货架上的商品（保持商品输入顺序）。
/// 构建完成后不再修改。
#[derive(Debug, Clone)]
pub struct Assignment {
  shelves: Vec<RankedShelf>,
  assigned: Vec<Vec<ProductDetection>>,
  dropped: usize,
}

impl Assignment {
  pub fn shelves(&self) -> &[RankedShelf] {
    &self.shelves
  }

  /// 按排名升序遍历 (货架, 该货架上的商品)
  pub fn iter(&self) -> impl Iterator<Item = (&RankedShelf, &[ProductDetection])> {
    self
      .shelves
      .iter()
      .zip(self.assigned.iter().map(Vec::as_slice))
  }

  pub fn products_of(&self, rank: u32) -> Option<&[ProductDetection]> {
    if rank == 0 {
      return None;
    }
    self.assigned.get(rank as usize - 1).map(Vec::as_slice)
  }

  /// 分配到货架的商品总数
  pub fn assigned_count(&self) -> usize {
    self.assigned.iter().map(Vec::len).sum()
  }

  /// 质心不在任何货架内而被丢弃的商品数
  pub fn dropped_count(&self) -> usize {
    self.dropped
  }
}

/// 将商品按质心包含关系分配到货架
///
/// 商品按输入顺序处理；货架按排名升序逐一测试，命中第一个
/// 包含其质心的货架即停止（先到先得，不找最近的）。质心恰好
/// 落在多个货架公共边界上时，排名靠前者胜出。不被任何货架
/// 包含的商品直接丢弃，不算错误。
pub fn assign(shelves: Vec<RankedShelf>, products: Vec<ProductDetection>) -> Assignment {
  let mut assigned: Vec<Vec<ProductDetection>> = shelves.iter().map(|_| Vec::new()).collect();
  let mut dropped = 0usize;

  for product in products {
    let (cx, cy) = product.bbox.centroid();

    match shelves
      .iter()
      .position(|shelf| shelf.detection.bbox.contains(cx, cy))
    {
      Some(index) => assigned[index].push(product),
      None => {
        debug!("商品 {} 质心 ({}, {}) 不在任何货架内, 丢弃", product.brand, cx, cy);
        dropped += 1;
      }
    }
  }

  debug!(
    "分配完成: {} 个货架, {} 个商品入架, {} 个丢弃",
    shelves.len(),
    assigned.iter().map(Vec::len).sum::<usize>(),
    dropped
  );

  Assignment {
    shelves,
    assigned,
    dropped,
  }
}
