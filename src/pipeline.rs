// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/pipeline.rs - 单图像处理管线
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use tracing::debug;

use crate::assign::{Assignment, assign};
use crate::detection::{DetectItem, NormalizeError, normalize};
use crate::labels::LabelTable;
use crate::shelf::rank_shelves;

/// 单张图像的完整处理: 归一化 -> 货架排序 -> 商品分配
///
/// 纯函数，只读取本图像的检测列表与进程级标签表，图像之间
/// 没有任何共享可变状态。聚合为独立一步，见 report::aggregate。
pub fn process(
  items: &[DetectItem],
  labels: &LabelTable,
) -> Result<Assignment, NormalizeError> {
  let normalized = normalize(items, labels)?;
  debug!(
    "归一化完成: {} 个货架, {} 个商品",
    normalized.shelves.len(),
    normalized.products.len()
  );

  let ranked = rank_shelves(normalized.shelves);
  Ok(assign(ranked, normalized.products))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::{aggregate, to_json};

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

  fn item(class_id: u32, score: f32, bbox: [f32; 4]) -> DetectItem {
    DetectItem {
      class_id,
      score,
      bbox,
    }
  }

  #[test]
  fn one_shelf_one_product_end_to_end() {
    let items = vec![
      item(3, 0.95, [0.0, 100.0, 200.0, 300.0]),
      item(0, 0.88, [50.0, 150.0, 70.0, 170.0]),
    ];

    let assignment = process(&items, &bottle_table()).unwrap();
    let reports = aggregate(&assignment);

    assert_eq!(
      serde_json::to_string(&reports).unwrap(),
      r#"[{"shelf":1,"products":[{"brand":"Abben","total":1}]}]"#
    );
  }

  #[test]
  fn lower_shelf_in_image_becomes_rank_one() {
    let items = vec![
      item(3, 0.9, [0.0, 100.0, 200.0, 300.0]),
      item(3, 0.9, [0.0, 320.0, 200.0, 500.0]),
    ];

    let assignment = process(&items, &bottle_table()).unwrap();
    let shelves = assignment.shelves();
    assert_eq!(shelves[0].rank, 1);
    assert_eq!(shelves[0].detection.bbox.y2, 500);
    assert_eq!(shelves[1].rank, 2);
    assert_eq!(shelves[1].detection.bbox.y2, 300);
  }

  #[test]
  fn stray_product_shrinks_report_totals() {
    let items = vec![
      item(3, 0.9, [0.0, 100.0, 200.0, 300.0]),
      item(2, 0.8, [50.0, 150.0, 70.0, 170.0]),
      item(2, 0.8, [900.0, 900.0, 920.0, 920.0]),
    ];

    let assignment = process(&items, &bottle_table()).unwrap();
    let reports = aggregate(&assignment);

    let total: u32 = reports
      .iter()
      .flat_map(|r| r.products.iter())
      .map(|c| c.total)
      .sum();
    // 两个商品输入，只有一个在货架上
    assert_eq!(total, 1);
    assert_eq!(assignment.dropped_count(), 1);
  }

  #[test]
  fn overlapping_shelves_assign_to_rank_one_only() {
    let items = vec![
      item(3, 0.9, [0.0, 0.0, 200.0, 300.0]),
      item(3, 0.9, [0.0, 0.0, 200.0, 500.0]),
      item(1, 0.8, [90.0, 90.0, 110.0, 110.0]),
    ];

    let assignment = process(&items, &bottle_table()).unwrap();
    assert_eq!(assignment.products_of(1).unwrap().len(), 1);
    assert!(assignment.products_of(2).unwrap().is_empty());
  }

  #[test]
  fn unknown_class_aborts_the_image() {
    let items = vec![
      item(3, 0.9, [0.0, 0.0, 200.0, 300.0]),
      item(9, 0.8, [10.0, 10.0, 30.0, 30.0]),
    ];

    let result = process(&items, &bottle_table());
    assert!(matches!(result, Err(NormalizeError::UnknownClass(9))));
  }

  #[test]
  fn pipeline_is_deterministic() {
    let items = vec![
      item(3, 0.9, [0.0, 100.0, 200.0, 300.0]),
      item(3, 0.9, [0.0, 320.0, 200.0, 500.0]),
      item(0, 0.8, [50.0, 150.0, 70.0, 170.0]),
      item(2, 0.7, [60.0, 400.0, 80.0, 420.0]),
    ];
    let table = bottle_table();

    let first = to_json(&aggregate(&process(&items, &table).unwrap())).unwrap();
    let second = to_json(&aggregate(&process(&items, &table).unwrap())).unwrap();
    assert_eq!(first, second);
  }
}
