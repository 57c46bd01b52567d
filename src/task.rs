// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/task.rs - 任务定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use tracing::{error, info};

use crate::input::{ImageDetections, InputError};
use crate::labels::LabelTable;
use crate::output::ReportWriter;
use crate::pipeline;
use crate::report;

pub trait Task<I, O>: Sized {
  type Error;
  fn run_task(self, input: I, labels: &LabelTable, output: O) -> Result<(), Self::Error>;
}

/// 只处理输入源的第一项
pub struct OneShotTask;

impl<I, O> Task<I, O> for OneShotTask
where
  I: Iterator<Item = Result<ImageDetections, InputError>>,
  O: ReportWriter,
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, labels: &LabelTable, mut output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let item = input
      .next()
      .ok_or_else(|| anyhow::anyhow!("没有输入检测文件"))??;

    let now = std::time::Instant::now();
    let assignment = pipeline::process(&item.detections, labels)?;
    let reports = report::aggregate(&assignment);
    output.write_result(&item.stem, &assignment, &reports, item.image.as_deref())?;
    output.finish()?;
    info!("图像 {} 处理完成，耗时: {:.2?}", item.stem, now.elapsed());

    Ok(())
  }
}

/// 处理输入源的全部图像
///
/// 单张图像失败（未知类别、读取错误）只中止该图像，不写其
/// 报告文件，批处理继续。
#[derive(Default, Debug)]
pub struct BatchTask {
  max_images: Option<usize>,
}

impl BatchTask {
  pub fn with_max_images(mut self, max_images: Option<usize>) -> Self {
    self.max_images = max_images;
    self
  }
}

/// 批处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
  /// 成功产出报告的图像数
  pub processed: usize,
  /// 中止的图像数
  pub failed: usize,
  /// 入架商品总数
  pub assigned: usize,
  /// 丢弃商品总数
  pub dropped: usize,
}

impl BatchTask {
  /// 与 run_task 相同，但返回统计结果供调用方检查
  pub fn run_with_summary<I, O>(
    self,
    input: I,
    labels: &LabelTable,
    mut output: O,
  ) -> Result<BatchSummary, anyhow::Error>
  where
    I: Iterator<Item = Result<ImageDetections, InputError>>,
    O: ReportWriter,
  {
    info!("开始任务...");
    let mut summary = BatchSummary::default();

    for item_result in input {
      if self
        .max_images
        .map(|n| summary.processed >= n)
        .unwrap_or(false)
      {
        info!("达到指定图像数 {}, 退出任务循环", summary.processed);
        break;
      }

      let item = match item_result {
        Ok(item) => item,
        Err(e) => {
          error!("读取输入失败: {}", e);
          summary.failed += 1;
          continue;
        }
      };

      let now = std::time::Instant::now();
      let assignment = match pipeline::process(&item.detections, labels) {
        Ok(assignment) => assignment,
        Err(e) => {
          // 该图像不产出任何报告文件
          error!("图像 {} 处理失败: {}", item.stem, e);
          summary.failed += 1;
          continue;
        }
      };

      let reports = report::aggregate(&assignment);
      if let Err(e) =
        output.write_result(&item.stem, &assignment, &reports, item.image.as_deref())
      {
        error!("图像 {} 输出失败: {}", item.stem, e);
        summary.failed += 1;
        continue;
      }

      summary.processed += 1;
      summary.assigned += assignment.assigned_count();
      summary.dropped += assignment.dropped_count();
      info!(
        "图像 {} 处理完成: {} 个货架, {} 个商品入架, 耗时: {:.2?}",
        item.stem,
        assignment.shelves().len(),
        assignment.assigned_count(),
        now.elapsed()
      );
    }

    output.finish()?;
    info!(
      "任务完成: {} 张图像成功, {} 张失败, {} 个商品入架, {} 个丢弃",
      summary.processed, summary.failed, summary.assigned, summary.dropped
    );

    Ok(summary)
  }
}

impl<I, O> Task<I, O> for BatchTask
where
  I: Iterator<Item = Result<ImageDetections, InputError>>,
  O: ReportWriter,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, labels: &LabelTable, output: O) -> Result<(), Self::Error> {
    self.run_with_summary(input, labels, output).map(|_| ())
  }
}
