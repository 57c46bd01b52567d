// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::{Context, Result};
use clap::Parser;

use linlang::input::{SourceType, create_detection_source};
use linlang::labels::LabelTable;
use linlang::output::create_report_writer;
use linlang::task::BatchTask;

fn main() -> Result<()> {
  let args = args::Args::parse();

  tracing_subscriber::fmt::init();

  println!("Linlang 货架商品计数");
  println!("====================");
  println!("标签表文件: {}", args.labels);
  println!("输入来源: {}", args.input);
  println!("输出目录: {}", args.output);
  println!();

  // 加载标签表
  println!("正在加载标签表...");
  let labels = LabelTable::from_json_file(&args.labels)
    .with_context(|| format!("无法加载标签表: {}", args.labels))?;
  let labels = match args.shelf_class {
    Some(id) => labels.with_shelf_class(id)?,
    None => labels,
  };
  println!(
    "标签表加载完成: {} 个类别, 货架类别 ID {}",
    labels.class_count(),
    labels.shelf_class()
  );

  // 创建输入源
  println!("正在打开输入源...");
  let source = create_detection_source(&args.input)?;
  println!(
    "输入源已打开: {}",
    match source.source_type() {
      SourceType::File => "单个检测文件",
      SourceType::Folder => "检测文件目录",
    }
  );

  // 创建输出
  println!("正在创建输出...");
  let writer = create_report_writer(&args.output, args.annotate, args.font.as_deref())?;
  println!("输出已创建");

  // 处理图像
  println!();
  println!("开始处理...");
  let max_images = (args.max_images > 0).then_some(args.max_images as usize);
  let summary = BatchTask::default()
    .with_max_images(max_images)
    .run_with_summary(source, &labels, writer)?;

  println!();
  println!("处理完成!");
  println!("成功图像数: {}", summary.processed);
  println!("失败图像数: {}", summary.failed);
  println!("商品入架数: {}", summary.assigned);
  println!("商品丢弃数: {}", summary.dropped);

  Ok(())
}
