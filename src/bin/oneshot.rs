// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/bin/oneshot.rs - 单文件报告输出到标准输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use linlang::input::FileSource;
use linlang::labels::LabelTable;
use linlang::pipeline;
use linlang::report;

/// Linlang 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 类别标签表文件路径
  #[arg(long, value_name = "FILE")]
  pub labels: String,

  /// 货架类别 ID，覆盖标签表中的 shelf_class
  #[arg(long, value_name = "ID")]
  pub shelf_class: Option<u32>,

  /// 单张图像的检测 JSON 文件
  #[arg(value_name = "DETECTIONS")]
  pub detections: String,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("标签表文件: {}", args.labels);
  info!("检测文件: {}", args.detections);

  let labels = LabelTable::from_json_file(&args.labels)
    .with_context(|| format!("无法加载标签表: {}", args.labels))?;
  let labels = match args.shelf_class {
    Some(id) => labels.with_shelf_class(id)?,
    None => labels,
  };

  let item = FileSource::new(&args.detections)
    .next()
    .expect("单文件输入源必定产出一项")
    .with_context(|| format!("无法读取检测文件: {}", args.detections))?;

  let assignment = pipeline::process(&item.detections, &labels)?;
  let reports = report::aggregate(&assignment);

  println!("{}", report::to_json(&reports)?);

  Ok(())
}
