// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use clap::Parser;

/// Linlang 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 类别标签表文件路径
  /// 格式: {"names": ["Abben", "Boncha", "Joco", "Shelf"], "shelf_class": 3}
  #[arg(long, value_name = "FILE")]
  pub labels: String,

  /// 货架类别 ID，覆盖标签表中的 shelf_class
  #[arg(long, value_name = "ID")]
  pub shelf_class: Option<u32>,

  /// 输入来源（单个检测 JSON 文件，或包含 *.json 的目录）
  /// 每个文件为一张图像的检测记录数组:
  /// [{"class_id": 3, "score": 0.95, "bbox": [x1, y1, x2, y2]}, ...]
  #[arg(long, value_name = "SOURCE")]
  pub input: String,

  /// 输出目录，也接受 folder://PATH?annotate 形式的 URL
  #[arg(long, value_name = "OUTPUT")]
  pub output: String,

  /// 输出标注图像（需要与检测文件同名的原图）
  #[arg(long)]
  pub annotate: bool,

  /// 标注文本字体文件路径，缺省时只绘制几何图形
  #[arg(long, value_name = "FILE")]
  pub font: Option<String>,

  /// 最大处理图像数（0 表示无限制）
  #[arg(long, default_value = "0", value_name = "COUNT")]
  pub max_images: u64,
}
