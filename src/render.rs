// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/render.rs - 分配结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::assign::Assignment;
use crate::detection::BoundingBox;

// 文本与标记常量
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_TEXT_HEIGHT: i32 = 24;
const CENTROID_RADIUS: i32 = 10;
// 随机颜色通道下限，避免与深色背景混淆
const COLOR_CHANNEL_MIN: u8 = 100;

#[derive(Error, Debug)]
pub enum AnnotateError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体解析错误: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// 标注绘制工具
///
/// 每个货架一种随机颜色，货架框、架上商品的质心圆点与品牌
/// 标签使用同一颜色。颜色每次运行随机生成，仅用于人工查看，
/// 对报告内容没有任何影响。
pub struct Annotator {
  /// 标签字体，未提供时只绘制几何图形
  font: Option<FontArc>,
  font_scale: PxScale,
}

impl Default for Annotator {
  fn default() -> Self {
    Self::new()
  }
}

impl Annotator {
  pub fn new() -> Self {
    Self {
      font: None,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
    }
  }

  /// 从字体文件创建带文本标签的绘制工具
  pub fn with_font_file(path: &str) -> Result<Self, AnnotateError> {
    let data = std::fs::read(path)?;
    let font = FontArc::try_from_vec(data)?;
    Ok(Self {
      font: Some(font),
      font_scale: PxScale::from(LABEL_FONT_SIZE),
    })
  }

  /// 每个货架生成一种随机颜色，通道取值 100-255
  fn shelf_colors(count: usize) -> Vec<Rgb<u8>> {
    (0..count)
      .map(|_| {
        Rgb([
          fastrand::u8(COLOR_CHANNEL_MIN..=u8::MAX),
          fastrand::u8(COLOR_CHANNEL_MIN..=u8::MAX),
          fastrand::u8(COLOR_CHANNEL_MIN..=u8::MAX),
        ])
      })
      .collect()
  }

  fn draw_text(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
    if let Some(font) = &self.font {
      draw_text_mut(image, color, x, y, self.font_scale, font, text);
    }
  }

  /// 绘制边界框，双层空心矩形增强可见度
  fn draw_bbox(&self, image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    let x = bbox.x1.clamp(0, image.width() as i32 - 1);
    let y = bbox.y1.clamp(0, image.height() as i32 - 1);
    let width = (bbox.x2.min(image.width() as i32) - x).max(0) as u32;
    let height = (bbox.y2.min(image.height() as i32) - y).max(0) as u32;

    if width == 0 || height == 0 {
      return;
    }

    let rect = Rect::at(x, y).of_size(width, height);
    draw_hollow_rect_mut(image, rect, color);

    if width > 2 && height > 2 {
      let inner = Rect::at(x + 1, y + 1).of_size(width - 2, height - 2);
      draw_hollow_rect_mut(image, inner, color);
    }
  }

  /// 在图像上绘制一张图的完整分配结果
  pub fn draw_assignment(&self, image: &mut RgbImage, assignment: &Assignment) {
    let colors = Self::shelf_colors(assignment.shelves().len());

    for ((shelf, products), color) in assignment.iter().zip(colors) {
      self.draw_bbox(image, &shelf.detection.bbox, color);

      let label_y = (shelf.detection.bbox.y1 - LABEL_TEXT_HEIGHT).max(0);
      self.draw_text(
        image,
        color,
        shelf.detection.bbox.x1.max(0),
        label_y,
        &format!("Shelf {}", shelf.rank),
      );

      for product in products {
        let (cx, cy) = product.bbox.centroid();
        draw_filled_circle_mut(image, (cx, cy), CENTROID_RADIUS, color);
        self.draw_text(
          image,
          color,
          cx.max(0),
          (cy - LABEL_TEXT_HEIGHT).max(0),
          &product.brand,
        );
      }
    }
  }
}
