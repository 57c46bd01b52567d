// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/output.rs - 报告输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::assign::Assignment;
#[cfg(feature = "annotate")]
use crate::render::{AnnotateError, Annotator};
use crate::report::{ReportError, ShelfReport, write_report};
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("URL 解析错误: {0}")]
  UrlError(#[from] url::ParseError),
  #[error("报告写入错误: {0}")]
  ReportError(#[from] ReportError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[cfg(feature = "annotate")]
  #[error("标注错误: {0}")]
  AnnotateError(#[from] AnnotateError),
  #[cfg(feature = "annotate")]
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("标注输出不可用: 编译时未启用 annotate 特性")]
  AnnotateUnavailable,
}

/// 报告输出 trait
pub trait ReportWriter {
  /// 写入一张图像的报告（及可选的标注图）
  fn write_result(
    &mut self,
    stem: &str,
    assignment: &Assignment,
    reports: &[ShelfReport],
    image: Option<&Path>,
  ) -> Result<(), OutputError>;

  /// 完成写入
  fn finish(&mut self) -> Result<(), OutputError>;
}

/// 目录报告输出
///
/// 每张图像写 `<stem>.json`；开启标注且原图存在时另写
/// `<stem>_out.png`。报告文件为原子写入。
pub struct DirectoryReportOutput {
  /// 输出目录
  directory: PathBuf,
  /// 标注绘制工具，None 表示只输出报告
  #[cfg(feature = "annotate")]
  annotator: Option<Annotator>,
  /// 已写入的报告数
  written: usize,
}

impl DirectoryReportOutput {
  pub fn new<P: AsRef<Path>>(directory: P) -> Self {
    Self {
      directory: directory.as_ref().to_path_buf(),
      #[cfg(feature = "annotate")]
      annotator: None,
      written: 0,
    }
  }

  /// 开启标注图输出，可选指定标签字体文件
  pub fn enable_annotation(self, font: Option<&str>) -> Result<Self, OutputError> {
    #[cfg(feature = "annotate")]
    {
      let annotator = match font {
        Some(path) => Annotator::with_font_file(path)?,
        None => Annotator::new(),
      };
      let mut this = self;
      this.annotator = Some(annotator);
      Ok(this)
    }
    #[cfg(not(feature = "annotate"))]
    {
      let _ = font;
      Err(OutputError::AnnotateUnavailable)
    }
  }
}

impl FromUrlWithScheme for DirectoryReportOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryReportOutput {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(OutputError::SchemeMismatch);
    }

    let output = DirectoryReportOutput::new(url.path());

    let annotate = url.query_pairs().any(|(k, _)| k == "annotate");
    let font = url
      .query_pairs()
      .find(|(k, _)| k == "font")
      .map(|(_, v)| v.to_string());

    if annotate {
      output.enable_annotation(font.as_deref())
    } else {
      Ok(output)
    }
  }
}

impl ReportWriter for DirectoryReportOutput {
  fn write_result(
    &mut self,
    stem: &str,
    assignment: &Assignment,
    reports: &[ShelfReport],
    image: Option<&Path>,
  ) -> Result<(), OutputError> {
    std::fs::create_dir_all(&self.directory)?;

    let report_path = self.directory.join(format!("{stem}.json"));
    write_report(&report_path, reports)?;

    #[cfg(feature = "annotate")]
    if let (Some(annotator), Some(image_path)) = (&self.annotator, image) {
      let mut annotated = image::open(image_path)?.into_rgb8();
      annotator.draw_assignment(&mut annotated, assignment);
      let annotated_path = self.directory.join(format!("{stem}_out.png"));
      annotated.save(&annotated_path)?;
      info!("标注图已保存: {}", annotated_path.display());
    }
    #[cfg(not(feature = "annotate"))]
    let _ = (assignment, image);

    self.written += 1;
    Ok(())
  }

  fn finish(&mut self) -> Result<(), OutputError> {
    info!(
      "输出完成: {} 份报告写入 {}",
      self.written,
      self.directory.display()
    );
    Ok(())
  }
}

impl<W: ReportWriter + ?Sized> ReportWriter for Box<W> {
  fn write_result(
    &mut self,
    stem: &str,
    assignment: &Assignment,
    reports: &[ShelfReport],
    image: Option<&Path>,
  ) -> Result<(), OutputError> {
    (**self).write_result(stem, assignment, reports, image)
  }

  fn finish(&mut self) -> Result<(), OutputError> {
    (**self).finish()
  }
}

/// 从路径或 folder:// URL 创建报告输出
pub fn create_report_writer(
  output: &str,
  annotate: bool,
  font: Option<&str>,
) -> Result<Box<dyn ReportWriter>, OutputError> {
  let writer = if output.contains("://") {
    DirectoryReportOutput::from_url(&Url::parse(output)?)?
  } else {
    DirectoryReportOutput::new(output)
  };

  let writer = if annotate {
    writer.enable_annotation(font)?
  } else {
    writer
  };

  Ok(Box::new(writer))
}
