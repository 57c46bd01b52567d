// 该文件是 Linlang （琳琅满目） 项目的一部分。
// src/input.rs - 检测结果输入源
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::detection::DetectItem;

/// 检测输入支持的原图扩展名
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum InputError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("检测文件解析错误 {0}: {1}")]
  ParseError(PathBuf, serde_json::Error),
  #[error("输入路径无效: {0}")]
  InvalidPath(String),
}

/// 一张图像的检测输入
pub struct ImageDetections {
  /// 图像名（不含扩展名），输出文件以此命名
  pub stem: String,
  /// 检测器输出的原始记录
  pub detections: Vec<DetectItem>,
  /// 同名原图路径，仅供标注输出使用
  pub image: Option<PathBuf>,
}

/// 输入源类型
pub enum SourceType {
  /// 单个检测 JSON 文件
  File,
  /// 目录下的全部检测 JSON 文件
  Folder,
}

/// 检测输入源 trait
pub trait DetectionSource: Iterator<Item = Result<ImageDetections, InputError>> {
  /// 获取输入源类型
  fn source_type(&self) -> SourceType;
}

/// 读取一个检测 JSON 文件并关联同名原图
fn load_item(path: &Path) -> Result<ImageDetections, InputError> {
  let stem = path
    .file_stem()
    .and_then(|s| s.to_str())
    .ok_or_else(|| InputError::InvalidPath(path.display().to_string()))?
    .to_string();

  let content = std::fs::read_to_string(path)?;
  let detections: Vec<DetectItem> = serde_json::from_str(&content)
    .map_err(|e| InputError::ParseError(path.to_path_buf(), e))?;

  let image = IMAGE_EXTENSIONS
    .iter()
    .map(|ext| path.with_extension(ext))
    .find(|candidate| candidate.exists());

  debug!(
    "读取检测文件 {}: {} 条记录, 原图{}",
    path.display(),
    detections.len(),
    if image.is_some() { "已找到" } else { "缺失" }
  );

  Ok(ImageDetections {
    stem,
    detections,
    image,
  })
}

/// 单文件输入源，只产出一项
pub struct FileSource {
  path: Option<PathBuf>,
}

impl FileSource {
  pub fn new<P: AsRef<Path>>(path: P) -> Self {
    Self {
      path: Some(path.as_ref().to_path_buf()),
    }
  }
}

impl Iterator for FileSource {
  type Item = Result<ImageDetections, InputError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.path.take().map(|path| load_item(&path))
  }
}

impl DetectionSource for FileSource {
  fn source_type(&self) -> SourceType {
    SourceType::File
  }
}

/// 目录输入源，按文件名排序逐一产出目录下的 *.json
pub struct FolderSource {
  entries: std::vec::IntoIter<PathBuf>,
}

impl FolderSource {
  pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, InputError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| {
        path
          .extension()
          .and_then(|ext| ext.to_str())
          .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
      })
      .collect();
    // 排序保证批处理顺序可复现
    entries.sort();

    info!(
      "目录输入源已打开: {} ({} 个检测文件)",
      dir.as_ref().display(),
      entries.len()
    );

    Ok(Self {
      entries: entries.into_iter(),
    })
  }
}

impl Iterator for FolderSource {
  type Item = Result<ImageDetections, InputError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.entries.next().map(|path| load_item(&path))
  }
}

impl DetectionSource for FolderSource {
  fn source_type(&self) -> SourceType {
    SourceType::Folder
  }
}

/// 从路径创建输入源
///
/// 目录走 FolderSource，其余按单个检测文件处理。
pub fn create_detection_source(source: &str) -> Result<Box<dyn DetectionSource>, InputError> {
  let path = Path::new(source);

  if path.is_dir() {
    return Ok(Box::new(FolderSource::new(path)?));
  }

  if path.is_file() {
    return Ok(Box::new(FileSource::new(path)));
  }

  Err(InputError::InvalidPath(source.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  const DETECTIONS_JSON: &str =
    r#"[{"class_id": 3, "score": 0.95, "bbox": [0.0, 100.0, 200.0, 300.0]},
        {"class_id": 0, "score": 0.88, "bbox": [50.0, 150.0, 70.0, 170.0]}]"#;

  #[test]
  fn file_source_yields_one_item() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.json");
    std::fs::write(&path, DETECTIONS_JSON).unwrap();

    let mut source = FileSource::new(&path);
    let item = source.next().unwrap().unwrap();
    assert_eq!(item.stem, "a");
    assert_eq!(item.detections.len(), 2);
    assert!(item.image.is_none());
    assert!(source.next().is_none());
  }

  #[test]
  fn sidecar_image_is_associated_by_stem() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), DETECTIONS_JSON).unwrap();
    std::fs::write(dir.path().join("a.jpg"), [0u8; 4]).unwrap();

    let item = FileSource::new(dir.path().join("a.json"))
      .next()
      .unwrap()
      .unwrap();
    assert_eq!(item.image, Some(dir.path().join("a.jpg")));
  }

  #[test]
  fn folder_source_walks_json_files_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.json"), "[]").unwrap();
    std::fs::write(dir.path().join("a.json"), "[]").unwrap();
    std::fs::write(dir.path().join("c.txt"), "ignored").unwrap();

    let stems: Vec<String> = FolderSource::new(dir.path())
      .unwrap()
      .map(|item| item.unwrap().stem)
      .collect();
    assert_eq!(stems, vec!["a", "b"]);
  }

  #[test]
  fn malformed_json_reports_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "not json").unwrap();

    let result = FileSource::new(&path).next().unwrap();
    assert!(matches!(result, Err(InputError::ParseError(p, _)) if p == path));
  }

  #[test]
  fn factory_dispatches_on_path_shape() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), "[]").unwrap();

    let folder = create_detection_source(dir.path().to_str().unwrap()).unwrap();
    assert!(matches!(folder.source_type(), SourceType::Folder));

    let file =
      create_detection_source(dir.path().join("a.json").to_str().unwrap()).unwrap();
    assert!(matches!(file.source_type(), SourceType::File));

    assert!(create_detection_source("/no/such/path").is_err());
  }
}
