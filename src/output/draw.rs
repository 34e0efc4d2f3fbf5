// 该文件是 Shiwu （识物） 项目的一部分。
// src/output/draw.rs - 检出标签绘制
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::RgbImage;
use imageproc::drawing::draw_text_mut;
use thiserror::Error;
use tracing::info;

use crate::labels::LabelTable;
use crate::palette::Palette;
use crate::select::Selection;

// 文本渲染常量
const LABEL_X: i32 = 20;
const TEXT_SCALE_DIVISOR: f32 = 15.0;
// 类别下标超出标签表时的兜底名称
const UNKNOWN_LABEL: &str = "unknown";

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("字体文件读取错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("无效字体: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// 检出标签绘制器。字号与纵向位置随图像高度缩放。
pub struct Draw {
  font: FontArc,
  palette: Palette,
}

impl Draw {
  /// 启动时从字体文件构造一次。
  pub fn from_font_file(path: &Path) -> Result<Self, DrawError> {
    let data = std::fs::read(path)?;
    Self::from_font_bytes(data)
  }

  pub fn from_font_bytes(data: Vec<u8>) -> Result<Self, DrawError> {
    let font = FontArc::try_from_vec(data)?;
    Ok(Draw {
      font,
      palette: Palette::default(),
    })
  }

  /// 组装标签文本: `<类别名>: <分数×100，两位小数>%`。
  pub fn format_label(labels: &LabelTable, selection: &Selection) -> String {
    let name = labels.name(selection.class_index).unwrap_or(UNKNOWN_LABEL);
    format!("{}: {:.2}%", name, selection.score * 100.0)
  }

  /// 在原尺寸位图的可变副本上绘制最佳检出的标签文本。
  ///
  /// 文本固定落在 (20, 高度/2)，字号为高度/15；颜色按胜出候选的
  /// 槽位从调色板取得。检测框不绘制，空间信息就此弃用。
  pub fn annotate(
    &self,
    image: &RgbImage,
    labels: &LabelTable,
    selection: &Selection,
  ) -> RgbImage {
    let mut annotated = image.clone();
    let height = annotated.height();

    let label = Self::format_label(labels, selection);
    let color = self.palette.color_for_slot(selection.slot);
    let scale = PxScale::from(height as f32 / TEXT_SCALE_DIVISOR);

    draw_text_mut(
      &mut annotated,
      color,
      LABEL_X,
      (height / 2) as i32,
      scale,
      &self.font,
      &label,
    );

    info!("检出对象: {}", label);
    annotated
  }
}
