// 该文件是 Shiwu （识物） 项目的一部分。
// src/context.rs - 应用上下文
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

use thiserror::Error;
use tracing::info;

use crate::labels::{LabelTable, LabelTableError};
use crate::output::draw::{Draw, DrawError};

#[derive(Error, Debug)]
pub enum ContextError {
  #[error("标签表加载错误: {0}")]
  Labels(#[from] LabelTableError),
  #[error("绘制器构建错误: {0}")]
  Draw(#[from] DrawError),
}

/// 进程级长生命周期资源：标签表、字体与调色板（随绘制器）、模型句柄。
///
/// 启动时构造一次，按引用传入流水线；析构时模型资源随之释放，
/// 包括出错提前返回的退出路径。
pub struct AppContext<M> {
  pub labels: LabelTable,
  pub draw: Draw,
  pub model: M,
}

impl<M> AppContext<M> {
  pub fn new(labels_path: &Path, font_path: &Path, model: M) -> Result<Self, ContextError> {
    let labels = LabelTable::load(labels_path)?;
    info!("标签表加载完成, 共 {} 类", labels.len());

    let draw = Draw::from_font_file(font_path)?;
    info!("标签字体加载完成: {}", font_path.display());

    Ok(AppContext {
      labels,
      draw,
      model,
    })
  }
}
