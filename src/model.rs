// 该文件是 Shiwu （识物） 项目的一部分。
// src/model.rs - 模型
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

pub trait Model {
  type Input;
  type Error;

  /// 同步执行一次推理。调用方视其为无副作用的黑盒。
  fn infer(&self, input: &Self::Input) -> Result<DetectOutput, Self::Error>;
}

/// 一次推理产出的全部候选：三个平行等长数组，下标即候选槽位。
///
/// `locations[i]` 为归一化 (top, left, bottom, right) 坐标，
/// 相对于预处理后的输入图像而非原图。
#[derive(Debug, Clone)]
pub struct DetectOutput {
  pub locations: Box<[[f32; 4]]>,
  pub classes: Box<[f32]>,
  pub scores: Box<[f32]>,
}

impl DetectOutput {
  pub fn len(&self) -> usize {
    self.scores.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scores.is_empty()
  }

  /// 三个数组是否平行等长。模型实现必须保证该不变式。
  pub fn is_parallel(&self) -> bool {
    self.locations.len() == self.scores.len() && self.classes.len() == self.scores.len()
  }
}

mod replay;
pub use self::replay::{ReplayModel, ReplayModelError};
