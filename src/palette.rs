// 该文件是 Shiwu （识物） 项目的一部分。
// src/palette.rs - 显示调色板
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

use image::Rgb;

// 固定的十色显示调色板：蓝、绿、红、青、灰、黑、深灰、品红、黄、红。
// 按候选槽位取色，与类别语义无关。
const PALETTE: [[u8; 3]; 10] = [
  [0, 0, 255],
  [0, 255, 0],
  [255, 0, 0],
  [0, 255, 255],
  [136, 136, 136],
  [0, 0, 0],
  [68, 68, 68],
  [255, 0, 255],
  [255, 255, 0],
  [255, 0, 0],
];

/// 显示颜色调色板。按位置索引取色，越界时按调色板长度回绕。
#[derive(Debug, Clone)]
pub struct Palette {
  colors: Box<[Rgb<u8>]>,
}

impl Default for Palette {
  fn default() -> Self {
    Self {
      colors: PALETTE.iter().map(|&rgb| Rgb(rgb)).collect(),
    }
  }
}

impl Palette {
  pub fn color_for_slot(&self, slot: usize) -> Rgb<u8> {
    self.colors[slot % self.colors.len()]
  }

  pub fn len(&self) -> usize {
    self.colors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.colors.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slot_indexing_is_positional() {
    let palette = Palette::default();
    assert_eq!(palette.color_for_slot(0), Rgb([0, 0, 255]));
    assert_eq!(palette.color_for_slot(1), Rgb([0, 255, 0]));
  }

  #[test]
  fn out_of_range_slot_wraps_around() {
    let palette = Palette::default();
    assert_eq!(palette.len(), 10);
    assert_eq!(palette.color_for_slot(10), palette.color_for_slot(0));
    assert_eq!(palette.color_for_slot(23), palette.color_for_slot(3));
  }
}
