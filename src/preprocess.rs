// 该文件是 Shiwu （识物） 项目的一部分。
// src/preprocess.rs - 检测输入预处理
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

use image::RgbImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

use crate::frame::RgbNhwcFrame;

/// 检测网络的固定输入尺寸。
pub const DETECTOR_INPUT_W: u32 = 300;
pub const DETECTOR_INPUT_H: u32 = 300;

/// 检测网络的输入张量类型。
pub type DetectorInput = RgbNhwcFrame<DETECTOR_INPUT_W, DETECTOR_INPUT_H>;

#[derive(Error, Debug)]
pub enum PreprocessError {
  #[error("无效图像尺寸: {width}x{height}")]
  InvalidImage { width: u32, height: u32 },
}

/// 将任意尺寸位图双线性缩放到固定输入尺寸。
///
/// 纯函数：同一输入恒产生字节一致的张量。
pub fn to_detector_input(image: &RgbImage) -> Result<DetectorInput, PreprocessError> {
  let (width, height) = image.dimensions();
  if width == 0 || height == 0 {
    return Err(PreprocessError::InvalidImage { width, height });
  }

  let resized = imageops::resize(
    image,
    DETECTOR_INPUT_W,
    DETECTOR_INPUT_H,
    FilterType::Triangle,
  );

  Ok(DetectorInput::from(resized.into_raw()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frame::AsNhwcFrame;
  use image::Rgb;

  #[test]
  fn output_shape_is_fixed_for_any_input() {
    for (w, h) in [(1, 1), (299, 301), (640, 480), (31, 977)] {
      let image = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
      let tensor = to_detector_input(&image).unwrap();
      assert_eq!(tensor.width(), DETECTOR_INPUT_W as usize);
      assert_eq!(tensor.height(), DETECTOR_INPUT_H as usize);
      assert_eq!(
        tensor.as_nhwc().len(),
        (DETECTOR_INPUT_W * DETECTOR_INPUT_H * 3) as usize
      );
    }
  }

  #[test]
  fn resize_is_deterministic() {
    let mut image = RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]));
    for (x, y, pixel) in image.enumerate_pixels_mut() {
      *pixel = Rgb([(x * 3) as u8, (y * 5) as u8, (x + y) as u8]);
    }

    let a = to_detector_input(&image).unwrap();
    let b = to_detector_input(&image).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn flat_color_survives_resampling() {
    let image = RgbImage::from_pixel(17, 530, Rgb([200, 100, 50]));
    let tensor = to_detector_input(&image).unwrap();
    assert!(tensor.as_nhwc().chunks(3).all(|px| px == [200, 100, 50]));
  }

  #[test]
  fn zero_dimension_input_is_rejected() {
    let image = RgbImage::new(0, 5);
    assert!(matches!(
      to_detector_input(&image),
      Err(PreprocessError::InvalidImage { width: 0, height: 5 })
    ));
  }
}
