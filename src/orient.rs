// 该文件是 Shiwu （识物） 项目的一部分。
// src/orient.rs - EXIF 方向归正
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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::RgbImage;
use image::imageops;
use tracing::debug;

// EXIF Orientation (0x0112) 取值:
// 1=正常, 3=旋转180°, 6=顺时针旋转90°, 8=顺时针旋转270°；
// 镜像类取值 (2/4/5/7) 不做处理。
const ORIENTATION_ROTATE_180: u32 = 3;
const ORIENTATION_ROTATE_90: u32 = 6;
const ORIENTATION_ROTATE_270: u32 = 8;

/// 按来源文件的 EXIF 方向标记把位图转为正立方向。
///
/// 元数据缺失或读取失败一律按“无需旋转”降级处理，原值返回，不报错。
pub fn normalize(image: RgbImage, origin: &Path) -> RgbImage {
  let Some(orientation) = read_orientation(origin) else {
    debug!("无法读取 EXIF 方向信息, 按原样处理: {}", origin.display());
    return image;
  };

  debug!("EXIF 方向标记: {}", orientation);
  apply_orientation(image, orientation)
}

/// 读取来源文件的 EXIF 方向标记。任何失败都折叠为 None。
fn read_orientation(origin: &Path) -> Option<u32> {
  let file = File::open(origin).ok()?;
  let mut reader = BufReader::new(file);
  let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

  exif
    .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
    .and_then(|field| field.value.get_uint(0))
}

/// 应用方向标记。仅处理三种旋转；其余取值（含未定义与镜像）原值返回。
fn apply_orientation(image: RgbImage, orientation: u32) -> RgbImage {
  match orientation {
    ORIENTATION_ROTATE_90 => imageops::rotate90(&image),
    ORIENTATION_ROTATE_180 => imageops::rotate180(&image),
    ORIENTATION_ROTATE_270 => imageops::rotate270(&image),
    _ => image,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  fn asymmetric_image() -> RgbImage {
    let mut image = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
    image.put_pixel(0, 0, Rgb([255, 0, 0]));
    image
  }

  #[test]
  fn normal_orientation_returns_input_unchanged() {
    let image = asymmetric_image();
    let result = apply_orientation(image.clone(), 1);
    assert_eq!(result, image);
  }

  #[test]
  fn undefined_orientation_returns_input_unchanged() {
    let image = asymmetric_image();
    let result = apply_orientation(image.clone(), 0);
    assert_eq!(result, image);
  }

  #[test]
  fn mirror_orientation_is_a_no_op() {
    let image = asymmetric_image();
    let result = apply_orientation(image.clone(), 2);
    assert_eq!(result, image);
  }

  #[test]
  fn rotate_90_swaps_dimensions() {
    let image = asymmetric_image();
    let (w, h) = image.dimensions();
    let result = apply_orientation(image, ORIENTATION_ROTATE_90);
    assert_eq!(result.width(), h);
    assert_eq!(result.height(), w);
  }

  #[test]
  fn rotate_270_swaps_dimensions() {
    let image = asymmetric_image();
    let (w, h) = image.dimensions();
    let result = apply_orientation(image, ORIENTATION_ROTATE_270);
    assert_eq!(result.width(), h);
    assert_eq!(result.height(), w);
  }

  #[test]
  fn rotate_180_moves_corner_pixel() {
    let image = asymmetric_image();
    let result = apply_orientation(image, ORIENTATION_ROTATE_180);
    assert_eq!(result.dimensions(), (4, 2));
    assert_eq!(*result.get_pixel(3, 1), Rgb([255, 0, 0]));
  }

  #[test]
  fn unreadable_metadata_degrades_to_unchanged() {
    let image = asymmetric_image();
    let result = normalize(image.clone(), Path::new("/nonexistent/photo.jpg"));
    assert_eq!(result, image);
  }
}
