// 该文件是 Shiwu （识物） 项目的一部分。
// src/input/camera.rs - V4L2 相机拍摄来源
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

use std::path::PathBuf;

use chrono::Local;
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use crate::input::PendingPhoto;
use crate::{FromUrl, FromUrlWithScheme};

const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;
const DEFAULT_DEVICE: &str = "/dev/video0";

#[derive(Error, Debug)]
pub enum CameraCaptureError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("V4L2 设备错误: {0}")]
  Device(String),
  #[error("不支持的像素格式: {0}")]
  UnsupportedPixelFormat(String),
  #[error("拍摄帧数据无效")]
  BadFrame,
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("拍摄文件写入错误: {0}")]
  Encode(#[from] image::ImageError),
}

/// 相机来源：请求阶段从 V4L2 设备抓取一帧，
/// 写为拍摄目录下带时间戳的 JPEG 文件，再交由完成阶段解码。
///
/// 拍摄文件落盘后不做清理，由宿主环境自行回收。
pub struct CameraCapture {
  device_path: String,
  capture_dir: PathBuf,
  shot_serial: u16,
}

impl FromUrlWithScheme for CameraCapture {
  const SCHEME: &'static str = "camera";
}

impl FromUrl for CameraCapture {
  type Error = CameraCaptureError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(CameraCaptureError::SchemeMismatch);
    }

    // 形如 camera:///dev/video0?dir=/path/to/captures
    let device_path = if url.path().is_empty() {
      DEFAULT_DEVICE.to_string()
    } else {
      url.path().to_string()
    };

    let capture_dir = url
      .query_pairs()
      .find(|(key, _)| key == "dir")
      .map(|(_, value)| PathBuf::from(value.into_owned()))
      .unwrap_or_else(default_capture_dir);

    Ok(CameraCapture::new(device_path, capture_dir))
  }
}

fn default_capture_dir() -> PathBuf {
  std::env::temp_dir().join("shiwu-captures")
}

impl CameraCapture {
  pub fn new(device_path: String, capture_dir: PathBuf) -> Self {
    Self {
      device_path,
      capture_dir,
      shot_serial: 0,
    }
  }

  /// 拍摄一张照片并写入拍摄目录，返回指向该文件的挂起令牌。
  pub fn request(&mut self) -> Result<PendingPhoto, CameraCaptureError> {
    let image = self.grab_frame()?;

    std::fs::create_dir_all(&self.capture_dir)?;
    self.shot_serial = self.shot_serial.wrapping_add(1);
    let filename = format!(
      "JPEG_{}_{:04X}.jpg",
      Local::now().format("%Y%m%d_%H%M%S"),
      self.shot_serial
    );
    let path = self.capture_dir.join(filename);
    image.save(&path)?;
    info!("相机拍摄已写入: {}", path.display());

    Ok(PendingPhoto::new(path))
  }

  fn grab_frame(&self) -> Result<RgbImage, CameraCaptureError> {
    let device = Device::with_path(&self.device_path)
      .map_err(|e| CameraCaptureError::Device(e.to_string()))?;

    let mut format = device
      .format()
      .map_err(|e| CameraCaptureError::Device(e.to_string()))?;
    format.width = CAPTURE_WIDTH;
    format.height = CAPTURE_HEIGHT;
    format.fourcc = FourCC::new(b"YUYV");
    let format = device
      .set_format(&format)
      .map_err(|e| CameraCaptureError::Device(e.to_string()))?;

    if format.fourcc != FourCC::new(b"YUYV") {
      return Err(CameraCaptureError::UnsupportedPixelFormat(
        format.fourcc.to_string(),
      ));
    }

    let mut stream = Stream::with_buffers(&device, Type::VideoCapture, 4)
      .map_err(|e| CameraCaptureError::Device(e.to_string()))?;
    let (buffer, _meta) = stream
      .next()
      .map_err(|e| CameraCaptureError::Device(e.to_string()))?;

    debug!(
      "抓取到 {} 字节帧数据 ({}x{})",
      buffer.len(),
      format.width,
      format.height
    );

    let expected = (format.width * format.height * 2) as usize;
    if buffer.len() < expected {
      return Err(CameraCaptureError::BadFrame);
    }

    let rgb = yuyv_to_rgb(&buffer[..expected]);
    RgbImage::from_raw(format.width, format.height, rgb).ok_or(CameraCaptureError::BadFrame)
  }
}

/// 将 YUYV 帧转换为 RGB 字节序列。
fn yuyv_to_rgb(yuyv: &[u8]) -> Vec<u8> {
  let mut rgb = Vec::with_capacity(yuyv.len() / 2 * 3);

  for chunk in yuyv.chunks_exact(4) {
    let y0 = chunk[0] as f32;
    let u = chunk[1] as f32 - 128.0;
    let y1 = chunk[2] as f32;
    let v = chunk[3] as f32 - 128.0;

    for y in [y0, y1] {
      let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
      let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
      let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
      rgb.extend_from_slice(&[r, g, b]);
    }
  }

  rgb
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yuyv_conversion_doubles_pixel_count() {
    // 两个 YUYV 四字节组 → 四个 RGB 像素
    let yuyv = [128u8, 128, 128, 128, 255, 128, 0, 128];
    let rgb = yuyv_to_rgb(&yuyv);
    assert_eq!(rgb.len(), 12);
  }

  #[test]
  fn neutral_chroma_maps_luma_to_gray() {
    let rgb = yuyv_to_rgb(&[100, 128, 200, 128]);
    assert_eq!(&rgb[0..3], &[100, 100, 100]);
    assert_eq!(&rgb[3..6], &[200, 200, 200]);
  }
}
