// 该文件是 Shiwu （识物） 项目的一部分。
// src/input.rs - 图像获取
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

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::debug;

use crate::FromUrl;

mod gallery;
pub use self::gallery::{GalleryPick, GalleryPickError};

#[cfg(feature = "camera_capture")]
mod camera;
#[cfg(feature = "camera_capture")]
pub use self::camera::{CameraCapture, CameraCaptureError};

#[derive(Error, Debug)]
pub enum AcquireError {
  #[error("相册来源错误: {0}")]
  GalleryPick(#[from] GalleryPickError),
  #[cfg(feature = "camera_capture")]
  #[error("相机来源错误: {0}")]
  CameraCapture(#[from] CameraCaptureError),
  #[error("来源文件读取错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("图像解码错误: {0}")]
  Decode(#[from] image::ImageError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

/// 两阶段获取协议的挂起令牌：字节来源已确定，尚未解码。
pub struct PendingPhoto {
  origin: PathBuf,
}

impl PendingPhoto {
  pub(crate) fn new(origin: PathBuf) -> Self {
    Self { origin }
  }

  pub fn origin(&self) -> &Path {
    &self.origin
  }

  /// 完成获取：解码来源文件。
  ///
  /// 解码失败即中止本次流水线调用，不产生任何输出位图。
  pub fn complete(self) -> Result<Photo, AcquireError> {
    let image = ImageReader::open(&self.origin)?.decode()?.to_rgb8();
    debug!(
      "来源解码完成: {} ({}x{})",
      self.origin.display(),
      image.width(),
      image.height()
    );

    Ok(Photo {
      image,
      origin: self.origin,
    })
  }
}

/// 解码完成的照片及其字节级来源路径（供方向元数据查询）。
pub struct Photo {
  pub image: RgbImage,
  pub origin: PathBuf,
}

pub enum SourceWrapper {
  Gallery(GalleryPick),
  #[cfg(feature = "camera_capture")]
  Camera(CameraCapture),
}

impl FromUrl for SourceWrapper {
  type Error = AcquireError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == GalleryPick::SCHEME {
        let source = GalleryPick::from_url(url)?;
        return Ok(SourceWrapper::Gallery(source));
      }
    }
    #[cfg(feature = "camera_capture")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == CameraCapture::SCHEME {
        let source = CameraCapture::from_url(url)?;
        return Ok(SourceWrapper::Camera(source));
      }
    }
    Err(AcquireError::SchemeMismatch)
  }
}

impl SourceWrapper {
  /// 发起一次获取请求，返回挂起令牌。
  ///
  /// 相机来源在此阶段完成实际拍摄并写出拍摄文件。
  pub fn request(&mut self) -> Result<PendingPhoto, AcquireError> {
    match self {
      SourceWrapper::Gallery(source) => Ok(source.request()),
      #[cfg(feature = "camera_capture")]
      SourceWrapper::Camera(source) => Ok(source.request()?),
    }
  }
}
