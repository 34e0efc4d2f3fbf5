// 该文件是 Shiwu （识物） 项目的一部分。
// src/input/gallery.rs - 相册图片来源
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

use thiserror::Error;
use tracing::error;
use url::Url;

use crate::input::PendingPhoto;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum GalleryPickError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch { expected: String, found: String },
}

/// 相册来源：用户选中的既有图片文件。
///
/// 请求阶段只确定来源路径；文件是否可解码留到完成阶段判定。
pub struct GalleryPick {
  path: PathBuf,
}

impl FromUrlWithScheme for GalleryPick {
  const SCHEME: &'static str = "image";
}

impl FromUrl for GalleryPick {
  type Error = GalleryPickError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI 方案不匹配: 期望 '{}', 实际 '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(GalleryPickError::SchemeMismatch {
        expected: Self::SCHEME.to_string(),
        found: url.scheme().to_string(),
      });
    }

    let path = urlencoding::decode(url.path())
      .map(|p| p.into_owned())
      .unwrap_or_else(|_| url.path().to_string());

    Ok(GalleryPick::new(PathBuf::from(path)))
  }
}

impl GalleryPick {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn request(&self) -> PendingPhoto {
    PendingPhoto::new(self.path.clone())
  }
}
