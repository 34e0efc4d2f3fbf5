// 该文件是 Shiwu （识物） 项目的一部分。
// src/model/replay.rs - 录制制品回放模型
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

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::model::{DetectOutput, Model};
use crate::preprocess::DetectorInput;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum ReplayModelError {
  #[error("模型制品读取错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("模型制品解析错误: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("模型制品无效: {0}")]
  Invalid(String),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

/// 录制的检测制品：预先算好的平行数组，JSON 编码。
#[derive(Debug, Deserialize)]
struct ReplayArtifact {
  locations: Vec<[f32; 4]>,
  classes: Vec<f32>,
  scores: Vec<f32>,
}

/// 回放模型：启动时加载一次录制制品，对每次 `infer` 回放同一组候选。
///
/// 真实检测网络是外部预编译制品，本项目不实现其内部运算；
/// 回放模型以同一 `Model` 接口注入，使流水线可离线运行与测试。
pub struct ReplayModel {
  output: DetectOutput,
  source: String,
}

impl FromUrlWithScheme for ReplayModel {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayModel {
  type Error = ReplayModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayModelError::SchemeMismatch);
    }

    let path = urlencoding::decode(url.path())
      .map(|p| p.into_owned())
      .unwrap_or_else(|_| url.path().to_string());

    info!("加载检测制品: {}", path);
    let data = std::fs::read(&path)?;
    let artifact: ReplayArtifact = serde_json::from_slice(&data)?;
    let model = Self::from_artifact(artifact, path)?;
    info!("检测制品加载完成, 候选数: {}", model.output.len());

    Ok(model)
  }
}

impl ReplayModel {
  fn from_artifact(artifact: ReplayArtifact, source: String) -> Result<Self, ReplayModelError> {
    let output = DetectOutput {
      locations: artifact.locations.into_boxed_slice(),
      classes: artifact.classes.into_boxed_slice(),
      scores: artifact.scores.into_boxed_slice(),
    };

    if !output.is_parallel() {
      return Err(ReplayModelError::Invalid(format!(
        "数组长度不一致: locations={}, classes={}, scores={}",
        output.locations.len(),
        output.classes.len(),
        output.scores.len()
      )));
    }

    Ok(ReplayModel { output, source })
  }

  /// 制品中的固定候选数 N。
  pub fn candidate_count(&self) -> usize {
    self.output.len()
  }
}

impl Model for ReplayModel {
  type Input = DetectorInput;
  type Error = ReplayModelError;

  fn infer(&self, _input: &DetectorInput) -> Result<DetectOutput, ReplayModelError> {
    debug!("回放检测制品: {}", self.source);
    Ok(self.output.clone())
  }
}

impl Drop for ReplayModel {
  fn drop(&mut self) {
    // 模型句柄在所有退出路径上恰好释放一次。
    info!("释放模型资源: {}", self.source);
  }
}
