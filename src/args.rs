// 该文件是 Shiwu （识物） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Shiwu 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测制品路径 (replay://<文件>)
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 输入来源
  /// 支持格式:
  /// - 相册图片: image://<文件路径>
  /// - 相机拍摄: camera://<V4L2 设备路径>[?dir=<拍摄目录>]
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出路径 (image://<文件>)，每次运行整体覆盖
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 标签表文件（行号即类别下标）
  #[arg(long, value_name = "FILE", default_value = "assets/labels.txt")]
  pub labels: PathBuf,

  /// 标签字体文件
  #[arg(long, value_name = "FILE")]
  pub font: PathBuf,
}
