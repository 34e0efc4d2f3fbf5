// 该文件是 Shiwu （识物） 项目的一部分。
// src/bin/session.rs - 交互会话程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use url::Url;

use shiwu::context::AppContext;
use shiwu::input::{GalleryPick, PendingPhoto};
use shiwu::model::ReplayModel;
use shiwu::output::{Present, SaveImageFileOutput};
use shiwu::{FromUrl, pipeline};

#[cfg(feature = "camera_capture")]
use shiwu::input::CameraCapture;

/// Shiwu 交互会话参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测制品路径 (replay://<文件>)
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 输出路径 (image://<文件>)，每个动作整体覆盖
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 标签表文件（行号即类别下标）
  #[arg(long, value_name = "FILE", default_value = "assets/labels.txt")]
  pub labels: PathBuf,

  /// 标签字体文件
  #[arg(long, value_name = "FILE")]
  pub font: PathBuf,

  /// 相机拍摄文件目录
  #[cfg(feature = "camera_capture")]
  #[arg(long, value_name = "DIR")]
  pub capture_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  let model = ReplayModel::from_url(&args.model)?;
  let context = AppContext::new(&args.labels, &args.font, model)?;
  let output = SaveImageFileOutput::from_url(&args.output)?;

  let running = Arc::new(AtomicBool::new(true));
  {
    let running = running.clone();
    ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
  }

  #[cfg(feature = "camera_capture")]
  let capture_dir = args
    .capture_dir
    .clone()
    .unwrap_or_else(|| std::env::temp_dir().join("shiwu-captures"));

  // 单屏交互循环：一行一个动作，动作间严格串行，期间不响应新输入。
  println!("命令: gallery <路径> | camera [<设备>] | quit");
  let stdin = io::stdin();
  for line in stdin.lock().lines() {
    if !running.load(Ordering::SeqCst) {
      break;
    }

    let line = line?;
    let mut words = line.split_whitespace();

    let pending = match (words.next(), words.next()) {
      (Some("quit") | Some("exit"), _) => break,
      (Some("gallery"), Some(path)) => GalleryPick::new(PathBuf::from(path)).request(),
      (Some("gallery"), None) => {
        warn!("用法: gallery <路径>");
        continue;
      }
      #[cfg(feature = "camera_capture")]
      (Some("camera"), device) => {
        let device = device.unwrap_or("/dev/video0").to_string();
        match CameraCapture::new(device, capture_dir.clone()).request() {
          Ok(pending) => pending,
          Err(e) => {
            error!("相机拍摄失败: {}", e);
            continue;
          }
        }
      }
      #[cfg(not(feature = "camera_capture"))]
      (Some("camera"), _) => {
        warn!("未启用相机支持 (camera_capture 特性)");
        continue;
      }
      (Some(other), _) => {
        warn!("未知命令: {}", other);
        continue;
      }
      (None, _) => continue,
    };

    run_once(&context, &output, pending);
  }

  info!("会话结束");
  Ok(())
}

/// 执行一次完整动作：完成解码、跑流水线、刷新显示输出。
///
/// 任何失败都只作用于本次动作，记录日志后等待下一条命令。
fn run_once(
  context: &AppContext<ReplayModel>,
  output: &SaveImageFileOutput,
  pending: PendingPhoto,
) {
  info!("待解码来源: {}", pending.origin().display());

  let photo = match pending.complete() {
    Ok(photo) => photo,
    Err(e) => {
      error!("来源解码失败, 本次不产生输出: {}", e);
      return;
    }
  };

  let now = std::time::Instant::now();
  let annotated = match pipeline::run(context, photo) {
    Ok(image) => image,
    Err(e) => {
      error!("流水线失败: {}", e);
      return;
    }
  };
  info!("流水线完成, 耗时: {:.2?}", now.elapsed());

  if let Err(e) = output.present(&annotated) {
    error!("输出写入失败: {}", e);
  }
}
