// 该文件是 Shiwu （识物） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use shiwu::context::AppContext;
use shiwu::input::SourceWrapper;
use shiwu::model::ReplayModel;
use shiwu::output::{Present, SaveImageFileOutput};
use shiwu::{FromUrl, pipeline};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("模型制品: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let model = ReplayModel::from_url(&args.model)?;
  let context = AppContext::new(&args.labels, &args.font, model)?;
  let mut source = SourceWrapper::from_url(&args.input)?;
  let output = SaveImageFileOutput::from_url(&args.output)?;

  // 两阶段获取：先请求来源（相机来源在此写出拍摄文件），再完成解码。
  let pending = source.request()?;
  info!("待解码来源: {}", pending.origin().display());
  let photo = match pending.complete() {
    Ok(photo) => photo,
    Err(e) => {
      error!("来源解码失败, 本次不产生输出: {}", e);
      return Err(e.into());
    }
  };

  let now = std::time::Instant::now();
  let annotated = pipeline::run(&context, photo)?;
  info!("流水线完成, 耗时: {:.2?}", now.elapsed());

  output.present(&annotated)?;

  Ok(())
}
