// 该文件是 Shiwu （识物） 项目的一部分。
// src/pipeline.rs - 检测流水线
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
use thiserror::Error;
use tracing::debug;

use crate::context::AppContext;
use crate::input::Photo;
use crate::model::Model;
use crate::orient;
use crate::preprocess::{self, DetectorInput, PreprocessError};
use crate::select::{self, Selection};

#[derive(Error, Debug)]
pub enum PipelineError<E> {
  #[error("预处理错误: {0}")]
  Preprocess(#[from] PreprocessError),
  #[error("推理错误: {0}")]
  Infer(E),
}

/// 跑完一张照片的完整流水线：转正 → 预处理 → 推理 → 选优 → 绘制。
///
/// 严格串行，单图进单图出，在调用线程上同步完成。
/// 无有效检出时输出即为未标注的正立位图，不视为错误。
pub fn run<M>(
  context: &AppContext<M>,
  photo: Photo,
) -> Result<RgbImage, PipelineError<M::Error>>
where
  M: Model<Input = DetectorInput>,
{
  let (upright, selection) = evaluate(&context.model, photo)?;

  match selection {
    Some(selection) => {
      debug!(
        "最佳候选: 槽位 {}, 类别 {}, 置信度 {:.4}",
        selection.slot, selection.class_index, selection.score
      );
      Ok(context.draw.annotate(&upright, &context.labels, &selection))
    }
    None => Ok(upright),
  }
}

/// 流水线求值段：转正、预处理、推理、选优。
///
/// 返回转正后的原尺寸位图与选中结果，绘制留给调用方分支。
fn evaluate<M>(
  model: &M,
  photo: Photo,
) -> Result<(RgbImage, Option<Selection>), PipelineError<M::Error>>
where
  M: Model<Input = DetectorInput>,
{
  let upright = orient::normalize(photo.image, &photo.origin);

  let tensor = preprocess::to_detector_input(&upright)?;
  let output = model.infer(&tensor).map_err(PipelineError::Infer)?;
  // 候选框坐标仅记录，不参与绘制。
  debug!("候选框: {:?}", output.locations);
  debug!("候选置信度: {:?}", output.scores);

  let selection = select::best_detection(&output);
  Ok((upright, selection))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::DetectOutput;
  use crate::output::draw::Draw;
  use image::Rgb;
  use std::convert::Infallible;
  use std::path::PathBuf;

  /// 以固定平行数组替代外部模型制品。
  struct StubModel {
    output: DetectOutput,
  }

  impl StubModel {
    fn new(scores: &[f32], classes: &[f32]) -> Self {
      Self {
        output: DetectOutput {
          locations: vec![[0.0, 0.0, 1.0, 1.0]; scores.len()].into_boxed_slice(),
          classes: classes.to_vec().into_boxed_slice(),
          scores: scores.to_vec().into_boxed_slice(),
        },
      }
    }
  }

  impl Model for StubModel {
    type Input = DetectorInput;
    type Error = Infallible;

    fn infer(&self, _input: &DetectorInput) -> Result<DetectOutput, Infallible> {
      Ok(self.output.clone())
    }
  }

  fn photo(width: u32, height: u32) -> Photo {
    Photo {
      image: RgbImage::from_pixel(width, height, Rgb([40, 80, 120])),
      origin: PathBuf::from("/nonexistent/shot.jpg"),
    }
  }

  #[test]
  fn all_zero_scores_pass_the_bitmap_through_unannotated() {
    let model = StubModel::new(&[0.0; 10], &[0.0; 10]);
    let input = photo(32, 24);
    let expected = input.image.clone();

    let (upright, selection) = evaluate(&model, input).unwrap();
    assert_eq!(selection, None);
    assert_eq!(upright, expected);
  }

  #[test]
  fn below_threshold_scores_select_nothing() {
    let model = StubModel::new(&[0.1, 0.5, 0.49], &[1.0, 2.0, 3.0]);
    let (_, selection) = evaluate(&model, photo(20, 20)).unwrap();
    assert_eq!(selection, None);
  }

  #[test]
  fn qualifying_candidate_is_selected_with_its_class() {
    let model = StubModel::new(&[0.9, 0.2], &[0.0, 1.0]);
    let (upright, selection) = evaluate(&model, photo(32, 24)).unwrap();

    let selection = selection.unwrap();
    assert_eq!(selection.slot, 0);
    assert_eq!(selection.class_index, 0);
    assert_eq!(selection.score, 0.9);
    // 转正阶段对无元数据的来源不改动位图
    assert_eq!(upright.dimensions(), (32, 24));
  }

  #[test]
  fn selection_matches_label_text_end_to_end() {
    let labels = crate::labels::LabelTable::from_lines(["cat", "dog"]);
    let model = StubModel::new(&[0.9, 0.2], &[0.0, 1.0]);
    let (_, selection) = evaluate(&model, photo(16, 16)).unwrap();

    let text = Draw::format_label(&labels, &selection.unwrap());
    assert_eq!(text, "cat: 90.00%");
  }
}
