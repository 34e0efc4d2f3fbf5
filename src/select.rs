// 该文件是 Shiwu （识物） 项目的一部分。
// src/select.rs - 最佳检测选取
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

use tracing::debug;

use crate::model::DetectOutput;

/// 有效检出必须超过的置信度阈值。
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// 选中的最佳候选。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
  /// 候选槽位（平行数组下标）。
  pub slot: usize,
  /// 类别下标，由平行数组中的浮点类别值截断而来。
  pub class_index: usize,
  /// 胜出置信度。
  pub score: f32,
}

/// 线性扫描置信度数组，取严格最大者。
///
/// 从 0.0 起步用严格大于比较，因此相等分数保留先出现者，
/// 全零数组不产生候选；随后经固定阈值闸门，未过阈值即视为无检出。
pub fn best_detection(output: &DetectOutput) -> Option<Selection> {
  let mut best_slot = None;
  let mut best_score = 0.0f32;

  for (slot, &score) in output.scores.iter().enumerate() {
    if score > best_score {
      best_score = score;
      best_slot = Some(slot);
    }
  }

  let slot = best_slot?;
  if best_score <= CONFIDENCE_THRESHOLD {
    debug!(
      "最高置信度 {:.4} 未过阈值 {}, 无有效检出",
      best_score, CONFIDENCE_THRESHOLD
    );
    return None;
  }

  Some(Selection {
    slot,
    class_index: output.classes[slot] as usize,
    score: best_score,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn output_from_scores(scores: &[f32]) -> DetectOutput {
    DetectOutput {
      locations: vec![[0.0; 4]; scores.len()].into_boxed_slice(),
      classes: (0..scores.len()).map(|i| i as f32).collect(),
      scores: scores.to_vec().into_boxed_slice(),
    }
  }

  #[test]
  fn earliest_index_wins_on_ties() {
    let output = output_from_scores(&[0.3, 0.7, 0.7, 0.2]);
    let selection = best_detection(&output).unwrap();
    assert_eq!(selection.slot, 1);
    assert_eq!(selection.score, 0.7);
  }

  #[test]
  fn scores_at_or_below_threshold_yield_nothing() {
    let output = output_from_scores(&[0.1, 0.5, 0.49]);
    assert_eq!(best_detection(&output), None);
  }

  #[test]
  fn all_zero_scores_yield_nothing() {
    let output = output_from_scores(&[0.0, 0.0, 0.0]);
    assert_eq!(best_detection(&output), None);
  }

  #[test]
  fn empty_output_yields_nothing() {
    let output = output_from_scores(&[]);
    assert_eq!(best_detection(&output), None);
  }

  #[test]
  fn single_qualifying_candidate_is_selected() {
    let output = output_from_scores(&[0.2, 0.9, 0.4]);
    let selection = best_detection(&output).unwrap();
    assert_eq!(selection.slot, 1);
    assert_eq!(selection.class_index, 1);
  }

  #[test]
  fn class_value_is_truncated_to_index() {
    let mut output = output_from_scores(&[0.8]);
    output.classes = vec![16.9].into_boxed_slice();
    let selection = best_detection(&output).unwrap();
    assert_eq!(selection.class_index, 16);
  }
}
