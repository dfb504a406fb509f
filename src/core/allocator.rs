use crate::core::distance::round_km;
use crate::core::features::{extract_features, FeatureVector};
use crate::core::matcher::distance_order;
use crate::core::scoring::ModelState;
use crate::models::{AllocationRequest, Ambulance, Candidate, RankedResult};
use serde::Serialize;
use std::cmp::Ordering;

/// Which selection rule produced an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Learned,
    Nearest,
}

/// Outcome of an allocation
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Index into the candidate slice; `None` when nothing was selectable
    pub selected: Option<usize>,
    /// Per-candidate scores aligned with the input under the learned policy;
    /// units skipped for missing coordinates score `None`
    pub scores: Option<Vec<Option<f64>>>,
    pub policy: Policy,
    pub skipped_no_coords: usize,
}

/// Mobile-unit allocator with learned scoring and nearest-unit fallback
///
/// Without a ready model the choice is exactly the nearest unit to the
/// incident, as ranked by [`Matcher::nearest`](crate::core::Matcher::nearest).
#[derive(Debug, Clone)]
pub struct Allocator {
    model: ModelState,
}

impl Allocator {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_ready()
    }

    pub fn policy(&self) -> Policy {
        if self.model.is_ready() {
            Policy::Learned
        } else {
            Policy::Nearest
        }
    }

    /// Pick the unit to send to `request.incident`
    pub fn allocate(&self, request: &AllocationRequest, candidates: &[Ambulance]) -> Allocation {
        match &self.model {
            ModelState::Unavailable { .. } => {
                let order = distance_order(request.incident, candidates);
                Allocation {
                    selected: order.first().map(|(index, _)| *index),
                    scores: None,
                    policy: Policy::Nearest,
                    skipped_no_coords: candidates.len() - order.len(),
                }
            }
            ModelState::Ready(scorer) => {
                let scores = score_units(scorer.as_ref(), request, candidates);
                let skipped_no_coords = scores.iter().filter(|s| s.is_none()).count();
                let selected = best_score(&scores);

                tracing::debug!(
                    "Scored {} units, selected {:?}",
                    candidates.len() - skipped_no_coords,
                    selected
                );

                Allocation {
                    selected,
                    scores: Some(scores),
                    policy: Policy::Learned,
                    skipped_no_coords,
                }
            }
        }
    }

    /// Full ordering of positioned units under the active policy.
    ///
    /// Non-decreasing distance under the fallback, non-increasing score under
    /// the learned policy; ties keep input order. The first entry is always
    /// the unit [`allocate`](Self::allocate) selects.
    pub fn rank(&self, request: &AllocationRequest, candidates: &[Ambulance]) -> Vec<RankedResult<Ambulance>> {
        let order = distance_order(request.incident, candidates);

        match &self.model {
            ModelState::Unavailable { .. } => order
                .into_iter()
                .map(|(index, distance)| RankedResult {
                    candidate: candidates[index].clone(),
                    distance: round_km(distance),
                    score: None,
                })
                .collect(),
            ModelState::Ready(scorer) => {
                let scores = score_units(scorer.as_ref(), request, candidates);
                let mut ranked: Vec<(usize, f64, f64)> = order
                    .into_iter()
                    .filter_map(|(index, distance)| {
                        scores[index]
                            .filter(|s| !s.is_nan())
                            .map(|score| (index, distance, score))
                    })
                    .collect();

                // Restore input order before the stable score sort so ties match `allocate`
                ranked.sort_by_key(|(index, _, _)| *index);
                // -0.0 ties with 0.0, as in `best_score`
                ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

                ranked
                    .into_iter()
                    .map(|(index, distance, score)| RankedResult {
                        candidate: candidates[index].clone(),
                        distance: round_km(distance),
                        score: Some(score),
                    })
                    .collect()
            }
        }
    }
}

fn score_units(
    scorer: &dyn crate::core::scoring::Scorer,
    request: &AllocationRequest,
    candidates: &[Ambulance],
) -> Vec<Option<f64>> {
    let positioned: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.position().is_some())
        .map(|(index, _)| index)
        .collect();

    let batch: Vec<FeatureVector> = positioned
        .iter()
        .map(|&index| extract_features(request, &candidates[index]))
        .collect();

    let mut scores = vec![None; candidates.len()];
    for (index, score) in positioned.into_iter().zip(scorer.score_batch(&batch)) {
        scores[index] = Some(score);
    }
    scores
}

// First index wins ties; NaN never wins
fn best_score(scores: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.iter().enumerate() {
        let Some(score) = score.filter(|s| !s.is_nan()) else {
            continue;
        };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}
