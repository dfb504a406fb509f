use crate::core::features::{FeatureVector, FEATURE_DIM};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Assigns a preference score to a unit's feature vector.
///
/// Higher is better. Implementations are shared read-only across request
/// handlers, hence `Send + Sync`.
pub trait Scorer: Send + Sync {
    fn score(&self, features: &FeatureVector) -> f64;

    fn score_batch(&self, batch: &[FeatureVector]) -> Vec<f64> {
        batch.iter().map(|features| self.score(features)).collect()
    }
}

/// Errors that can occur while loading model parameters
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed parameters: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid network shape: {0}")]
    Shape(String),

    #[error("parameters contain non-finite values")]
    NonFinite,
}

#[derive(Debug, Clone, Deserialize)]
struct DenseLayer {
    /// Row-major, one row per output unit
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64], relu: bool) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                let sum = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                if relu { sum.max(0.0) } else { sum }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct NetworkParams {
    layers: Vec<DenseLayer>,
}

/// Feed-forward Q-value network over unit feature vectors
///
/// Dense layers with ReLU on every hidden layer and a linear single-unit
/// output.
#[derive(Debug, Clone)]
pub struct QNetwork {
    layers: Vec<DenseLayer>,
}

impl QNetwork {
    /// Load parameters from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate parameters from a JSON document
    ///
    /// ```json
    /// { "layers": [ { "weights": [[...], ...], "bias": [...] }, ... ] }
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let params: NetworkParams = serde_json::from_str(raw)?;
        Self::from_layers(params.layers)
    }

    fn from_layers(layers: Vec<DenseLayer>) -> Result<Self, ModelError> {
        if layers.is_empty() {
            return Err(ModelError::Shape("no layers".to_string()));
        }

        let mut expected_inputs = FEATURE_DIM;
        for (i, layer) in layers.iter().enumerate() {
            if layer.outputs() == 0 {
                return Err(ModelError::Shape(format!("layer {} has no units", i)));
            }
            if layer.weights.iter().any(|row| row.len() != expected_inputs) {
                return Err(ModelError::Shape(format!(
                    "layer {} expects {} inputs per unit",
                    i, expected_inputs
                )));
            }
            if layer.bias.len() != layer.outputs() {
                return Err(ModelError::Shape(format!(
                    "layer {} has {} biases for {} units",
                    i,
                    layer.bias.len(),
                    layer.outputs()
                )));
            }
            let finite = layer.weights.iter().flatten().chain(&layer.bias).all(|v| v.is_finite());
            if !finite {
                return Err(ModelError::NonFinite);
            }
            expected_inputs = layer.outputs();
        }

        if expected_inputs != 1 {
            return Err(ModelError::Shape(format!(
                "output layer has {} units, expected 1",
                expected_inputs
            )));
        }

        Ok(Self { layers })
    }

    /// Widths of each layer from input to output
    pub fn shape(&self) -> Vec<usize> {
        std::iter::once(self.layers[0].inputs())
            .chain(self.layers.iter().map(DenseLayer::outputs))
            .collect()
    }
}

impl Scorer for QNetwork {
    fn score(&self, features: &FeatureVector) -> f64 {
        let last = self.layers.len() - 1;
        let output = self
            .layers
            .iter()
            .enumerate()
            .fold(features.as_slice().to_vec(), |activations, (i, layer)| {
                layer.forward(&activations, i != last)
            });
        output[0]
    }
}

/// Readiness of the learned scorer, decided once at startup
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<dyn Scorer>),
    Unavailable { reason: String },
}

impl ModelState {
    /// Attempt to load the network; any failure degrades to `Unavailable`
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No model weights configured, allocation uses nearest-unit fallback");
            return Self::unavailable("no weights path configured");
        };

        match QNetwork::load(path) {
            Ok(network) => {
                tracing::info!(
                    "Loaded allocation model from {} (shape {:?})",
                    path.display(),
                    network.shape()
                );
                Self::ready(network)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load allocation model from {}: {}; falling back to nearest unit",
                    path.display(),
                    e
                );
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn ready<S: Scorer + 'static>(scorer: S) -> Self {
        ModelState::Ready(Arc::new(scorer))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelState::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelState::Ready(_) => write!(f, "Ready"),
            ModelState::Unavailable { reason } => write!(f, "Unavailable({})", reason),
        }
    }
}
