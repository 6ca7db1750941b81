//! Offline training pipeline
//!
//! intents → corpus (vocabulary, labels, documents) → one-hot training rows →
//! fixed-recipe network fit. No validation split, no early stopping.

use crate::encoder::encode_words;
use crate::network::Network;
use crate::text::TextNormalizer;
use crate::vocabulary::{build_corpus, Corpus, LabelSet, Vocabulary};
use crate::{ChatError, IntentsFile, Result};
use candle_core::backprop::GradStore;
use candle_core::{Device, Tensor, Var, D};
use candle_nn::Optimizer;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Hyperparameters of the training recipe
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Widths of the ReLU hidden layers
    pub hidden_layers: Vec<usize>,
    /// Dropout rate after the first hidden layer
    pub dropout: f32,
    pub learning_rate: f32,
    pub momentum: f32,
    pub nesterov: bool,
    pub epochs: usize,
    pub batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![128, 64],
            dropout: 0.5,
            learning_rate: 0.01,
            momentum: 0.9,
            nesterov: true,
            epochs: 200,
            batch_size: 5,
        }
    }
}

/// Feature/label matrices, one row per training pattern
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub features: Vec<Vec<f32>>,
    pub targets: Vec<Vec<f32>>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Loss and accuracy of the last epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    pub loss: f32,
    pub accuracy: f32,
}

/// Everything training produces; the first three are persisted as artifacts
#[derive(Debug)]
pub struct TrainedClassifier {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    pub network: Network,
    pub report: TrainingReport,
}

/// Build one-hot training rows from a corpus
pub fn build_training_set(corpus: &Corpus, normalizer: &TextNormalizer) -> Result<TrainingSet> {
    let mut set = TrainingSet::default();
    for document in &corpus.documents {
        let words: Vec<String> = document
            .tokens
            .iter()
            .map(|token| normalizer.normalize(token))
            .collect();
        let label = corpus
            .labels
            .position(&document.tag)
            .ok_or_else(|| ChatError::UnknownLabel(document.tag.clone()))?;
        let mut target = vec![0.0; corpus.labels.len()];
        target[label] = 1.0;

        set.features.push(encode_words(&corpus.vocabulary, &words));
        set.targets.push(target);
    }
    Ok(set)
}

/// Momentum settings for [`MomentumSgd`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamsSgd {
    pub learning_rate: f64,
    pub momentum: f64,
    pub nesterov: bool,
}

impl From<&TrainingConfig> for ParamsSgd {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            learning_rate: config.learning_rate as f64,
            momentum: config.momentum as f64,
            nesterov: config.nesterov,
        }
    }
}

/// SGD with (optionally Nesterov) momentum
///
/// `v = momentum * v - lr * g`; the parameter moves by `v`, or by
/// `momentum * v - lr * g` with Nesterov.
pub struct MomentumSgd {
    vars: Vec<(Var, Tensor)>,
    params: ParamsSgd,
}

impl Optimizer for MomentumSgd {
    type Config = ParamsSgd;

    fn new(vars: Vec<Var>, params: ParamsSgd) -> candle_core::Result<Self> {
        let vars = vars
            .into_iter()
            .filter(|var| var.dtype().is_float())
            .map(|var| {
                let velocity = var.zeros_like()?;
                Ok((var, velocity))
            })
            .collect::<candle_core::Result<Vec<_>>>()?;
        Ok(Self { vars, params })
    }

    fn step(&mut self, grads: &GradStore) -> candle_core::Result<()> {
        let ParamsSgd {
            learning_rate: lr,
            momentum: m,
            nesterov,
        } = self.params;
        for (var, velocity) in self.vars.iter_mut() {
            let Some(grad) = grads.get(var.as_tensor()) else {
                continue;
            };
            let scaled_grad = grad.affine(lr, 0.0)?;
            *velocity = velocity.affine(m, 0.0)?.sub(&scaled_grad)?;
            let update = if nesterov {
                velocity.affine(m, 0.0)?.sub(&scaled_grad)?
            } else {
                velocity.clone()
            };
            var.set(&var.as_tensor().add(&update)?)?;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.params.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.params.learning_rate = lr;
    }
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Fit `network` on `set` with mini-batch SGD and categorical cross-entropy
pub fn fit<R: Rng + ?Sized>(
    network: &Network,
    set: &TrainingSet,
    config: &TrainingConfig,
    rng: &mut R,
) -> Result<TrainingReport> {
    let mut report = TrainingReport {
        epochs: 0,
        loss: 0.0,
        accuracy: 0.0,
    };
    if set.is_empty() {
        return Ok(report);
    }

    let device = Device::Cpu;
    let features: Vec<f32> = set.features.iter().flatten().copied().collect();
    let features = Tensor::from_vec(features, (set.len(), network.input_dim()), &device)?;
    let classes: Vec<u32> = set.targets.iter().map(|t| argmax(t) as u32).collect();
    let targets = Tensor::from_slice(&classes, set.len(), &device)?;

    let mut optimizer = MomentumSgd::new(network.vars(), ParamsSgd::from(config))?;
    let mut order: Vec<u32> = (0..set.len() as u32).collect();
    let batch_size = config.batch_size.max(1);

    for epoch in 1..=config.epochs {
        order.shuffle(rng);
        let mut total_loss = 0.0;
        let mut correct = 0usize;

        for batch in order.chunks(batch_size) {
            let ids = Tensor::from_slice(batch, batch.len(), &device)?;
            let xs = features.index_select(&ids, 0)?;
            let ys = targets.index_select(&ids, 0)?;

            let logits = network.forward(&xs, true)?;
            let loss = candle_nn::loss::cross_entropy(&logits, &ys)?;
            optimizer.backward_step(&loss)?;

            total_loss += loss.to_scalar::<f32>()? * batch.len() as f32;
            let predicted = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
            correct += predicted
                .iter()
                .zip(batch)
                .filter(|(p, row)| **p == classes[**row as usize])
                .count();
        }

        report = TrainingReport {
            epochs: epoch,
            loss: total_loss / set.len() as f32,
            accuracy: correct as f32 / set.len() as f32,
        };
        debug!(
            "epoch {}/{}: loss {:.4}, accuracy {:.4}",
            epoch, config.epochs, report.loss, report.accuracy
        );
    }

    Ok(report)
}

/// Run the whole training pipeline over an intents file
pub fn train<R: Rng + ?Sized>(
    intents: &IntentsFile,
    normalizer: &TextNormalizer,
    config: &TrainingConfig,
    rng: &mut R,
) -> Result<TrainedClassifier> {
    let corpus = build_corpus(intents, normalizer);
    if corpus.documents.is_empty() || corpus.vocabulary.is_empty() {
        return Err(ChatError::EmptyCorpus);
    }
    info!(
        "Corpus: {} documents, {} classes, {} unique lemmatized words",
        corpus.documents.len(),
        corpus.labels.len(),
        corpus.vocabulary.len()
    );

    let mut set = build_training_set(&corpus, normalizer)?;
    // Shuffle rows together so features and targets stay paired
    let mut rows: Vec<(Vec<f32>, Vec<f32>)> =
        set.features.drain(..).zip(set.targets.drain(..)).collect();
    rows.shuffle(rng);
    (set.features, set.targets) = rows.into_iter().unzip();

    let network = Network::feed_forward(
        corpus.vocabulary.len(),
        &config.hidden_layers,
        corpus.labels.len(),
        config.dropout,
        rng,
    )?;
    let report = fit(&network, &set, config, rng)?;
    info!(
        "Training finished after {} epochs: loss {:.4}, accuracy {:.4}",
        report.epochs, report.loss, report.accuracy
    );

    Ok(TrainedClassifier {
        vocabulary: corpus.vocabulary,
        labels: corpus.labels,
        network,
        report,
    })
}
