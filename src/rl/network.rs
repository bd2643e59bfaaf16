//! Neural policy learner using tch-rs (PyTorch bindings).
//!
//! Provides an MLP actor trained with REINFORCE on the admitted
//! transitions. This module is only available with the `rl-nn` feature.

use tch::{nn, nn::Module, nn::OptimizerConfig, Device, Kind, Tensor};

use super::config::TrainingConfig;
use super::error::LearnerError;
use super::policy::{LearnSummary, PolicyLearner};
use super::training::buffer::{normalized_rewards, Transition, TransitionBuffer};
use super::types::Action;

/// MLP actor network that outputs action log-probabilities.
///
/// Architecture: `obs_dim → 64 → 32 → Action::COUNT` with ReLU activations
/// and log-softmax output.
pub struct ActorNetwork {
    vs: nn::VarStore,
    net: nn::Sequential,
}

impl ActorNetwork {
    /// Creates a new actor network.
    pub fn new(obs_dim: usize, device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let p = &vs.root();
        let net = nn::seq()
            .add(nn::linear(p / "l1", obs_dim as i64, 64, Default::default()))
            .add_fn(|x| x.relu())
            .add(nn::linear(p / "l2", 64, 32, Default::default()))
            .add_fn(|x| x.relu())
            .add(nn::linear(
                p / "l3",
                32,
                Action::COUNT as i64,
                Default::default(),
            ));

        Self { vs, net }
    }

    /// Forward pass: returns log-probabilities over actions.
    pub fn forward(&self, obs: &Tensor) -> Tensor {
        self.net.forward(obs).log_softmax(-1, Kind::Float)
    }

    /// Returns a reference to the variable store.
    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }
}

/// Policy-gradient learner backed by an [`ActorNetwork`].
///
/// Can operate in greedy (argmax) or stochastic (sample) mode.
pub struct NeuralPolicyGradient {
    actor: ActorNetwork,
    optimizer: nn::Optimizer,
    config: TrainingConfig,
    observation_dim: usize,
    buffer: TransitionBuffer,
    greedy: bool,
    device: Device,
}

impl NeuralPolicyGradient {
    /// Creates a new learner with an Adam optimizer.
    ///
    /// # Arguments
    ///
    /// * `observation_dim` - Observation length (the number of view divisions)
    /// * `config` - Learning rate, repeats, and reward normalization
    /// * `device` - Device to run on (CPU or CUDA)
    pub fn new(
        observation_dim: usize,
        config: TrainingConfig,
        device: Device,
    ) -> Result<Self, tch::TchError> {
        let actor = ActorNetwork::new(observation_dim, device);
        let optimizer = nn::Adam::default().build(actor.var_store(), config.learning_rate)?;
        Ok(Self {
            actor,
            optimizer,
            config,
            observation_dim,
            buffer: TransitionBuffer::new(),
            greedy: false,
            device,
        })
    }

    /// Sets greedy mode (argmax vs sampling).
    pub fn set_greedy(&mut self, greedy: bool) {
        self.greedy = greedy;
    }

    fn batch_tensor(&self, batch: &[Transition]) -> Tensor {
        let flat: Vec<f32> = batch
            .iter()
            .flat_map(|t| t.observation.iter().map(|&x| x as f32))
            .collect();
        Tensor::from_slice(&flat)
            .reshape([batch.len() as i64, self.observation_dim as i64])
            .to_device(self.device)
    }
}

impl PolicyLearner for NeuralPolicyGradient {
    fn choose_action(&mut self, observation: &[f64]) -> Action {
        let flat: Vec<f32> = observation.iter().map(|&x| x as f32).collect();
        let index = tch::no_grad(|| {
            let obs = Tensor::from_slice(&flat)
                .to_device(self.device)
                .unsqueeze(0);
            let log_probs = self.actor.forward(&obs);
            let chosen = if self.greedy {
                log_probs.argmax(-1, false)
            } else {
                log_probs.exp().multinomial(1, true)
            };
            chosen.view([-1]).int64_value(&[0])
        });
        Action::from_index(index as usize).unwrap_or_default()
    }

    fn store_transition(&mut self, transition: Transition) {
        self.buffer.add(transition);
    }

    fn learn(&mut self) -> Result<LearnSummary, LearnerError> {
        let batch = self.buffer.drain();
        if batch.is_empty() {
            return Err(LearnerError::EmptyBuffer);
        }
        if let Some(bad) = batch
            .iter()
            .find(|t| t.observation.len() != self.observation_dim)
        {
            return Err(LearnerError::ObservationWidth {
                expected: self.observation_dim,
                actual: bad.observation.len(),
            });
        }

        let advantages: Vec<f32> = if self.config.normalize_rewards {
            normalized_rewards(&batch)
        } else {
            batch.iter().map(|t| t.reward).collect()
        }
        .into_iter()
        .map(|a| a as f32)
        .collect();
        let actions: Vec<i64> = batch.iter().map(|t| t.action.index() as i64).collect();

        let obs = self.batch_tensor(&batch);
        let actions = Tensor::from_slice(&actions).to_device(self.device);
        let advantages = Tensor::from_slice(&advantages).to_device(self.device);

        let mut loss_value = 0.0;
        for _ in 0..self.config.training_repeats {
            let chosen = self
                .actor
                .forward(&obs)
                .gather(-1, &actions.unsqueeze(-1), false)
                .squeeze_dim(-1);
            let loss = -(chosen * &advantages).mean(Kind::Float);
            loss_value = loss.double_value(&[]);
            // Never step the optimizer on a diverged loss.
            if !loss_value.is_finite() {
                return Err(LearnerError::NonFiniteLoss);
            }
            self.optimizer.zero_grad();
            loss.backward();
            self.optimizer.step();
        }

        Ok(LearnSummary {
            batch_size: batch.len(),
            loss: loss_value,
        })
    }

    fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn name(&self) -> &str {
        "neural_policy_gradient"
    }
}
