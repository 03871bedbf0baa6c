//! Runtime configuration: surface ids and simulation tuning.
//!
//! Every field has a default, so a host page may supply any subset as JSON.
//! The visual theme is fixed and lives in [`theme`](super::theme).

use serde::Deserialize;

use crate::error::EngineError;

/// Stable identifiers of the two display surfaces.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountIds {
	/// Element the graph canvas is mounted into.
	pub canvas: String,
	/// Element the detail inspector writes into.
	pub details: String,
}

impl Default for MountIds {
	fn default() -> Self {
		Self {
			canvas: "mindmap".into(),
			details: "mindmap-details".into(),
		}
	}
}

/// Force simulation parameters, mirroring `force_graph::SimulationParameters`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsOptions {
	/// Node repulsion. Kept high so unconnected clusters drift apart.
	pub charge: f32,
	/// Edge spring stiffness.
	pub spring: f32,
	/// Upper bound on the force applied to a node per step.
	pub max_force: f32,
	pub node_speed: f32,
	/// Velocity retained between steps, in `(0, 1]`.
	pub damping: f32,
	pub node_mass: f32,
}

impl Default for PhysicsOptions {
	fn default() -> Self {
		Self {
			charge: 400.0,
			spring: 0.04,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			node_mass: 10.0,
		}
	}
}

/// Controls the one-off settling run at initialization.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StabilizationOptions {
	/// Maximum simulation steps.
	pub iterations: usize,
	/// Simulated seconds per step.
	pub time_step: f32,
	/// Largest per-step node displacement (world units) considered settled.
	pub min_motion: f32,
}

impl Default for StabilizationOptions {
	fn default() -> Self {
		Self {
			iterations: 1000,
			time_step: 0.016,
			min_motion: 0.05,
		}
	}
}

/// Options passed to a graph engine on construction.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
	pub physics: PhysicsOptions,
	pub stabilization: StabilizationOptions,
}

impl EngineOptions {
	/// Rejects values the simulation cannot run with.
	pub fn validate(&self) -> Result<(), EngineError> {
		let p = &self.physics;
		let finite = [p.charge, p.spring, p.max_force, p.node_speed, p.damping, p.node_mass];
		if finite.iter().any(|v| !v.is_finite()) {
			return Err(EngineError::InvalidOptions("physics values must be finite".into()));
		}
		if !(p.damping > 0.0 && p.damping <= 1.0) {
			return Err(EngineError::InvalidOptions(format!(
				"damping must be in (0, 1], got {}",
				p.damping
			)));
		}
		if p.node_mass <= 0.0 {
			return Err(EngineError::InvalidOptions("node mass must be positive".into()));
		}
		let s = &self.stabilization;
		if s.iterations == 0 {
			return Err(EngineError::InvalidOptions(
				"stabilization needs at least one iteration".into(),
			));
		}
		if !(s.time_step.is_finite() && s.time_step > 0.0) || !s.min_motion.is_finite() {
			return Err(EngineError::InvalidOptions(
				"stabilization step and threshold must be positive and finite".into(),
			));
		}
		Ok(())
	}
}

/// Complete component configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
	pub mount: MountIds,
	#[serde(flatten)]
	pub engine: EngineOptions,
}
