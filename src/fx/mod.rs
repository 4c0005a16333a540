//! Effect engines
//!
//! Everything here is host-driven: engines never schedule themselves. A host
//! calls `tick(now_ms)` and keeps calling while it returns `true`.
//! - Integration is per tick, not per second (effects were tuned at display refresh rate)
//! - Delayed emissions go through a `Timeline` advanced by the host clock
//! - No platform dependencies; painting goes through `render::Surface`

pub mod confetti;
pub mod engine;
pub mod fireworks;
pub mod frame_loop;
pub mod matrix;
pub mod particle;
pub mod pop;
pub mod timeline;

pub use confetti::{Confetti, ConfettiSystem};
pub use engine::{Behavior, ParticleSystem, World};
pub use fireworks::{Fireworks, FireworksEvent, FireworksSystem};
pub use frame_loop::{Animation, FrameId, FrameLoop, FrameScheduler, ManualScheduler};
pub use matrix::MatrixRain;
pub use particle::{ConfettiShape, Particle, Payload, PopKind};
pub use pop::{MarriagePopEffects, Pop, PopEvent};
pub use timeline::Timeline;
