//! float_clock_core - state and behavior of a floating clock widget
//!
//! Everything here is independent of any windowing toolkit. A host supplies
//! [`WindowHost`], [`MenuHost`], a [`MetricSource`] and a
//! [`LoginItemRegistrar`], then feeds [`HostEvent`]s to a
//! [`DisplayController`] from a single thread.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod login;
pub mod menu;
pub mod metrics;
pub mod timer;

// Re-exports for convenience
pub use config::{ConfigStore, Configuration, Rgba};
pub use controller::DisplayController;
pub use error::{AppError, Result};
pub use geometry::{Point, Rect};
pub use host::{ControlFlow, HostEvent, Label, MenuHost, SurfaceStyle, WindowHost};
pub use layout::{LayoutResult, LineRole};
pub use login::{LoginItem, LoginItemRegistrar};
pub use menu::{MenuAction, MenuEntry, MenuInput, MenuItem};
pub use metrics::{MetricSource, MetricsSampler, SystemSource};
pub use timer::{TimerEngine, TimerPhase, TimerState};
