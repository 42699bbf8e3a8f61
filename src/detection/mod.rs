//! Detection implementation submodule.
//!
//! This module contains the building blocks the [`Detector`](crate::Detector)
//! chains together:
//!
//! - `parser`: regex-based banner parsing
//! - `strategy`: the three ways of obtaining a descriptor
//! - `refine`: registry and deployment path version refinement
//! - `registry`, `module_path`: real host sources for the refiners

mod module_path;
mod parser;
mod refine;
mod registry;
mod strategy;

pub use module_path::LoadedModulePath;
pub use parser::DescriptorParser;
pub use refine::{
    version_from_deployment_path, DeploymentPathRefiner, Refiner, RegistryRefiner,
    SHARED_FRAMEWORK_MARKER,
};
pub use registry::RegQueryRegistry;
pub use strategy::{
    DetectionStrategy, EnvironmentCountersStrategy, MonoProbeStrategy, NativeDescriptorStrategy,
    StrategyKind,
};
