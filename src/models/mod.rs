//! Data models for statement parameters

mod parameter;

pub use parameter::{Parameter, ParameterSet, ParameterType, ParameterValue};
