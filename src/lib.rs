#[path = "core/error.rs"]
pub mod error;

#[path = "core/neuron.rs"]
pub mod neuron;

#[path = "core/layer.rs"]
pub mod layer;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/params.rs"]
pub mod params;
