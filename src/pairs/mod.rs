// Contrastive pair construction: the core of training-sample generation.

pub mod error;
pub mod kinds;
pub mod sampler;
