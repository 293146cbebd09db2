// Pipelines that drive the sampler against storage.

pub mod training_samples;
