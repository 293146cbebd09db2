// steerpairs: contrastive training pairs for topic steering vectors.
//
// This is the library root. Each module corresponds to one stage of
// training-sample generation: config, the pair sampler, storage, the batch
// pipeline and terminal output.

pub mod config;
pub mod output;
pub mod pairs;
pub mod pipeline;
pub mod storage;
