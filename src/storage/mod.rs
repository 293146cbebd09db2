// Storage collaborators: where topic pools come from and where pair sets go.

pub mod json;
pub mod traits;
