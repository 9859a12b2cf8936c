pub mod classifier;
pub mod complexity;
pub mod ingredients;
pub mod nutriscore;
pub mod stats;
pub mod tags;
