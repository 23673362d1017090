//! Offline imitation learning from recorded telemetry.
//!
//! Telemetry logged while birds fly is turned into a classifier that predicts
//! the jump decision from the bird's state:
//!
//! 1. [`inspect`]: profile the raw CSV (missing values, duplicates, balance)
//! 2. [`clean`]: drop incomplete and duplicate rows, min-max normalize
//! 3. [`split`]: seeded train/test split, SMOTE on the training half
//! 4. [`search`]: random search over forest hyperparameters, refit the best
//! 5. [`evaluate`]: classification report and the `Actual,Predicted` table
//!
//! [`pipeline::run`] chains steps 2 to 5 in memory. The fitted forest can fly
//! a bird through [`controller::ForestController`].
//!
//! All randomness comes from seeded PCG32 generators, so the same input file
//! always yields the same split, forest and held-out accuracy.

pub mod clean;
pub mod controller;
pub mod dataset;
pub mod evaluate;
pub mod forest;
pub mod inspect;
pub mod metrics;
pub mod pipeline;
pub mod search;
pub mod split;
pub mod tree;
