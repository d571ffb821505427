mod processes;

pub mod error;
pub mod slurm;

pub(crate) mod queue;

pub use crate::processes::*;
