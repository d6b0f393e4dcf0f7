pub mod random;

pub use random::{choose, RandomSource, SequenceRandom, ThreadRandom};
