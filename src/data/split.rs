use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::data::example::CountExample;

pub const DEFAULT_SEED: u64 = 42;

/// Requested split proportions.
///
/// Boundaries are computed as `train_end = floor(n * train)` and
/// `dev_end = train_end + floor(n * dev)`; the test subset receives whatever
/// remains, so `test` is never consulted directly and rounding slack always
/// lands in the test subset. On tiny datasets this can leave the dev subset
/// empty even with a nonzero `dev` ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub dev: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, dev: f64, test: f64) -> Self {
        Self { train, dev, test }
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self::new(0.7, 0.15, 0.15)
    }
}

/// Disjoint train/dev/test subsets whose sizes sum to the original dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetSplit {
    pub train: Vec<CountExample>,
    pub dev: Vec<CountExample>,
    pub test: Vec<CountExample>,
}

impl DatasetSplit {
    pub fn len(&self) -> usize {
        self.train.len() + self.dev.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministically shuffles `dataset` and partitions it into
/// train/dev/test subsets.
///
/// The permutation is a pure function of `(dataset order, seed)`: the RNG is
/// seeded locally per call, so repeated splits with the same inputs reproduce
/// the same membership and order, regardless of any other randomness in the
/// process. An empty dataset yields three empty subsets.
pub fn split_dataset(dataset: &[CountExample], ratios: SplitRatios, seed: u64) -> DatasetSplit {
    let mut shuffled = dataset.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let total = shuffled.len();
    let train_end = ((total as f64 * ratios.train) as usize).min(total);
    let dev_end = (train_end + (total as f64 * ratios.dev) as usize).min(total);

    let test = shuffled.split_off(dev_end);
    let dev = shuffled.split_off(train_end);

    DatasetSplit {
        train: shuffled,
        dev,
        test,
    }
}

/// [`split_dataset`] with the default ratios and seed.
pub fn split_dataset_default(dataset: &[CountExample]) -> DatasetSplit {
    split_dataset(dataset, SplitRatios::default(), DEFAULT_SEED)
}
