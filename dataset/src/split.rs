use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use utils::{scan, ExtensionSet};

use crate::transfer::{self, ConflictPolicy};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SUBFOLDER: &str = "superstitious";

const RATIO_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target fractions per split. `test` is informational: the test split always
/// receives whatever train and val leave behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.7,
            val: 0.15,
            test: 0.15,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    /// Rejects negative or non-finite ratios and `train + val > 1`.
    /// A total other than 1 is only warned about.
    pub fn validate(&self) -> io::Result<()> {
        for (name, value) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !value.is_finite() || value < 0.0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} ratio must be a finite value >= 0, got {}", name, value),
                ));
            }
        }

        if self.train + self.val > 1.0 + RATIO_SUM_TOLERANCE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "train + val ratios exceed 1 ({} + {})",
                    self.train, self.val
                ),
            ));
        }

        let total = self.train + self.val + self.test;
        if (total - 1.0).abs() > RATIO_SUM_TOLERANCE {
            log::warn!(
                "Split ratios sum to {:.4}, test split takes the remainder",
                total
            );
        }

        Ok(())
    }

    /// `(n_train, n_val, n_test)` for `n` items. Train and val are floored.
    pub fn sizes(&self, n: usize) -> (usize, usize, usize) {
        let n_train = ((self.train * n as f64) as usize).min(n);
        let n_val = ((self.val * n as f64) as usize).min(n - n_train);
        (n_train, n_val, n - n_train - n_val)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Partition<T> {
    pub fn get(&self, split: Split) -> &[T] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Seeded shuffle followed by contiguous train/val/test slices.
///
/// The result depends on the input order, so callers should pass a sorted list.
pub fn partition<T>(mut items: Vec<T>, ratios: &SplitRatios, seed: u64) -> Partition<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let (n_train, n_val, _) = ratios.sizes(items.len());

    let rest = items.split_off(n_train);
    let train = items;
    let mut val = rest;
    let test = val.split_off(n_val);

    Partition { train, val, test }
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub source: PathBuf,
    pub dest_root: PathBuf,
    pub ratios: SplitRatios,
    pub extensions: ExtensionSet,
    pub seed: u64,
    pub subfolder: String,
    pub conflict: ConflictPolicy,
}

impl SplitOptions {
    pub fn new(source: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest_root: dest_root.into(),
            ratios: SplitRatios::default(),
            extensions: ExtensionSet::videos(),
            seed: DEFAULT_SEED,
            subfolder: DEFAULT_SUBFOLDER.to_string(),
            conflict: ConflictPolicy::Fail,
        }
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        split_dir(&self.dest_root, split, &self.subfolder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Shuffle every matching video under `source` and move it into
/// `dest_root/{train,val,test}/<subfolder>/`.
pub fn split_dataset(opts: &SplitOptions) -> io::Result<SplitSummary> {
    opts.ratios.validate()?;

    let files = scan(&opts.source, &opts.extensions)?;
    log::info!("Found {} videos.", files.len());

    let groups = partition(files, &opts.ratios, opts.seed);
    log::info!(
        "Splitting into: {} train, {} val, {} test",
        groups.train.len(),
        groups.val.len(),
        groups.test.len()
    );

    // Plan everything first so a name clash aborts before any file moves.
    let mut plans = Vec::with_capacity(Split::ALL.len());
    for split in Split::ALL {
        let dir = opts.split_dir(split);
        plans.push((dir.clone(), transfer::plan_flat(groups.get(split), &dir, opts.conflict)?));
    }

    for (dir, plan) in &plans {
        fs::create_dir_all(dir)?;
        transfer::execute(plan, "Moved")?;
    }

    log::info!("Done moving files into {:?}", opts.dest_root);

    Ok(SplitSummary {
        train: groups.train.len(),
        val: groups.val.len(),
        test: groups.test.len(),
    })
}

/// `dest_root/<split>/<subfolder>`
pub fn split_dir(dest_root: &Path, split: Split, subfolder: &str) -> PathBuf {
    dest_root.join(split.as_str()).join(subfolder)
}
