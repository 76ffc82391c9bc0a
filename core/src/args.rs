use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dataset::{ConflictPolicy, SplitOptions, SplitRatios};
use utils::ExtensionSet;

use crate::config::SplitConfig;

#[derive(Parser, Debug)]
#[command(name = "vidstage")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// YAML config with logging and split defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move every matching video under SOURCE flat into DEST.
    Move {
        source: PathBuf,
        dest: PathBuf,

        /// Extensions to pick up (repeatable). Default: mp4.
        #[arg(long = "ext")]
        extensions: Vec<String>,

        #[arg(long, default_value_t = ConflictPolicy::Fail)]
        on_conflict: ConflictPolicy,
    },

    /// Rename ROOT/<split>/<label>/* to <split>_<label>_<i>.<ext>.
    Rename {
        root: PathBuf,

        /// Extensions to rename (repeatable). Default: mp4.
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },

    /// Shuffle and split SOURCE into DEST/{train,val,test}/<subfolder>.
    Split(SplitArgs),

    /// Write DEST/<split>.json for every SOURCE/<split>/<label>/<file>.
    Manifest { source: PathBuf, dest: PathBuf },

    /// Print a tensor from a safetensors file as base64(gzip(safetensors)).
    EncodeTensor {
        input: PathBuf,

        /// Tensor to encode. Required when the file holds more than one.
        #[arg(long)]
        name: Option<String>,

        /// Write the text here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode text produced by encode-tensor back into a safetensors file.
    DecodeTensor { input: PathBuf, output: PathBuf },
}

#[derive(clap::Args, Debug, Clone)]
pub struct SplitArgs {
    pub source: PathBuf,
    pub dest: PathBuf,

    #[arg(long)]
    pub train: Option<f64>,

    #[arg(long)]
    pub val: Option<f64>,

    #[arg(long)]
    pub test: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Folder created inside each split directory.
    #[arg(long)]
    pub subfolder: Option<String>,

    /// Extensions to pick up (repeatable).
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    #[arg(long)]
    pub on_conflict: Option<ConflictPolicy>,
}

impl SplitArgs {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(&self, cfg: &SplitConfig) -> SplitOptions {
        let mut opts = SplitOptions::new(&self.source, &self.dest);
        let base = cfg.ratios();
        opts.ratios = SplitRatios::new(
            self.train.unwrap_or(base.train),
            self.val.unwrap_or(base.val),
            self.test.unwrap_or(base.test),
        );
        opts.seed = self.seed.unwrap_or(cfg.seed);
        opts.subfolder = self
            .subfolder
            .clone()
            .unwrap_or_else(|| cfg.subfolder.clone());
        opts.extensions = if self.extensions.is_empty() {
            cfg.extensions()
        } else {
            ExtensionSet::new(&self.extensions)
        };
        opts.conflict = self.on_conflict.unwrap_or(cfg.on_conflict);
        opts
    }
}

/// Extensions from `--ext`, or `mp4` when none were given.
pub fn extensions_or_mp4(extensions: &[String]) -> ExtensionSet {
    if extensions.is_empty() {
        ExtensionSet::mp4()
    } else {
        ExtensionSet::new(extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_move() {
        let args = parse(&["vidstage", "move", "raw", "flat", "--ext", "mp4", "--ext", "MOV"]);
        let Command::Move {
            source,
            dest,
            extensions,
            on_conflict,
        } = args.command
        else {
            panic!("Expected Move")
        };
        assert_eq!(source, PathBuf::from("raw"));
        assert_eq!(dest, PathBuf::from("flat"));
        assert_eq!(on_conflict, ConflictPolicy::Fail);
        assert!(extensions_or_mp4(&extensions).contains("mov"));
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let args = parse(&["vidstage", "manifest", "data", "out", "--config", "cfg.yaml"]);
        assert_eq!(args.config, Some(PathBuf::from("cfg.yaml")));
        assert!(matches!(args.command, Command::Manifest { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        assert!(Args::try_parse_from(["vidstage", "move", "a", "b", "--on-conflict", "skip"]).is_err());
    }

    #[test]
    fn test_rename_defaults_to_mp4() {
        let args = parse(&["vidstage", "rename", "data"]);
        let Command::Rename { extensions, .. } = args.command else {
            panic!("Expected Rename")
        };
        assert_eq!(extensions_or_mp4(&extensions), ExtensionSet::mp4());
    }

    #[test]
    fn test_split_resolve_uses_config_then_flags() {
        let args = parse(&[
            "vidstage",
            "split",
            "raw",
            "out",
            "--train",
            "0.8",
            "--on-conflict",
            "overwrite",
        ]);
        let Command::Split(split) = args.command else {
            panic!("Expected Split")
        };

        let cfg = SplitConfig {
            val: 0.1,
            test: 0.1,
            seed: 9,
            subfolder: "clips".to_string(),
            ..SplitConfig::default()
        };
        let opts = split.resolve(&cfg);

        assert_eq!(opts.ratios, SplitRatios::new(0.8, 0.1, 0.1));
        assert_eq!(opts.seed, 9);
        assert_eq!(opts.subfolder, "clips");
        assert_eq!(opts.conflict, ConflictPolicy::Overwrite);
        assert_eq!(opts.extensions, ExtensionSet::videos());
        assert_eq!(opts.source, PathBuf::from("raw"));
    }

    #[test]
    fn test_split_resolve_mixes_ratio_flags_with_config() {
        let args = parse(&["vidstage", "split", "raw", "out", "--val", "0.3"]);
        let Command::Split(split) = args.command else {
            panic!("Expected Split")
        };
        let cfg = SplitConfig {
            train: 0.6,
            test: 0.05,
            ..SplitConfig::default()
        };

        let opts = split.resolve(&cfg);
        assert_eq!(opts.ratios, SplitRatios::new(0.6, 0.3, 0.05));
    }

    #[test]
    fn test_split_resolve_defaults() {
        let args = parse(&["vidstage", "split", "raw", "out"]);
        let Command::Split(split) = args.command else {
            panic!("Expected Split")
        };
        let opts = split.resolve(&SplitConfig::default());

        assert_eq!(opts.ratios, SplitRatios::default());
        assert_eq!(opts.seed, 42);
        assert_eq!(opts.subfolder, "superstitious");
        assert_eq!(opts.conflict, ConflictPolicy::Fail);
    }
}
