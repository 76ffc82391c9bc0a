mod args;
mod config;
mod logging;

use args::{Args, Command};
use candle_core::Device;
use clap::Parser;
use config::Config;
use std::error::Error;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let (args, config) = init()?;

    match args.command {
        Command::Move {
            source,
            dest,
            extensions,
            on_conflict,
        } => {
            let exts = args::extensions_or_mp4(&extensions);
            let summary = dataset::move_tree(&source, &dest, &exts, on_conflict)?;
            log::info!(
                "Moved {}/{} files to {:?}",
                summary.moved,
                summary.found,
                summary.dest
            );
        }

        Command::Rename { root, extensions } => {
            let exts = args::extensions_or_mp4(&extensions);
            dataset::rename_tree(&root, &exts)?;
        }

        Command::Split(split) => {
            let opts = split.resolve(&config.split);
            let summary = dataset::split_dataset(&opts)?;
            log::info!(
                "Split complete: {} train, {} val, {} test",
                summary.train,
                summary.val,
                summary.test
            );
        }

        Command::Manifest { source, dest } => {
            dataset::build_manifests(&source, &dest)?;
        }

        Command::EncodeTensor {
            input,
            name,
            output,
        } => {
            let text = encode_tensor_file(&input, name.as_deref())?;
            match output {
                Some(path) => {
                    fs::write(&path, &text)?;
                    log::info!("Wrote {} characters to {:?}", text.len(), path);
                }
                None => println!("{}", text),
            }
        }

        Command::DecodeTensor { input, output } => {
            let text = fs::read_to_string(&input)?;
            let tensor = codec::decode(&text)?;
            tensor.save_safetensors(codec::TENSOR_NAME, &output)?;
            log::info!(
                "Decoded {:?} {:?} tensor into {:?}",
                tensor.dtype(),
                tensor.dims(),
                output
            );
        }
    }

    Ok(())
}

fn init() -> Result<(Args, Config), Box<dyn Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    logging::init(config.logging.as_ref())?;

    Ok((args, config))
}

fn encode_tensor_file(path: &Path, name: Option<&str>) -> Result<String, Box<dyn Error>> {
    let mut tensors = candle_core::safetensors::load(path, &Device::Cpu)?;

    let tensor = match name {
        Some(name) => tensors
            .remove(name)
            .ok_or_else(|| format!("No tensor named '{}' in {:?}", name, path))?,
        None if tensors.len() == 1 => tensors
            .into_values()
            .next()
            .ok_or("safetensors file is empty")?,
        None => {
            let mut names: Vec<String> = tensors.into_keys().collect();
            names.sort();
            return Err(format!(
                "{:?} holds {} tensors, pick one with --name: {}",
                path,
                names.len(),
                names.join(", ")
            )
            .into());
        }
    };

    Ok(codec::encode(&tensor)?)
}
