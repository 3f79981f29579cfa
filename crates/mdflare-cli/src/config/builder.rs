use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::ContactsConfig;
use crate::cli::ContactsArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use mdflare::engine::config::DetectionConfigBuilder;
use mdflare::engine::detectors::DetectorKind;
use std::str::FromStr;

pub fn build_contacts_config(args: &ContactsArgs) -> Result<ContactsConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let ligand = args.ligand.clone().or(file_config.ligand.take());
    let detectors = resolve_detectors(args, file_config.interactions.take(), ligand.is_some())?;

    let frames = file_config.frames.take().unwrap_or_default();
    let begin = args.beg.or(frames.begin).unwrap_or(defaults.begin);
    let end = args.end.or(frames.end);
    let stride = args.stride.or(frames.stride).unwrap_or(defaults.stride);
    let workers = args.cores.or(file_config.cores).unwrap_or(defaults.cores);

    let solvent = args
        .solvent
        .clone()
        .or(file_config.solvent.take())
        .unwrap_or(defaults.solvent);

    let selection_file = file_config.selection.take().unwrap_or_default();
    let selection = args.selection.clone().or(selection_file.first);
    // A first selection on the command line replaces the file's pair entirely.
    let selection2 = if args.selection.is_some() {
        args.selection2.clone()
    } else {
        args.selection2.clone().or(selection_file.second)
    };

    let cutoffs = file_config
        .cutoffs
        .take()
        .unwrap_or_default()
        .apply(defaults.cutoffs);

    let mut builder = DetectionConfigBuilder::new()
        .detectors(detectors)
        .begin(begin)
        .stride(stride)
        .workers(workers)
        .solvent(solvent)
        .cutoffs(cutoffs);
    if let Some(end) = end {
        builder = builder.end(end);
    }
    if let Some(ligand) = ligand {
        builder = builder.ligand(ligand);
    }
    if let Some(selection) = selection {
        builder = builder.selection(selection);
    }
    if let Some(selection2) = selection2 {
        builder = builder.selection2(selection2);
    }

    let detection = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ContactsConfig {
        topology: args.topology.clone(),
        trajectory: args.trajectory.clone(),
        output_dir: args.output_dir.clone(),
        detection,
    })
}

fn resolve_detectors(
    args: &ContactsArgs,
    file_interactions: Option<Vec<String>>,
    has_ligand: bool,
) -> Result<Vec<DetectorKind>> {
    if args.all {
        return Ok(parser::all_detectors(has_ligand));
    }

    let tags = if args.itypes.is_empty() {
        file_interactions.unwrap_or_default()
    } else {
        args.itypes.clone()
    };

    // `all` is also accepted inside the file's list or a `-S interactions=` override.
    if tags.iter().any(|t| t.trim() == "all") {
        return Ok(parser::all_detectors(has_ligand));
    }

    let detectors =
        parser::parse_detectors(&tags).map_err(|e| CliError::Argument(e.to_string()))?;
    if detectors.is_empty() {
        return Err(CliError::Argument(
            "No interaction types requested. Use --itype <TYPE> or --all.".to_string(),
        ));
    }
    Ok(detectors)
}

fn parse_field<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "interactions" => {
                config.interactions = Some(
                    value_str
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                );
            }
            "cores" => config.cores = Some(parse_field(key, value_str, "integer")?),
            "solvent" => config.solvent = Some(value_str.to_string()),
            "ligand" => config.ligand = Some(value_str.to_string()),
            "frames.begin" => {
                config.frames.get_or_insert_with(Default::default).begin =
                    Some(parse_field(key, value_str, "integer")?);
            }
            "frames.end" => {
                config.frames.get_or_insert_with(Default::default).end =
                    Some(parse_field(key, value_str, "integer")?);
            }
            "frames.stride" => {
                config.frames.get_or_insert_with(Default::default).stride =
                    Some(parse_field(key, value_str, "integer")?);
            }
            "selection.first" => {
                config.selection.get_or_insert_with(Default::default).first =
                    Some(value_str.to_string());
            }
            "selection.second" => {
                config.selection.get_or_insert_with(Default::default).second =
                    Some(value_str.to_string());
            }
            _ => {
                let slot = key.strip_prefix("cutoffs.").and_then(|name| {
                    config
                        .cutoffs
                        .get_or_insert_with(Default::default)
                        .slot(name)
                });
                match slot {
                    Some(slot) => *slot = Some(parse_field(key, value_str, "float")?),
                    None => {
                        return Err(CliError::Config(format!(
                            "Unsupported configuration key for --set: '{}'",
                            key
                        )));
                    }
                }
            }
        }
    }
    Ok(config)
}
