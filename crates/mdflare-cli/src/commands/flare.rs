use crate::cli::FlareArgs;
use crate::error::{CliError, Result};
use mdflare::core::contacts::itype::InteractionFilter;
use mdflare::core::flare::labels::LabelTable;
use mdflare::workflows;
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: FlareArgs) -> Result<()> {
    let json = render(&args)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json.as_bytes()).map_err(|source| CliError::Output {
                path: path.clone(),
                source,
            })?;
            println!("✓ Flare graph written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Builds the flare graph described by `args` and returns its JSON text.
fn render(args: &FlareArgs) -> Result<String> {
    let filter =
        InteractionFilter::parse(&args.itype).map_err(|e| CliError::Argument(e.to_string()))?;

    let labels = match &args.flarelabels {
        Some(path) => {
            info!("Loading flare labels from {:?}", path);
            Some(LabelTable::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?)
        }
        None => None,
    };

    let result = workflows::flare::run_from_path(&args.input, &filter, labels.as_ref()).map_err(
        |e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        },
    )?;

    for error in &result.parse_errors {
        warn!("Skipped line {}: {}", error.line, error.error);
    }
    if result.graph.edges.is_empty() {
        warn!("No contacts remained after filtering; the graph has no edges.");
    }

    serde_json::to_string_pretty(&result.graph).map_err(|e| CliError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const CONTACTS: &str = "\
# total_frames:3 beg:0 end:2 stride:1 interaction_types:sb,hb
0 sb A:ASP:1:OD1 A:LYS:5:NZ
1 hbss A:SER:2:OG A:THR:9:OG1
2 sb A:LYS:5:NZ A:ASP:1:OD2
";

    fn args_for(input: &Path) -> FlareArgs {
        FlareArgs {
            input: input.to_path_buf(),
            output: None,
            itype: "all".to_string(),
            flarelabels: None,
        }
    }

    fn write_contacts(dir: &Path) -> PathBuf {
        let path = dir.join("contacts.tsv");
        fs::write(&path, CONTACTS).unwrap();
        path
    }

    #[test]
    fn graph_json_merges_frames_per_residue_pair() {
        let dir = tempdir().unwrap();
        let input = write_contacts(dir.path());
        let json: serde_json::Value = serde_json::from_str(&render(&args_for(&input)).unwrap()).unwrap();

        let edges = json["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0]["name1"], "A:ASP:1");
        assert_eq!(edges[0]["name2"], "A:LYS:5");
        assert_eq!(edges[0]["frames"], serde_json::json!([0, 2]));
        assert!(json.get("trees").is_none());
    }

    #[test]
    fn itype_filter_limits_edges() {
        let dir = tempdir().unwrap();
        let input = write_contacts(dir.path());
        let mut args = args_for(&input);
        args.itype = "hb".to_string();
        let json: serde_json::Value = serde_json::from_str(&render(&args).unwrap()).unwrap();
        let edges = json["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["name1"], "A:SER:2");

        args.itype = "bogus".to_string();
        assert!(matches!(render(&args), Err(CliError::Argument(_))));
    }

    #[test]
    fn labels_add_trees_and_tracks() {
        let dir = tempdir().unwrap();
        let input = write_contacts(dir.path());
        let labels = dir.path().join("labels.tsv");
        fs::write(&labels, "A:ASP:1\tAcidic.D1\tred\nA:LYS:5\tBasic.K5\tblue\n").unwrap();

        let mut args = args_for(&input);
        args.flarelabels = Some(labels);
        let json: serde_json::Value = serde_json::from_str(&render(&args).unwrap()).unwrap();
        let edges = json["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["name1"], "D1");
        assert!(json["trees"].is_array());
        assert!(json["tracks"].is_array());
    }

    #[test]
    fn output_file_is_written() {
        let dir = tempdir().unwrap();
        let input = write_contacts(dir.path());
        let output = dir.path().join("flare.json");
        let mut args = args_for(&input);
        args.output = Some(output.clone());
        run(args).unwrap();

        let graph: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(graph["edges"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn missing_inputs_are_parsing_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.tsv");
        assert!(matches!(
            render(&args_for(&missing)),
            Err(CliError::FileParsing { .. })
        ));

        let input = write_contacts(dir.path());
        let mut args = args_for(&input);
        args.flarelabels = Some(dir.path().join("no-labels.tsv"));
        assert!(matches!(render(&args), Err(CliError::FileParsing { .. })));
    }
}
