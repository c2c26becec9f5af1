use anyhow::{bail, Context, Result};
use autofrac::prelude::*;
use autofrac::script::write_to;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod summary;

#[derive(Parser)]
#[command(name = "autofrac")]
#[command(about = "Finite automaton and solver script for self-similar surfaces")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Close the description and write the solver script
    ///
    /// Cantor edges are exported with the classic rule only: they carry no
    /// interior control points.
    Export {
        input: PathBuf,
        /// Place Bezier interior points automatically instead of reading them
        #[arg(short, long)]
        auto_intern: bool,
        /// Use cubic instead of quadratic Bezier edges
        #[arg(short, long)]
        cubic: bool,
        /// Automatic subdivision passes emitted in the script (0 disables)
        #[arg(short, long, default_value_t = 0)]
        iters: u32,
        #[arg(short, long, default_value = "output.py")]
        out: PathBuf,
        /// Fail when a constraint joins two edges of different rules
        #[arg(long)]
        strict: bool,
        /// Folder of saved face matrices (`library/` next to a previous script)
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
    /// Print the closed automaton as JSON
    Closure {
        input: PathBuf,
        #[arg(short, long)]
        cubic: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Export {
            input,
            auto_intern,
            cubic,
            iters,
            out,
            strict,
            library,
        } => export(
            &input,
            ExportArgs {
                auto_intern,
                cubic,
                iters,
                strict,
                library,
            },
            &out,
        ),
        Action::Closure { input, cubic } => closure(&input, cubic),
        Action::Report => report(),
    }
}

fn read_description(input: &Path) -> Result<Description> {
    let text =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    text.parse::<Description>()
        .with_context(|| format!("parsing {}", input.display()))
}

fn log_outcomes(outcomes: &[AdjacencyOutcome], adjacencies: &[Adjacency]) -> usize {
    let mut rejected = 0;
    for (adj, outcome) in adjacencies.iter().zip(outcomes) {
        match outcome {
            AdjacencyOutcome::Registered => tracing::debug!(%adj, "constraint"),
            AdjacencyOutcome::Rejected { left, right } => {
                rejected += 1;
                tracing::warn!(%adj, %left, %right, "constraint joins different edges, dropped");
            }
        }
    }
    rejected
}

struct ExportArgs {
    auto_intern: bool,
    cubic: bool,
    iters: u32,
    strict: bool,
    library: Option<PathBuf>,
}

fn export(input: &Path, args: ExportArgs, out: &Path) -> Result<()> {
    let ExportArgs {
        auto_intern,
        cubic,
        iters,
        strict,
        library,
    } = args;
    tracing::info!(
        input = %input.display(),
        auto_intern,
        cubic,
        iters,
        library = ?library,
        "export"
    );
    let description = read_description(input)?;
    let adjacencies = description.adjacencies.clone();
    let (structure, outcomes, points) = description
        .into_structure(BezierDegree::from_cubic_flag(cubic))
        .context("registering constraints")?;
    let rejected = log_outcomes(&outcomes, &adjacencies);
    if strict && rejected > 0 {
        bail!("{rejected} constraint(s) join edges with different rules");
    }

    let closure = structure.closure();
    tracing::info!(
        faces = closure.faces().len(),
        edges = closure.edges().len(),
        "closure"
    );

    let coords = if points.is_empty() {
        None
    } else {
        Some(assemble(&structure, &points, auto_intern).context("assembling control points")?)
    };
    let cfg = ExportCfg {
        auto_subdivision_iters: iters,
        library: library.clone(),
        ..ExportCfg::default()
    };

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut w = BufWriter::new(file);
    write_to(&mut w, &structure, coords.as_deref(), cfg)
        .and_then(|()| w.flush())
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(json!({
        "input": input.to_string_lossy(),
        "auto_intern": auto_intern,
        "cubic": cubic,
        "iters": iters,
        "library": library.as_ref().map(|l| l.to_string_lossy()),
    }))
    .with_stats(json!({
        "faces": closure.faces().len(),
        "edges": closure.edges().len(),
        "constraints": structure.adjacencies().len(),
        "rejected": rejected,
    }));
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "written");
    Ok(())
}

fn closure(input: &Path, cubic: bool) -> Result<()> {
    tracing::info!(input = %input.display(), cubic, "closure");
    let description = read_description(input)?;
    let adjacencies = description.adjacencies.clone();
    let (structure, outcomes, _) = description
        .into_structure(BezierDegree::from_cubic_flag(cubic))
        .context("registering constraints")?;
    log_outcomes(&outcomes, &adjacencies);
    let summary = summary::Summary::of(&structure);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": autofrac::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn export_help_states_cantor_scope() {
        let mut cmd = Cmd::command();
        let export = cmd.find_subcommand_mut("export").unwrap();
        let help = export.render_long_help().to_string();
        assert!(help.contains("classic rule only"), "{help}");
        assert!(help.contains("--library"), "{help}");
    }

    #[test]
    fn library_flag_is_optional() {
        let cmd = Cmd::try_parse_from(["autofrac", "export", "in.txt"]).unwrap();
        assert!(matches!(cmd.action, Action::Export { library: None, .. }));
        let cmd =
            Cmd::try_parse_from(["autofrac", "export", "in.txt", "--library", "lib"]).unwrap();
        match cmd.action {
            Action::Export { library, .. } => assert_eq!(library, Some(PathBuf::from("lib"))),
            _ => panic!("expected export"),
        }
    }
}
