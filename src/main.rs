use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xapidb::config::{DEFAULT_REFERENCE_KEY, DEFAULT_REFERENCE_PREFIX};
use xapidb::{Database, Keys, NodeId, ResolveError};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// XAPI database dump to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Attribute whose values are indexed as references
    #[arg(long, env = "XAPIDB_REF_KEY", default_value = DEFAULT_REFERENCE_KEY)]
    ref_key: String,

    /// Prefix marking an attribute value as followable
    #[arg(long, env = "XAPIDB_REF_PREFIX", default_value = DEFAULT_REFERENCE_PREFIX)]
    ref_prefix: String,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole tree, indented
    Tree,
    /// List the tables under the root with their row counts
    Tables,
    /// Print a node's status
    Show {
        /// Slash separated path (`/database/VM`) or a reference value
        #[arg(value_name = "PATH|REF")]
        target: String,
    },
    /// Resolve a reference and print what must be expanded to reach it
    Follow {
        #[arg(value_name = "REF")]
        reference: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let keys = Keys::default()
        .with_reference_key(cli.ref_key)
        .with_reference_prefix(cli.ref_prefix);

    let db = Database::load_file(&cli.file, keys)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    let Some(db) = db else {
        bail!("{} contains no element", cli.file.display());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&db, &cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Execute one command against a loaded database, writing to `out`
fn run<W: Write>(db: &Database, command: &Commands, out: &mut W) -> anyhow::Result<()> {
    match command {
        Commands::Tree => db.tree().dump(out)?,
        Commands::Tables => {
            for (name, rows) in db.tables() {
                writeln!(out, "{name}\t{rows}")?;
            }
        }
        Commands::Show { target } => {
            let id = if db.keys().is_followable(target) {
                // any declaring node, the root included
                db.index().get(target).ok_or_else(|| ResolveError::NotFound {
                    reference: target.clone(),
                })?
            } else {
                match db.locate(target) {
                    Some(id) => id,
                    None => bail!("no node at {target}"),
                }
            };
            print_status(out, db, id)?;
        }
        Commands::Follow { reference } => {
            let resolution = db.follow(reference)?;
            let tree = db.tree();
            let label = |id: NodeId| tree.label(id, db.keys()).unwrap_or_default();

            writeln!(out, "owner: {}", label(resolution.owner))?;
            writeln!(out, "expand:")?;
            for (level, &id) in resolution.ancestors.iter().enumerate() {
                writeln!(out, "{}{}", "  ".repeat(level + 1), label(id))?;
            }
            print_status(out, db, resolution.target)?;
        }
    }
    Ok(())
}

/// Name, attributes, children count and path of one node. Followable
/// attribute values are marked with `->`.
fn print_status<W: Write>(out: &mut W, db: &Database, id: NodeId) -> io::Result<()> {
    let tree = db.tree();
    let Some(node) = tree.node(id) else {
        return Ok(());
    };

    writeln!(out, "name: {}", node.name())?;
    let attributes = node.sorted_attributes();
    if attributes.is_empty() {
        writeln!(out, "attributes: (none)")?;
    } else {
        writeln!(out, "attributes:")?;
        for (key, value) in attributes {
            let mark = if db.keys().is_followable(value) { " ->" } else { "" };
            writeln!(out, "  {key} = {value}{mark}")?;
        }
    }
    writeln!(out, "children: {}", node.children().len())?;
    writeln!(out, "path: {}", tree.path(id).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DB: &str = r#"<database ref="OpaqueRef:db">
  <table name="host">
    <row ref="OpaqueRef:h1" name__label="host-a"/>
  </table>
  <table name="VM">
    <row ref="OpaqueRef:v1" resident_on="OpaqueRef:h1" power_state="Running"/>
  </table>
</database>"#;

    fn db() -> Database {
        Database::load(DB.as_bytes(), Keys::default()).unwrap().unwrap()
    }

    fn render(command: Commands) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(&db(), &command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_tables() {
        assert_eq!(render(Commands::Tables).unwrap(), "host\t1\nVM\t1\n");
    }

    #[test]
    fn test_show_by_path() {
        let text = render(Commands::Show {
            target: "/database/VM/row".into(),
        })
        .unwrap();
        let expected = "name: row\nattributes:\n  power_state = Running\n  \
                        ref = OpaqueRef:v1 ->\n  resident_on = OpaqueRef:h1 ->\n\
                        children: 0\npath: /database/table/row\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_show_reference_on_root() {
        let text = render(Commands::Show {
            target: "OpaqueRef:db".into(),
        })
        .unwrap();
        assert!(text.starts_with("name: database\n"));
        assert!(text.ends_with("children: 2\npath: /database\n"));
    }

    #[test]
    fn test_show_node_without_attributes() {
        let db = Database::load(b"<database><table/></database>", Keys::default())
            .unwrap()
            .unwrap();
        let mut out = Vec::new();
        run(&db, &Commands::Show { target: "/database/table".into() }, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name: table\nattributes: (none)\nchildren: 0\npath: /database/table\n"
        );
    }

    #[test]
    fn test_show_unknown_target() {
        let err = render(Commands::Show {
            target: "OpaqueRef:missing".into(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "failed to find OpaqueRef:missing in the reference index");

        let err = render(Commands::Show { target: "/database/SR".into() }).unwrap_err();
        assert_eq!(err.to_string(), "no node at /database/SR");
    }

    #[test]
    fn test_follow() {
        let text = render(Commands::Follow {
            reference: "OpaqueRef:h1".into(),
        })
        .unwrap();
        let expected = "owner: host (1)\nexpand:\n  database (2) [OpaqueRef:db]\n    host (1)\n\
                        name: row\nattributes:\n  name__label = host-a\n  ref = OpaqueRef:h1 ->\n\
                        children: 0\npath: /database/table/row\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_follow_failures_are_errors() {
        let err = render(Commands::Follow {
            reference: "OpaqueRef:missing".into(),
        })
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResolveError>(),
            Some(&ResolveError::NotFound {
                reference: "OpaqueRef:missing".into()
            })
        );

        let err = render(Commands::Follow { reference: "Running".into() }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::NotAReference { .. })
        ));

        let err = render(Commands::Follow {
            reference: "OpaqueRef:db".into(),
        })
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<ResolveError>(), Some(ResolveError::Orphan { .. })));
    }
}
