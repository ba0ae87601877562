//! Import/Export commands

use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use anyhow::Context;
use clap::Args;

use crate::output::print_json;
use crate::AppContext;
use amity_core::Snapshot;
use amity_storage::SocialStore;

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (JSON snapshot)
    pub file: PathBuf,

    /// Merge with existing data (default: refuse if the store is not empty)
    #[arg(long)]
    pub merge: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run_import(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Importing from {:?}", args.file);

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let snapshot = Snapshot::from_json(&content)?;

    if !args.merge && !ctx.storage.list_users().await?.is_empty() {
        anyhow::bail!("Store already contains users. Use --merge to import into it.");
    }

    let added = ctx.storage.import_snapshot(&snapshot).await?;

    if ctx.json() {
        print_json(&serde_json::json!({
            "users": snapshot.users.len(),
            "friendships": added,
        }))?;
    } else {
        println!(
            "Imported {} users and {} new friendships from {}",
            snapshot.users.len(),
            added,
            args.file.display()
        );
    }
    Ok(())
}

pub async fn run_export(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let snapshot = ctx.storage.load_snapshot().await?;
    let json = snapshot.to_json()?;

    match &args.output {
        Some(path) => {
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            // Snapshots carry email addresses
            #[cfg(unix)]
            options.mode(0o600);

            let mut file = options
                .open(path)
                .with_context(|| format!("creating {}", path.display()))?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;

            tracing::info!("Exported snapshot to {:?}", path);
            eprintln!(
                "Exported {} users and {} friendships to {}",
                snapshot.users.len(),
                snapshot.friendships.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
