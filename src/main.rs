use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use gallery_cms::{
    catalog::{
        Session, mutate,
        types::{Filter, RecordDraft},
    },
    config::Config,
};

#[derive(Parser)]
struct Opts {
    /// YAML config naming the document and backup directory.
    #[clap(short, long, env = "GALLERY_CMS_CONFIG")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the catalog extracted from the document.
    List {
        /// all, desktop, laptop, custom, new or refurbished.
        #[clap(long, default_value = "all")]
        filter: Filter,
        /// Emit JSON instead of a table.
        #[clap(long)]
        json: bool,
    },
    /// Add a record from a YAML draft file.
    Add { draft: PathBuf },
    /// Replace a record's fields from a YAML draft file.
    Update { id: u32, draft: PathBuf },
    /// Remove a record.
    Delete { id: u32 },
    /// Put a record on sale at a percentage discount.
    Promote { id: u32, discount: u8 },
    /// Take a record off sale.
    Unpromote { id: u32 },
    /// Re-run spec normalization over every record and rewrite the document.
    Normalize,
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let config = std::fs::read_to_string(&opts.config).with_context(|| "read config")?;
    let config: Config = serde_yaml::from_str(&config)
        .with_context(|| format!("parse config from {}", opts.config.display()))?;

    let document = std::fs::read_to_string(&config.document)
        .with_context(|| format!("read document {}", config.document.display()))?;
    let mut session = Session::load(document)?;

    match opts.command {
        Command::List { filter, json } => {
            let records = mutate::filter_records(session.records(), filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in records {
                    let sale = match &record.promotion {
                        Some(promotion) => format!(" (sale {}%: {})", promotion.discount, promotion.sale_price),
                        None => String::new(),
                    };
                    println!(
                        "{:>3}  {:<32} {:<8} {:<12} {}{sale}",
                        record.id,
                        record.name,
                        record.kind.map(|kind| kind.as_str()).unwrap_or("-"),
                        record.category.as_str(),
                        record.price,
                    );
                }
            }
            return Ok(());
        }
        Command::Add { draft } => session.add(read_draft(&draft)?)?,
        Command::Update { id, draft } => session.update(id, read_draft(&draft)?)?,
        Command::Delete { id } => session.delete(id),
        Command::Promote { id, discount } => session.promote(id, discount)?,
        Command::Unpromote { id } => session.unpromote(id)?,
        Command::Normalize => session.renormalize(),
    }

    persist(&config, session)
}

fn read_draft(path: &Path) -> anyhow::Result<RecordDraft> {
    let draft = std::fs::read_to_string(path)
        .with_context(|| format!("read draft {}", path.display()))?;
    serde_yaml::from_str(&draft).with_context(|| format!("parse draft from {}", path.display()))
}

fn persist(config: &Config, session: Session) -> anyhow::Result<()> {
    if !session.is_dirty() {
        info!("no changes to publish");
        return Ok(());
    }
    let updated = session.finish()?;

    if let Some(backup_dir) = &config.backup_dir {
        std::fs::create_dir_all(backup_dir)
            .with_context(|| format!("create backup dir {}", backup_dir.display()))?;
        let name = config
            .document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.html".to_string());
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let backup = backup_dir.join(format!("{stamp}-{name}"));
        std::fs::copy(&config.document, &backup)
            .with_context(|| format!("back up document to {}", backup.display()))?;
        info!(backup = %backup.display(), "backed up document");
    }

    std::fs::write(&config.document, updated)
        .with_context(|| format!("write document {}", config.document.display()))?;
    info!(document = %config.document.display(), "document updated");
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
