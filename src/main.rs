use anyhow::{anyhow, Context};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use member_documents::config::Config;
use member_documents::store::{open_repository, Member, MemberRepository};
use member_documents::{MemberDocumentService, SizePolicy};
use std::path::PathBuf;

/// Member document store - one size-gated, compressed document per house member
#[derive(Parser, Debug)]
#[command(name = "member-documents")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print metrics in Prometheus text format after the command finishes
    #[arg(long)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a member so documents can be attached to it
    AddMember {
        member_id: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Create or replace a member's document from an image file
    Upload { member_id: String, file: PathBuf },
    /// Write a member's document to a file
    Fetch { member_id: String, out: PathBuf },
    /// Remove a member's document
    Delete { member_id: String },
    /// Validate configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = Config::from_file(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = member_documents::logging::init_subscriber(&config.logging) {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args, config).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    config.validate().map_err(|e| anyhow!(e))?;

    tracing::info!(
        config_file = %args.config.display(),
        max_size_kbytes = config.files.max_size_kbytes,
        compression_border_size_kbytes = config.files.compression_border_size_kbytes,
        compressed_image_quality = config.files.compressed_image_quality,
        storage_backend = ?config.storage.backend,
        "Configuration loaded successfully"
    );

    let repository = open_repository(&config.storage)
        .await
        .context("Failed to open storage")?;
    let service = MemberDocumentService::new(repository, SizePolicy::from_config(&config.files));

    match args.command {
        Command::AddMember { member_id, name } => {
            service
                .repository()
                .save_member(Member::new(member_id.clone(), name))
                .await?;
            println!("Member '{}' saved", member_id);
        }
        Command::Upload { member_id, file } => {
            let raw = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let receipt = service.upload(&member_id, Bytes::from(raw)).await?;
            println!(
                "Stored {} ({} bytes{})",
                receipt.document_name,
                receipt.stored_size,
                if receipt.compressed {
                    format!(", compressed from {} bytes", receipt.original_size)
                } else {
                    String::new()
                }
            );
        }
        Command::Fetch { member_id, out } => {
            let document = service.fetch(&member_id).await?;
            tokio::fs::write(&out, &document.content)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "Wrote {} ({} bytes, {}) to {}",
                document.name,
                document.content_length(),
                document.content_type(),
                out.display()
            );
        }
        Command::Delete { member_id } => {
            service.remove(&member_id).await?;
            println!("Document for member '{}' removed", member_id);
        }
        Command::CheckConfig => {
            println!("Configuration OK");
        }
    }

    if args.print_metrics {
        print!("{}", member_documents::metrics::gather_text());
    }

    Ok(())
}
