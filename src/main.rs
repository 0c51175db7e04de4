use anyhow::{Context, Result, bail};
use mdrebase::{
    Command, Config, LinkKind, LinkRewriter, RewriteArgs, VersionArgs, VersionPattern,
    extract_version_file, write_version_file,
};
use std::fs;
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Installs stderr logger so stdout stays reserved for document output.
///
/// `--verbose` forces debug level, otherwise `RUST_LOG` applies with
/// warnings as fallback.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Rewrites document links, or reports pending rewrites in check mode.
fn run_rewrite(args: &RewriteArgs) -> Result<()> {
    let rewriter = LinkRewriter::new(args.base_url.clone());
    if !rewriter.base().path().ends_with('/') {
        warn!(
            base_url = %rewriter.base(),
            "base URL path has no trailing slash, its last segment will be replaced"
        );
    }

    if args.check {
        return check_document(&rewriter, args);
    }

    let rewritten = rewriter
        .rewrite_file(&args.document)
        .with_context(|| format!("Failed to rewrite {}", args.document.display()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rewritten)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                document = %args.document.display(),
                output = %path.display(),
                "rewrote document"
            );
        }
        None => {
            io::stdout()
                .write_all(rewritten.as_bytes())
                .context("Failed to write to stdout")?;
            info!(document = %args.document.display(), "wrote document to stdout");
        }
    }

    Ok(())
}

/// Prints every link that would change and fails when there is one.
fn check_document(rewriter: &LinkRewriter, args: &RewriteArgs) -> Result<()> {
    let document = LinkRewriter::read_document(&args.document)?;

    let mut pending = 0;
    for link in rewriter.links(&document) {
        if link.kind != LinkKind::Markdown {
            continue;
        }

        let resolved = rewriter.resolve(link.href)?;
        if resolved != link.href {
            pending += 1;
            println!(
                "{}:{}: {} -> {}",
                args.document.display(),
                link.line(&document),
                link.href,
                resolved
            );
        }
    }

    if pending > 0 {
        bail!(
            "{} link(s) in {} would be rewritten",
            pending,
            args.document.display()
        );
    }

    info!(document = %args.document.display(), "all markdown links are absolute");
    Ok(())
}

/// Extracts version from source file and writes version file.
fn run_version(args: &VersionArgs) -> Result<()> {
    let pattern = VersionPattern::new(&args.pattern)?;
    let version = extract_version_file(&args.source, &pattern)?;
    write_version_file(&args.output, &version)?;
    println!("{}", version);
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(config.verbose);
    config.validate().context("Invalid configuration")?;

    match &config.command {
        Command::Rewrite(args) => run_rewrite(args),
        Command::Version(args) => run_version(args),
    }
}
