use anyhow::Context;
use hub_config::ContextConfig;

use crate::cli::{GlobalFlags, SerializeArgs};

/// Handle `hubctx serialize`.
pub async fn handle(args: &SerializeArgs, flags: &GlobalFlags, config: &ContextConfig) -> anyhow::Result<()> {
    let manager = super::build_manager(&args.source, flags, config).await?;
    let token = manager.serialize().context("failed to serialize context")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &token)
                .with_context(|| format!("failed to write token to {}", path.display()))?;
            if !flags.quiet {
                eprintln!("wrote context token to {}", path.display());
            }
        }
        None => println!("{token}"),
    }
    Ok(())
}
