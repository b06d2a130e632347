use hub_config::ContextConfig;

use crate::cli::{GlobalFlags, InspectArgs};
use crate::output::output;

/// Handle `hubctx inspect`.
pub async fn handle(args: &InspectArgs, flags: &GlobalFlags, config: &ContextConfig) -> anyhow::Result<()> {
    let manager = super::build_manager(&args.source, flags, config).await?;
    output(&manager.context().summary(), flags.format)
}
