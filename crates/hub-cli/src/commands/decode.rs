use std::io::Read;

use anyhow::Context;
use hub_context::manager::decode_token;

use crate::cli::{DecodeArgs, GlobalFlags};
use crate::output::output;

/// Handle `hubctx decode`.
pub fn handle(args: &DecodeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token = match &args.token {
        Some(token) => token.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read token from stdin")?;
            buf
        }
    };

    let decoded = decode_token(token.trim()).context("not a context token")?;
    output(&decoded, flags.format)
}
