use super::{finish, log_metadata, write_output};
use crate::TransformArgs;
use anyhow::{Context, Result};
use tinify_client::TinifyClient;

pub fn execute(
    client: &TinifyClient,
    url: &str,
    output: &str,
    transform: &TransformArgs,
) -> Result<()> {
    tracing::info!("Compressing remote image: {}", url);

    let source = client.from_url(url)
        .context("Compression failed")?;
    log_metadata(&source);

    let compressed = finish(client, source, transform)?;

    write_output(output, &compressed)
        .context("Failed to write output")?;

    tracing::info!("Wrote {} bytes", compressed.len());
    Ok(())
}
