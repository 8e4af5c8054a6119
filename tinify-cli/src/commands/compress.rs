use super::{finish, log_metadata, read_input, write_output};
use crate::TransformArgs;
use anyhow::{Context, Result};
use tinify_client::TinifyClient;

pub fn execute(
    client: &TinifyClient,
    input: &str,
    output: &str,
    transform: &TransformArgs,
) -> Result<()> {
    tracing::debug!("Reading image from: {}", input);
    let data = read_input(input)
        .context("Failed to read input")?;

    tracing::info!("Read {} bytes", data.len());

    let source = client.from_buffer(data)
        .context("Compression failed")?;
    log_metadata(&source);

    let compressed = finish(client, source, transform)?;

    tracing::debug!("Writing image to: {}", output);
    write_output(output, &compressed)
        .context("Failed to write output")?;

    tracing::info!("Wrote {} bytes", compressed.len());
    Ok(())
}
