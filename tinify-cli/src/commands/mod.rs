pub mod compress;
pub mod store;
pub mod url;

use crate::TransformArgs;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use tinify_client::TinifyClient;
use tinify_core::{Convert, Preserve, Source, Transform};

impl TransformArgs {
    pub fn to_transform(&self) -> Option<Transform> {
        if let Some(resize) = &self.resize {
            return Some(Transform::Resize(resize.clone()));
        }
        if let Some(image_type) = self.convert {
            return Some(Transform::Convert(Convert::to(image_type.into())));
        }
        if !self.preserve.is_empty() {
            let items: Vec<Preserve> = self.preserve.iter().map(|&p| p.into()).collect();
            return Some(Transform::Preserve(items));
        }
        None
    }
}

/// Applies the requested transform (if any) and downloads the final image.
pub fn finish(client: &TinifyClient, source: Source, transform: &TransformArgs) -> Result<Vec<u8>> {
    match transform.to_transform() {
        Some(transform) => {
            tracing::info!("Applying {}", transform.name());
            let output = client
                .transform(&source, &transform)
                .with_context(|| format!("Failed to apply {}", transform.name()))?;
            log_metadata(&output);
            // Transform responses carry the image itself
            Ok(output.into_bytes())
        }
        None => client
            .to_buffer(&source)
            .context("Failed to download compressed image"),
    }
}

pub fn log_metadata(source: &Source) {
    match serde_json::to_string(source.metadata()) {
        Ok(json) => tracing::info!("Result: {}", json),
        Err(e) => tracing::warn!("Could not serialize metadata: {}", e),
    }
}

pub fn read_input(path: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path == "-" {
        tracing::debug!("Reading from stdin");
        io::stdin().read_to_end(&mut buffer)?;
    } else {
        tracing::debug!("Reading from file: {}", path);
        File::open(path)?.read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

pub fn write_output(path: &str, data: &[u8]) -> Result<()> {
    if path == "-" {
        tracing::debug!("Writing to stdout");
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    } else {
        tracing::debug!("Writing to file: {}", path);
        File::create(path)?.write_all(data)?;
    }
    Ok(())
}
