//! Built-in file templates for `addasset`

use crate::error::{Error, Result};
use crate::target::Selector;
use crate::workflow::WorkflowContext;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const MIT_LICENSE: &str = r#"
MIT License

Copyright (c) [year] [fullname]

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#;

/// Keys accepted by `addasset`
pub const ASSET_KEYS: &[&str] = &["mit"];

/// Template text for an asset key (case-insensitive)
pub fn asset_content(key: &str) -> Result<&'static str> {
    match key.to_lowercase().as_str() {
        "mit" => Ok(MIT_LICENSE),
        _ => Err(Error::AssetNotFound {
            key: key.to_string(),
            available: ASSET_KEYS.join(", "),
        }),
    }
}

/// `addasset <target> <asset-key> <dest-filename>`
///
/// Writes the trimmed template to `dest` inside the target repository and
/// returns the created path. An existing destination is never overwritten.
pub async fn add_asset(
    ctx: &mut WorkflowContext<'_>,
    selector: &Selector,
    key: &str,
    dest: &str,
) -> Result<PathBuf> {
    let content = asset_content(key)?;
    let repo = ctx.resolve(selector).await?;

    let destination = ctx.git.workdir(&repo.path).join(dest);
    if destination.exists() {
        return Err(Error::AssetAlreadyExists(destination));
    }

    ctx.progress
        .on_step(&format!("Creating {dest} in {}", repo.display_name))
        .await;
    fs::write(&destination, content.trim())?;
    ctx.progress.on_step_done(&format!("Created {dest}")).await;
    info!("Wrote asset {key} to {}", destination.display());

    ctx.remember(&repo)?;
    Ok(destination)
}
