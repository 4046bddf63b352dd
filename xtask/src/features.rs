use std::process::Command;

use anyhow::{Context, Result};

const CRATE: &str = "tripdesk-common";

/// `None` checks with `--no-default-features`.
const FEATURE_COMBINATIONS: &[Option<&str>] = &[None, Some("storage")];

/// Check that every supported feature combination compiles.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} {CRATE} feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let display_label = features.unwrap_or("none");

        println!(
            "\n[{}/{}] cargo check -p {CRATE} --no-default-features{}",
            index + 1,
            FEATURE_COMBINATIONS.len(),
            features.map(|list| format!(" --features {list}")).unwrap_or_default()
        );

        let mut command = Command::new("cargo");
        command.args(["check", "-p", CRATE, "--no-default-features"]);

        if let Some(feature_list) = features {
            command.arg("--features").arg(feature_list);
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo check for '{display_label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{display_label}' failed to compile");
        }

        println!("✅ Features '{display_label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
