//! Key management commands.
//!
//! `gatehouse keys generate` - Generate a new symmetric token key.

use gatehouse_core::DEFAULT_KEY_ENV;
use gatehouse_token::SymmetricKey;
use std::fs;
use std::path::PathBuf;

/// File name the key is written to under `--output`.
pub const KEY_FILE_NAME: &str = "token.key";

/// Generate a new symmetric key.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let key = SymmetricKey::generate();

    if let Some(output_dir) = output {
        fs::create_dir_all(&output_dir)?;

        let key_path = output_dir.join(KEY_FILE_NAME);
        key.save_to_file(&key_path)?;

        println!("✔ Generated token key: {}", key_path.display());
        println!();
        println!(
            "⚠️  This key both mints and verifies tokens. Never commit it to version control."
        );
        println!();
        println!("Set as environment variable:");
        println!("  export {}=$(cat {})", DEFAULT_KEY_ENV, key_path.display());
    } else {
        println!("Token key (keep secure!):");
        println!("{}", key.to_hex());
        println!();
        println!("Use --output <dir> to save the key to a file.");
    }

    Ok(())
}
