//! Hash a password for seeding the users table.

use clap::Args;

use nicelab_auth::PasswordHasher;
use nicelab_core::error::AppError;

/// Arguments for the hash-password command
#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Plaintext password to hash
    pub password: String,
}

/// Execute the hash-password command
pub fn execute(args: &HashPasswordArgs) -> Result<(), AppError> {
    let hash = PasswordHasher::new().hash_password(&args.password)?;
    println!("{hash}");
    Ok(())
}
