//! Password input for the command line tool
//!
//! Reads the wallet password from an environment variable when one is named,
//! otherwise prompts on the terminal without echo.

use anyhow::anyhow;
use anyhow::Result;
use rpassword::prompt_password;

/// Obtains wallet passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordManager;

impl PasswordManager {
    /// Read the password from `env_var` if given, else prompt for it.
    pub fn obtain(env_var: Option<&str>, prompt: &str) -> Result<String> {
        match env_var {
            Some(var_name) => Self::from_env_var(var_name),
            None => Self::prompt(prompt),
        }
    }

    /// Prompt user to enter a password
    pub fn prompt(prompt: &str) -> Result<String> {
        let password = prompt_password(prompt)?;

        if password.is_empty() {
            return Err(anyhow!("Password cannot be empty"));
        }

        Ok(password)
    }

    /// Prompt twice for a new password and require both entries to match
    pub fn prompt_new_password() -> Result<String> {
        let password = Self::prompt("Enter new wallet password: ")?;
        let confirm = prompt_password("Confirm wallet password: ")?;

        if password != confirm {
            return Err(anyhow!("Passwords do not match"));
        }

        Ok(password)
    }

    /// Get password from environment variable (for automation/testing)
    ///
    /// Environment variables are visible to other processes of the same
    /// user. Only use this for testing or CI.
    pub fn from_env_var(var_name: &str) -> Result<String> {
        let password = std::env::var(var_name).map_err(|_| {
            anyhow!(
                "Environment variable {} not set. Use interactive prompt instead.",
                var_name
            )
        })?;

        if password.is_empty() {
            return Err(anyhow!("Environment variable {} is empty", var_name));
        }

        Ok(password)
    }
}
