//! Password acquisition for pack and unpack commands.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use zeroize::Zeroizing;

/// Returns the password given on the command line, or prompts for it.
///
/// The prompt never echoes input. With `confirm` set the password is asked
/// for twice and both entries must match.
pub fn obtain(provided: Option<&str>, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(password) = provided {
        return Ok(Zeroizing::new(password.to_string()));
    }

    let password = Zeroizing::new(
        rpassword::prompt_password("Password: ").context("failed to read password")?,
    );

    if confirm {
        let again = Zeroizing::new(
            rpassword::prompt_password("Confirm password: ")
                .context("failed to read password confirmation")?,
        );
        if *password != *again {
            bail!("passwords do not match");
        }
    }

    Ok(password)
}

/// Masks a password for display, one `*` per character.
pub fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_obtain_uses_provided_password() {
        let password = obtain(Some("hunter2"), true).unwrap();
        assert_eq!(password.as_str(), "hunter2");
    }

    #[test]
    fn test_obtain_accepts_empty_provided_password() {
        let password = obtain(Some(""), false).unwrap();
        assert!(password.is_empty());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("hunter2"), "*******");
        assert_eq!(mask("pässwörd"), "********");
    }
}
