//! Shell completions command implementation.
//!
//! Generate shell completions for bash, zsh, fish, and powershell.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};

use crate::cli::{Cli, Shell};

fn clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::Powershell => ClapShell::PowerShell,
    }
}

/// Writes completions for `shell` to `out`.
pub fn write_completions(shell: &Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(clap_shell(shell), &mut cmd, "qq", out);
}

/// Generate shell completions for the given shell and write to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn execute(shell: &Shell) -> io::Result<()> {
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(&shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_shell_mapping() {
        assert!(matches!(clap_shell(&Shell::Bash), ClapShell::Bash));
        assert!(matches!(clap_shell(&Shell::Zsh), ClapShell::Zsh));
        assert!(matches!(clap_shell(&Shell::Fish), ClapShell::Fish));
        assert!(matches!(clap_shell(&Shell::Powershell), ClapShell::PowerShell));
    }

    #[test]
    fn test_bash_completions_mention_commands() {
        let script = render(Shell::Bash);
        assert!(script.contains("qq"));
        assert!(script.contains("query"));
        assert!(script.contains("seed"));
    }

    #[test]
    fn test_fish_completions_not_empty() {
        assert!(!render(Shell::Fish).is_empty());
    }
}
