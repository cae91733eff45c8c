//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "family-wizard",
    version,
    about = "Add or edit a family member of a community association"
)]
pub struct Cli {
    /// Edit the family member with this id instead of creating a new one
    #[arg(long, value_name = "RECORD_ID")]
    pub edit: Option<String>,

    /// Data file with villages and family members (JSON)
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Outbox file receiving submissions (JSON lines)
    #[arg(long, value_name = "FILE")]
    pub outbox: Option<PathBuf>,

    /// Id of the signed-in member
    #[arg(long, value_name = "MEMBER_ID")]
    pub member: Option<String>,

    /// Store --data, --outbox and --member in the config file for later runs
    #[arg(long)]
    pub save_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::parse_from(["family-wizard"]);
        assert!(cli.edit.is_none());
        assert!(cli.data.is_none());
        assert!(cli.member.is_none());
    }

    #[test]
    fn test_edit_flag() {
        let cli = Cli::parse_from(["family-wizard", "--edit", "f1", "--member", "m1"]);
        assert_eq!(cli.edit.as_deref(), Some("f1"));
        assert_eq!(cli.member.as_deref(), Some("m1"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["family-wizard", "--bogus"]).is_err());
    }
}
