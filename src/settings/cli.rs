use super::Parser;

/// Token pair issuance and rotation service.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
