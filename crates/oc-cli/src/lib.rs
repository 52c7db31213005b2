pub mod commands;
pub mod config;
pub mod reporters;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    /// Format named in the `[output]` section of the config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "markdown" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}
