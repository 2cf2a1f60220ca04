//! Output configuration from TOML (`[output]` section)

use deepthink_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Format used when no `--output` flag is given
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Flag value, else the configured format, else [`OutputFormat::Full`]
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_file_beats_default() {
        let config: super::super::FileConfig =
            toml::from_str("[output]\nformat = \"answer\"\n").unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Answer));
        assert_eq!(config.output.resolve_format(None), OutputFormat::Answer);
        assert_eq!(
            config.output.resolve_format(Some(OutputFormat::Json)),
            OutputFormat::Json
        );
        assert_eq!(
            FileOutputConfig::default().resolve_format(None),
            OutputFormat::Full
        );
    }
}
