use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "v1-dashboard",
    version,
    about = "Terminal dashboard for the V1 companion display"
)]
pub struct CliArgs {
    /// Base URL of the device (overrides V1_DEVICE_URL)
    #[arg(long, value_name = "URL")]
    pub device: Option<String>,

    /// Directory for CSV exports (overrides EXPORT_DIR)
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,

    /// Log file used while the dashboard owns the terminal (overrides LOG_FILE)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print a one-shot summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// In headless mode, also write the buffer as CSV to this file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl CliArgs {
    /// Flags win over the environment; they are applied before config loading.
    pub fn apply_env_overrides(&self) {
        if let Some(device) = &self.device {
            std::env::set_var("V1_DEVICE_URL", device);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("EXPORT_DIR", dir);
        }
        if let Some(file) = &self.log_file {
            std::env::set_var("LOG_FILE", file);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_export() -> Result<(), clap::Error> {
        let args = CliArgs::try_parse_from([
            "v1-dashboard",
            "--headless",
            "--json",
            "--device",
            "http://10.0.0.2",
            "--export",
            "out.csv",
        ])?;

        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.device.as_deref(), Some("http://10.0.0.2"));
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
        Ok(())
    }

    #[test]
    fn help_mentions_the_device_flag() {
        assert!(CliArgs::help_text().contains("--device"));
    }
}
