use clap::Parser;

/// Interactive shell for poking at a MagicHome LED controller.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ShellArgs {
    /// Address or hostname of the controller. The port is always 5577.
    pub host: String,

    /// Close the connection after every command instead of keeping it open.
    #[clap(long)]
    pub no_keep_alive: bool,

    /// Don't flash the device white on connect.
    #[clap(long)]
    pub skip_init: bool,

    /// JSON file with connection settings, see `ClientConfig`.
    #[clap(short, long)]
    pub config: Option<String>,
}

impl ShellArgs {
    /// Command line flags take precedence over the config file.
    pub fn client_config(&self) -> anyhow::Result<crate::ClientConfig> {
        let mut config = match &self.config {
            Some(path) => crate::ClientConfig::load(path)?,
            None => crate::ClientConfig::default(),
        };
        if self.no_keep_alive {
            config.keep_alive = false;
        }
        if self.skip_init {
            config.initialize = false;
        }
        return Ok(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ShellArgs::parse_from(["magichome-shell", "10.0.0.7", "--no-keep-alive"]);
        assert_eq!(args.host, "10.0.0.7");
        let config = args.client_config().unwrap();
        assert!(!config.keep_alive);
        assert!(config.initialize);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ShellArgs::parse_from(["magichome-shell", "10.0.0.7", "-c", "/nonexistent/magichome.json"]);
        assert!(args.client_config().is_err());
    }
}
