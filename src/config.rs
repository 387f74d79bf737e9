//! Configuration and CLI argument handling

use clap::Parser;

use crate::timer::TimerConfig;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "round-bell")]
#[command(about = "A state-managed HTTP server driving a boxing round timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Number of work rounds
    #[arg(short, long, default_value = "3")]
    pub rounds: u32,

    /// Round duration in seconds
    #[arg(long, default_value = "180")]
    pub round_secs: u64,

    /// Rest duration in seconds
    #[arg(long, default_value = "60")]
    pub rest_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initial timer configuration from the CLI values
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::new(self.rounds, self.round_secs, self.rest_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_form_a_valid_timer_config() {
        let config = Config::try_parse_from(["round-bell"]).unwrap();
        let timer_config = config.timer_config();
        assert!(timer_config.validate().is_ok());
        assert_eq!(timer_config.rounds, 3);
        assert_eq!(timer_config.round_secs, 180);
        assert_eq!(timer_config.rest_secs, 60);
    }

    #[test]
    fn timer_flags_override_defaults() {
        let config = Config::try_parse_from([
            "round-bell",
            "--rounds",
            "5",
            "--round-secs",
            "120",
            "--rest-secs",
            "30",
        ])
        .unwrap();
        let timer_config = config.timer_config();
        assert_eq!(timer_config.rounds, 5);
        assert_eq!(timer_config.round_secs, 120);
        assert_eq!(timer_config.rest_secs, 30);
    }
}
