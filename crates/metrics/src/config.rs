//! Screen settings derived from the output stream and node options.

use std::io::{self, IsTerminal};
use std::time::Duration;

pub const DEFAULT_SOLVER: &str = "default";
const TTY_REFRESH: Duration = Duration::from_secs(1);
const LOG_REFRESH: Duration = Duration::from_secs(600);

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Whether stdout is an interactive terminal.
    pub tty: bool,
    /// Redraw one persistent screen in place instead of appending frames.
    pub screen: bool,
    pub refresh_interval: Duration,
    pub mining: bool,
    pub solver: String,
    /// Emit ANSI colors.
    pub ansi: bool,
}

impl MetricsConfig {
    pub fn detect() -> Self {
        Self::for_output(io::stdout().is_terminal())
    }

    pub fn for_output(tty: bool) -> Self {
        Self {
            tty,
            screen: tty,
            refresh_interval: if tty { TTY_REFRESH } else { LOG_REFRESH },
            mining: false,
            solver: DEFAULT_SOLVER.to_string(),
            ansi: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MetricsConfig;
    use std::time::Duration;

    #[test]
    fn defaults_follow_the_output_kind() {
        let tty = MetricsConfig::for_output(true);
        assert!(tty.screen);
        assert_eq!(tty.refresh_interval, Duration::from_secs(1));

        let piped = MetricsConfig::for_output(false);
        assert!(!piped.screen);
        assert_eq!(piped.refresh_interval, Duration::from_secs(600));
        assert_eq!(piped.solver, "default");
    }
}
