pub mod display;
pub mod task;

use clap::Args;

/// Global flags that can be used with any command
#[derive(Debug, Clone, Copy, Args)]
pub struct GlobalFlags {
    #[arg(short, long, action = clap::ArgAction::Count, default_value_t = 0, global = true)]
    /// Verbosity level
    pub verbosity: u8,
    /// Enable debug output
    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,
    /// Disable color output
    #[arg(long, default_value_t = false, global = true)]
    pub no_color: bool,
    /// Disable progress output
    #[arg(long, default_value_t = false, global = true)]
    pub no_progress: bool,
}

impl GlobalFlags {
    /// Progress is always shown while debugging.
    pub fn show_progress(&self) -> bool {
        !self.no_progress || self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(no_progress: bool, debug: bool) -> GlobalFlags {
        GlobalFlags {
            verbosity: 0,
            debug,
            no_color: false,
            no_progress,
        }
    }

    #[test]
    fn test_show_progress_by_default() {
        assert!(flags(false, false).show_progress());
    }

    #[test]
    fn test_no_progress_hides_progress() {
        assert!(!flags(true, false).show_progress());
    }

    #[test]
    fn test_debug_overrides_no_progress() {
        assert!(flags(true, true).show_progress());
    }
}
