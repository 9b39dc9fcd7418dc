use std::io::Write;

use checksum_validator::error::CallbackError;

/// Renders progress as a single line that is rewritten in place.
pub struct ProgressDisplay<W: Write> {
    out: W,
    label: String,
    disabled: bool,
    visible: bool,
}

impl<W: Write> ProgressDisplay<W> {
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self {
            out,
            label: label.into(),
            disabled: false,
            visible: false,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Progress callback target.
    pub fn update(&mut self, fraction: f64) -> Result<(), CallbackError> {
        if self.disabled {
            return Ok(());
        }

        write!(self.out, "\r\x1B[K{} {:>3}%", self.label, percent(fraction))?;
        self.out.flush()?;
        self.visible = true;
        Ok(())
    }

    /// Notifications may stop short of 100%, so end-of-stream draws the final state.
    pub fn complete(&mut self) -> std::io::Result<()> {
        if self.disabled {
            return Ok(());
        }

        write!(self.out, "\r\x1B[K{} 100%", self.label)?;
        self.visible = true;
        self.clear()
    }

    /// Terminates a visible progress line.
    pub fn clear(&mut self) -> std::io::Result<()> {
        if self.visible {
            writeln!(self.out)?;
            self.out.flush()?;
            self.visible = false;
        }

        Ok(())
    }
}

pub fn percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
}
