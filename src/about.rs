//! Static "About" page.

use std::io::{self, Write};

pub const ABOUT_HEADING: &str = "About Debenture";

pub const ABOUT_BODY: &str = "Debenture is an intelligent loan sales assistant powered by AI. \
We help NBFCs streamline their personal loan conversion process with conversational AI, \
KYC verification, and automated credit assessment.";

/// Write the About page.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_about(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{ABOUT_HEADING}")?;
    writeln!(out)?;
    writeln!(out, "{ABOUT_BODY}")?;
    out.flush()
}

#[cfg(test)]
#[path = "about_test.rs"]
mod tests;
