//! Command implementations behind the `revlog` binary
//!
//! Each command renders to a caller supplied writer so it can be exercised
//! without a terminal:
//!
//! - `log`: Decode and print a log stream in a medium-like layout
//! - `traverse`: Walk the ancestors of a revision
//! - `stats`: Print per-file change counts of a commit

pub mod log;
pub mod stats;
pub mod traverse;

#[cfg(test)]
pub(crate) fn render(
    command: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
) -> anyhow::Result<String> {
    colored::control::set_override(false);

    let mut output = Vec::new();
    command(&mut output)?;
    Ok(String::from_utf8(output)?)
}
