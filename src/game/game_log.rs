use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a finished game as plain text, one move per line in play order.
pub fn write_game_log<P, M>(path: P, moves: &[M]) -> std::io::Result<()>
where
    P: AsRef<Path>,
    M: Display,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for mv in moves {
        writeln!(writer, "{}", mv)?;
    }
    writer.flush()?;

    log::info!("Wrote {} moves to {}", moves.len(), path.display());
    Ok(())
}
