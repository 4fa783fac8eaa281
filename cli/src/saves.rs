use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use sweeper_core::PlayerStats;

/// Reads the stats record, or returns defaults on the very first run when no file exists yet.
pub fn load(path: &Path) -> anyhow::Result<PlayerStats> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::info!("No stats at {}, starting fresh", path.display());
            return Ok(PlayerStats::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Could not read {}", path.display()));
        }
    };

    PlayerStats::from_bytes(&bytes).with_context(|| format!("Corrupt stats in {}", path.display()))
}

/// Like [`load`], falling back to defaults on any failure.
pub fn load_or_default(path: &Path) -> PlayerStats {
    load(path).unwrap_or_else(|err| {
        log::warn!("{:#}, using default stats", err);
        PlayerStats::default()
    })
}

pub fn save(path: &Path, stats: &PlayerStats) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Could not create {}", dir.display()))?;
    }
    fs::write(path, stats.to_bytes()).with_context(|| format!("Could not write {}", path.display()))?;
    log::debug!("Saved stats to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sweeper-saves-{}-{}", std::process::id(), name))
            .join("Saves.ms")
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = scratch_path("missing");
        assert_eq!(load(&path).unwrap(), PlayerStats::default());
    }

    #[test]
    fn save_creates_directory_and_loads_back() {
        let path = scratch_path("written");
        let mut stats = PlayerStats::default();
        stats.record_win(sweeper_core::Difficulty::Hard, 321, true, 0);

        save(&path, &stats).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), PlayerStats::RECORD_SIZE as u64);
        assert_eq!(load(&path).unwrap(), stats);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn truncated_file_falls_back() {
        let path = scratch_path("truncated");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, [1, 2, 3]).unwrap();

        assert!(load(&path).is_err());
        assert_eq!(load_or_default(&path), PlayerStats::default());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
