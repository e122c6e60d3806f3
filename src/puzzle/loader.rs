use std::fs;
use std::path::Path;
#[cfg(feature = "network")]
use std::time::Duration;

use anyhow::{Context, Result};

use crate::puzzle::Puzzle;

pub fn load_file(path: &Path) -> Result<Puzzle> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read puzzle file {}", path.display()))?;
    let puzzle = Puzzle::from_json(&content)
        .with_context(|| format!("invalid puzzle file {}", path.display()))?;
    log::info!(
        "loaded puzzle {} ({}x{}) from {}",
        puzzle.id(),
        puzzle.rows(),
        puzzle.cols(),
        path.display()
    );
    Ok(puzzle)
}

pub fn puzzle_url(server_url: &str, series: &str, number: u32) -> String {
    format!("{}/puzzles/{series}/{number}", server_url.trim_end_matches('/'))
}

#[cfg(feature = "network")]
pub fn fetch(server_url: &str, series: &str, number: u32, timeout: Duration) -> Result<Puzzle> {
    let url = puzzle_url(server_url, series, number);
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("could not connect to {url}"))?
        .error_for_status()?;
    let body = response.text()?;
    let puzzle = Puzzle::from_json(&body).with_context(|| format!("invalid puzzle from {url}"))?;
    log::info!("fetched puzzle {} from {url}", puzzle.id());
    Ok(puzzle)
}

#[cfg(not(feature = "network"))]
pub fn fetch(
    _server_url: &str,
    series: &str,
    number: u32,
    _timeout: std::time::Duration,
) -> Result<Puzzle> {
    anyhow::bail!("cannot fetch {series}/{number}: built without network support")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::SMALL_PUZZLE;
    use tempfile::TempDir;

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("puzzle.json");
        fs::write(&path, SMALL_PUZZLE).unwrap();
        let puzzle = load_file(&path).unwrap();
        assert_eq!(puzzle.series, "cryptic");
    }

    #[test]
    fn test_load_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn test_puzzle_url_trims_slash() {
        assert_eq!(
            puzzle_url("http://localhost:8080/", "times", 42),
            "http://localhost:8080/puzzles/times/42"
        );
    }
}
