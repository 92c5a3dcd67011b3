use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    _state_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server(photos_dir: &Path) -> Result<ServerGuard> {
    let state_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = state_dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_kerpic-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--photos-dir",
            photos_dir.to_str().unwrap(),
        ])
        .env_remove("PHOTOS_DIR")
        .env_remove("KERPIC_ADDR")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn kerpic-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _state_dir: state_dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Photo tree used by the server tests:
///
/// ```text
/// cover.png
/// notes.txt
/// .hidden/x.jpg
/// trip/a.jpg  trip/b.JPG  trip/readme.md
/// ```
#[allow(dead_code)]
pub fn photo_tree() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().context("create photos tempdir")?;
    let root = dir.path();
    std::fs::create_dir_all(root.join("trip")).context("mkdir trip")?;
    std::fs::create_dir_all(root.join(".hidden")).context("mkdir .hidden")?;
    for (rel, body) in [
        ("cover.png", "cover"),
        ("notes.txt", "notes"),
        (".hidden/x.jpg", "x"),
        ("trip/a.jpg", "aaaa"),
        ("trip/b.JPG", "bb"),
        ("trip/readme.md", "readme"),
    ] {
        std::fs::write(root.join(rel), body).with_context(|| format!("write {rel}"))?;
    }
    Ok(dir)
}
