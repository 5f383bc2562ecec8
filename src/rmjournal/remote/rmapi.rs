use super::{remote_path, RemoteStore, ROOT};
use crate::error::{JournalError, Result};
use crate::workdir::WorkDir;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Remote store backed by the `rmapi` command-line client.
#[derive(Debug, Clone)]
pub struct RmapiStore {
    program: String,
    leading_args: Vec<String>,
}

impl RmapiStore {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before every subcommand (e.g. `-ni`).
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    fn run(&self, args: &[&str], dir: &Path) -> Result<String> {
        let rendered = format!("{} {}", self.program, args.join(" "));
        log::debug!("running `{}` in {}", rendered, dir.display());

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| {
                JournalError::Remote(format!("Failed to launch '{}': {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(JournalError::Remote(format!(
                "`{}` failed: {}",
                rendered,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RemoteStore for RmapiStore {
    fn list_names(&self, folder: &str, work: &WorkDir) -> Result<HashSet<String>> {
        let listing = if folder == ROOT {
            self.run(&["ls"], work.path())?
        } else {
            self.run(&["ls", folder], work.path())?
        };
        Ok(parse_listing(&listing))
    }

    fn fetch(&self, name: &str, work: &WorkDir) -> Result<Vec<u8>> {
        let target = work.subdir("fetch")?;
        self.run(&["get", name], &target)?;
        let archive = find_rmdoc(&target)?
            .ok_or_else(|| JournalError::RemoteNotFound(name.to_string()))?;
        log::debug!("downloaded {}", archive.display());
        Ok(fs::read(archive)?)
    }

    fn publish(&mut self, archive: &[u8], folder: &str, name: &str, work: &WorkDir) -> Result<()> {
        let destination = remote_path(folder, name);
        if self.list_names(folder, work)?.contains(name) {
            self.run(&["rm", &destination], work.path())?;
        }

        let stem = sanitize_filename(name);
        let upload_dir = work.subdir("upload")?;
        let file_name = format!("{}.rmdoc", stem);
        fs::write(upload_dir.join(&file_name), archive)?;

        if folder == ROOT {
            self.run(&["put", &file_name], &upload_dir)?;
        } else {
            self.run(&["put", &file_name, folder], &upload_dir)?;
        }

        if stem != name {
            self.run(&["mv", &remote_path(folder, &stem), &destination], work.path())?;
        }
        Ok(())
    }

    fn ensure_folder(&mut self, folder: &str, work: &WorkDir) -> Result<()> {
        if folder == ROOT || self.list_names(ROOT, work)?.contains(folder) {
            return Ok(());
        }
        log::info!("creating remote folder {}", folder);
        self.run(&["mkdir", folder], work.path())?;
        Ok(())
    }
}

/// Names from `rmapi ls` output: one `[f]` (document) or `[d]` (folder)
/// entry per line, tab separated.
pub fn parse_listing(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_end();
            let name = line
                .strip_prefix("[f]")
                .or_else(|| line.strip_prefix("[d]"))?;
            let name = name.trim_start_matches(['\t', ' ']);
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Local file stem that is safe to hand to the client.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn find_rmdoc(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "rmdoc") {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
