use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;

use chrono::Local;
use phpjson::{ParseOptions, RetryPolicy};
use tracing::{debug, info, warn};

/// Per-batch conversion driver. Files are processed strictly one after
/// another; a failure is scoped to its file and never aborts the batch.
pub struct Runner {
    root: PathBuf,
    make_backups: bool,
    delete_sources: bool,
    backup_dir: Option<PathBuf>,
    log_file: File,
    options: ParseOptions,
    retry: RetryPolicy,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub total: usize,
    pub converted: usize,
    pub verified: usize,
    pub deleted: usize,
    pub failed: usize,
    pub failures: Vec<(PathBuf, String)>,
}

#[derive(Debug)]
struct Analysis {
    bytes: usize,
    lines: usize,
    has_php_tag: bool,
    has_return: bool,
    short_array: bool,
    long_array: bool,
    variables: Vec<String>,
}

impl Runner {
    pub fn new(
        root: PathBuf,
        make_backups: bool,
        delete_sources: bool,
        max_retries: u32,
    ) -> io::Result<Self> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = root.join(format!("conversion_{stamp}.log"));
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        info!(log = %log_path.display(), "conversion log opened");

        Ok(Self {
            root,
            make_backups,
            delete_sources,
            backup_dir: None,
            log_file,
            options: ParseOptions::default(),
            retry: RetryPolicy {
                max_attempts: max_retries.max(1),
                ..RetryPolicy::default()
            },
        })
    }

    pub fn process(&mut self, files: &[PathBuf]) -> Summary {
        let mut summary = Summary {
            total: files.len(),
            ..Summary::default()
        };

        for path in files {
            match self.convert_file(path) {
                Ok(()) => {
                    summary.converted += 1;
                    summary.verified += 1;
                    info!(path = %path.display(), "converted and verified");
                    self.log("SUCCESS", &format!("converted {}", path.display()));

                    if self.delete_sources {
                        match self.safe_delete(path) {
                            Ok(()) => {
                                summary.deleted += 1;
                                self.log("DELETE", &format!("deleted {}", path.display()));
                            }
                            Err(reason) => {
                                warn!(path = %path.display(), %reason, "kept source file");
                                self.log("WARN", &format!("kept {}: {reason}", path.display()));
                            }
                        }
                    }
                }
                Err(reason) => {
                    summary.failed += 1;
                    warn!(path = %path.display(), %reason, "conversion failed");
                    self.log("FAILED", &format!("{}: {reason}", path.display()));
                    summary.failures.push((path.clone(), reason));
                }
            }
        }
        summary
    }

    fn convert_file(&mut self, path: &Path) -> Result<(), String> {
        let content =
            fs::read_to_string(path).map_err(|err| format!("failed to read source: {err}"))?;

        let analysis = analyze(&content);
        debug!(path = %path.display(), ?analysis, "analyzed source file");

        if self.make_backups {
            self.backup_file(path)
                .map_err(|err| format!("backup failed, aborting for safety: {err}"))?;
        }

        let record = self
            .retry
            .run(
                |attempt| {
                    debug!(path = %path.display(), attempt, "parse attempt");
                    phpjson::parse_with_options(&content, &self.options)
                },
                thread::sleep,
            )
            .map_err(|err| format!("parse failed: {err}"))?;

        let key_count = phpjson::validate_record(&record, &self.options)
            .map_err(|err| format!("validation failed: {err}"))?;
        debug!(path = %path.display(), key_count, "record validated");

        let json_path = path.with_extension("json");
        let serialized =
            phpjson::to_json_string(&record).map_err(|err| format!("serialization failed: {err}"))?;
        fs::write(&json_path, serialized.as_bytes())
            .map_err(|err| format!("failed to write artifact: {err}"))?;

        // Verification re-reads the artifact from disk so write and
        // serialization bugs are caught, not just parser bugs.
        let persisted = fs::read_to_string(&json_path)
            .map_err(|err| format!("failed to re-read artifact: {err}"))?;
        let report = phpjson::verify(&record, &persisted);
        if !report.passed() {
            // Never leave a partially-trusted artifact behind. Integrity
            // failures are terminal for the file, not retried.
            if let Err(err) = fs::remove_file(&json_path) {
                warn!(path = %json_path.display(), %err, "could not remove failed artifact");
            }
            return Err(format!(
                "integrity verification failed: {}",
                report.issues.join("; ")
            ));
        }

        Ok(())
    }

    /// Copy the source into the batch backup directory, preserving its
    /// path relative to the scan root.
    fn backup_file(&mut self, path: &Path) -> io::Result<()> {
        let backup_root = match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => {
                let stamp = Local::now().format("%Y%m%d_%H%M%S");
                let dir = self.root.join(format!("backup_{stamp}"));
                fs::create_dir_all(&dir)?;
                info!(dir = %dir.display(), "backup directory created");
                self.backup_dir = Some(dir.clone());
                dir
            }
        };

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let target = backup_root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)?;
        debug!(from = %path.display(), to = %target.display(), "backed up");
        Ok(())
    }

    /// Delete a source file only after one final re-read of its artifact
    /// confirms a non-empty JSON map is in place.
    fn safe_delete(&mut self, path: &Path) -> Result<(), String> {
        let json_path = path.with_extension("json");
        let persisted = fs::read_to_string(&json_path)
            .map_err(|err| format!("artifact unreadable before delete: {err}"))?;
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&persisted)
            .map_err(|err| format!("artifact is not a JSON map: {err}"))?;
        if map.is_empty() {
            return Err("artifact is empty".to_string());
        }
        fs::remove_file(path).map_err(|err| format!("delete failed: {err}"))
    }

    fn log(&mut self, level: &str, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Err(err) = writeln!(self.log_file, "[{stamp}] {level}: {message}") {
            warn!(%err, "could not append to conversion log");
        }
    }
}

fn analyze(content: &str) -> Analysis {
    Analysis {
        bytes: content.len(),
        lines: content.lines().count(),
        has_php_tag: content.contains("<?php") || content.contains("<?="),
        has_return: content.contains("return"),
        short_array: content.contains('['),
        long_array: content.to_ascii_lowercase().contains("array"),
        variables: assigned_variables(content),
    }
}

/// Names of variables a line assigns to, for the pre-flight debug log.
fn assigned_variables(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in content.lines() {
        let line = line.trim_start();
        let Some(rest) = line.strip_prefix('$') else {
            continue;
        };
        let name: String = rest
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .collect();
        if !name.is_empty()
            && rest[name.len()..].trim_start().starts_with('=')
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}
