// ABOUTME: Local filesystem implementation of the file operation service
// ABOUTME: Confines access to one working directory, enforces size/encoding limits, and applies line edits atomically
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::{ServerConfig, BYTES_PER_MB};
use crate::errors::ErrorDetail;
use crate::lock::FileLocks;
use crate::types::{
    EditFileRequest, EditFileResponse, EditOperation, FileInfo, FileOperationService, LineEdit,
    ListFilesRequest, ListFilesResponse, ReadFileRequest, ReadFileResponse,
};

const LIST_OP: &str = "list";
const READ_OP: &str = "read";
const EDIT_OP: &str = "edit";

/// File operation service backed by a single local directory
///
/// File names are flat (no separators) and resolved against the working
/// directory. Edits hold a per-file lock for the whole read-modify-write
/// cycle and replace the file through a temporary sibling.
pub struct LocalFileService {
    root: PathBuf,
    max_file_size_bytes: u64,
    locks: FileLocks,
}

impl LocalFileService {
    /// Create a service from the shared configuration
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            root: config.working_directory.clone(),
            max_file_size_bytes: config.max_file_size_bytes(),
            locks: FileLocks::new(config.lock_timeout),
        }
    }

    fn resolve(&self, name: &str, operation: &str) -> Result<PathBuf, ErrorDetail> {
        if name == "." || name == ".." {
            return Err(ErrorDetail::permission_denied(name, operation));
        }
        Ok(self.root.join(name))
    }

    fn too_large(&self, name: &str, operation: &str, size: u64) -> ErrorDetail {
        ErrorDetail::file_too_large(
            name,
            operation,
            size,
            self.max_file_size_bytes / BYTES_PER_MB,
        )
    }

    /// Read a regular file as UTF-8 after checking its size
    async fn load_text(
        &self,
        path: &Path,
        name: &str,
        operation: &str,
    ) -> Result<String, ErrorDetail> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| map_io_error(&e, name, operation))?;
        if !meta.is_file() {
            return Err(ErrorDetail::filesystem(
                name,
                operation,
                "not a regular file",
            ));
        }
        if meta.len() > self.max_file_size_bytes {
            return Err(self.too_large(name, operation, meta.len()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| map_io_error(&e, name, operation))?;
        String::from_utf8(bytes).map_err(|_| ErrorDetail::invalid_encoding(name, operation))
    }

    /// Count lines for a listing entry, -1 when the file cannot be decoded
    async fn count_lines(&self, path: &Path, size: u64) -> i64 {
        if size > self.max_file_size_bytes {
            return -1;
        }
        match tokio::fs::read(path).await {
            Ok(bytes) => std::str::from_utf8(&bytes).map_or(-1, |text| text.lines().count() as i64),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not read file for line count");
                -1
            }
        }
    }
}

#[async_trait]
impl FileOperationService for LocalFileService {
    async fn list_files(
        &self,
        _request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, ErrorDetail> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| map_io_error(&e, ".", LIST_OP))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| map_io_error(&e, ".", LIST_OP))?
        {
            let meta = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(FileInfo {
                lines: self.count_lines(&entry.path(), meta.len()).await,
                name,
                size: meta.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(root = %self.root.display(), count = files.len(), "Listed files");
        Ok(ListFilesResponse { files })
    }

    async fn read_file(&self, request: &ReadFileRequest) -> Result<ReadFileResponse, ErrorDetail> {
        let name = request.name.as_str();
        let issues = request.param_issues();
        if !issues.is_empty() {
            return Err(ErrorDetail::invalid_params_for(
                "read_file arguments are invalid",
                issues,
                Some(name),
                Some(READ_OP),
            ));
        }

        let path = self.resolve(name, READ_OP)?;
        let text = self.load_text(&path, name, READ_OP).await?;
        let total_lines = text.lines().count();

        if !request.is_range() {
            debug!(file = name, total_lines, "Read whole file");
            return Ok(ReadFileResponse {
                content: text,
                filename: name.to_owned(),
                total_lines,
                requested_start_line: 0,
                requested_end_line: 0,
                actual_end_line: total_lines as i64 - 1,
                is_range: false,
            });
        }

        let requested_start_line = request.start_line.map_or(0, |l| l as usize);
        let requested_end_line = request.end_line.map_or(0, |l| l as usize);
        let start = requested_start_line.max(1);
        let end = if requested_end_line == 0 {
            total_lines
        } else {
            requested_end_line.min(total_lines)
        };

        let (content, actual_end_line) = if start > end {
            (String::new(), -1)
        } else {
            let lines: Vec<&str> = text.lines().skip(start - 1).take(end - start + 1).collect();
            (lines.join("\n"), end as i64 - 1)
        };

        debug!(file = name, start, end, total_lines, "Read file range");
        Ok(ReadFileResponse {
            content,
            filename: name.to_owned(),
            total_lines,
            requested_start_line,
            requested_end_line,
            actual_end_line,
            is_range: true,
        })
    }

    async fn edit_file(&self, request: &EditFileRequest) -> Result<EditFileResponse, ErrorDetail> {
        let name = request.name.as_str();
        let issues = request.param_issues();
        if !issues.is_empty() {
            return Err(ErrorDetail::invalid_params_for(
                "edit_file arguments are invalid",
                issues,
                Some(name),
                Some(EDIT_OP),
            ));
        }

        let path = self.resolve(name, EDIT_OP)?;
        let Some(_guard) = self.locks.acquire(&path).await else {
            return Err(ErrorDetail::lock_failed(name, EDIT_OP));
        };

        let (original, permissions, file_created) = match tokio::fs::metadata(&path).await {
            Ok(meta) => (
                self.load_text(&path, name, EDIT_OP).await?,
                Some(meta.permissions()),
                false,
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound && request.create_if_missing => {
                (String::new(), None, true)
            }
            Err(e) => return Err(map_io_error(&e, name, EDIT_OP)),
        };

        let newline = if original.contains("\r\n") { "\r\n" } else { "\n" };
        let keep_trailing = original.is_empty() || original.ends_with('\n');
        let mut lines: Vec<String> = original.lines().map(ToOwned::to_owned).collect();

        let mut lines_modified = 0;
        for (i, edit) in request.edits.iter().enumerate() {
            lines_modified += apply_edit(&mut lines, edit).map_err(|reason| {
                let mut issues = std::collections::BTreeMap::new();
                issues.insert(format!("edits[{i}].line"), reason);
                ErrorDetail::invalid_params_for(
                    format!("edit {i} ({}) cannot be applied", edit.operation),
                    issues,
                    Some(name),
                    Some(EDIT_OP),
                )
            })?;
        }
        if let Some(text) = &request.append {
            let appended: Vec<String> = text.lines().map(ToOwned::to_owned).collect();
            lines_modified += appended.len();
            lines.extend(appended);
        }

        let mut output = lines.join(newline);
        if !lines.is_empty() && keep_trailing {
            output.push_str(newline);
        }
        if output.len() as u64 > self.max_file_size_bytes {
            return Err(self.too_large(name, EDIT_OP, output.len() as u64));
        }

        write_atomically(&self.root, &path, output, permissions)
            .await
            .map_err(|e| map_io_error(&e, name, EDIT_OP))?;

        debug!(
            file = name,
            lines_modified,
            total_lines = lines.len(),
            file_created,
            "Edited file"
        );
        Ok(EditFileResponse {
            filename: name.to_owned(),
            lines_modified,
            new_total_lines: lines.len(),
            file_created,
        })
    }
}

/// Apply one edit to the buffer, returning how many lines it touched
fn apply_edit(lines: &mut Vec<String>, edit: &LineEdit) -> Result<usize, String> {
    let len = lines.len();
    let line = usize::try_from(edit.line)
        .ok()
        .filter(|l| *l >= 1)
        .ok_or_else(|| "must be >= 1".to_owned())?;

    let content: Vec<String> = match edit.content.as_deref() {
        None | Some("") => vec![String::new()],
        Some(text) => text.lines().map(ToOwned::to_owned).collect(),
    };

    match edit.operation {
        EditOperation::Replace | EditOperation::Delete if line > len => Err(format!(
            "line {line} is beyond the end of the file ({len} lines)"
        )),
        EditOperation::Insert if line > len + 1 => Err(format!(
            "line {line} is beyond the insertion point ({} max)",
            len + 1
        )),
        EditOperation::Replace => {
            let touched = content.len();
            lines.splice(line - 1..line, content);
            Ok(touched)
        }
        EditOperation::Insert => {
            let touched = content.len();
            lines.splice(line - 1..line - 1, content);
            Ok(touched)
        }
        EditOperation::Delete => {
            lines.remove(line - 1);
            Ok(1)
        }
    }
}

/// Replace `target` with `contents` through a temporary file in `dir`
async fn write_atomically(
    dir: &Path,
    target: &Path,
    contents: String,
    permissions: Option<std::fs::Permissions>,
) -> io::Result<()> {
    let dir = dir.to_path_buf();
    let target = target.to_path_buf();
    tokio::task::spawn_blocking(move || -> io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        if let Some(permissions) = permissions {
            std::fs::set_permissions(tmp.path(), permissions)?;
        }
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| io::Error::other(format!("write task failed: {e}")))?
}

/// Translate an I/O failure into the matching catalog error
fn map_io_error(err: &io::Error, name: &str, operation: &str) -> ErrorDetail {
    match err.kind() {
        io::ErrorKind::NotFound => ErrorDetail::file_not_found(name, operation),
        io::ErrorKind::PermissionDenied => ErrorDetail::permission_denied(name, operation),
        _ => ErrorDetail::filesystem(name, operation, err.to_string()),
    }
}
