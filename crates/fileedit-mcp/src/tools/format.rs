// ABOUTME: Canonical text rendering of tool outcomes returned inside MCP tool results
// ABOUTME: Formats file listings, whole/ranged reads, edit summaries, and tool errors byte-for-byte
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

//! Clients parse these strings, so every separator and off-by-one here is
//! part of the wire contract.

use std::fmt::Write;

use chrono::SecondsFormat;
use fileedit::errors::ErrorDetail;
use fileedit::types::FileInfo;

/// Render a directory listing
///
/// An empty listing is just `"Total files: 0"`. Files whose line count is
/// unknown (`-1`) show `(unknown)`.
pub fn format_list_files_result(files: &[FileInfo]) -> String {
    if files.is_empty() {
        return "Total files: 0".to_owned();
    }

    let mut out = String::from("Files in directory:\n\n");
    for file in files {
        let modified = file.modified.to_rfc3339_opts(SecondsFormat::Secs, true);
        let _ = if file.lines == -1 {
            writeln!(
                out,
                "name: {}, modified: {modified}, lines: (unknown)",
                file.name
            )
        } else {
            writeln!(
                out,
                "name: {}, modified: {modified}, lines: {}",
                file.name, file.lines
            )
        };
    }
    let _ = write!(out, "\nTotal files: {}", files.len());
    out
}

/// Render a whole-file or ranged read
///
/// `actual_end` is the zero-based index of the last returned line (-1 when
/// nothing was returned). For ranges, an empty result is displayed as
/// `requested_start..requested_start-1` (or `1-0` with no start), which can
/// put the end before the start; clients rely on that exact text.
pub fn format_read_file_result(
    content: &str,
    filename: &str,
    total_lines: usize,
    requested_start: usize,
    requested_end: usize,
    actual_end: i64,
    is_range: bool,
) -> String {
    let header = if is_range {
        let display_start = if requested_start > 0 {
            requested_start
        } else {
            1
        };
        let display_end = if content.is_empty() {
            requested_start.saturating_sub(1)
        } else if requested_end > 0 && requested_end <= total_lines {
            requested_end
        } else {
            usize::try_from(actual_end.saturating_add(1)).unwrap_or(0)
        };
        format!("File: {filename} (lines {display_start}-{display_end} of {total_lines} total)")
    } else {
        format!("File: {filename} ({total_lines} lines)")
    };

    if !is_range && total_lines == 0 {
        return format!("{header}\n\n");
    }
    format!("{header}\n\n{content}")
}

/// Render the summary of a successful edit
pub fn format_edit_file_result(
    filename: &str,
    lines_modified: usize,
    total_lines: usize,
    file_created: bool,
) -> String {
    format!(
        "File edited successfully: {filename}\nLines modified: {lines_modified}\nTotal lines: {total_lines}\nFile created: {file_created}"
    )
}

/// Render a tool-level failure
pub fn format_tool_error(detail: Option<&ErrorDetail>) -> String {
    detail.map_or_else(
        || "Error: An unexpected error occurred, but no details were provided.".to_owned(),
        |d| format!("Error: {}", d.message),
    )
}

/// Render the result for a tool name that is not registered
pub fn format_unknown_tool(name: &str) -> String {
    format!("Error: Unknown tool '{name}'.")
}
