use std::path::Path;

use crate::channels::index::{ChannelIndex, ChannelRecord};

/// Upper bound on directory entries examined per scan, so a pathological
/// directory cannot stall request handling.
const MAX_SCAN_ENTRIES: usize = 10_000;

/// Scan the daemon's output directory once.
///
/// `.m3u8` files are counted, `.csv` files are parsed into channel records,
/// everything else is ignored. The directory is written by an external
/// process with no synchronization, so entries may appear or vanish at any
/// point during the scan; anything unreadable is skipped, and a missing
/// directory yields an empty index rather than an error.
pub fn scan(dir: &Path) -> ChannelIndex {
    let mut index = ChannelIndex::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot open scan directory {}: {}", dir.display(), e);
            return index;
        }
    };

    let mut seen = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read directory entry: {}", e);
                continue;
            }
        };
        seen += 1;
        if seen > MAX_SCAN_ENTRIES {
            tracing::warn!(
                "Scan directory {} has more than {} entries, ignoring the rest",
                dir.display(),
                MAX_SCAN_ENTRIES
            );
            break;
        }
        let file_type = match entry.file_type() {
            Ok(t) => t,
            // entry vanished between listing and stat
            Err(e) => {
                tracing::debug!("Cannot stat {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if !file_type.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            // the daemon never writes non-UTF-8 names
            continue;
        };
        match first_extension(file_name) {
            Some("m3u8") => index.manifest_count += 1,
            Some("csv") => read_index_file(&entry.path(), &mut index.channels),
            _ => {}
        }
    }

    index
}

/// The token immediately after the first dot of `file_name`, or None when
/// there is no dot. Matches the daemon's one-extension naming; a dotfile
/// like `.csv` reads as extension `csv` with an empty stem.
fn first_extension(file_name: &str) -> Option<&str> {
    file_name.split('.').nth(1)
}

/// Parse one channel index CSV into `channels`, in row order.
///
/// No header row; rows may have any field count. A row with fewer than two
/// fields gets empty-string defaults, and a row that fails to parse is
/// skipped without aborting the file.
fn read_index_file(path: &Path, channels: &mut Vec<ChannelRecord>) {
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        // most likely deleted between the directory listing and here
        Err(e) => {
            tracing::warn!("Cannot open channel index {}: {}", path.display(), e);
            return;
        }
    };

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Skipping malformed row in {}: {}", path.display(), e);
                continue;
            }
        };
        channels.push(ChannelRecord {
            name: record.get(0).unwrap_or_default().to_string(),
            stream_path: record.get(1).unwrap_or_default().to_string(),
            extra: record.iter().skip(2).map(str::to_string).collect(),
        });
    }
}
