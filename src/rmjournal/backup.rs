use chrono::NaiveDate;
use std::collections::HashSet;

/// First free name among `{base}_{YYYYMMDD}`, `{base}_{YYYYMMDD}_1`, `_2`, ...
pub fn next_backup_name(base_name: &str, today: NaiveDate, existing: &HashSet<String>) -> String {
    let stem = format!("{}_{}", base_name, today.format("%Y%m%d"));
    if !existing.contains(&stem) {
        return stem;
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{}_{}", stem, suffix);
        if !existing.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Default backup prefix for a notebook: whitespace becomes underscores.
pub fn backup_base_name(journal_name: &str) -> String {
    journal_name.split_whitespace().collect::<Vec<_>>().join("_")
}
