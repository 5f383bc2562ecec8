use crate::backup::backup_base_name;
use crate::error::{JournalError, Result};
use crate::model::{PageDateMap, RecurringSpan, SpanSet};
use crate::overlay::OverlayStyle;
use chrono::{Datelike, NaiveDate, Weekday};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.yml";
const DEFAULT_SOURCE_JOURNAL: &str = "Bullet Journal";
const DEFAULT_DATE_PAGES_START: u32 = 144;
const DEFAULT_FONT_SIZE: f32 = 36.0;
const DEFAULT_Y_POSITION: f32 = 0.82;
const DEFAULT_RMAPI_PATH: &str = "rmapi";
const MAX_DAYS_IN_YEAR: u32 = 366;

/// Configuration for a journal run, read from `config.yml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JournalConfig {
    /// Remote notebook to read from.
    #[serde(default = "default_source_journal")]
    pub source_journal: String,

    /// Name to publish the updated notebook under. Defaults to the source.
    #[serde(default)]
    pub target_journal: Option<String>,

    /// Prefix for backup names. Defaults to the source with `_` for spaces.
    #[serde(default)]
    pub backup_name: Option<String>,

    /// Remote folder for backups. Defaults to the top level.
    #[serde(default)]
    pub backup_folder: Option<String>,

    /// Clean PDF to draw on instead of the notebook's own base.
    #[serde(default)]
    pub base_pdf_template: Option<PathBuf>,

    #[serde(default)]
    pub recurring_items_spans: Vec<SpanConfig>,

    /// 1-based page that holds January 1st.
    #[serde(default = "default_date_pages_start")]
    pub date_pages_start: u32,

    /// Calendar year of the date pages. Defaults to the current year.
    #[serde(default)]
    pub date_pages_year: Option<i32>,

    #[serde(default = "default_font_size")]
    pub font_size: f32,

    #[serde(default = "default_y_position")]
    pub y_position: f32,

    #[serde(default = "default_add_divider")]
    pub add_divider: bool,

    #[serde(default = "default_rmapi_path")]
    pub rmapi_path: String,

    #[serde(default)]
    pub rmapi_args: Vec<String>,

    /// Directory of the file this was loaded from.
    #[serde(skip)]
    pub(crate) base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpanConfig {
    pub starts_on: NaiveDate,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub day_of_week: Option<DayOfWeek>,
}

/// `day_of_week` on a span: either one weekday name, which restricts the
/// span's `items` to that day, or a map of extra items per weekday.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DayOfWeek {
    Only(String),
    Extra(BTreeMap<String, Vec<String>>),
}

fn default_source_journal() -> String {
    DEFAULT_SOURCE_JOURNAL.to_string()
}

fn default_date_pages_start() -> u32 {
    DEFAULT_DATE_PAGES_START
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_y_position() -> f32 {
    DEFAULT_Y_POSITION
}

fn default_add_divider() -> bool {
    true
}

fn default_rmapi_path() -> String {
    DEFAULT_RMAPI_PATH.to_string()
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            source_journal: default_source_journal(),
            target_journal: None,
            backup_name: None,
            backup_folder: None,
            base_pdf_template: None,
            recurring_items_spans: Vec::new(),
            date_pages_start: DEFAULT_DATE_PAGES_START,
            date_pages_year: None,
            font_size: DEFAULT_FONT_SIZE,
            y_position: DEFAULT_Y_POSITION,
            add_divider: true,
            rmapi_path: default_rmapi_path(),
            rmapi_args: Vec::new(),
            base_dir: None,
        }
    }
}

impl JournalConfig {
    /// Finds the config file: an explicit path wins, then `config.yml` in
    /// `cwd`, then the per-user config directory.
    pub fn locate(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(JournalError::ConfigNotFound(path.to_path_buf()))
            };
        }

        let local = cwd.join(CONFIG_FILENAME);
        if local.is_file() {
            return Ok(local);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "rmjournal") {
            let user = dirs.config_dir().join(CONFIG_FILENAME);
            if user.is_file() {
                return Ok(user);
            }
        }

        Err(JournalError::ConfigNotFound(local))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JournalError::ConfigNotFound(path.to_path_buf())
            } else {
                JournalError::Io(e)
            }
        })?;
        let mut config = Self::from_yaml(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty file deserializes as unit, not as an empty mapping.
        let config: JournalConfig = if text.trim().is_empty() {
            JournalConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_journal.trim().is_empty() {
            return Err(JournalError::Config(
                "source_journal must not be empty".to_string(),
            ));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(JournalError::Config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.y_position) {
            return Err(JournalError::Config(format!(
                "y_position must be between 0 and 1, got {}",
                self.y_position
            )));
        }
        if self.date_pages_start == 0 {
            return Err(JournalError::Config(
                "date_pages_start is 1-based and must be at least 1".to_string(),
            ));
        }
        // Room for a leap year's worth of pages.
        if self.date_pages_start.checked_add(MAX_DAYS_IN_YEAR - 1).is_none() {
            return Err(JournalError::Config(format!(
                "date_pages_start {} leaves no room for a year of pages",
                self.date_pages_start
            )));
        }
        if let Some(folder) = &self.backup_folder {
            if folder.trim().is_empty() || folder.contains('/') {
                return Err(JournalError::Config(format!(
                    "backup_folder must be a single top-level folder name, got '{}'",
                    folder
                )));
            }
        }
        self.span_set().map(|_| ())
    }

    /// The configured spans, with weekday names resolved.
    pub fn span_set(&self) -> Result<SpanSet> {
        let spans = self
            .recurring_items_spans
            .iter()
            .map(SpanConfig::to_span)
            .collect::<Result<Vec<_>>>()?;
        Ok(SpanSet::new(spans))
    }

    pub fn page_date_map(&self, today: NaiveDate) -> PageDateMap {
        let year = self.date_pages_year.unwrap_or_else(|| today.year());
        PageDateMap::new(self.date_pages_start, year)
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            font_size: self.font_size,
            y_position: self.y_position,
            add_divider: self.add_divider,
        }
    }

    pub fn target_journal(&self) -> &str {
        self.target_journal
            .as_deref()
            .unwrap_or(&self.source_journal)
    }

    pub fn backup_base(&self) -> String {
        self.backup_name
            .clone()
            .unwrap_or_else(|| backup_base_name(&self.source_journal))
    }

    /// Template path, relative paths taken from the config file's directory.
    pub fn template_path(&self) -> Option<PathBuf> {
        let path = self.base_pdf_template.as_ref()?;
        Some(match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        })
    }

    /// Reads the template when one is configured.
    pub fn load_template(&self) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.template_path() else {
            return Ok(None);
        };
        if !path.is_file() {
            return Err(JournalError::TemplateNotFound(path));
        }
        Ok(Some(fs::read(&path)?))
    }
}

impl SpanConfig {
    fn to_span(&self) -> Result<RecurringSpan> {
        match &self.day_of_week {
            None => Ok(RecurringSpan::new(self.starts_on, self.items.clone())),
            Some(DayOfWeek::Only(key)) => {
                let weekday = self.weekday(key)?;
                Ok(RecurringSpan::new(self.starts_on, Vec::new())
                    .with_weekday_items(weekday, self.items.clone()))
            }
            Some(DayOfWeek::Extra(extra)) => {
                let mut span = RecurringSpan::new(self.starts_on, self.items.clone());
                for (key, items) in extra {
                    span = span.with_weekday_items(self.weekday(key)?, items.clone());
                }
                Ok(span)
            }
        }
    }

    fn weekday(&self, key: &str) -> Result<Weekday> {
        key.trim().parse().map_err(|_| {
            JournalError::Config(format!(
                "unknown weekday '{}' in span starting {}",
                key, self.starts_on
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
source_journal: Bullet Journal
backup_folder: Backups
base_pdf_template: templates/base.pdf
date_pages_start: 10
date_pages_year: 2024
recurring_items_spans:
  - starts_on: 2024-01-01
    items: [Meditate, Read]
    day_of_week:
      monday: [Plan week]
      Fri: [Review]
  - starts_on: 2024-06-01
    items: [Run]
"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_apply_to_missing_keys() {
        let config = JournalConfig::from_yaml("recurring_items_spans: []\n").unwrap();
        assert_eq!(config.source_journal, "Bullet Journal");
        assert_eq!(config.date_pages_start, 144);
        assert_eq!(config.font_size, 36.0);
        assert_eq!(config.y_position, 0.82);
        assert!(config.add_divider);
        assert_eq!(config.rmapi_path, "rmapi");
        assert_eq!(config.target_journal(), "Bullet Journal");
        assert_eq!(config.backup_base(), "Bullet_Journal");
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = JournalConfig::from_yaml("  \n").unwrap();
        assert_eq!(config, JournalConfig::default());
    }

    #[test]
    fn test_parses_sample() {
        let config = JournalConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.backup_folder.as_deref(), Some("Backups"));
        assert_eq!(config.recurring_items_spans.len(), 2);

        let spans = config.span_set().unwrap();
        let monday = date(2024, 1, 1);
        assert_eq!(
            spans.effective_span(monday).unwrap().items_for(monday),
            vec!["Meditate", "Read", "Plan week"]
        );
        let friday = date(2024, 1, 5);
        assert_eq!(
            spans.effective_span(friday).unwrap().items_for(friday),
            vec!["Meditate", "Read", "Review"]
        );
    }

    #[test]
    fn test_page_date_map_year() {
        let config = JournalConfig::from_yaml(SAMPLE).unwrap();
        let map = config.page_date_map(date(2030, 3, 3));
        assert_eq!(map.year(), 2024);
        assert_eq!(map.first_page(), 10);
        assert_eq!(map.days(), 366);

        let config = JournalConfig::default();
        assert_eq!(config.page_date_map(date(2027, 8, 1)).year(), 2027);
    }

    #[test]
    fn test_unknown_weekday_is_rejected() {
        let yaml = "recurring_items_spans:\n  - starts_on: 2025-01-01\n    day_of_week:\n      funday: [Party]\n";
        let err = JournalConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, JournalError::Config(_)));
        assert!(err.to_string().contains("funday"));
    }

    #[test]
    fn test_single_weekday_span_only_applies_on_that_day() {
        let yaml = "recurring_items_spans:\n  - starts_on: 2025-01-01\n    day_of_week: monday\n    items: [C]\n";
        let config = JournalConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.recurring_items_spans[0].day_of_week,
            Some(DayOfWeek::Only("monday".to_string()))
        );

        let spans = config.span_set().unwrap();
        let monday = date(2025, 1, 6);
        assert_eq!(spans.effective_span(monday).unwrap().items_for(monday), vec!["C"]);
        let tuesday = date(2025, 1, 7);
        assert!(spans.effective_span(tuesday).unwrap().items_for(tuesday).is_empty());
    }

    #[test]
    fn test_weekday_map_adds_to_daily_items() {
        let yaml = "recurring_items_spans:\n  - starts_on: 2025-01-01\n    items: [A]\n    day_of_week:\n      tue: [B]\n";
        let config = JournalConfig::from_yaml(yaml).unwrap();
        assert!(matches!(
            config.recurring_items_spans[0].day_of_week,
            Some(DayOfWeek::Extra(_))
        ));

        let spans = config.span_set().unwrap();
        let tuesday = date(2025, 1, 7);
        assert_eq!(spans.effective_span(tuesday).unwrap().items_for(tuesday), vec!["A", "B"]);
        let wednesday = date(2025, 1, 8);
        assert_eq!(spans.effective_span(wednesday).unwrap().items_for(wednesday), vec!["A"]);
    }

    #[test]
    fn test_unknown_single_weekday_is_rejected() {
        let yaml = "recurring_items_spans:\n  - starts_on: 2025-01-01\n    day_of_week: someday\n    items: [C]\n";
        let err = JournalConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, JournalError::Config(_)));
        assert!(err.to_string().contains("someday"));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let yaml = "recurring_items_spans:\n  - starts_on: 2025-13-01\n";
        assert!(matches!(
            JournalConfig::from_yaml(yaml),
            Err(JournalError::Yaml(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        for yaml in [
            "font_size: 0\n",
            "font_size: -4\n",
            "y_position: 1.5\n",
            "date_pages_start: 0\n",
            "date_pages_start: 4294967295\n",
            "date_pages_start: 4294967000\n",
            "backup_folder: Journal/Backups\n",
            "backup_folder: ' '\n",
            "source_journal: ''\n",
        ] {
            assert!(
                matches!(JournalConfig::from_yaml(yaml), Err(JournalError::Config(_))),
                "accepted {:?}",
                yaml
            );
        }
    }

    #[test]
    fn test_target_and_backup_overrides() {
        let yaml = "source_journal: Journal 2025\ntarget_journal: Journal Live\nbackup_name: JBK\n";
        let config = JournalConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.target_journal(), "Journal Live");
        assert_eq!(config.backup_base(), "JBK");
    }

    #[test]
    fn test_template_relative_to_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "base_pdf_template: base.pdf\n").unwrap();

        let config = JournalConfig::load(&path).unwrap();
        assert_eq!(config.template_path(), Some(dir.path().join("base.pdf")));
        assert!(matches!(
            config.load_template(),
            Err(JournalError::TemplateNotFound(_))
        ));

        fs::write(dir.path().join("base.pdf"), b"%PDF").unwrap();
        assert_eq!(config.load_template().unwrap(), Some(b"%PDF".to_vec()));
    }

    #[test]
    fn test_no_template_configured() {
        assert_eq!(JournalConfig::default().load_template().unwrap(), None);
    }

    #[test]
    fn test_locate_prefers_explicit_then_cwd() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join(CONFIG_FILENAME);
        fs::write(&local, "").unwrap();
        let explicit = dir.path().join("other.yml");
        fs::write(&explicit, "").unwrap();

        assert_eq!(
            JournalConfig::locate(Some(&explicit), dir.path()).unwrap(),
            explicit
        );
        assert_eq!(JournalConfig::locate(None, dir.path()).unwrap(), local);
    }

    #[test]
    fn test_locate_missing_explicit_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(matches!(
            JournalConfig::locate(Some(&missing), dir.path()),
            Err(JournalError::ConfigNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            JournalConfig::load(dir.path().join(CONFIG_FILENAME)),
            Err(JournalError::ConfigNotFound(_))
        ));
    }
}
