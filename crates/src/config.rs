//! Menu configuration loaded from a JSON file.
//!
//! Every field has a default, so `{}` is a valid config and any subset of
//! fields can be overridden.

use crate::acekey::{KeyOptions, DEFAULT_KEY_PATTERN};
use crate::error::{Error, Result};
use crate::group::{GroupOptions, GroupRule, DEFAULT_FALLBACK_GROUP, DEFAULT_GROUP_PATTERN};
use crate::layout::{LayoutOptions, DEFAULT_COLUMN_PADDING};
use crate::menu::MenuOptions;
use crate::sort::TargetOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSetting {
    #[default]
    Insertion,
    Alphabetical,
}

impl From<OrderSetting> for TargetOrder {
    fn from(o: OrderSetting) -> Self {
        match o {
            OrderSetting::Insertion => TargetOrder::Insertion,
            OrderSetting::Alphabetical => TargetOrder::Alphabetical,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fallback_group: String,
    pub group_pattern: String,
    pub merge_prefix_targets: bool,
    /// `null` disables the pass.
    pub merge_prefix_groups_threshold: Option<usize>,
    /// `null` disables the pass.
    pub merge_dangling_threshold: Option<usize>,
    pub key_pattern: String,
    pub case_fold: bool,
    pub align_target_keys: bool,
    pub prefix_group_keys: bool,
    pub target_order: OrderSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_limit: Option<usize>,
    pub spread_columns: bool,
    pub column_padding: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_group: DEFAULT_FALLBACK_GROUP.to_string(),
            group_pattern: DEFAULT_GROUP_PATTERN.to_string(),
            merge_prefix_targets: true,
            merge_prefix_groups_threshold: Some(1),
            merge_dangling_threshold: Some(1),
            key_pattern: DEFAULT_KEY_PATTERN.to_string(),
            case_fold: true,
            align_target_keys: true,
            prefix_group_keys: true,
            target_order: OrderSetting::Insertion,
            column_limit: None,
            spread_columns: false,
            column_padding: DEFAULT_COLUMN_PADDING,
            heading: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: shown.clone(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| Error::ConfigParse {
            path: shown.clone(),
            source,
        })?;
        info!(path = %shown, "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Compile the patterns into menu options.
    pub fn menu_options(&self) -> Result<MenuOptions> {
        let fallback = if self.fallback_group.trim().is_empty() {
            warn!("empty fallback_group, using '{}'", DEFAULT_FALLBACK_GROUP);
            DEFAULT_FALLBACK_GROUP.to_string()
        } else {
            self.fallback_group.clone()
        };
        let group = GroupOptions {
            fallback,
            rule: GroupRule::pattern(&self.group_pattern)?,
            merge_prefix_targets: self.merge_prefix_targets,
            merge_prefix_groups_threshold: self.merge_prefix_groups_threshold,
            merge_dangling_threshold: self.merge_dangling_threshold,
        };
        let keys = KeyOptions {
            case_fold: self.case_fold,
            align: self.align_target_keys,
            ..KeyOptions::with_pattern(&self.key_pattern)?
        };
        Ok(MenuOptions {
            group,
            order: self.target_order.into(),
            keys,
            prefix_group_keys: self.prefix_group_keys,
        })
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            heading: self.heading.clone(),
            column_limit: self.column_limit,
            spread: self.spread_columns,
            padding: self.column_padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_the_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        let opts = config.menu_options().unwrap();
        assert_eq!(opts.group.fallback, "default");
        assert!(opts.prefix_group_keys);
        assert!(opts.keys.case_fold);
        assert_eq!(config.layout_options().padding, DEFAULT_COLUMN_PADDING);
    }

    #[test]
    fn partial_overrides() {
        let config = Config::from_json(
            r#"{
                "fallback_group": "misc",
                "merge_dangling_threshold": null,
                "target_order": "alphabetical",
                "column_limit": 3,
                "spread_columns": true,
                "heading": "make"
            }"#,
        )
        .unwrap();
        let opts = config.menu_options().unwrap();
        assert_eq!(opts.group.fallback, "misc");
        assert_eq!(opts.group.merge_dangling_threshold, None);
        assert_eq!(opts.group.merge_prefix_groups_threshold, Some(1));
        assert!(matches!(opts.order, TargetOrder::Alphabetical));

        let layout = config.layout_options();
        assert_eq!(layout.column_limit, Some(3));
        assert!(layout.spread);
        assert_eq!(layout.heading.as_deref(), Some("make"));
    }

    #[test]
    fn bad_pattern_is_a_configuration_error() {
        let config = Config {
            group_pattern: "([".to_string(),
            ..Config::default()
        };
        let err = config.menu_options().unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn unknown_order_fails_to_parse() {
        assert!(Config::from_json(r#"{"target_order": "random"}"#).is_err());
    }

    #[test]
    fn load_reads_and_reports_paths() {
        let path = std::env::temp_dir().join(format!("tmenu-config-{}.json", std::process::id()));
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"key_pattern": "^[a-z]$", "case_fold": false}}"#).unwrap();
        }
        let config = Config::load(&path).unwrap();
        let opts = config.menu_options().unwrap();
        assert!(opts.keys.allows('q'));
        assert!(!opts.keys.allows('Q'));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::ConfigParse { .. })));
        fs::remove_file(&path).unwrap();
        assert!(matches!(Config::load(&path), Err(Error::ConfigRead { .. })));
    }

    #[test]
    fn load_logs_and_errors_name_the_path() {
        let path = std::env::temp_dir().join(format!("tmenu-logged-{}.json", std::process::id()));
        fs::write(&path, r#"{"case_fold": false}"#).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::sink)
            .finish();
        let loaded = tracing::subscriber::with_default(subscriber, || Config::load(&path));
        assert!(!loaded.unwrap().case_fold);
        fs::remove_file(&path).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()), "{err}");
    }
}
