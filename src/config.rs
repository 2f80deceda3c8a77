use serde::Deserialize;
use std::path::Path;

use crate::category::Category;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address the web server listens on
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub arxiv: ArxivConfig,
    #[serde(default)]
    pub front_page: FrontPageConfig,
    /// One extra page per rubric, numbered from 2 in file order
    #[serde(default = "default_rubrics")]
    pub rubrics: Vec<RubricConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArxivConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontPageConfig {
    #[serde(default = "default_front_categories")]
    pub categories: Vec<Category>,
    #[serde(default = "default_front_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RubricConfig {
    pub category: Category,
    #[serde(default = "default_rubric_limit")]
    pub limit: usize,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "HEP-Times/1.0 (arXiv front page)".to_string()
}

fn default_front_categories() -> Vec<Category> {
    vec![Category::HepPh, Category::HepTh]
}

fn default_front_limit() -> usize {
    10
}

fn default_rubric_limit() -> usize {
    20
}

fn default_rubrics() -> Vec<RubricConfig> {
    Category::ALL
        .into_iter()
        .map(|category| RubricConfig {
            category,
            limit: default_rubric_limit(),
        })
        .collect()
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FrontPageConfig {
    fn default() -> Self {
        Self {
            categories: default_front_categories(),
            limit: default_front_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            arxiv: ArxivConfig::default(),
            front_page: FrontPageConfig::default(),
            rubrics: default_rubrics(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.front_page.categories.is_empty() {
            anyhow::bail!("front_page.categories must name at least one category");
        }
        if self.front_page.limit == 0 || self.rubrics.iter().any(|r| r.limit == 0) {
            anyhow::bail!("page limits must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.bind, "0.0.0.0:3000");
        assert_eq!(config.arxiv.api_url, "http://export.arxiv.org/api/query");
        assert_eq!(config.arxiv.timeout_secs, 10);
        assert_eq!(
            config.front_page.categories,
            vec![Category::HepPh, Category::HepTh]
        );
        assert_eq!(config.front_page.limit, 10);
        assert_eq!(config.rubrics.len(), Category::ALL.len());
        assert!(config.rubrics.iter().all(|r| r.limit == 20));
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
            bind = "127.0.0.1:8080"

            [arxiv]
            api_url = "http://localhost:9000/api/query"
            timeout_secs = 3

            [front_page]
            categories = ["hep-th", "gr-qc"]
            limit = 5

            [[rubrics]]
            category = "hep-lat"
            limit = 12

            [[rubrics]]
            category = "astro-ph"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.arxiv.api_url, "http://localhost:9000/api/query");
        assert_eq!(config.arxiv.timeout_secs, 3);
        assert_eq!(config.arxiv.user_agent, default_user_agent());
        assert_eq!(
            config.front_page.categories,
            vec![Category::HepTh, Category::GrQc]
        );
        assert_eq!(config.front_page.limit, 5);
        assert_eq!(config.rubrics.len(), 2);
        assert_eq!(config.rubrics[0].category, Category::HepLat);
        assert_eq!(config.rubrics[0].limit, 12);
        assert_eq!(config.rubrics[1].category, Category::AstroPh);
        assert_eq!(config.rubrics[1].limit, 20); // Default value
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let content = "this is not valid toml {{{";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let content = r#"
            [front_page]
            categories = ["hep-ph", "cond-mat"]
        "#;

        assert!(Config::from_str(content).is_err());
    }

    #[test]
    fn test_rubric_missing_category() {
        let content = r#"
            [[rubrics]]
            limit = 5
        "#;

        assert!(Config::from_str(content).is_err());
    }

    #[test]
    fn test_empty_front_page_rejected() {
        let content = r#"
            [front_page]
            categories = []
        "#;

        assert!(Config::from_str(content).is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let content = r#"
            [front_page]
            limit = 0
        "#;

        assert!(Config::from_str(content).is_err());
    }

    #[test]
    fn test_empty_rubrics_list() {
        let content = "rubrics = []";

        let config = Config::from_str(content).unwrap();
        assert!(config.rubrics.is_empty());
    }
}
