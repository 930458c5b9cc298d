use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Heatmap JSON produced upstream, re-read every cycle.
    pub payload_path: String,
    /// Human-readable name of the monitored site, used in alerts.
    pub location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: String,
    /// 0 keeps every snapshot.
    #[serde(default)]
    pub retain_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Optional cron expression (seconds field included, local time). Overrides interval_secs.
    #[serde(default)]
    pub cron: Option<String>,
}

fn default_interval_secs() -> u64 {
    600
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cron: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// E-mail relay endpoint; without it alerts only go to the log.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            webhook_url: None,
            sender: String::new(),
            recipients: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.source.payload_path.is_empty(),
            "source.payload_path must be non-empty"
        );
        anyhow::ensure!(
            !self.source.location.trim().is_empty(),
            "source.location must be non-empty"
        );
        anyhow::ensure!(!self.store.path.is_empty(), "store.path must be non-empty");
        anyhow::ensure!(
            self.schedule.interval_secs > 0,
            "schedule.interval_secs must be > 0, got {}",
            self.schedule.interval_secs
        );
        if let Some(expr) = &self.schedule.cron {
            cron::Schedule::from_str(expr)
                .map_err(|e| anyhow::anyhow!("schedule.cron is invalid ({}): {}", expr, e))?;
        }
        anyhow::ensure!(
            self.notify.timeout_secs > 0,
            "notify.timeout_secs must be > 0, got {}",
            self.notify.timeout_secs
        );
        if let Some(url) = &self.notify.webhook_url {
            anyhow::ensure!(
                url.starts_with("http://") || url.starts_with("https://"),
                "notify.webhook_url must be an http(s) URL, got {}",
                url
            );
            anyhow::ensure!(
                !self.notify.sender.is_empty(),
                "notify.sender must be set when notify.webhook_url is"
            );
            anyhow::ensure!(
                !self.notify.recipients.is_empty(),
                "notify.recipients must be non-empty when notify.webhook_url is set"
            );
        }
        Ok(())
    }
}
