use clap::Args;
use serde::Deserialize;

use courier_pipeline::PublisherConfig;

use super::error::GenError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub count: Option<u64>,
    pub seed: Option<i64>,
    pub schema: Option<String>,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    Tcp {
        host: String,
        port: u16,
        /// Максимальный размер payload в байтах (0 = без лимита).
        #[serde(default)]
        max_payload: usize,
    },
    File {
        path: String,
    },
}

pub fn load_config(path: &str) -> Result<Config, GenError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GenError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| GenError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct GenArgs {
    /// Путь к config.toml
    #[arg(long, default_value = "config.toml", env = "COURIER_GEN_CONFIG")]
    pub config: String,

    /// Сколько записей о сотрудниках опубликовать
    #[arg(long)]
    pub count: Option<u64>,

    /// Seed для PRNG (0 = текущее время)
    #[arg(long)]
    pub seed: Option<i64>,

    /// Путь к .avsc-файлу, перекрывающему встроенную схему Employee
    #[arg(long)]
    pub schema: Option<String>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: config.toml < env/CLI
pub struct Effective {
    pub count: u64,
    pub seed: i64,
    pub schema: Option<String>,
    pub publisher: PublisherConfig,
    pub sinks: Vec<SinkConfig>,
}

impl Effective {
    pub fn new(args: &GenArgs) -> Result<Self, GenError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };

        if cfg.sinks.is_empty() {
            return Err(GenError::Config("no [[sinks]] configured in config".into()));
        }

        Ok(Self {
            count: args.count.or(cfg.count).unwrap_or(100),
            seed: args.seed.or(cfg.seed).unwrap_or(0),
            schema: args.schema.clone().or(cfg.schema),
            publisher: cfg.publisher,
            sinks: cfg.sinks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            count = 50
            seed = 7

            [publisher]
            batch_messages = 10
            overflow = "drop"

            [[sinks]]
            kind = "file"
            path = "out/employees.bin"

            [[sinks]]
            kind = "tcp"
            host = "127.0.0.1"
            port = 9999
            "#,
        )
        .unwrap();

        assert_eq!(cfg.count, Some(50));
        assert_eq!(cfg.publisher.batch_messages, 10);
        assert_eq!(cfg.sinks.len(), 2);
        assert!(matches!(cfg.sinks[0], SinkConfig::File { .. }));
        assert!(matches!(cfg.sinks[1], SinkConfig::Tcp { port: 9999, .. }));
    }

    #[test]
    fn publisher_section_is_optional() {
        let cfg: Config = toml::from_str(
            r#"
            [[sinks]]
            kind = "file"
            path = "out.bin"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.publisher.batch_messages, 100);
    }
}
