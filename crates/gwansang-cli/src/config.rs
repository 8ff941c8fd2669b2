/// Output rendering for every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// CLI configuration, loaded from environment variables.
///
/// Command-line flags override whatever is set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed for reading-phrase selection; unset means a fresh seed per run.
    pub seed: Option<u64>,
    /// Whether readings may swap a record's meaning for one of its variants.
    pub phrase_variants: bool,
    pub output: OutputFormat,
}

impl Config {
    /// Load configuration from `GWANSANG_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let output = match var("GWANSANG_OUTPUT") {
            Some(v) => OutputFormat::parse(&v).unwrap_or_else(|| {
                tracing::warn!(value = %v, "unknown GWANSANG_OUTPUT, using text");
                OutputFormat::Text
            }),
            None => OutputFormat::Text,
        };

        Self {
            seed: var("GWANSANG_SEED").and_then(|v| v.parse().ok()),
            phrase_variants: var("GWANSANG_PHRASE_VARIANTS")
                .map(|v| v != "0")
                .unwrap_or(true),
            output,
        }
    }
}
