//! Configuration resolution for psd-grader
//!
//! Turns the shared bootstrap [`TomlConfig`] into the typed settings the
//! grader needs: scoring table, source tier, concurrency.

use crate::error::GraderResult;
use crate::models::Tier;
use crate::scoring::ScoringTable;
use psd_common::config::{LibraryConfig, TomlConfig};
use tracing::{info, warn};

/// Scoring table from the `[scoring]` section, or the built-in one
pub fn load_scoring_table(config: &TomlConfig) -> GraderResult<ScoringTable> {
    let table = match &config.scoring {
        Some(section) => {
            let table = ScoringTable::from_toml(section)?;
            info!(
                notation_terms = table.notation_terms.len(),
                fast_tempo_terms = table.fast_tempo_terms.len(),
                accidental_symbols = table.accidental_symbols.len(),
                "Loaded scoring table from config"
            );
            table
        }
        None => ScoringTable::default(),
    };

    if table.counts_letter_b() {
        warn!("Accidental count includes the letter 'b'; ordinary words inflate it (set accidental_symbols.b = 0 to disable)");
    }
    Ok(table)
}

/// Tier folder whose documents get graded
pub fn source_tier(library: &LibraryConfig) -> GraderResult<Tier> {
    Ok(library.source_tier.parse::<Tier>()?)
}

/// Number of documents graded at once
///
/// Configured value if set (minimum 1), else the available parallelism.
pub fn max_concurrency(library: &LibraryConfig) -> usize {
    library
        .max_concurrency
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
}

/// Bootstrap config with the built-in scoring table written out
///
/// Used by `init-config` so users have every term in front of them to tune.
pub fn starter_config() -> GraderResult<TomlConfig> {
    Ok(TomlConfig {
        scoring: Some(ScoringTable::default().to_toml()?),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraderError;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    type Warnings = Arc<Mutex<Vec<String>>>;

    /// Records WARN messages emitted on this thread
    struct WarnLayer(Warnings);

    impl<S: tracing::Subscriber> Layer<S> for WarnLayer {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Message(String);
            impl tracing::field::Visit for Message {
                fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                    if field.name() == "message" {
                        self.0 = format!("{:?}", value);
                    }
                }
            }

            if *event.metadata().level() == tracing::Level::WARN {
                let mut message = Message(String::new());
                event.record(&mut message);
                self.0.lock().unwrap().push(message.0);
            }
        }
    }

    fn capture_warnings() -> (Warnings, DefaultGuard) {
        let warnings = Warnings::default();
        let subscriber = tracing_subscriber::registry().with(WarnLayer(Arc::clone(&warnings)));
        (warnings, tracing::subscriber::set_default(subscriber))
    }

    #[test]
    fn test_missing_scoring_section_uses_defaults() {
        let table = load_scoring_table(&TomlConfig::default()).unwrap();
        assert_eq!(table, ScoringTable::default());
    }

    #[test]
    fn test_letter_b_warning_on_default_table() {
        let (logs, _guard) = capture_warnings();
        load_scoring_table(&TomlConfig::default()).unwrap();
        assert_eq!(logs.lock().unwrap().len(), 1);
        assert!(logs.lock().unwrap()[0].contains("letter 'b'"));
    }

    #[test]
    fn test_no_letter_b_warning_when_disabled() {
        let (logs, _guard) = capture_warnings();
        let scoring: toml::Table =
            toml::from_str("[accidental_symbols]\n\"#\" = 1\nb = 0\n").unwrap();
        let config = TomlConfig {
            scoring: Some(scoring),
            ..Default::default()
        };

        load_scoring_table(&config).unwrap();
        assert!(logs.lock().unwrap().is_empty());
    }

    #[test]
    fn test_source_tier_parse() {
        let library = LibraryConfig::default();
        assert_eq!(source_tier(&library).unwrap(), Tier::Easy);

        let library = LibraryConfig {
            source_tier: "Expert".to_string(),
            ..Default::default()
        };
        assert!(matches!(source_tier(&library), Err(GraderError::Common(_))));
    }

    #[test]
    fn test_max_concurrency_at_least_one() {
        let library = LibraryConfig {
            max_concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(max_concurrency(&library), 1);
        assert!(max_concurrency(&LibraryConfig::default()) >= 1);
    }

    #[test]
    fn test_starter_config_roundtrips_scoring_table() {
        let config = starter_config().unwrap();
        let table = load_scoring_table(&config).unwrap();
        assert_eq!(table, ScoringTable::default());
    }
}
