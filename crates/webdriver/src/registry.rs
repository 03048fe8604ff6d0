use std::collections::HashMap;
use std::sync::Arc;

use lockstep_gate::SyncGate;

use crate::{CommandTransport, DriverConfig, DriverError, Result, SyncedTransport};

/// A registry-built transport, ready for test use.
pub type BoxedTransport = Box<dyn CommandTransport>;

/// Builds the unsynchronized transport for one driver kind.
pub type TransportFactory = Arc<dyn Fn(&DriverConfig) -> Result<BoxedTransport> + Send + Sync>;

/// Conventional name for the synchronized variant of a driver.
pub fn synced_name_for(base: &str) -> String {
    format!("{base}_sync")
}

struct Registration {
    factory: TransportFactory,
    gate: Option<SyncGate>,
}

/// Named driver construction without mutable shared factory state.
///
/// Synchronized variants live alongside the originals under distinct,
/// opt-in names; resolving a name either wraps the base factory's product
/// in [`SyncedTransport`] or delegates to the factory untouched. Base
/// registrations are never modified by adding a synced variant.
#[derive(Default)]
pub struct DriverRegistry {
    entries: HashMap<String, Registration>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a plain, unsynchronized driver.
    pub fn register(&mut self, name: impl Into<String>, factory: TransportFactory) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(DriverError::DuplicateDriver(name));
        }
        self.entries.insert(
            name,
            Registration {
                factory,
                gate: None,
            },
        );
        Ok(())
    }

    /// Registers a synchronized variant of `base` under `name`.
    ///
    /// The variant wraps whatever the base factory builds; `base` itself
    /// stays registered and unmodified. Registering a synced variant of an
    /// already-synced name reuses the same underlying base factory rather
    /// than stacking wrappers.
    pub fn register_synced(
        &mut self,
        name: impl Into<String>,
        base: &str,
        gate: SyncGate,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(DriverError::DuplicateDriver(name));
        }
        let base_factory = self
            .entries
            .get(base)
            .ok_or_else(|| DriverError::UnknownDriver(base.to_string()))?
            .factory
            .clone();
        self.entries.insert(
            name,
            Registration {
                factory: base_factory,
                gate: Some(gate),
            },
        );
        Ok(())
    }

    /// Resolves `name` and builds its transport.
    pub fn build(&self, name: &str, config: &DriverConfig) -> Result<BoxedTransport> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DriverError::UnknownDriver(name.to_string()))?;
        let transport = (entry.factory)(config)?;
        match &entry.gate {
            Some(gate) => {
                log::debug!("built synced driver '{name}'");
                Ok(Box::new(SyncedTransport::new(transport, gate.clone())))
            }
            None => {
                log::debug!("built driver '{name}'");
                Ok(transport)
            }
        }
    }

    /// Builds the driver named by `config.kind`.
    pub fn build_from_config(&self, config: &DriverConfig) -> Result<BoxedTransport> {
        config.validate()?;
        self.build(&config.kind, config)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WireCommand;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};

    struct EchoBrowser {
        label: String,
    }

    #[async_trait]
    impl CommandTransport for EchoBrowser {
        async fn execute(&mut self, command: WireCommand) -> Result<Value> {
            Ok(json!({ "label": self.label, "method": command.method }))
        }
    }

    fn echo_factory(label: &str) -> TransportFactory {
        let label = label.to_string();
        Arc::new(move |_config: &DriverConfig| {
            Ok(Box::new(EchoBrowser {
                label: label.clone(),
            }) as BoxedTransport)
        })
    }

    #[test]
    fn synced_name_follows_the_suffix_convention() {
        assert_eq!(synced_name_for("firefox"), "firefox_sync");
    }

    #[tokio::test]
    async fn builds_plain_drivers_by_name() {
        let mut registry = DriverRegistry::new();
        registry.register("firefox", echo_factory("ff")).unwrap();

        let mut driver = registry
            .build("firefox", &DriverConfig::new("firefox"))
            .unwrap();
        let value = driver.execute(WireCommand::bare("visit")).await.unwrap();
        assert_eq!(value, json!({ "label": "ff", "method": "visit" }));
    }

    #[test]
    fn unknown_driver_is_an_error() {
        let registry = DriverRegistry::new();
        let err = registry
            .build("chrome", &DriverConfig::new("chrome"))
            .expect_err("nothing registered");
        assert!(matches!(err, DriverError::UnknownDriver(name) if name == "chrome"));
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let mut registry = DriverRegistry::new();
        registry.register("firefox", echo_factory("one")).unwrap();
        let err = registry
            .register("firefox", echo_factory("two"))
            .expect_err("name taken");
        assert!(matches!(err, DriverError::DuplicateDriver(name) if name == "firefox"));
    }

    #[test]
    fn synced_variant_requires_a_registered_base() {
        let mut registry = DriverRegistry::new();
        let err = registry
            .register_synced("firefox_sync", "firefox", SyncGate::new())
            .expect_err("no base yet");
        assert!(matches!(err, DriverError::UnknownDriver(name) if name == "firefox"));
    }

    #[test]
    fn synced_variant_sits_alongside_the_original() {
        let mut registry = DriverRegistry::new();
        registry.register("firefox", echo_factory("ff")).unwrap();
        registry
            .register_synced(synced_name_for("firefox"), "firefox", SyncGate::new())
            .unwrap();

        assert!(registry.contains("firefox"));
        assert!(registry.contains("firefox_sync"));
        assert_eq!(registry.names(), ["firefox", "firefox_sync"]);
    }

    #[tokio::test]
    async fn synced_variant_waits_for_the_gate_and_plain_does_not() {
        let gate = SyncGate::new();
        let mut registry = DriverRegistry::new();
        registry.register("firefox", echo_factory("ff")).unwrap();
        registry
            .register_synced("firefox_sync", "firefox", gate.clone())
            .unwrap();

        gate.acquire().unwrap();

        // The plain driver is unaffected by the held gate.
        let mut plain = registry
            .build("firefox", &DriverConfig::new("firefox"))
            .unwrap();
        tokio::time::timeout(
            Duration::from_millis(100),
            plain.execute(WireCommand::bare("visit")),
        )
        .await
        .expect("plain driver never touches the gate")
        .unwrap();

        // The synced driver blocks until release.
        let releaser = {
            let gate = gate.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                let released_at = Instant::now();
                gate.release().unwrap();
                released_at
            })
        };

        let mut synced = registry
            .build("firefox_sync", &DriverConfig::new("firefox_sync"))
            .unwrap();
        synced.execute(WireCommand::bare("visit")).await.unwrap();
        let returned_at = Instant::now();

        let released_at = releaser.await.unwrap();
        assert!(released_at <= returned_at);
    }

    #[tokio::test]
    async fn build_from_config_uses_the_kind_field() {
        let mut registry = DriverRegistry::new();
        registry.register("firefox", echo_factory("ff")).unwrap();

        let mut driver = registry
            .build_from_config(&DriverConfig::new("firefox"))
            .unwrap();
        driver.execute(WireCommand::bare("visit")).await.unwrap();

        let err = registry
            .build_from_config(&DriverConfig::new(""))
            .expect_err("empty kind");
        assert!(matches!(err, DriverError::InvalidConfig(_)));
    }
}
