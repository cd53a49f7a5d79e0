use std::sync::OnceLock;

use crate::{Error, Result, SnowflakeGenerator};

static GLOBAL: OnceLock<SnowflakeGenerator> = OnceLock::new();

/// Registers `generator` as the process-wide generator.
///
/// Generators are ordinary values and never share state implicitly. Call this
/// once at startup when a single instance should be reachable from anywhere.
///
/// # Errors
///
/// Returns [`Error::AlreadyInstalled`] if a generator was installed before;
/// `generator` is dropped in that case and the existing one stays in place.
///
/// # Example
///
/// ```
/// use tempoid::{GeneratorConfig, SnowflakeGenerator, global, install_global};
///
/// let installed = install_global(SnowflakeGenerator::with_system_clock(GeneratorConfig::default()))
///     .unwrap();
/// let id = installed.generate().unwrap();
/// assert!(global().unwrap().is_valid(id.to_raw()));
/// ```
pub fn install_global(generator: SnowflakeGenerator) -> Result<&'static SnowflakeGenerator> {
    let mut installed_now = false;
    let installed = GLOBAL.get_or_init(|| {
        installed_now = true;
        generator
    });
    if installed_now {
        #[cfg(feature = "tracing")]
        tracing::info!(
            epoch_millis = installed.config().epoch_millis(),
            tolerance_millis = installed.config().tolerance_millis(),
            "installed global generator"
        );
        Ok(installed)
    } else {
        Err(Error::AlreadyInstalled)
    }
}

/// Returns the process-wide generator, if one was installed.
pub fn global() -> Option<&'static SnowflakeGenerator> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;

    #[test]
    fn installs_exactly_once() {
        let first = install_global(SnowflakeGenerator::default()).unwrap();
        let second = install_global(SnowflakeGenerator::with_system_clock(
            GeneratorConfig::default().with_tolerance(core::time::Duration::ZERO),
        ));
        assert_eq!(second.err(), Some(Error::AlreadyInstalled));

        let current = global().unwrap();
        assert!(core::ptr::eq(first, current));
        assert_eq!(current.config().tolerance_millis(), 5);
    }
}
